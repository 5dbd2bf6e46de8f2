use bevy::{
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages},
        texture::ImageSampler,
    },
    sprite::Mesh2dHandle,
};

use crate::atlas::Atlas;
use crate::bundle::TilemapNodeBundle;
use crate::material::TilemapMaterial;
use crate::tilemap::Tilemap;
use crate::uniform::TilemapUniform;

/// Renders the [`Tilemap`] behind `tilemap` with `atlas`.
///
/// Every node owns its own data texture, which [`flush_tilemaps`] keeps in sync
/// with the tilemap's packed buffer.
#[derive(Debug, Component, Clone)]
pub struct TilemapNode {
    pub tilemap: Handle<Tilemap>,

    /// Atlas the node was bound to, eg. for picking tiles via [`Atlas::tile`].
    pub(crate) atlas: Atlas,

    /// Texture containing the packed tile data
    pub(crate) data_texture: Handle<Image>,
}

impl TilemapNode {
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn data_texture(&self) -> &Handle<Image> {
        &self.data_texture
    }
}

/// GPU side copy of `tilemap`'s packed buffer, as currently flushed.
pub fn data_image(tilemap: &Tilemap) -> Image {
    let size = tilemap.packed().texture_size();
    let mut image = Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        tilemap.packed().as_bytes().to_vec(),
        TextureFormat::Rgba8Uint,
    );
    image.texture_descriptor.usage = TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING;
    image.texture_descriptor.mip_level_count = 1;
    image
}

/// Texture for the atlas' (possibly chroma keyed) image.
pub fn atlas_image(atlas: &Atlas) -> Image {
    let size = atlas.pixel_size();
    let mut image = Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        atlas.image().as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
    );
    // linear filtering bleeds neighbouring tiles into each other
    image.sampler_descriptor = ImageSampler::nearest();
    image
}

/// Copy the texels of freshly flushed `cells` into a data texture created by [`data_image`].
///
/// Returns false (and leaves `image` alone) if `image` was not made for a map of
/// `tilemap`'s size.
pub fn sync_data_image(tilemap: &Tilemap, cells: &[usize], image: &mut Image) -> bool {
    let size = tilemap.packed().texture_size();
    let extent = image.texture_descriptor.size;
    if extent.width != size.x
        || extent.height != size.y
        || image.data.len() != tilemap.packed().as_bytes().len()
    {
        return false;
    }
    tilemap.packed().copy_cells_into(cells, &mut image.data);
    true
}

pub struct TilemapNodeBuilder {
    tilemap: Handle<Tilemap>,
    data: Image,
    atlas: Atlas,
    atlas_texture: Option<Handle<Image>>,
    uniform: TilemapUniform,
    transform: Transform,
}

impl TilemapNodeBuilder {
    /// Bind the tilemap behind `handle` to `atlas`.
    /// `None` if `handle` does not refer to a tilemap in `tilemaps`.
    pub fn new(
        handle: Handle<Tilemap>,
        tilemaps: &Assets<Tilemap>,
        atlas: &Atlas,
    ) -> Option<Self> {
        let tilemap = tilemaps.get(&handle)?;
        Some(Self {
            data: data_image(tilemap),
            atlas: atlas.clone(),
            atlas_texture: None,
            uniform: TilemapUniform::new(tilemap, atlas),
            transform: Transform::default(),
            tilemap: handle,
        })
    }

    /// Use an already uploaded atlas texture (eg. shared with another node)
    /// instead of uploading the atlas image again.
    pub fn with_atlas_texture(mut self, atlas_texture: Handle<Image>) -> Self {
        self.atlas_texture = Some(atlas_texture);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn build(
        self,
        images: &mut Assets<Image>,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<TilemapMaterial>,
    ) -> TilemapNodeBundle {
        let atlas_texture = match self.atlas_texture {
            Some(handle) => handle,
            None => images.add(atlas_image(&self.atlas)),
        };
        let data_texture = images.add(self.data);
        let mesh = meshes.add(Mesh::from(shape::Quad::new(self.uniform.world_size())));

        debug!(
            "binding {}x{} tilemap to {}x{} atlas",
            self.uniform.map_size().x,
            self.uniform.map_size().y,
            self.atlas.width(),
            self.atlas.height()
        );

        TilemapNodeBundle {
            node: TilemapNode {
                tilemap: self.tilemap,
                atlas: self.atlas,
                data_texture: data_texture.clone(),
            },
            material: materials.add(TilemapMaterial {
                uniform: self.uniform,
                atlas_texture,
                data_texture,
            }),
            mesh: Mesh2dHandle(mesh),
            transform: self.transform,
            global_transform: GlobalTransform::default(),
            visibility: Visibility::default(),
            computed_visibility: ComputedVisibility::default(),
        }
    }
}

/// Flush every dirty [`Tilemap`] and push the changed cells to the data textures
/// of all nodes showing it.
///
/// Runs once per frame in `PostUpdate` (see [`crate::plugin::TilemapPlugin`]),
/// so any number of writes during a frame end up in a single flush.
///
/// Only the encoding and the copy into the data images scale with the number of changed
/// cells. Modifying an image makes bevy re-upload it as a whole, and touching the material
/// rebuilds its bind group, so the GPU side cost of a flush is one full data texture
/// upload per node.
///
/// Nodes whose data image does not fit their tilemap are skipped with a warning.
pub fn flush_tilemaps(
    mut tilemaps: ResMut<Assets<Tilemap>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<TilemapMaterial>>,
    nodes: Query<(&TilemapNode, &Handle<TilemapMaterial>)>,
) {
    let dirty: Vec<_> = tilemaps
        .iter()
        .filter(|(_, tilemap)| tilemap.is_dirty())
        .map(|(id, _)| id)
        .collect();

    for id in dirty {
        let Some(tilemap) = tilemaps.get_mut(&Handle::weak(id)) else {
            continue;
        };
        let Some(cells) = tilemap.flush_if_dirty() else {
            continue;
        };
        let tilemap = &*tilemap;

        for (node, material) in nodes.iter().filter(|(node, _)| node.tilemap.id() == id) {
            let Some(image) = images.get_mut(&node.data_texture) else {
                warn!("tilemap data texture not loaded, skipping update");
                continue;
            };
            if !sync_data_image(tilemap, &cells, image) {
                warn!(
                    "tilemap data texture does not match {}x{} map, skipping update",
                    tilemap.width(),
                    tilemap.height()
                );
                continue;
            }

            // rebuild the bind group so it picks up the re-uploaded texture
            if materials.get_mut(material).is_none() {
                warn!("tilemap material missing");
            }
        }
    }
}
