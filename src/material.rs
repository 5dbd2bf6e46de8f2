use bevy::{
    prelude::*,
    reflect::{TypePath, TypeUuid},
    render::render_resource::{AsBindGroup, ShaderRef},
    sprite::Material2d,
};

use crate::shader::TILEMAP_SHADER_HANDLE;
use crate::uniform::TilemapUniform;

/// Material that renders a whole [`crate::tilemap::Tilemap`] onto a single quad.
///
/// Usually created through [`crate::node::TilemapNodeBuilder`].
#[derive(AsBindGroup, TypeUuid, TypePath, Debug, Clone)]
#[uuid = "b0a7c1e4-58a4-4d6e-a5f0-31c6e2f4d7a9"]
pub struct TilemapMaterial {
    #[uniform(0)]
    pub(crate) uniform: TilemapUniform,

    /// Atlas texture with the individual tiles
    #[texture(1)]
    #[sampler(2)]
    pub(crate) atlas_texture: Handle<Image>,

    /// Packed per-cell data, `Rgba8Uint`, `3 * width` x `height` texels.
    #[texture(3, sample_type = "u_int")]
    pub(crate) data_texture: Handle<Image>,
}

impl TilemapMaterial {
    pub fn uniform(&self) -> &TilemapUniform {
        &self.uniform
    }

    pub fn atlas_texture(&self) -> &Handle<Image> {
        &self.atlas_texture
    }

    pub fn data_texture(&self) -> &Handle<Image> {
        &self.data_texture
    }
}

impl Material2d for TilemapMaterial {
    fn fragment_shader() -> ShaderRef {
        ShaderRef::Handle(TILEMAP_SHADER_HANDLE.typed())
    }
}
