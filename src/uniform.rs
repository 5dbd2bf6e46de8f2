use bevy::{
    math::{uvec2, vec2, vec4},
    prelude::*,
    render::render_resource::ShaderType,
};
use image::RgbaImage;

use crate::atlas::Atlas;
use crate::color::Color as TileColor;
use crate::packed::{decode_ident, PackedBuffer, Texel, TEXELS_PER_CELL};
use crate::tilemap::Tilemap;

/// Parameters handed to the tilemap shader. Computed once when a map is bound to an atlas.
///
/// The data texture (see [`crate::packed`]) is bound separately.
#[derive(ShaderType, Clone, Debug, Default, PartialEq)]
pub struct TilemapUniform {
    /// Position of the first tile in the atlas, in pixels.
    pub(crate) offset: Vec2,

    /// Size of each tile, in pixels.
    pub(crate) tile_size: Vec2,

    /// Tile size plus spacing, in pixels.
    pub(crate) tile_stride: Vec2,

    /// Size of the atlas, in pixels.
    pub(crate) atlas_size: Vec2,

    /// Size of the map, in tiles.
    pub(crate) map_size: Vec2,

    /// Number of tile columns in the atlas.
    pub(crate) atlas_columns: u32,
}

/// One cell as the shader sees it after reading its three texels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedCell {
    /// 0-1
    pub alpha: f32,
    pub id: u32,
    pub color: TileColor,
    pub background_color: TileColor,
}

pub fn decode_cell(texels: [Texel; TEXELS_PER_CELL]) -> DecodedCell {
    let (alpha, id) = decode_ident(texels[0]);
    DecodedCell {
        alpha: alpha as f32 / 255.0,
        id,
        color: texels[1].into(),
        background_color: texels[2].into(),
    }
}

fn normalized(color: TileColor) -> Vec4 {
    let [r, g, b] = color.rgb_f32();
    vec4(r, g, b, color.alpha_f32())
}

impl TilemapUniform {
    pub fn new(tilemap: &Tilemap, atlas: &Atlas) -> Self {
        Self {
            offset: atlas.offset().as_vec2(),
            tile_size: atlas.tile_size().as_vec2(),
            tile_stride: atlas.tile_stride().as_vec2(),
            atlas_size: atlas.pixel_size().as_vec2(),
            map_size: tilemap.size().as_vec2(),
            atlas_columns: atlas.width(),
        }
    }

    pub fn map_size(&self) -> Vec2 {
        self.map_size
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Size of the quad needed to show every tile at its atlas pixel size.
    pub fn world_size(&self) -> Vec2 {
        self.map_size * self.tile_size
    }

    /// Cell under the quad-local `uv` (`(0, 0)` is the top left corner of the map).
    pub fn cell_at(&self, uv: Vec2) -> UVec2 {
        let cell = (uv * self.map_size).floor().max(Vec2::ZERO);
        cell.as_uvec2().min(self.map_size.as_uvec2() - uvec2(1, 1))
    }

    /// Position within the cell under `uv`, in `[0, 1)^2`.
    pub fn intra_tile_uv(&self, uv: Vec2) -> Vec2 {
        (uv * self.map_size).fract()
    }

    /// Atlas column and row of tile `id`.
    pub fn atlas_cell(&self, id: u32) -> UVec2 {
        uvec2(id % self.atlas_columns, id / self.atlas_columns)
    }

    /// Pixel position in the atlas for `intra_uv` within tile `id`.
    pub fn atlas_pixel(&self, id: u32, intra_uv: Vec2) -> Vec2 {
        self.offset + self.atlas_cell(id).as_vec2() * self.tile_stride + intra_uv * self.tile_size
    }

    /// Normalized atlas texture coordinate for `intra_uv` within tile `id`.
    pub fn atlas_uv(&self, id: u32, intra_uv: Vec2) -> Vec2 {
        self.atlas_pixel(id, intra_uv) / self.atlas_size
    }

    /// CPU version of what the fragment shader computes for quad-local `uv`.
    ///
    /// Returns non-premultiplied RGBA in `[0, 1]`. The atlas is sampled with
    /// nearest filtering, like the GPU side does.
    pub fn shade(&self, data: &PackedBuffer, atlas: &RgbaImage, uv: Vec2) -> Vec4 {
        let cell = self.cell_at(uv);
        let index = cell.y as usize * data.map_size().x as usize + cell.x as usize;
        let decoded = decode_cell(data.cell_texels(index));

        let pixel = self.atlas_pixel(decoded.id, self.intra_tile_uv(uv)).floor();
        let max = vec2(atlas.width() as f32 - 1.0, atlas.height() as f32 - 1.0);
        let pixel = pixel.clamp(Vec2::ZERO, max).as_uvec2();
        let sample = normalized(TileColor::from(*atlas.get_pixel(pixel.x, pixel.y)));

        let mut out = if sample.w > 0.0 {
            sample * normalized(decoded.color)
        } else {
            normalized(decoded.background_color)
        };
        out.w *= decoded.alpha;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use bevy::math::uvec2;

    fn atlas() -> Atlas {
        // 4x2 tiles of 8x8 with 1px spacing and a 2px border
        let image = RgbaImage::from_fn(2 + 4 * 9 - 1, 2 + 2 * 9 - 1, |x, y| {
            if x < 2 || y < 2 {
                image::Rgba([0, 0, 0, 0])
            } else {
                let column = (x - 2) / 9;
                let row = (y - 2) / 9;
                if (x - 2) % 9 == 8 || (y - 2) % 9 == 8 {
                    image::Rgba([0, 0, 0, 0])
                } else if (x - 2) % 9 < 4 {
                    image::Rgba([(column * 50) as u8, (row * 100) as u8, 255, 255])
                } else {
                    // right half of every tile is transparent
                    image::Rgba([0, 0, 0, 0])
                }
            }
        });
        Atlas::builder(image, uvec2(8, 8))
            .with_spacing(uvec2(1, 1))
            .with_offset(uvec2(2, 2))
            .with_grid(4, 2)
            .build()
            .unwrap()
    }

    #[test]
    fn bind_time_parameters() {
        let atlas = atlas();
        let map = Tilemap::new(10, 5);
        let u = TilemapUniform::new(&map, &atlas);
        assert_eq!(u.offset, vec2(2., 2.));
        assert_eq!(u.tile_size, vec2(8., 8.));
        assert_eq!(u.tile_stride, vec2(9., 9.));
        assert_eq!(u.atlas_size, vec2(37., 19.));
        assert_eq!(u.atlas_columns, 4);
        assert_eq!(u.map_size, vec2(10., 5.));
        assert_eq!(u.world_size(), vec2(80., 40.));
    }

    #[test]
    fn locates_cells_and_atlas_tiles() {
        let u = TilemapUniform::new(&Tilemap::new(10, 5), &atlas());
        assert_eq!(u.cell_at(vec2(0.0, 0.0)), uvec2(0, 0));
        assert_eq!(u.cell_at(vec2(0.15, 0.5)), uvec2(1, 2));
        assert_eq!(u.cell_at(vec2(1.0, 1.0)), uvec2(9, 4));

        assert_eq!(u.atlas_cell(6), uvec2(2, 1));
        assert_eq!(u.atlas_pixel(6, Vec2::ZERO), vec2(2. + 18., 2. + 9.));
        assert_eq!(u.atlas_pixel(6, vec2(0.5, 0.5)), vec2(24., 15.));
    }

    #[test]
    fn shading_follows_the_encoding() {
        let atlas = atlas();
        let mut map = Tilemap::new(2, 1);
        map.set(
            0,
            0,
            Some(
                Tile::new(5)
                    .with_color(TileColor::rgb(255, 0, 255))
                    .with_background(TileColor::GREEN)
                    .with_alpha(0.5),
            ),
        );
        map.flush_if_dirty();
        let u = TilemapUniform::new(&map, &atlas);

        // opaque part of atlas tile 5 (column 1, row 1): rgb (50, 100, 255), tinted magenta
        let fg = u.shade(map.packed(), atlas.image(), vec2(0.1, 0.5));
        assert!((fg.x - 50. / 255.).abs() < 1e-6);
        assert_eq!(fg.y, 0.0);
        assert_eq!(fg.z, 1.0);
        assert!((fg.w - 128. / 255.).abs() < 1e-6);

        // transparent part shows the background
        let bg = u.shade(map.packed(), atlas.image(), vec2(0.4, 0.5));
        assert_eq!(bg.truncate(), vec4(0., 1., 0., 1.).truncate());

        // empty cell renders nothing
        let hole = u.shade(map.packed(), atlas.image(), vec2(0.75, 0.5));
        assert_eq!(hole.w, 0.0);
    }

    #[test]
    fn decodes_cells() {
        let tile = Tile::new(0xABCDEF)
            .with_color(TileColor::RED)
            .with_background(TileColor::BLUE);
        let decoded = decode_cell(crate::packed::encode_tile(Some(&tile)));
        assert_eq!(decoded.id, 0xABCDEF);
        assert_eq!(decoded.alpha, 1.0);
        assert_eq!(decoded.color, TileColor::RED);
        assert_eq!(decoded.background_color, TileColor::BLUE);
    }
}
