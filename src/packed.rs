//! Per-cell encoding consumed by the tilemap shader.
//!
//! Every cell occupies three RGBA8 texels. For a map `width` cells wide the
//! data texture is `3 * width` texels wide and one texel row per map row;
//! band `k` of cell `(x, y)` lives at texel column `k * width + x` of row `y`.

use bevy::math::UVec2;

use crate::color::unit_to_byte;
use crate::tile::Tile;

/// Largest id that fits the 24 bits reserved for it in the packed encoding.
pub const MAX_TILE_ID: u32 = 0x00FF_FFFF;

pub const BYTES_PER_TEXEL: usize = 4;
pub const TEXELS_PER_CELL: usize = 3;

/// One RGBA8 texel.
pub type Texel = [u8; BYTES_PER_TEXEL];

/// The three texel bands every cell is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelBand {
    /// (alpha, id >> 16, id >> 8, id)
    Ident = 0,
    /// Foreground tint RGBA
    Foreground = 1,
    /// Background tint RGBA
    Background = 2,
}

impl TexelBand {
    pub const ALL: [TexelBand; TEXELS_PER_CELL] =
        [TexelBand::Ident, TexelBand::Foreground, TexelBand::Background];
}

/// Encode a tile into its three texels. `None` (an empty cell) is encoded as [`Tile::HOLE`].
///
/// Ids are truncated to their low 24 bits here, callers that care
/// (e.g. [`crate::tilemap::Tilemap::set`]) check against [`MAX_TILE_ID`] first.
pub fn encode_tile(tile: Option<&Tile>) -> [Texel; TEXELS_PER_CELL] {
    let tile = tile.unwrap_or(&Tile::HOLE);
    let alpha = if tile.hidden {
        0
    } else {
        unit_to_byte(tile.alpha)
    };
    let [_, id2, id1, id0] = tile.id.to_be_bytes();

    [
        [alpha, id2, id1, id0],
        tile.color.to_bytes(),
        tile.background_color.to_bytes(),
    ]
}

/// Inverse of the first band of [`encode_tile`]: `(alpha, id)`.
pub fn decode_ident(texel: Texel) -> (u8, u32) {
    let [alpha, id2, id1, id0] = texel;
    (alpha, u32::from_be_bytes([0, id2, id1, id0]))
}

/// CPU side copy of the data texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    /// Size of the map, in cells.
    map_size: UVec2,
    data: Vec<u8>,
}

impl PackedBuffer {
    /// Buffer for a map of `map_size` cells, every cell holding the encoding of an empty cell.
    pub fn new(map_size: UVec2) -> Self {
        let n_cells = (map_size.x * map_size.y) as usize;
        let mut buffer = Self {
            map_size,
            data: vec![0u8; n_cells * TEXELS_PER_CELL * BYTES_PER_TEXEL],
        };
        let hole = encode_tile(None);
        for cell in 0..n_cells {
            buffer.write_cell(cell, &hole);
        }
        buffer
    }

    /// Size of the texture, in texels.
    pub fn texture_size(&self) -> UVec2 {
        UVec2::new(self.map_size.x * TEXELS_PER_CELL as u32, self.map_size.y)
    }

    pub fn map_size(&self) -> UVec2 {
        self.map_size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Index (in texels) of `band` of the cell with row-major index `cell`.
    pub fn texel_index(&self, cell: usize, band: TexelBand) -> usize {
        let width = self.map_size.x as usize;
        let (x, y) = (cell % width, cell / width);
        y * width * TEXELS_PER_CELL + band as usize * width + x
    }

    pub fn texel(&self, cell: usize, band: TexelBand) -> Texel {
        let i = self.texel_index(cell, band) * BYTES_PER_TEXEL;
        let mut texel = Texel::default();
        texel.copy_from_slice(&self.data[i..i + BYTES_PER_TEXEL]);
        texel
    }

    /// All three texels of a cell, in band order.
    pub fn cell_texels(&self, cell: usize) -> [Texel; TEXELS_PER_CELL] {
        TexelBand::ALL.map(|band| self.texel(cell, band))
    }

    pub(crate) fn write_cell(&mut self, cell: usize, texels: &[Texel; TEXELS_PER_CELL]) {
        for (band, texel) in TexelBand::ALL.iter().zip(texels.iter()) {
            let i = self.texel_index(cell, *band) * BYTES_PER_TEXEL;
            self.data[i..i + BYTES_PER_TEXEL].copy_from_slice(texel);
        }
    }

    /// Copy the texels of `cells` into `dst`, which must be laid out like this buffer
    /// (e.g. the pixel data of the GPU side data texture).
    pub fn copy_cells_into(&self, cells: &[usize], dst: &mut [u8]) {
        assert_eq!(dst.len(), self.data.len(), "data texture size mismatch");
        for &cell in cells {
            for band in TexelBand::ALL {
                let i = self.texel_index(cell, band) * BYTES_PER_TEXEL;
                dst[i..i + BYTES_PER_TEXEL].copy_from_slice(&self.data[i..i + BYTES_PER_TEXEL]);
            }
        }
    }
}
