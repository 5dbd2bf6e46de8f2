use bevy::{
    math::{uvec2, UVec2},
    prelude::*,
    reflect::{TypePath, TypeUuid},
    utils::HashSet,
};
use std::ops::Index;

use crate::packed::{encode_tile, PackedBuffer, MAX_TILE_ID};
use crate::tile::Tile;

/// Grid of optional [`Tile`]s, plus the packed data the shader reads.
///
/// Writes go to the grid immediately and are additionally remembered as pending.
/// [`Tilemap::flush_if_dirty`] applies all pending cells to the packed buffer at once,
/// so the cost per frame is proportional to the number of distinct cells changed,
/// not to the number of writes or the size of the map.
///
/// When used through [`crate::plugin::TilemapPlugin`], tilemaps live in `Assets<Tilemap>`
/// and are flushed once per frame before rendering. A single tilemap can be shown by
/// multiple [`crate::node::TilemapNode`]s (eg. with different atlases).
#[derive(Debug, Clone, TypeUuid, TypePath)]
#[uuid = "6d1d2e36-0d5f-4bd4-9a43-8a8f3bb3e0a1"]
pub struct Tilemap {
    /// Size of the map, in tiles.
    size: UVec2,

    tiles: Vec<Option<Tile>>,

    packed: PackedBuffer,

    /// Cells written since the last flush.
    pending: HashSet<usize>,

    flush_count: u64,
}

impl Tilemap {
    /// New map of `width` x `height` tiles, every one of them empty.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "tilemap must be at least 1x1 tiles, got {}x{}",
            width,
            height
        );
        let size = uvec2(width, height);
        Self {
            size,
            tiles: vec![None; (width * height) as usize],
            packed: PackedBuffer::new(size),
            pending: HashSet::default(),
            flush_count: 0,
        }
    }

    /// Width of the map, in tiles.
    pub fn width(&self) -> u32 {
        self.size.x
    }

    /// Height of the map, in tiles.
    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    fn cell_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.size.x && y < self.size.y,
            "tile ({}, {}) out of range for {}x{} map",
            x,
            y,
            self.size.x,
            self.size.y
        );
        y as usize * self.size.x as usize + x as usize
    }

    /// Tile at `(x, y)`, `None` for an empty cell.
    pub fn get(&self, x: u32, y: u32) -> Option<Tile> {
        self.tiles[self.cell_index(x, y)]
    }

    /// Set or clear (`None`) the tile at `(x, y)`.
    ///
    /// The packed buffer is not touched until the next [`Tilemap::flush_if_dirty`].
    pub fn set(&mut self, x: u32, y: u32, tile: Option<Tile>) {
        let i = self.cell_index(x, y);
        if let Some(tile) = tile {
            assert!(
                tile.id <= MAX_TILE_ID,
                "tile id {} does not fit into 24 bits",
                tile.id
            );
        }
        self.tiles[i] = tile;
        self.pending.insert(i);
    }

    /// Call `f(x, y)` for every cell and store the result.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(u32, u32) -> Option<Tile>,
    {
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                self.set(x, y, f(x, y));
            }
        }
    }

    /// True iff there are writes not yet reflected in the packed buffer.
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of distinct cells written since the last flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of flushes that actually did something.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    pub fn packed(&self) -> &PackedBuffer {
        &self.packed
    }

    /// Apply all pending writes to the packed buffer.
    ///
    /// Returns the (sorted) indices of the cells that were rewritten,
    /// or `None` when nothing was pending.
    pub fn flush_if_dirty(&mut self) -> Option<Vec<usize>> {
        if self.pending.is_empty() {
            return None;
        }

        let mut cells: Vec<usize> = self.pending.drain().collect();
        cells.sort_unstable();

        for &cell in cells.iter() {
            let texels = encode_tile(self.tiles[cell].as_ref());
            self.packed.write_cell(cell, &texels);
        }
        self.flush_count += 1;
        trace!("flushed {} tilemap cells", cells.len());

        Some(cells)
    }
}

impl Index<UVec2> for Tilemap {
    type Output = Option<Tile>;
    fn index(&self, i: UVec2) -> &Self::Output {
        &self.tiles[self.cell_index(i.x, i.y)]
    }
}
