//! Tilemaps for bevy, rendered from a per-tile data texture.
//!
//! Instead of one sprite (or one quad) per tile, every map is a single quad and a shader
//! looks up what to draw for each pixel in a small data texture that encodes the state
//! of every tile.
//!
//! ## Features
//!
//! - Maps with hundreds of thousands of tiles, cheap to change every frame:
//!   writes are coalesced and only the cells that changed since the last frame are re-encoded.
//! - Per tile foreground and background tint, opacity and visibility.
//! - Atlases with spacing, offset and chroma key transparency.
//!
//! ## How it works
//!
//! A [`Tilemap`] keeps the logical grid of tiles and a packed copy of it, three RGBA8 texels
//! per cell (see [`packed`]). Writing a tile only records the cell as pending; once per frame
//! [`node::flush_tilemaps`] encodes all pending cells and copies them into the data texture
//! of every [`node::TilemapNode`] showing that map.

pub mod atlas;
pub mod bundle;
pub mod color;
pub mod material;
pub mod node;
pub mod packed;
pub mod plugin;
pub mod shader;
pub mod tile;
pub mod tilemap;
pub mod uniform;

pub mod prelude {
    pub use crate::atlas::{Atlas, AtlasBuilder, AtlasError, AtlasSource};
    pub use crate::bundle::TilemapNodeBundle;
    pub use crate::color::{Color as TileColor, Hsv};
    pub use crate::material::TilemapMaterial;
    pub use crate::node::{TilemapNode, TilemapNodeBuilder};
    pub use crate::plugin::{TilemapPlugin, TilemapSet};
    pub use crate::tile::Tile;
    pub use crate::tilemap::Tilemap;
}

pub use crate::atlas::{Atlas, AtlasBuilder, AtlasError, AtlasSource};
pub use crate::bundle::TilemapNodeBundle;
pub use crate::color::{Color, Hsv};
pub use crate::material::TilemapMaterial;
pub use crate::node::{TilemapNode, TilemapNodeBuilder};
pub use crate::plugin::{TilemapPlugin, TilemapSet};
pub use crate::tile::Tile;
pub use crate::tilemap::Tilemap;
