use crate::color::Color;

/// Everything needed to render one cell of a [`crate::tilemap::Tilemap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Index of the tile within the atlas (row-major, see [`crate::atlas::Atlas::tile_id`]).
    pub id: u32,

    /// Tint applied to the opaque parts of the atlas tile.
    pub color: Color,

    /// Tint applied to the transparent parts of the atlas tile.
    pub background_color: Color,

    /// Opacity (0-1) of the whole tile, independent of the tint colors.
    pub alpha: f32,

    pub hidden: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Tile {
    /// What an empty cell is encoded as. Renders nothing.
    pub const HOLE: Tile = Tile {
        id: 0,
        color: Color::WHITE,
        background_color: Color::CLEAR,
        alpha: 0.0,
        hidden: false,
    };

    pub const fn new(id: u32) -> Self {
        Self {
            id,
            color: Color::WHITE,
            background_color: Color::CLEAR,
            alpha: 1.0,
            hidden: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background_color: Color) -> Self {
        self.background_color = background_color;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}
