use bevy::{
    math::{uvec2, UVec2},
    prelude::*,
    render::render_resource::TextureFormat,
};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::color::Color;
use crate::tile::Tile;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to load atlas image: {0}")]
    Image(#[from] image::ImageError),

    #[error("atlas image has format {0:?}, expected an 8 bit RGBA format")]
    UnsupportedFormat(TextureFormat),

    #[error("atlas image data does not match its {0}x{1} size")]
    BadImageData(u32, u32),

    #[error("tile size must be non-zero, got {0}")]
    ZeroTileSize(UVec2),

    #[error("atlas grid is empty ({0}x{1} tiles)")]
    EmptyGrid(u32, u32),
}

/// Something that can supply the pixels of an atlas.
pub trait AtlasSource {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError>;
}

impl AtlasSource for RgbaImage {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        Ok(self.clone())
    }
}

impl AtlasSource for DynamicImage {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        Ok(self.to_rgba8())
    }
}

/// Load from an image file.
impl AtlasSource for Path {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        Ok(image::open(self)?.to_rgba8())
    }
}

impl AtlasSource for PathBuf {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        self.as_path().atlas_image()
    }
}

impl AtlasSource for str {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        Path::new(self).atlas_image()
    }
}

impl AtlasSource for Image {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        match self.texture_descriptor.format {
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => {}
            format => return Err(AtlasError::UnsupportedFormat(format)),
        }
        let size = self.texture_descriptor.size;
        RgbaImage::from_raw(size.width, size.height, self.data.clone())
            .ok_or(AtlasError::BadImageData(size.width, size.height))
    }
}

impl<T: AtlasSource + ?Sized> AtlasSource for &T {
    fn atlas_image(&self) -> Result<RgbaImage, AtlasError> {
        (**self).atlas_image()
    }
}

/// Describes how a single image is split into a grid of equally sized tiles.
///
/// Cloning is cheap, the image is shared.
#[derive(Debug, Clone)]
pub struct Atlas {
    image: Arc<RgbaImage>,

    /// Size of each tile, in pixels.
    tile_size: UVec2,

    /// Pixels between neighbouring tiles.
    tile_spacing: UVec2,

    /// Position of the first tile's top left corner, in pixels.
    offset: UVec2,

    /// Number of tiles (columns, rows).
    size: UVec2,
}

impl Atlas {
    pub fn builder<S: AtlasSource>(source: S, tile_size: UVec2) -> AtlasBuilder<S> {
        AtlasBuilder::new(source, tile_size)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Size of the atlas image, in pixels.
    pub fn pixel_size(&self) -> UVec2 {
        uvec2(self.image.width(), self.image.height())
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn tile_spacing(&self) -> UVec2 {
        self.tile_spacing
    }

    /// Distance between the origins of two neighbouring tiles, in pixels.
    pub fn tile_stride(&self) -> UVec2 {
        self.tile_size + self.tile_spacing
    }

    pub fn offset(&self) -> UVec2 {
        self.offset
    }

    /// Number of tile columns.
    pub fn width(&self) -> u32 {
        self.size.x
    }

    /// Number of tile rows.
    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// Id of the tile in `column`, `row`.
    /// Tiles are numbered row-major, which is also what the shader assumes.
    pub fn tile_id(&self, column: i32, row: i32) -> u32 {
        assert!(
            column >= 0 && row >= 0,
            "negative atlas index ({}, {})",
            column,
            row
        );
        let (column, row) = (column as u32, row as u32);
        assert!(
            column < self.size.x && row < self.size.y,
            "atlas index ({}, {}) out of range for {}x{} atlas",
            column,
            row,
            self.size.x,
            self.size.y
        );
        column + row * self.size.x
    }

    /// Default styled tile for `column`, `row`.
    pub fn tile(&self, column: i32, row: i32) -> Tile {
        Tile::new(self.tile_id(column, row))
    }
}

/// Replace every pixel that equals `key` (all four channels) by a fully transparent one.
/// Returns the number of replaced pixels.
pub fn apply_chroma_key(image: &mut RgbaImage, key: Color) -> usize {
    let key = image::Rgba::from(key);
    let clear = image::Rgba::from(Color::CLEAR);
    let mut replaced = 0;
    for pixel in image.pixels_mut() {
        if *pixel == key {
            *pixel = clear;
            replaced += 1;
        }
    }
    replaced
}

pub struct AtlasBuilder<S> {
    source: S,
    tile_size: UVec2,
    tile_spacing: UVec2,
    offset: UVec2,
    size: Option<UVec2>,
    transparent: Option<Color>,
}

impl<S: AtlasSource> AtlasBuilder<S> {
    pub fn new(source: S, tile_size: UVec2) -> Self {
        Self {
            source,
            tile_size,
            tile_spacing: UVec2::ZERO,
            offset: UVec2::ZERO,
            size: None,
            transparent: None,
        }
    }

    pub fn with_spacing(mut self, tile_spacing: UVec2) -> Self {
        self.tile_spacing = tile_spacing;
        self
    }

    pub fn with_offset(mut self, offset: UVec2) -> Self {
        self.offset = offset;
        self
    }

    /// Use `width` x `height` tiles instead of deriving the grid from the image size.
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.size = Some(uvec2(width, height));
        self
    }

    /// Make every pixel of exactly `color` transparent when loading.
    pub fn with_transparent(mut self, color: Color) -> Self {
        self.transparent = Some(color);
        self
    }

    pub fn build(self) -> Result<Atlas, AtlasError> {
        if self.tile_size.x == 0 || self.tile_size.y == 0 {
            return Err(AtlasError::ZeroTileSize(self.tile_size));
        }

        let mut image = self.source.atlas_image()?;
        if let Some(key) = self.transparent {
            let replaced = apply_chroma_key(&mut image, key);
            debug!("atlas chroma key {:?} replaced {} pixels", key, replaced);
        }

        let size = self.size.unwrap_or_else(|| {
            let stride = self.tile_size + self.tile_spacing;
            (uvec2(image.width(), image.height()) + self.tile_spacing) / stride
        });
        if size.x == 0 || size.y == 0 {
            return Err(AtlasError::EmptyGrid(size.x, size.y));
        }

        Ok(Atlas {
            image: Arc::new(image),
            tile_size: self.tile_size,
            tile_spacing: self.tile_spacing,
            offset: self.offset,
            size,
        })
    }
}
