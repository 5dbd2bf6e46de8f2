use bevy::math::uvec2;
use bevy_data_tilemap::prelude::*;
use image::RgbaImage;

/// 8x8 tiles of 16x16 pixels, each a ring of different thickness,
/// drawn on magenta which is keyed out.
pub fn ring_atlas() -> Atlas {
    let key = TileColor::rgb(255, 0, 255);
    let image = RgbaImage::from_fn(8 * 16, 8 * 16, |x, y| {
        let id = x / 16 + 8 * (y / 16);
        let (dx, dy) = ((x % 16) as i32 - 8, (y % 16) as i32 - 8);
        let r2 = dx * dx + dy * dy;
        let outer = 8 * 8;
        let inner = (id as i32 % 8) * (id as i32 % 8);
        if r2 < outer && r2 >= inner {
            image::Rgba([255, 255, 255, 255])
        } else {
            key.into()
        }
    });

    Atlas::builder(image, uvec2(16, 16))
        .with_transparent(key)
        .build()
        .expect("generated atlas is valid")
}
