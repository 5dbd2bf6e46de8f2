/// RGBA color with 8 bits per channel.
///
/// This is the representation used in the packed tile data, so every value
/// here can be written to the GPU without further conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Hue (degrees, `[0, 360)`), saturation and value (both `[0, 1]`).
///
/// A hue of `-1.0` means the hue is undefined (achromatic color).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const UNDEFINED_HUE: f32 = -1.0;

    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

/// Convert a normalized float into a channel byte.
pub(crate) fn unit_to_byte(x: f32) -> u8 {
    num::clamp((x * 255.0).round(), 0.0, 255.0) as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Color from normalized (0-1) red/green/blue and alpha.
    pub fn from_rgb_f32(rgb: [f32; 3], alpha: f32) -> Self {
        let [r, g, b] = rgb;
        Self::new(
            unit_to_byte(r),
            unit_to_byte(g),
            unit_to_byte(b),
            unit_to_byte(alpha),
        )
    }

    /// Normalized (0-1) red/green/blue.
    pub fn rgb_f32(&self) -> [f32; 3] {
        [
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
        ]
    }

    pub fn alpha_f32(&self) -> f32 {
        self.alpha as f32 / 255.0
    }

    pub fn from_hsv(hsv: Hsv, alpha: f32) -> Self {
        Self::from_hue(hsv.hue, hsv.saturation, hsv.value, alpha)
    }

    pub fn from_hue(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        if saturation == 0.0 {
            return Self::from_rgb_f32([brightness; 3], alpha);
        }

        // rem_euclid rounds up to exactly 360.0 for tiny negative hues
        let hue = hue.rem_euclid(360.0);
        let h = if hue >= 360.0 { 0.0 } else { hue / 60.0 };
        let s = saturation;
        let v = brightness;

        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let rgb = match i as u32 {
            0 => [v, t, p],
            1 => [q, v, p],
            2 => [p, v, t],
            3 => [p, q, v],
            4 => [t, p, v],
            _ => [v, p, q],
        };
        Self::from_rgb_f32(rgb, alpha)
    }

    pub fn hsv(&self) -> Hsv {
        let [r, g, b] = self.rgb_f32();

        let maximum = r.max(g).max(b);
        let minimum = r.min(g).min(b);
        let delta = maximum - minimum;

        if maximum == 0.0 {
            return Hsv::new(Hsv::UNDEFINED_HUE, 0.0, maximum);
        }

        let s = delta / maximum;
        if delta == 0.0 {
            // gray
            return Hsv::new(Hsv::UNDEFINED_HUE, s, maximum);
        }

        let mut h = if r == maximum {
            (g - b) / delta
        } else if g == maximum {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };

        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }

        Hsv::new(h, s, maximum)
    }

    /// Copy of this color with alpha replaced by the normalized `alpha`.
    pub fn scaled_alpha(&self, alpha: f32) -> Self {
        Self {
            alpha: unit_to_byte(alpha),
            ..*self
        }
    }

    pub fn scale_alpha(&mut self, alpha: f32) {
        *self = self.scaled_alpha(alpha);
    }

    /// Copy of this color with the hue rotated by `hue` degrees.
    pub fn shifted_hue(&self, hue: f32) -> Self {
        let hsv = self.hsv();
        Self::from_hue(hsv.hue + hue, hsv.saturation, hsv.value, self.alpha_f32())
    }

    pub fn shift_hue(&mut self, hue: f32) {
        *self = self.shifted_hue(hue);
    }

    /// Copy of this color with saturation and brightness multiplied.
    pub fn scaled(&self, saturation: f32, brightness: f32) -> Self {
        let hsv = self.hsv();
        Self::from_hue(
            hsv.hue,
            hsv.saturation * saturation,
            hsv.value * brightness,
            self.alpha_f32(),
        )
    }

    pub fn scale(&mut self, saturation: f32, brightness: f32) {
        *self = self.scaled(saturation, brightness);
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl From<[u8; 4]> for Color {
    fn from([red, green, blue, alpha]: [u8; 4]) -> Self {
        Self::new(red, green, blue, alpha)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_bytes()
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        pixel.0.into()
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_bytes())
    }
}

impl From<Color> for bevy::prelude::Color {
    fn from(color: Color) -> Self {
        bevy::prelude::Color::rgba_u8(color.red, color.green, color.blue, color.alpha)
    }
}

impl Color {
    pub const CLEAR: Color = Color::new(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const DARK_RED: Color = Color::rgb(191, 0, 0);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 191);
    pub const LIGHT_GRAY: Color = Color::rgb(159, 159, 159);
    pub const DARK_GRAY: Color = Color::rgb(95, 95, 95);
    pub const DARKER_GRAY: Color = Color::rgb(63, 63, 63);
    pub const DARKEST_GRAY: Color = Color::rgb(31, 31, 31);
    pub const LIGHT_VIOLET: Color = Color::rgb(185, 115, 255);
    pub const DESATURATED_GREEN: Color = Color::rgb(64, 128, 64);
    pub const DARKER_GREEN: Color = Color::rgb(0, 128, 0);
    pub const DARK_ORANGE: Color = Color::rgb(191, 95, 0);
    pub const VIOLET: Color = Color::rgb(127, 0, 255);
    pub const SKY: Color = Color::rgb(0, 191, 255);
    pub const LIGHT_GREEN: Color = Color::rgb(115, 255, 115);
    pub const LIGHT_YELLOW: Color = Color::rgb(255, 255, 115);
    pub const LIGHTEST_YELLOW: Color = Color::rgb(255, 255, 191);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const DARK_YELLOW: Color = Color::rgb(191, 191, 0);
    pub const CRIMSON: Color = Color::rgb(255, 0, 63);
    pub const PINK: Color = Color::rgb(255, 0, 127);
    pub const FLAME: Color = Color::rgb(255, 63, 0);
    pub const DARK_FLAME: Color = Color::rgb(191, 47, 0);
    pub const ORANGE: Color = Color::rgb(255, 127, 0);
}
