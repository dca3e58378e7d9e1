// Color models used by the palette editor: packed RGB entries, HSV, and the
// tagged `Color` value produced by sliders, the hex field and the color bar.
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

pub type ColorValue = u8; // Color value (0-255)
pub type ColorIdx = usize; // Index into the palette (0..N)
pub type ColorRGB = [ColorValue; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorType {
    Rgb,
    Hsv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
    pub const HSV: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
            Channel::Hue => "H",
            Channel::Saturation => "S",
            Channel::Value => "V",
        }
    }

    pub fn max(self) -> f64 {
        match self {
            Channel::Red | Channel::Green | Channel::Blue => 255.0,
            Channel::Hue => 360.0,
            Channel::Saturation | Channel::Value => 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    pub fn from_rgb(rgb: ColorRGB) -> Self {
        let r = rgb[0] as f64 / 255.0;
        let g = rgb[1] as f64 / 255.0;
        let b = rgb[2] as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        Self {
            hue,
            saturation,
            value: max,
        }
    }

    pub fn to_rgb(&self) -> ColorRGB {
        let hue = self.hue.rem_euclid(360.0) / 60.0;
        let chroma = self.value * self.saturation;
        let x = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
        let m = self.value - chroma;

        let (r, g, b) = match hue as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        [to_component(r + m), to_component(g + m), to_component(b + m)]
    }
}

// Float-to-int casts saturate, so out-of-range inputs land on 0 or 255.
fn to_component(x: f64) -> ColorValue {
    (x * 255.0).round() as ColorValue
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(ColorRGB),
    // Hue in degrees, saturation and value as percentages (0-100).
    Hsv {
        hue: f64,
        saturation: f64,
        value: f64,
    },
    Index(ColorIdx),
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgb([0, 0, 0])
    }
}

impl Color {
    pub fn is_valid(&self) -> bool {
        match *self {
            Color::Rgb(_) | Color::Index(_) => true,
            Color::Hsv {
                hue,
                saturation,
                value,
            } => {
                (0.0..=360.0).contains(&hue)
                    && (0.0..=100.0).contains(&saturation)
                    && (0.0..=100.0).contains(&value)
            }
        }
    }

    pub fn to_rgb(&self, palette: &Palette) -> Option<ColorRGB> {
        match *self {
            Color::Rgb(rgb) => Some(rgb),
            Color::Hsv { .. } => self.to_hsv(palette).map(|hsv| hsv.to_rgb()),
            Color::Index(idx) => palette.get(idx),
        }
    }

    pub fn to_hsv(&self, palette: &Palette) -> Option<Hsv> {
        match *self {
            Color::Hsv {
                hue,
                saturation,
                value,
            } => Some(Hsv::new(hue, saturation / 100.0, value / 100.0)),
            Color::Rgb(rgb) => Some(Hsv::from_rgb(rgb)),
            Color::Index(idx) => palette.get(idx).map(Hsv::from_rgb),
        }
    }

    pub fn channel(&self, channel: Channel, palette: &Palette) -> f64 {
        match channel {
            Channel::Red | Channel::Green | Channel::Blue => {
                let rgb = self.to_rgb(palette).unwrap_or_default();
                rgb[rgb_component(channel)] as f64
            }
            Channel::Hue => self.to_hsv(palette).unwrap_or_default().hue,
            Channel::Saturation => self.to_hsv(palette).unwrap_or_default().saturation * 100.0,
            Channel::Value => self.to_hsv(palette).unwrap_or_default().value * 100.0,
        }
    }

    pub fn with_channel(&self, channel: Channel, value: f64, palette: &Palette) -> Color {
        match channel {
            Channel::Red | Channel::Green | Channel::Blue => {
                let mut rgb = self.to_rgb(palette).unwrap_or_default();
                rgb[rgb_component(channel)] = value.clamp(0.0, 255.0).round() as ColorValue;
                Color::Rgb(rgb)
            }
            Channel::Hue | Channel::Saturation | Channel::Value => {
                let (mut hue, mut saturation, mut val) = match *self {
                    Color::Hsv {
                        hue,
                        saturation,
                        value,
                    } => (hue, saturation, value),
                    _ => {
                        let hsv = self.to_hsv(palette).unwrap_or_default();
                        (hsv.hue, hsv.saturation * 100.0, hsv.value * 100.0)
                    }
                };
                let value = value.clamp(0.0, channel.max());
                match channel {
                    Channel::Hue => hue = value,
                    Channel::Saturation => saturation = value,
                    _ => val = value,
                }
                Color::Hsv {
                    hue,
                    saturation,
                    value: val,
                }
            }
        }
    }

    pub fn to_hex(&self, palette: &Palette) -> String {
        let [r, g, b] = self.to_rgb(palette).unwrap_or_default();
        format!("{:02X}{:02X}{:02X}", r, g, b)
    }

    pub fn from_hex(text: &str) -> Option<Color> {
        let text = text.trim();
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Color::Rgb([
            (value >> 16) as ColorValue,
            (value >> 8) as ColorValue,
            value as ColorValue,
        ]))
    }
}

pub fn rgb_component(channel: Channel) -> usize {
    match channel {
        Channel::Green => 1,
        Channel::Blue => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hsv_round_trip() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(51) {
                    let rgb = [r as u8, g as u8, b as u8];
                    assert_eq!(Hsv::from_rgb(rgb).to_rgb(), rgb, "round trip of {rgb:?}");
                }
            }
        }
    }

    #[test]
    fn primary_hues() {
        assert_eq!(Hsv::from_rgb([255, 0, 0]).hue, 0.0);
        assert_eq!(Hsv::from_rgb([0, 255, 0]).hue, 120.0);
        assert_eq!(Hsv::from_rgb([0, 0, 255]).hue, 240.0);
        assert_eq!(Hsv::new(360.0, 1.0, 1.0).to_rgb(), [255, 0, 0]);
        assert_eq!(Hsv::new(60.0, 1.0, 1.0).to_rgb(), [255, 255, 0]);
    }

    #[test]
    fn gray_has_no_saturation() {
        let hsv = Hsv::from_rgb([128, 128, 128]);
        assert_eq!(hsv.saturation, 0.0);
        assert_eq!(hsv.hue, 0.0);
        assert_eq!(hsv.to_rgb(), [128, 128, 128]);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#FF8000"), Some(Color::Rgb([255, 128, 0])));
        assert_eq!(Color::from_hex("0a0b0c"), Some(Color::Rgb([10, 11, 12])));
        assert_eq!(Color::from_hex("12345"), None);
        assert_eq!(Color::from_hex("GG0000"), None);
        let palette = Palette::new(4);
        assert_eq!(Color::Rgb([1, 2, 255]).to_hex(&palette), "0102FF");
    }

    #[test]
    fn index_colors_resolve_through_palette() {
        let mut palette = Palette::new(4);
        palette.set(2, [10, 20, 30]);
        assert_eq!(Color::Index(2).to_rgb(&palette), Some([10, 20, 30]));
        assert_eq!(Color::Index(9).to_rgb(&palette), None);
    }

    #[test]
    fn slider_channels() {
        let palette = Palette::new(1);
        let color = Color::Rgb([10, 20, 30]);
        assert_eq!(
            color.with_channel(Channel::Blue, 200.0, &palette),
            Color::Rgb([10, 20, 200])
        );
        let hsv = Color::Rgb([255, 0, 0]).with_channel(Channel::Value, 50.0, &palette);
        assert_eq!(
            hsv,
            Color::Hsv {
                hue: 0.0,
                saturation: 100.0,
                value: 50.0
            }
        );
        assert_eq!(hsv.channel(Channel::Saturation, &palette), 100.0);
    }

    #[test]
    fn validity() {
        assert!(Color::Index(3).is_valid());
        assert!(!Color::Hsv {
            hue: 400.0,
            saturation: 0.0,
            value: 0.0
        }
        .is_valid());
    }
}
