// Internal clipboard to copy colors between palettes (or between two
// places of the same palette).
use crate::{color::ColorRGB, mutate::Outcome, palette::Palette, selection::Selection};

#[derive(Debug, Clone, Default)]
pub struct ColorClipboard {
    colors: Vec<ColorRGB>,
}

impl ColorClipboard {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn copy_from(&mut self, palette: &Palette, selection: &Selection) {
        self.colors = selection
            .iter_selected()
            .filter_map(|idx| palette.get(idx))
            .collect();
    }

    // Once every selected entry has a color, the rest go to the entries that
    // follow, selected or not.
    pub fn paste_into(&self, palette: &mut Palette, selection: &Selection) -> Outcome {
        // With nothing selected every index overflows, so pasting starts at 0.
        let selected = selection.count();
        if self.colors.is_empty() {
            return Outcome::NoOp;
        }
        let mut next = self.colors.iter();
        let mut used = 0;
        for idx in 0..palette.len() {
            if used == self.colors.len() {
                break;
            }
            if selection.is_selected(idx) || used >= selected {
                if let Some(&color) = next.next() {
                    palette.set(idx, color);
                    used += 1;
                }
            }
        }
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(size: usize) -> Palette {
        Palette::from_colors((0..size).map(|i| [i as u8, 0, 0]).collect())
    }

    #[test]
    fn copy_takes_selected_in_order() {
        let p = numbered(8);
        let mut clip = ColorClipboard::default();
        clip.copy_from(&p, &Selection::from_indices(8, [6, 1, 3]));
        assert_eq!(clip.colors, &[[1, 0, 0], [3, 0, 0], [6, 0, 0]]);
    }

    #[test]
    fn paste_fewer_colors_than_selection() {
        let mut clip = ColorClipboard::default();
        clip.copy_from(&numbered(16), &Selection::from_indices(16, [10, 11]));

        let mut p = Palette::new(16);
        let sel = Selection::from_indices(16, 2..7);
        assert_eq!(clip.paste_into(&mut p, &sel), Outcome::Applied);
        assert_eq!(p.get(2), Some([10, 0, 0]));
        assert_eq!(p.get(3), Some([11, 0, 0]));
        for i in (0..16).filter(|&i| i != 2 && i != 3) {
            assert_eq!(p.get(i), Some([0, 0, 0]));
        }
    }

    #[test]
    fn paste_overflows_past_selection() {
        let mut clip = ColorClipboard::default();
        clip.copy_from(&numbered(16), &Selection::from_indices(16, 10..15));

        let mut p = Palette::new(16);
        let sel = Selection::from_indices(16, [3, 4]);
        clip.paste_into(&mut p, &sel);
        let expected: Vec<_> = (0..16)
            .map(|i| match i {
                3..=7 => [i as u8 + 7, 0, 0],
                _ => [0, 0, 0],
            })
            .collect();
        assert_eq!(p.colors(), expected.as_slice());
    }

    #[test]
    fn paste_stops_at_palette_end() {
        let mut clip = ColorClipboard::default();
        clip.copy_from(&numbered(8), &Selection::from_indices(8, 0..8));
        let mut p = Palette::new(8);
        clip.paste_into(&mut p, &Selection::from_indices(8, [6]));
        assert_eq!(p.get(6), Some([0, 0, 0]));
        assert_eq!(p.get(7), Some([1, 0, 0]));
    }

    #[test]
    fn paste_is_not_consuming() {
        let mut clip = ColorClipboard::default();
        clip.copy_from(&numbered(4), &Selection::from_indices(4, [2]));
        let mut p = Palette::new(4);
        clip.paste_into(&mut p, &Selection::from_indices(4, [0]));
        clip.paste_into(&mut p, &Selection::from_indices(4, [1]));
        assert_eq!(clip.len(), 1);
        assert_eq!(&p.colors()[..2], &[[2, 0, 0], [2, 0, 0]]);
    }

    #[test]
    fn paste_without_selection_starts_at_zero() {
        let mut clip = ColorClipboard::default();
        clip.copy_from(&numbered(8), &Selection::from_indices(8, [5, 6]));
        let mut p = Palette::new(8);
        assert_eq!(clip.paste_into(&mut p, &Selection::none(8)), Outcome::Applied);
        assert_eq!(&p.colors()[..3], &[[5, 0, 0], [6, 0, 0], [0, 0, 0]]);

        let empty = ColorClipboard::default();
        assert_eq!(empty.paste_into(&mut p, &Selection::none(8)), Outcome::NoOp);
    }
}
