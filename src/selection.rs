// Selection mask over palette entries, as kept by the palette view.
use std::fmt::Display;

use crate::color::ColorIdx;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    mask: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    NoEntry,
    Entry(ColorIdx),
    Range(ColorIdx, ColorIdx),
    Multiple,
}

impl Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionSummary::NoEntry => write!(f, "No Entry"),
            SelectionSummary::Entry(i) => write!(f, "Entry: {}", i),
            SelectionSummary::Range(i, j) => write!(f, "Range: {}-{}", i, j),
            SelectionSummary::Multiple => write!(f, "Multiple Entries"),
        }
    }
}

impl Selection {
    pub fn none(len: usize) -> Self {
        Self {
            mask: vec![false; len],
        }
    }

    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = ColorIdx>) -> Self {
        let mut sel = Self::none(len);
        for i in indices {
            if i < len {
                sel.mask[i] = true;
            }
        }
        sel
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_selected(&self, idx: ColorIdx) -> bool {
        self.mask.get(idx).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&s| s).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.contains(&true)
    }

    pub fn iter_selected(&self) -> impl Iterator<Item = ColorIdx> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
    }

    pub fn selected_range(&self) -> Option<(ColorIdx, ColorIdx)> {
        let first = self.mask.iter().position(|&s| s)?;
        let last = self.mask.iter().rposition(|&s| s)?;
        Some((first, last))
    }

    // The entry the editor shows: the first selected one.
    pub fn selected_entry(&self) -> Option<ColorIdx> {
        self.mask.iter().position(|&s| s)
    }

    pub fn summary(&self) -> SelectionSummary {
        let Some((first, last)) = self.selected_range() else {
            return SelectionSummary::NoEntry;
        };
        if first == last {
            SelectionSummary::Entry(first)
        } else if self.mask[first..=last].iter().all(|&s| s) {
            SelectionSummary::Range(first, last)
        } else {
            SelectionSummary::Multiple
        }
    }

    pub fn select_single(&mut self, idx: ColorIdx) {
        self.mask.iter_mut().for_each(|s| *s = false);
        if let Some(s) = self.mask.get_mut(idx) {
            *s = true;
        }
    }

    pub fn select_span(&mut self, anchor: ColorIdx, idx: ColorIdx) {
        let (a, b) = if anchor <= idx {
            (anchor, idx)
        } else {
            (idx, anchor)
        };
        self.mask.iter_mut().for_each(|s| *s = false);
        for s in self.mask.iter_mut().take(b + 1).skip(a) {
            *s = true;
        }
    }

    pub fn toggle(&mut self, idx: ColorIdx) {
        if let Some(s) = self.mask.get_mut(idx) {
            *s = !*s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries() {
        assert_eq!(Selection::none(8).summary(), SelectionSummary::NoEntry);
        assert_eq!(
            Selection::from_indices(8, [3]).summary(),
            SelectionSummary::Entry(3)
        );
        assert_eq!(
            Selection::from_indices(8, 2..=5).summary(),
            SelectionSummary::Range(2, 5)
        );
        assert_eq!(
            Selection::from_indices(8, [1, 4]).summary(),
            SelectionSummary::Multiple
        );
        assert_eq!(SelectionSummary::Range(2, 5).to_string(), "Range: 2-5");
    }

    #[test]
    fn range_and_entry() {
        let sel = Selection::from_indices(16, [4, 9, 11]);
        assert_eq!(sel.selected_range(), Some((4, 11)));
        assert_eq!(sel.selected_entry(), Some(4));
        assert_eq!(sel.count(), 3);
        assert_eq!(sel.iter_selected().collect::<Vec<_>>(), vec![4, 9, 11]);
        assert_eq!(Selection::none(4).selected_range(), None);
    }

    #[test]
    fn click_gestures() {
        let mut sel = Selection::none(10);
        sel.select_single(2);
        sel.select_span(2, 5);
        assert_eq!(sel.summary(), SelectionSummary::Range(2, 5));
        sel.toggle(3);
        assert_eq!(sel.summary(), SelectionSummary::Multiple);
        sel.select_single(7);
        assert_eq!(sel.iter_selected().collect::<Vec<_>>(), vec![7]);
    }
}
