use log::debug;

use crate::{
    color::ColorRGB,
    palette::{DiffRange, Palette},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    ModifyDocument,
    DoesNotModifyDocument,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Undoer {
    OpenGroup,
    SetPaletteColors {
        range: DiffRange,
        colors: Vec<ColorRGB>,
    },
    CloseGroup,
}

impl Undoer {
    pub fn set_palette_colors(palette: &Palette, range: DiffRange) -> Self {
        let colors = (range.from..=range.to)
            .map(|i| palette.get(i).unwrap_or_default())
            .collect();
        Undoer::SetPaletteColors { range, colors }
    }
}

pub trait UndoHistory {
    fn is_enabled(&self) -> bool;
    fn label(&self) -> Option<&str>;
    fn set_label(&mut self, label: &str);
    fn set_modification(&mut self, modification: Modification);
    fn push_undoer(&mut self, undoer: Undoer);
    // Adds `undoer` to the most recently closed group instead of starting
    // a new one.
    fn graft_undoer_in_last_group(&mut self, undoer: Undoer);
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoGroup {
    pub label: String,
    pub modification: Modification,
    records: Vec<(DiffRange, Vec<ColorRGB>)>,
}

impl UndoGroup {
    fn new(label: &str, modification: Modification) -> Self {
        Self {
            label: label.to_string(),
            modification,
            records: vec![],
        }
    }

    fn add(&mut self, undoer: Undoer) {
        if let Undoer::SetPaletteColors { range, colors } = undoer {
            self.records.push((range, colors));
        }
    }

    pub fn covered_range(&self) -> Option<DiffRange> {
        self.records
            .iter()
            .map(|(range, _)| *range)
            .reduce(|a, b| a.union(&b))
    }

    // Restores the records newest-first and returns the group that redoes
    // what was just undone.
    fn revert(&self, palette: &mut Palette) -> UndoGroup {
        let mut inverse = UndoGroup::new(&self.label, self.modification);
        for (range, colors) in self.records.iter().rev() {
            inverse.add(Undoer::set_palette_colors(palette, *range));
            for (i, &c) in (range.from..=range.to).zip(colors) {
                palette.set(i, c);
            }
        }
        inverse
    }
}

#[derive(Debug)]
pub struct UndoStack {
    label: Option<String>,
    modification: Modification,
    open: Option<UndoGroup>,
    undo_groups: Vec<UndoGroup>,
    redo_groups: Vec<UndoGroup>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self {
            label: None,
            modification: Modification::DoesNotModifyDocument,
            open: None,
            undo_groups: vec![],
            redo_groups: vec![],
        }
    }
}

impl UndoStack {
    pub fn groups(&self) -> &[UndoGroup] {
        &self.undo_groups
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_groups.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_groups.is_empty()
    }

    // True if some undoable step changed the document.
    pub fn is_modified(&self) -> bool {
        self.undo_groups
            .iter()
            .any(|g| g.modification == Modification::ModifyDocument)
    }

    pub fn undo(&mut self, palette: &mut Palette) -> Option<String> {
        let group = self.undo_groups.pop()?;
        debug!("Undo \"{}\" over {:?}", group.label, group.covered_range());
        let redo = group.revert(palette);
        self.label = None;
        self.redo_groups.push(redo);
        Some(group.label)
    }

    pub fn redo(&mut self, palette: &mut Palette) -> Option<String> {
        let group = self.redo_groups.pop()?;
        debug!("Redo \"{}\" over {:?}", group.label, group.covered_range());
        let undo = group.revert(palette);
        self.label = None;
        self.undo_groups.push(undo);
        Some(group.label)
    }
}

impl UndoHistory for UndoStack {
    fn is_enabled(&self) -> bool {
        true
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }

    fn set_modification(&mut self, modification: Modification) {
        self.modification = modification;
    }

    fn push_undoer(&mut self, undoer: Undoer) {
        let label = self.label.clone().unwrap_or_default();
        match undoer {
            Undoer::OpenGroup => {
                self.open = Some(UndoGroup::new(&label, self.modification));
            }
            Undoer::CloseGroup => {
                if let Some(group) = self.open.take() {
                    self.redo_groups.clear();
                    self.undo_groups.push(group);
                }
            }
            undoer @ Undoer::SetPaletteColors { .. } => match &mut self.open {
                Some(group) => group.add(undoer),
                None => {
                    // A record outside any group is a group of its own.
                    let mut group = UndoGroup::new(&label, self.modification);
                    group.add(undoer);
                    self.redo_groups.clear();
                    self.undo_groups.push(group);
                }
            },
        }
    }

    fn graft_undoer_in_last_group(&mut self, undoer: Undoer) {
        match self.undo_groups.last_mut() {
            Some(group) => {
                group.add(undoer);
                self.redo_groups.clear();
            }
            None => {
                self.push_undoer(Undoer::OpenGroup);
                self.push_undoer(undoer);
                self.push_undoer(Undoer::CloseGroup);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_group(stack: &mut UndoStack, label: &str, palette: &Palette, range: DiffRange) {
        stack.set_label(label);
        stack.set_modification(Modification::ModifyDocument);
        stack.push_undoer(Undoer::OpenGroup);
        stack.push_undoer(Undoer::set_palette_colors(palette, range));
        stack.push_undoer(Undoer::CloseGroup);
    }

    #[test]
    fn undo_and_redo_restore_ranges() {
        let original = Palette::from_colors(vec![[1, 1, 1], [2, 2, 2], [3, 3, 3]]);
        let mut palette = original.clone();
        let mut stack = UndoStack::default();

        push_group(&mut stack, "Color Change", &palette, DiffRange::new(1, 2));
        palette.set(1, [9, 9, 9]);
        palette.set(2, [8, 8, 8]);
        let edited = palette.clone();

        assert_eq!(stack.undo(&mut palette), Some("Color Change".to_string()));
        assert_eq!(palette, original);
        assert!(stack.can_redo());
        assert_eq!(stack.redo(&mut palette), Some("Color Change".to_string()));
        assert_eq!(palette, edited);
        assert_eq!(stack.groups()[0].modification, Modification::ModifyDocument);
        assert!(stack.is_modified());
        assert!(!UndoStack::default().is_modified());
    }

    #[test]
    fn grafted_records_undo_together() {
        let original = Palette::from_colors(vec![[0, 0, 0]; 6]);
        let mut palette = original.clone();
        let mut stack = UndoStack::default();

        push_group(&mut stack, "Color Change", &palette, DiffRange::new(1, 1));
        palette.set(1, [5, 5, 5]);
        stack.graft_undoer_in_last_group(Undoer::set_palette_colors(
            &palette,
            DiffRange::new(1, 4),
        ));
        palette.set(1, [6, 6, 6]);
        palette.set(4, [7, 7, 7]);

        assert_eq!(stack.groups().len(), 1);
        assert_eq!(stack.groups()[0].records.len(), 2);
        assert_eq!(
            stack.groups()[0].covered_range(),
            Some(DiffRange::new(1, 4))
        );
        stack.undo(&mut palette);
        assert_eq!(palette, original);
        assert!(!stack.can_undo());
    }

    #[test]
    fn new_group_clears_redo() {
        let mut palette = Palette::new(2);
        let mut stack = UndoStack::default();
        push_group(&mut stack, "A", &palette, DiffRange::new(0, 0));
        palette.set(0, [1, 1, 1]);
        stack.undo(&mut palette);
        push_group(&mut stack, "B", &palette, DiffRange::new(1, 1));
        assert!(!stack.can_redo());
        assert_eq!(stack.label(), Some("B"));
    }
}
