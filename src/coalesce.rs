// Decides how palette edits become undo groups and when the rest of the
// application hears about them.
//
// Every edit arms a repeating timer. The first tick after an edit redraws
// only the sprite editor; the next one commits: grafting stops, the timer
// stops, and the palette-changed notification goes out. Edits with the same
// label that arrive before the commit are grafted into one undo group.
use std::{cell::Cell, rc::Rc, time::Duration};

use log::debug;

use crate::{
    notify::{Notifier, PaletteChanged},
    palette::{DiffRange, Palette},
    undo::{Modification, UndoHistory, Undoer},
};

pub const REDRAW_PERIOD: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    None,
    RedrawEditor,
    RedrawAll,
}

#[derive(Debug, Default)]
pub struct Coalescer {
    timer_armed: bool,
    redraw_all: bool,
    graft_change: bool,
    // Shared with the editor's own palette-changed subscriber.
    self_change: Rc<Cell<bool>>,
}

impl Coalescer {
    pub fn state(&self) -> SchedulerState {
        if self.timer_armed {
            SchedulerState::Pending
        } else {
            SchedulerState::Idle
        }
    }

    pub fn self_change_flag(&self) -> Rc<Cell<bool>> {
        self.self_change.clone()
    }

    pub fn record(
        &self,
        history: &mut dyn UndoHistory,
        sprite_palette: &mut Palette,
        new_palette: &Palette,
        label: &str,
    ) -> Option<DiffRange> {
        let range = sprite_palette.diff_range(new_palette)?;

        if history.is_enabled() {
            let undoer = Undoer::set_palette_colors(sprite_palette, range);
            let graft = self.graft_change && history.label() == Some(label);
            history.set_label(label);
            history.set_modification(Modification::ModifyDocument);
            if graft {
                debug!("Grafting {}-{} into \"{}\"", range.from, range.to, label);
                history.graft_undoer_in_last_group(undoer);
            } else {
                debug!("New undo group \"{}\" for {}-{}", label, range.from, range.to);
                history.push_undoer(Undoer::OpenGroup);
                history.push_undoer(undoer);
                history.push_undoer(Undoer::CloseGroup);
            }
        }

        *sprite_palette = new_palette.clone();
        Some(range)
    }

    // Called after every mutation pass, whether or not a document took it.
    pub fn after_mutation(&mut self) {
        self.timer_armed = true;
        self.redraw_all = false;
        self.graft_change = true;
    }

    pub fn on_timer(&mut self, palette_changed: &Notifier<PaletteChanged>) -> TimerAction {
        if !self.timer_armed {
            return TimerAction::None;
        }
        if !self.redraw_all {
            self.redraw_all = true;
            return TimerAction::RedrawEditor;
        }

        self.redraw_all = false;
        self.graft_change = false;
        self.timer_armed = false;

        self.self_change.set(true);
        palette_changed.publish(&PaletteChanged);
        self.self_change.set(false);

        TimerAction::RedrawAll
    }

    pub fn stop(&mut self) {
        self.timer_armed = false;
        self.redraw_all = false;
        self.graft_change = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::undo::UndoStack;

    fn edit(
        coalescer: &mut Coalescer,
        history: &mut UndoStack,
        sprite: &mut Palette,
        changes: &[(usize, [u8; 3])],
        label: &str,
    ) -> Option<DiffRange> {
        let mut new_palette = sprite.clone();
        for &(idx, color) in changes {
            new_palette.set(idx, color);
        }
        let range = coalescer.record(history, sprite, &new_palette, label);
        coalescer.after_mutation();
        range
    }

    #[test]
    fn same_label_edits_coalesce_into_one_group() {
        let original = Palette::new(16);
        let mut sprite = original.clone();
        let mut history = UndoStack::default();
        let mut coalescer = Coalescer::default();

        edit(&mut coalescer, &mut history, &mut sprite, &[(2, [1, 1, 1])], "Color Change");
        edit(&mut coalescer, &mut history, &mut sprite, &[(9, [2, 2, 2])], "Color Change");

        assert_eq!(history.groups().len(), 1);
        assert_eq!(
            history.groups()[0].covered_range(),
            Some(DiffRange::new(2, 9))
        );
        history.undo(&mut sprite);
        assert_eq!(sprite, original);
    }

    #[test]
    fn different_labels_make_separate_groups() {
        let mut sprite = Palette::new(16);
        let mut history = UndoStack::default();
        let mut coalescer = Coalescer::default();

        edit(&mut coalescer, &mut history, &mut sprite, &[(2, [1, 1, 1])], "Color Change");
        edit(&mut coalescer, &mut history, &mut sprite, &[(3, [2, 2, 2])], "Paste Colors");

        assert_eq!(history.groups().len(), 2);
        assert_eq!(history.groups()[1].label, "Paste Colors");
    }

    #[test]
    fn commit_ends_the_coalescing_window() {
        let bus = Notifier::default();
        let mut sprite = Palette::new(16);
        let mut history = UndoStack::default();
        let mut coalescer = Coalescer::default();

        edit(&mut coalescer, &mut history, &mut sprite, &[(1, [1, 1, 1])], "Color Change");
        assert_eq!(coalescer.on_timer(&bus), TimerAction::RedrawEditor);
        assert_eq!(coalescer.on_timer(&bus), TimerAction::RedrawAll);
        assert_eq!(coalescer.state(), SchedulerState::Idle);
        assert!(!coalescer.graft_change);

        edit(&mut coalescer, &mut history, &mut sprite, &[(1, [5, 5, 5])], "Color Change");
        assert_eq!(history.groups().len(), 2);
    }

    #[test]
    fn edits_between_ticks_postpone_the_commit() {
        let bus = Notifier::default();
        let mut sprite = Palette::new(16);
        let mut history = UndoStack::default();
        let mut coalescer = Coalescer::default();

        edit(&mut coalescer, &mut history, &mut sprite, &[(1, [1, 1, 1])], "Color Change");
        assert_eq!(coalescer.on_timer(&bus), TimerAction::RedrawEditor);
        edit(&mut coalescer, &mut history, &mut sprite, &[(1, [2, 2, 2])], "Color Change");
        assert_eq!(coalescer.on_timer(&bus), TimerAction::RedrawEditor);
        assert_eq!(coalescer.state(), SchedulerState::Pending);
        assert_eq!(coalescer.on_timer(&bus), TimerAction::RedrawAll);
        assert_eq!(coalescer.on_timer(&bus), TimerAction::None);
        assert_eq!(history.groups().len(), 1);
    }

    #[test]
    fn broadcast_is_flagged_as_self_originated() {
        let bus = Notifier::default();
        let mut coalescer = Coalescer::default();
        let flag = coalescer.self_change_flag();
        let seen = Rc::new(Cell::new(None));
        let seen_in_cb = seen.clone();
        let _sub = bus.subscribe(move |_: &PaletteChanged| seen_in_cb.set(Some(flag.get())));

        coalescer.after_mutation();
        coalescer.on_timer(&bus);
        coalescer.on_timer(&bus);
        assert_eq!(seen.get(), Some(true));
        assert!(!coalescer.self_change_flag().get());
    }

    #[test]
    fn identical_palette_records_nothing() {
        let mut sprite = Palette::new(4);
        let mut history = UndoStack::default();
        let coalescer = Coalescer::default();
        let same = sprite.clone();
        assert_eq!(coalescer.record(&mut history, &mut sprite, &same, "Color Change"), None);
        assert!(history.groups().is_empty());
    }

    // History of a document whose undo is turned off.
    struct Disabled;

    impl UndoHistory for Disabled {
        fn is_enabled(&self) -> bool {
            false
        }
        fn label(&self) -> Option<&str> {
            None
        }
        fn set_label(&mut self, _label: &str) {
            panic!("label set on a disabled history");
        }
        fn set_modification(&mut self, _modification: Modification) {}
        fn push_undoer(&mut self, _undoer: Undoer) {
            panic!("undoer pushed to a disabled history");
        }
        fn graft_undoer_in_last_group(&mut self, _undoer: Undoer) {
            panic!("undoer grafted into a disabled history");
        }
    }

    #[test]
    fn disabled_history_still_updates_sprite() {
        let mut sprite = Palette::new(4);
        let mut new_palette = sprite.clone();
        new_palette.set(0, [3, 3, 3]);
        let coalescer = Coalescer::default();
        let range = coalescer.record(&mut Disabled, &mut sprite, &new_palette, "Color Change");
        assert_eq!(range, Some(DiffRange::new(0, 0)));
        assert_eq!(sprite.get(0), Some([3, 3, 3]));
    }

    #[test]
    fn stop_disarms() {
        let bus = Notifier::default();
        let mut coalescer = Coalescer::default();
        coalescer.after_mutation();
        coalescer.stop();
        assert_eq!(coalescer.on_timer(&bus), TimerAction::None);
    }
}
