// Catalog of live panels, owned by the UI manager, used to push font and
// theme changes to every panel at once.
use iced::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

#[derive(Debug)]
pub struct WidgetRegistry<W> {
    next_id: u64,
    widgets: Vec<(WidgetId, W)>,
}

impl<W> Default for WidgetRegistry<W> {
    fn default() -> Self {
        Self {
            next_id: 0,
            widgets: vec![],
        }
    }
}

impl<W> WidgetRegistry<W> {
    pub fn register(&mut self, widget: W) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.push((id, widget));
        id
    }

    pub fn unregister(&mut self, id: WidgetId) -> Option<W> {
        let pos = self.widgets.iter().position(|(w, _)| *w == id)?;
        Some(self.widgets.remove(pos).1)
    }

    pub fn for_each(&mut self, mut f: impl FnMut(&mut W)) {
        for (_, w) in self.widgets.iter_mut() {
            f(w);
        }
    }

    pub fn get(&self, id: WidgetId) -> Option<&W> {
        self.widgets.iter().find(|(w, _)| *w == id).map(|(_, w)| w)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    PaletteView,
    PaletteEditor,
    Frame,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub kind: PanelKind,
    pub theme: Theme,
    pub font_size: u16,
    pub needs_remap: bool,
}

impl Panel {
    fn new(kind: PanelKind, theme: Theme, font_size: u16) -> Self {
        Self {
            kind,
            theme,
            font_size,
            needs_remap: false,
        }
    }
}

pub const DEFAULT_FONT_SIZE: u16 = 14;

#[derive(Debug)]
pub struct UiManager {
    theme: Theme,
    font_size: u16,
    panels: WidgetRegistry<Panel>,
}

impl UiManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            font_size: DEFAULT_FONT_SIZE,
            panels: WidgetRegistry::default(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn add_panel(&mut self, kind: PanelKind) -> WidgetId {
        self.panels
            .register(Panel::new(kind, self.theme.clone(), self.font_size))
    }

    pub fn remove_panel(&mut self, id: WidgetId) -> Option<Panel> {
        self.panels.unregister(id)
    }

    pub fn panel(&self, id: WidgetId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn font_size(&self, id: WidgetId) -> u16 {
        self.panel(id).map_or(self.font_size, |p| p.font_size)
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
        self.panels.for_each(|p| p.font_size = size);
    }

    pub fn reinit_theme(&mut self, theme: Theme) {
        self.theme = theme.clone();
        self.panels.for_each(|p| {
            p.theme = theme.clone();
            p.needs_remap = p.kind == PanelKind::Frame;
        });
    }

    // Clears the remap flags and returns how many panels had one.
    pub fn clear_remap(&mut self) -> usize {
        let mut remapped = 0;
        self.panels.for_each(|p| {
            if p.needs_remap {
                remapped += 1;
                p.needs_remap = false;
            }
        });
        remapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let mut reg = WidgetRegistry::default();
        let a = reg.register("a");
        let b = reg.register("b");
        assert_ne!(a, b);
        assert_eq!(reg.unregister(a), Some("a"));
        assert_eq!(reg.unregister(a), None);
        assert_eq!(reg.get(b), Some(&"b"));
        assert_eq!(reg.widgets.len(), 1);
    }

    #[test]
    fn theme_broadcast_reaches_every_panel() {
        let mut ui = UiManager::new(Theme::Dark);
        let view = ui.add_panel(PanelKind::PaletteView);
        let frame = ui.add_panel(PanelKind::Frame);
        ui.reinit_theme(Theme::Light);
        assert_eq!(ui.panel(view).unwrap().theme, Theme::Light);
        assert!(!ui.panel(view).unwrap().needs_remap);
        assert!(ui.panel(frame).unwrap().needs_remap);
        assert_eq!(ui.clear_remap(), 1);
        assert!(!ui.panel(frame).unwrap().needs_remap);
    }

    #[test]
    fn font_broadcast() {
        let mut ui = UiManager::new(Theme::Dark);
        let editor = ui.add_panel(PanelKind::PaletteEditor);
        ui.set_font_size(18);
        assert_eq!(ui.font_size(editor), 18);
        ui.remove_panel(editor);
        assert!(ui.panels.widgets.is_empty());
        assert_eq!(ui.font_size(editor), 18);
    }
}
