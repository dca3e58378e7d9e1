use anyhow::{Context as _, Result};
use iced::{keyboard, Theme};
use std::path::{Path, PathBuf};

use log::info;

use crate::{
    color::{Color, ColorIdx},
    document::{Context, Document},
    editor::{PaletteEditor, COMPONENT_NAME},
    notify::PaletteChanged,
    palette::{Palette, DEFAULT_PALETTE_SIZE},
    persist::{self, GlobalConfig},
    registry::{PanelKind, UiManager, WidgetId},
    selection::Selection,
};

pub enum Dialogue {
    Alert(String),
    Help,
}

pub struct EditorState {
    pub global_config_path: PathBuf,
    pub global_config: GlobalConfig,

    // Session data:
    pub ctx: Context,

    // Palette view:
    pub selection: Selection,
    pub anchor: Option<ColorIdx>,
    pub palette_view_id: WidgetId,

    // Palette entry editor:
    pub editor: PaletteEditor,
    pub editor_panel_id: Option<WidgetId>,

    pub ui: UiManager,
    pub frame_id: WidgetId,
    pub modifiers: keyboard::Modifiers,
    pub dialogue: Option<Dialogue>,
}

impl EditorState {
    pub fn editor_open(&self) -> bool {
        self.editor_panel_id.is_some()
    }

    pub fn open_editor(&mut self) {
        if self.editor_panel_id.is_none() {
            self.editor_panel_id = Some(self.ui.add_panel(PanelKind::PaletteEditor));
            if let Some(idx) = self.selection.selected_entry() {
                self.editor
                    .set_color(Color::Index(idx), &self.ctx.current_palette, &self.selection);
            }
        }
    }

    pub fn close_editor(&mut self) {
        if let Some(id) = self.editor_panel_id.take() {
            self.editor.close();
            self.ui.remove_panel(id);
        }
    }

    pub fn sync_editor(&mut self) {
        self.editor.poll_notifications(&self.ctx, &self.selection);
    }

    pub fn open_sprite(&mut self, path: &Path) -> Result<()> {
        let sprite = persist::load_sprite(path, self.ctx.current_palette.len())?;
        let name = path
            .file_name()
            .map(|x| x.to_string_lossy().to_string())
            .unwrap_or_default();
        self.ctx.open_document(Document::new(&name, sprite));
        self.ctx.palette_changed.publish(&PaletteChanged);
        self.sync_editor();
        Ok(())
    }
}

pub fn detect_theme() -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

pub fn get_initial_state(sprite: Option<&Path>, palette: Option<&Path>) -> Result<EditorState> {
    let global_config_path = persist::get_global_config_path()?;
    let global_config = persist::load_global_config(&global_config_path)?;
    let ctx = Context::new(Palette::new(DEFAULT_PALETTE_SIZE));
    let editor = PaletteEditor::new(&ctx, global_config.show_more_options(COMPONENT_NAME));

    let mut ui = UiManager::new(detect_theme());
    let frame_id = ui.add_panel(PanelKind::Frame);
    let palette_view_id = ui.add_panel(PanelKind::PaletteView);

    let mut state = EditorState {
        global_config_path,
        global_config,
        selection: Selection::from_indices(ctx.current_palette.len(), [0]),
        ctx,
        anchor: Some(0),
        palette_view_id,
        editor,
        editor_panel_id: None,
        ui,
        frame_id,
        modifiers: keyboard::Modifiers::default(),
        dialogue: None,
    };
    state.open_editor();

    if let Some(path) = sprite {
        info!("Opening sprite {}", path.display());
        state
            .open_sprite(path)
            .with_context(|| format!("Unable to open sprite {}", path.display()))?;
    }
    if let Some(path) = palette {
        state.editor.load_palette(&mut state.ctx, path)?;
    }
    Ok(state)
}
