// The palette entry editor: turns slider, hex-field and button actions into
// palette changes on the session palette and commits them to the active
// sprite through the coalescing scheduler.
use std::{cell::Cell, path::Path, rc::Rc};

use log::{debug, error, info};

use crate::{
    clipboard::ColorClipboard,
    coalesce::{Coalescer, TimerAction},
    color::{Channel, Color, ColorType},
    document::{Context, PixelFormat},
    error::EditError,
    mutate::{self, Outcome},
    notify::{ColorBarEvent, PaletteChanged, Subscription},
    palette::{DiffRange, Palette},
    persist::{self, GlobalConfig},
    quantize,
    selection::{Selection, SelectionSummary},
};

pub const COMPONENT_NAME: &str = "PaletteEditor";

pub const COLOR_CHANGE: &str = "Color Change";
pub const PASTE_COLORS: &str = "Paste Colors";
pub const LOAD_PALETTE: &str = "Load Palette";
pub const COLOR_RAMP: &str = "Color Ramp";
pub const QUANTIZE_PALETTE: &str = "Quantize Palette";

pub struct PaletteEditor {
    color: Color,
    color_type: ColorType,
    hex_text: String,
    // Set while the hex field itself drives the change, so the text the user
    // is typing is not overwritten.
    disable_hex_update: bool,
    summary: SelectionSummary,
    show_more_options: bool,
    clipboard: ColorClipboard,
    coalescer: Coalescer,
    resync: Rc<Cell<bool>>,
    picked: Rc<Cell<Option<Color>>>,
    _palette_changed: Subscription<PaletteChanged>,
    _color_bar: Subscription<ColorBarEvent>,
}

impl PaletteEditor {
    pub fn new(ctx: &Context, show_more_options: bool) -> Self {
        let coalescer = Coalescer::default();

        let resync = Rc::new(Cell::new(false));
        let self_change = coalescer.self_change_flag();
        let pending = resync.clone();
        let palette_changed = ctx.palette_changed.subscribe(move |_| {
            if !self_change.get() {
                pending.set(true);
            }
        });

        // Eyedropper picks arrive as index colors.
        let picked = Rc::new(Cell::new(None));
        let slot = picked.clone();
        let color_bar = ctx.color_bar.subscribe(move |event: &ColorBarEvent| {
            let (ColorBarEvent::Foreground(color) | ColorBarEvent::Background(color)) = *event;
            if color.is_valid() && matches!(color, Color::Index(_)) {
                slot.set(Some(color));
            }
        });

        Self {
            color: Color::default(),
            color_type: ColorType::Rgb,
            hex_text: Color::default().to_hex(&ctx.current_palette),
            disable_hex_update: false,
            summary: SelectionSummary::NoEntry,
            show_more_options,
            clipboard: ColorClipboard::default(),
            coalescer,
            resync,
            picked,
            _palette_changed: palette_changed,
            _color_bar: color_bar,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn hex_text(&self) -> &str {
        &self.hex_text
    }

    pub fn summary(&self) -> SelectionSummary {
        self.summary
    }

    pub fn show_more_options(&self) -> bool {
        self.show_more_options
    }

    pub fn clipboard(&self) -> &ColorClipboard {
        &self.clipboard
    }

    pub fn coalescer(&self) -> &Coalescer {
        &self.coalescer
    }

    pub fn select_color_type(&mut self, color_type: ColorType) {
        self.color_type = color_type;
    }

    pub fn set_color(&mut self, color: Color, palette: &Palette, selection: &Selection) {
        self.color = match color {
            Color::Index(_) => Color::Rgb(color.to_rgb(palette).unwrap_or_default()),
            c => c,
        };
        if !self.disable_hex_update {
            self.hex_text = self.color.to_hex(palette);
        }
        self.summary = selection.summary();
    }

    pub fn poll_notifications(&mut self, ctx: &Context, selection: &Selection) {
        if self.resync.replace(false) {
            self.on_palette_change(ctx, selection);
        }
        if let Some(color) = self.picked.take() {
            self.set_color(color, &ctx.current_palette, selection);
        }
    }

    fn on_palette_change(&mut self, ctx: &Context, selection: &Selection) {
        if let Some(idx) = selection.selected_entry() {
            self.set_color(Color::Index(idx), &ctx.current_palette, selection);
        }
    }

    pub fn apply_color_edit(
        &mut self,
        ctx: &mut Context,
        selection: &Selection,
        color: Color,
        channel: Option<Channel>,
    ) -> Outcome {
        self.set_color(color, &ctx.current_palette, selection);
        let outcome = match channel {
            Some(channel) => mutate::set_palette_entry_channel(
                &mut ctx.current_palette,
                selection,
                &color,
                channel,
            ),
            None => mutate::set_palette_entry(&mut ctx.current_palette, selection, &color),
        };
        if outcome == Outcome::Applied {
            self.update_current_sprite_palette(ctx, COLOR_CHANGE);
        }
        outcome
    }

    pub fn apply_hex_edit(&mut self, ctx: &mut Context, selection: &Selection, text: String) -> Outcome {
        let color = Color::from_hex(&text);
        self.hex_text = text;
        let Some(color) = color else {
            return Outcome::NoOp;
        };
        self.disable_hex_update = true;
        let outcome = self.apply_color_edit(ctx, selection, color, None);
        self.disable_hex_update = false;
        outcome
    }

    pub fn copy_selection(&mut self, ctx: &Context, selection: &Selection) {
        self.clipboard.copy_from(&ctx.current_palette, selection);
        debug!("Copied {} colors", self.clipboard.len());
    }

    pub fn paste_selection(&mut self, ctx: &mut Context, selection: &Selection) -> Outcome {
        let outcome = self.clipboard.paste_into(&mut ctx.current_palette, selection);
        if outcome == Outcome::Applied {
            self.update_current_sprite_palette(ctx, PASTE_COLORS);
            self.on_palette_change(ctx, selection);
        }
        outcome
    }

    pub fn load_palette(&mut self, ctx: &mut Context, path: &Path) -> Result<Outcome, EditError> {
        let palette = persist::load_palette(path).map_err(|e| EditError::io(path, e))?;
        info!("Loaded {} colors from {}", palette.len(), path.display());
        self.set_new_palette(ctx, &palette, LOAD_PALETTE);
        Ok(Outcome::Applied)
    }

    pub fn save_palette(&self, ctx: &Context, path: &Path) -> Result<(), EditError> {
        persist::save_palette(path, &ctx.current_palette).map_err(|e| EditError::io(path, e))
    }

    pub fn apply_ramp(&mut self, ctx: &mut Context, selection: &Selection) -> Outcome {
        let Some((from, to)) = selection.selected_range() else {
            return Outcome::NoOp;
        };
        let mut palette = ctx.current_palette.clone();
        palette.make_horz_ramp(from, to);
        self.set_new_palette(ctx, &palette, COLOR_RAMP);
        Outcome::Applied
    }

    pub fn apply_quantization(&mut self, ctx: &mut Context) -> Result<Outcome, EditError> {
        let palette = {
            let doc = ctx.active_reader()?;
            let format = doc.sprite.pixel_format();
            if format != PixelFormat::Rgb {
                return Err(EditError::UnsupportedFormat(format));
            }
            quantize::create_palette_from_rgb(&doc.sprite.image, ctx.current_palette.len())
        };
        self.set_new_palette(ctx, &palette, QUANTIZE_PALETTE);
        Ok(Outcome::Applied)
    }

    fn set_new_palette(&mut self, ctx: &mut Context, palette: &Palette, label: &str) {
        palette.copy_colors_to(&mut ctx.current_palette);
        self.update_current_sprite_palette(ctx, label);
    }

    // Commits the session palette to the active sprite. Without an open
    // document only the scheduler is updated.
    fn update_current_sprite_palette(&mut self, ctx: &Context, label: &str) -> Option<DiffRange> {
        let recorded = match ctx.active_writer() {
            Ok(mut doc) => {
                let doc = &mut *doc;
                self.coalescer.record(
                    &mut doc.undo,
                    &mut doc.sprite.palette,
                    &ctx.current_palette,
                    label,
                )
            }
            Err(EditError::NoActiveDocument) => None,
            Err(e) => {
                error!("Error updating the sprite palette: {}", e);
                None
            }
        };
        self.coalescer.after_mutation();
        recorded
    }

    pub fn on_timer(&mut self, ctx: &Context) -> TimerAction {
        let action = self.coalescer.on_timer(&ctx.palette_changed);
        if action == TimerAction::RedrawAll {
            match ctx.active_reader() {
                Ok(doc) => debug!("Redrawing all editors of {}", doc.name),
                Err(e) => debug!("Skipping full redraw: {}", e),
            }
        }
        action
    }

    pub fn toggle_more_options(&mut self, config: &mut GlobalConfig) {
        self.show_more_options = !self.show_more_options;
        config.set_show_more_options(COMPONENT_NAME, self.show_more_options);
    }

    pub fn close(&mut self) {
        self.coalescer.stop();
    }
}
