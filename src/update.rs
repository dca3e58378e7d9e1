use iced::{
    keyboard::{self, key},
    widget, Event, Task, Theme,
};
use log::{debug, error, info, warn};

use crate::{
    coalesce::TimerAction,
    color::{Color, ColorIdx},
    message::Message,
    mutate::Outcome,
    notify::{ColorBarEvent, PaletteChanged},
    persist,
    state::{Dialogue, EditorState},
    view::{open_palette, open_sprite, save_palette},
};

fn show_error(state: &mut EditorState, context: &str, e: impl std::fmt::Display) {
    error!("{}: {}", context, e);
    state.dialogue = Some(Dialogue::Alert(format!("{}: {}", context, e)));
}

fn move_selection(state: &mut EditorState, delta: isize) {
    let Some(idx) = state.selection.selected_entry() else {
        return;
    };
    let new_idx = idx as isize + delta;
    if new_idx < 0 || new_idx as usize >= state.selection.len() {
        return;
    }
    select_color(state, new_idx as ColorIdx);
}

fn select_color(state: &mut EditorState, idx: ColorIdx) {
    match (state.modifiers.shift(), state.anchor) {
        (true, Some(anchor)) => state.selection.select_span(anchor, idx),
        _ if state.modifiers.command() => {
            state.selection.toggle(idx);
            state.anchor = Some(idx);
        }
        _ => {
            state.selection.select_single(idx);
            state.anchor = Some(idx);
        }
    }
    state
        .ctx
        .color_bar
        .publish(&ColorBarEvent::Foreground(Color::Index(idx)));
}

fn undo_redo(state: &mut EditorState, redo: bool) {
    let restored = match state.ctx.active_writer() {
        Ok(mut doc) => {
            let doc = &mut *doc;
            let label = if redo {
                doc.undo.redo(&mut doc.sprite.palette)
            } else {
                doc.undo.undo(&mut doc.sprite.palette)
            };
            label.map(|label| (label, doc.sprite.palette.clone()))
        }
        Err(e) => {
            debug!("Nothing to undo: {}", e);
            None
        }
    };
    let Some((label, palette)) = restored else {
        return;
    };
    info!("{} \"{}\"", if redo { "Redo" } else { "Undo" }, label);
    palette.copy_colors_to(&mut state.ctx.current_palette);
    state.ctx.palette_changed.publish(&PaletteChanged);
}

pub fn update(state: &mut EditorState, message: Message) -> Task<Message> {
    match message {
        Message::Event(event) => match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = modifiers;
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Tab),
                modifiers,
                ..
            }) => {
                if modifiers.shift() {
                    return widget::focus_previous();
                } else {
                    return widget::focus_next();
                }
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Escape),
                ..
            }) => {
                state.dialogue = None;
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowRight),
                ..
            }) => move_selection(state, 1),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowLeft),
                ..
            }) => move_selection(state, -1),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowDown),
                ..
            }) => move_selection(state, 16),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowUp),
                ..
            }) => move_selection(state, -16),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Character(c),
                modifiers,
                ..
            }) if modifiers.command() => {
                let message = match c.to_lowercase().as_str() {
                    "z" if modifiers.shift() => Message::Redo,
                    "z" => Message::Undo,
                    "y" => Message::Redo,
                    "c" => Message::Copy,
                    "v" => Message::Paste,
                    _ => return Task::none(),
                };
                return update(state, message);
            }
            _ => {}
        },
        Message::RedrawTimer => {
            if state.editor.on_timer(&state.ctx) == TimerAction::RedrawAll {
                state.sync_editor();
            }
        }
        Message::HideModal => {
            state.dialogue = None;
        }
        Message::HelpDialogue => {
            state.dialogue = Some(Dialogue::Help);
        }
        Message::ClickColor(idx) => {
            select_color(state, idx);
            state.sync_editor();
        }
        Message::PickBackground(idx) => {
            state
                .ctx
                .color_bar
                .publish(&ColorBarEvent::Background(Color::Index(idx)));
            state.sync_editor();
        }
        Message::ToggleEditor => {
            if state.editor_open() {
                state.close_editor();
            } else {
                state.open_editor();
            }
        }
        Message::ToggleTheme => {
            let theme = match state.ui.theme() {
                Theme::Light => Theme::Dark,
                _ => Theme::Light,
            };
            state.ui.reinit_theme(theme);
            debug!("Remapped {} frames", state.ui.clear_remap());
        }
        Message::ChangeFontSize(size) => {
            state.ui.set_font_size(size.clamp(8, 32));
        }
        Message::SelectColorType(color_type) => {
            state.editor.select_color_type(color_type);
        }
        Message::ChangeChannel(channel, value) => {
            let color = state
                .editor
                .color()
                .with_channel(channel, value, &state.ctx.current_palette);
            state
                .editor
                .apply_color_edit(&mut state.ctx, &state.selection, color, Some(channel));
        }
        Message::SetHex(text) => {
            state
                .editor
                .apply_hex_edit(&mut state.ctx, &state.selection, text);
        }
        Message::ToggleMoreOptions => {
            state.editor.toggle_more_options(&mut state.global_config);
            if let Err(e) =
                persist::save_global_config(&state.global_config_path, &mut state.global_config)
            {
                error!("Error saving global config: {}\n{}", e, e.backtrace());
            }
        }
        Message::Copy => {
            state.editor.copy_selection(&state.ctx, &state.selection);
        }
        Message::Paste => {
            if state.editor.paste_selection(&mut state.ctx, &state.selection) == Outcome::NoOp {
                warn!("Nothing to paste.");
            }
        }
        Message::Undo => undo_redo(state, false),
        Message::Redo => undo_redo(state, true),
        Message::Ramp => {
            state.editor.apply_ramp(&mut state.ctx, &state.selection);
        }
        Message::Quantize => {
            if let Err(e) = state.editor.apply_quantization(&mut state.ctx) {
                show_error(state, "Unable to quantize the palette", e);
            }
        }
        Message::OpenSpriteDialogue => {
            return Task::perform(open_sprite(), Message::SpriteOpened);
        }
        Message::SpriteOpened(path) => {
            if let Some(path) = path {
                if let Err(e) = state.open_sprite(&path) {
                    show_error(state, "Unable to open sprite", format!("{:#}", e));
                }
            }
        }
        Message::CloseSprite => {
            state.ctx.close_active_document();
        }
        Message::LoadPaletteDialogue => {
            return Task::perform(open_palette(), Message::PaletteLoadPicked);
        }
        Message::PaletteLoadPicked(path) => {
            if let Some(path) = path {
                if let Err(e) = state.editor.load_palette(&mut state.ctx, &path) {
                    show_error(state, "Unable to load the palette", e);
                }
            }
        }
        Message::SavePaletteDialogue => {
            return Task::perform(save_palette(), Message::PaletteSavePicked);
        }
        Message::PaletteSavePicked(path) => {
            if let Some(path) = path {
                if let Err(e) = state.editor.save_palette(&state.ctx, &path) {
                    show_error(state, "Unable to save the palette", e);
                }
            }
        }
    }
    Task::none()
}
