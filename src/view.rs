mod editor;
mod palette;

use std::path::PathBuf;

use editor::palette_editor_view;
use iced::{
    alignment::Vertical,
    widget::{
        button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text,
        vertical_rule, Column,
    },
    Element, Font, Length, Theme,
};
use palette::palette_view;

use crate::{
    message::Message,
    persist::PALETTE_EXTENSIONS,
    state::{Dialogue, EditorState},
};

pub async fn open_sprite() -> Option<PathBuf> {
    let picked_file = rfd::AsyncFileDialog::new()
        .set_title("Open a sprite ...")
        .add_filter("PNG image", &["png"])
        .pick_file()
        .await;
    picked_file.map(|x| x.path().to_owned())
}

pub async fn open_palette() -> Option<PathBuf> {
    let picked_file = rfd::AsyncFileDialog::new()
        .set_title("Load a palette ...")
        .add_filter("Palette", &PALETTE_EXTENSIONS)
        .pick_file()
        .await;
    picked_file.map(|x| x.path().to_owned())
}

pub async fn save_palette() -> Option<PathBuf> {
    let picked_file = rfd::AsyncFileDialog::new()
        .set_title("Save palette as ...")
        .add_filter("Palette", &PALETTE_EXTENSIONS)
        .save_file()
        .await;
    picked_file.map(|x| x.path().to_owned())
}

fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        iced::Color {
                            a: 0.5,
                            ..iced::Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

pub fn modal_background_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: iced::border::rounded(4)
            .color(palette.background.weak.color)
            .width(1.0),
        ..container::Style::default()
    }
}

pub fn alert_view(message: &str) -> Element<Message> {
    container(
        column![
            text(message),
            button(text("OK"))
                .style(button::secondary)
                .on_press(Message::HideModal),
        ]
        .spacing(10),
    )
    .width(400)
    .padding(25)
    .style(modal_background_style)
    .into()
}

pub fn help_view(_state: &EditorState) -> Element<Message> {
    let controls = vec![
        ("Click", "Select entry", "left click a color, right click sets background"),
        ("Shift", "Select range", "shift-click extends from the last clicked entry"),
        ("Ctrl", "Toggle entry", "ctrl-click adds or removes one entry"),
        ("Ctrl+C", "Copy", "copy the selected colors"),
        ("Ctrl+V", "Paste", "paste into the selected colors"),
        ("Ctrl+Z", "Undo", "undo the last palette change"),
        ("Ctrl+Y", "Redo", "redo the last undone change"),
    ];
    let mut col = Column::new();
    col = col.push(text("Keyboard and mouse controls:"));
    for (key, name, desc) in controls {
        col = col.push(
            row![
                text(key).width(60).font(Font {
                    weight: iced::font::Weight::ExtraBold,
                    ..Default::default()
                }),
                text(format!("{}: {}", name, desc)).width(400),
            ]
            .align_y(Vertical::Center),
        );
    }

    container(col.spacing(10))
        .width(500)
        .padding(25)
        .style(modal_background_style)
        .into()
}

pub fn view_dialogue<'a>(
    state: &'a EditorState,
    main_view: Element<'a, Message>,
) -> Element<'a, Message> {
    if let Some(dialogue) = &state.dialogue {
        match dialogue {
            Dialogue::Alert(message) => modal(main_view, alert_view(message), Message::HideModal),
            Dialogue::Help => modal(main_view, help_view(state), Message::HideModal),
        }
    } else {
        main_view
    }
}

fn toolbar(state: &EditorState) -> Element<Message> {
    let size = state.ui.font_size(state.frame_id);
    let (document_name, can_undo, can_redo) = match state.ctx.active_reader() {
        Ok(doc) => (
            format!(
                "{}{} ({}, {} open)",
                doc.name,
                if doc.undo.is_modified() { "*" } else { "" },
                doc.sprite.pixel_format(),
                state.ctx.document_count(),
            ),
            doc.undo.can_undo(),
            doc.undo.can_redo(),
        ),
        Err(_) => ("No sprite".to_string(), false, false),
    };
    row![
        button(text("\u{F3D7}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press(Message::OpenSpriteDialogue),
        button(text("\u{F62A}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press_maybe(state.ctx.has_active_document().then_some(Message::CloseSprite)),
        button(text("\u{F117}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press_maybe(can_undo.then_some(Message::Undo)),
        button(text("\u{F116}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press_maybe(can_redo.then_some(Message::Redo)),
        text(document_name).size(size),
        horizontal_space(),
        button(text("A-").size(size))
            .style(button::secondary)
            .on_press(Message::ChangeFontSize(size.saturating_sub(1))),
        button(text("A+").size(size))
            .style(button::secondary)
            .on_press(Message::ChangeFontSize(size + 1)),
        button(text("\u{F5A1}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press(Message::ToggleTheme),
        button(text("\u{F4CA}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press(Message::ToggleEditor),
        button(text("\u{F505}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::secondary)
            .on_press(Message::HelpDialogue),
    ]
    .spacing(10)
    .align_y(Vertical::Center)
    .into()
}

pub fn view(state: &EditorState) -> Element<Message> {
    let mut panels = row![palette_view(state)].spacing(0);
    if let Some(id) = state.editor_panel_id {
        panels = panels
            .push(vertical_rule(1))
            .push(palette_editor_view(state, id));
    }

    let main_view: Element<Message> = column![toolbar(state), panels]
        .padding(10)
        .spacing(10)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

    view_dialogue(state, main_view)
}
