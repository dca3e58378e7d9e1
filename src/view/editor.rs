use iced::{
    alignment::Vertical,
    widget::{button, column, row, slider, text, text_input, Column, Row},
    Element, Length,
};
use iced_fonts::BOOTSTRAP_FONT;

use crate::{
    color::{Channel, ColorType},
    message::Message,
    registry::WidgetId,
    state::EditorState,
};

fn color_type_button(label: &str, color_type: ColorType, current: ColorType) -> Element<Message> {
    let style = if color_type == current {
        button::primary
    } else {
        button::secondary
    };
    button(text(label))
        .style(style)
        .on_press(Message::SelectColorType(color_type))
        .into()
}

pub fn palette_editor_view(state: &EditorState, id: WidgetId) -> Element<Message> {
    let editor = &state.editor;
    let palette = &state.ctx.current_palette;
    let font_size = state.ui.font_size(id);
    let color = editor.color();

    let channels = match editor.color_type() {
        ColorType::Rgb => Channel::RGB,
        ColorType::Hsv => Channel::HSV,
    };
    let mut sliders = Column::new().spacing(5);
    for channel in channels {
        let value = color.channel(channel, palette);
        sliders = sliders.push(
            row![
                text(channel.name()).size(font_size).width(20),
                slider(0.0..=channel.max(), value, move |v| {
                    Message::ChangeChannel(channel, v)
                })
                .step(1.0),
                text(format!("{:.0}", value)).size(font_size).width(40),
            ]
            .spacing(10)
            .align_y(Vertical::Center),
        );
    }

    let more_icon = if editor.show_more_options() {
        "\u{F2EA}"
    } else {
        "\u{F4FE}"
    };
    let mut col = column![
        row![
            color_type_button("RGB", ColorType::Rgb, editor.color_type()),
            color_type_button("HSV", ColorType::Hsv, editor.color_type()),
            button(text(more_icon).font(BOOTSTRAP_FONT))
                .style(button::secondary)
                .on_press(Message::ToggleMoreOptions),
        ]
        .spacing(5),
        sliders,
        row![
            text("#").size(font_size),
            text_input("RRGGBB", editor.hex_text())
                .on_input(Message::SetHex)
                .size(font_size)
                .width(100),
            text(editor.summary().to_string()).size(font_size),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
    ]
    .spacing(10);

    if editor.show_more_options() {
        let can_paste = !editor.clipboard().is_empty();
        let actions: Row<Message> = row![
            button(text("Copy").size(font_size))
                .style(button::secondary)
                .on_press(Message::Copy),
            button(text("Paste").size(font_size))
                .style(button::secondary)
                .on_press_maybe(can_paste.then_some(Message::Paste)),
            button(text("Ramp").size(font_size))
                .style(button::secondary)
                .on_press(Message::Ramp),
            button(text("Quantize").size(font_size))
                .style(button::secondary)
                .on_press(Message::Quantize),
            button(text("Load").size(font_size))
                .style(button::secondary)
                .on_press(Message::LoadPaletteDialogue),
            button(text("Save").size(font_size))
                .style(button::secondary)
                .on_press(Message::SavePaletteDialogue),
        ]
        .spacing(5);
        col = col.push(actions);
    }

    col.padding(10).width(Length::Fill).into()
}
