// Palette view: every entry of the session palette as a clickable swatch,
// 16 per row.
use iced::{
    mouse,
    widget::{canvas, column, scrollable, text, Column, Row},
    Element, Size,
};

use crate::{color::ColorIdx, message::Message, state::EditorState};

const COLUMNS: usize = 16;

#[derive(Debug)]
struct ColorBox {
    r: f32,
    g: f32,
    b: f32,
    thickness: f32,
    selected: bool,
    color_idx: ColorIdx,
}

impl canvas::Program<Message> for ColorBox {
    // No internal state
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if cursor.position_in(bounds).is_none() {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(button)) => {
                let message = match button {
                    mouse::Button::Left => Some(Message::ClickColor(self.color_idx)),
                    mouse::Button::Right => Some(Message::PickBackground(self.color_idx)),
                    _ => None,
                };
                (canvas::event::Status::Captured, message)
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let thickness = self.thickness;
        let size = Size {
            width: frame.size().width - 2.0 * thickness,
            height: frame.size().height - 2.0 * thickness,
        };
        frame.fill_rectangle(
            iced::Point {
                x: thickness,
                y: thickness,
            },
            size,
            iced::Color::from_rgb(self.r, self.g, self.b),
        );

        if self.selected {
            let border_color = if theme.extended_palette().is_dark {
                iced::Color::WHITE
            } else {
                iced::Color::BLACK
            };
            let size = Size {
                width: frame.size().width - thickness,
                height: frame.size().height - thickness,
            };
            frame.stroke_rectangle(
                iced::Point {
                    x: thickness / 2.0,
                    y: thickness / 2.0,
                },
                size,
                canvas::Stroke {
                    width: thickness,
                    style: border_color.into(),
                    ..Default::default()
                },
            );
        }

        vec![frame.into_geometry()]
    }
}

pub fn palette_view(state: &EditorState) -> Element<Message> {
    let palette = &state.ctx.current_palette;
    let font_size = state.ui.font_size(state.palette_view_id);
    let size = 22.0;

    let mut grid = Column::new();
    for (row_idx, chunk) in palette.colors().chunks(COLUMNS).enumerate() {
        let mut colors_row = Row::new();
        for (col_idx, &[r, g, b]) in chunk.iter().enumerate() {
            let idx = row_idx * COLUMNS + col_idx;
            colors_row = colors_row.push(
                canvas(ColorBox {
                    r: r as f32 / 255.0,
                    g: g as f32 / 255.0,
                    b: b as f32 / 255.0,
                    thickness: 2.0,
                    selected: state.selection.is_selected(idx),
                    color_idx: idx,
                })
                .width(size)
                .height(size),
            );
        }
        grid = grid.push(colors_row);
    }

    column![
        text(format!("Palette ({} entries)", palette.len())).size(font_size),
        scrollable(grid),
    ]
    .spacing(5)
    .padding(10)
    .width(COLUMNS as f32 * size + 40.0)
    .into()
}
