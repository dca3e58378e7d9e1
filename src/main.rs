use std::path::PathBuf;

use clap::Parser;
use iced::{Subscription, Task, Theme};
use log::error;
use state::EditorState;

mod clipboard;
mod coalesce;
mod color;
mod document;
mod editor;
mod error;
mod message;
mod mutate;
mod notify;
mod palette;
mod persist;
mod quantize;
mod registry;
mod selection;
mod state;
mod undo;
mod update;
mod view;

use coalesce::{SchedulerState, REDRAW_PERIOD};
use message::Message;

#[derive(Parser, Debug)]
struct Args {
    /// PNG sprite to open at startup
    sprite: Option<PathBuf>,
    /// Palette file (.gpl, .json or .png) to load into the sprite
    #[arg(long)]
    palette: Option<PathBuf>,
}

fn theme(state: &EditorState) -> Theme {
    match state.ui.panel(state.frame_id) {
        Some(frame) => frame.theme.clone(),
        None => state.ui.theme().clone(),
    }
}

fn subscription(state: &EditorState) -> Subscription<Message> {
    let events = iced::event::listen().map(Message::Event);
    if state.editor.coalescer().state() == SchedulerState::Pending {
        Subscription::batch([
            events,
            iced::time::every(REDRAW_PERIOD).map(|_| Message::RedrawTimer),
        ])
    } else {
        events
    }
}

pub fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();

    iced::application("Palette Entry Editor", update::update, view::view)
        .subscription(subscription)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .theme(theme)
        .run_with(move || {
            let state = match state::get_initial_state(args.sprite.as_deref(), args.palette.as_deref()) {
                Ok(state) => state,
                Err(e) => {
                    error!("Error starting the editor: {:#}\n{}", e, e.backtrace());
                    std::process::exit(1);
                }
            };
            (state, Task::none())
        })
}
