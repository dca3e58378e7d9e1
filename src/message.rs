use std::path::PathBuf;

use crate::color::{Channel, ColorIdx, ColorType};

#[derive(Debug, Clone)]
pub enum Message {
    Event(iced::Event),
    RedrawTimer,
    HideModal,
    HelpDialogue,
    ClickColor(ColorIdx),
    PickBackground(ColorIdx),
    ToggleEditor,
    ToggleTheme,
    ChangeFontSize(u16),
    SelectColorType(ColorType),
    ChangeChannel(Channel, f64),
    SetHex(String),
    ToggleMoreOptions,
    Copy,
    Paste,
    Undo,
    Redo,
    Ramp,
    Quantize,
    OpenSpriteDialogue,
    SpriteOpened(Option<PathBuf>),
    CloseSprite,
    LoadPaletteDialogue,
    PaletteLoadPicked(Option<PathBuf>),
    SavePaletteDialogue,
    PaletteSavePicked(Option<PathBuf>),
}
