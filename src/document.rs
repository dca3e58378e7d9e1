// Open documents and the per-session state the palette editor works on.
use std::{
    cell::{Ref, RefCell, RefMut},
    fmt::Display,
};

use log::info;

use crate::{
    error::EditError,
    notify::{ColorBarEvent, Notifier, PaletteChanged},
    palette::Palette,
    undo::UndoStack,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Grayscale,
    Indexed,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 4,
            PixelFormat::Grayscale => 2,
            PixelFormat::Indexed => 1,
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgb => write!(f, "RGB"),
            PixelFormat::Grayscale => write!(f, "grayscale"),
            PixelFormat::Indexed => write!(f, "indexed"),
        }
    }
}

// Pixel data: RGBA for `Rgb`, value+alpha for `Grayscale`, one palette
// index per pixel for `Indexed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            format,
            width,
            height,
            data: vec![0; len],
        }
    }

    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let chunks = match self.format {
            PixelFormat::Rgb => self.data.chunks_exact(4),
            _ => self.data[..0].chunks_exact(4),
        };
        chunks.filter(|px| px[3] != 0).map(|px| [px[0], px[1], px[2]])
    }
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: Image,
    pub palette: Palette,
}

impl Sprite {
    pub fn pixel_format(&self) -> PixelFormat {
        self.image.format
    }
}

#[derive(Debug)]
pub struct Document {
    pub name: String,
    pub sprite: Sprite,
    pub undo: UndoStack,
}

impl Document {
    pub fn new(name: &str, sprite: Sprite) -> Self {
        Self {
            name: name.to_string(),
            sprite,
            undo: UndoStack::default(),
        }
    }
}

pub struct Context {
    documents: Vec<RefCell<Document>>,
    active: Option<usize>,
    pub current_palette: Palette,
    pub palette_changed: Notifier<PaletteChanged>,
    pub color_bar: Notifier<ColorBarEvent>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl Context {
    pub fn new(current_palette: Palette) -> Self {
        Self {
            documents: vec![],
            active: None,
            current_palette,
            palette_changed: Notifier::default(),
            color_bar: Notifier::default(),
        }
    }

    pub fn open_document(&mut self, mut document: Document) -> usize {
        info!("Opening document {}", document.name);
        // Palette size is fixed for the session.
        let palette_size = self.current_palette.len();
        if document.sprite.palette.len() != palette_size {
            let mut palette = Palette::new(palette_size);
            document.sprite.palette.copy_colors_to(&mut palette);
            document.sprite.palette = palette;
        }
        self.current_palette = document.sprite.palette.clone();
        self.documents.push(RefCell::new(document));
        let idx = self.documents.len() - 1;
        self.active = Some(idx);
        idx
    }

    pub fn close_active_document(&mut self) -> Option<Document> {
        let idx = self.active.take()?;
        let doc = self.documents.remove(idx).into_inner();
        info!("Closing document {}", doc.name);
        if !self.documents.is_empty() {
            self.active = Some(idx.min(self.documents.len() - 1));
        }
        Some(doc)
    }

    pub fn has_active_document(&self) -> bool {
        self.active.is_some()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    fn active_cell(&self) -> Result<&RefCell<Document>, EditError> {
        self.active
            .and_then(|idx| self.documents.get(idx))
            .ok_or(EditError::NoActiveDocument)
    }

    pub fn active_reader(&self) -> Result<Ref<'_, Document>, EditError> {
        self.active_cell()?
            .try_borrow()
            .map_err(|_| EditError::DocumentAccess)
    }

    pub fn active_writer(&self) -> Result<RefMut<'_, Document>, EditError> {
        self.active_cell()?
            .try_borrow_mut()
            .map_err(|_| EditError::DocumentAccess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(format: PixelFormat) -> Sprite {
        let mut palette = Palette::new(4);
        palette.set(1, [10, 20, 30]);
        Sprite {
            image: Image::new(format, 2, 2),
            palette,
        }
    }

    #[test]
    fn no_document() {
        let ctx = Context::default();
        assert!(matches!(
            ctx.active_reader(),
            Err(EditError::NoActiveDocument)
        ));
        assert!(matches!(
            ctx.active_writer(),
            Err(EditError::NoActiveDocument)
        ));
    }

    #[test]
    fn writer_excludes_readers() {
        let mut ctx = Context::new(Palette::new(8));
        ctx.open_document(Document::new("a.png", sprite(PixelFormat::Rgb)));
        {
            let _writer = ctx.active_writer().unwrap();
            assert!(matches!(ctx.active_reader(), Err(EditError::DocumentAccess)));
        }
        assert!(ctx.active_reader().is_ok());
    }

    #[test]
    fn opening_sets_current_palette() {
        let mut ctx = Context::new(Palette::new(8));
        ctx.open_document(Document::new("a.png", sprite(PixelFormat::Indexed)));
        assert_eq!(ctx.current_palette.len(), 8);
        assert_eq!(ctx.current_palette.get(1), Some([10, 20, 30]));
        assert_eq!(ctx.active_reader().unwrap().sprite.palette.len(), 8);
        assert!(ctx.close_active_document().is_some());
        assert!(!ctx.has_active_document());
    }

    #[test]
    fn rgb_pixels_skip_transparent() {
        let mut image = Image::new(PixelFormat::Rgb, 2, 1);
        image.data = vec![1, 2, 3, 255, 4, 5, 6, 0];
        assert_eq!(image.rgb_pixels().collect::<Vec<_>>(), vec![[1, 2, 3]]);
        let gray = Image::new(PixelFormat::Grayscale, 2, 1);
        assert_eq!(gray.rgb_pixels().count(), 0);
    }
}
