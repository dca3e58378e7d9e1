use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{bail, ensure, Context, Result};
use hashbrown::HashMap;
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Serializer;

use crate::{
    color::ColorRGB,
    document::{Image, PixelFormat, Sprite},
    palette::Palette,
};

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    #[serde(default)]
    pub show_more_options: bool,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    #[serde(default)]
    pub components: HashMap<String, ComponentConfig>,
}

impl GlobalConfig {
    pub fn show_more_options(&self, component: &str) -> bool {
        self.components
            .get(component)
            .is_some_and(|c| c.show_more_options)
    }

    pub fn set_show_more_options(&mut self, component: &str, show: bool) {
        self.components
            .entry(component.to_string())
            .or_default()
            .show_more_options = show;
        self.modified = true;
    }
}

pub fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "PaletteEntryEditor")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}

// A missing config file is not an error: defaults are used.
pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(GlobalConfig::default());
    }
    load_json(path)
}

pub fn save_global_config(path: &Path, config: &mut GlobalConfig) -> Result<()> {
    if config.modified {
        save_json(path, config)?;
        config.modified = false;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFormat {
    Gpl,
    Json,
    Png,
}

pub const PALETTE_EXTENSIONS: [&str; 3] = ["gpl", "json", "png"];

impl PaletteFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("gpl") => Ok(PaletteFormat::Gpl),
            Some("json") => Ok(PaletteFormat::Json),
            Some("png") => Ok(PaletteFormat::Png),
            _ => bail!("Unsupported palette file type: {}", path.display()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PaletteFile {
    name: String,
    colors: Vec<ColorRGB>,
}

fn palette_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    let palette = match PaletteFormat::from_path(path)? {
        PaletteFormat::Gpl => {
            info!("Loading {}", path.display());
            parse_gpl(&fs::read_to_string(path)?)?
        }
        PaletteFormat::Json => Palette::from_colors(load_json::<PaletteFile>(path)?.colors),
        PaletteFormat::Png => load_png_palette(path)?,
    };
    ensure!(!palette.is_empty(), "{} has no colors", path.display());
    Ok(palette)
}

pub fn save_palette(path: &Path, palette: &Palette) -> Result<()> {
    match PaletteFormat::from_path(path)? {
        PaletteFormat::Gpl => {
            info!("Saving {}", path.display());
            fs::write(path, format_gpl(&palette_name(path), palette))?;
        }
        PaletteFormat::Json => save_json(
            path,
            &PaletteFile {
                name: palette_name(path),
                colors: palette.colors().to_vec(),
            },
        )?,
        PaletteFormat::Png => save_png_palette(path, palette)?,
    }
    Ok(())
}

fn parse_gpl(text: &str) -> Result<Palette> {
    let mut lines = text.lines();
    ensure!(
        lines.next().map(str::trim) == Some("GIMP Palette"),
        "Only GIMP palettes are supported"
    );
    let mut colors = vec![];
    for line in lines {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("Name:")
            || line.starts_with("Columns:")
        {
            continue;
        }
        let mut fields = line.split_whitespace();
        let mut rgb = [0; 3];
        for c in rgb.iter_mut() {
            let field = fields
                .next()
                .with_context(|| format!("Invalid palette line: {line}"))?;
            *c = field
                .parse()
                .with_context(|| format!("Invalid color value: {field}"))?;
        }
        colors.push(rgb);
    }
    Ok(Palette::from_colors(colors))
}

fn format_gpl(name: &str, palette: &Palette) -> String {
    let mut out = format!("GIMP Palette\nName: {name}\nColumns: 16\n#\n");
    for (i, [r, g, b]) in palette.colors().iter().enumerate() {
        out.push_str(&format!("{r:3} {g:3} {b:3}\tIndex {i}\n"));
    }
    out
}

fn load_png_palette(path: &Path) -> Result<Palette> {
    info!("Loading {}", path.display());
    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let reader = decoder.read_info()?;
    let info = reader.info();
    ensure!(
        info.color_type == png::ColorType::Indexed,
        "{} is not an indexed image",
        path.display()
    );
    let plte = info.palette.as_ref().context("missing PLTE chunk")?;
    Ok(Palette::from_colors(
        plte.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
    ))
}

// Palettes are saved as a 16-wide indexed image showing every entry once.
fn save_png_palette(path: &Path, palette: &Palette) -> Result<()> {
    info!("Saving {}", path.display());
    ensure!(palette.len() <= 256, "PNG palettes hold at most 256 colors");
    let width = palette.len().min(16) as u32;
    let height = palette.len().div_ceil(16) as u32;
    let mut data: Vec<u8> = (0..palette.len()).map(|i| i as u8).collect();
    data.resize((width * height) as usize, 0);

    let mut encoder = png::Encoder::new(BufWriter::new(File::create(path)?), width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette.colors().concat());
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    Ok(())
}

// Indexed images keep their pixel indices and PLTE; other images get a gray
// ramp. Either way the palette has `palette_size` entries.
pub fn load_sprite(path: &Path, palette_size: usize) -> Result<Sprite> {
    info!("Loading {}", path.display());
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let bytes = &buf[..frame.buffer_size()];
    let source_type = reader.info().color_type;
    let plte = reader.info().palette.clone();

    let channels = frame.color_type.samples();
    let pixels = bytes.chunks_exact(channels);
    let (format, data, palette): (PixelFormat, Vec<u8>, Palette) = match source_type {
        png::ColorType::Indexed => {
            let plte = plte.context("missing PLTE chunk")?;
            let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
            for (i, c) in plte.chunks_exact(3).enumerate() {
                lookup.entry([c[0], c[1], c[2]]).or_insert(i as u8);
            }
            let data = pixels
                .map(|px| lookup.get(&[px[0], px[1], px[2]]).copied().unwrap_or(0))
                .collect();
            // The sprite palette always has the session size.
            let mut palette = Palette::new(palette_size);
            Palette::from_colors(plte.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
                .copy_colors_to(&mut palette);
            (PixelFormat::Indexed, data, palette)
        }
        png::ColorType::Rgb | png::ColorType::Rgba => {
            let data = pixels
                .flat_map(|px| [px[0], px[1], px[2], px.get(3).copied().unwrap_or(255)])
                .collect();
            (PixelFormat::Rgb, data, gray_ramp(palette_size))
        }
        png::ColorType::Grayscale | png::ColorType::GrayscaleAlpha => {
            let data = pixels
                .flat_map(|px| [px[0], px.get(1).copied().unwrap_or(255)])
                .collect();
            (PixelFormat::Grayscale, data, gray_ramp(palette_size))
        }
    };

    let mut image = Image::new(format, frame.width, frame.height);
    ensure!(
        data.len() == image.data.len(),
        "{}: unexpected pixel data size",
        path.display()
    );
    image.data = data;
    Ok(Sprite { image, palette })
}

fn gray_ramp(size: usize) -> Palette {
    let mut palette = Palette::new(size);
    if size > 1 {
        palette.set(size - 1, [255, 255, 255]);
        palette.make_horz_ramp(0, size - 1);
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Palette {
        Palette::from_colors((0..20).map(|i| [i * 10, 255 - i, i]).collect())
    }

    #[test]
    fn gpl_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.gpl");
        save_palette(&path, &sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("GIMP Palette\nName: sample\n"));
        assert_eq!(load_palette(&path).unwrap(), sample());
    }

    #[test]
    fn json_and_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["sample.json", "sample.png"] {
            let path = dir.path().join(name);
            save_palette(&path, &sample()).unwrap();
            assert_eq!(load_palette(&path).unwrap(), sample(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        assert!(load_palette(&path).is_err());
        let gpl = dir.path().join("bad.gpl");
        fs::write(&gpl, "GIMP Palette\n1 2\n").unwrap();
        assert!(load_palette(&gpl).is_err());
        assert!(load_palette(&dir.path().join("missing.gpl")).is_err());
    }

    #[test]
    fn gpl_parsing_skips_headers() {
        let text = "GIMP Palette\nName: Test\nColumns: 4\n# comment\n\n 255   0   0 Red\n0 0 255\n";
        let palette = parse_gpl(text).unwrap();
        assert_eq!(palette.colors(), &[[255, 0, 0], [0, 0, 255]]);
    }

    #[test]
    fn config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = load_global_config(&path).unwrap();
        assert!(!config.show_more_options("PaletteEditor"));
        config.set_show_more_options("PaletteEditor", true);
        save_global_config(&path, &mut config).unwrap();
        assert!(!config.modified);
        let loaded = load_global_config(&path).unwrap();
        assert!(loaded.show_more_options("PaletteEditor"));
        assert!(!loaded.show_more_options("ColorBar"));
    }

    fn write_png(path: &Path, color: png::ColorType, data: &[u8], palette: Option<Vec<u8>>) {
        let file = BufWriter::new(File::create(path).unwrap());
        let mut encoder = png::Encoder::new(file, 2, 1);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(plte) = palette {
            encoder.set_palette(plte);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn loads_rgb_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        write_png(&path, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6], None);
        let sprite = load_sprite(&path, 256).unwrap();
        assert_eq!(sprite.pixel_format(), PixelFormat::Rgb);
        assert_eq!(sprite.image.data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(sprite.palette.len(), 256);
        assert_eq!(sprite.palette.get(255), Some([255, 255, 255]));
        assert_eq!(sprite.palette.get(128), Some([128, 128, 128]));
    }

    #[test]
    fn loads_indexed_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexed.png");
        write_png(
            &path,
            png::ColorType::Indexed,
            &[1, 0],
            Some(vec![10, 10, 10, 200, 0, 0]),
        );
        let sprite = load_sprite(&path, 256).unwrap();
        assert_eq!(sprite.pixel_format(), PixelFormat::Indexed);
        assert_eq!(sprite.image.data, vec![1, 0]);
        assert_eq!(sprite.palette.len(), 256);
        assert_eq!(sprite.palette.colors()[..3], [[10, 10, 10], [200, 0, 0], [0, 0, 0]]);
    }
}
