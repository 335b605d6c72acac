use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::{parse_color, Rgb};
use crate::logging::LogLevel;
use crate::shapes::{AspectRatio, Shape, ShapeAsset};
use crate::surface::{SurfaceSpec, DEFAULT_SPRITE_SIZE};

/// Largest sprite edge accepted from configuration
pub const MAX_SPRITE_SIZE: i32 = 4096;

/// Options that can be set via config file or CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub output: Option<PathBuf>,
    pub shape: Shape,
    pub color: Rgb,
    pub aspect_ratio: AspectRatio,
    pub sprite_size: i32,
    pub log_level: LogLevel,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: None,
            shape: Shape::Square,
            color: Rgb::new(255, 255, 255),
            aspect_ratio: AspectRatio::default(),
            sprite_size: DEFAULT_SPRITE_SIZE,
            log_level: LogLevel::default(),
        }
    }
}

impl Options {
    /// The asset these options describe
    pub fn asset(&self) -> ShapeAsset {
        ShapeAsset::new(self.shape.with_aspect(self.aspect_ratio), self.color)
    }

    pub fn surface_spec(&self) -> SurfaceSpec {
        SurfaceSpec::square(self.sprite_size)
    }

    /// Apply one `key = value` setting
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "shape" => self.shape = parse_shape(value)?,
            "color" => self.color = parse_color(value)?,
            "aspect" => self.aspect_ratio = parse_aspect_ratio(value)?,
            "size" => self.sprite_size = parse_size(value)?,
            "log_level" => self.log_level = LogLevel::parse(value)?,
            "output" => self.output = Some(PathBuf::from(value)),
            _ => log::warn!("Ignoring unknown config key: {}", key),
        }
        Ok(())
    }
}

/// Load options from a `key = value` config file; defaults when `path` is `None`
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let mut opts = Options::default();
    let Some(path) = path else {
        return Ok(opts);
    };

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    for (line_no, key, value) in parse_properties(&data) {
        opts.apply(key, value)
            .with_context(|| format!("{}:{}: bad value for '{}'", path.display(), line_no, key))?;
    }

    log::debug!("Loaded config from {}", path.display());
    Ok(opts)
}

/// Split property-file text into `(line number, key, value)` entries.
///
/// Blank lines and `#` comments are skipped; lines without `=` are skipped
/// with a warning.
pub fn parse_properties(data: &str) -> Vec<(usize, &str, &str)> {
    let mut entries = Vec::new();

    for (index, line) in data.lines().enumerate() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => entries.push((index + 1, key.trim(), value.trim())),
            None => log::warn!("Key without value on line {}", index + 1),
        }
    }

    entries
}

/// A `#` starts a comment at the start of a line or when followed by
/// whitespace, so `#RRGGBB` values survive.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    line.match_indices('#')
        .find(|(i, _)| line[i + 1..].chars().next().map_or(true, char::is_whitespace))
        .map_or(line, |(i, _)| &line[..i])
}

/// Parse a shape name; rectangles get the default aspect ratio
pub fn parse_shape(s: &str) -> Result<Shape> {
    match s.trim().to_lowercase().as_str() {
        "square" => Ok(Shape::Square),
        "rectangle" | "rect" => Ok(Shape::Rectangle(AspectRatio::default())),
        "circle" => Ok(Shape::Circle),
        "triangle" => Ok(Shape::Triangle),
        _ => anyhow::bail!(
            "Invalid shape: {}. Valid options: square, rectangle, circle, triangle",
            s
        ),
    }
}

/// Parse an aspect ratio in the format "WIDTH:HEIGHT"
pub fn parse_aspect_ratio(s: &str) -> Result<AspectRatio> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 2 {
        anyhow::bail!("Aspect ratio must be in WIDTH:HEIGHT format");
    }

    let width: u32 = parts[0].trim().parse().context("Invalid aspect width")?;
    let height: u32 = parts[1].trim().parse().context("Invalid aspect height")?;

    AspectRatio::new(width, height).context("Aspect ratio values must be positive")
}

/// Parse a sprite edge length
pub fn parse_size(s: &str) -> Result<i32> {
    let size: i32 = s.trim().parse().context("Invalid sprite size")?;
    if !(1..=MAX_SPRITE_SIZE).contains(&size) {
        anyhow::bail!("Sprite size out of range (1 to {})", MAX_SPRITE_SIZE);
    }
    Ok(size)
}
