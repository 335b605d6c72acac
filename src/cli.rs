use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::color::parse_color;
use crate::config::{parse_aspect_ratio, parse_shape, parse_size, Options};
use crate::logging::LogLevel;

/// Render a solid-color shape sprite with a transparent color key
#[derive(Parser, Debug, Default)]
#[command(name = "sprite-assets")]
#[command(version)]
#[command(about = "Render shape sprites to BMP files", long_about = None)]
pub struct Cli {
    /// Shape to draw (square, rectangle, circle, triangle)
    #[arg(short, long, value_name = "SHAPE")]
    pub shape: Option<String>,

    /// Sprite color (R,G,B or #RRGGBB)
    #[arg(short, long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Sprite edge length in pixels
    #[arg(long, value_name = "PIXELS")]
    pub size: Option<String>,

    /// Rectangle aspect ratio (e.g., 2:1)
    #[arg(short, long, value_name = "WIDTH:HEIGHT")]
    pub aspect: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (nothing, user, error, warning, info, debug, all)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Output BMP file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref shape) = self.shape {
            opts.shape = parse_shape(shape)?;
        }

        if let Some(ref color) = self.color {
            opts.color = parse_color(color).context("Invalid sprite color")?;
        }

        if let Some(ref size) = self.size {
            opts.sprite_size = parse_size(size)?;
        }

        if let Some(ref aspect) = self.aspect {
            opts.aspect_ratio = parse_aspect_ratio(aspect)?;
        }

        if let Some(ref level) = self.log_level {
            opts.log_level = LogLevel::parse(level)?;
        }

        if let Some(ref output) = self.output {
            opts.output = Some(output.clone());
        }

        Ok(opts)
    }
}
