//! Sprite asset library
//!
//! Keyed sprite surfaces and shape assets over SDL2

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod logging;
pub mod native;
pub mod shapes;
pub mod surface;

pub use cli::Cli;
pub use color::{color_key_for, Rgb, BLACK, MAGENTA};
pub use config::Options;
pub use error::{AssetError, AssetResult};
pub use logging::LogLevel;
pub use native::NativeGraphics;
pub use shapes::{AspectRatio, Shape, ShapeAsset};
pub use surface::{create_surface, create_surface_with, SurfaceSpec, DEFAULT_SPRITE_SIZE};
