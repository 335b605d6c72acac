//! RGB color values and color-key selection
//!
//! Sprites are drawn onto surfaces whose background is a transparent color
//! key. The key must never match the color the sprite is drawn in, so two
//! reserved colors exist and one is picked by contrast.

use anyhow::{Context, Result};
use std::fmt;

/// 8-bit RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Fully opaque version of this color
    pub const fn opaque(self) -> Rgba {
        self.with_alpha(255)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// 8-bit RGBA color, used for renderer draw colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Default color key
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Fallback color key for sprites that are themselves black
pub const MAGENTA: Rgb = Rgb::new(255, 71, 182);

/// Pick the transparent color key for a sprite drawn in `color`.
///
/// Returns [`MAGENTA`] for a black sprite and [`BLACK`] for everything else,
/// so the key never equals `color`.
pub fn color_key_for(color: Rgb) -> Rgb {
    if color == BLACK {
        MAGENTA
    } else {
        BLACK
    }
}

/// Parse a color written as `R,G,B` (decimal) or `#RRGGBB` (hex)
pub fn parse_color(s: &str) -> Result<Rgb> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Hex color must be in #RRGGBB format");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("Invalid hex digits in color: {}", s))
        };
        return Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        anyhow::bail!("Color must be in R,G,B or #RRGGBB format");
    }

    let r: u8 = parts[0].parse().context("Invalid red value")?;
    let g: u8 = parts[1].parse().context("Invalid green value")?;
    let b: u8 = parts[2].parse().context("Invalid blue value")?;

    Ok(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(BLACK, MAGENTA)]
    #[case(Rgb::new(255, 0, 0), BLACK)]
    #[case(MAGENTA, BLACK)]
    #[case(Rgb::new(0, 0, 1), BLACK)]
    fn test_color_key_for(#[case] color: Rgb, #[case] expected: Rgb) {
        assert_eq!(color_key_for(color), expected);
    }

    proptest! {
        #[test]
        fn color_key_never_matches_color(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = Rgb::new(r, g, b);
            prop_assert_ne!(color_key_for(color), color);
        }
    }

    #[test]
    fn test_parse_color_decimal() {
        assert_eq!(parse_color("255,0,0").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_color(" 10, 20 ,30 ").unwrap(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#ff47b6").unwrap(), MAGENTA);
        assert_eq!(parse_color("#000000").unwrap(), BLACK);
    }

    #[test]
    fn test_parse_color_invalid() {
        assert!(parse_color("255,0").is_err());
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("#ff47b").is_err());
        assert!(parse_color("#gg0000").is_err());
        assert!(parse_color("red").is_err());
    }

    #[test]
    fn test_opaque() {
        let rgba = Rgb::new(1, 2, 3).opaque();
        assert_eq!(rgba.a, 255);
        assert_eq!(rgba.rgb(), Rgb::new(1, 2, 3));
    }
}
