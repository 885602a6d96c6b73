//! Colors and drawable assets the overlay is painted with.
//!
//! A [`Theme`] is resolved once, before the renderer is built, and never
//! reloaded. It can be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!   "mask": "#60000000",
//!   "laser": "#FFFF0000",
//!   "scan_line": { "kind": "gradient", "edge": "#FF90EE90", "center": "#FF00C000" }
//! }
//! ```
//!
//! Missing colors fall back to [`Palette::default`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 0xAARRGGBB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r(), self.g(), self.b(), self.a()])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// The five overlay colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Exterior while scanning live.
    pub mask: Color,
    /// Exterior while a result image is shown.
    pub result: Color,
    /// Corner brackets.
    pub frame: Color,
    /// Scan line.
    pub laser: Color,
    /// Candidate point markers.
    pub candidate_point: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            mask: Color(0x6000_0000),
            result: Color(0xB000_0000),
            frame: Color(0xFFCC_CCCC),
            laser: Color(0xFFFF_0000),
            candidate_point: Color(0xC0FF_BD21),
        }
    }
}

/// An image stretched over the scan-line rect instead of a solid fill.
#[derive(Debug, Clone)]
pub struct ScanLineGlyph(Arc<RgbaImage>);

impl ScanLineGlyph {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Horizontal gradient with flat `edge` quarters and `center` at the middle.
    pub fn gradient(edge: Color, center: Color) -> Self {
        const WIDTH: u32 = 256;
        let img = RgbaImage::from_fn(WIDTH, 1, |x, _| {
            let t = x as f32 / (WIDTH - 1) as f32;
            // distance from the middle, 0 at center, 1 at the start of the flat edge
            let k = ((t - 0.5).abs() / 0.25).min(1.0);
            lerp(center.to_rgba(), edge.to_rgba(), k)
        });
        Self::new(img)
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(image::open(path)?.to_rgba8()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, k: f32) -> Rgba<u8> {
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * k).round() as u8;
    Rgba([mix(0), mix(1), mix(2), mix(3)])
}

/// Everything the renderer needs from the outside look-and-feel.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub palette: Palette,
    pub scan_line: Option<ScanLineGlyph>,
}

/// On-disk form of a [`Theme`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(flatten)]
    pub palette: Palette,
    #[serde(default)]
    pub scan_line: Option<ScanLineConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanLineConfig {
    /// Image file, relative paths resolve against the theme file's directory.
    Image { path: PathBuf },
    Gradient { edge: Color, center: Color },
}

impl Theme {
    /// Resolve a config; `base_dir` anchors relative asset paths.
    pub fn from_config(config: ThemeConfig, base_dir: &Path) -> Result<Self> {
        let scan_line = match config.scan_line {
            None => None,
            Some(ScanLineConfig::Gradient { edge, center }) => {
                Some(ScanLineGlyph::gradient(edge, center))
            }
            Some(ScanLineConfig::Image { path }) => Some(ScanLineGlyph::open(&base_dir.join(path))?),
        };
        Ok(Self { palette: config.palette, scan_line })
    }

    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self> {
        let config: ThemeConfig = serde_json::from_str(json)?;
        Self::from_config(config, base_dir)
    }

    /// Read and resolve a theme file. Fails fast on any missing or bad asset.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let theme = Self::from_json(&json, base_dir)?;
        tracing::debug!(path = %path.display(), glyph = theme.scan_line.is_some(), "loaded theme");
        Ok(theme)
    }
}
