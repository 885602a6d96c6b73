// Every variant states *where* things went wrong.
// Drawing itself never fails; only construction and the viewer host do.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A framing rectangle with no area (left >= right or top >= bottom).
    #[error("Invalid framing rect: ({left}, {top}, {right}, {bottom})")]
    InvalidFramingRect {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
    /// A color string that is not `#RRGGBB` or `#AARRGGBB`.
    #[error("Invalid color {0:?}")]
    InvalidColor(String),
    /// Reading the theme file failed.
    #[error("Theme read error: {0}")]
    ThemeRead(#[from] std::io::Error),
    /// The theme file is not valid JSON for a theme.
    #[error("Theme parse error: {0}")]
    ThemeParse(#[from] serde_json::Error),
    /// Decoding a drawable asset (scan-line glyph) failed.
    #[error("Asset decode error: {0}")]
    AssetDecode(#[from] image::ImageError),
    #[error("Window init error: {0}")]
    WindowInit(String),
    #[error("Window update error: {0}")]
    WindowUpdate(String),
    #[error("Camera init error: {0}")]
    CameraInit(String),
    #[error("Camera frame error: {0}")]
    CameraFrame(String),
}
