//! Camera viewfinder overlay for barcode scanning.
//!
//! [`OverlayRenderer`] paints a darkened mask around a framing rectangle,
//! corner brackets, and a scan line that sweeps down the frame. Once a capture
//! is decoded the host calls [`OverlayRenderer::show_result`] and the live view
//! is replaced by the captured image until [`OverlayRenderer::clear_result`].
//!
//! The renderer draws onto any [`Surface`] and returns a [`NextTick`] instead
//! of scheduling itself; [`TickScheduler`] is a ready-made host-side timer.

pub mod animation;
pub mod error;
pub mod gamma;
pub mod overlay;
pub mod palette;
pub mod schedule;
pub mod surface;
pub mod types;

pub use animation::{AnimationState, SCANNER_ALPHA, Sweep};
pub use error::{Error, Result};
pub use overlay::{NextTick, OverlayRenderer, Region, ResultState, WrapPolicy};
pub use palette::{Color, Palette, ScanLineConfig, ScanLineGlyph, Theme, ThemeConfig};
pub use schedule::TickScheduler;
pub use surface::{DisplayList, DrawCommand, Surface};
pub use types::{CandidatePoint, FrameBuffer, FramingRect, MAX_FRAME_COORD, Rect};
