//! The viewfinder overlay: exterior mask, corner brackets, sweeping scan line,
//! and the static result view shown once a capture has been decoded.
//!
//! The renderer never schedules itself. Every operation returns a [`NextTick`]
//! telling the host when (and how much of the surface) to repaint.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::animation::{AnimationState, Sweep};
use crate::palette::Theme;
use crate::surface::Surface;
use crate::types::{CandidatePoint, FramingRect, Rect};

/// Delay between scan-line frames.
pub const ANIMATION_DELAY: Duration = Duration::from_millis(100);
/// Opacity of the result image and candidate markers.
pub const CURRENT_POINT_OPACITY: u8 = 0xA0;
/// Paint opacity for the mask and corner brackets.
pub const OPAQUE: u8 = 0xFF;
/// Corner bracket arm thickness.
pub const BRACKET_THICKNESS: i32 = 5;
/// Corner bracket arm length.
pub const BRACKET_LENGTH: i32 = 60;
/// Side of the square drawn for each candidate point.
pub const CANDIDATE_MARKER_SIZE: i32 = 6;

/// Which part of the surface a redraw has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Full,
    Rect(Rect),
}

impl Region {
    /// Smallest region covering both.
    pub fn union(self, other: Region) -> Region {
        match (self, other) {
            (Region::Rect(a), Region::Rect(b)) => Region::Rect(a.union(&b)),
            _ => Region::Full,
        }
    }
}

/// The host's next job after a call into the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTick {
    /// Nothing to repaint until something else changes.
    None,
    /// Call `render_frame` again after `delay`, repainting `region`.
    After { delay: Duration, region: Region },
}

impl NextTick {
    pub const fn immediate_full() -> Self {
        NextTick::After { delay: Duration::ZERO, region: Region::Full }
    }
}

/// What to do on the tick where the scan line wraps back to the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapPolicy {
    /// Keep requesting frames; the sweep never stalls.
    #[default]
    Continuous,
    /// Skip the request on the wrap tick; animation resumes on the next outside redraw.
    PauseOnWrap,
}

#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Empty,
    HasImage(Arc<RgbaImage>),
}

#[derive(Debug)]
pub struct OverlayRenderer {
    theme: Theme,
    wrap_policy: WrapPolicy,
    animation: AnimationState,
    result: ResultState,
    candidates: HashSet<CandidatePoint>,
}

impl OverlayRenderer {
    pub fn new(theme: Theme) -> Self {
        Self::with_wrap_policy(theme, WrapPolicy::default())
    }

    pub fn with_wrap_policy(theme: Theme, wrap_policy: WrapPolicy) -> Self {
        Self {
            theme,
            wrap_policy,
            animation: AnimationState::new(),
            result: ResultState::Empty,
            candidates: HashSet::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap_policy
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn result_state(&self) -> &ResultState {
        &self.result
    }

    /// True while scanning (no result image shown).
    pub fn is_live(&self) -> bool {
        matches!(self.result, ResultState::Empty)
    }

    pub fn candidate_points(&self) -> &HashSet<CandidatePoint> {
        &self.candidates
    }

    /// Paint one frame of the overlay onto `surface`.
    ///
    /// With no framing rect nothing is drawn and no further frame is requested.
    pub fn render_frame<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        frame: Option<FramingRect>,
    ) -> NextTick {
        let Some(frame) = frame else {
            return NextTick::None;
        };

        let exterior = match self.result {
            ResultState::HasImage(_) => self.theme.palette.result,
            ResultState::Empty => self.theme.palette.mask,
        };
        let width = i32::try_from(surface.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(surface.height()).unwrap_or(i32::MAX);
        for rect in exterior_rects(width, height, &frame) {
            surface.fill_rect(rect, exterior, OPAQUE);
        }

        if let ResultState::HasImage(image) = &self.result {
            surface.draw_image(image, frame.rect(), CURRENT_POINT_OPACITY);
            return NextTick::None;
        }

        let palette = self.theme.palette;
        for rect in bracket_rects(&frame) {
            surface.fill_rect(rect, palette.frame, OPAQUE);
        }

        self.animation.fit(frame.height());
        let line = self.animation.line_bounds(&frame);
        let alpha = self.animation.alpha();
        match &self.theme.scan_line {
            Some(glyph) => surface.draw_image(glyph.image(), line, alpha),
            None => surface.fill_rect(line, palette.laser, alpha),
        }

        let half = CANDIDATE_MARKER_SIZE / 2;
        for p in self.candidates.iter().filter(|p| frame.rect().contains(p.x, p.y)) {
            let marker = Rect::new(p.x - half, p.y - half, p.x + half, p.y + half);
            surface.fill_rect(marker, palette.candidate_point, CURRENT_POINT_OPACITY);
        }

        let sweep = self.animation.tick(frame.height());
        tracing::trace!(
            offset = self.animation.scan_offset(),
            phase = self.animation.alpha_phase(),
            ?sweep,
            "overlay tick"
        );

        match (sweep, self.wrap_policy) {
            (Sweep::Wrapped, WrapPolicy::PauseOnWrap) => NextTick::None,
            _ => NextTick::After { delay: ANIMATION_DELAY, region: Region::Rect(frame.rect()) },
        }
    }

    /// Freeze the overlay on a captured image until `clear_result`.
    pub fn show_result(&mut self, image: Arc<RgbaImage>) -> NextTick {
        tracing::debug!(width = image.width(), height = image.height(), "showing result image");
        self.result = ResultState::HasImage(image);
        NextTick::immediate_full()
    }

    /// Back to live scanning with a fresh sweep; candidate points are dropped.
    pub fn clear_result(&mut self) -> NextTick {
        tracing::debug!(dropped_points = self.candidates.len(), "resuming live scan");
        self.result = ResultState::Empty;
        self.animation.restart_sweep();
        self.candidates.clear();
        NextTick::immediate_full()
    }

    /// Remember a provisional detection. Returns false if it was already known.
    /// Shown from the next `render_frame` on; does not request a redraw.
    pub fn add_candidate_point(&mut self, point: CandidatePoint) -> bool {
        self.candidates.insert(point)
    }

    pub fn clear_candidate_points(&mut self) {
        self.candidates.clear();
    }
}

/// The bands outside `frame` in order top, left, right, bottom, clipped to the
/// surface. Bands with no area (frame touching or past an edge) are left out.
fn exterior_rects(width: i32, height: i32, frame: &FramingRect) -> Vec<Rect> {
    let bounds = Rect::new(0, 0, width, height);
    [
        Rect::new(0, 0, width, frame.top()),
        Rect::new(0, frame.top(), frame.left(), frame.bottom()),
        Rect::new(frame.right(), frame.top(), width, frame.bottom()),
        Rect::new(0, frame.bottom(), width, height),
    ]
    .into_iter()
    .map(|band| band.intersect(&bounds))
    .filter(|band| !band.is_empty())
    .collect()
}

/// Two arms per corner, horizontal first.
fn bracket_rects(frame: &FramingRect) -> [Rect; 8] {
    let (l, t, r, b) = (frame.left(), frame.top(), frame.right(), frame.bottom());
    let (w, len) = (BRACKET_THICKNESS, BRACKET_LENGTH);
    [
        Rect::new(l, t, l + len, t + w),
        Rect::new(l, t, l + w, t + len),
        Rect::new(r - len, t, r, t + w),
        Rect::new(r - w, t, r, t + len),
        Rect::new(l, b - w, l + len, b),
        Rect::new(l, b - len, l + w, b),
        Rect::new(r - len, b - w, r, b),
        Rect::new(r - w, b - len, r, b),
    ]
}
