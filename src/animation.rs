// Scan-line animation: where the line is and how bright it is this tick.
// Advanced only by `tick`, so the sweep can be tested without drawing anything.

use crate::types::{FramingRect, Rect};

/// Cyclic brightness of the scan line; one step per tick.
pub const SCANNER_ALPHA: [u8; 8] = [0, 64, 128, 192, 255, 192, 128, 64];
/// Pixels the line moves down per tick.
pub const SCAN_STEP: i32 = 5;
/// How far the line rect reaches past the frame on every side.
pub const LINE_HALF_THICKNESS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    scan_offset: i32,
    alpha_phase: usize,
    last_line_bounds: Option<Rect>,
}

/// What a single `tick` did to the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Advanced,
    /// The line ran off the bottom and restarted at the top.
    Wrapped,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance of the line from the top of the frame, in `[0, frame height)`.
    pub fn scan_offset(&self) -> i32 {
        self.scan_offset
    }

    pub fn alpha_phase(&self) -> usize {
        self.alpha_phase
    }

    pub fn alpha(&self) -> u8 {
        SCANNER_ALPHA[self.alpha_phase]
    }

    pub fn last_line_bounds(&self) -> Option<Rect> {
        self.last_line_bounds
    }

    /// Rect of the scan line for the current offset; remembered as the last bounds.
    pub fn line_bounds(&mut self, frame: &FramingRect) -> Rect {
        let y = frame.top() + self.scan_offset;
        let rect = Rect::new(
            frame.left() - LINE_HALF_THICKNESS,
            y - LINE_HALF_THICKNESS,
            frame.right() + LINE_HALF_THICKNESS,
            y + LINE_HALF_THICKNESS,
        );
        self.last_line_bounds = Some(rect);
        rect
    }

    /// Keep the offset inside a frame of `frame_height`; a frame that shrank
    /// since the last tick restarts the sweep from the top.
    pub fn fit(&mut self, frame_height: i32) {
        if self.scan_offset >= frame_height {
            self.scan_offset = 0;
        }
    }

    /// Advance one frame: next alpha step, line moves down, wraps at `frame_height`.
    pub fn tick(&mut self, frame_height: i32) -> Sweep {
        self.alpha_phase = (self.alpha_phase + 1) % SCANNER_ALPHA.len();
        self.scan_offset += SCAN_STEP;
        if self.scan_offset >= frame_height {
            self.scan_offset = 0;
            Sweep::Wrapped
        } else {
            Sweep::Advanced
        }
    }

    /// Restart the sweep from the top. Alpha phase keeps cycling.
    pub fn restart_sweep(&mut self) {
        self.scan_offset = 0;
        self.last_line_bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_wraps_after_ceil_height_over_step_ticks() {
        for height in [1, 4, 5, 7, 299, 300, 301] {
            let mut anim = AnimationState::new();
            let ticks = (height + SCAN_STEP - 1) / SCAN_STEP;
            for i in 1..ticks {
                assert_eq!(anim.tick(height), Sweep::Advanced, "height {height} tick {i}");
                assert!(anim.scan_offset() < height);
            }
            assert_eq!(anim.tick(height), Sweep::Wrapped, "height {height}");
            assert_eq!(anim.scan_offset(), 0);
        }
    }

    #[test]
    fn alpha_cycles_with_period_eight() {
        let mut anim = AnimationState::new();
        let seen: Vec<u8> = (0..16)
            .map(|_| {
                let a = anim.alpha();
                anim.tick(3);
                a
            })
            .collect();
        assert_eq!(&seen[..8], &SCANNER_ALPHA);
        assert_eq!(&seen[8..], &SCANNER_ALPHA);
    }

    #[test]
    fn line_bounds_straddle_the_offset() {
        let frame = FramingRect::new(100, 100, 300, 400).unwrap();
        let mut anim = AnimationState::new();
        anim.tick(frame.height());
        anim.tick(frame.height());
        let rect = anim.line_bounds(&frame);
        assert_eq!(rect, Rect::new(94, 104, 306, 116));
        assert_eq!(anim.last_line_bounds(), Some(rect));
    }

    #[test]
    fn fit_restarts_a_sweep_that_no_longer_fits() {
        let mut anim = AnimationState::new();
        for _ in 0..40 {
            anim.tick(300);
        }
        assert_eq!(anim.scan_offset(), 200);
        anim.fit(300);
        assert_eq!(anim.scan_offset(), 200);
        anim.fit(20);
        assert_eq!(anim.scan_offset(), 0);
        assert_eq!(anim.alpha_phase(), 0);
    }

    #[test]
    fn restart_keeps_alpha_phase() {
        let mut anim = AnimationState::new();
        anim.tick(100);
        anim.tick(100);
        anim.restart_sweep();
        assert_eq!(anim.scan_offset(), 0);
        assert_eq!(anim.alpha_phase(), 2);
    }
}
