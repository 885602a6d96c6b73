use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use scan_overlay::{
    CandidatePoint, DisplayList, FrameBuffer, FramingRect, NextTick, OverlayRenderer, Palette,
    Region, Theme, TickScheduler,
};

fn frame() -> FramingRect {
    FramingRect::new(100, 100, 300, 400).unwrap()
}

#[test]
fn scan_offset_returns_to_zero_after_ceil_h_over_5_frames() {
    for h in [1, 9, 10, 11, 123, 300] {
        let f = FramingRect::new(0, 0, 50, h).unwrap();
        let mut overlay = OverlayRenderer::new(Theme::default());
        let ticks = (h + 4) / 5;
        for _ in 0..ticks {
            assert!(overlay.is_live());
            overlay.render_frame(&mut DisplayList::new(64, 512), Some(f));
        }
        assert_eq!(overlay.animation().scan_offset(), 0, "height {h}");
    }
}

#[test]
fn alpha_phase_period_ignores_frame_size() {
    for h in [3, 40, 1000] {
        let f = FramingRect::new(0, 0, 10, h).unwrap();
        let mut overlay = OverlayRenderer::new(Theme::default());
        let first = overlay.animation().alpha();
        for _ in 0..8 {
            overlay.render_frame(&mut DisplayList::new(10, 10), Some(f));
        }
        assert_eq!(overlay.animation().alpha(), first);
        assert_eq!(overlay.animation().alpha_phase(), 0);
    }
}

#[test]
fn live_result_live_round_trip_on_a_frame_buffer() {
    let palette = Palette::default();
    let mut overlay = OverlayRenderer::new(Theme::default());
    let mut fb = FrameBuffer::filled(480, 640, 0x00FF_FFFF);

    overlay.render_frame(&mut fb, Some(frame()));
    // bracket corner is opaque frame color
    assert_eq!(fb.get(100, 100), Some(palette.frame.0 & 0x00FF_FFFF));
    // exterior darkened, interior untouched away from brackets and line
    let outside = fb.get(10, 10).unwrap();
    assert!(outside < 0x00FF_FFFF);
    assert_eq!(fb.get(200, 250), Some(0x00FF_FFFF));

    let capture = RgbaImage::from_pixel(20, 30, Rgba([0, 0, 0, 255]));
    overlay.show_result(Arc::new(capture));
    let mut fb = FrameBuffer::filled(480, 640, 0x00FF_FFFF);
    assert_eq!(overlay.render_frame(&mut fb, Some(frame())), NextTick::None);
    // result color is darker than the live mask
    assert!(fb.get(10, 10).unwrap() < outside);
    // image at 160/255 darkens the frame interior without fully replacing it
    let inside = fb.get(200, 250).unwrap();
    assert!(inside > 0 && inside < 0x00FF_FFFF);

    overlay.clear_result();
    let mut list = DisplayList::new(480, 640);
    overlay.render_frame(&mut list, Some(frame()));
    assert_eq!(list.image_blits(), 0);
    assert_eq!(list.fills_with(palette.frame).len(), 8);
}

#[test]
fn absent_frame_is_inert_in_both_states() {
    let mut overlay = OverlayRenderer::new(Theme::default());
    let mut list = DisplayList::new(100, 100);
    assert_eq!(overlay.render_frame(&mut list, None), NextTick::None);
    overlay.show_result(Arc::new(RgbaImage::new(2, 2)));
    assert_eq!(overlay.render_frame(&mut list, None), NextTick::None);
    assert!(list.is_empty());
}

#[test]
fn candidate_points_do_not_request_redraws() {
    let t0 = Instant::now();
    let mut sched = TickScheduler::new(t0);
    sched.take_due(t0);
    let mut overlay = OverlayRenderer::new(Theme::default());
    overlay.add_candidate_point(CandidatePoint::new(120, 130));
    overlay.add_candidate_point(CandidatePoint::new(120, 130));
    assert!(sched.is_idle());
    assert_eq!(overlay.candidate_points().len(), 1);
}

#[test]
fn host_loop_keeps_sweeping_across_the_wrap() {
    let small = FramingRect::new(0, 0, 20, 10).unwrap();
    let mut overlay = OverlayRenderer::new(Theme::default());
    let mut now = Instant::now();
    let mut sched = TickScheduler::new(now);
    let mut painted = 0;

    for _ in 0..50 {
        if let Some(region) = sched.take_due(now) {
            if painted > 0 {
                assert_eq!(region, Region::Rect(small.rect()));
            }
            let next = overlay.render_frame(&mut DisplayList::new(40, 40), Some(small));
            sched.schedule(next, now);
            painted += 1;
        }
        now += Duration::from_millis(50);
    }
    // one paint every 100 ms, never stalling on the wrap
    assert_eq!(painted, 25);
}

#[test]
fn bundled_theme_loads_with_a_gradient_line() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("themes/green.json");
    let theme = Theme::load(&path).unwrap();
    assert_eq!(theme.palette.frame, scan_overlay::Color(0xFFF9_0000));

    let mut overlay = OverlayRenderer::new(theme);
    let mut list = DisplayList::new(480, 640);
    overlay.render_frame(&mut list, Some(frame()));
    assert_eq!(list.image_blits(), 1);
}
