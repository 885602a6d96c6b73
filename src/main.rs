// What you SEE:
// • Live camera with a darkened mask around a centered framing rect,
//   corner brackets, and a red scan line sweeping down the frame.
// • Space freezes the frame contents as the "result" image; C resumes scanning.
// • Hold Left Mouse inside the frame to drop candidate point markers.
// • ESC quits.

mod camera;
mod draw;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use camera::{CameraCapture, CaptureFormat};
use clap::Parser;
use draw::{Drawer, draw_text_5x7};
use image::RgbaImage;
use scan_overlay::{
    CandidatePoint, Error, FramingRect, OverlayRenderer, Surface, Theme, TickScheduler, WrapPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Barcode scanner viewfinder overlay on a live camera feed", long_about = None)]
struct Cli {
    /// Camera index (0 = default webcam).
    #[arg(long, default_value_t = 0)]
    camera: u32,
    /// Requested capture width; the camera may pick the closest it supports.
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Requested capture height.
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Requested capture frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Pixel encoding requested from the camera.
    #[arg(long, value_enum, default_value_t = CaptureFormat::Yuyv)]
    format: CaptureFormat,
    /// Framing rect width, centered on the image.
    #[arg(long, default_value_t = 300)]
    frame_width: u32,
    /// Framing rect height.
    #[arg(long, default_value_t = 300)]
    frame_height: u32,
    /// JSON theme with overlay colors and scan-line style.
    #[arg(short, long)]
    theme: Option<PathBuf>,
    /// Stop requesting frames when the scan line wraps.
    #[arg(long)]
    pause_on_wrap: bool,
}

fn main() -> Result<(), Error> {
    init_tracing();
    let cli = Cli::parse();

    let theme = match &cli.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::default(),
    };
    let policy = if cli.pause_on_wrap { WrapPolicy::PauseOnWrap } else { WrapPolicy::Continuous };
    let mut overlay = OverlayRenderer::with_wrap_policy(theme, policy);

    let mut cam = CameraCapture::new(cli.camera, cli.width, cli.height, cli.fps, cli.format)?;
    let (w, h) = cam.resolution();
    let frame = FramingRect::centered(w, h, cli.frame_width.min(w), cli.frame_height.min(h))?;
    let mut drawer = Drawer::new("Scan Overlay", w as usize, h as usize)?;
    tracing::info!(?frame, ?policy, "viewer ready");

    // The overlay keeps its own transparent layer, repainted only when due,
    // and composited over every camera frame.
    let mut layer = RgbaImage::new(w, h);
    let mut scheduler = TickScheduler::new(Instant::now());

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let mut screen = cam.next_frame()?;

        /* Inputs */
        if drawer.space_pressed_once() && overlay.is_live() {
            let r = frame.rect();
            let full = screen.to_rgba_image();
            let capture = image::imageops::crop_imm(
                &full,
                r.left.max(0) as u32,
                r.top.max(0) as u32,
                r.width() as u32,
                r.height() as u32,
            )
            .to_image();
            scheduler.schedule(overlay.show_result(Arc::new(capture)), now);
        }
        if drawer.c_pressed_once() && !overlay.is_live() {
            scheduler.schedule(overlay.clear_result(), now);
        }
        if drawer.left_mouse_down() {
            if let Some((mx, my)) = drawer.mouse_pos() {
                if frame.rect().contains(mx, my) && overlay.add_candidate_point(CandidatePoint::new(mx, my)) {
                    tracing::debug!(x = mx, y = my, "candidate point");
                }
            }
        }

        /* Overlay tick */
        if let Some(region) = scheduler.take_due(now) {
            tracing::trace!(?region, "overlay redraw");
            layer.pixels_mut().for_each(|p| p.0 = [0, 0, 0, 0]);
            let next = overlay.render_frame(&mut layer, Some(frame));
            scheduler.schedule(next, now);
        }

        /* Composite + HUD */
        let bounds = screen.bounds();
        screen.draw_image(&layer, bounds, 0xFF);

        let status = if overlay.is_live() { "LIVE" } else { "RESULT" };
        let hud = format!("{} | PTS: {} | {}", status, overlay.candidate_points().len(), hud_fps_text);
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            tracing::info!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_options_reach_the_cli() {
        let cli = Cli::try_parse_from(["scan-viewer", "--format", "mjpeg", "--fps", "15"]).unwrap();
        assert_eq!(cli.format, CaptureFormat::Mjpeg);
        assert_eq!(cli.fps, 15);
        assert_eq!((cli.width, cli.height), (640, 480));
    }

    #[test]
    fn capture_defaults_to_uncompressed_30_fps() {
        let cli = Cli::try_parse_from(["scan-viewer"]).unwrap();
        assert_eq!(cli.format, CaptureFormat::Yuyv);
        assert_eq!(cli.fps, 30);
        assert!(!cli.pause_on_wrap);
    }
}
