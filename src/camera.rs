// Opens a camera and converts frames into a buffer suitable for the window.
// Visual expectation: `next_frame()` hands back the live image the overlay is drawn on.

use scan_overlay::{Error, FrameBuffer};

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};

/// Pixel encoding asked of the camera before RGB conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CaptureFormat {
    /// Uncompressed; cheap to convert, limited frame rate at high resolutions.
    Yuyv,
    /// Compressed; most webcams reach 30 FPS at 720p and above only this way.
    Mjpeg,
}

impl CaptureFormat {
    fn frame_format(self) -> FrameFormat {
        match self {
            CaptureFormat::Yuyv => FrameFormat::YUYV,
            CaptureFormat::Mjpeg => FrameFormat::MJPEG,
        }
    }
}

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution, encoding and frame rate.
    /// The driver picks the closest mode it has; `resolution()` reports what it chose.
    pub fn new(
        index: u32,
        width: u32,
        height: u32,
        fps: u32,
        format: CaptureFormat,
    ) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(Resolution::new(width, height), format.frame_format(), fps);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might choose a slightly different resolution.
        let actual = cam.resolution();
        let actual_format = cam.camera_format();
        tracing::info!(
            index,
            width = actual.width(),
            height = actual.height(),
            fps = actual_format.frame_rate(),
            format = ?actual_format.format(),
            "camera stream open"
        );
        if actual_format.format() != format.frame_format() {
            tracing::warn!(requested = ?format, "camera fell back to another pixel format");
        }

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame (blocks until ready) as 0x00RRGGBB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Packed by hand: nokhwa's image version need not match ours.
        let (w, h) = rgb_img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for (_x, _y, pixel) in rgb_img.enumerate_pixels() {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            pixels.push((r << 16) | (g << 8) | b);
        }
        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
