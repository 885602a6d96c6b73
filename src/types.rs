// Core geometry and pixel types shared by the renderer and its hosts.

use crate::error::{Error, Result};
use image::RgbImage;

/// Axis-aligned rectangle in surface pixels, right/bottom exclusive.
/// May extend past the surface (the scan line pokes 6 px outside the frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Overlap of two rects; empty when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Largest coordinate magnitude a framing rect may use. Leaves headroom for the
/// bracket arms, the scan line margin and the sweep step without overflowing `i32`.
pub const MAX_FRAME_COORD: i32 = 1 << 28;

/// The active scan region for one tick. Always has positive width and height,
/// with every edge within `±MAX_FRAME_COORD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramingRect(Rect);

impl FramingRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self> {
        let rect = Rect::new(left, top, right, bottom);
        let in_range = [left, top, right, bottom]
            .iter()
            .all(|c| (-MAX_FRAME_COORD..=MAX_FRAME_COORD).contains(c));
        if rect.is_empty() || !in_range {
            return Err(Error::InvalidFramingRect { left, top, right, bottom });
        }
        Ok(Self(rect))
    }

    /// A `width` x `height` frame centered on a `surface_w` x `surface_h` surface.
    pub fn centered(surface_w: u32, surface_h: u32, width: u32, height: u32) -> Result<Self> {
        let (sw, sh, w, h) = (surface_w as i64, surface_h as i64, width as i64, height as i64);
        let left = (sw - w) / 2;
        let top = (sh - h) / 2;
        let coord = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Self::new(coord(left), coord(top), coord(left + w), coord(top + h))
    }

    pub fn rect(&self) -> Rect {
        self.0
    }

    pub fn left(&self) -> i32 {
        self.0.left
    }

    pub fn top(&self) -> i32 {
        self.0.top
    }

    pub fn right(&self) -> i32 {
        self.0.right
    }

    pub fn bottom(&self) -> i32 {
        self.0.bottom
    }

    pub fn width(&self) -> i32 {
        self.0.width()
    }

    pub fn height(&self) -> i32 {
        self.0.height()
    }
}

/// A provisional barcode feature reported by the decoder, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidatePoint {
    pub x: i32,
    pub y: i32,
}

impl CandidatePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer filled with one 0x00RRGGBB color.
    pub fn filled(width: usize, height: usize, rgb: u32) -> Self {
        Self { width, height, pixels: vec![rgb & 0x00FF_FFFF; width * height] }
    }

    /// Pack an RGB image into 0x00RRGGBB pixels.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Unpack into an RGBA image (fully opaque), e.g. to hand a capture to `show_result`.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            image::Rgba([(px >> 16) as u8, (px >> 8) as u8, px as u8, 0xFF])
        })
    }

    /// Pixel at (x, y), if inside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_rect_rejects_empty_area() {
        assert!(FramingRect::new(10, 10, 10, 20).is_err());
        assert!(FramingRect::new(10, 30, 20, 20).is_err());
        let f = FramingRect::new(100, 100, 300, 400).unwrap();
        assert_eq!((f.width(), f.height()), (200, 300));
    }

    #[test]
    fn framing_rect_rejects_coordinates_near_the_i32_limits() {
        assert!(FramingRect::new(i32::MAX - 10, 0, i32::MAX - 1, 50).is_err());
        assert!(FramingRect::new(i32::MIN, 0, i32::MAX, 1).is_err());
        assert!(FramingRect::new(0, 0, MAX_FRAME_COORD, MAX_FRAME_COORD).is_ok());
        assert!(FramingRect::new(-MAX_FRAME_COORD, 0, MAX_FRAME_COORD + 1, 1).is_err());
        assert!(FramingRect::centered(u32::MAX, 10, 5, 5).is_err());
    }

    #[test]
    fn extreme_rect_sizes_saturate() {
        let r = Rect::new(i32::MIN, 0, i32::MAX, 1);
        assert_eq!(r.width(), i32::MAX);
        assert_eq!(r.height(), 1);
    }

    #[test]
    fn centered_frame_sits_in_the_middle() {
        let f = FramingRect::centered(640, 480, 200, 100).unwrap();
        assert_eq!(f.rect(), Rect::new(220, 190, 420, 290));
    }

    #[test]
    fn intersect_of_disjoint_rects_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.union(&b), Rect::new(0, 0, 30, 30));
    }

    #[test]
    fn rgb_image_round_trips_through_frame_buffer() {
        let img = RgbImage::from_pixel(3, 2, image::Rgb([0x12, 0x34, 0x56]));
        let fb = FrameBuffer::from_rgb_image(&img);
        assert_eq!(fb.get(2, 1), Some(0x0012_3456));
        assert_eq!(fb.get(3, 0), None);
        assert_eq!(fb.to_rgba_image().get_pixel(0, 0).0, [0x12, 0x34, 0x56, 0xFF]);
    }
}
