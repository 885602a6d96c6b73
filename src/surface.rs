// Drawing targets for the overlay.
// The renderer only ever issues two primitives: filled rects and image blits.

use std::borrow::Cow;
use std::sync::OnceLock;

use image::{Rgba, RgbaImage};
use image::imageops::{self, FilterType};

use crate::gamma::GammaLut;
use crate::palette::Color;
use crate::types::{FrameBuffer, Rect};

/// Anything the overlay can be painted onto.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill `rect` with `color`; the color's own alpha is scaled by `alpha` (0..=255).
    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    /// Stretch `image` to exactly cover `dst`, composited at `alpha` (0..=255).
    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8);
}

/// Combined coverage of a source alpha and a paint alpha.
#[inline]
fn coverage(src_a: u8, alpha: u8) -> u8 {
    ((src_a as u32 * alpha as u32 + 127) / 255) as u8
}

fn lut() -> &'static GammaLut {
    static LUT: OnceLock<GammaLut> = OnceLock::new();
    LUT.get_or_init(GammaLut::new)
}

impl Surface for FrameBuffer {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        let a = coverage(color.a(), alpha);
        let clip = rect.intersect(&self.bounds());
        if clip.is_empty() || a == 0 {
            return;
        }
        let src = [color.r(), color.g(), color.b()];
        let lut = lut();
        for y in clip.top..clip.bottom {
            let row = y as usize * self.width;
            for x in clip.left..clip.right {
                let idx = row + x as usize;
                self.pixels[idx] = lut.blend_over(self.pixels[idx], src, a);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        let clip = dst.intersect(&self.bounds());
        if clip.is_empty() || alpha == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let (dw, dh) = (dst.width() as u32, dst.height() as u32);
        let scaled: Cow<'_, RgbaImage> = if image.dimensions() == (dw, dh) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(image, dw, dh, FilterType::Triangle))
        };

        let lut = lut();
        for y in clip.top..clip.bottom {
            let row = y as usize * self.width;
            let sy = (y - dst.top) as u32;
            for x in clip.left..clip.right {
                let sx = (x - dst.left) as u32;
                let px = scaled.get_pixel(sx, sy);
                let idx = row + x as usize;
                self.pixels[idx] =
                    lut.blend_over(self.pixels[idx], [px[0], px[1], px[2]], coverage(px[3], alpha));
            }
        }
    }
}

/// Straight-alpha source-over of `src` (with coverage `a`) onto an RGBA pixel.
fn blend_rgba(dst: &mut Rgba<u8>, src: [u8; 3], a: u8) {
    if a == 0 {
        return;
    }
    let sa = a as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for ch in 0..3 {
        let mixed = (src[ch] as f32 * sa + dst[ch] as f32 * da * (1.0 - sa)) / out_a;
        dst[ch] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// A transparent overlay layer, composited over the camera image by the host.
impl Surface for RgbaImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        let a = coverage(color.a(), alpha);
        let bounds = Rect::new(0, 0, self.width() as i32, self.height() as i32);
        let clip = rect.intersect(&bounds);
        if clip.is_empty() || a == 0 {
            return;
        }
        let src = [color.r(), color.g(), color.b()];
        for y in clip.top..clip.bottom {
            for x in clip.left..clip.right {
                blend_rgba(self.get_pixel_mut(x as u32, y as u32), src, a);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        let bounds = Rect::new(0, 0, self.width() as i32, self.height() as i32);
        let clip = dst.intersect(&bounds);
        if clip.is_empty() || alpha == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let (dw, dh) = (dst.width() as u32, dst.height() as u32);
        let scaled = imageops::resize(image, dw, dh, FilterType::Triangle);
        for y in clip.top..clip.bottom {
            for x in clip.left..clip.right {
                let px = *scaled.get_pixel((x - dst.left) as u32, (y - dst.top) as u32);
                let a = coverage(px[3], alpha);
                blend_rgba(self.get_pixel_mut(x as u32, y as u32), [px[0], px[1], px[2]], a);
            }
        }
    }
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color, alpha: u8 },
    DrawImage { dst: Rect, image_size: (u32, u32), alpha: u8 },
}

/// A surface that only records what was asked of it.
/// Hosts with their own paint pipeline can translate the commands.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Fill rects painted in `color`, in issue order.
    pub fn fills_with(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color: c, .. } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn image_blits(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::DrawImage { .. }))
            .count()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        self.commands.push(DrawCommand::FillRect { rect, color, alpha });
    }

    fn draw_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        self.commands.push(DrawCommand::DrawImage { dst, image_size: image.dimensions(), alpha });
    }
}
