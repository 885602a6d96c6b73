// Speeds up gamma-correct blending by replacing powf with table lookups.
// Visual: translucent mask and scan line mix with the camera image without dark fringes.

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables once.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Source-over of one `[r, g, b]` onto a 0x00RRGGBB pixel with coverage `a` in 0..=255.
    /// a = 0 keeps `dst`, a = 255 replaces it.
    #[inline]
    pub fn blend_over(&self, dst: u32, src: [u8; 3], a: u8) -> u32 {
        match a {
            0 => return dst,
            255 => return ((src[0] as u32) << 16) | ((src[1] as u32) << 8) | src[2] as u32,
            _ => {}
        }
        let a = a as f32 / 255.0;
        let inv = 1.0 - a;
        let dst_rgb = [(dst >> 16) as u8, (dst >> 8) as u8, dst as u8];

        let mut out = 0u32;
        for ch in 0..3 {
            let lin = a * self.srgb_u8_to_linear(src[ch]) + inv * self.srgb_u8_to_linear(dst_rgb[ch]);
            out = (out << 8) | self.linear_to_srgb_u8(lin) as u32;
        }
        out
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_round_trips_every_srgb_value() {
        let lut = GammaLut::new();
        for v in 0..=255u8 {
            assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(v)), v);
        }
    }

    #[test]
    fn blend_extremes_keep_or_replace() {
        let lut = GammaLut::new();
        assert_eq!(lut.blend_over(0x0011_2233, [0xFF, 0, 0], 0), 0x0011_2233);
        assert_eq!(lut.blend_over(0x0011_2233, [0xFF, 0, 0], 255), 0x00FF_0000);
    }

    #[test]
    fn half_coverage_lands_between() {
        let lut = GammaLut::new();
        let px = lut.blend_over(0x0000_0000, [0xFF, 0xFF, 0xFF], 128);
        let r = (px >> 16) & 0xFF;
        assert!(r > 0x80 && r < 0xFF, "linear-light mix is brighter than sRGB midpoint, got {r:#x}");
        assert_eq!(px & 0xFF, r);
    }
}
