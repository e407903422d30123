use crate::foundation::{
    error::{SlatecastError, SlatecastResult},
    math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of two premultiplied RGBA8 pixels with extra opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Owned premultiplied RGBA8 pixel buffer.
///
/// Layer bitmaps may be positioned partially or fully offscreen, so all draw
/// operations take signed coordinates and clip to the buffer bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Buffer filled with one premultiplied color.
    pub fn filled(width: u32, height: u32, color: PremulRgba8) -> Self {
        let px_count = width as usize * height as usize;
        let mut data = vec![0u8; px_count * 4];
        if color != [0, 0, 0, 0] {
            for px in data.chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> SlatecastResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(SlatecastError::render(format!(
                "raster data length {} does not match {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        debug_assert!(x < self.width && y < self.height);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Blend one pixel in place, ignoring out-of-bounds coordinates.
    pub fn blend_pixel(&mut self, x: i64, y: i64, src: PremulRgba8) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        self.data[i..i + 4].copy_from_slice(&over(dst, src, 1.0));
    }

    /// Blend an axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: PremulRgba8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for yy in y0..y1 {
            for xx in x0..x1 {
                self.blend_pixel(xx, yy, color);
            }
        }
    }

    /// Lanczos resample to the given size. Channels are premultiplied, so
    /// filtering them directly keeps transparent edges free of fringes.
    pub fn resized(&self, width: u32, height: u32) -> Raster {
        if (width, height) == (self.width, self.height) {
            return self.clone();
        }
        match image::RgbaImage::from_raw(self.width, self.height, self.data.clone()) {
            Some(img) => {
                let out = image::imageops::resize(
                    &img,
                    width.max(1),
                    height.max(1),
                    image::imageops::FilterType::Lanczos3,
                );
                Raster {
                    width: out.width(),
                    height: out.height(),
                    data: out.into_raw(),
                }
            }
            None => self.clone(),
        }
    }

    /// Source-over blit of `src` at (`x`, `y`), clipped to the buffer.
    pub fn blit_over(&mut self, src: &Raster, x: i64, y: i64, opacity: f32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width)).min(i64::from(self.width));
        let y1 = (y + i64::from(src.height)).min(i64::from(self.height));
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for yy in y0..y1 {
            let sy = (yy - y) as usize;
            let dst_row = (yy as usize * self.width as usize + x0 as usize) * 4;
            let src_row = (sy * src.width as usize + (x0 - x) as usize) * 4;
            let n = (x1 - x0) as usize * 4;

            let dst = &mut self.data[dst_row..dst_row + n];
            let srow = &src.data[src_row..src_row + n];
            for (d, s) in dst.chunks_exact_mut(4).zip(srow.chunks_exact(4)) {
                let blended = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
                d.copy_from_slice(&blended);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opacity_0_is_noop() {
        let dst = [1, 2, 3, 4];
        let src = [200, 200, 200, 200];
        assert_eq!(over(dst, src, 0.0), dst);
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src, 1.0), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn over_dst_transparent_returns_scaled_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn blit_fully_offscreen_is_noop() {
        let mut dst = Raster::filled(4, 4, [10, 10, 10, 255]);
        let src = Raster::filled(2, 2, [255, 0, 0, 255]);
        let before = dst.clone();

        dst.blit_over(&src, -2, 0, 1.0);
        dst.blit_over(&src, 4, 0, 1.0);
        dst.blit_over(&src, 0, -2, 1.0);
        dst.blit_over(&src, 0, 4, 1.0);
        assert_eq!(dst, before);
    }

    #[test]
    fn blit_clips_negative_offset() {
        let mut dst = Raster::new(4, 4);
        let src = Raster::filled(3, 3, [0, 255, 0, 255]);

        dst.blit_over(&src, -2, -2, 1.0);
        assert_eq!(dst.pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(dst.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(dst.pixel(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_clips_past_right_edge() {
        let mut dst = Raster::new(4, 4);
        let src = Raster::filled(3, 1, [0, 0, 255, 255]);

        dst.blit_over(&src, 2, 1, 1.0);
        assert_eq!(dst.pixel(2, 1), [0, 0, 255, 255]);
        assert_eq!(dst.pixel(3, 1), [0, 0, 255, 255]);
        assert_eq!(dst.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_rect_blends_semi_transparent_color() {
        let mut dst = Raster::filled(2, 2, [255, 255, 255, 255]);
        // Premultiplied black at alpha 122.
        dst.fill_rect(0, 0, 2, 1, [0, 0, 0, 122]);
        let px = dst.pixel(0, 0);
        assert_eq!(px[3], 255);
        assert_eq!(px[0], 133); // 255 - 122
        assert_eq!(dst.pixel(0, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn from_premul_rejects_bad_length() {
        assert!(Raster::from_premul_rgba8(2, 2, vec![0u8; 15]).is_err());
        assert!(Raster::from_premul_rgba8(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn zero_sized_raster_is_safe_to_draw_into() {
        let mut dst = Raster::new(0, 0);
        let src = Raster::filled(2, 2, [255, 0, 0, 255]);
        dst.blit_over(&src, 0, 0, 1.0);
        dst.fill_rect(0, 0, 2, 2, [1, 2, 3, 255]);
        assert!(dst.data.is_empty());
    }
}
