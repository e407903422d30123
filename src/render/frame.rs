//! Rasterizing a slide at a point in time.

use crate::compose::blit::Raster;
use crate::compose::slide::SlideClip;

/// One rendered frame. `data` is tightly packed RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Paint the background and blend every layer at its position for `t_sec`.
pub fn render_clip_frame(clip: &SlideClip, t_sec: f64) -> FrameRGBA {
    let mut canvas = Raster::filled(clip.width, clip.height, clip.background);
    for layer in &clip.layers {
        let pos = layer.motion.position_at(t_sec);
        canvas.blit_over(&layer.raster, pos.x.round() as i64, pos.y.round() as i64, 1.0);
    }
    FrameRGBA {
        width: clip.width,
        height: clip.height,
        data: canvas.data,
        premultiplied: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::slide::{LayerMotion, SlideLayer};
    use kurbo::Point;

    fn solid_layer(w: u32, h: u32, color: [u8; 4], motion: LayerMotion) -> SlideLayer {
        SlideLayer {
            raster: Raster::filled(w, h, color),
            motion,
        }
    }

    #[test]
    fn empty_clip_is_solid_background() {
        let clip = SlideClip {
            width: 8,
            height: 4,
            background: [255, 255, 255, 255],
            duration_sec: 1.0,
            layers: Vec::new(),
        };
        let frame = render_clip_frame(&clip, 0.5);
        assert_eq!(frame.data.len(), 8 * 4 * 4);
        assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
    }

    #[test]
    fn moving_layer_lands_at_rest_after_window() {
        let clip = SlideClip {
            width: 16,
            height: 4,
            background: [255, 255, 255, 255],
            duration_sec: 5.0,
            layers: vec![solid_layer(
                4,
                4,
                [0, 0, 0, 255],
                LayerMotion::SlideIn {
                    from: Point::new(16.0, 0.0),
                    to: Point::new(4.0, 0.0),
                    window_sec: 0.6,
                },
            )],
        };

        // Start: layer fully offscreen right, frame stays white.
        let start = render_clip_frame(&clip, 0.0);
        assert!(start.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));

        // After the entrance window the layer covers x in [4, 8).
        let settled = render_clip_frame(&clip, 1.0);
        let px = |x: u32| {
            let i = (x as usize) * 4;
            [settled.data[i], settled.data[i + 1], settled.data[i + 2], settled.data[i + 3]]
        };
        assert_eq!(px(3), [255, 255, 255, 255]);
        assert_eq!(px(4), [0, 0, 0, 255]);
        assert_eq!(px(7), [0, 0, 0, 255]);
        assert_eq!(px(8), [255, 255, 255, 255]);
    }

    #[test]
    fn layers_composite_back_to_front() {
        let clip = SlideClip {
            width: 4,
            height: 4,
            background: [255, 255, 255, 255],
            duration_sec: 1.0,
            layers: vec![
                solid_layer(
                    4,
                    4,
                    [255, 0, 0, 255],
                    LayerMotion::Static { pos: Point::new(0.0, 0.0) },
                ),
                solid_layer(
                    2,
                    2,
                    [0, 0, 255, 255],
                    LayerMotion::Static { pos: Point::new(0.0, 0.0) },
                ),
            ],
        };
        let frame = render_clip_frame(&clip, 0.0);
        assert_eq!(&frame.data[0..4], &[0, 0, 255, 255]);
        let bottom_right = (3 * 4 + 3) * 4;
        assert_eq!(&frame.data[bottom_right..bottom_right + 4], &[255, 0, 0, 255]);
    }
}
