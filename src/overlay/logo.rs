//! Logo scaling and corner placement.

use kurbo::Point;

use crate::compose::blit::Raster;
use crate::config::{LogoCorner, RenderConfig};

/// Cap the logo width at the configured fraction of the frame width.
/// Logos already under the cap keep their original size, never upscaled.
pub fn scale_logo(logo: &Raster, cfg: &RenderConfig) -> Raster {
    if logo.width == 0 || logo.height == 0 {
        return logo.clone();
    }
    let cap = f64::from(cfg.frame_width) * cfg.logo_max_width_frac;
    let scale = (cap / f64::from(logo.width)).min(1.0);
    if scale >= 1.0 {
        return logo.clone();
    }

    let nw = ((f64::from(logo.width) * scale) as u32).max(1);
    let nh = ((f64::from(logo.height) * scale) as u32).max(1);
    logo.resized(nw, nh)
}

/// Top-left corner for the logo layer, inset by the margin on both edges.
pub fn logo_position(cfg: &RenderConfig, logo_width: u32) -> Point {
    let margin = f64::from(cfg.logo_margin_px);
    match cfg.logo_corner {
        LogoCorner::TopRight => Point::new(
            f64::from(cfg.frame_width) - f64::from(logo_width) - margin,
            margin,
        ),
        LogoCorner::TopLeft => Point::new(margin, margin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_logo_is_capped_to_frame_fraction() {
        let cfg = RenderConfig::default();
        let logo = Raster::filled(1000, 500, [10, 20, 30, 255]);
        let scaled = scale_logo(&logo, &cfg);
        // 18% of 1920 is 345.6, truncated like the resize itself.
        assert_eq!(scaled.width, 345);
        assert_eq!(scaled.height, 172);
    }

    #[test]
    fn small_logo_is_never_upscaled() {
        let cfg = RenderConfig::default();
        let logo = Raster::filled(120, 80, [10, 20, 30, 255]);
        let scaled = scale_logo(&logo, &cfg);
        assert_eq!((scaled.width, scaled.height), (120, 80));
        assert_eq!(scaled.data, logo.data);
    }

    #[test]
    fn top_right_position_insets_both_edges() {
        let cfg = RenderConfig::default();
        let pos = logo_position(&cfg, 300);
        assert_eq!(pos, Point::new(1920.0 - 300.0 - 28.0, 28.0));
    }

    #[test]
    fn top_left_position_is_margin_square() {
        let cfg = RenderConfig {
            logo_corner: LogoCorner::TopLeft,
            ..RenderConfig::default()
        };
        assert_eq!(logo_position(&cfg, 300), Point::new(28.0, 28.0));
    }
}
