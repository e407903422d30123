//! Bottom-left info ribbon for capacity and dimension callouts.

use kurbo::Point;

use crate::assets::font::FontBook;
use crate::compose::blit::{PremulRgba8, Raster};
use crate::config::RenderConfig;

const RIBBON_WIDTH_FRAC: f64 = 0.28;
const RIBBON_HEIGHT_PX: u32 = 64;
const RIBBON_PAD_PX: f32 = 12.0;
const RIBBON_FONT_PX: f32 = 36.0;
// Black at alpha 122, premultiplied.
const RIBBON_FILL: PremulRgba8 = [0, 0, 0, 122];
const SEPARATOR: &str = " \u{2022} ";

/// Join capacity and dimension texts, capacity first. `None` when both are
/// blank, which suppresses the ribbon entirely.
pub fn info_line(capacity: &str, dimensions: &str) -> Option<String> {
    let parts: Vec<&str> = [capacity.trim(), dimensions.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SEPARATOR))
    }
}

/// Semi-transparent dark box with the info text in white.
pub fn render_ribbon(cfg: &RenderConfig, book: &FontBook, text: &str) -> Raster {
    let box_w = (f64::from(cfg.frame_width) * RIBBON_WIDTH_FRAC) as u32;
    let mut ribbon = Raster::filled(box_w, RIBBON_HEIGHT_PX, RIBBON_FILL);
    let baseline = RIBBON_PAD_PX + book.body.ascent(RIBBON_FONT_PX);
    book.body.draw(
        &mut ribbon,
        RIBBON_PAD_PX,
        baseline,
        text,
        RIBBON_FONT_PX,
        [255, 255, 255],
    );
    ribbon
}

/// Anchor at the bottom-left safe-area inset.
pub fn ribbon_position(cfg: &RenderConfig) -> Point {
    let inset = f64::from(cfg.safe_inset_px);
    Point::new(
        inset,
        f64::from(cfg.frame_height) - f64::from(RIBBON_HEIGHT_PX) - inset,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_line_joins_capacity_first() {
        assert_eq!(
            info_line("1.5 L", "20x14 cm").as_deref(),
            Some("1.5 L \u{2022} 20x14 cm")
        );
    }

    #[test]
    fn info_line_with_one_side_has_no_separator() {
        assert_eq!(info_line("1.5 L", "").as_deref(), Some("1.5 L"));
        assert_eq!(info_line("", "20x14 cm").as_deref(), Some("20x14 cm"));
    }

    #[test]
    fn info_line_blank_inputs_suppress_ribbon() {
        assert_eq!(info_line("", ""), None);
        assert_eq!(info_line("   ", "\t"), None);
    }

    #[test]
    fn ribbon_box_tracks_frame_width() {
        let cfg = RenderConfig::default();
        let book = FontBook::builtin();
        let ribbon = render_ribbon(&cfg, &book, "500 ml");
        // 1920 * 0.28 = 537.6, truncated.
        assert_eq!(ribbon.width, 537);
        assert_eq!(ribbon.height, RIBBON_HEIGHT_PX);
    }

    #[test]
    fn ribbon_has_translucent_fill_and_white_text() {
        let cfg = RenderConfig::default();
        let book = FontBook::builtin();
        let ribbon = render_ribbon(&cfg, &book, "500 ml");
        assert_eq!(ribbon.pixel(ribbon.width - 1, ribbon.height - 1), RIBBON_FILL);
        let white = ribbon
            .data
            .chunks_exact(4)
            .any(|px| px[0] > 200 && px[1] > 200 && px[2] > 200 && px[3] == 255);
        assert!(white);
    }

    #[test]
    fn ribbon_sits_at_bottom_left_inset() {
        let cfg = RenderConfig::default();
        let pos = ribbon_position(&cfg);
        assert_eq!(pos, Point::new(48.0, 960.0 - 64.0 - 48.0));
    }
}
