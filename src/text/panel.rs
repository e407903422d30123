//! Left-panel typesetting.
//!
//! The panel is a transparent bitmap the full frame height and the
//! configured fraction of the frame width. The title is case-transformed,
//! wrapped greedily to the padded width, and stacked from the top. The
//! first three non-empty bullets follow after a gap, each on one line: an
//! arrow glyph in the accent color, then the clamped bullet text.

use crate::assets::font::{FontBook, Typeface};
use crate::compose::blit::Raster;
use crate::config::RenderConfig;
use crate::foundation::error::SlatecastResult;

const ARROW: &str = "\u{27A4}";
const ARROW_TEXT_GAP_PX: f32 = 18.0;
const TEXT_COLOR: [u8; 3] = [0, 0, 0];
const MAX_BULLETS: usize = 3;

/// Truncate to at most `max_words` whitespace-delimited tokens.
pub fn clamp_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy line-fill against the rendered width of each candidate line.
///
/// A single word wider than `max_width` still gets its own line, so the
/// wrap always terminates and never drops text.
pub fn wrap_text(text: &str, face: &Typeface, px: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if face.measure(&candidate, px) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// The text a panel will draw, after case transform, wrap, and clamping.
pub struct PanelLayout {
    pub title_lines: Vec<String>,
    pub bullets: Vec<String>,
}

pub fn layout_panel(
    cfg: &RenderConfig,
    book: &FontBook,
    title: &str,
    bullets: &[String],
) -> PanelLayout {
    let wrap_width =
        (f64::from(cfg.panel_width()) - 2.0 * f64::from(cfg.edge_padding_px)).max(0.0) as f32;
    let cased = cfg.title_case.apply(title);
    let title_lines = wrap_text(&cased, &book.title, cfg.title_font_px, wrap_width);
    let bullets = bullets
        .iter()
        .map(|b| clamp_words(b, cfg.max_words_per_bullet))
        .filter(|b| !b.is_empty())
        .take(MAX_BULLETS)
        .collect();
    PanelLayout {
        title_lines,
        bullets,
    }
}

/// Typeset the full panel bitmap.
pub fn render_text_panel(
    cfg: &RenderConfig,
    book: &FontBook,
    title: &str,
    bullets: &[String],
) -> SlatecastResult<Raster> {
    let layout = layout_panel(cfg, book, title, bullets);
    let mut panel = Raster::new(cfg.panel_width(), cfg.frame_height);

    let pad = cfg.edge_padding_px as f32;
    let line_gap = cfg.line_spacing_px as f32;
    let accent = cfg.bullet_rgb()?;

    let title_px = cfg.title_font_px;
    let title_line_h = book.title.line_height(title_px);
    let title_ascent = book.title.ascent(title_px);

    let mut y = pad;
    for line in &layout.title_lines {
        book.title
            .draw(&mut panel, pad, y + title_ascent, line, title_px, TEXT_COLOR);
        y += title_line_h + line_gap;
    }
    y += line_gap;

    let body_px = cfg.body_font_px;
    let body_line_h = book.body.line_height(body_px);
    let body_ascent = book.body.ascent(body_px);
    let arrow_w = book.body.measure(ARROW, body_px);

    for bullet in &layout.bullets {
        let baseline = y + body_ascent;
        book.body.draw(&mut panel, pad, baseline, ARROW, body_px, accent);
        book.body.draw(
            &mut panel,
            pad + arrow_w + ARROW_TEXT_GAP_PX,
            baseline,
            bullet,
            body_px,
            TEXT_COLOR,
        );
        y += body_line_h + line_gap;
    }

    Ok(panel)
}
