//! Typeface loading and glyph drawing.
//!
//! Slides typeset two faces, a bold title face and a regular body face.
//! Faces come from the configured paths when given, otherwise from a short
//! list of common system font locations. When no TrueType face can be found
//! at all we fall back to a built-in 5x7 bitmap font so rendering still
//! produces legible output instead of failing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::compose::blit::Raster;
use crate::config::RenderConfig;
use crate::foundation::math::mul_div255_u8;

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

/// The two faces a slide is typeset with.
pub struct FontBook {
    pub title: Typeface,
    pub body: Typeface,
}

impl FontBook {
    /// Resolve both faces. Never fails: missing or unreadable fonts degrade
    /// to the next candidate and finally to the built-in bitmap face.
    pub fn load(cfg: &RenderConfig) -> Self {
        Self {
            title: load_typeface(cfg.title_font_path.as_deref(), BOLD_CANDIDATES, "title"),
            body: load_typeface(cfg.body_font_path.as_deref(), REGULAR_CANDIDATES, "body"),
        }
    }

    /// Both faces forced to the built-in bitmap font.
    pub fn builtin() -> Self {
        Self {
            title: Typeface::Builtin,
            body: Typeface::Builtin,
        }
    }
}

fn load_typeface(configured: Option<&Path>, candidates: &[&str], role: &str) -> Typeface {
    let mut paths: Vec<PathBuf> = Vec::new();
    if let Some(p) = configured {
        paths.push(p.to_path_buf());
    }
    paths.extend(candidates.iter().map(PathBuf::from));

    for (i, path) in paths.iter().enumerate() {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(err) => {
                // Only the explicitly configured path is worth a warning.
                if i == 0 && configured.is_some() {
                    warn!(%role, path = %path.display(), %err, "configured font not readable");
                }
                continue;
            }
        };
        match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
            Ok(font) => {
                debug!(%role, path = %path.display(), "loaded typeface");
                return Typeface::Loaded(font);
            }
            Err(err) => {
                warn!(%role, path = %path.display(), %err, "font file not parseable");
            }
        }
    }

    warn!(%role, "no system font found, using built-in bitmap face");
    Typeface::Builtin
}

/// A single face: either a parsed TrueType font or the bitmap fallback.
pub enum Typeface {
    Loaded(fontdue::Font),
    Builtin,
}

impl Typeface {
    /// Advance width of `text` at `px`, in pixels.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            Typeface::Loaded(font) => text
                .chars()
                .map(|ch| font.metrics(ch, px).advance_width)
                .sum(),
            Typeface::Builtin => {
                let s = builtin_scale(px);
                (text.chars().count() as u32 * BUILTIN_ADVANCE * s) as f32
            }
        }
    }

    /// Baseline-to-baseline distance at `px`.
    pub fn line_height(&self, px: f32) -> f32 {
        match self {
            Typeface::Loaded(font) => font
                .horizontal_line_metrics(px)
                .map(|m| m.new_line_size)
                .unwrap_or(px * 1.2),
            Typeface::Builtin => ((BUILTIN_ROWS + 2) * builtin_scale(px)) as f32,
        }
    }

    /// Distance from baseline up to the top of a line at `px`.
    pub fn ascent(&self, px: f32) -> f32 {
        match self {
            Typeface::Loaded(font) => font
                .horizontal_line_metrics(px)
                .map(|m| m.ascent)
                .unwrap_or(px * 0.8),
            Typeface::Builtin => (BUILTIN_ROWS * builtin_scale(px)) as f32,
        }
    }

    /// Draw one line of text with its left edge at `x` and its baseline at
    /// `baseline_y`. Glyphs falling outside the raster are clipped.
    pub fn draw(&self, raster: &mut Raster, x: f32, baseline_y: f32, text: &str, px: f32, color: [u8; 3]) {
        match self {
            Typeface::Loaded(font) => {
                let mut pen = x;
                for ch in text.chars() {
                    let (metrics, coverage) = font.rasterize(ch, px);
                    let gx = (pen + metrics.xmin as f32).round() as i64;
                    let gy = (baseline_y - (metrics.height as i32 + metrics.ymin) as f32).round() as i64;
                    for row in 0..metrics.height {
                        for col in 0..metrics.width {
                            let cov = coverage[row * metrics.width + col];
                            if cov == 0 {
                                continue;
                            }
                            let src = [
                                mul_div255_u8(u16::from(color[0]), u16::from(cov)),
                                mul_div255_u8(u16::from(color[1]), u16::from(cov)),
                                mul_div255_u8(u16::from(color[2]), u16::from(cov)),
                                cov,
                            ];
                            raster.blend_pixel(gx + col as i64, gy + row as i64, src);
                        }
                    }
                    pen += metrics.advance_width;
                }
            }
            Typeface::Builtin => {
                let s = builtin_scale(px);
                let top = (baseline_y - (BUILTIN_ROWS * s) as f32).round() as i64;
                let mut pen = x.round() as i64;
                let premul = [color[0], color[1], color[2], 255];
                for ch in text.chars() {
                    let cols = glyph_columns(ch);
                    for (ci, bits) in cols.iter().enumerate() {
                        for row in 0..BUILTIN_ROWS {
                            if bits & (1 << row) != 0 {
                                raster.fill_rect(
                                    pen + i64::from(ci as u32 * s),
                                    top + i64::from(row * s),
                                    s,
                                    s,
                                    premul,
                                );
                            }
                        }
                    }
                    pen += i64::from(BUILTIN_ADVANCE * s);
                }
            }
        }
    }
}

const BUILTIN_ROWS: u32 = 7;
const BUILTIN_ADVANCE: u32 = 6; // 5 glyph columns plus 1 column of spacing

fn builtin_scale(px: f32) -> u32 {
    ((px / 8.0).round() as u32).max(1)
}

/// Classic 5x7 dot-matrix font, printable ASCII 0x20..=0x7E. One byte per
/// column, bit 0 is the top row.
#[rustfmt::skip]
const FONT_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x04, 0x08, 0x10, 0x08], // '~'
];

fn glyph_columns(ch: char) -> [u8; 5] {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        return FONT_5X7[(code - 0x20) as usize];
    }
    match ch {
        '\u{2022}' => [0x00, 0x1C, 0x1C, 0x1C, 0x00], // bullet dot
        '\u{27A4}' => [0x7F, 0x3E, 0x1C, 0x08, 0x00], // arrowhead
        _ => [0x7F, 0x41, 0x41, 0x41, 0x7F],          // notdef box
    }
}
