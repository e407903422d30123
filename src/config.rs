use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    color::parse_hex_rgb,
    error::{SlatecastError, SlatecastResult},
};

/// Case transform applied to slide titles before wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCase {
    /// Leave the title as written.
    Standard,
    /// Force the whole title to uppercase.
    Upper,
    /// Uppercase only the first character.
    Sentence,
}

impl TitleCase {
    pub fn apply(self, s: &str) -> String {
        let s = s.trim();
        match self {
            TitleCase::Standard => s.to_string(),
            TitleCase::Upper => s.to_uppercase(),
            TitleCase::Sentence => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Which frame corner the logo is pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoCorner {
    TopRight,
    TopLeft,
}

/// Process-wide, read-only rendering configuration.
///
/// Resolved once before any rendering. Every field has a default, so a partial
/// JSON file (or `{}`) is a valid configuration. Keys that were renamed since
/// early config files still parse under their long-form spellings.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    pub fps: u32,
    pub seconds_per_slide: f64,
    pub max_slides: usize,
    /// ffmpeg-style bitrate string, e.g. "4M".
    pub target_bitrate: String,

    /// Slide background, `#RRGGBB`.
    pub background_color: String,
    /// Fraction of the frame width given to the text panel.
    #[serde(alias = "panel_split_ratio")]
    pub panel_ratio: f64,

    #[serde(alias = "font_title_path")]
    pub title_font_path: Option<PathBuf>,
    #[serde(alias = "font_body_path")]
    pub body_font_path: Option<PathBuf>,
    #[serde(alias = "title_font_size_px")]
    pub title_font_px: f32,
    #[serde(alias = "body_font_size_px")]
    pub body_font_px: f32,
    /// Bullet arrow tint, `#RRGGBB`.
    pub bullet_color: String,
    pub title_case: TitleCase,
    #[serde(alias = "text_max_words_per_bullet")]
    pub max_words_per_bullet: usize,

    pub logo_path: Option<PathBuf>,
    pub logo_corner: LogoCorner,
    pub logo_margin_px: u32,
    /// Logo width cap as a fraction of frame width; never upscales.
    pub logo_max_width_frac: f64,

    pub remove_background: bool,
    pub screen_blurry: bool,
    /// Variance-of-Laplacian below this is flagged as blurry (advisory only).
    pub blur_variance_threshold: f64,
    #[serde(alias = "upscale_to_min_side_px")]
    pub upscale_min_side_px: u32,
    /// Case-insensitive substrings that exclude an image filename from slides.
    #[serde(alias = "barcode_filename_keywords")]
    pub barcode_keywords: Vec<String>,

    pub images_dir: PathBuf,
    pub music_path: Option<PathBuf>,
    /// Linear gain applied to the music bed before encoding.
    pub audio_gain: f32,
    pub output_path: PathBuf,

    pub edge_padding_px: u32,
    #[serde(alias = "text_line_spacing_px")]
    pub line_spacing_px: u32,
    #[serde(alias = "safe_area_inset_px")]
    pub safe_inset_px: u32,

    pub animate_entrances: bool,
    pub show_info_ribbon: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 960,
            fps: 30,
            seconds_per_slide: 5.0,
            max_slides: 5,
            target_bitrate: "4M".to_string(),
            background_color: "#FFFFFF".to_string(),
            panel_ratio: 0.5,
            title_font_path: None,
            body_font_path: None,
            title_font_px: 55.0,
            body_font_px: 50.0,
            bullet_color: "#78185A".to_string(),
            title_case: TitleCase::Standard,
            max_words_per_bullet: 4,
            logo_path: None,
            logo_corner: LogoCorner::TopRight,
            logo_margin_px: 28,
            logo_max_width_frac: 0.18,
            remove_background: true,
            screen_blurry: true,
            blur_variance_threshold: 30.0,
            upscale_min_side_px: 1000,
            barcode_keywords: vec![
                "barcode".to_string(),
                "qr".to_string(),
                "code128".to_string(),
            ],
            images_dir: PathBuf::from("."),
            music_path: None,
            audio_gain: 0.9,
            output_path: PathBuf::from("outputs/final_video.mp4"),
            edge_padding_px: 48,
            line_spacing_px: 10,
            safe_inset_px: 48,
            animate_entrances: true,
            show_info_ribbon: true,
        }
    }
}

impl RenderConfig {
    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> SlatecastResult<Self> {
        let f =
            File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let r = BufReader::new(f);
        serde_json::from_reader(r).map_err(|e| {
            SlatecastError::serde(format!("parse config '{}': {e}", path.display()))
        })
    }

    pub fn validate(&self) -> SlatecastResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(SlatecastError::validation(
                "frame width/height must be > 0",
            ));
        }
        if self.fps == 0 {
            return Err(SlatecastError::validation("fps must be > 0"));
        }
        if !self.seconds_per_slide.is_finite() || self.seconds_per_slide <= 0.0 {
            return Err(SlatecastError::validation("seconds_per_slide must be > 0"));
        }
        if self.max_slides == 0 {
            return Err(SlatecastError::validation("max_slides must be >= 1"));
        }
        if self.target_bitrate.trim().is_empty() {
            return Err(SlatecastError::validation("target_bitrate must be set"));
        }
        if !(self.panel_ratio > 0.0 && self.panel_ratio < 1.0) {
            return Err(SlatecastError::validation(
                "panel_ratio must be strictly between 0 and 1",
            ));
        }
        if !self.title_font_px.is_finite()
            || self.title_font_px <= 0.0
            || !self.body_font_px.is_finite()
            || self.body_font_px <= 0.0
        {
            return Err(SlatecastError::validation("font sizes must be > 0"));
        }
        if self.max_words_per_bullet == 0 {
            return Err(SlatecastError::validation(
                "max_words_per_bullet must be >= 1",
            ));
        }
        if !(self.logo_max_width_frac > 0.0 && self.logo_max_width_frac <= 1.0) {
            return Err(SlatecastError::validation(
                "logo_max_width_frac must be in (0, 1]",
            ));
        }
        if !self.blur_variance_threshold.is_finite() || self.blur_variance_threshold < 0.0 {
            return Err(SlatecastError::validation(
                "blur_variance_threshold must be >= 0",
            ));
        }
        if !self.audio_gain.is_finite() || self.audio_gain < 0.0 {
            return Err(SlatecastError::validation("audio_gain must be >= 0"));
        }

        parse_hex_rgb(&self.background_color)?;
        parse_hex_rgb(&self.bullet_color)?;

        Ok(())
    }

    /// Text panel width in pixels: `round(frame_width * panel_ratio)`.
    pub fn panel_width(&self) -> u32 {
        (f64::from(self.frame_width) * self.panel_ratio).round() as u32
    }

    pub fn background_rgb(&self) -> SlatecastResult<[u8; 3]> {
        parse_hex_rgb(&self.background_color)
    }

    pub fn bullet_rgb(&self) -> SlatecastResult<[u8; 3]> {
        parse_hex_rgb(&self.bullet_color)
    }
}
