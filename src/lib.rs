//! slatecast: product-slide video composer.
//!
//! Turns a list of product records (image reference, title, bullet points,
//! capacity/dimension callouts) into a short MP4: each record becomes one
//! slide with a typeset text panel sliding in from the left, the prepared
//! product photo sliding in from the right, an optional corner logo, and an
//! optional info ribbon. Slides play back to back over an optional looped
//! music bed, and the whole thing is streamed through the system `ffmpeg`
//! as H.264/AAC.
//!
//! The crate is organized as a pipeline:
//! - [`RenderConfig`] and [`SlideRecord`] describe the inputs,
//! - [`select_slides`] applies the row eligibility rules,
//! - [`prepare_product_image`] decodes, screens, mattes, and upscales photos,
//! - [`render_text_panel`] typesets the left panel,
//! - [`build_slide_clip`] assembles the animated layer stack,
//! - [`render_video`] drives the frame loop into [`FfmpegEncoder`].
//!
//! Rendering is pure CPU compositing over premultiplied RGBA8 buffers;
//! `ffmpeg` (and optionally `rembg`) are invoked as external tools.

#![forbid(unsafe_code)]

mod anim;
mod assets;
mod audio;
mod compose;
mod config;
mod encode;
mod foundation;
mod overlay;
mod render;
mod text;
mod timeline;

pub use kurbo::{Point, Rect, Vec2};

pub use anim::ease::{entrance_progress, Ease, ENTRANCE_WINDOW_SEC};
pub use assets::font::{FontBook, Typeface};
pub use assets::matting::{
    detect_matting, is_rembg_on_path, BorderFloodMatte, Matting, PassthroughMatte, RembgCli,
};
pub use assets::prepare::{load_logo, prepare_product_image, PreparedImage};
pub use assets::sharpness::blur_variance;
pub use audio::track::{
    build_music_track, decode_audio_f32_stereo, frame_to_sample, write_track_to_f32le_file,
    AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE,
};
pub use compose::blit::{over, PremulRgba8, Raster};
pub use compose::slide::{build_slide_clip, LayerMotion, SlideClip, SlideLayer};
pub use config::{LogoCorner, RenderConfig, TitleCase};
pub use encode::ffmpeg::{is_ffmpeg_on_path, AudioInput, EncodeConfig, FfmpegEncoder};
pub use foundation::color::parse_hex_rgb;
pub use foundation::error::{SlatecastError, SlatecastResult};
pub use overlay::logo::{logo_position, scale_logo};
pub use overlay::ribbon::{info_line, render_ribbon, ribbon_position};
pub use render::frame::{render_clip_frame, FrameRGBA};
pub use render::pipeline::{render_slide_frame, render_video, RenderStats};
pub use text::panel::{clamp_words, layout_panel, render_text_panel, wrap_text, PanelLayout};
pub use timeline::assemble::{frames_per_slide, select_slides};
pub use timeline::record::{load_records, SlideRecord};
