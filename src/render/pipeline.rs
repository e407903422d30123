//! End-to-end rendering: slide records in, MP4 out.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::assets::font::FontBook;
use crate::assets::matting::detect_matting;
use crate::assets::prepare::{load_logo, prepare_product_image};
use crate::audio::track::{
    build_music_track, decode_audio_f32_stereo, write_track_to_f32le_file, MIX_CHANNELS,
    MIX_SAMPLE_RATE,
};
use crate::compose::slide::build_slide_clip;
use crate::config::RenderConfig;
use crate::encode::ffmpeg::{AudioInput, EncodeConfig, FfmpegEncoder};
use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::foundation::temp::{scratch_path, TempFileGuard};
use crate::overlay::logo::scale_logo;
use crate::render::frame::{render_clip_frame, FrameRGBA};
use crate::timeline::assemble::{frames_per_slide, select_slides};
use crate::timeline::record::SlideRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    pub slides: usize,
    pub frames_total: u64,
    pub duration_sec: f64,
}

/// Render every eligible record into one H.264/AAC file at `out_path`.
///
/// Slides are prepared up front so asset problems surface before any frame
/// is encoded; the frame loop then streams each slide's frames in turn.
/// The music bed, when configured and readable, is looped and trimmed to
/// the exact video length and handed to the encoder as a second input.
#[instrument(skip(cfg, records))]
pub fn render_video(
    cfg: &RenderConfig,
    records: &[SlideRecord],
    out_path: &Path,
) -> SlatecastResult<RenderStats> {
    cfg.validate()?;
    let selected = select_slides(records, cfg)?;

    let book = FontBook::load(cfg);
    let matting = detect_matting(cfg.remove_background);
    let logo = load_logo(cfg).map(|l| scale_logo(&l, cfg));

    let mut clips = Vec::with_capacity(selected.len());
    for record in &selected {
        let product = prepare_product_image(cfg, matting.as_ref(), &book, &record.image)?;
        clips.push(build_slide_clip(cfg, &book, record, &product, logo.as_ref())?);
    }

    let frames_each = frames_per_slide(cfg);
    let frames_total = frames_each * clips.len() as u64;

    let mut audio_tmp = TempFileGuard(None);
    let audio = match &cfg.music_path {
        Some(path) if path.exists() => {
            let pcm = decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)?;
            if pcm.interleaved_f32.is_empty() {
                info!(path = %path.display(), "music file has no audio stream, rendering silent");
                None
            } else {
                let track = build_music_track(&pcm, frames_total, cfg.fps, cfg.audio_gain);
                let scratch = scratch_path("slatecast_music", "f32le");
                write_track_to_f32le_file(&track, &scratch)?;
                audio_tmp.0 = Some(scratch.clone());
                Some(AudioInput {
                    path: scratch,
                    sample_rate: MIX_SAMPLE_RATE,
                    channels: MIX_CHANNELS,
                })
            }
        }
        Some(path) => {
            warn!(path = %path.display(), "music file not found, rendering without audio");
            None
        }
        None => None,
    };

    let mut encoder = FfmpegEncoder::new(EncodeConfig {
        width: cfg.frame_width,
        height: cfg.frame_height,
        fps: cfg.fps,
        bitrate: cfg.target_bitrate.clone(),
        out_path: out_path.to_path_buf(),
        overwrite: true,
        audio,
    })?;

    for (idx, clip) in clips.iter().enumerate() {
        for f in 0..frames_each {
            let t_sec = f as f64 / f64::from(cfg.fps);
            encoder.encode_frame(&render_clip_frame(clip, t_sec))?;
        }
        info!(slide = idx + 1, of = clips.len(), "slide rendered");
    }
    encoder.finish()?;
    drop(audio_tmp);

    let stats = RenderStats {
        slides: clips.len(),
        frames_total,
        duration_sec: clips.len() as f64 * cfg.seconds_per_slide,
    };
    info!(
        slides = stats.slides,
        frames = stats.frames_total,
        duration_sec = stats.duration_sec,
        bitrate = %cfg.target_bitrate,
        out = %out_path.display(),
        "video written"
    );
    Ok(stats)
}

/// Rasterize one eligible slide at a local time, for previews.
pub fn render_slide_frame(
    cfg: &RenderConfig,
    records: &[SlideRecord],
    slide_index: usize,
    t_sec: f64,
) -> SlatecastResult<FrameRGBA> {
    cfg.validate()?;
    let selected = select_slides(records, cfg)?;
    let record = selected.get(slide_index).ok_or_else(|| {
        SlatecastError::validation(format!(
            "slide index {slide_index} out of range ({} eligible slides)",
            selected.len()
        ))
    })?;

    let book = FontBook::load(cfg);
    let matting = detect_matting(cfg.remove_background);
    let logo = load_logo(cfg).map(|l| scale_logo(&l, cfg));
    let product = prepare_product_image(cfg, matting.as_ref(), &book, &record.image)?;
    let clip = build_slide_clip(cfg, &book, record, &product, logo.as_ref())?;
    Ok(render_clip_frame(&clip, t_sec.clamp(0.0, clip.duration_sec)))
}
