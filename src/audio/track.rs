//! Music bed: decode, loop, trim, gain.
//!
//! The configured track is decoded to interleaved stereo f32 through
//! ffmpeg, looped whole until it covers the video, cut to the exact sample
//! matching the final frame count, and attenuated. The result is written as
//! a raw f32le scratch file for the encoder's second input.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::SlatecastResult;

pub const MIX_SAMPLE_RATE: u32 = 48_000;
pub const MIX_CHANNELS: u16 = 2;

pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

/// Decode any ffmpeg-readable media file to interleaved stereo f32.
/// A file with no audio stream decodes to empty PCM rather than an error.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> SlatecastResult<AudioPcm> {
    let output = Command::new("ffmpeg")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(path)
        .args(["-map", "0:a:0"])
        .args(["-f", "f32le", "-acodec", "pcm_f32le"])
        .args(["-ac", "2"])
        .args(["-ar", &sample_rate.to_string()])
        .arg("pipe:1")
        .stdin(Stdio::null())
        .output()
        .context("spawning ffmpeg for audio decode")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("matches no streams") {
            return Ok(AudioPcm {
                sample_rate,
                channels: MIX_CHANNELS,
                interleaved_f32: Vec::new(),
            });
        }
        return Err(anyhow::anyhow!(
            "ffmpeg audio decode of {} failed ({}): {}",
            path.display(),
            output.status,
            stderr.trim()
        )
        .into());
    }

    let interleaved_f32 = output
        .stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32,
    })
}

/// Sample index for a frame delta, rounded to nearest.
pub fn frame_to_sample(frame_delta: u64, fps: u32, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate);
    let den = u128::from(fps.max(1));
    ((num + den / 2) / den) as u64
}

/// Loop the decoded track out to exactly `total_frames` of video and apply
/// the configured gain. Empty PCM yields silence of the right length.
pub fn build_music_track(pcm: &AudioPcm, total_frames: u64, fps: u32, gain: f32) -> Vec<f32> {
    let frames_needed = frame_to_sample(total_frames, fps, pcm.sample_rate);
    let target_len = frames_needed as usize * usize::from(pcm.channels);

    let mut out = Vec::with_capacity(target_len);
    if pcm.interleaved_f32.is_empty() {
        out.resize(target_len, 0.0);
        return out;
    }
    while out.len() < target_len {
        let remaining = target_len - out.len();
        let take = remaining.min(pcm.interleaved_f32.len());
        out.extend_from_slice(&pcm.interleaved_f32[..take]);
    }
    for s in &mut out {
        *s = (*s * gain).clamp(-1.0, 1.0);
    }
    out
}

pub fn write_track_to_f32le_file(samples: &[f32], path: &Path) -> SlatecastResult<()> {
    let file = File::create(path)
        .with_context(|| format!("creating audio scratch file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for s in samples {
        writer
            .write_all(&s.to_le_bytes())
            .context("writing audio samples")?;
    }
    writer.flush().context("flushing audio samples")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_to_sample_at_mix_rate() {
        assert_eq!(frame_to_sample(0, 30, 48_000), 0);
        assert_eq!(frame_to_sample(1, 30, 48_000), 1600);
        assert_eq!(frame_to_sample(150, 30, 48_000), 240_000);
    }

    #[test]
    fn frame_to_sample_rounds_to_nearest() {
        // 1 frame at 7 fps and 10 Hz is 10/7 = 1.43 samples.
        assert_eq!(frame_to_sample(1, 7, 10), 1);
        assert_eq!(frame_to_sample(5, 7, 10), 7);
    }

    #[test]
    fn empty_pcm_builds_silence_of_exact_length() {
        let pcm = AudioPcm {
            sample_rate: 48_000,
            channels: 2,
            interleaved_f32: Vec::new(),
        };
        let track = build_music_track(&pcm, 30, 30, 0.9);
        assert_eq!(track.len(), 48_000 * 2);
        assert!(track.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn short_track_loops_until_video_ends() {
        // 2 frames of source audio at 10 Hz stereo, 5 frames of video.
        let pcm = AudioPcm {
            sample_rate: 10,
            channels: 2,
            interleaved_f32: vec![1.0, -1.0, 0.5, -0.5],
        };
        let track = build_music_track(&pcm, 5, 10, 0.9);
        assert_eq!(track.len(), 5 * 2);
        // Looped pattern with gain applied, trimmed mid-loop.
        assert_eq!(track[0], 0.9);
        assert_eq!(track[1], -0.9);
        assert_eq!(track[2], 0.45);
        assert_eq!(track[3], -0.45);
        assert_eq!(track[4], 0.9);
    }

    #[test]
    fn configured_gain_scales_samples() {
        let pcm = AudioPcm {
            sample_rate: 10,
            channels: 2,
            interleaved_f32: vec![0.5, 0.5],
        };
        let track = build_music_track(&pcm, 2, 10, 0.25);
        assert!(track.iter().all(|s| *s == 0.125));

        let track = build_music_track(&pcm, 2, 10, 1.0);
        assert!(track.iter().all(|s| *s == 0.5));
    }

    #[test]
    fn gain_clamps_hot_samples() {
        let pcm = AudioPcm {
            sample_rate: 10,
            channels: 2,
            interleaved_f32: vec![2.0, -2.0],
        };
        let track = build_music_track(&pcm, 1, 10, 0.9);
        assert_eq!(track[0], 1.0);
        assert_eq!(track[1], -1.0);
    }

    #[test]
    fn f32le_file_holds_four_bytes_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bed.f32");
        write_track_to_f32le_file(&[0.25, -0.25, 1.0], &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.25);
    }
}
