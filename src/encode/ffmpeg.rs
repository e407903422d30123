//! Streaming H.264/AAC export through the ffmpeg CLI.
//!
//! Frames are piped to ffmpeg's stdin as raw RGBA; the optional music bed
//! arrives as a second input, a raw f32le file written beforehand. Output
//! goes to a `.partial` sibling first and is renamed into place only after
//! ffmpeg exits cleanly, so a crashed run never leaves a plausible-looking
//! final file behind.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;

use anyhow::Context as _;
use tracing::debug;

use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::render::frame::FrameRGBA;

/// Raw f32le audio fed to ffmpeg as a second input.
#[derive(Clone, Debug)]
pub struct AudioInput {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: String,
    pub out_path: PathBuf,
    pub overwrite: bool,
    pub audio: Option<AudioInput>,
}

impl EncodeConfig {
    pub fn validate(&self) -> SlatecastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlatecastError::validation("encode dimensions must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SlatecastError::validation(
                "encode dimensions must be even for yuv420p",
            ));
        }
        if self.fps == 0 {
            return Err(SlatecastError::validation("fps must be non-zero"));
        }
        if self.bitrate.trim().is_empty() {
            return Err(SlatecastError::validation("bitrate must not be empty"));
        }
        if let Some(audio) = &self.audio {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(SlatecastError::validation(
                    "audio sample rate and channels must be non-zero",
                ));
            }
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> SlatecastResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn partial_out_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = out.extension().and_then(|s| s.to_str()).unwrap_or("mp4");
    out.with_file_name(format!("{stem}.partial.{ext}"))
}

pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    partial_path: PathBuf,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> SlatecastResult<Self> {
        cfg.validate()?;
        if !is_ffmpeg_on_path() {
            return Err(SlatecastError::encode("ffmpeg not found on PATH"));
        }
        ensure_parent_dir(&cfg.out_path)?;
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(SlatecastError::encode(format!(
                "output {} already exists (pass overwrite to replace it)",
                cfg.out_path.display()
            )));
        }
        let partial_path = partial_out_path(&cfg.out_path);

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .args(["-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string()])
            .args(["-i", "pipe:0"]);
        if let Some(audio) = &cfg.audio {
            cmd.args(["-f", "f32le"])
                .args(["-ar", &audio.sample_rate.to_string()])
                .args(["-ac", &audio.channels.to_string()])
                .arg("-i")
                .arg(&audio.path);
        }
        cmd.args(["-c:v", "libx264", "-preset", "medium"])
            .args(["-b:v", &cfg.bitrate])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-threads", "4"]);
        if cfg.audio.is_some() {
            cmd.args(["-c:a", "aac", "-shortest"]);
        } else {
            cmd.arg("-an");
        }
        cmd.args(["-movflags", "+faststart"])
            .arg(&partial_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!(out = %cfg.out_path.display(), "spawning ffmpeg");
        let mut child = cmd
            .spawn()
            .map_err(|err| SlatecastError::encode(format!("spawning ffmpeg: {err}")))?;
        let stdin = child.stdin.take();
        let stderr_drain = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf).map(|_| buf)
            })
        });

        Ok(Self {
            cfg,
            child,
            stdin,
            stderr_drain,
            partial_path,
            frames_written: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> SlatecastResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(SlatecastError::encode(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.data.len() != expected {
            return Err(SlatecastError::encode(format!(
                "frame buffer is {} bytes, expected {expected}",
                frame.data.len()
            )));
        }

        let bytes = flatten_to_opaque_rgba8(frame);
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SlatecastError::encode("encoder already finished"))?;
        stdin
            .write_all(&bytes)
            .map_err(|err| SlatecastError::encode(format!("writing frame to ffmpeg: {err}")))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Close the frame pipe, wait for ffmpeg, and move the output into
    /// place. On a non-zero exit the partial file is removed and the
    /// captured stderr is surfaced.
    pub fn finish(mut self) -> SlatecastResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|err| SlatecastError::encode(format!("waiting for ffmpeg: {err}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(buf)) => String::from_utf8_lossy(&buf).into_owned(),
                _ => String::new(),
            },
            None => String::new(),
        };

        if !status.success() {
            let _ = std::fs::remove_file(&self.partial_path);
            return Err(SlatecastError::encode(format!(
                "ffmpeg exited with {status}: {}",
                stderr.trim()
            )));
        }
        std::fs::rename(&self.partial_path, &self.cfg.out_path).with_context(|| {
            format!(
                "moving {} to {}",
                self.partial_path.display(),
                self.cfg.out_path.display()
            )
        })?;
        Ok(())
    }
}

/// Produce the tightly packed opaque RGBA bytes ffmpeg expects.
/// Premultiplied frames are un-premultiplied first so color survives the
/// alpha flattening.
fn flatten_to_opaque_rgba8(frame: &FrameRGBA) -> Vec<u8> {
    let mut out = frame.data.clone();
    if frame.premultiplied {
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            if a == 0 {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            } else {
                for c in &mut px[..3] {
                    let v = (u32::from(*c) * 255 + u32::from(a) / 2) / u32::from(a);
                    *c = v.min(255) as u8;
                }
            }
            px[3] = 255;
        }
    } else {
        for px in out.chunks_exact_mut(4) {
            px[3] = 255;
        }
    }
    out
}
