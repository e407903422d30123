//! Background removal for product photos.
//!
//! Matting is a capability with several providers. The preferred provider
//! shells out to the `rembg` CLI when it is installed. Otherwise a
//! conservative border flood fill strips near-uniform studio backdrops and
//! leaves anything it is unsure about untouched. Matting can also be
//! disabled outright, which routes through the passthrough provider.

use std::collections::VecDeque;
use std::process::{Command, Stdio};

use anyhow::Context as _;
use image::RgbaImage;
use tracing::{debug, info};

use crate::foundation::error::{SlatecastError, SlatecastResult};
use crate::foundation::temp::{scratch_path, TempFileGuard};

pub trait Matting {
    fn name(&self) -> &'static str;

    /// Return a copy of `img` with background pixels made transparent.
    fn matte(&self, img: &RgbaImage) -> SlatecastResult<RgbaImage>;
}

/// Pick a provider for this run.
pub fn detect_matting(enabled: bool) -> Box<dyn Matting> {
    if !enabled {
        return Box::new(PassthroughMatte);
    }
    if is_rembg_on_path() {
        info!("background matting via rembg");
        Box::new(RembgCli)
    } else {
        info!("rembg not on PATH, background matting via border flood");
        Box::new(BorderFloodMatte)
    }
}

pub fn is_rembg_on_path() -> bool {
    Command::new("rembg")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Leaves images untouched. Used when background removal is disabled.
pub struct PassthroughMatte;

impl Matting for PassthroughMatte {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn matte(&self, img: &RgbaImage) -> SlatecastResult<RgbaImage> {
        Ok(img.clone())
    }
}

/// Shells out to the `rembg` CLI through temp PNG files.
pub struct RembgCli;

impl Matting for RembgCli {
    fn name(&self) -> &'static str {
        "rembg"
    }

    fn matte(&self, img: &RgbaImage) -> SlatecastResult<RgbaImage> {
        let in_path = scratch_path("slatecast_matte_in", "png");
        let out_path = scratch_path("slatecast_matte_out", "png");
        let _in_guard = TempFileGuard(Some(in_path.clone()));
        let _out_guard = TempFileGuard(Some(out_path.clone()));

        img.save(&in_path)
            .with_context(|| format!("writing matte input {}", in_path.display()))?;

        let output = Command::new("rembg")
            .arg("i")
            .arg(&in_path)
            .arg(&out_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .output()
            .context("spawning rembg")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlatecastError::render(format!(
                "rembg failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let matted = image::open(&out_path)
            .with_context(|| format!("reading matte output {}", out_path.display()))?;
        Ok(matted.to_rgba8())
    }
}

// Border statistics above this per-channel spread mean the photo has no
// uniform backdrop to strip.
const BORDER_NOISE_LIMIT: f64 = 24.0;
// Euclidean RGB distance from the border mean still counted as background.
const FLOOD_TOLERANCE: f64 = 40.0;
// A flood that would clear more than this fraction of the image is treated
// as a misfire and discarded.
const MAX_CLEARED_FRAC: f64 = 0.9;

/// Flood-fills from the image border, clearing pixels close to the mean
/// border color. Refuses to act on busy borders and on floods that would
/// swallow the whole image.
pub struct BorderFloodMatte;

impl Matting for BorderFloodMatte {
    fn name(&self) -> &'static str {
        "border-flood"
    }

    fn matte(&self, img: &RgbaImage) -> SlatecastResult<RgbaImage> {
        let (w, h) = (img.width(), img.height());
        if w == 0 || h == 0 {
            return Ok(img.clone());
        }

        let (mean, spread) = border_stats(img);
        if spread > BORDER_NOISE_LIMIT {
            debug!(spread, "border too varied, leaving image unmatted");
            return Ok(img.clone());
        }

        let mut cleared = vec![false; w as usize * h as usize];
        let mut queue = VecDeque::new();
        for x in 0..w {
            queue.push_back((x, 0));
            queue.push_back((x, h - 1));
        }
        for y in 0..h {
            queue.push_back((0, y));
            queue.push_back((w - 1, y));
        }

        let mut cleared_count = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            let idx = (y * w + x) as usize;
            if cleared[idx] {
                continue;
            }
            let [r, g, b, _] = img.get_pixel(x, y).0;
            if color_distance([r, g, b], mean) > FLOOD_TOLERANCE {
                continue;
            }
            cleared[idx] = true;
            cleared_count += 1;

            if x > 0 {
                queue.push_back((x - 1, y));
            }
            if x + 1 < w {
                queue.push_back((x + 1, y));
            }
            if y > 0 {
                queue.push_back((x, y - 1));
            }
            if y + 1 < h {
                queue.push_back((x, y + 1));
            }
        }

        let frac = cleared_count as f64 / (w as usize * h as usize) as f64;
        if frac > MAX_CLEARED_FRAC {
            debug!(frac, "flood would clear almost everything, discarding matte");
            return Ok(img.clone());
        }

        let mut out = img.clone();
        for (i, px) in out.pixels_mut().enumerate() {
            if cleared[i] {
                px.0 = [0, 0, 0, 0];
            }
        }
        Ok(out)
    }
}

fn border_stats(img: &RgbaImage) -> ([u8; 3], f64) {
    let (w, h) = (img.width(), img.height());
    let mut sum = [0.0f64; 3];
    let mut sum_sq = [0.0f64; 3];
    let mut count = 0usize;

    let mut sample = |x: u32, y: u32| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        for (i, v) in [r, g, b].into_iter().enumerate() {
            sum[i] += f64::from(v);
            sum_sq[i] += f64::from(v) * f64::from(v);
        }
        count += 1;
    };

    for x in 0..w {
        sample(x, 0);
        if h > 1 {
            sample(x, h - 1);
        }
    }
    for y in 1..h.saturating_sub(1) {
        sample(0, y);
        if w > 1 {
            sample(w - 1, y);
        }
    }

    let n = count as f64;
    let mut mean = [0u8; 3];
    let mut spread = 0.0f64;
    for i in 0..3 {
        let m = sum[i] / n;
        mean[i] = m.round().clamp(0.0, 255.0) as u8;
        let var = (sum_sq[i] / n) - m * m;
        spread = spread.max(var.max(0.0).sqrt());
    }
    (mean, spread)
}

fn color_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    let dr = f64::from(a[0]) - f64::from(b[0]);
    let dg = f64::from(a[1]) - f64::from(b[1]);
    let db = f64::from(a[2]) - f64::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}
