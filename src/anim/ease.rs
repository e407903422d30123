/// Entrance animations settle after this many seconds of slide-local time.
pub const ENTRANCE_WINDOW_SEC: f64 = 0.6;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Entrance progress at slide-local time `t_sec`, in `[0, 1]`.
///
/// Rises along an ease-out-cubic curve over `window_sec`, then holds 1.0. A
/// non-positive window means the element starts at rest.
pub fn entrance_progress(t_sec: f64, window_sec: f64) -> f64 {
    if window_sec <= 0.0 || t_sec >= window_sec {
        return 1.0;
    }
    Ease::OutCubic.apply(t_sec / window_sec)
}
