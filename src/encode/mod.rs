//! Video export.

pub mod ffmpeg;
