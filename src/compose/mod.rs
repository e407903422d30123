//! Pixel compositing and per-slide layer assembly.

pub mod blit;
pub mod slide;
