//! Static overlays drawn above the animated slide content.

pub mod logo;
pub mod ribbon;
