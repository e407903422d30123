//! Shared primitives: error taxonomy, pixel math, colors, scratch files.

pub mod color;
pub mod error;
pub(crate) mod math;
pub(crate) mod temp;
