//! Asset loading: product photos, logos, and typefaces.

pub mod font;
pub mod matting;
pub mod prepare;
pub mod sharpness;
