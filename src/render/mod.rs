//! Frame rasterization and the end-to-end render pipeline.

pub mod frame;
pub mod pipeline;
