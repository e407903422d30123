//! Text panel typesetting.

pub mod panel;
