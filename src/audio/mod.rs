//! Music bed preparation.

pub mod track;
