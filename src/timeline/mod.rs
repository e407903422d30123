//! Slide rows and their assembly into a timeline.

pub mod assemble;
pub mod record;
