//! Entrance-motion curves.

pub mod ease;
