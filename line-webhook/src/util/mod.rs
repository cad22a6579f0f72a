//! Utility modules.

pub mod timestamp;
