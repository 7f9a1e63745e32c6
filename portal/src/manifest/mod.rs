//! Labeling manifest format detection and the transform gate

pub mod detector;
pub mod gate;
