//! Deployment creation

pub mod validation;
pub mod wizard;
