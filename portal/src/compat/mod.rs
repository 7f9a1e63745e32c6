//! Device/component architecture compatibility

pub mod arch;
pub mod resolver;
