//! Command dispatch and its configuration

pub mod options;
pub mod run;
