//! Local storage: settings file and its location

pub mod layout;
pub mod settings;
