//! Wire models for the DDA portal backend API.

pub mod models;
