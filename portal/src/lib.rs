//! DDA Portal Library
//!
//! Client-side core of the DDA admin portal: the backend API client, the
//! component/device compatibility resolver, the manifest format gate, the
//! create-deployment wizard and status polling.

pub mod app;
pub mod compat;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod manifest;
pub mod storage;
pub mod utils;
pub mod workers;
