//! Shared helpers
//!
//! - [`fs`] - atomic file writes and directory creation
//! - [`dataurl`] - `data:` URL encoding for machine config payloads

pub mod dataurl;
pub mod fs;

pub use fs::{atomic_write, ensure_dir};
