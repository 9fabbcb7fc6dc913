//! Core types shared by every part of kubeboot.
//!
//! - [`ManifestError`] - typed errors for resolution, serialization, I/O and
//!   fatal template faults
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI-facing error reporting
//! - [`File`] - a named byte blob, the unit of persisted output

pub mod error;
pub mod file;

pub use error::{BoxError, ErrorContext, ManifestError, user_friendly_error};
pub use file::{File, join_path, sort_files};
