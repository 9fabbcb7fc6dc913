//! Configuration for kubeboot.
//!
//! [`EngineConfig`] replaces process-wide settings with an explicit value
//! scoped to a single Generate/Load invocation. It can be built in code or
//! read from a TOML file.

mod engine;

pub use engine::{
    AroSettings, DEFAULT_CONTROL_MANIFEST, DEFAULT_MANIFEST_DIR, DEFAULT_TEMPLATE_DIR,
    DEFAULT_TEMPLATE_SUFFIX, EngineConfig,
};
