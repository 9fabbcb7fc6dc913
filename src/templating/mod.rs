//! Template rendering for bootkube manifests.
//!
//! Bundled templates are rendered with [Tera](https://keats.github.io/tera/)
//! against a flat context of certificate material, identifiers and flags.
//! Templates ship with the binary, so any rendering failure is reported as a
//! structured [`TemplateError`] that callers escalate to a fatal error.
//!
//! # Syntax
//!
//! - `{{ field }}` substitutes a context field
//! - `{% if flag %}...{% endif %}` for boolean flags
//! - `{{ indent(width=4, text=field) }}` inlines multi-line text into an
//!   indented YAML block
//! - `{{ add(a=1, b=2) }}` adds two integers

pub mod error;
pub mod functions;
pub mod renderer;

pub use error::{ErrorLocation, TemplateError};
pub use functions::indent;
pub use renderer::TemplateRenderer;
