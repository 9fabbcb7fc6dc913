//! Error handling for kubeboot
//!
//! This module provides the typed error surface of the asset engine and the
//! user-facing error reporting used by the CLI. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** so callers can tell resolution failures, I/O
//!    failures and fatal template faults apart
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Resolution**: [`ManifestError::Resolution`] wraps the failure of one
//!   asset's Generate/Load with the asset's human name attached
//! - **Serialization**: [`ManifestError::Serialization`] for redaction and
//!   manifest marshaling failures
//! - **Templates**: [`ManifestError::TemplateFault`] is the only fatal class; it
//!   signals a defect in the bundled template set, not a runtime condition
//! - **I/O**: [`ManifestError::Io`] carries the file pattern that failed
//! - **Graph**: [`ManifestError::CircularDependency`] and
//!   [`ManifestError::MissingDependency`]
//!
//! "Not present on disk" is never an error: Load paths report it as `Ok(None)`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kubeboot::core::{ManifestError, user_friendly_error};
//!
//! let error = ManifestError::InvalidConfig {
//!     reason: "metadata.name must not be empty".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Boxed error used as the source of wrapped failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for asset resolution and manifest assembly.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An asset's Generate or Load call failed.
    ///
    /// The whole resolution is aborted; no partial output is produced.
    #[error("failed to resolve asset \"{asset}\"")]
    Resolution {
        /// Human-readable name of the failing asset
        asset: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// Redaction or manifest marshaling failed.
    #[error("{context}")]
    Serialization {
        /// Static description of what was being serialized
        context: String,
        /// Underlying serializer error
        #[source]
        source: BoxError,
    },

    /// A bundled template could not be parsed or rendered.
    ///
    /// Templates ship with the binary, so this is a packaging defect and is
    /// treated as unrecoverable. See [`ManifestError::is_fatal`].
    #[error("template {template} is defective: {message}")]
    TemplateFault {
        /// Template file name
        template: String,
        /// Rendering failure with location details
        message: String,
    },

    /// Fetching files matching a pattern failed.
    #[error("failed to fetch files matching {pattern}")]
    Io {
        /// The pattern (or file name) being fetched
        pattern: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The declared dependencies form a cycle.
    #[error("circular dependency detected: {chain}")]
    CircularDependency {
        /// Rendered cycle, e.g. `A → B → A`
        chain: String,
    },

    /// An asset asked for a dependency it did not declare or that was not resolved.
    #[error("asset \"{asset}\" requested undeclared or unresolved dependency \"{dependency}\"")]
    MissingDependency {
        /// Asset doing the lookup
        asset: String,
        /// Dependency that was requested
        dependency: String,
    },

    /// Certificate material could not be obtained.
    #[error("certificate {name} unavailable: {reason}")]
    Certificate {
        /// Certificate name (e.g. `root-ca`)
        name: String,
        /// Why it is unavailable
        reason: String,
    },

    /// Two assets produced the same output file name.
    #[error("duplicate output file {filename}")]
    DuplicateFile {
        /// Conflicting relative path
        filename: String,
    },

    /// Engine or install configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Validation failure
        reason: String,
    },

    /// Engine configuration file could not be parsed.
    #[error("failed to parse configuration file {file}")]
    ConfigParse {
        /// Path of the configuration file
        file: String,
        /// TOML parser error
        #[source]
        source: toml::de::Error,
    },
}

impl ManifestError {
    /// Returns `true` for errors that indicate a packaging defect rather than
    /// a runtime or user condition.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TemplateFault { .. })
    }

    /// Wrap a failure raised while computing `asset`.
    ///
    /// Fatal template faults pass through untouched so callers can still
    /// distinguish them from recoverable resolution failures.
    pub(crate) fn from_asset_error(asset: &str, error: anyhow::Error) -> Self {
        match error.downcast::<Self>() {
            Ok(fatal @ Self::TemplateFault { .. }) => fatal,
            Ok(other) => Self::Resolution {
                asset: asset.to_string(),
                source: Box::new(other),
            },
            Err(error) => Self::Resolution {
                asset: asset.to_string(),
                source: error.into(),
            },
        }
    }

    /// Build a [`ManifestError::Serialization`] from any serializer error.
    pub(crate) fn serialization(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Error wrapper carrying a suggestion and details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// Main error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions.
///
/// Recognizes [`ManifestError`] variants and plain I/O errors; anything else
/// is reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format_with_chain(&error);

    if let Some(manifest_error) = error.downcast_ref::<ManifestError>() {
        return create_error_context(manifest_error, message);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let ctx = ErrorContext::new(message);
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ctx
                .with_suggestion("Check ownership and permissions of the asset directory"),
            std::io::ErrorKind::NotFound => ctx
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => ctx,
        };
    }

    ErrorContext::new(message)
}

fn format_with_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: &ManifestError, message: String) -> ErrorContext {
    let ctx = ErrorContext::new(message);
    match error {
        ManifestError::Resolution { asset, .. } => ctx
            .with_suggestion(format!(
                "Inspect the inputs of \"{asset}\"; rerun with --verbose to see the resolution order"
            ))
            .with_details("Resolution stops at the first failing asset and writes nothing"),
        ManifestError::TemplateFault { .. } => ctx
            .with_suggestion("Rebuild kubeboot or remove template overrides from the asset directory")
            .with_details("Bundled templates failed to render. This is a packaging defect"),
        ManifestError::Io { pattern, .. } => ctx
            .with_suggestion(format!("Check that the directory holding {pattern} is readable")),
        ManifestError::Certificate { name, .. } => ctx
            .with_suggestion(format!("Provide {name}.crt and {name}.key in the certificate directory"))
            .with_details("Certificate material is produced outside kubeboot and consumed as PEM files"),
        ManifestError::ConfigParse { file, .. } => ctx
            .with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets"
            )),
        ManifestError::InvalidConfig { .. } => {
            ctx.with_suggestion("Fix the reported field in install-config.yaml or the engine config")
        }
        ManifestError::CircularDependency { .. } | ManifestError::MissingDependency { .. } => ctx
            .with_details("The asset graph is defined in code; this indicates a programming error"),
        ManifestError::DuplicateFile { .. } | ManifestError::Serialization { .. } => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_template_faults_are_fatal() {
        let fault = ManifestError::TemplateFault {
            template: "cvo-overrides.yaml.template".to_string(),
            message: "unexpected end".to_string(),
        };
        assert!(fault.is_fatal());

        let io = ManifestError::Io {
            pattern: "manifests/*.yaml".to_string(),
            source: std::io::Error::other("boom"),
        };
        assert!(!io.is_fatal());
    }

    #[test]
    fn test_from_asset_error_keeps_template_faults() {
        let fault = anyhow::Error::from(ManifestError::TemplateFault {
            template: "etcd-service.yaml".to_string(),
            message: "bad".to_string(),
        });
        let wrapped = ManifestError::from_asset_error("Common Manifests", fault);
        assert!(wrapped.is_fatal());
    }

    #[test]
    fn test_from_asset_error_attaches_asset_name() {
        let err = anyhow::anyhow!("no pull secret");
        let wrapped = ManifestError::from_asset_error("Install Config", err);
        match &wrapped {
            ManifestError::Resolution { asset, source } => {
                assert_eq!(asset, "Install Config");
                assert!(source.to_string().contains("no pull secret"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(wrapped.to_string().contains("Install Config"));
    }

    #[test]
    fn test_user_friendly_error_includes_chain() {
        let err = anyhow::Error::from(ManifestError::Resolution {
            asset: "Root CA".to_string(),
            source: "missing root-ca.crt".into(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.message.contains("Root CA"));
        assert!(ctx.message.contains("missing root-ca.crt"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("boom").with_details("d").with_suggestion("s");
        assert_eq!(ctx.to_string(), "boom\nDetails: d\nSuggestion: s");
    }
}
