use std::io;

use thiserror::Error;

/// Library-wide error type for projwiki operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// No wiki directory found under the project root.
    #[error("Wiki directory not found: {0}. Run 'projwiki scaffold' first.")]
    WikiNotFound(String),

    /// Task batch file does not exist.
    #[error("Task file not found: {0}")]
    TaskFileNotFound(String),

    /// Persisted task batch could not be decoded.
    #[error("Malformed task file {path}: {reason}")]
    MalformedTaskFile { path: String, reason: String },

    /// Path mapping file could not be decoded.
    #[error("Malformed path map {path}: {reason}")]
    MalformedPathMap { path: String, reason: String },

    /// Embedded template is missing from the binary.
    #[error("Template '{0}' not found in embedded assets")]
    TemplateNotFound(String),

    /// Template rendering failed.
    #[error("Failed to render template {template}: {reason}")]
    TemplateRenderError { template: String, reason: String },
}

impl AppError {
    pub(crate) fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}
