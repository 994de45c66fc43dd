//! Error types for site generation
//!
//! Only conditions that abort a run (or a single page) are errors. Degraded
//! inputs are reported as [`Diagnostic`](crate::diagnostics::Diagnostic)
//! values instead, so one bad table never blocks the rest of the site.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating the site
#[derive(Debug, Error)]
pub enum SiteError {
    /// The template directory is absent or incomplete
    #[error("template set not found in '{}' (missing: {})", dir.display(), missing.join(", "))]
    MissingTemplateSet { dir: PathBuf, missing: Vec<String> },

    /// A template failed to load or render
    #[error("template '{name}' failed: {message}")]
    Template { name: String, message: String },

    /// Filesystem operation failed
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension name cannot be used as a page file name
    #[error("'{0}' is not a valid page name")]
    InvalidPageName(String),

    /// Page context could not be converted for the template engine
    #[error("failed to serialize page context: {0}")]
    Context(#[from] serde_json::Error),
}

impl SiteError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
