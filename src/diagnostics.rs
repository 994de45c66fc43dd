//! Degraded-mode diagnostics
//!
//! Readers and the evidence locator never fail on bad input. They return
//! their data together with a list of [`Diagnostic`]s, and emit each one as
//! a `tracing` warning at the point it is raised.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A recoverable problem encountered during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Input file absent; empty data substituted
    MissingInput { path: PathBuf, input: String },
    /// Input file exists but could not be opened
    UnreadableInput { path: PathBuf, error: String },
    /// Row could not be decoded or had unexpected cells
    MalformedRow {
        path: PathBuf,
        line: u64,
        detail: String,
    },
    /// Evidence file exists but could not be read
    UnreadableEvidence { path: PathBuf, error: String },
    /// Optional asset directory absent or not copied
    MissingAssets { path: PathBuf, detail: String },
    /// A single page could not be rendered or written
    PageFailed { page: String, error: String },
}

impl Diagnostic {
    pub fn missing_input(path: &Path, input: &str) -> Self {
        Diagnostic::MissingInput {
            path: path.to_path_buf(),
            input: input.to_string(),
        }
    }

    pub fn malformed_row(path: &Path, line: u64, detail: impl Into<String>) -> Self {
        Diagnostic::MalformedRow {
            path: path.to_path_buf(),
            line,
            detail: detail.into(),
        }
    }

    /// Log this diagnostic and hand it back, so call sites can push in one step
    pub fn warn(self) -> Self {
        tracing::warn!("{}", self);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingInput { path, input } => write!(
                f,
                "{} not found; {} will not be available",
                path.display(),
                input
            ),
            Diagnostic::UnreadableInput { path, error } => {
                write!(f, "cannot read {}: {}", path.display(), error)
            }
            Diagnostic::MalformedRow { path, line, detail } => {
                write!(f, "{}:{}: {}", path.display(), line, detail)
            }
            Diagnostic::UnreadableEvidence { path, error } => {
                write!(f, "cannot read evidence {}: {}", path.display(), error)
            }
            Diagnostic::MissingAssets { path, detail } => {
                write!(f, "assets {}: {}", path.display(), detail)
            }
            Diagnostic::PageFailed { page, error } => {
                write!(f, "page {} not written: {}", page, error)
            }
        }
    }
}

/// Data loaded on a best-effort basis, plus what went wrong along the way
#[derive(Debug, Clone, Default)]
pub struct Loaded<T> {
    pub data: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Loaded<T> {
    pub fn new(data: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { data, diagnostics }
    }

    /// Clean load with no diagnostics
    pub fn clean(data: T) -> Self {
        Self::new(data, Vec::new())
    }

    /// Move the diagnostics into `sink` and return the data
    pub fn drain_into(self, sink: &mut Vec<Diagnostic>) -> T {
        sink.extend(self.diagnostics);
        self.data
    }
}
