//! Tabular inputs
//!
//! Four CSV sources feed the site:
//! - the compatibility matrix (`compatibility`)
//! - source code links, descriptions, extensibility flags and system
//!   component flags (`metadata`)
//!
//! Every reader is best-effort. A missing or unreadable file degrades to
//! empty data plus a [`Diagnostic`]; a bad row is skipped with a diagnostic.

pub mod compatibility;
pub mod metadata;

pub use compatibility::read_compatibility;
pub use metadata::{
    read_descriptions, read_infos, read_mechanisms, read_source_code, ExtensibilityType, Infos,
    SystemComponent,
};

use crate::compat::CompatibilityMatrix;
use crate::config::SiteConfig;
use crate::diagnostics::{Diagnostic, Loaded};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Everything read from the tabular inputs for one run
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub matrix: CompatibilityMatrix,
    pub source_code: BTreeMap<String, String>,
    pub descriptions: BTreeMap<String, String>,
    pub infos: Infos,
    pub mechanisms: BTreeMap<String, Vec<SystemComponent>>,
}

impl InputTables {
    /// Read all four inputs named by `config`
    pub fn load(config: &SiteConfig) -> Loaded<Self> {
        let mut diagnostics = Vec::new();

        let tables = InputTables {
            matrix: read_compatibility(&config.compatibility_csv).drain_into(&mut diagnostics),
            source_code: read_source_code(&config.source_code_csv).drain_into(&mut diagnostics),
            descriptions: read_descriptions(&config.descriptions_csv)
                .drain_into(&mut diagnostics),
            infos: read_infos(&config.infos_csv).drain_into(&mut diagnostics),
            mechanisms: read_mechanisms(&config.mechanisms_csv).drain_into(&mut diagnostics),
        };

        tracing::info!(
            extensions = tables.infos.universe.len(),
            matrix_extensions = tables.matrix.extensions().len(),
            "loaded input tables"
        );

        Loaded::new(tables, diagnostics)
    }
}

/// Open a CSV file with trimmed fields and ragged rows allowed.
///
/// Returns `Err` with the diagnostic to report when the file is missing or
/// cannot be opened.
pub(crate) fn open_csv(
    path: &Path,
    input: &str,
    has_headers: bool,
) -> Result<csv::Reader<File>, Diagnostic> {
    if !path.exists() {
        return Err(Diagnostic::missing_input(path, input).warn());
    }
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            Diagnostic::UnreadableInput {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
            .warn()
        })
}

/// Deserialize every row of a headed CSV file into `T`, skipping bad rows.
///
/// Rows come back paired with their line number.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path, input: &str) -> Loaded<Vec<(u64, T)>> {
    let mut reader = match open_csv(path, input, true) {
        Ok(reader) => reader,
        Err(diagnostic) => return Loaded::new(Vec::new(), vec![diagnostic]),
    };

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            let diagnostic = Diagnostic::malformed_row(path, 1, e.to_string()).warn();
            return Loaded::new(Vec::new(), vec![diagnostic]);
        }
    };

    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                diagnostics.push(Diagnostic::malformed_row(path, line, e.to_string()).warn());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push((line, row)),
            Err(e) => {
                diagnostics.push(Diagnostic::malformed_row(path, line, e.to_string()).warn());
            }
        }
    }

    Loaded::new(rows, diagnostics)
}

/// Flag cells are set when they read `yes`, in any case
pub(crate) fn is_yes(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}
