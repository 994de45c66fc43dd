//! Directed compatibility matrix
//!
//! Cell `(row, column)` records the outcome of loading `row` together with
//! `column`. Both directions of a pair are recorded and tested
//! independently, so the matrix is not assumed to be symmetric.

use super::aggregate::{self, CompatibilityResult};
use std::collections::{BTreeMap, BTreeSet};

/// Recorded outcome of one directed test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Yes,
    No,
    /// Any other value, blank included; counted as tested but not failing
    Other(String),
}

impl CellValue {
    /// Classify a raw cell
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "yes" => CellValue::Yes,
            "no" => CellValue::No,
            _ => CellValue::Other(normalized),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CellValue::No)
    }
}

/// Read-only matrix built once per run
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    extensions: Vec<String>,
    cells: BTreeMap<String, BTreeMap<String, CellValue>>,
}

impl CompatibilityMatrix {
    /// Create an empty matrix over the given header names.
    ///
    /// Duplicate names keep their first position.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let extensions = extensions
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self {
            extensions,
            cells: BTreeMap::new(),
        }
    }

    /// Record a cell, replacing any earlier value for the same direction
    pub fn insert(&mut self, row: &str, column: &str, value: CellValue) {
        self.cells
            .entry(row.to_string())
            .or_default()
            .insert(column.to_string(), value);
    }

    /// Recorded value for `(row, column)`, if any
    pub fn get(&self, row: &str, column: &str) -> Option<&CellValue> {
        self.cells.get(row).and_then(|cols| cols.get(column))
    }

    /// Header names in source order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `name` is one of the matrix's header extensions
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Number of recorded cells in both directions
    pub fn recorded_cells(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Iterate over every recorded `(row, column, value)` triple
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, &CellValue)> {
        self.cells.iter().flat_map(|(row, cols)| {
            cols.iter()
                .map(move |(col, value)| (row.as_str(), col.as_str(), value))
        })
    }

    /// Aggregate result for `name`, or `None` if the matrix has no data for it
    pub fn result_for(&self, name: &str) -> Option<CompatibilityResult> {
        if !self.contains(name) {
            return None;
        }
        Some(aggregate::compute(name, &self.extensions, self))
    }
}
