//! Per-extension failure aggregation
//!
//! Every unordered pair contributes up to two observations: the row cell
//! `(extension, other)` and the column cell `(other, extension)`. Each
//! recorded cell is one test; each `no` is one failure. A pair whose two
//! directions disagree counts as one failure out of two tests.

use super::matrix::CompatibilityMatrix;
use serde::Serialize;
use std::collections::BTreeSet;

/// Failure statistics for one extension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityResult {
    /// Percentage of recorded tests marked as failing, in `[0, 100]`
    pub failure_rate: f64,
    /// Counterparts that failed in either direction, sorted and unique
    pub failed_extensions: Vec<String>,
    /// Recorded cells touching the extension
    pub tested: usize,
    /// Recorded cells touching the extension marked `no`
    pub failed: usize,
}

impl CompatibilityResult {
    /// Result for an extension with nothing recorded
    pub fn untested() -> Self {
        Self {
            failure_rate: 0.0,
            failed_extensions: Vec::new(),
            tested: 0,
            failed: 0,
        }
    }
}

/// Compute the failure rate and failing counterparts of `extension`.
///
/// Only names in `extensions` are considered as counterparts, and the
/// extension is never compared against itself.
pub fn compute(
    extension: &str,
    extensions: &[String],
    matrix: &CompatibilityMatrix,
) -> CompatibilityResult {
    let mut tested = 0usize;
    let mut failed = 0usize;
    let mut failing = BTreeSet::new();

    let others = || extensions.iter().filter(|o| o.as_str() != extension);

    // Row pass
    for other in others() {
        if let Some(cell) = matrix.get(extension, other) {
            tested += 1;
            if cell.is_failure() {
                failed += 1;
                failing.insert(other.clone());
            }
        }
    }

    // Column pass
    for other in others() {
        if let Some(cell) = matrix.get(other, extension) {
            tested += 1;
            if cell.is_failure() {
                failed += 1;
                failing.insert(other.clone());
            }
        }
    }

    let failure_rate = if tested > 0 {
        (failed as f64 / tested as f64) * 100.0
    } else {
        0.0
    };

    CompatibilityResult {
        failure_rate,
        failed_extensions: failing.into_iter().collect(),
        tested,
        failed,
    }
}
