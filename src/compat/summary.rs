/// Matrix-wide statistics
///
/// Shown on the results page and in the run summary.

use super::matrix::CompatibilityMatrix;
use serde::Serialize;

/// Summary statistics over every recorded cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    /// Extensions named in the matrix header
    pub extensions: usize,
    /// Recorded cells between distinct header extensions
    pub tested: usize,
    /// Recorded cells marked `no`
    pub failed: usize,
    /// `100 * failed / tested`, or 0 when nothing was tested
    pub failure_percentage: f64,
    /// Header extensions with no recorded cell in either direction
    pub untested: Vec<String>,
}

impl MatrixSummary {
    pub fn from_matrix(matrix: &CompatibilityMatrix) -> Self {
        let header = matrix.extensions();
        let in_header = |name: &str| header.iter().any(|e| e == name);

        let mut tested = 0;
        let mut failed = 0;
        for (row, column, value) in matrix.cells() {
            if row == column || !in_header(row) || !in_header(column) {
                continue;
            }
            tested += 1;
            if value.is_failure() {
                failed += 1;
            }
        }

        let untested = header
            .iter()
            .filter(|name| matrix.result_for(name).map_or(true, |r| r.tested == 0))
            .cloned()
            .collect();

        Self {
            extensions: header.len(),
            tested,
            failed,
            failure_percentage: if tested > 0 {
                (failed as f64 / tested as f64) * 100.0
            } else {
                0.0
            },
            untested,
        }
    }
}
