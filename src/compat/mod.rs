//! Extension compatibility analysis
//!
//! The matrix records one outcome per directed pair of extensions:
//! - `yes`: the pair loaded and ran together
//! - `no`: the pair failed
//! - anything else: tested, not counted as a failure
//!
//! Aggregation turns the matrix into a failure rate and a sorted list of
//! failing counterparts per extension.

pub mod aggregate;
pub mod matrix;
pub mod summary;

pub use aggregate::{compute, CompatibilityResult};
pub use matrix::{CellValue, CompatibilityMatrix};
pub use summary::MatrixSummary;
