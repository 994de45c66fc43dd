//! Compatibility matrix reader
//!
//! Layout: the header row is a corner cell followed by extension names; each
//! data row is an extension name followed by one cell per header name.

use super::open_csv;
use crate::compat::{CellValue, CompatibilityMatrix};
use crate::diagnostics::{Diagnostic, Loaded};
use std::path::Path;

/// Read the compatibility matrix from `path`.
///
/// Every cell present in a row is recorded, blank ones included, so a blank
/// cell counts as a passing test. Short rows leave their trailing cells
/// unrecorded. Cells beyond the header are ignored. A repeated row name merges into the earlier row,
/// later cells winning.
pub fn read_compatibility(path: &Path) -> Loaded<CompatibilityMatrix> {
    let mut reader = match open_csv(path, "compatibility results", false) {
        Ok(reader) => reader,
        Err(diagnostic) => return Loaded::new(CompatibilityMatrix::default(), vec![diagnostic]),
    };

    let mut diagnostics = Vec::new();
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().skip(1).map(str::to_string).collect(),
        Some(Err(e)) => {
            diagnostics.push(Diagnostic::malformed_row(path, 1, e.to_string()).warn());
            return Loaded::new(CompatibilityMatrix::default(), diagnostics);
        }
        None => {
            diagnostics.push(Diagnostic::malformed_row(path, 1, "missing header row").warn());
            return Loaded::new(CompatibilityMatrix::default(), diagnostics);
        }
    };

    let mut matrix = CompatibilityMatrix::new(header.iter().filter(|name| !name.is_empty()).cloned());

    for result in records {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                diagnostics.push(Diagnostic::malformed_row(path, line, e.to_string()).warn());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row = match record.get(0) {
            Some(name) if !name.is_empty() => name,
            _ => {
                if record.iter().any(|cell| !cell.is_empty()) {
                    diagnostics
                        .push(Diagnostic::malformed_row(path, line, "row has no extension name").warn());
                }
                continue;
            }
        };

        let cells = record.len().saturating_sub(1);
        if cells > header.len() {
            diagnostics.push(
                Diagnostic::malformed_row(
                    path,
                    line,
                    format!("{} cells beyond the header ignored", cells - header.len()),
                )
                .warn(),
            );
        }

        for (column, raw) in header.iter().zip(record.iter().skip(1)) {
            if column.is_empty() {
                continue;
            }
            matrix.insert(row, column, CellValue::parse(raw));
        }
    }

    tracing::debug!(
        path = %path.display(),
        extensions = matrix.extensions().len(),
        cells = matrix.recorded_cells(),
        "read compatibility matrix"
    );

    Loaded::new(matrix, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::test_support::write_csv;
    use tempfile::TempDir;

    #[test]
    fn test_read_basic_matrix() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "compatibility.csv",
            "Extension,A,B,C\nA,,no,yes\nB,Yes,,NO\nC,no,yes,\n",
        );
        let loaded = read_compatibility(&path);
        assert!(loaded.diagnostics.is_empty());

        let m = loaded.data;
        assert_eq!(m.extensions(), &["A", "B", "C"]);
        assert_eq!(m.get("A", "B"), Some(&CellValue::No));
        assert_eq!(m.get("B", "A"), Some(&CellValue::Yes));
        assert_eq!(m.get("B", "C"), Some(&CellValue::No));
        assert_eq!(m.get("A", "A"), Some(&CellValue::Other(String::new())));
        assert_eq!(m.recorded_cells(), 9);
    }

    #[test]
    fn test_blank_cells_count_as_passing_tests() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", "x,A,B,C
A,,no,
B,yes,,
C,,,
");
        let m = read_compatibility(&path).data;

        assert_eq!(m.get("A", "C"), Some(&CellValue::Other(String::new())));
        let a = m.result_for("A").unwrap();
        assert_eq!(a.tested, 4);
        assert_eq!(a.failed, 1);
        assert_eq!(a.failure_rate, 25.0);
        assert_eq!(a.failed_extensions, vec!["B"]);
    }

    #[test]
    fn test_cells_past_short_row_stay_unrecorded() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", "x,A,B,C
A,,no
");
        let m = read_compatibility(&path).data;

        assert_eq!(m.get("A", "B"), Some(&CellValue::No));
        assert_eq!(m.get("A", "C"), None);
        let a = m.result_for("A").unwrap();
        assert_eq!(a.tested, 1);
        assert_eq!(a.failure_rate, 100.0);
    }

    #[test]
    fn test_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", " x , A , B \n A , yes , no \n");
        let m = read_compatibility(&path).data;
        assert_eq!(m.extensions(), &["A", "B"]);
        assert_eq!(m.get("A", "B"), Some(&CellValue::No));
    }

    #[test]
    fn test_short_and_long_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", "x,A,B\nA,yes\nB,no,yes,extra\n");
        let loaded = read_compatibility(&path);
        let m = &loaded.data;
        assert_eq!(m.get("A", "A"), Some(&CellValue::Yes));
        assert_eq!(m.get("A", "B"), None);
        assert_eq!(m.get("B", "A"), Some(&CellValue::No));
        assert_eq!(loaded.diagnostics.len(), 1);
        assert!(matches!(
            loaded.diagnostics[0],
            Diagnostic::MalformedRow { line: 3, .. }
        ));
    }

    #[test]
    fn test_duplicate_rows_merge() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", "x,A,B\nA,,no\nA,,yes\n");
        let m = read_compatibility(&path).data;
        assert_eq!(m.get("A", "B"), Some(&CellValue::Yes));
    }

    #[test]
    fn test_missing_file_degrades() {
        let dir = TempDir::new().unwrap();
        let loaded = read_compatibility(&dir.path().join("absent.csv"));
        assert!(loaded.data.is_empty());
        assert!(matches!(
            loaded.diagnostics.as_slice(),
            [Diagnostic::MissingInput { .. }]
        ));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "c.csv", "");
        let loaded = read_compatibility(&path);
        assert!(loaded.data.is_empty());
        assert_eq!(loaded.diagnostics.len(), 1);
    }
}
