//! Output tree
//!
//! Creates the output directory, mirrors asset directories into it and
//! writes rendered pages. Re-running over an existing tree overwrites it.

use crate::diagnostics::Diagnostic;
use crate::error::{Result, SiteError};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Page names reserved for the fixed pages
pub const RESERVED_PAGES: &[&str] = &["index", "results"];

/// Writes files under a single output directory
#[derive(Debug, Clone)]
pub struct SiteWriter {
    out_dir: PathBuf,
}

impl SiteWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Create the output directory and its `css` subdirectory
    pub fn prepare(&self) -> Result<()> {
        let css = self.out_dir.join("css");
        fs::create_dir_all(&css).map_err(|e| SiteError::io(&css, e))
    }

    /// Recursively copy `source` to `<out>/<dest>`, overwriting existing files.
    ///
    /// Returns the number of files copied, or a diagnostic if `source` is
    /// absent or the copy fails partway.
    pub fn copy_assets(&self, source: &Path, dest: &str) -> std::result::Result<usize, Diagnostic> {
        if !source.is_dir() {
            return Err(Diagnostic::MissingAssets {
                path: source.to_path_buf(),
                detail: "directory not found".to_string(),
            }
            .warn());
        }

        let target = self.out_dir.join(dest);
        copy_tree(source, &target).map_err(|e| {
            Diagnostic::MissingAssets {
                path: source.to_path_buf(),
                detail: e.to_string(),
            }
            .warn()
        })
    }

    /// Write `content` to `<out>/<file_name>`
    pub fn write_page(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.out_dir.join(file_name);
        fs::write(&path, content).map_err(|e| SiteError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote page");
        Ok(path)
    }
}

/// File name for an extension's page.
///
/// Names that would escape the output directory or clobber a fixed page
/// are rejected.
pub fn page_file_name(extension: &str) -> Result<String> {
    let invalid = extension.is_empty()
        || extension == "."
        || extension == ".."
        || extension.contains(['/', '\\', '\0'])
        || RESERVED_PAGES.contains(&extension);
    if invalid {
        return Err(SiteError::InvalidPageName(extension.to_string()));
    }
    Ok(format!("{}.html", extension))
}

fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            SiteError::io(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| SiteError::io(&dest, e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| SiteError::io(&dest, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
