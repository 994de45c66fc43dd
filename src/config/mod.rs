//! Site configuration
//!
//! Every input and output location, resolved against a project root.
//! Defaults follow the conventional layout:
//! - csvs/compatibility.csv, csvs/source_code.csv, csvs/descriptions.csv,
//!   csvs/infos.csv, csvs/mechanisms.csv
//! - layout/ (templates) and layout/css/
//! - portraits/
//! - total_compat_output/<pair>/terminal.txt
//! - build/ (output)
//!
//! Overrides come from an rc file (`.extcompatrc`) with shell-style
//! assignments:
//! - EXTCOMPAT_BUILD_DIR=site
//! - export EXTCOMPAT_INCLUDE_DESCRIPTIONS="yes"

use std::fs;
use std::path::{Path, PathBuf};

/// Name of the rc file looked up in the project root
pub const RC_FILE: &str = ".extcompatrc";

/// Complete configuration for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub compatibility_csv: PathBuf,
    pub source_code_csv: PathBuf,
    pub descriptions_csv: PathBuf,
    pub infos_csv: PathBuf,
    pub mechanisms_csv: PathBuf,
    /// Template directory; required
    pub layout_dir: PathBuf,
    /// Stylesheets copied to `<build>/css`
    pub css_dir: PathBuf,
    /// Portrait images copied to `<build>/portraits`
    pub portraits_dir: PathBuf,
    /// Root holding one `<pair>/<evidence_file>` per tested pair
    pub evidence_dir: PathBuf,
    pub evidence_file: String,
    pub build_dir: PathBuf,
    pub include_descriptions: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_root(".")
    }
}

impl SiteConfig {
    /// Default layout under `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            compatibility_csv: root.join("csvs/compatibility.csv"),
            source_code_csv: root.join("csvs/source_code.csv"),
            descriptions_csv: root.join("csvs/descriptions.csv"),
            infos_csv: root.join("csvs/infos.csv"),
            mechanisms_csv: root.join("csvs/mechanisms.csv"),
            layout_dir: root.join("layout"),
            css_dir: root.join("layout/css"),
            portraits_dir: root.join("portraits"),
            evidence_dir: root.join("total_compat_output"),
            evidence_file: "terminal.txt".to_string(),
            build_dir: root.join("build"),
            include_descriptions: false,
            root,
        }
    }

    /// Defaults under `root`, overridden by `root/.extcompatrc` when present
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::with_root(root);
        let rc = config.root.join(RC_FILE);
        if let Some(content) = read_rc(&rc) {
            tracing::debug!(path = %rc.display(), "applying rc file");
            config.apply(&content);
        }
        config
    }

    /// Apply overrides from an rc file at `path`.
    ///
    /// Returns `false` if the file could not be read.
    pub fn apply_file(&mut self, path: &Path) -> bool {
        match read_rc(path) {
            Some(content) => {
                self.apply(&content);
                true
            }
            None => false,
        }
    }

    /// Parse rc content on top of the defaults for `root`
    pub fn parse(root: impl Into<PathBuf>, content: &str) -> Self {
        let mut config = Self::with_root(root);
        config.apply(content);
        config
    }

    /// Apply rc-style overrides. Unknown keys are ignored.
    pub fn apply(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value);
            match key.trim() {
                "EXTCOMPAT_COMPATIBILITY_CSV" => self.compatibility_csv = self.resolve(&value),
                "EXTCOMPAT_SOURCE_CODE_CSV" => self.source_code_csv = self.resolve(&value),
                "EXTCOMPAT_DESCRIPTIONS_CSV" => self.descriptions_csv = self.resolve(&value),
                "EXTCOMPAT_INFOS_CSV" => self.infos_csv = self.resolve(&value),
                "EXTCOMPAT_MECHANISMS_CSV" => self.mechanisms_csv = self.resolve(&value),
                "EXTCOMPAT_LAYOUT_DIR" => self.layout_dir = self.resolve(&value),
                "EXTCOMPAT_CSS_DIR" => self.css_dir = self.resolve(&value),
                "EXTCOMPAT_PORTRAITS_DIR" => self.portraits_dir = self.resolve(&value),
                "EXTCOMPAT_EVIDENCE_DIR" => self.evidence_dir = self.resolve(&value),
                "EXTCOMPAT_EVIDENCE_FILE" => self.evidence_file = value,
                "EXTCOMPAT_BUILD_DIR" => self.build_dir = self.resolve(&value),
                "EXTCOMPAT_INCLUDE_DESCRIPTIONS" => self.include_descriptions = parse_bool(&value),
                other => tracing::debug!(key = other, "ignoring unknown rc key"),
            }
        }
    }

    /// Resolve `value` against the root unless it is absolute
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Template names that must exist before anything is written
    pub fn required_templates() -> &'static [&'static str] {
        &["index.html", "results.html", "extension.html"]
    }
}

fn read_rc(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Strip one pair of matching single or double quotes
fn unquote(value: &str) -> String {
    let value = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
        .to_string()
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
