//! Captured terminal output for failing pairs
//!
//! Each tested pair has its own folder under the evidence root, named
//! `{first}_{second}` after the load order used in that run. The locator
//! probes both orders for every failing counterpart and keeps whatever
//! exists, so one pair can contribute two entries.

use crate::diagnostics::{Diagnostic, Loaded};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Output captured from one directed pair run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceEntry {
    /// Folder name, `{first_ext}_{second_ext}`
    #[serde(rename = "pair")]
    pub pair_id: String,
    pub first_ext: String,
    pub second_ext: String,
    pub content: String,
}

/// All entries found for one failing counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceGroup {
    pub counterpart: String,
    pub entries: Vec<EvidenceEntry>,
}

/// Finds evidence files by the `<root>/<pair>/<file_name>` convention
#[derive(Debug, Clone)]
pub struct EvidenceLocator {
    root: PathBuf,
    file_name: String,
}

impl EvidenceLocator {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Path probed for a pair identifier
    pub fn path_for(&self, pair_id: &str) -> PathBuf {
        self.root.join(pair_id).join(&self.file_name)
    }

    /// Locate evidence for `extension` against each of `failed`.
    ///
    /// Groups are sorted by counterpart name; within a group the
    /// `{extension}_{counterpart}` entry precedes the reverse one.
    pub fn locate(&self, extension: &str, failed: &[String]) -> Loaded<Vec<EvidenceGroup>> {
        let mut groups: BTreeMap<String, Vec<EvidenceEntry>> = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for counterpart in failed {
            let directions = [
                (extension, counterpart.as_str()),
                (counterpart.as_str(), extension),
            ];
            for (first, second) in directions {
                let pair_id = format!("{}_{}", first, second);
                let path = self.path_for(&pair_id);
                if !path.exists() {
                    continue;
                }
                match read_evidence(&path) {
                    Ok(content) => {
                        groups
                            .entry(counterpart.clone())
                            .or_default()
                            .push(EvidenceEntry {
                                pair_id,
                                first_ext: first.to_string(),
                                second_ext: second.to_string(),
                                content,
                            });
                    }
                    Err(diagnostic) => diagnostics.push(diagnostic),
                }
            }
        }

        let groups = groups
            .into_iter()
            .map(|(counterpart, entries)| EvidenceGroup {
                counterpart,
                entries,
            })
            .collect();

        Loaded::new(groups, diagnostics)
    }
}

fn read_evidence(path: &Path) -> Result<String, Diagnostic> {
    fs::read_to_string(path).map_err(|e| {
        Diagnostic::UnreadableEvidence {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
        .warn()
    })
}
