//! Page contexts
//!
//! One typed context per page kind. Field names are the variable names the
//! layout templates use.

use crate::compat::{CompatibilityResult, MatrixSummary};
use crate::diagnostics::Loaded;
use crate::evidence::{EvidenceEntry, EvidenceLocator};
use crate::tables::InputTables;
use serde::Serialize;

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_TAGS: &str = "None";

/// Home page
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub page_name: &'static str,
}

/// One row of the results overview
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionSummary {
    pub name: String,
    pub source_code: String,
    pub description: String,
    pub failure_rate: f64,
    pub failed_extensions: Vec<String>,
    pub has_compatibility_data: bool,
    pub include_descriptions: bool,
}

/// Results overview page
#[derive(Debug, Clone, Serialize)]
pub struct ResultsPage {
    pub page_name: &'static str,
    pub include_descriptions: bool,
    pub extension_data: Vec<ExtensionSummary>,
    pub summary: MatrixSummary,
}

/// Per-extension detail page
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionPage {
    pub page_name: &'static str,
    pub extension_name: String,
    pub failure_rate: f64,
    pub source_code: String,
    pub description: String,
    pub failed_extensions: Vec<String>,
    /// `[counterpart, entries]` pairs sorted by counterpart
    pub terminal_outputs: Vec<(String, Vec<EvidenceEntry>)>,
    pub extensibility_types: Vec<String>,
    pub system_components: Vec<String>,
    pub has_compatibility_data: bool,
    pub include_descriptions: bool,
}

/// Builds page contexts from the loaded tables
pub struct PageBuilder<'a> {
    tables: &'a InputTables,
    evidence: &'a EvidenceLocator,
    include_descriptions: bool,
}

impl<'a> PageBuilder<'a> {
    pub fn new(
        tables: &'a InputTables,
        evidence: &'a EvidenceLocator,
        include_descriptions: bool,
    ) -> Self {
        Self {
            tables,
            evidence,
            include_descriptions,
        }
    }

    /// Compatibility result for `name`, and whether the matrix covers it.
    ///
    /// Names outside the matrix get an untested result.
    pub fn compatibility(&self, name: &str) -> (CompatibilityResult, bool) {
        match self.tables.matrix.result_for(name) {
            Some(result) => (result, true),
            None => (CompatibilityResult::untested(), false),
        }
    }

    pub fn description(&self, name: &str) -> String {
        if !self.include_descriptions {
            return String::new();
        }
        self.tables
            .descriptions
            .get(name)
            .cloned()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    pub fn source_code(&self, name: &str) -> String {
        self.tables.source_code.get(name).cloned().unwrap_or_default()
    }

    pub fn home(&self) -> HomePage {
        HomePage { page_name: "home" }
    }

    pub fn results(&self) -> ResultsPage {
        let extension_data = self
            .tables
            .infos
            .universe
            .iter()
            .map(|name| {
                let (result, has_data) = self.compatibility(name);
                ExtensionSummary {
                    name: name.clone(),
                    source_code: self.source_code(name),
                    description: self.description(name),
                    failure_rate: result.failure_rate,
                    failed_extensions: result.failed_extensions,
                    has_compatibility_data: has_data,
                    include_descriptions: self.include_descriptions,
                }
            })
            .collect();

        ResultsPage {
            page_name: "results",
            include_descriptions: self.include_descriptions,
            extension_data,
            summary: MatrixSummary::from_matrix(&self.tables.matrix),
        }
    }

    /// Detail page for `name`, with any evidence diagnostics
    pub fn extension(&self, name: &str) -> Loaded<ExtensionPage> {
        let (result, has_data) = self.compatibility(name);

        let evidence = if has_data {
            self.evidence.locate(name, &result.failed_extensions)
        } else {
            Loaded::clean(Vec::new())
        };

        let extensibility_types = self
            .tables
            .infos
            .extensibility
            .get(name)
            .map(|tags| labels(tags.iter().map(|t| t.as_str())))
            .unwrap_or_else(|| vec![NO_TAGS.to_string()]);

        let system_components = self
            .tables
            .mechanisms
            .get(name)
            .map(|tags| labels(tags.iter().map(|t| t.as_str())))
            .unwrap_or_else(|| vec![NO_TAGS.to_string()]);

        let page = ExtensionPage {
            page_name: "extension",
            extension_name: name.to_string(),
            failure_rate: result.failure_rate,
            source_code: self.source_code(name),
            description: self.description(name),
            failed_extensions: result.failed_extensions,
            terminal_outputs: evidence
                .data
                .into_iter()
                .map(|group| (group.counterpart, group.entries))
                .collect(),
            extensibility_types,
            system_components,
            has_compatibility_data: has_data,
            include_descriptions: self.include_descriptions,
        };

        Loaded::new(page, evidence.diagnostics)
    }
}

/// Tag labels, or the `None` sentinel when there are none
fn labels<'t>(tags: impl Iterator<Item = &'t str>) -> Vec<String> {
    let labels: Vec<String> = tags.map(str::to_string).collect();
    if labels.is_empty() {
        vec![NO_TAGS.to_string()]
    } else {
        labels
    }
}
