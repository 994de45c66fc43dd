//! Per-extension metadata readers
//!
//! All four tables are keyed by the `Extension Name` column. Columns a
//! table lacks take their default (empty text, flag not set).

use super::{is_yes, read_records};
use crate::diagnostics::{Diagnostic, Loaded};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Extensibility mechanism an extension uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ExtensibilityType {
    Functions,
    Types,
    #[serde(rename = "Index Access Methods")]
    IndexAccessMethods,
    #[serde(rename = "Storage Managers")]
    StorageManagers,
    #[serde(rename = "Client Authentication")]
    ClientAuthentication,
    #[serde(rename = "Query Processing")]
    QueryProcessing,
    #[serde(rename = "Utility Commands")]
    UtilityCommands,
}

impl ExtensibilityType {
    pub const ALL: [ExtensibilityType; 7] = [
        ExtensibilityType::Functions,
        ExtensibilityType::Types,
        ExtensibilityType::IndexAccessMethods,
        ExtensibilityType::StorageManagers,
        ExtensibilityType::ClientAuthentication,
        ExtensibilityType::QueryProcessing,
        ExtensibilityType::UtilityCommands,
    ];

    /// Column header and display label
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensibilityType::Functions => "Functions",
            ExtensibilityType::Types => "Types",
            ExtensibilityType::IndexAccessMethods => "Index Access Methods",
            ExtensibilityType::StorageManagers => "Storage Managers",
            ExtensibilityType::ClientAuthentication => "Client Authentication",
            ExtensibilityType::QueryProcessing => "Query Processing",
            ExtensibilityType::UtilityCommands => "Utility Commands",
        }
    }
}

impl fmt::Display for ExtensibilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System component an extension hooks into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SystemComponent {
    #[serde(rename = "Memory Allocation")]
    MemoryAllocation,
    #[serde(rename = "Background Workers")]
    BackgroundWorkers,
    #[serde(rename = "Custom Configuration Variables")]
    CustomConfigurationVariables,
}

impl SystemComponent {
    pub const ALL: [SystemComponent; 3] = [
        SystemComponent::MemoryAllocation,
        SystemComponent::BackgroundWorkers,
        SystemComponent::CustomConfigurationVariables,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemComponent::MemoryAllocation => "Memory Allocation",
            SystemComponent::BackgroundWorkers => "Background Workers",
            SystemComponent::CustomConfigurationVariables => "Custom Configuration Variables",
        }
    }
}

impl fmt::Display for SystemComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extensibility table: the page universe plus tags per extension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Infos {
    /// Extension names in table order, each listed once
    pub universe: Vec<String>,
    /// Flagged extensibility types; empty means none
    pub extensibility: BTreeMap<String, Vec<ExtensibilityType>>,
}

fn yes_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(is_yes(&value))
}

#[derive(Debug, Deserialize)]
struct SourceCodeRow {
    #[serde(rename = "Extension Name")]
    name: String,
    #[serde(rename = "Source Code", default)]
    source_code: String,
}

#[derive(Debug, Deserialize)]
struct DescriptionRow {
    #[serde(rename = "Extension Name")]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct InfoRow {
    #[serde(rename = "Extension Name")]
    name: String,
    #[serde(rename = "Functions", default, deserialize_with = "yes_flag")]
    functions: bool,
    #[serde(rename = "Types", default, deserialize_with = "yes_flag")]
    types: bool,
    #[serde(rename = "Index Access Methods", default, deserialize_with = "yes_flag")]
    index_access_methods: bool,
    #[serde(rename = "Storage Managers", default, deserialize_with = "yes_flag")]
    storage_managers: bool,
    #[serde(rename = "Client Authentication", default, deserialize_with = "yes_flag")]
    client_authentication: bool,
    #[serde(rename = "Query Processing", default, deserialize_with = "yes_flag")]
    query_processing: bool,
    #[serde(rename = "Utility Commands", default, deserialize_with = "yes_flag")]
    utility_commands: bool,
}

impl InfoRow {
    fn tags(&self) -> Vec<ExtensibilityType> {
        let flags = [
            self.functions,
            self.types,
            self.index_access_methods,
            self.storage_managers,
            self.client_authentication,
            self.query_processing,
            self.utility_commands,
        ];
        ExtensibilityType::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(tag, set)| set.then_some(tag))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct MechanismRow {
    #[serde(rename = "Extension Name")]
    name: String,
    #[serde(rename = "Memory Allocation", default, deserialize_with = "yes_flag")]
    memory_allocation: bool,
    #[serde(rename = "Background Workers", default, deserialize_with = "yes_flag")]
    background_workers: bool,
    #[serde(
        rename = "Custom Configuration Variables",
        default,
        deserialize_with = "yes_flag"
    )]
    custom_configuration_variables: bool,
    #[serde(rename = "Number of Components", default = "no_components")]
    component_count: String,
}

/// A table without a count column reads as having no components
fn no_components() -> String {
    "0".to_string()
}

impl MechanismRow {
    fn tags(&self) -> Vec<SystemComponent> {
        // A zero count overrides any flags
        if self.component_count.trim() == "0" {
            return Vec::new();
        }
        let flags = [
            self.memory_allocation,
            self.background_workers,
            self.custom_configuration_variables,
        ];
        SystemComponent::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(tag, set)| set.then_some(tag))
            .collect()
    }
}

/// Drop rows without a name, reporting them
fn named_rows<T>(
    path: &Path,
    loaded: Loaded<Vec<(u64, T)>>,
    name: impl Fn(&T) -> &str,
) -> Loaded<Vec<T>> {
    let mut diagnostics = loaded.diagnostics;
    let mut rows = Vec::with_capacity(loaded.data.len());
    for (line, row) in loaded.data {
        if name(&row).is_empty() {
            diagnostics.push(Diagnostic::malformed_row(path, line, "empty Extension Name").warn());
        } else {
            rows.push(row);
        }
    }
    Loaded::new(rows, diagnostics)
}

/// Map of extension name to source code URL
pub fn read_source_code(path: &Path) -> Loaded<BTreeMap<String, String>> {
    let loaded = named_rows(
        path,
        read_records::<SourceCodeRow>(path, "source code links"),
        |r| r.name.as_str(),
    );
    let data = loaded
        .data
        .into_iter()
        .map(|r| (r.name, r.source_code))
        .collect();
    Loaded::new(data, loaded.diagnostics)
}

/// Map of extension name to description
pub fn read_descriptions(path: &Path) -> Loaded<BTreeMap<String, String>> {
    let loaded = named_rows(
        path,
        read_records::<DescriptionRow>(path, "descriptions"),
        |r| r.name.as_str(),
    );
    let data = loaded
        .data
        .into_iter()
        .map(|r| (r.name, r.description))
        .collect();
    Loaded::new(data, loaded.diagnostics)
}

/// Extensibility tags and the ordered universe of extension names.
///
/// A repeated name keeps its first position in the universe; its last
/// row's tags win.
pub fn read_infos(path: &Path) -> Loaded<Infos> {
    let loaded = named_rows(
        path,
        read_records::<InfoRow>(path, "extensibility info"),
        |r| r.name.as_str(),
    );

    let mut infos = Infos::default();
    let mut seen = HashSet::new();
    for row in loaded.data {
        if seen.insert(row.name.clone()) {
            infos.universe.push(row.name.clone());
        } else {
            tracing::debug!(extension = %row.name, "duplicate infos row, later row wins");
        }
        let tags = row.tags();
        infos.extensibility.insert(row.name, tags);
    }

    Loaded::new(infos, loaded.diagnostics)
}

/// Map of extension name to flagged system components; empty means none
pub fn read_mechanisms(path: &Path) -> Loaded<BTreeMap<String, Vec<SystemComponent>>> {
    let loaded = named_rows(
        path,
        read_records::<MechanismRow>(path, "system components info"),
        |r| r.name.as_str(),
    );
    let data = loaded
        .data
        .into_iter()
        .map(|r| {
            let tags = r.tags();
            (r.name, tags)
        })
        .collect();
    Loaded::new(data, loaded.diagnostics)
}
