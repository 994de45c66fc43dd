// Library interface for extcompat
// The binary, integration tests and embedders share these modules

pub mod compat;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evidence;
pub mod report;
pub mod site;
pub mod tables;

pub use config::SiteConfig;
pub use error::SiteError;
pub use report::GenerationReport;
pub use site::{generate, generate_with};
