//! Site generation
//!
//! Drives a full run:
//! 1. Load the template set (abort if incomplete)
//! 2. Read the input tables
//! 3. Prepare the output tree and copy assets
//! 4. Render and write the home, results and per-extension pages
//!
//! Pages are independent. A page that fails to render or write is recorded
//! in the report and the run carries on.

pub mod page;
pub mod templates;
pub mod writer;

pub use page::{ExtensionPage, HomePage, PageBuilder, ResultsPage};
pub use templates::{LayoutEngine, TemplateEngine};
pub use writer::{page_file_name, SiteWriter};

use crate::compat::MatrixSummary;
use crate::config::SiteConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{Result, SiteError};
use crate::evidence::EvidenceLocator;
use crate::report::GenerationReport;
use crate::tables::InputTables;
use serde::Serialize;

pub const HOME_TEMPLATE: &str = "index.html";
pub const RESULTS_TEMPLATE: &str = "results.html";
pub const EXTENSION_TEMPLATE: &str = "extension.html";

/// Generate the site using the template set in `config.layout_dir`
pub fn generate(config: &SiteConfig) -> Result<GenerationReport> {
    let engine = LayoutEngine::from_dir(&config.layout_dir, SiteConfig::required_templates())?;
    generate_with(config, &engine)
}

/// Generate the site with a caller-supplied template engine
pub fn generate_with(config: &SiteConfig, engine: &dyn TemplateEngine) -> Result<GenerationReport> {
    let mut diagnostics = Vec::new();
    let tables = InputTables::load(config).drain_into(&mut diagnostics);

    let writer = SiteWriter::new(&config.build_dir);
    writer.prepare()?;

    match writer.copy_assets(&config.css_dir, "css") {
        Ok(count) => tracing::info!(files = count, "copied stylesheets"),
        Err(diagnostic) => diagnostics.push(diagnostic),
    }
    match writer.copy_assets(&config.portraits_dir, "portraits") {
        Ok(count) => tracing::info!(files = count, "copied portraits"),
        Err(diagnostic) => diagnostics.push(diagnostic),
    }

    let locator = EvidenceLocator::new(&config.evidence_dir, config.evidence_file.clone());
    let builder = PageBuilder::new(&tables, &locator, config.include_descriptions);

    let mut run = PageRun {
        engine,
        writer: &writer,
        written: Vec::new(),
        failed: Vec::new(),
        diagnostics: &mut diagnostics,
    };

    run.emit("index.html", HOME_TEMPLATE, &builder.home());
    run.emit("results.html", RESULTS_TEMPLATE, &builder.results());

    let mut without_data = Vec::new();
    for name in &tables.infos.universe {
        let file_name = match page_file_name(name) {
            Ok(file_name) => file_name,
            Err(e) => {
                run.fail(name.clone(), e.to_string());
                continue;
            }
        };
        let page = builder.extension(name).drain_into(run.diagnostics);
        if !page.has_compatibility_data {
            without_data.push(name.clone());
        }
        run.emit(&file_name, EXTENSION_TEMPLATE, &page);
    }

    let (written, failed) = (run.written, run.failed);
    tracing::info!(
        written = written.len(),
        failed = failed.len(),
        out = %config.build_dir.display(),
        "site generated"
    );

    Ok(GenerationReport {
        output_dir: config.build_dir.clone(),
        extensions: tables.infos.universe.len(),
        pages_written: written,
        pages_failed: failed,
        without_data,
        summary: MatrixSummary::from_matrix(&tables.matrix),
        diagnostics,
    })
}

/// Render-and-write loop state
struct PageRun<'a> {
    engine: &'a dyn TemplateEngine,
    writer: &'a SiteWriter,
    written: Vec<String>,
    failed: Vec<String>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl PageRun<'_> {
    fn emit<C: Serialize>(&mut self, file_name: &str, template: &str, context: &C) {
        let result = serde_json::to_value(context)
            .map_err(SiteError::from)
            .and_then(|value| self.engine.render(template, &value))
            .and_then(|html| self.writer.write_page(file_name, &html));
        match result {
            Ok(_) => self.written.push(file_name.to_string()),
            Err(e) => self.fail(file_name.to_string(), e.to_string()),
        }
    }

    fn fail(&mut self, page: String, error: String) {
        self.diagnostics
            .push(Diagnostic::PageFailed { page: page.clone(), error }.warn());
        self.failed.push(page);
    }
}
