//! Generation run summary
//!
//! Human-readable (colored) or JSON summary of what a run produced, which
//! pages failed, and which inputs were degraded.

use crate::compat::MatrixSummary;
use crate::diagnostics::Diagnostic;
use nu_ansi_term::Color;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Directory the site was written to
    pub output_dir: PathBuf,
    /// Extensions in the page universe
    pub extensions: usize,
    /// File names written, in write order
    pub pages_written: Vec<String>,
    /// Pages that could not be rendered or written
    pub pages_failed: Vec<String>,
    /// Extensions rendered without compatibility data
    pub without_data: Vec<String>,
    /// Matrix-wide totals
    pub summary: MatrixSummary,
    /// Everything degraded along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    /// Format the report for a terminal
    pub fn format_report(&self, color: bool) -> String {
        let paint = |c: Color, s: String| {
            if color {
                c.paint(s).to_string()
            } else {
                s
            }
        };

        let mut output = String::new();

        output.push_str(&format!(
            "Website generated in '{}'\n",
            self.output_dir.display()
        ));
        output.push_str(&format!(
            "Generated {} HTML files:\n",
            self.pages_written.len()
        ));
        for page in &self.pages_written {
            let label = match page.as_str() {
                "index.html" => format!("{} (homepage)", page),
                "results.html" => format!("{} (results overview)", page),
                _ => page.clone(),
            };
            output.push_str(&format!("  - {}\n", label));
        }
        output.push('\n');

        let rate = format!("{:.1}%", self.summary.failure_percentage);
        let rate = if self.summary.failure_percentage >= 50.0 {
            paint(Color::Red, rate)
        } else if self.summary.failure_percentage >= 10.0 {
            paint(Color::Yellow, rate)
        } else {
            paint(Color::Green, rate)
        };
        output.push_str(&format!(
            "Matrix: {} extensions, {} tests, {} failures ({})\n",
            self.summary.extensions, self.summary.tested, self.summary.failed, rate
        ));

        if !self.without_data.is_empty() {
            output.push_str(&format!(
                "No compatibility data: {}\n",
                self.without_data.join(", ")
            ));
        }

        if !self.pages_failed.is_empty() {
            output.push_str(&format!(
                "\n{} ({}):\n",
                paint(Color::Red, "✗ FAILED PAGES".to_string()),
                self.pages_failed.len()
            ));
            for page in &self.pages_failed {
                output.push_str(&format!("  • {}\n", page));
            }
        }

        if !self.diagnostics.is_empty() {
            output.push_str(&format!(
                "\n{} ({}):\n",
                paint(Color::Yellow, "⚠ WARNINGS".to_string()),
                self.diagnostics.len()
            ));
            for diagnostic in &self.diagnostics {
                output.push_str(&format!("  • {}\n", diagnostic));
            }
        }

        output
    }

    /// Pretty JSON rendering of the report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Determine exit code based on the run
    /// 0: every page written (warnings allowed)
    /// 1: one or more pages failed
    pub fn exit_code(&self) -> i32 {
        if self.pages_failed.is_empty() {
            0
        } else {
            1
        }
    }
}
