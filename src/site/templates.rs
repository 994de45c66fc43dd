//! Template rendering
//!
//! Pages are rendered by name from a mapping of named values. The default
//! engine loads Jinja-style templates from the layout directory at runtime.

use crate::error::{Result, SiteError};
use minijinja::Environment;
use serde_json::Value;
use std::path::Path;

/// Renders a named template against a context mapping
pub trait TemplateEngine {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&str, &Value) -> Result<String>,
{
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        self(template, context)
    }
}

/// MiniJinja environment over a layout directory
pub struct LayoutEngine {
    env: Environment<'static>,
}

impl LayoutEngine {
    /// Load the template set from `dir`.
    ///
    /// Fails with [`SiteError::MissingTemplateSet`] if the directory or any
    /// of `required` is absent, so callers can abort before writing output.
    pub fn from_dir(dir: &Path, required: &[&str]) -> Result<Self> {
        let missing: Vec<String> = if dir.is_dir() {
            required
                .iter()
                .filter(|name| !dir.join(name).is_file())
                .map(|name| name.to_string())
                .collect()
        } else {
            required.iter().map(|name| name.to_string()).collect()
        };

        if !missing.is_empty() {
            return Err(SiteError::MissingTemplateSet {
                dir: dir.to_path_buf(),
                missing,
            });
        }

        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        tracing::debug!(dir = %dir.display(), "loaded template set");
        Ok(Self { env })
    }
}

impl TemplateEngine for LayoutEngine {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let to_error = |e: minijinja::Error| SiteError::Template {
            name: template.to_string(),
            message: e.to_string(),
        };
        self.env
            .get_template(template)
            .map_err(to_error)?
            .render(context)
            .map_err(to_error)
    }
}
