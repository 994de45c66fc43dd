//! extcompat - static compatibility website generator
//!
//! Reads the compatibility matrix and extension metadata tables, then renders
//! a home page, a results overview and one page per extension.

use anyhow::{Context, Result};
use clap::Parser;
use extcompat::{SiteConfig, SiteError};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Generate the extension compatibility website
#[derive(Parser)]
#[command(name = "extcompat")]
#[command(author, version, about = "Static website generator for extension compatibility")]
struct Cli {
    /// Project root holding csvs/, layout/, portraits/ (default: current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output directory (default: <root>/build)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Show extension descriptions on the generated pages
    #[arg(long)]
    include_descriptions: bool,

    /// Read settings from this rc file instead of <root>/.extcompatrc
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("extcompat: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = build_config(&cli)?;

    let report = match extcompat::generate(&config) {
        Ok(report) => report,
        Err(SiteError::MissingTemplateSet { dir, missing }) => {
            eprintln!("extcompat: template set in '{}' is incomplete", dir.display());
            eprintln!("  missing: {}", missing.join(", "));
            eprintln!(
                "  required: {}",
                SiteConfig::required_templates().join(", ")
            );
            return Ok(1);
        }
        Err(e) => return Err(e).context("site generation failed"),
    };

    if cli.json {
        println!("{}", report.to_json().context("failed to serialize report")?);
    } else {
        print!("{}", report.format_report(std::io::stdout().is_terminal()));
    }

    Ok(report.exit_code())
}

/// Defaults, then the rc file, then command-line flags
fn build_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = SiteConfig::with_root(&cli.root);
            if !config.apply_file(path) {
                anyhow::bail!("cannot read config file '{}'", path.display());
            }
            config
        }
        None => SiteConfig::discover(&cli.root),
    };

    if let Some(out) = &cli.out {
        config.build_dir = out.clone();
    }
    if cli.include_descriptions {
        config.include_descriptions = true;
    }

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
