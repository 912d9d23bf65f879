use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod printer;
mod theme;
mod utils;

use theme::ThemeKind;

#[derive(Parser)]
#[command(
    name = "policyreport",
    about = "Render configuration validation results as a text report"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render results documents (YAML/JSON files or directories of them)
    Render {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Marker style: rich (emoji bullets) or simple (ASCII only)
        #[arg(long, value_enum)]
        theme: Option<ThemeKind>,
        /// Do not list rules that were skipped
        #[arg(long)]
        hide_skipped: bool,
        /// Do not print the (Summary) section
        #[arg(long)]
        no_summary: bool,
        /// Write output to file instead of stdout (never read back as input)
        #[arg(long)]
        output: Option<String>,
        /// Path to config file (defaults to ./policyreport.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check results documents for inconsistencies without rendering them
    Validate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            paths,
            theme,
            hide_skipped,
            no_summary,
            output,
            config: config_path,
        } => {
            let file_config = config::load_config(config_path.as_deref())?;
            let settings = config::resolve_effective(
                &file_config,
                &config::Overrides {
                    theme,
                    hide_skipped,
                    no_summary,
                },
            );
            tracing::debug!(?settings, "resolved settings");

            let has_failures = printer::render_report(&paths, &settings, output.as_deref())?;
            if has_failures {
                std::process::exit(1);
            }
        }
        Commands::Validate { paths } => {
            let has_warnings = printer::validate_documents(&paths)?;
            if has_warnings {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
