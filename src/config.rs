//! Optional `policyreport.toml` defaults.
//!
//! Precedence: CLI > config file > defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::theme::ThemeKind;

pub const CONFIG_FILE: &str = "policyreport.toml";
pub const DEFAULT_K8S_VERSION: &str = "1.18.0";

/// Root configuration as written in `policyreport.toml`.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub theme: Option<ThemeKind>,
    pub show_skipped_rules: Option<bool>,
    pub summary: Option<bool>,
    pub k8s_version: Option<String>,
}

/// Settings after applying precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct Effective {
    pub theme: ThemeKind,
    pub show_skipped_rules: bool,
    pub summary: bool,
    pub k8s_version: String,
}

/// Flag values given on the command line; `None` means not given.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub theme: Option<ThemeKind>,
    pub hide_skipped: bool,
    pub no_summary: bool,
}

/// Read a config file. A missing default file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(CONFIG_FILE), false),
    };
    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn resolve_effective(file: &FileConfig, cli: &Overrides) -> Effective {
    Effective {
        theme: cli.theme.or(file.theme).unwrap_or_default(),
        show_skipped_rules: !cli.hide_skipped && file.show_skipped_rules.unwrap_or(true),
        summary: !cli.no_summary && file.summary.unwrap_or(true),
        k8s_version: file
            .k8s_version
            .clone()
            .unwrap_or_else(|| DEFAULT_K8S_VERSION.to_string()),
    }
}
