use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use super::models::{
    EvaluationSummary, PolicyOutcome, SchemaOutcome, ValidationOutcome, YamlOutcome,
};

/// A results document written by the validation pipeline.
#[derive(Debug, Deserialize)]
pub struct ReportDocument {
    /// Kubernetes version used for schema validation.
    pub k8s_version: Option<String>,
    #[serde(default)]
    pub configs_count: usize,
    #[serde(default)]
    pub rules_count: usize,
    /// Replaces the computed `passed/total` schema status, e.g. "no internet connection".
    pub k8s_validation: Option<String>,
    /// Explicit summary; computed from `outcomes` when absent.
    pub summary: Option<EvaluationSummary>,
    #[serde(default)]
    pub outcomes: Vec<ValidationOutcome>,
}

impl ReportDocument {
    /// Declared version, else the one recorded by the first failed schema check.
    pub fn k8s_version(&self) -> Option<&str> {
        self.k8s_version.as_deref().or_else(|| {
            self.outcomes.iter().find_map(|o| match &o.schema {
                SchemaOutcome::Invalid { k8s_version, .. } => Some(k8s_version.as_str()),
                _ => None,
            })
        })
    }

    pub fn summary(&self) -> EvaluationSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }
        let mut summary =
            EvaluationSummary::tally(&self.outcomes, self.configs_count, self.rules_count);
        if let Some(status) = &self.k8s_validation {
            summary.k8s_validation = status.clone();
        }
        summary
    }
}

/// Load a results document from disk. YAML and JSON are chosen by extension.
pub fn load_document(path: &Path) -> Result<ReportDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let document: ReportDocument = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?,
        _ => bail!("Unsupported results format: {}", ext),
    };

    Ok(document)
}

/// Describe inconsistencies the renderer will reproduce verbatim.
pub fn validate_document(document: &ReportDocument) -> Vec<String> {
    let mut warnings = Vec::new();

    for outcome in &document.outcomes {
        let title = outcome.title.trim_end();

        if let YamlOutcome::Invalid { errors } = &outcome.yaml {
            if errors.is_empty() {
                warnings.push(format!("{}: invalid YAML without error messages", title));
            }
            if outcome.schema != SchemaOutcome::NotRun || outcome.policy != PolicyOutcome::NotRun {
                warnings.push(format!(
                    "{}: later stages recorded after invalid YAML will be shown as not run",
                    title
                ));
            }
            continue;
        }

        if let SchemaOutcome::Invalid { errors, .. } = &outcome.schema {
            if errors.is_empty() {
                warnings.push(format!("{}: invalid schema without error messages", title));
            }
            if outcome.policy != PolicyOutcome::NotRun {
                warnings.push(format!(
                    "{}: policy results recorded after invalid schema will be shown as not run",
                    title
                ));
            }
            continue;
        }

        if outcome.schema == SchemaOutcome::NotRun {
            warnings.push(format!(
                "{}: schema validation did not run although YAML is valid, shown as not run",
                title
            ));
            if outcome.policy != PolicyOutcome::NotRun {
                warnings.push(format!(
                    "{}: policy results recorded without schema validation will be shown as not run",
                    title
                ));
            }
            continue;
        }

        if let PolicyOutcome::Evaluated {
            failed_rules,
            skipped_rules,
        } = &outcome.policy
        {
            for rule in failed_rules {
                check_occurrences(
                    &mut warnings,
                    title,
                    &rule.name,
                    rule.occurrences,
                    rule.occurrence_details.len(),
                );
            }
            for rule in skipped_rules {
                check_occurrences(
                    &mut warnings,
                    title,
                    &rule.name,
                    rule.occurrences,
                    rule.occurrence_details.len(),
                );
            }
            if !failed_rules.is_empty() && !skipped_rules.is_empty() {
                warnings.push(format!(
                    "{}: both failed and skipped rules present, skipped rules will not be listed",
                    title
                ));
            }
        }
    }

    warnings
}

fn check_occurrences(
    warnings: &mut Vec<String>,
    title: &str,
    rule: &str,
    occurrences: i64,
    details: usize,
) {
    if occurrences < 1 {
        warnings.push(format!(
            "{}: rule '{}' has {} occurrences",
            title, rule, occurrences
        ));
    } else if occurrences as usize != details {
        warnings.push(format!(
            "{}: rule '{}' claims {} occurrences but lists {} objects",
            title, rule, occurrences, details
        ));
    }
}
