mod loader;
pub mod models;
mod output;

use anyhow::{Context, Result, ensure};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::Effective;
use crate::theme::Theme;
use crate::utils::collect_documents;
use models::{EvaluationSummary, ValidationOutcome};
use output::Printer;

/// Render results documents as a text report. Returns true if any file failed a stage.
pub fn render_report(paths: &[String], settings: &Effective, output_file: Option<&str>) -> Result<bool> {
    let documents = collect_documents(paths, output_file.map(Path::new))?;
    ensure!(!documents.is_empty(), "No results documents found");

    let mut outcomes: Vec<ValidationOutcome> = Vec::new();
    let mut summaries: Vec<EvaluationSummary> = Vec::new();
    let mut k8s_version: Option<String> = None;

    for path in &documents {
        let document = loader::load_document(path)?;
        for warning in loader::validate_document(&document) {
            tracing::warn!(file = %path.display(), "{}", warning);
        }
        tracing::debug!(file = %path.display(), outcomes = document.outcomes.len(), "loaded results");
        for outcome in &document.outcomes {
            for message in &outcome.extra_messages {
                tracing::debug!(title = %outcome.title.trim_end(), color = %message.color, "extra message");
            }
        }

        summaries.push(document.summary());
        if k8s_version.is_none() {
            k8s_version = document.k8s_version().map(str::to_string);
        }
        outcomes.extend(document.outcomes);
    }

    let printer = Printer::new(Theme::for_kind(settings.theme))
        .with_skipped_rules(settings.show_skipped_rules);
    tracing::debug!(theme = %printer.theme().kind(), files = outcomes.len(), "rendering report");

    let mut sink: Box<dyn Write> = match output_file {
        Some(file_path) => Box::new(BufWriter::new(
            File::create(file_path)
                .with_context(|| format!("Failed to create report file: {}", file_path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    printer
        .write_outcomes(&mut sink, &outcomes)
        .context("Failed to write report")?;
    if settings.summary {
        let summary = merge_summaries(&summaries);
        let version = k8s_version.as_deref().unwrap_or(&settings.k8s_version);
        printer
            .write_summary(&mut sink, &summary, version)
            .context("Failed to write report")?;
    }
    sink.flush().context("Failed to write report")?;

    if let Some(file_path) = output_file {
        eprintln!("Wrote report to {}", file_path);
    }

    Ok(outcomes.iter().any(ValidationOutcome::has_failures))
}

/// Load documents and print their consistency warnings. Returns true if any were found.
pub fn validate_documents(paths: &[String]) -> Result<bool> {
    let documents = collect_documents(paths, None)?;
    ensure!(!documents.is_empty(), "No results documents found");
    let mut has_warnings = false;
    for path in &documents {
        let document = loader::load_document(path)?;
        let warnings = loader::validate_document(&document);
        if warnings.is_empty() {
            println!("{}: ok ({} files)", path.display(), document.outcomes.len());
        } else {
            has_warnings = true;
            println!("{}: {} warnings", path.display(), warnings.len());
            for warning in &warnings {
                println!("  - {}", warning);
            }
        }
    }
    Ok(has_warnings)
}

/// Combine per-document summaries. A single document keeps its status text verbatim.
fn merge_summaries(summaries: &[EvaluationSummary]) -> EvaluationSummary {
    if let [only] = summaries {
        return only.clone();
    }

    let mut merged = EvaluationSummary::default();
    let mut schema_passed = 0;
    let mut fallback: Option<&str> = None;
    for s in summaries {
        merged.configs_count += s.configs_count;
        merged.rules_count += s.rules_count;
        merged.files_count += s.files_count;
        merged.passed_yaml_validation_count += s.passed_yaml_validation_count;
        merged.passed_policy_check_count += s.passed_policy_check_count;
        match parse_ratio(&s.k8s_validation) {
            Some((passed, _)) => schema_passed += passed,
            None => {
                fallback.get_or_insert(s.k8s_validation.as_str());
            }
        }
    }
    merged.k8s_validation = match fallback {
        Some(text) => text.to_string(),
        None => format!("{}/{}", schema_passed, merged.files_count),
    };
    merged
}

fn parse_ratio(status: &str) -> Option<(usize, usize)> {
    let (passed, total) = status.split_once('/')?;
    Some((passed.trim().parse().ok()?, total.trim().parse().ok()?))
}
