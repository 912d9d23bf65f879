use std::io::{self, Write};

use super::models::{
    EvaluationSummary, ExtraMessage, FailedRule, PolicyOutcome, SchemaOutcome, SkippedRule,
    ValidationOutcome, YamlOutcome,
};
use crate::theme::{Marker, Theme};

/// Renders validation outcomes as plain text.
///
/// Rendering is a pure projection of its input: nothing is validated,
/// reordered or retained between calls.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    theme: Theme,
    show_skipped_rules: bool,
}

impl Printer {
    pub fn new(theme: Theme) -> Self {
        Printer {
            theme,
            show_skipped_rules: true,
        }
    }

    /// Hide or show the `SKIPPED` listing under a policy check.
    pub fn with_skipped_rules(mut self, show: bool) -> Self {
        self.show_skipped_rules = show;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    // ===== Sinks =====

    pub fn write_outcomes<W: Write>(&self, out: &mut W, outcomes: &[ValidationOutcome]) -> io::Result<()> {
        out.write_all(self.render_outcomes(outcomes).as_bytes())
    }

    pub fn write_summary<W: Write>(
        &self,
        out: &mut W,
        summary: &EvaluationSummary,
        k8s_version: &str,
    ) -> io::Result<()> {
        out.write_all(self.render_summary(summary, k8s_version).as_bytes())
    }

    // ===== Per-file sections =====

    pub fn render_outcomes(&self, outcomes: &[ValidationOutcome]) -> String {
        let mut text = String::new();
        for outcome in outcomes {
            self.push_outcome(&mut text, outcome);
        }
        text
    }

    fn push_outcome(&self, text: &mut String, outcome: &ValidationOutcome) {
        // A title ending in '\n' yields a second blank line.
        text.push_str(&format!(">>  File: {}\n\n", outcome.title));
        self.push_stages(text, outcome);
        text.push('\n');
    }

    fn push_stages(&self, text: &mut String, outcome: &ValidationOutcome) {
        if let YamlOutcome::Invalid { errors } = &outcome.yaml {
            self.push_status(text, Marker::Failed, "YAML validation");
            text.push('\n');
            self.push_errors(text, errors);
            text.push('\n');
            self.push_status(text, Marker::NotRun, "Kubernetes schema validation didn't run for this file");
            self.push_status(text, Marker::NotRun, "Policy check didn't run for this file");
            return;
        }
        self.push_status(text, Marker::Passed, "YAML validation");

        if let SchemaOutcome::Invalid { errors, .. } = &outcome.schema {
            self.push_status(text, Marker::Failed, "Kubernetes schema validation");
            text.push('\n');
            self.push_errors(text, errors);
            push_extra_messages_line(text, &outcome.extra_messages);
            self.push_status(text, Marker::NotRun, "Policy check didn't run for this file");
            return;
        }
        if outcome.schema == SchemaOutcome::NotRun {
            self.push_status(text, Marker::NotRun, "Kubernetes schema validation didn't run for this file");
            self.push_status(text, Marker::NotRun, "Policy check didn't run for this file");
            return;
        }
        self.push_status(text, Marker::Passed, "Kubernetes schema validation");

        let (failed_rules, skipped_rules) = match &outcome.policy {
            PolicyOutcome::Evaluated {
                failed_rules,
                skipped_rules,
            } => (failed_rules, skipped_rules),
            PolicyOutcome::NotRun => {
                self.push_status(text, Marker::NotRun, "Policy check didn't run for this file");
                return;
            }
        };

        text.push('\n');
        if failed_rules.is_empty() && skipped_rules.is_empty() {
            self.push_status(text, Marker::Passed, "Policy check");
        } else if !failed_rules.is_empty() {
            self.push_status(text, Marker::Failed, "Policy check");
            for rule in failed_rules {
                self.push_failed_rule(text, rule);
            }
        } else {
            self.push_status(text, Marker::Failed, "Policy check");
            text.push('\n');
            if self.show_skipped_rules {
                text.push_str("SKIPPED\n\n");
                for rule in skipped_rules {
                    self.push_skipped_rule(text, rule);
                }
            }
        }

        for message in &outcome.extra_messages {
            text.push_str(&message.text);
            text.push('\n');
        }
    }

    fn push_failed_rule(&self, text: &mut String, rule: &FailedRule) {
        text.push('\n');
        text.push_str(&format!(
            "{}  {}  [{}]\n",
            self.theme.token(Marker::Error),
            rule.name,
            occurrences_label(rule.occurrences)
        ));
        for detail in &rule.occurrence_details {
            push_object_line(text, &detail.metadata_name, &detail.kind);
            for location in &detail.failure_locations {
                let key = location
                    .schema_path
                    .strip_prefix('.')
                    .unwrap_or(&location.schema_path);
                text.push_str(&format!(
                    "      > key: {} (line: {}:{})\n",
                    key, location.line, location.column
                ));
            }
        }
        text.push('\n');
        self.push_bullet(text, Marker::Suggestion, &rule.suggestion);
    }

    fn push_skipped_rule(&self, text: &mut String, rule: &SkippedRule) {
        self.push_bullet(text, Marker::Skip, &rule.name);
        for detail in &rule.occurrence_details {
            push_object_line(text, &detail.metadata_name, &detail.kind);
            self.push_bullet(text, Marker::Suggestion, &detail.skip_message);
        }
        text.push('\n');
    }

    fn push_errors(&self, text: &mut String, errors: &[String]) {
        for error in errors {
            self.push_bullet(text, Marker::Error, error);
        }
    }

    fn push_status(&self, text: &mut String, marker: Marker, label: &str) {
        text.push_str(&format!("{} {}\n", self.theme.token(marker), label));
    }

    fn push_bullet(&self, text: &mut String, marker: Marker, message: &str) {
        text.push_str(&format!("{}  {}\n", self.theme.token(marker), message));
    }

    // ===== Summary =====

    pub fn render_summary(&self, summary: &EvaluationSummary, k8s_version: &str) -> String {
        let mut text = String::from("(Summary)\n\n");
        text.push_str(&format!(
            "- Passing YAML validation: {}/{}\n\n",
            summary.passed_yaml_validation_count, summary.files_count
        ));
        text.push_str(&format!(
            "- Passing Kubernetes ({}) schema validation: {}\n\n",
            k8s_version, summary.k8s_validation
        ));
        text.push_str(&format!(
            "- Passing policy check: {}/{}\n\n",
            summary.passed_policy_check_count, summary.files_count
        ));
        text
    }
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new(Theme::default())
    }
}

fn occurrences_label(count: i64) -> String {
    if count == 1 {
        format!("{} occurrence", count)
    } else {
        format!("{} occurrences", count)
    }
}

fn push_object_line(text: &mut String, name: &str, kind: &str) {
    text.push_str(&format!("    - metadata.name: {} (kind: {})\n", name, kind));
}

/// Separator after schema errors; it carries the extra messages when there are any.
fn push_extra_messages_line(text: &mut String, messages: &[ExtraMessage]) {
    let joined = messages
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    text.push_str(&joined);
    text.push('\n');
}
