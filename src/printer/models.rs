use serde::Deserialize;

// ========== Per-file outcomes (produced by the validation pipeline) ==========

/// Result of the YAML syntax stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum YamlOutcome {
    Valid,
    Invalid { errors: Vec<String> },
}

/// Result of the Kubernetes schema stage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SchemaOutcome {
    /// The YAML stage failed, so schema validation never started.
    #[default]
    NotRun,
    Valid,
    Invalid {
        k8s_version: String,
        errors: Vec<String>,
    },
}

/// Result of the policy rule stage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PolicyOutcome {
    /// A prior stage failed.
    #[default]
    NotRun,
    Evaluated {
        #[serde(default)]
        failed_rules: Vec<FailedRule>,
        #[serde(default)]
        skipped_rules: Vec<SkippedRule>,
    },
}

/// Position of a single rule failure inside a manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailureLocation {
    pub schema_path: String,
    pub line: u32,
    pub column: u32,
}

/// One manifest object a failed rule matched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailureDetail {
    pub metadata_name: String,
    pub kind: String,
    #[serde(default)]
    pub failure_locations: Vec<FailureLocation>,
}

/// One manifest object a rule was skipped for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkipDetail {
    pub metadata_name: String,
    pub kind: String,
    pub skip_message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailedRule {
    pub name: String,
    pub occurrences: i64,
    pub suggestion: String,
    #[serde(default)]
    pub occurrence_details: Vec<FailureDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkippedRule {
    pub name: String,
    pub occurrences: i64,
    #[serde(default)]
    pub occurrence_details: Vec<SkipDetail>,
}

/// Tool-specific hint shown alongside a file's results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtraMessage {
    pub text: String,
    /// Presentation hint for colored front-ends; plain text ignores it.
    #[serde(default)]
    pub color: String,
}

/// Everything the pipeline found out about one input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationOutcome {
    pub title: String,
    pub yaml: YamlOutcome,
    #[serde(default)]
    pub schema: SchemaOutcome,
    #[serde(default)]
    pub policy: PolicyOutcome,
    #[serde(default)]
    pub extra_messages: Vec<ExtraMessage>,
}

impl ValidationOutcome {
    pub fn yaml_passed(&self) -> bool {
        matches!(self.yaml, YamlOutcome::Valid)
    }

    pub fn schema_passed(&self) -> bool {
        self.yaml_passed() && self.schema == SchemaOutcome::Valid
    }

    pub fn policy_passed(&self) -> bool {
        self.schema_passed()
            && matches!(&self.policy, PolicyOutcome::Evaluated { failed_rules, .. } if failed_rules.is_empty())
    }

    /// True when a stage that ran reported errors or failed rules. Stages that
    /// did not run are not failures.
    pub fn has_failures(&self) -> bool {
        if let YamlOutcome::Invalid { .. } = self.yaml {
            return true;
        }
        match &self.schema {
            SchemaOutcome::Invalid { .. } => true,
            SchemaOutcome::NotRun => false,
            SchemaOutcome::Valid => matches!(
                &self.policy,
                PolicyOutcome::Evaluated { failed_rules, .. } if !failed_rules.is_empty()
            ),
        }
    }
}

// ========== Aggregate summary ==========

/// Aggregate counts printed under `(Summary)`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvaluationSummary {
    #[serde(default)]
    pub configs_count: usize,
    #[serde(default)]
    pub rules_count: usize,
    pub files_count: usize,
    pub passed_yaml_validation_count: usize,
    /// Either `passed/total` or a prose fallback such as "no internet connection".
    pub k8s_validation: String,
    pub passed_policy_check_count: usize,
}

impl EvaluationSummary {
    /// Count stage results across outcomes.
    pub fn tally(outcomes: &[ValidationOutcome], configs_count: usize, rules_count: usize) -> Self {
        let files_count = outcomes.len();
        let passed_yaml = outcomes.iter().filter(|o| o.yaml_passed()).count();
        let passed_schema = outcomes.iter().filter(|o| o.schema_passed()).count();
        let passed_policy = outcomes.iter().filter(|o| o.policy_passed()).count();

        EvaluationSummary {
            configs_count,
            rules_count,
            files_count,
            passed_yaml_validation_count: passed_yaml,
            k8s_validation: format!("{}/{}", passed_schema, files_count),
            passed_policy_check_count: passed_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(yaml: YamlOutcome, schema: SchemaOutcome, policy: PolicyOutcome) -> ValidationOutcome {
        ValidationOutcome {
            title: "f.yaml".into(),
            yaml,
            schema,
            policy,
            extra_messages: vec![],
        }
    }

    fn failed_rule() -> FailedRule {
        FailedRule {
            name: "r".into(),
            occurrences: 1,
            suggestion: "s".into(),
            occurrence_details: vec![],
        }
    }

    #[test]
    fn test_tally_counts_each_stage() {
        let outcomes = vec![
            outcome(
                YamlOutcome::Valid,
                SchemaOutcome::Valid,
                PolicyOutcome::Evaluated {
                    failed_rules: vec![],
                    skipped_rules: vec![],
                },
            ),
            outcome(
                YamlOutcome::Valid,
                SchemaOutcome::Valid,
                PolicyOutcome::Evaluated {
                    failed_rules: vec![failed_rule()],
                    skipped_rules: vec![],
                },
            ),
            outcome(
                YamlOutcome::Valid,
                SchemaOutcome::Invalid {
                    k8s_version: "1.18.0".into(),
                    errors: vec!["bad".into()],
                },
                PolicyOutcome::NotRun,
            ),
            outcome(
                YamlOutcome::Invalid {
                    errors: vec!["bad".into()],
                },
                SchemaOutcome::NotRun,
                PolicyOutcome::NotRun,
            ),
        ];

        let summary = EvaluationSummary::tally(&outcomes, 6, 21);
        assert_eq!(summary.configs_count, 6);
        assert_eq!(summary.rules_count, 21);
        assert_eq!(summary.files_count, 4);
        assert_eq!(summary.passed_yaml_validation_count, 3);
        assert_eq!(summary.k8s_validation, "2/4");
        assert_eq!(summary.passed_policy_check_count, 1);
    }

    #[test]
    fn test_invalid_yaml_never_passes_later_stages() {
        let o = outcome(
            YamlOutcome::Invalid {
                errors: vec!["x".into()],
            },
            SchemaOutcome::Valid,
            PolicyOutcome::Evaluated {
                failed_rules: vec![],
                skipped_rules: vec![],
            },
        );
        assert!(!o.schema_passed());
        assert!(!o.policy_passed());
        assert!(o.has_failures());
    }

    #[test]
    fn test_schema_not_run_is_neither_pass_nor_failure() {
        let o = outcome(YamlOutcome::Valid, SchemaOutcome::NotRun, PolicyOutcome::NotRun);
        assert!(!o.schema_passed());
        assert!(!o.policy_passed());
        assert!(!o.has_failures());

        let summary = EvaluationSummary::tally(std::slice::from_ref(&o), 0, 0);
        assert_eq!(summary.passed_yaml_validation_count, 1);
        assert_eq!(summary.k8s_validation, "0/1");
        assert_eq!(summary.passed_policy_check_count, 0);
    }

    #[test]
    fn test_has_failures_per_stage() {
        let passing = outcome(
            YamlOutcome::Valid,
            SchemaOutcome::Valid,
            PolicyOutcome::Evaluated {
                failed_rules: vec![],
                skipped_rules: vec![],
            },
        );
        assert!(!passing.has_failures());

        let policy_not_run = outcome(YamlOutcome::Valid, SchemaOutcome::Valid, PolicyOutcome::NotRun);
        assert!(!policy_not_run.has_failures());

        let failed_rules = outcome(
            YamlOutcome::Valid,
            SchemaOutcome::Valid,
            PolicyOutcome::Evaluated {
                failed_rules: vec![failed_rule()],
                skipped_rules: vec![],
            },
        );
        assert!(failed_rules.has_failures());

        let schema_invalid = outcome(
            YamlOutcome::Valid,
            SchemaOutcome::Invalid {
                k8s_version: "1.18.0".into(),
                errors: vec!["bad".into()],
            },
            PolicyOutcome::NotRun,
        );
        assert!(schema_invalid.has_failures());
    }

    #[test]
    fn test_skipped_rules_still_pass_policy() {
        let o = outcome(
            YamlOutcome::Valid,
            SchemaOutcome::Valid,
            PolicyOutcome::Evaluated {
                failed_rules: vec![],
                skipped_rules: vec![SkippedRule {
                    name: "r".into(),
                    occurrences: 1,
                    occurrence_details: vec![],
                }],
            },
        );
        assert!(o.policy_passed());
    }

    #[test]
    fn test_deserialize_tagged_stages() {
        let yaml = r#"
title: deploy.yaml
yaml:
  status: valid
schema:
  status: invalid
  k8s_version: 1.18.0
  errors: ["missing apiVersion"]
"#;
        let o: ValidationOutcome = serde_yaml::from_str(yaml).unwrap();
        assert!(o.yaml_passed());
        assert_eq!(o.policy, PolicyOutcome::NotRun);
        match o.schema {
            SchemaOutcome::Invalid { k8s_version, errors } => {
                assert_eq!(k8s_version, "1.18.0");
                assert_eq!(errors, vec!["missing apiVersion".to_string()]);
            }
            other => panic!("unexpected schema outcome: {:?}", other),
        }
    }
}
