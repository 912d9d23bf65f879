use serde::Deserialize;

/// Which token set a report is rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Pictographic bullets.
    #[default]
    Rich,
    /// ASCII-only bullets.
    Simple,
}

impl std::fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeKind::Rich => write!(f, "rich"),
            ThemeKind::Simple => write!(f, "simple"),
        }
    }
}

/// Symbolic markers resolved to text by a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Stage badge for a passing stage.
    Passed,
    /// Stage badge for a failing stage.
    Failed,
    /// Stage badge for a stage that did not run.
    NotRun,
    /// Bullet in front of an error message or failed rule.
    Error,
    /// Bullet in front of a suggestion or skip reason.
    Suggestion,
    /// Bullet in front of a skipped rule.
    Skip,
}

/// Immutable marker-to-token table.
///
/// Stage badges stay bracketed in both variants; only the bullets change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    kind: ThemeKind,
    error: &'static str,
    suggestion: &'static str,
    skip: &'static str,
}

const PASSED: &str = "[V]";
const FAILED: &str = "[X]";
const NOT_RUN: &str = "[?]";

impl Theme {
    pub const fn rich() -> Self {
        Theme {
            kind: ThemeKind::Rich,
            error: "❌",
            suggestion: "💡",
            skip: "⏩",
        }
    }

    pub const fn simple() -> Self {
        Theme {
            kind: ThemeKind::Simple,
            error: "[X]",
            suggestion: "[*]",
            skip: "[X]",
        }
    }

    pub const fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Rich => Theme::rich(),
            ThemeKind::Simple => Theme::simple(),
        }
    }

    pub fn kind(&self) -> ThemeKind {
        self.kind
    }

    pub fn token(&self, marker: Marker) -> &'static str {
        match marker {
            Marker::Passed => PASSED,
            Marker::Failed => FAILED,
            Marker::NotRun => NOT_RUN,
            Marker::Error => self.error,
            Marker::Suggestion => self.suggestion,
            Marker::Skip => self.skip,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::rich()
    }
}

impl From<ThemeKind> for Theme {
    fn from(kind: ThemeKind) -> Self {
        Theme::for_kind(kind)
    }
}
