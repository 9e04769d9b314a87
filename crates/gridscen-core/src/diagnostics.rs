//! Structured diagnostics collected during model assembly.
//!
//! Referential problems (a record pointing at a bus that does not exist) and
//! data-quality corrections (non-finite values clamped, missing profiles
//! defaulted) never abort a build. They are recorded here as tagged variants
//! so callers can audit model completeness, and tests can assert on them
//! instead of scraping log output.
//!
//! # Example
//!
//! ```
//! use gridscen_core::diagnostics::{BuildDiagnostics, BuildIssue, RecordKind};
//!
//! let mut diag = BuildDiagnostics::new();
//! diag.push(BuildIssue::DroppedRecord {
//!     kind: RecordKind::Generator,
//!     id: 7,
//!     reason: "references unknown bus 99".into(),
//! });
//!
//! assert_eq!(diag.dropped_count(), 1);
//! assert!(!diag.is_clean());
//! ```

use serde::Serialize;

/// The input relation a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Bus,
    Generator,
    StorageUnit,
    Line,
    Load,
    Demand,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordKind::Bus => "bus",
            RecordKind::Generator => "generator",
            RecordKind::StorageUnit => "storage unit",
            RecordKind::Line => "line",
            RecordKind::Load => "load",
            RecordKind::Demand => "demand",
        };
        f.write_str(label)
    }
}

/// Severity of a build issue.
///
/// Warnings indicate a record was excluded from the model; corrections
/// indicate a value was adjusted but the record survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Correction,
}

/// A single issue encountered while assembling the model.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildIssue {
    /// A record was excluded because a bus reference did not resolve
    /// (or the record was otherwise unusable).
    DroppedRecord {
        kind: RecordKind,
        id: i64,
        reason: String,
    },
    /// A non-finite value was replaced with the finite sentinel.
    ClampedValue {
        kind: RecordKind,
        id: i64,
        field: String,
    },
    /// A variable generator had no matching profile row; availability was
    /// defaulted to 1.0 for every snapshot.
    DefaultedProfile { id: i64, profile: Option<String> },
}

impl BuildIssue {
    pub fn severity(&self) -> Severity {
        match self {
            BuildIssue::DroppedRecord { .. } => Severity::Warning,
            BuildIssue::ClampedValue { .. } | BuildIssue::DefaultedProfile { .. } => {
                Severity::Correction
            }
        }
    }
}

impl std::fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildIssue::DroppedRecord { kind, id, reason } => {
                write!(f, "dropped {} {}: {}", kind, id, reason)
            }
            BuildIssue::ClampedValue { kind, id, field } => {
                write!(f, "clamped {} {} field '{}' to sentinel", kind, id, field)
            }
            BuildIssue::DefaultedProfile { id, profile } => match profile {
                Some(name) => write!(
                    f,
                    "generator {} profile '{}' not found; availability defaulted to 1.0",
                    id, name
                ),
                None => write!(f, "generator {} availability defaulted to 1.0", id),
            },
        }
    }
}

/// Counts of elements built and issues encountered during one assembly pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    pub buses: usize,
    pub generators: usize,
    pub storage_units: usize,
    pub lines: usize,
    pub loads: usize,
    pub dropped_records: usize,
    pub clamped_values: usize,
    pub defaulted_profiles: usize,
}

/// Complete diagnostics for one build invocation.
///
/// Returned alongside the model rather than printed, so UI layers and tests
/// can inspect exactly what was dropped or corrected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildDiagnostics {
    /// Element counts and issue counters
    pub stats: BuildStats,
    /// All collected issues
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<BuildIssue>,
}

impl BuildDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue and bump the matching counter.
    pub fn push(&mut self, issue: BuildIssue) {
        match &issue {
            BuildIssue::DroppedRecord { .. } => self.stats.dropped_records += 1,
            BuildIssue::ClampedValue { .. } => self.stats.clamped_values += 1,
            BuildIssue::DefaultedProfile { .. } => self.stats.defaulted_profiles += 1,
        }
        self.issues.push(issue);
    }

    /// Count of dropped-record warnings.
    pub fn dropped_count(&self) -> usize {
        self.stats.dropped_records
    }

    /// Count of clamped-value corrections.
    pub fn clamped_count(&self) -> usize {
        self.stats.clamped_values
    }

    /// True when nothing was dropped or corrected.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Only dropped-record issues.
    pub fn warnings(&self) -> impl Iterator<Item = &BuildIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
    }

    /// Only correction issues.
    pub fn corrections(&self) -> impl Iterator<Item = &BuildIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Correction)
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        format!(
            "{} buses, {} generators, {} storage, {} lines, {} loads | {} dropped, {} corrected",
            self.stats.buses,
            self.stats.generators,
            self.stats.storage_units,
            self.stats.lines,
            self.stats.loads,
            self.stats.dropped_records,
            self.stats.clamped_values + self.stats.defaulted_profiles,
        )
    }
}

impl std::fmt::Display for BuildDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Build: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}
