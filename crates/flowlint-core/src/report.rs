//! Report assembly.
//!
//! Pages are pure structural assembly over already-evaluated outcomes; no
//! score is recomputed here. Field names follow the report consumer's
//! column headings, hence the verbose serde renames.

use serde::Serialize;

use crate::classify::Classification;
use crate::consideration::{Finding, Outcome, RuleResult, Verdict};
use crate::metadata::Setting;
use crate::types::{Unit, UnitKind};

#[derive(Debug, Clone, Serialize)]
struct ErrorRow {
    #[serde(rename = "Error Name")]
    name: String,
    #[serde(rename = "Error Location")]
    location: String,
}

#[derive(Debug, Clone, Serialize)]
struct WarningRow {
    #[serde(rename = "Warning Name")]
    name: String,
    #[serde(rename = "Warning Location")]
    location: String,
}

/// One scored consideration row of a report page.
#[derive(Debug, Clone, Serialize)]
pub struct ConsiderationRow {
    /// Consideration name as shown in the report.
    #[serde(rename = "Consideration Name")]
    pub name: String,
    #[serde(rename = "Errors")]
    errors: Vec<ErrorRow>,
    #[serde(rename = "Warnings")]
    warnings: Vec<WarningRow>,
    #[serde(rename = "Score")]
    score: f64,
    #[serde(rename = "Max Score")]
    max_score: f64,
    #[serde(rename = "Result")]
    result: RuleResult,
}

impl ConsiderationRow {
    /// Builds a row from an evaluated outcome.
    ///
    /// Scores are clamped into `[0, max_score]`; a not-applicable outcome
    /// reports zero for both.
    #[must_use]
    pub fn from_outcome(name: &str, max_score: f64, outcome: &Outcome) -> Self {
        let (score, max_score, result) = match outcome.verdict() {
            Verdict::Scored { score, result } | Verdict::Forced { score, result } => {
                (score.clamp(0.0, max_score), max_score, result)
            }
            Verdict::NotApplicable => (0.0, 0.0, RuleResult::NotApplicable),
            // The engine evaluates before assembly; an unevaluated outcome
            // scores nothing.
            Verdict::Pending => (0.0, max_score, RuleResult::No),
        };

        Self {
            name: name.to_string(),
            errors: outcome.errors().iter().map(error_row).collect(),
            warnings: outcome.warnings().iter().map(warning_row).collect(),
            score,
            max_score,
            result,
        }
    }

    /// The awarded score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The maximum awardable score.
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// The reported result.
    #[must_use]
    pub fn result(&self) -> RuleResult {
        self.result
    }
}

fn error_row(f: &Finding) -> ErrorRow {
    ErrorRow {
        name: f.message.clone(),
        location: f.location.clone(),
    }
}

fn warning_row(f: &Finding) -> WarningRow {
    WarningRow {
        name: f.message.clone(),
        location: f.location.clone(),
    }
}

/// Entry of a page's "Report Considerations" array: a scored consideration,
/// or a raw settings row on the synthetic Settings page.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportRow {
    /// A scored consideration.
    Consideration(ConsiderationRow),
    /// A raw settings row; carries no scoring.
    Setting(Setting),
}

/// One page of the final report, covering a single unit.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    /// Unit name (or "Settings" for the synthetic page).
    #[serde(rename = "Report Page Name")]
    pub name: String,
    /// "Process", "Object" or "Settings".
    #[serde(rename = "Page Type")]
    pub page_type: String,
    /// Archetype label for Objects, with an "(Evaluated)" marker when the
    /// classifier estimated it.
    #[serde(rename = "Object Type")]
    pub object_type: Option<String>,
    /// Action names for Objects.
    #[serde(rename = "Object Actions")]
    pub actions: Vec<String>,
    /// Evaluated rows, in active-configuration order.
    #[serde(rename = "Report Considerations")]
    pub considerations: Vec<ReportRow>,
}

impl ReportPage {
    /// Starts an empty page for a unit.
    #[must_use]
    pub fn for_unit(unit: &Unit, classification: Option<Classification>) -> Self {
        Self {
            name: unit.name.clone(),
            page_type: unit.kind.to_string(),
            object_type: classification.map(|c| c.report_label()),
            actions: if unit.kind == UnitKind::Object {
                unit.action_names()
            } else {
                Vec::new()
            },
            considerations: Vec::new(),
        }
    }

    /// The synthetic page carrying the raw settings rows.
    #[must_use]
    pub fn settings(settings: &[Setting]) -> Self {
        Self {
            name: "Settings".to_string(),
            page_type: "Settings".to_string(),
            object_type: None,
            actions: Vec::new(),
            considerations: settings
                .iter()
                .cloned()
                .map(ReportRow::Setting)
                .collect(),
        }
    }

    /// Appends an evaluated consideration row.
    pub fn push(&mut self, row: ConsiderationRow) {
        self.considerations.push(ReportRow::Consideration(row));
    }
}

/// The full review report: one page per unit plus the Settings page.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Report {
    /// Pages in document order, Settings last.
    pub pages: Vec<ReportPage>,
}

impl Report {
    /// Serializes the report to compact JSON.
    ///
    /// Page and row ordering is fixed by document and configuration order,
    /// so the same input always yields byte-identical output.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
