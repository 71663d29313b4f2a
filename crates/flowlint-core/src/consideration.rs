//! The consideration contract and its shared scoring policy.
//!
//! A consideration runs in two phases. `check` inspects a unit and records
//! findings into its [`Outcome`]; `evaluate` then turns the error count into
//! a score and result under one uniform banded policy, so scoring never
//! depends on which concrete rule ran. A configuration override or an
//! internal [`Outcome::force`] short-circuits the default policy.

use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::flow::FlowResolver;
use crate::metadata::Metadata;
use crate::types::{Unit, UnitKind};

/// One reported issue: a message and where it was found.
///
/// The location is typically a page name, or `"N/A"` when the issue is not
/// page-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// What was found.
    pub message: String,
    /// Where it was found.
    pub location: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: location.into(),
        }
    }
}

/// Result column of a consideration row in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleResult {
    /// The practice is followed everywhere.
    Yes,
    /// The practice is not followed.
    No,
    /// Followed with isolated lapses.
    Frequently,
    /// Mostly not followed.
    Infrequently,
    /// The consideration does not apply to this unit.
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl std::fmt::Display for RuleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
            Self::Frequently => write!(f, "Frequently"),
            Self::Infrequently => write!(f, "Infrequently"),
            Self::NotApplicable => write!(f, "Not Applicable"),
        }
    }
}

impl std::str::FromStr for RuleResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            "Frequently" => Ok(Self::Frequently),
            "Infrequently" => Ok(Self::Infrequently),
            "Not Applicable" => Ok(Self::NotApplicable),
            other => Err(format!("unknown result value '{other}'")),
        }
    }
}

/// Error-count cutoffs for the banded scoring policy.
///
/// Historical revisions of individual rules used inconsistent, overlapping
/// thresholds; hurdles are therefore per-rule constants supplied by each
/// consideration, not a universal policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hurdles {
    /// Highest error count still scoring Yes.
    pub yes: usize,
    /// Highest error count scoring Frequently.
    pub frequently: usize,
    /// Highest error count scoring Infrequently.
    pub infrequently: usize,
}

impl Default for Hurdles {
    fn default() -> Self {
        Self {
            yes: 0,
            frequently: 1,
            infrequently: 4,
        }
    }
}

/// Score scale applied to Frequently results.
const FREQUENTLY_SCALE: f64 = 0.7;
/// Score scale applied to Infrequently results.
const INFREQUENTLY_SCALE: f64 = 0.3;

/// A forced score/result pair taken from the active-consideration
/// configuration. Always wins over anything the rule computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcedOutcome {
    /// Fraction of the max score to award.
    pub scale: f64,
    /// Result to report.
    pub result: RuleResult,
}

/// How a consideration's score and result were decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// `evaluate` has not run yet.
    Pending,
    /// Scored by the default banded policy.
    Scored {
        /// Awarded score.
        score: f64,
        /// Banded result.
        result: RuleResult,
    },
    /// Set by an internal `force` or a configuration override.
    Forced {
        /// Awarded score.
        score: f64,
        /// Forced result.
        result: RuleResult,
    },
    /// The consideration does not apply; scores report as zero.
    NotApplicable,
}

/// Findings and verdict collected while running one consideration against
/// one unit.
#[derive(Debug, Default)]
pub struct Outcome {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    verdict: Verdict,
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Pending
    }
}

impl Outcome {
    /// Creates an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error finding.
    pub fn error(&mut self, message: impl Into<String>, location: impl Into<String>) {
        self.errors.push(Finding::new(message, location));
    }

    /// Records a warning finding. Warnings never affect the score.
    pub fn warning(&mut self, message: impl Into<String>, location: impl Into<String>) {
        self.warnings.push(Finding::new(message, location));
    }

    /// Unconditionally fixes the score and result, making the default
    /// banded policy a no-op. Used for hard fails regardless of count.
    pub fn force(&mut self, result: RuleResult, score: f64) {
        self.verdict = Verdict::Forced { score, result };
    }

    /// Marks the consideration as not applicable to this unit.
    pub fn mark_not_applicable(&mut self) {
        self.verdict = Verdict::NotApplicable;
    }

    /// Applies the scoring policy.
    ///
    /// A configuration override always wins. Otherwise a prior
    /// [`Outcome::force`] or [`Outcome::mark_not_applicable`] stands, and
    /// the banded policy on the error count decides the rest.
    pub fn evaluate(&mut self, max_score: f64, hurdles: Hurdles, forced: Option<ForcedOutcome>) {
        if let Some(f) = forced {
            self.verdict = Verdict::Forced {
                score: (max_score * f.scale).clamp(0.0, max_score),
                result: f.result,
            };
            return;
        }

        if matches!(
            self.verdict,
            Verdict::Forced { .. } | Verdict::NotApplicable
        ) {
            return;
        }

        let n = self.errors.len();
        let (score, result) = if n <= hurdles.yes {
            (max_score, RuleResult::Yes)
        } else if n <= hurdles.frequently {
            (max_score * FREQUENTLY_SCALE, RuleResult::Frequently)
        } else if n <= hurdles.infrequently {
            (max_score * INFREQUENTLY_SCALE, RuleResult::Infrequently)
        } else {
            (0.0, RuleResult::No)
        };
        self.verdict = Verdict::Scored { score, result };
    }

    /// Error findings recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    /// Warning findings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    /// The decided verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}

/// Everything a consideration may inspect for one unit: the immutable unit
/// itself, its cached classification, the shared run configuration and a
/// flow resolver over the unit's stages.
pub struct UnitView<'a> {
    unit: &'a Unit,
    metadata: &'a Metadata,
    flow: FlowResolver<'a>,
}

impl<'a> UnitView<'a> {
    /// Builds the view for one unit.
    #[must_use]
    pub fn new(unit: &'a Unit, metadata: &'a Metadata) -> Self {
        Self {
            unit,
            metadata,
            flow: FlowResolver::new(unit),
        }
    }

    /// The unit under review.
    #[must_use]
    pub fn unit(&self) -> &'a Unit {
        self.unit
    }

    /// The run-wide, read-only configuration.
    #[must_use]
    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    /// The shared success-link resolver for this unit.
    #[must_use]
    pub fn flow(&self) -> &FlowResolver<'a> {
        &self.flow
    }

    /// The unit's cached classification.
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.unit.classification()
    }
}

/// One pluggable review rule.
pub trait Consideration: Send + Sync {
    /// Stable name, used both as the registry key matched against the
    /// active-consideration configuration and as the report row title.
    fn name(&self) -> &'static str;

    /// Which unit kind this consideration reviews.
    fn applies_to(&self) -> UnitKind;

    /// Maximum score this consideration can award.
    fn max_score(&self) -> f64 {
        10.0
    }

    /// Error-count cutoffs for the banded policy.
    fn hurdles(&self) -> Hurdles {
        Hurdles::default()
    }

    /// Inspects the unit and records findings into `out`.
    ///
    /// Absence of an expected attribute is a checkable fact reported as a
    /// finding; `check` never fails.
    fn check(&self, view: &UnitView<'_>, out: &mut Outcome);
}

/// Type alias for boxed considerations.
pub type ConsiderationBox = Box<dyn Consideration>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_errors_scores_full_yes() {
        let mut out = Outcome::new();
        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(
            out.verdict(),
            Verdict::Scored {
                score: 10.0,
                result: RuleResult::Yes
            }
        );
    }

    #[test]
    fn default_bands_follow_hurdles() {
        let cases = [
            (1, 7.0, RuleResult::Frequently),
            (2, 3.0, RuleResult::Infrequently),
            (4, 3.0, RuleResult::Infrequently),
            (5, 0.0, RuleResult::No),
        ];
        for (count, expected_score, expected_result) in cases {
            let mut out = Outcome::new();
            for i in 0..count {
                out.error(format!("issue {i}"), "Main");
            }
            out.evaluate(10.0, Hurdles::default(), None);
            match out.verdict() {
                Verdict::Scored { score, result } => {
                    assert!((score - expected_score).abs() < 1e-9, "count {count}");
                    assert_eq!(result, expected_result, "count {count}");
                }
                other => panic!("unexpected verdict {other:?}"),
            }
        }
    }

    #[test]
    fn config_override_always_wins() {
        let mut out = Outcome::new();
        out.error("e1", "Main");
        out.error("e2", "Main");
        out.force(RuleResult::No, 0.0);
        out.evaluate(
            10.0,
            Hurdles::default(),
            Some(ForcedOutcome {
                scale: 1.0,
                result: RuleResult::Yes,
            }),
        );
        assert_eq!(
            out.verdict(),
            Verdict::Forced {
                score: 10.0,
                result: RuleResult::Yes
            }
        );
    }

    #[test]
    fn internal_force_blocks_default_policy() {
        let mut out = Outcome::new();
        out.force(RuleResult::No, 0.0);
        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(
            out.verdict(),
            Verdict::Forced {
                score: 0.0,
                result: RuleResult::No
            }
        );
    }

    #[test]
    fn not_applicable_survives_evaluation() {
        let mut out = Outcome::new();
        out.mark_not_applicable();
        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(out.verdict(), Verdict::NotApplicable);
    }

    #[test]
    fn forced_scale_is_clamped_to_bounds() {
        let mut out = Outcome::new();
        out.evaluate(
            10.0,
            Hurdles::default(),
            Some(ForcedOutcome {
                scale: 2.5,
                result: RuleResult::Yes,
            }),
        );
        match out.verdict() {
            Verdict::Forced { score, .. } => assert!((score - 10.0).abs() < 1e-9),
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn warnings_do_not_affect_the_band() {
        let mut out = Outcome::new();
        out.warning("cosmetic", "Main");
        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(
            out.verdict(),
            Verdict::Scored {
                score: 10.0,
                result: RuleResult::Yes
            }
        );
    }

    #[test]
    fn result_labels_round_trip() {
        for (raw, expected) in [
            ("Yes", RuleResult::Yes),
            ("Not Applicable", RuleResult::NotApplicable),
        ] {
            let parsed: RuleResult = raw.parse().expect("parses");
            assert_eq!(parsed, expected);
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("Sometimes".parse::<RuleResult>().is_err());
    }
}
