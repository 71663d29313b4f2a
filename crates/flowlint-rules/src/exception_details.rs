//! Rule: all Exception stages must carry an exception detail.
//!
//! # Rationale
//!
//! An Exception stage with neither a detail text nor the preserve flag
//! raises an exception that tells the controller nothing about what went
//! wrong. Every Exception stage should either describe its failure or
//! re-raise the current exception.

use flowlint_core::{Consideration, Outcome, StageKind, UnitKind, UnitView};
use tracing::debug;

/// Stable name for the exception-details consideration.
pub const NAME: &str = "exception-details";

/// Flags Exception stages with neither a detail text nor the preserve flag.
///
/// Registered for both Processes and Objects; the unit kind is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct ExceptionDetails {
    kind: UnitKind,
}

impl ExceptionDetails {
    /// Creates the rule for Object reviews.
    #[must_use]
    pub fn for_objects() -> Self {
        Self {
            kind: UnitKind::Object,
        }
    }

    /// Creates the rule for Process reviews.
    #[must_use]
    pub fn for_processes() -> Self {
        Self {
            kind: UnitKind::Process,
        }
    }
}

impl Consideration for ExceptionDetails {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        self.kind
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        let unit = view.unit();
        debug!(unit = %unit.name, "checking exception details");

        for stage in unit.find_stages(|s| s.kind == StageKind::Exception) {
            if stage.exception_detail.is_none() && !stage.uses_current_exception {
                out.error(stage.name.clone(), unit.page_name_of(stage));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{check_first_unit, release};
    use flowlint_core::{Hurdles, RuleResult, Verdict};

    #[test]
    fn clean_object_collects_no_errors() {
        let (doc, md) = release(
            r#"<process name="O" type="object">
                 <subsheet subsheetid="p1"><name>Main</name></subsheet>
                 <stage stageid="s1" type="Start" name="Start"><subsheetid>p1</subsheetid></stage>
                 <stage stageid="s2" type="End" name="End"><subsheetid>p1</subsheetid></stage>
               </process>"#,
        );

        let mut out = check_first_unit(&ExceptionDetails::for_objects(), &doc, &md);
        out.evaluate(10.0, Hurdles::default(), None);
        assert!(out.errors().is_empty());
        assert_eq!(
            out.verdict(),
            Verdict::Scored {
                score: 10.0,
                result: RuleResult::Yes
            }
        );
    }

    #[test]
    fn bare_exception_is_located_on_its_page() {
        let (doc, md) = release(
            r#"<process name="O" type="object">
                 <subsheet subsheetid="p1"><name>Login</name></subsheet>
                 <stage stageid="e1" type="Exception" name="System Exception">
                   <subsheetid>p1</subsheetid>
                   <exception/>
                 </stage>
               </process>"#,
        );

        let mut out = check_first_unit(&ExceptionDetails::for_objects(), &doc, &md);
        assert_eq!(out.errors().len(), 1);
        assert_eq!(out.errors()[0].message, "System Exception");
        assert_eq!(out.errors()[0].location, "Login");

        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(
            out.verdict(),
            Verdict::Scored {
                score: 7.0,
                result: RuleResult::Frequently
            }
        );
    }

    #[test]
    fn detail_or_preserve_both_satisfy() {
        let (doc, md) = release(
            r#"<process name="O" type="object">
                 <stage stageid="e1" type="Exception" name="Described">
                   <exception detail="Login window not found"/>
                 </stage>
                 <stage stageid="e2" type="Exception" name="Rethrow">
                   <exception usecurrent="True"/>
                 </stage>
               </process>"#,
        );

        let out = check_first_unit(&ExceptionDetails::for_objects(), &doc, &md);
        assert!(out.errors().is_empty());
    }
}
