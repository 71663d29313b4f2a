//! Rule: every Navigate stage should be followed by a wait.
//!
//! Clicking or sending keys without waiting for the application to react is
//! the classic source of intermittent automation failures. Objects that are
//! declared image based are exempt, their navigation already happens inside
//! surface automation reads.

use flowlint_core::{Consideration, Outcome, StageKind, TerminalKind, UnitKind, UnitView};

/// Stable name for the navigate-followed-by-wait consideration.
pub const NAME: &str = "navigate-followed-by-wait";

/// Release setting that exempts an entire review from this rule.
const IMAGE_BASED_SETTING: &str = "Uses image based automation";

/// Requires a wait after every Navigate stage.
#[derive(Debug, Clone, Default)]
pub struct NavigateFollowedByWait;

impl NavigateFollowedByWait {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consideration for NavigateFollowedByWait {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Object
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        if view.metadata().setting_is_yes(IMAGE_BASED_SETTING) {
            out.mark_not_applicable();
            return;
        }

        let unit = view.unit();
        for stage in unit.find_stages(|s| s.kind == StageKind::Navigate) {
            let location = unit.page_name_of(stage);
            let followed_by_wait = matches!(
                view.flow().resolve_terminal_kind(stage),
                Ok(terminal) if matches!(terminal.kind, TerminalKind::Reached(StageKind::WaitStart))
            );
            if !followed_by_wait {
                out.error(
                    format!("Navigate '{}' is not followed by a wait", stage.name),
                    location,
                );
            }
        }
    }
}
