//! Rule: a wait timeout must resolve to an End or an Exception.
//!
//! # Rationale
//!
//! The timeout arm of a wait is the "application did not respond" path.
//! If it wanders off into ordinary flow the action silently continues on a
//! dead application. The timeout may pass through link anchors and at most
//! one intermediate calculation before reaching an End or Exception stage.

use flowlint_core::{Consideration, Outcome, StageKind, TerminalKind, UnitKind, UnitView};

/// Stable name for the wait-timeout-terminates consideration.
pub const NAME: &str = "wait-timeout-terminates";

/// Checks every wait's timeout arm for a terminating connection.
#[derive(Debug, Clone, Default)]
pub struct WaitTimeoutTerminates;

impl WaitTimeoutTerminates {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consideration for WaitTimeoutTerminates {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Object
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        let unit = view.unit();

        for stage in unit.find_stages(|s| s.kind == StageKind::WaitStart) {
            if stage.wait_timeout.is_none() {
                out.warning(
                    format!("Wait '{}' has no timeout expression", stage.name),
                    unit.page_name_of(stage),
                );
            }
        }

        for stage in unit.find_stages(|s| s.kind == StageKind::WaitEnd) {
            let location = unit.page_name_of(stage);
            match view.flow().resolve_terminal_kind(stage) {
                Ok(terminal) => match &terminal.kind {
                    TerminalKind::Reached(StageKind::End | StageKind::Exception) => {}
                    TerminalKind::Reached(kind) => out.error(
                        format!(
                            "Wait '{}' timeout resolves to a {} stage instead of an End or Exception",
                            stage.name,
                            kind.label()
                        ),
                        location,
                    ),
                    TerminalKind::Unconnected => out.error(
                        format!("Wait '{}' timeout has no outgoing connection", stage.name),
                        location,
                    ),
                },
                Err(_) => out.error(
                    format!("Wait '{}' timeout has no terminating connection", stage.name),
                    location,
                ),
            }
        }
    }
}
