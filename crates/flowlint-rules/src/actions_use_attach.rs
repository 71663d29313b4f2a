//! Rule: every Action must begin with the Attach action.
//!
//! # Rationale
//!
//! Actions of a base object cannot assume the application is connected;
//! the convention is to call the object's own Attach action first. Lifecycle
//! actions (Launch, Close, Attach itself, ...) are exempt, as are Wrapper
//! objects, which have nothing to attach to.

use flowlint_core::{
    Consideration, ObjectArchetype, Outcome, StageKind, TerminalKind, UnitKind, UnitView,
};

/// Stable name for the actions-use-attach consideration.
pub const NAME: &str = "actions-use-attach";

/// Action names exempt from the attach-first convention.
const EXEMPT_ACTION_NAMES: &[&str] = &[
    "launch",
    "close",
    "terminate",
    "attach",
    "initialise",
    "clean up",
    "detach",
    "send key",
];

/// Requires each reviewable Action to start with an Attach page reference.
#[derive(Debug, Clone, Default)]
pub struct ActionsUseAttach;

impl ActionsUseAttach {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consideration for ActionsUseAttach {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Object
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        if view.classification().archetype == ObjectArchetype::Wrapper {
            out.mark_not_applicable();
            return;
        }

        let unit = view.unit();
        for page in unit.pages() {
            let page_name = page.name.to_lowercase();
            if EXEMPT_ACTION_NAMES.iter().any(|w| page_name.contains(w)) {
                continue;
            }

            let Some(start) = unit
                .stages_of_page(&page.id)
                .into_iter()
                .find(|s| s.kind == StageKind::Start)
            else {
                out.error("Action has no Start stage", page.name.clone());
                continue;
            };

            match view.flow().resolve_terminal_kind(start) {
                Ok(terminal) => {
                    let attaches = matches!(
                        terminal.kind,
                        TerminalKind::Reached(StageKind::SubsheetReference)
                    ) && terminal
                        .via
                        .as_deref()
                        .and_then(|id| unit.stage_by_id(id))
                        .is_some_and(|s| s.name.to_lowercase().contains("attach"));
                    if !attaches {
                        out.error(
                            "Action does not begin by attaching to the application",
                            page.name.clone(),
                        );
                    }
                }
                Err(_) => {
                    out.error(
                        "Action's opening flow has no terminating connection",
                        page.name.clone(),
                    );
                }
            }
        }
    }
}
