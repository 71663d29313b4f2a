//! Rule: Start and End stages of a Process must narrate the flow.
//!
//! Process diagrams double as the operational documentation of an
//! automation. Renaming each Start and End stage to describe what the page
//! expects and produces is the cheapest narration available, so stages
//! still wearing the editor's default label get flagged.

use flowlint_core::{Consideration, Outcome, StageKind, UnitKind, UnitView};

/// Stable name for the start-end-documented consideration.
pub const NAME: &str = "start-end-documented";

/// Flags Start and End stages left blank or on their default label.
#[derive(Debug, Clone, Default)]
pub struct StartEndDocumented;

impl StartEndDocumented {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consideration for StartEndDocumented {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Process
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        let unit = view.unit();
        for stage in
            unit.find_stages(|s| matches!(s.kind, StageKind::Start | StageKind::End))
        {
            let default_label = stage.kind.label();
            let location = unit.page_name_of(stage);
            if stage.name.trim().is_empty() {
                out.error(
                    format!("{default_label} stage has no description"),
                    location,
                );
            } else if stage.name.trim() == default_label {
                out.warning(
                    format!("{default_label} stage keeps its default label"),
                    location,
                );
            }
        }
    }
}
