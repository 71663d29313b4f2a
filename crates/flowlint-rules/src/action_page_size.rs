//! Rule: Action pages must stay below a stage-count ceiling.
//!
//! A page that needs more than a few dozen stages is doing more than one
//! action's worth of work and should be split.

use flowlint_core::{Consideration, Outcome, UnitKind, UnitView};

/// Stable name for the action-page-size consideration.
pub const NAME: &str = "action-page-size";

/// Default ceiling on stages per page.
pub const MAX_PAGE_STAGES: usize = 40;

/// Flags pages whose stage count exceeds the ceiling.
#[derive(Debug, Clone)]
pub struct ActionPageSize {
    max_stages: usize,
}

impl Default for ActionPageSize {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionPageSize {
    /// Creates the rule with the default ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_stages: MAX_PAGE_STAGES,
        }
    }

    /// Overrides the stage-count ceiling.
    #[must_use]
    pub fn max_stages(mut self, max_stages: usize) -> Self {
        self.max_stages = max_stages;
        self
    }
}

impl Consideration for ActionPageSize {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Object
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        let unit = view.unit();
        for page in unit.pages() {
            let count = unit.stages_of_page(&page.id).len();
            if count > self.max_stages {
                out.error(
                    format!(
                        "Page has {count} stages, more than the recommended maximum of {}",
                        self.max_stages
                    ),
                    page.name.clone(),
                );
            }
        }
    }
}
