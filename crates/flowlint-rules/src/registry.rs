//! The built-in consideration registry.
//!
//! The engine selects from this table by stable name and unit kind;
//! the run configuration decides which entries actually execute.

use flowlint_core::{RuleEntry, UnitKind};

use crate::{
    action_page_size::ActionPageSize, actions_use_attach::ActionsUseAttach,
    exception_details::ExceptionDetails, navigate_followed_by_wait::NavigateFollowedByWait,
    object_has_attach::ObjectHasAttach, start_end_documented::StartEndDocumented,
    wait_timeout_terminates::WaitTimeoutTerminates, win32_element_naming::Win32ElementNaming,
};

static REGISTRY: &[RuleEntry] = &[
    RuleEntry {
        name: crate::exception_details::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(ExceptionDetails::for_objects()),
    },
    RuleEntry {
        name: crate::object_has_attach::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(ObjectHasAttach::new()),
    },
    RuleEntry {
        name: crate::actions_use_attach::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(ActionsUseAttach::new()),
    },
    RuleEntry {
        name: crate::wait_timeout_terminates::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(WaitTimeoutTerminates::new()),
    },
    RuleEntry {
        name: crate::navigate_followed_by_wait::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(NavigateFollowedByWait::new()),
    },
    RuleEntry {
        name: crate::action_page_size::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(ActionPageSize::new()),
    },
    RuleEntry {
        name: crate::win32_element_naming::NAME,
        kind: UnitKind::Object,
        ctor: || Box::new(Win32ElementNaming::new()),
    },
    RuleEntry {
        name: crate::exception_details::NAME,
        kind: UnitKind::Process,
        ctor: || Box::new(ExceptionDetails::for_processes()),
    },
    RuleEntry {
        name: crate::start_end_documented::NAME,
        kind: UnitKind::Process,
        ctor: || Box::new(StartEndDocumented::new()),
    },
];

/// All built-in considerations, Objects first, then Processes.
#[must_use]
pub fn registry() -> &'static [RuleEntry] {
    REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_per_kind() {
        let mut seen = HashSet::new();
        for entry in registry() {
            assert!(seen.insert((entry.kind, entry.name)), "{} registered twice", entry.name);
        }
    }

    #[test]
    fn exception_details_is_registered_for_both_kinds() {
        let kinds: Vec<_> = registry()
            .iter()
            .filter(|e| e.name == crate::exception_details::NAME)
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, [UnitKind::Object, UnitKind::Process]);
    }

    #[test]
    fn every_entry_constructs_a_matching_rule() {
        for entry in registry() {
            let rule = (entry.ctor)();
            assert_eq!(rule.name(), entry.name);
            assert_eq!(rule.applies_to(), entry.kind);
        }
    }
}
