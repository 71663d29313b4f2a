//! Rule: Win32-spied elements must carry meaningful names.
//!
//! Win32 spy mode captures elements with blank or auto-generated names
//! ("Element3", "button"). Those names survive into wait and navigate stages
//! and make the resulting flow unreadable, so the application model should
//! rename every Win32 element after spying it.

use flowlint_core::{Consideration, Outcome, UnitKind, UnitView};

/// Stable name for the win32-element-naming consideration.
pub const NAME: &str = "win32-element-naming";

/// Report location used for application-model findings.
const MODEL_LOCATION: &str = "Application Model";

/// Base types of elements spied in Win32 mode.
const WIN32_ELEMENT_TYPES: &[&str] = &[
    "window",
    "radiobutton",
    "checkbox",
    "button",
    "edit",
    "listbox",
    "combobox",
    "treeview",
    "tabcontrol",
    "trackbar",
    "updown",
    "datetimepicker",
    "monthcalendarpicker",
    "scrollbar",
    "label",
    "toolbar",
    "datagrid",
    "listview",
    "datagridview",
];

/// Flags Win32 elements whose names were never set after spying.
#[derive(Debug, Clone, Default)]
pub struct Win32ElementNaming;

impl Win32ElementNaming {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Whether a name still looks like the spy tool's auto-generated default.
fn is_default_name(name: &str, base_type: &str) -> bool {
    let name = name.trim();
    if name.eq_ignore_ascii_case(base_type) {
        return true;
    }
    name.to_lowercase()
        .strip_prefix("element")
        .is_some_and(|rest| rest.trim().chars().all(|c| c.is_ascii_digit()))
}

impl Consideration for Win32ElementNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn applies_to(&self) -> UnitKind {
        UnitKind::Object
    }

    fn check(&self, view: &UnitView<'_>, out: &mut Outcome) {
        let Some(tree) = view.unit().element_tree.as_ref() else {
            out.mark_not_applicable();
            return;
        };

        for element in tree.walk() {
            let Some(base_type) = element.base_type.as_deref() else {
                continue;
            };
            let base_type = base_type.to_lowercase();
            if !WIN32_ELEMENT_TYPES.contains(&base_type.as_str()) {
                continue;
            }

            if element.name.trim().is_empty() {
                out.error(
                    format!("Win32 element of type '{base_type}' has no name"),
                    MODEL_LOCATION,
                );
            } else if is_default_name(&element.name, &base_type) {
                out.warning(
                    format!(
                        "Win32 element '{}' keeps its auto-generated name",
                        element.name
                    ),
                    MODEL_LOCATION,
                );
            }
        }
    }
}
