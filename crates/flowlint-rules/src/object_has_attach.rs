//! Rule: a Business Object must have an Attach action.
//!
//! Base objects drive a live application and must attach to it before
//! doing anything else, so an Object without an Attach page almost always
//! re-attaches ad hoc inside every action. Wrappers drive no application
//! and are exempt.

use flowlint_core::{Consideration, ObjectArchetype, Outcome, UnitKind, UnitView};

/// Stable name for the object-has-attach consideration.
pub const NAME: &str = "object-has-attach";

/// Requires at least one page whose name mentions attaching.
#[derive(Debug, Clone, Default)]
pub struct ObjectHasAttach;

impl ObjectHasAttach {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Consideration for ObjectHasAttach {
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

        let has_attach = view
            .unit()
            .pages()
            .iter()
            .any(|p| p.name.to_lowercase().contains("attach"));
        if !has_attach {
            out.error("Unable to find an Attach page within the Object", "N/A");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{check_first_unit, release};
    use flowlint_core::{Hurdles, Verdict};

    #[test]
    fn attach_page_satisfies() {
        let (doc, md) = release(
            r#"<process name="Invoice App Base" type="object">
                 <subsheet subsheetid="p1"><name>Attach</name></subsheet>
               </process>"#,
        );
        let out = check_first_unit(&ObjectHasAttach::new(), &doc, &md);
        assert!(out.errors().is_empty());
    }

    #[test]
    fn missing_attach_page_is_an_error() {
        let (doc, md) = release(
            r#"<process name="Invoice App Base" type="object">
                 <subsheet subsheetid="p1"><name>Login</name></subsheet>
               </process>"#,
        );
        let out = check_first_unit(&ObjectHasAttach::new(), &doc, &md);
        assert_eq!(out.errors().len(), 1);
        assert_eq!(out.errors()[0].location, "N/A");
    }

    #[test]
    fn wrappers_are_not_applicable() {
        let (doc, md) = release(r#"<process name="Invoice Wrapper" type="object"/>"#);
        let mut out = check_first_unit(&ObjectHasAttach::new(), &doc, &md);
        out.evaluate(10.0, Hurdles::default(), None);
        assert_eq!(out.verdict(), Verdict::NotApplicable);
    }
}
