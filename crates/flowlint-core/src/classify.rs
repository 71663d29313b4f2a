//! Heuristic classification of an Object's structural role.
//!
//! Considerations change behavior based on whether an Object is a Base, a
//! Surface Automation Base or a Wrapper. The unit name is the strongest
//! signal; when it gives none, the classifier falls back to structural
//! heuristics and flags the result as estimated.

use tracing::debug;

use crate::types::{StageKind, Unit};

/// Step action identifier that marks image-based (surface automation) reads.
pub const READ_BITMAP_STEP: &str = "ReadBitmap";

/// Action stages per page above which a name-less Object is assumed to be
/// a wrapper.
const ACTION_DENSITY_RATIO: usize = 3;

/// Structural role of an Object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectArchetype {
    /// Owns an application model and attaches to a target application.
    Base,
    /// A base driven by image recognition rather than spied elements.
    SurfaceAutomationBase,
    /// Composes actions of other objects; no application model of its own.
    Wrapper,
}

impl std::fmt::Display for ObjectArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "Base Object"),
            Self::SurfaceAutomationBase => write!(f, "Surface Automation Base Object"),
            Self::Wrapper => write!(f, "Wrapper Object"),
        }
    }
}

/// Classifier output: the archetype plus whether it was estimated from
/// structure rather than read off the unit name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The decided archetype.
    pub archetype: ObjectArchetype,
    /// True when the unit name gave no signal.
    pub estimated: bool,
}

impl Classification {
    fn named(archetype: ObjectArchetype) -> Self {
        Self {
            archetype,
            estimated: false,
        }
    }

    fn estimated(archetype: ObjectArchetype) -> Self {
        Self {
            archetype,
            estimated: true,
        }
    }

    /// Label rendered in the report's "Object Type" column.
    #[must_use]
    pub fn report_label(&self) -> String {
        if self.estimated {
            format!("{} (Evaluated)", self.archetype)
        } else {
            self.archetype.to_string()
        }
    }
}

/// Labels a unit with its archetype. First match wins.
#[must_use]
pub fn classify(unit: &Unit) -> Classification {
    let name = unit.name.to_lowercase();

    if name.contains("base") {
        let archetype = if has_read_bitmap(unit) {
            ObjectArchetype::SurfaceAutomationBase
        } else {
            ObjectArchetype::Base
        };
        return Classification::named(archetype);
    }

    if name.contains("wrapper") {
        return Classification::named(ObjectArchetype::Wrapper);
    }

    // Name gives no signal; everything below is an estimate.
    if let Some(tree) = unit.element_tree() {
        if !tree.is_populated() {
            // An application model with no spied elements suggests the
            // modeller wizard ran but nothing real is automated here.
            return Classification::estimated(ObjectArchetype::Wrapper);
        }
        let action_count = unit.find_stages(|s| s.kind == StageKind::Action).len();
        let archetype = if action_count >= unit.pages().len() * ACTION_DENSITY_RATIO {
            ObjectArchetype::Wrapper
        } else {
            ObjectArchetype::Base
        };
        return Classification::estimated(archetype);
    }

    if unit.inherits_external_model {
        return Classification::estimated(ObjectArchetype::Base);
    }

    if has_read_bitmap(unit) {
        Classification::estimated(ObjectArchetype::SurfaceAutomationBase)
    } else {
        Classification::estimated(ObjectArchetype::Wrapper)
    }
}

fn has_read_bitmap(unit: &Unit) -> bool {
    unit.find_stages(|s| s.kind == StageKind::Read)
        .iter()
        .any(|s| s.has_step(READ_BITMAP_STEP))
}

impl Unit {
    /// The cached classification of this unit.
    ///
    /// Computed exactly once per analysis run; rules that key behavior off
    /// the archetype read this, never re-run classification.
    pub fn classification(&self) -> Classification {
        *self.archetype.get_or_init(|| {
            let c = classify(self);
            debug!(unit = %self.name, archetype = %c.archetype, estimated = c.estimated, "classified unit");
            c
        })
    }
}
