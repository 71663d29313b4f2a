//! Core types for the automation-release document model.

use std::sync::OnceLock;

use crate::classify::Classification;

/// Identifier of a stage, unique within a release document.
pub type StageId = String;

/// Identifier of a page (an Object "Action" or Process sub-page).
pub type PageId = String;

/// The fixed vocabulary of stage kinds found in a release document.
///
/// Unrecognized `type` attributes are preserved in [`StageKind::Other`] so
/// that a newer release format never aborts a review.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Entry point of a page's flowchart.
    Start,
    /// Normal exit of a page's flowchart.
    End,
    /// An action call into another object.
    Action,
    /// Two-way branch.
    Decision,
    /// Multi-way branch.
    MultiChoice,
    /// Opening half of a wait construct.
    WaitStart,
    /// Timeout exit of a wait construct.
    WaitEnd,
    /// Raises an exception.
    Exception,
    /// Opens a recovery block.
    Recover,
    /// Closes a recovery block.
    Resume,
    /// Expression evaluation into a data item.
    Calculation,
    /// UI navigation (clicks, keystrokes).
    Navigate,
    /// Reads data out of a UI element.
    Read,
    /// Writes data into a UI element.
    Write,
    /// A data item.
    Data,
    /// A collection data item.
    Collection,
    /// Visual link target; control flow passes straight through.
    Anchor,
    /// Reference to another page of the same unit.
    SubsheetReference,
    /// Loop header.
    LoopStart,
    /// Loop footer.
    LoopEnd,
    /// Free-text annotation.
    Note,
    /// Alert notification.
    Alert,
    /// Inline code stage.
    Code,
    /// Process information block.
    ProcessInfo,
    /// Any stage type not in the known vocabulary.
    Other(String),
}

impl StageKind {
    /// Maps a `type` attribute value onto the stage vocabulary.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Start" => Self::Start,
            "End" => Self::End,
            "Action" => Self::Action,
            "Decision" => Self::Decision,
            "MultipleChoice" => Self::MultiChoice,
            "WaitStart" => Self::WaitStart,
            "WaitEnd" => Self::WaitEnd,
            "Exception" => Self::Exception,
            "Recover" => Self::Recover,
            "Resume" => Self::Resume,
            "Calculation" => Self::Calculation,
            "Navigate" => Self::Navigate,
            "Read" => Self::Read,
            "Write" => Self::Write,
            "Data" => Self::Data,
            "Collection" => Self::Collection,
            "Anchor" => Self::Anchor,
            "SubSheet" => Self::SubsheetReference,
            "LoopStart" => Self::LoopStart,
            "LoopEnd" => Self::LoopEnd,
            "Note" => Self::Note,
            "Alert" => Self::Alert,
            "Code" => Self::Code,
            "ProcessInfo" => Self::ProcessInfo,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-readable label used in finding messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::Action => "Action",
            Self::Decision => "Decision",
            Self::MultiChoice => "Multiple Choice",
            Self::WaitStart => "Wait",
            Self::WaitEnd => "Wait Timeout",
            Self::Exception => "Exception",
            Self::Recover => "Recover",
            Self::Resume => "Resume",
            Self::Calculation => "Calculation",
            Self::Navigate => "Navigate",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Data => "Data",
            Self::Collection => "Collection",
            Self::Anchor => "Anchor",
            Self::SubsheetReference => "Page Reference",
            Self::LoopStart => "Loop Start",
            Self::LoopEnd => "Loop End",
            Self::Note => "Note",
            Self::Alert => "Alert",
            Self::Code => "Code",
            Self::ProcessInfo => "Process Info",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One node of a page-local flowchart.
///
/// Stages are immutable once the document is loaded; optional attributes
/// are modeled as proper optionals so rule bodies never probe raw XML.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Unique stage identifier.
    pub id: StageId,
    /// Stage kind from the document's `type` attribute.
    pub kind: StageKind,
    /// Display name of the stage.
    pub name: String,
    /// Page owning this stage; `None` for unit-level stages.
    pub owning_page_id: Option<PageId>,
    /// Outgoing success link, when connected.
    pub success_link: Option<StageId>,
    /// Exception detail text (Exception stages).
    pub exception_detail: Option<String>,
    /// Whether an Exception stage preserves the current exception.
    pub uses_current_exception: bool,
    /// Timeout expression (wait stages).
    pub wait_timeout: Option<String>,
    /// Step action identifiers (Read/Write/Navigate stages).
    pub step_names: Vec<String>,
}

impl Stage {
    /// Whether any step of this stage matches the given action identifier.
    #[must_use]
    pub fn has_step(&self, action_id: &str) -> bool {
        self.step_names.iter().any(|s| s == action_id)
    }
}

/// A named sub-procedure of a unit, owning stages by id reference.
#[derive(Debug, Clone)]
pub struct Page {
    /// Unique page identifier.
    pub id: PageId,
    /// Display name ("Action" name for Objects).
    pub name: String,
}

/// Kind discriminator for a top-level unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// A Process definition.
    Process,
    /// A Business Object definition.
    Object,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Process => write!(f, "Process"),
            Self::Object => write!(f, "Object"),
        }
    }
}

/// One element of a unit's UI-automation model.
#[derive(Debug, Clone)]
pub struct UiElement {
    /// Display name of the element.
    pub name: String,
    /// Declared base type (e.g. "button", "edit").
    pub base_type: Option<String>,
    /// Raw element attributes as name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Child elements, in document order.
    pub children: Vec<UiElement>,
}

impl UiElement {
    /// Depth-first traversal over this element and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &UiElement> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            out.push(element);
            stack.extend(element.children.iter().rev());
        }
        out.into_iter()
    }

    /// Whether the tree holds anything beyond its root element.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A top-level automation definition under review: a Process or an Object.
#[derive(Debug)]
pub struct Unit {
    /// Declared name of the unit.
    pub name: String,
    /// Process or Object.
    pub kind: UnitKind,
    /// Declared run mode, when present.
    pub run_mode: Option<String>,
    /// Whether the unit inherits its application model from a parent object.
    pub inherits_external_model: bool,
    /// Pages in document order.
    pub pages: Vec<Page>,
    /// All stages of the unit, in document order.
    pub stages: Vec<Stage>,
    /// Root of the UI-automation model, when one is defined.
    pub element_tree: Option<UiElement>,
    pub(crate) archetype: OnceLock<Classification>,
}

impl Unit {
    /// All stages matching the predicate, in document order.
    pub fn find_stages<'a, P>(&'a self, predicate: P) -> Vec<&'a Stage>
    where
        P: Fn(&Stage) -> bool,
    {
        self.stages.iter().filter(|s| predicate(s)).collect()
    }

    /// All stages owned by the given page.
    #[must_use]
    pub fn stages_of_page(&self, page_id: &str) -> Vec<&Stage> {
        self.find_stages(|s| s.owning_page_id.as_deref() == Some(page_id))
    }

    /// Looks up a page by id.
    #[must_use]
    pub fn page_by_id(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Looks up a stage by id.
    #[must_use]
    pub fn stage_by_id(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Pages in document order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The unit's UI-automation model, when one is defined.
    #[must_use]
    pub fn element_tree(&self) -> Option<&UiElement> {
        self.element_tree.as_ref()
    }

    /// Page names listed as Actions in the report, excluding the
    /// housekeeping "Clean Up" page.
    #[must_use]
    pub fn action_names(&self) -> Vec<String> {
        self.pages
            .iter()
            .filter(|p| p.name != "Clean Up")
            .map(|p| p.name.clone())
            .collect()
    }

    /// Name of the page owning a stage, for finding locations.
    ///
    /// Returns `"N/A"` when the stage is unit-level or the page reference
    /// does not resolve; unresolvable references are reportable facts, not
    /// errors.
    #[must_use]
    pub fn page_name_of(&self, stage: &Stage) -> String {
        stage
            .owning_page_id
            .as_deref()
            .and_then(|id| self.page_by_id(id))
            .map_or_else(|| "N/A".to_string(), |p| p.name.clone())
    }
}
