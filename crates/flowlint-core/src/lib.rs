//! # flowlint-core
//!
//! Core framework for reviewing exported automation releases against
//! authoring best practices.
//!
//! The crate provides:
//!
//! - [`Document`] — the typed, read-only model of a release
//! - [`FlowResolver`] — success-link resolution across transparent stages
//! - [`classify`] — the Object archetype classifier
//! - [`Consideration`] — the pluggable review-rule contract and its
//!   shared scoring policy
//! - [`Engine`] — orchestration and report assembly
//!
//! ## Example
//!
//! ```ignore
//! use flowlint_core::{Document, Engine, Metadata};
//!
//! let document = Document::parse(&xml)?;
//! let metadata = Metadata::from_header(document.header())?;
//! let engine = Engine::new(&metadata, flowlint_rules::registry());
//! let report = engine.run(&document);
//! println!("{}", report.to_json()?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod consideration;
mod document;
mod engine;
mod flow;
mod metadata;
mod report;
mod types;

pub use classify::{classify, Classification, ObjectArchetype, READ_BITMAP_STEP};
pub use consideration::{
    Consideration, ConsiderationBox, Finding, ForcedOutcome, Hurdles, Outcome, RuleResult,
    UnitView, Verdict,
};
pub use document::{Document, DocumentError, HeaderBlocks};
pub use engine::{Engine, RuleEntry};
pub use flow::{FlowError, FlowResolver, Terminal, TerminalKind};
pub use metadata::{ActiveConsideration, Metadata, MetadataError, Setting};
pub use report::{ConsiderationRow, Report, ReportPage, ReportRow};
pub use types::{Page, PageId, Stage, StageId, StageKind, UiElement, Unit, UnitKind};
