//! Success-link resolution across transparent stage kinds.
//!
//! Several considerations need to know what a stage's outgoing link
//! eventually reaches: a wait timeout must land on an End or Exception, a
//! Navigate should land on a Wait. The resolver walks the success-link
//! chain, passing through Anchor stages and at most one Calculation stage,
//! and reports the first stage of interest. It is a single shared component;
//! rules never duplicate the traversal.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Stage, StageId, StageKind, Unit};

/// Classification of where a success-link chain ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalKind {
    /// The chain hit a stage with no outgoing link before reaching
    /// anything of interest, or a link that resolves to no known stage.
    Unconnected,
    /// The chain reached a stage of this kind.
    Reached(StageKind),
}

/// Result of resolving a success-link chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    /// What the chain ended on.
    pub kind: TerminalKind,
    /// The terminal stage, when one was reached.
    pub via: Option<StageId>,
}

impl Terminal {
    fn unconnected() -> Self {
        Self {
            kind: TerminalKind::Unconnected,
            via: None,
        }
    }

    fn reached(kind: StageKind, via: &str) -> Self {
        Self {
            kind: TerminalKind::Reached(kind),
            via: Some(via.to_string()),
        }
    }

    /// Whether the chain terminated on the given stage kind.
    #[must_use]
    pub fn is(&self, kind: &StageKind) -> bool {
        matches!(&self.kind, TerminalKind::Reached(k) if k == kind)
    }
}

/// Errors raised by the resolver.
///
/// A cycle is a defect in the reviewed document, not in the review; callers
/// convert it into a finding rather than aborting the run.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The success-link chain loops back on itself.
    #[error("success-link chain starting at stage '{start}' never terminates")]
    CycleDetected {
        /// Stage the traversal started from.
        start: StageId,
    },
}

/// Resolves success-link chains within one unit.
///
/// End and Exception ids are collected once at construction so that the
/// short-circuit test on every hop is a set lookup, not a document scan.
pub struct FlowResolver<'a> {
    unit: &'a Unit,
    end_ids: HashSet<&'a str>,
    exception_ids: HashSet<&'a str>,
}

impl<'a> FlowResolver<'a> {
    /// Builds a resolver over the given unit.
    #[must_use]
    pub fn new(unit: &'a Unit) -> Self {
        let mut end_ids = HashSet::new();
        let mut exception_ids = HashSet::new();
        for stage in &unit.stages {
            match stage.kind {
                StageKind::End => {
                    end_ids.insert(stage.id.as_str());
                }
                StageKind::Exception => {
                    exception_ids.insert(stage.id.as_str());
                }
                _ => {}
            }
        }
        Self {
            unit,
            end_ids,
            exception_ids,
        }
    }

    /// Follows `start`'s success-link chain to the first stage of interest.
    ///
    /// Anchor stages are always transparent. One Calculation stage is
    /// tolerated in the chain; a second consecutive Calculation is itself
    /// the terminal. End and Exception terminate immediately; any other
    /// kind stops the chase and is reported as the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::CycleDetected`] when the chain revisits a stage.
    pub fn resolve_terminal_kind(&self, start: &Stage) -> Result<Terminal, FlowError> {
        let mut calc_budget = 1u8;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = start;

        loop {
            visited.insert(current.id.as_str());

            let Some(link) = current.success_link.as_deref() else {
                return Ok(Terminal::unconnected());
            };
            if visited.contains(link) {
                return Err(FlowError::CycleDetected {
                    start: start.id.clone(),
                });
            }

            if self.end_ids.contains(link) {
                return Ok(Terminal::reached(StageKind::End, link));
            }
            if self.exception_ids.contains(link) {
                return Ok(Terminal::reached(StageKind::Exception, link));
            }

            let Some(target) = self.unit.stage_by_id(link) else {
                // Dangling reference: reportable, never a crash.
                return Ok(Terminal::unconnected());
            };

            match &target.kind {
                StageKind::Anchor => current = target,
                StageKind::Calculation if calc_budget > 0 => {
                    calc_budget -= 1;
                    current = target;
                }
                kind => return Ok(Terminal::reached(kind.clone(), &target.id)),
            }
        }
    }
}
