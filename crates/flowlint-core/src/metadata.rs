//! Run configuration parsed from the release header's JSON blocks.
//!
//! Metadata is parsed once, is immutable for the duration of a run, and is
//! shared by reference across all rule evaluations. A block that fails to
//! parse is fatal for the whole run: nothing can be scored without the
//! active-consideration configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::consideration::{ForcedOutcome, RuleResult};
use crate::document::HeaderBlocks;
use crate::types::UnitKind;

/// Errors raised while deserializing header configuration.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A header block is not valid JSON of the expected shape.
    #[error("failed to parse the '{block}' header block: {source}")]
    Parse {
        /// Which block failed.
        block: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// One free-form settings row, passed through to the report verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// Setting name.
    #[serde(rename = "Name", alias = "Setting Name")]
    pub name: String,
    /// Setting value as authored (e.g. "Yes", "No", "400").
    #[serde(rename = "Value")]
    pub value: String,
}

/// Activation entry for one consideration.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveConsideration {
    /// Consideration name as configured; whitespace-trimmed on load.
    #[serde(
        rename = "Consideration",
        alias = "Object Considerations",
        alias = "Process Considerations"
    )]
    pub name: String,
    /// Whether the consideration runs at all.
    #[serde(rename = "Active")]
    pub active: bool,
    /// Forced result label, or empty for none.
    #[serde(rename = "Force Result", default)]
    pub force_result: String,
    /// Forced score scale, or empty for none.
    #[serde(rename = "Score Scale", default)]
    pub score_scale: String,
}

impl ActiveConsideration {
    /// The configured override, when both forced fields are supplied.
    ///
    /// Unparsable override values are logged and ignored rather than
    /// aborting the run.
    #[must_use]
    pub fn forced(&self) -> Option<ForcedOutcome> {
        if self.force_result.is_empty() || self.score_scale.is_empty() {
            return None;
        }
        let result: RuleResult = match self.force_result.parse() {
            Ok(r) => r,
            Err(e) => {
                warn!(consideration = %self.name, "ignoring forced result: {e}");
                return None;
            }
        };
        let scale: f64 = match self.score_scale.trim().parse() {
            Ok(s) => s,
            Err(_) => {
                warn!(
                    consideration = %self.name,
                    scale = %self.score_scale,
                    "ignoring unparsable score scale"
                );
                return None;
            }
        };
        Some(ForcedOutcome { scale, result })
    }
}

/// Immutable configuration for one analysis run.
#[derive(Debug)]
pub struct Metadata {
    /// Coversheet information, not consumed by the engine.
    pub coversheet_info: serde_json::Value,
    /// Additional release information, not consumed by the engine.
    pub additional_info: serde_json::Value,
    blacklist: Vec<String>,
    settings: Vec<Setting>,
    active_process: Vec<ActiveConsideration>,
    active_object: Vec<ActiveConsideration>,
}

fn parse_block<T: serde::de::DeserializeOwned>(
    raw: &str,
    block: &'static str,
) -> Result<T, MetadataError> {
    serde_json::from_str(raw).map_err(|source| MetadataError::Parse { block, source })
}

impl Metadata {
    /// Deserializes the header's JSON blocks.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when any block fails to parse.
    pub fn from_header(header: &HeaderBlocks) -> Result<Self, MetadataError> {
        let mut active_process: Vec<ActiveConsideration> =
            parse_block(&header.active_process, "activeconsiderationsprocess")?;
        let mut active_object: Vec<ActiveConsideration> =
            parse_block(&header.active_object, "activeconsiderationsobject")?;
        // Accidental whitespace in configured names must not break the
        // match against the registry.
        for entry in active_process.iter_mut().chain(active_object.iter_mut()) {
            entry.name = entry.name.trim().to_string();
        }

        Ok(Self {
            coversheet_info: parse_block(&header.coversheet_info, "coversheetinformation")?,
            additional_info: parse_block(&header.additional_info, "additionalreleaseinformation")?,
            blacklist: parse_block(&header.blacklist, "blacklist")?,
            settings: parse_block(&header.settings, "settings")?,
            active_process,
            active_object,
        })
    }

    /// Active-consideration entries for the given unit kind, in
    /// configuration order.
    #[must_use]
    pub fn active_considerations(&self, kind: UnitKind) -> &[ActiveConsideration] {
        match kind {
            UnitKind::Process => &self.active_process,
            UnitKind::Object => &self.active_object,
        }
    }

    /// Whether a unit is excluded from review by the name blacklist.
    ///
    /// Matching is case-insensitive substring containment, so a blacklist
    /// entry excludes every versioned copy of a vendor object.
    #[must_use]
    pub fn is_blacklisted(&self, unit_name: &str) -> bool {
        let name = unit_name.to_lowercase();
        self.blacklist
            .iter()
            .any(|entry| name.contains(&entry.to_lowercase()))
    }

    /// The raw settings rows.
    #[must_use]
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Whether a yes/no settings flag is set to yes.
    #[must_use]
    pub fn setting_is_yes(&self, name: &str) -> bool {
        self.settings
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .is_some_and(|s| s.value.eq_ignore_ascii_case("yes"))
    }
}
