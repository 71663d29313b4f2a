//! Review orchestration.
//!
//! The engine selects the active considerations once per unit kind, then
//! evaluates each unit independently: a unit's review depends only on its
//! own subtree of the document model, its cached classification and the
//! shared read-only metadata. That makes per-unit evaluation embarrassingly
//! parallel, so units are mapped through a rayon pool after the document is
//! fully materialized; page order still follows document order.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::consideration::{ConsiderationBox, ForcedOutcome, Outcome, UnitView};
use crate::document::Document;
use crate::metadata::Metadata;
use crate::report::{ConsiderationRow, Report, ReportPage};
use crate::types::{Unit, UnitKind};

/// One entry of the static consideration registry: a stable name and the
/// constructor it selects.
pub struct RuleEntry {
    /// Stable name matched against the active-consideration configuration.
    pub name: &'static str,
    /// Which unit kind the entry reviews.
    pub kind: UnitKind,
    /// Constructor for the consideration.
    pub ctor: fn() -> ConsiderationBox,
}

type ActiveRule = (ConsiderationBox, Option<ForcedOutcome>);

/// Runs the active considerations over every unit of a release.
pub struct Engine<'a> {
    metadata: &'a Metadata,
    object_rules: Vec<ActiveRule>,
    process_rules: Vec<ActiveRule>,
}

impl<'a> Engine<'a> {
    /// Builds an engine from the run configuration and a consideration
    /// registry.
    ///
    /// Active entries are matched by name against the registry; an
    /// identifier with no registered constructor is a configuration
    /// warning, not an error.
    #[must_use]
    pub fn new(metadata: &'a Metadata, registry: &[RuleEntry]) -> Self {
        Self {
            metadata,
            object_rules: Self::select(metadata, registry, UnitKind::Object),
            process_rules: Self::select(metadata, registry, UnitKind::Process),
        }
    }

    fn select(metadata: &Metadata, registry: &[RuleEntry], kind: UnitKind) -> Vec<ActiveRule> {
        let mut selected = Vec::new();
        for entry in metadata.active_considerations(kind) {
            if !entry.active {
                debug!(consideration = %entry.name, "skipping inactive consideration");
                continue;
            }
            match registry.iter().find(|r| r.kind == kind && r.name == entry.name) {
                Some(rule) => selected.push(((rule.ctor)(), entry.forced())),
                None => warn!(
                    consideration = %entry.name,
                    "active consideration has no registered implementation"
                ),
            }
        }
        selected
    }

    /// Number of considerations selected for the given unit kind.
    #[must_use]
    pub fn rule_count(&self, kind: UnitKind) -> usize {
        match kind {
            UnitKind::Object => self.object_rules.len(),
            UnitKind::Process => self.process_rules.len(),
        }
    }

    /// Reviews every unit and assembles the report.
    ///
    /// One page per unit in document order, plus the synthetic Settings
    /// page last.
    #[must_use]
    pub fn run(&self, document: &Document) -> Report {
        info!("reviewing {} unit(s)", document.units().len());

        let mut pages: Vec<ReportPage> = document
            .units()
            .par_iter()
            .map(|unit| self.review_unit(unit))
            .collect();
        pages.push(ReportPage::settings(self.metadata.settings()));

        Report { pages }
    }

    fn review_unit(&self, unit: &Unit) -> ReportPage {
        let classification = (unit.kind == UnitKind::Object).then(|| unit.classification());
        let mut page = ReportPage::for_unit(unit, classification);

        if self.metadata.is_blacklisted(&unit.name) {
            info!(unit = %unit.name, "blacklisted unit, considerations skipped");
            return page;
        }

        let rules = match unit.kind {
            UnitKind::Object => &self.object_rules,
            UnitKind::Process => &self.process_rules,
        };

        let view = UnitView::new(unit, self.metadata);
        for (rule, forced) in rules {
            let mut out = Outcome::new();
            let check = catch_unwind(AssertUnwindSafe(|| rule.check(&view, &mut out)));
            if check.is_err() {
                // One broken rule must not take down the run; record the
                // failure against the rule and keep going.
                warn!(unit = %unit.name, consideration = rule.name(), "consideration panicked");
                out = Outcome::new();
                out.error(
                    format!("consideration '{}' failed to run", rule.name()),
                    "N/A",
                );
                out.force(crate::consideration::RuleResult::No, 0.0);
            }
            out.evaluate(rule.max_score(), rule.hurdles(), *forced);
            page.push(ConsiderationRow::from_outcome(
                rule.name(),
                rule.max_score(),
                &out,
            ));
        }

        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consideration::{Consideration, RuleResult};
    use crate::document::HeaderBlocks;

    struct AlwaysClean;

    impl Consideration for AlwaysClean {
        fn name(&self) -> &'static str {
            "always-clean"
        }
        fn applies_to(&self) -> UnitKind {
            UnitKind::Object
        }
        fn check(&self, _view: &UnitView<'_>, _out: &mut Outcome) {}
    }

    struct AlwaysPanics;

    impl Consideration for AlwaysPanics {
        fn name(&self) -> &'static str {
            "always-panics"
        }
        fn applies_to(&self) -> UnitKind {
            UnitKind::Object
        }
        fn check(&self, _view: &UnitView<'_>, _out: &mut Outcome) {
            panic!("boom");
        }
    }

    fn registry() -> Vec<RuleEntry> {
        vec![
            RuleEntry {
                name: "always-clean",
                kind: UnitKind::Object,
                ctor: || Box::new(AlwaysClean),
            },
            RuleEntry {
                name: "always-panics",
                kind: UnitKind::Object,
                ctor: || Box::new(AlwaysPanics),
            },
        ]
    }

    fn metadata(active_object: &str, blacklist: &str) -> Metadata {
        Metadata::from_header(&HeaderBlocks {
            coversheet_info: "{}".to_string(),
            additional_info: "[]".to_string(),
            blacklist: blacklist.to_string(),
            settings: r#"[{"Name": "Flag", "Value": "Yes"}]"#.to_string(),
            active_process: "[]".to_string(),
            active_object: active_object.to_string(),
        })
        .expect("metadata parses")
    }

    fn release(objects: &str) -> Document {
        let xml = format!(
            r#"<release>
              <header>
                <coversheetinformation>{{}}</coversheetinformation>
                <additionalreleaseinformation>[]</additionalreleaseinformation>
                <blacklist>[]</blacklist>
                <settings>[]</settings>
                <activeconsiderationsprocess>[]</activeconsiderationsprocess>
                <activeconsiderationsobject>[]</activeconsiderationsobject>
              </header>
              {objects}
            </release>"#
        );
        Document::parse(&xml).expect("document parses")
    }

    #[test]
    fn selects_only_active_registered_rules() {
        let md = metadata(
            r#"[{"Consideration": "always-clean", "Active": true, "Force Result": "", "Score Scale": ""},
                {"Consideration": "always-clean", "Active": false, "Force Result": "", "Score Scale": ""},
                {"Consideration": "no-such-rule", "Active": true, "Force Result": "", "Score Scale": ""}]"#,
            "[]",
        );
        let engine = Engine::new(&md, &registry());
        assert_eq!(engine.rule_count(UnitKind::Object), 1);
        assert_eq!(engine.rule_count(UnitKind::Process), 0);
    }

    #[test]
    fn panicking_rule_becomes_synthetic_finding() {
        let md = metadata(
            r#"[{"Consideration": "always-panics", "Active": true, "Force Result": "", "Score Scale": ""},
                {"Consideration": "always-clean", "Active": true, "Force Result": "", "Score Scale": ""}]"#,
            "[]",
        );
        let engine = Engine::new(&md, &registry());
        let doc = release(r#"<process name="My Wrapper" type="object"/>"#);

        let report = engine.run(&doc);
        let json = serde_json::to_value(&report).expect("serializes");
        let rows = &json[0]["Report Considerations"];

        assert_eq!(rows[0]["Result"], "No");
        assert_eq!(
            rows[0]["Errors"][0]["Error Name"],
            "consideration 'always-panics' failed to run"
        );
        // The rule after the failure still ran.
        assert_eq!(rows[1]["Consideration Name"], "always-clean");
        assert_eq!(rows[1]["Result"], "Yes");
    }

    #[test]
    fn blacklisted_unit_page_has_no_considerations() {
        let md = metadata(
            r#"[{"Consideration": "always-clean", "Active": true, "Force Result": "", "Score Scale": ""}]"#,
            r#"["MS Excel VBO"]"#,
        );
        let engine = Engine::new(&md, &registry());
        let doc = release(r#"<process name="MS Excel VBO" type="object"/>"#);

        let report = engine.run(&doc);
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json[0]["Report Page Name"], "MS Excel VBO");
        assert_eq!(json[0]["Report Considerations"], serde_json::json!([]));
    }

    #[test]
    fn config_override_beats_collected_errors() {
        let md = metadata(
            r#"[{"Consideration": "always-panics", "Active": true, "Force Result": "Yes", "Score Scale": "1.0"}]"#,
            "[]",
        );
        let engine = Engine::new(&md, &registry());
        let doc = release(r#"<process name="My Wrapper" type="object"/>"#);

        let report = engine.run(&doc);
        let json = serde_json::to_value(&report).expect("serializes");
        let row = &json[0]["Report Considerations"][0];
        assert_eq!(row["Result"], "Yes");
        assert_eq!(row["Score"], 10.0);
    }

    #[test]
    fn settings_page_is_last_and_unscored() {
        let md = metadata("[]", "[]");
        let engine = Engine::new(&md, &registry());
        let doc = release(r#"<process name="P1"/><process name="O1" type="object"/>"#);

        let report = engine.run(&doc);
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.pages[2].page_type, "Settings");
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json[2]["Report Considerations"][0]["Name"], "Flag");
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let md = metadata(
            r#"[{"Consideration": "always-clean", "Active": true, "Force Result": "", "Score Scale": ""}]"#,
            "[]",
        );
        let engine = Engine::new(&md, &registry());
        let doc = release(
            r#"<process name="A" type="object"/>
               <process name="B" type="object"/>
               <process name="C"/>"#,
        );

        let first = engine.run(&doc).to_json().expect("serializes");
        let second = engine.run(&doc).to_json().expect("serializes");
        assert_eq!(first, second);
    }

    #[test]
    fn object_result_enum_matches_report_labels() {
        assert_eq!(
            serde_json::to_value(RuleResult::NotApplicable).expect("serializes"),
            "Not Applicable"
        );
    }
}
