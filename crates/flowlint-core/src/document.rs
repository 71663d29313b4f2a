//! Loading of an exported release document into the typed model.
//!
//! The release XML is materialized once into owned [`Unit`] values; every
//! later query is pure and never touches the raw tree again. Work-queue
//! elements present in a release are not part of the review and are skipped.

use roxmltree::Node;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{Page, Stage, StageKind, UiElement, Unit, UnitKind};

/// Errors raised while loading a release document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input is not well-formed XML.
    #[error("malformed release document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The release carries no `header` element.
    #[error("release document has no header section")]
    MissingHeader,

    /// A required configuration block is absent from the header.
    #[error("release header is missing the '{0}' block")]
    MissingHeaderBlock(&'static str),
}

/// Raw JSON configuration blocks extracted from the release header.
///
/// Deserialization into [`crate::Metadata`] is a separate, thin step so the
/// review engine never sees header XML.
#[derive(Debug, Clone)]
pub struct HeaderBlocks {
    /// Coversheet information JSON.
    pub coversheet_info: String,
    /// Additional release information JSON.
    pub additional_info: String,
    /// Object-name blacklist JSON.
    pub blacklist: String,
    /// Free-form settings rows JSON.
    pub settings: String,
    /// Active process considerations JSON.
    pub active_process: String,
    /// Active object considerations JSON.
    pub active_object: String,
}

impl HeaderBlocks {
    fn from_node(header: Node<'_, '_>) -> Result<Self, DocumentError> {
        Ok(Self {
            coversheet_info: required_block(header, "coversheetinformation")?,
            additional_info: required_block(header, "additionalreleaseinformation")?,
            blacklist: required_block(header, "blacklist")?,
            settings: required_block(header, "settings")?,
            active_process: required_block(header, "activeconsiderationsprocess")?,
            active_object: required_block(header, "activeconsiderationsobject")?,
        })
    }
}

fn required_block(header: Node<'_, '_>, tag: &'static str) -> Result<String, DocumentError> {
    header
        .children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(DocumentError::MissingHeaderBlock(tag))
}

/// A fully loaded release document: header configuration plus all units.
#[derive(Debug)]
pub struct Document {
    header: HeaderBlocks,
    units: Vec<Unit>,
}

impl Document {
    /// Parses a release document from its XML text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the XML is not well-formed or the
    /// header section (or one of its configuration blocks) is missing.
    /// A unit with zero pages is valid and simply yields no page-scoped
    /// findings.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let header = root
            .children()
            .find(|n| n.has_tag_name("header"))
            .ok_or(DocumentError::MissingHeader)?;
        let header = HeaderBlocks::from_node(header)?;

        let mut units = Vec::new();
        for node in root.children().filter(|n| n.has_tag_name("process")) {
            units.push(parse_unit(node));
        }

        info!("loaded release document with {} unit(s)", units.len());
        Ok(Self { header, units })
    }

    /// The raw header configuration blocks.
    #[must_use]
    pub fn header(&self) -> &HeaderBlocks {
        &self.header
    }

    /// All units of the release, in document order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }
}

fn parse_unit(node: Node<'_, '_>) -> Unit {
    let kind = if node.attribute("type") == Some("object") {
        UnitKind::Object
    } else {
        UnitKind::Process
    };
    let name = node.attribute("name").unwrap_or_default().to_string();
    debug!("loading {kind} '{name}'");

    let mut pages = Vec::new();
    let mut stages = Vec::new();
    let mut element_tree = None;
    let mut inherits_external_model = node.children().any(|n| n.has_tag_name("parentobject"));

    for child in node.children() {
        if child.has_tag_name("subsheet") {
            if let Some(page) = parse_page(child) {
                pages.push(page);
            }
        } else if child.has_tag_name("stage") {
            if let Some(stage) = parse_stage(child) {
                stages.push(stage);
            }
        } else if child.has_tag_name("appdef") {
            element_tree = child
                .children()
                .find(|n| n.has_tag_name("element"))
                .map(parse_element);
            inherits_external_model |= child.children().any(|n| n.has_tag_name("parentobject"));
        }
    }

    Unit {
        name,
        kind,
        run_mode: node.attribute("runmode").map(String::from),
        inherits_external_model,
        pages,
        stages,
        element_tree,
        archetype: std::sync::OnceLock::new(),
    }
}

fn parse_page(node: Node<'_, '_>) -> Option<Page> {
    let id = node.attribute("subsheetid")?.to_string();
    let name = child_text(node, "name").unwrap_or_default();
    Some(Page { id, name })
}

fn parse_stage(node: Node<'_, '_>) -> Option<Stage> {
    let Some(id) = node.attribute("stageid") else {
        debug!("skipping stage without an id");
        return None;
    };
    let kind = StageKind::parse(node.attribute("type").unwrap_or_default());

    let exception = node.children().find(|n| n.has_tag_name("exception"));
    let exception_detail = exception
        .and_then(|n| n.attribute("detail"))
        .map(String::from)
        .filter(|d| !d.is_empty());
    let uses_current_exception = exception
        .and_then(|n| n.attribute("usecurrent"))
        .is_some_and(|v| !v.is_empty() && !v.eq_ignore_ascii_case("false"));

    let step_names = node
        .children()
        .filter(|n| n.has_tag_name("step"))
        .filter_map(|step| {
            step.children()
                .find(|n| n.has_tag_name("action"))
                .and_then(|action| child_text(action, "id"))
        })
        .collect();

    Some(Stage {
        id: id.to_string(),
        kind,
        name: node.attribute("name").unwrap_or_default().to_string(),
        owning_page_id: child_text(node, "subsheetid"),
        success_link: child_text(node, "onsuccess"),
        exception_detail,
        uses_current_exception,
        wait_timeout: node.attribute("timeout").map(String::from),
        step_names,
    })
}

fn parse_element(node: Node<'_, '_>) -> UiElement {
    let attributes = node
        .children()
        .find(|n| n.has_tag_name("attributes"))
        .map(|attrs| {
            attrs
                .children()
                .filter(|n| n.has_tag_name("attribute"))
                .map(|a| {
                    (
                        a.attribute("name").unwrap_or_default().to_string(),
                        a.attribute("value").unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    UiElement {
        name: node.attribute("name").unwrap_or_default().to_string(),
        base_type: child_text(node, "type"),
        attributes,
        children: node
            .children()
            .filter(|n| n.has_tag_name("element"))
            .map(parse_element)
            .collect(),
    }
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"
      <header>
        <coversheetinformation>{}</coversheetinformation>
        <additionalreleaseinformation>[]</additionalreleaseinformation>
        <blacklist>[]</blacklist>
        <settings>[]</settings>
        <activeconsiderationsprocess>[]</activeconsiderationsprocess>
        <activeconsiderationsobject>[]</activeconsiderationsobject>
      </header>"#;

    fn release(body: &str) -> String {
        format!("<release>{HEADER}{body}</release>")
    }

    #[test]
    fn parses_units_pages_and_stages() {
        let xml = release(
            r#"
            <process name="Pay Invoice" runmode="Background">
              <subsheet subsheetid="p1"><name>Main</name></subsheet>
              <stage stageid="s1" type="Start" name="Start">
                <subsheetid>p1</subsheetid>
                <onsuccess>s2</onsuccess>
              </stage>
              <stage stageid="s2" type="End" name="End">
                <subsheetid>p1</subsheetid>
              </stage>
            </process>
            <process name="Invoice App Base" type="object">
              <appdef>
                <element name="Root">
                  <type>application</type>
                  <element name="Login"><type>button</type></element>
                </element>
              </appdef>
            </process>
            <work-queue name="Invoices"/>"#,
        );

        let doc = Document::parse(&xml).expect("parses");
        assert_eq!(doc.units().len(), 2);

        let process = &doc.units()[0];
        assert_eq!(process.kind, UnitKind::Process);
        assert_eq!(process.run_mode.as_deref(), Some("Background"));
        assert_eq!(process.pages().len(), 1);
        let start = process.stage_by_id("s1").expect("start stage");
        assert_eq!(start.kind, StageKind::Start);
        assert_eq!(start.success_link.as_deref(), Some("s2"));
        assert_eq!(start.owning_page_id.as_deref(), Some("p1"));

        let object = &doc.units()[1];
        assert_eq!(object.kind, UnitKind::Object);
        let tree = object.element_tree().expect("app model");
        assert!(tree.is_populated());
        assert_eq!(tree.children[0].base_type.as_deref(), Some("button"));
    }

    #[test]
    fn missing_header_is_fatal() {
        let err = Document::parse("<release><process name='X'/></release>")
            .expect_err("should fail without header");
        assert!(matches!(err, DocumentError::MissingHeader));
    }

    #[test]
    fn missing_header_block_is_fatal() {
        let xml = "<release><header><blacklist>[]</blacklist></header></release>";
        let err = Document::parse(xml).expect_err("should fail on missing block");
        assert!(matches!(err, DocumentError::MissingHeaderBlock(_)));
    }

    #[test]
    fn unit_with_zero_pages_is_valid() {
        let xml = release(r#"<process name="Settings Only"/>"#);
        let doc = Document::parse(&xml).expect("parses");
        assert!(doc.units()[0].pages().is_empty());
    }

    #[test]
    fn exception_attributes_are_modeled_as_optionals() {
        let xml = release(
            r#"
            <process name="P">
              <stage stageid="e1" type="Exception" name="Bare">
                <exception/>
              </stage>
              <stage stageid="e2" type="Exception" name="Detailed">
                <exception detail="Login failed"/>
              </stage>
              <stage stageid="e3" type="Exception" name="Preserve">
                <exception usecurrent="True"/>
              </stage>
            </process>"#,
        );

        let doc = Document::parse(&xml).expect("parses");
        let unit = &doc.units()[0];
        let bare = unit.stage_by_id("e1").expect("e1");
        assert!(bare.exception_detail.is_none());
        assert!(!bare.uses_current_exception);
        let detailed = unit.stage_by_id("e2").expect("e2");
        assert_eq!(detailed.exception_detail.as_deref(), Some("Login failed"));
        let preserve = unit.stage_by_id("e3").expect("e3");
        assert!(preserve.uses_current_exception);
    }

    #[test]
    fn read_stage_steps_are_collected() {
        let xml = release(
            r#"
            <process name="Screen Base" type="object">
              <stage stageid="r1" type="Read" name="Read Image">
                <step><action><id>ReadBitmap</id></action></step>
                <step><action><id>GetText</id></action></step>
              </stage>
            </process>"#,
        );

        let doc = Document::parse(&xml).expect("parses");
        let read = doc.units()[0].stage_by_id("r1").expect("r1");
        assert!(read.has_step("ReadBitmap"));
        assert!(read.has_step("GetText"));
        assert!(!read.has_step("ReadChars"));
    }
}
