//! Shared fixtures for rule tests.

use flowlint_core::{Consideration, Document, Metadata, Outcome, UnitView};

pub(crate) fn release_with_settings(body: &str, settings: &str) -> (Document, Metadata) {
    let xml = format!(
        r#"<release>
          <header>
            <coversheetinformation>{{}}</coversheetinformation>
            <additionalreleaseinformation>[]</additionalreleaseinformation>
            <blacklist>[]</blacklist>
            <settings>{settings}</settings>
            <activeconsiderationsprocess>[]</activeconsiderationsprocess>
            <activeconsiderationsobject>[]</activeconsiderationsobject>
          </header>
          {body}
        </release>"#
    );
    let document = Document::parse(&xml).expect("fixture parses");
    let metadata = Metadata::from_header(document.header()).expect("fixture metadata parses");
    (document, metadata)
}

pub(crate) fn release(body: &str) -> (Document, Metadata) {
    release_with_settings(body, "[]")
}

/// Runs a rule's check phase against the first unit of the release.
pub(crate) fn check_first_unit(
    rule: &dyn Consideration,
    document: &Document,
    metadata: &Metadata,
) -> Outcome {
    let unit = document.units().first().expect("fixture has a unit");
    let view = UnitView::new(unit, metadata);
    let mut out = Outcome::new();
    rule.check(&view, &mut out);
    out
}
