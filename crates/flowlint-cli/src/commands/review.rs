//! Review command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use flowlint_core::{Document, Engine, Metadata, UnitKind};
use flowlint_rules::registry;

/// Runs the review command.
pub fn run(release: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let xml = fs::read_to_string(release)
        .with_context(|| format!("Failed to read release: {}", release.display()))?;

    let document = Document::parse(&xml)
        .with_context(|| format!("Failed to parse release: {}", release.display()))?;
    let metadata = Metadata::from_header(document.header())
        .context("Failed to parse release header metadata")?;

    let engine = Engine::new(&metadata, registry());
    tracing::info!(
        "Reviewing {} unit(s) with {} object and {} process consideration(s)",
        document.units().len(),
        engine.rule_count(UnitKind::Object),
        engine.rule_count(UnitKind::Process),
    );

    let report = engine.run(&document);
    let json = if pretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    }
    .context("Failed to serialize report")?;

    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
