//! `apply` command: inject tracked-change revisions into a document from
//! either a JSON edit list or a modified plain-text file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use redline_core::{Edit, RedlineEngine, DEFAULT_AUTHOR};
use redline_ooxml::Package;

pub fn execute(original: &str, changes: &str, output: Option<&str>, author: Option<&str>) -> Result<i32> {
    let original_bytes = fs::read(original).with_context(|| format!("reading {original}"))?;
    let mut package = Package::open(&original_bytes).with_context(|| format!("opening {original}"))?;

    let edits = load_edits(changes, package.document())?;

    let author = author
        .map(str::to_string)
        .or_else(|| std::env::var("REDLINE_AUTHOR").ok())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut engine = RedlineEngine::new(package.document().clone(), author, timestamp);
    let summary = engine.apply_edits(&edits);
    tracing::info!(applied = summary.applied, skipped = summary.skipped, "applied edit list");

    package.set_document(engine.into_document());
    let redlined = package.save().context("serializing redlined document")?;

    let output_path = output.map(ToOwned::to_owned).unwrap_or_else(|| default_output_path(original));
    fs::write(&output_path, redlined).with_context(|| format!("writing {output_path}"))?;

    Ok(if summary.skipped > 0 { 1 } else { 0 })
}

/// Parses `changes` as a JSON edit list; if that fails, treats it as a
/// modified-text file and derives the edit list via the diff compiler.
fn load_edits(changes: &str, original: &redline_core::Document) -> Result<Vec<Edit>> {
    let content = fs::read_to_string(changes).with_context(|| format!("reading {changes}"))?;

    if let Ok(edits) = Edit::parse_json_list(&content) {
        return Ok(edits);
    }

    let (original_flat, _) = redline_core::span::build_flat_and_spans(original);
    Ok(redline_diff::compile_diff(original_flat.trim_end_matches('\n'), &content))
}

fn default_output_path(original: &str) -> String {
    let path = Path::new(original);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    match dir {
        Some(dir) => dir.join(format!("{stem}_redlined.docx")).to_string_lossy().into_owned(),
        None => format!("{stem}_redlined.docx"),
    }
}
