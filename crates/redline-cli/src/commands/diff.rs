//! `diff` command: compare an original document against modified plain
//! text and print the resulting edit list.

use std::fs;

use anyhow::{Context, Result};
use redline_core::{Edit, EditOperation};

pub fn execute(original: &str, modified: &str, json: bool) -> Result<i32> {
    let original_bytes = fs::read(original).with_context(|| format!("reading {original}"))?;
    let original_flat =
        redline_ooxml::extract(&original_bytes).with_context(|| format!("extracting {original}"))?;
    let modified_text = fs::read_to_string(modified).with_context(|| format!("reading {modified}"))?;

    // The extractor terminates the flat view with a trailing paragraph
    // separator that a hand-edited modified-text file won't reliably
    // reproduce; trim it so the final paragraph still diffs against real
    // run text rather than against the separator itself (§3).
    let edits = redline_diff::compile_diff(original_flat.trim_end_matches('\n'), &modified_text);

    if json {
        println!("{}", serde_json::to_string_pretty(&edits)?);
    } else {
        for edit in &edits {
            print_human_readable(edit);
        }
        println!("{} edit(s) found", edits.len());
    }
    Ok(0)
}

fn print_human_readable(edit: &Edit) {
    match edit.operation {
        EditOperation::Deletion => println!("- DELETE {:?}", edit.target_text),
        EditOperation::Insertion => println!(
            "+ INSERT {:?} after {:?}",
            edit.new_text.as_deref().unwrap_or(""),
            edit.target_text
        ),
        EditOperation::Modification => println!(
            "~ REPLACE {:?} WITH {:?}",
            edit.target_text,
            edit.new_text.as_deref().unwrap_or("")
        ),
    }
}
