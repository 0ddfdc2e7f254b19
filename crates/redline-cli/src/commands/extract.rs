//! `extract` command: dump the flat text view of a document.

use std::fs;

use anyhow::{Context, Result};

pub fn execute(input: &str, output: Option<&str>) -> Result<i32> {
    let bytes = fs::read(input).with_context(|| format!("reading {input}"))?;
    let flat = redline_ooxml::extract(&bytes).with_context(|| format!("extracting {input}"))?;

    match output {
        Some(path) => fs::write(path, &flat).with_context(|| format!("writing {path}"))?,
        None => print!("{flat}"),
    }
    Ok(0)
}
