//! Pure text extraction: the flat view of a `.docx` package, bit-identical
//! to the Mapper's own synthesis for the same document (§9).

use redline_core::span::build_flat_and_spans;

use crate::error::Error;
use crate::package::Package;

/// Unzips `bytes`, parses `word/document.xml`, and flattens it the same
/// way the Mapper does: run text in document order, `"\n\n"` between
/// paragraphs, tables flattened by cell-order traversal.
pub fn extract(bytes: &[u8]) -> Result<String, Error> {
    let package = Package::open(bytes)?;
    let (flat, _spans) = build_flat_and_spans(package.document());
    Ok(flat)
}
