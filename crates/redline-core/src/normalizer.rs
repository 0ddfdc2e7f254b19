//! Coalesces adjacent structurally-equal runs and drops empty ones (§4.1).
//!
//! Smart-tag flattening, the normalizer's other listed responsibility, is
//! handled upstream at OOXML parse time instead of here: our `Paragraph`
//! model has no generic "unknown wrapper" node to flatten in the first
//! place — the parser only ever extracts `<w:r>` runs, descending through
//! any wrapper it meets along the way, so a paragraph's children are always
//! already flat by the time this pass sees them.

use crate::model::{BlockNode, Document, Paragraph, ParagraphChild};

/// Runs this once per engine construction, over every paragraph in the
/// document (body and table cells alike).
pub fn normalize(doc: &mut Document) {
    for block in &mut doc.body {
        match block {
            BlockNode::Paragraph(p) => normalize_paragraph(p),
            BlockNode::Table(table) => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        for p in &mut cell.paragraphs {
                            normalize_paragraph(p);
                        }
                    }
                }
            }
        }
    }
}

fn normalize_paragraph(paragraph: &mut Paragraph) {
    let mut merged: Vec<ParagraphChild> = Vec::with_capacity(paragraph.children.len());

    for child in paragraph.children.drain(..) {
        let ParagraphChild::Run(run) = child else {
            merged.push(child);
            continue;
        };
        if run.text.is_empty() {
            continue;
        }
        if let Some(ParagraphChild::Run(prev)) = merged.last_mut() {
            if prev.properties.structurally_eq(&run.properties) {
                prev.text.push_str(&run.text);
                continue;
            }
        }
        merged.push(ParagraphChild::Run(run));
    }

    paragraph.children = merged;
}
