//! End-to-end coverage of the invariants in SPEC_FULL.md §8, exercised
//! through the full `Package -> RedlineEngine -> Package::save` pipeline
//! rather than against the in-memory tree directly.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use redline_core::{BlockNode, Edit, ParagraphChild, RedlineEngine};
use redline_ooxml::Package;

fn docx_bytes(document_xml: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip_writer = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip_writer.start_file("[Content_Types].xml", options).unwrap();
        zip_writer.write_all(b"<Types/>").unwrap();
        zip_writer.start_file("word/document.xml", options).unwrap();
        zip_writer.write_all(document_xml.as_bytes()).unwrap();
        zip_writer.finish().unwrap();
    }
    buf
}

const CONTRACT_XML: &str = "<?xml version=\"1.0\"?>\n<w:document><w:body>\n\
    <w:p><w:r><w:t>Contract Agreement between Buyer and Seller.</w:t></w:r></w:p>\n\
    </w:body></w:document>";

fn run_text(children: &[ParagraphChild]) -> Vec<(&str, &str)> {
    children
        .iter()
        .map(|c| match c {
            ParagraphChild::Run(r) => ("run", r.text.as_str()),
            ParagraphChild::Ins(rev) => ("ins", rev.run.text.as_str()),
            ParagraphChild::Del(rev) => ("del", rev.run.text.as_str()),
        })
        .collect()
}

#[test]
fn well_formedness_round_trip() {
    let original = docx_bytes(CONTRACT_XML);
    let package = Package::open(&original).unwrap();

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    let summary = engine.apply_edits(&[Edit::modification("Seller", "Vendor")]);
    assert_eq!(summary.applied, 1);

    let mut package = package;
    package.set_document(engine.into_document());
    let saved = package.save().unwrap();

    // Parseable by a fresh round-trip load, and the zip itself opens cleanly.
    let reopened = Package::open(&saved).unwrap();
    assert_eq!(reopened.document().body.len(), 1);

    let mut archive = ZipArchive::new(Cursor::new(&saved)).unwrap();
    assert!(archive.by_name("[Content_Types].xml").is_ok());
}

#[test]
fn revision_ids_are_unique_within_a_save() {
    let original = docx_bytes(
        "<?xml version=\"1.0\"?>\n<w:document><w:body>\n\
         <w:p><w:r><w:t>Alpha Beta Gamma Delta.</w:t></w:r></w:p>\n\
         </w:body></w:document>",
    );
    let package = Package::open(&original).unwrap();

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    let summary = engine.apply_edits(&[
        Edit::deletion("Beta"),
        Edit::deletion("Delta"),
        Edit::modification("Gamma", "Epsilon"),
    ]);
    assert_eq!(summary.applied, 3);
    assert_eq!(summary.skipped, 0);

    let doc = engine.into_document();
    let BlockNode::Paragraph(p) = &doc.body[0] else {
        panic!("expected paragraph");
    };

    let mut ids = Vec::new();
    for child in &p.children {
        match child {
            ParagraphChild::Ins(rev) | ParagraphChild::Del(rev) => ids.push(rev.id),
            ParagraphChild::Run(_) => {}
        }
    }
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "revision ids must be pairwise distinct");
    assert!(!ids.is_empty());
}

#[test]
fn acceptance_matches_direct_substring_replacement() {
    let original = docx_bytes(CONTRACT_XML);
    let package = Package::open(&original).unwrap();
    let original_flat = "Contract Agreement between Buyer and Seller.";

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    engine.apply_edits(&[Edit::modification("Seller", "Vendor")]);

    let doc = engine.into_document();
    let BlockNode::Paragraph(p) = &doc.body[0] else {
        panic!("expected paragraph");
    };

    // Accept every revision: keep Ins runs, drop Del runs, keep live runs.
    let accepted: String = p
        .children
        .iter()
        .filter_map(|c| match c {
            ParagraphChild::Run(r) => Some(r.text.clone()),
            ParagraphChild::Ins(rev) => Some(rev.run.text.clone()),
            ParagraphChild::Del(_) => None,
        })
        .collect();

    assert_eq!(accepted, original_flat.replacen("Seller", "Vendor", 1));
}

#[test]
fn reversibility_restores_original_flat_text() {
    let original = docx_bytes(CONTRACT_XML);
    let package = Package::open(&original).unwrap();
    let original_flat = "Contract Agreement between Buyer and Seller.";

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    engine.apply_edits(&[Edit::modification("Seller", "Vendor")]);

    let doc = engine.into_document();
    let BlockNode::Paragraph(p) = &doc.body[0] else {
        panic!("expected paragraph");
    };

    // Reject every revision: drop Ins runs, restore Del runs to live text.
    let rejected: String = p
        .children
        .iter()
        .filter_map(|c| match c {
            ParagraphChild::Run(r) => Some(r.text.clone()),
            ParagraphChild::Del(rev) => Some(rev.run.text.clone()),
            ParagraphChild::Ins(_) => None,
        })
        .collect();

    assert_eq!(rejected, original_flat);
}

#[test]
fn formatting_preservation_on_insertion() {
    let xml = "<?xml version=\"1.0\"?>\n<w:document><w:body>\n\
        <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>ARTICLE</w:t></w:r><w:r><w:t>3</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>FEES</w:t></w:r></w:p>\n\
        </w:body></w:document>";
    let package = Package::open(&docx_bytes(xml)).unwrap();

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    let summary = engine.apply_edits(&[Edit::insertion("3", " ")]);
    assert_eq!(summary.applied, 1);

    let doc = engine.into_document();
    let BlockNode::Paragraph(p) = &doc.body[0] else {
        panic!("expected paragraph");
    };

    let texts = run_text(&p.children);
    assert_eq!(
        texts,
        vec![("run", "ARTICLE"), ("run", "3"), ("ins", " "), ("run", "FEES")]
    );
}

#[test]
fn only_the_targeted_paragraph_is_redlined() {
    let xml = "<?xml version=\"1.0\"?>\n<w:document><w:body>\n\
        <w:p><w:r><w:t>Section 1: Fee</w:t></w:r></w:p>\n\
        <w:p><w:r><w:t>Section 2: Fee</w:t></w:r></w:p>\n\
        </w:body></w:document>";
    let package = Package::open(&docx_bytes(xml)).unwrap();

    let mut engine = RedlineEngine::new(package.document().clone(), "Tester", "2026-01-01T00:00:00Z");
    let summary = engine.apply_edits(&[Edit::modification("Section 2: Fee", "Section 2: Price")]);
    assert_eq!(summary.applied, 1);

    let doc = engine.into_document();
    let BlockNode::Paragraph(first) = &doc.body[0] else {
        panic!()
    };
    assert_eq!(run_text(&first.children), vec![("run", "Section 1: Fee")]);

    let BlockNode::Paragraph(second) = &doc.body[1] else {
        panic!()
    };
    assert!(second
        .children
        .iter()
        .any(|c| matches!(c, ParagraphChild::Del(r) if r.run.text == "Section 2: Fee")));
}
