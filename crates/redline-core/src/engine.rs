//! The Redline Engine (§4.4): top-level orchestrator — normalize, map,
//! apply each edit, rebuild, and (eventually) hand the tree back to a
//! serializer.

use crate::edit::{Edit, EditOperation};
use crate::mapper::Mapper;
use crate::model::{Document, ParagraphChild};
use crate::normalizer;
use crate::revision::RevisionBuilder;

/// Default author used when the caller doesn't specify one (§6, §10 — the
/// original tool's hardcoded default generalized into a configurable one).
pub const DEFAULT_AUTHOR: &str = "Adeu AI";

pub struct RedlineEngine {
    document: Document,
    builder: RevisionBuilder,
}

/// Outcome of [`RedlineEngine::apply_edits`]: how many edits bound to a
/// location in the document and how many didn't (§4.4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub skipped: usize,
}

impl RedlineEngine {
    /// Normalizes the document and sets the author/timestamp constants that
    /// every revision wrapper produced in this session will carry.
    pub fn new(mut document: Document, author: impl Into<String>, timestamp: impl Into<String>) -> Self {
        normalizer::normalize(&mut document);
        Self {
            document,
            builder: RevisionBuilder::new(author, timestamp),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Applies every edit, longest `target_text` first (§4.4, §9), and
    /// returns how many bound vs. were skipped.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> ApplySummary {
        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by(|a, b| b.target_text.len().cmp(&a.target_text.len()));

        let mut summary = ApplySummary::default();
        for edit in ordered {
            if self.apply_single(edit) {
                summary.applied += 1;
            } else {
                summary.skipped += 1;
            }
        }
        summary
    }

    fn apply_single(&mut self, edit: &Edit) -> bool {
        let mut mapper = Mapper::build(&self.document);

        match edit.operation {
            EditOperation::Deletion => {
                let Some(resolved) = mapper.find_target_runs(&mut self.document, &edit.target_text)
                else {
                    tracing::warn!(target = %edit.target_text, "deletion target not found");
                    return false;
                };
                let paragraph = self.document.paragraph_mut(resolved.location);
                for &idx in &resolved.run_indices {
                    let ParagraphChild::Run(run) = std::mem::replace(
                        &mut paragraph.children[idx],
                        ParagraphChild::Run(crate::model::Run::new(
                            crate::model::RunProperties::empty(),
                            String::new(),
                        )),
                    ) else {
                        unreachable!("resolved indices always point at live runs");
                    };
                    paragraph.children[idx] = self.builder.track_delete(run);
                }
                true
            }

            EditOperation::Modification => {
                let Some(new_text) = edit.new_text.as_deref().filter(|t| !t.is_empty()) else {
                    return false;
                };
                let Some(resolved) = mapper.find_target_runs(&mut self.document, &edit.target_text)
                else {
                    tracing::warn!(target = %edit.target_text, "modification target not found");
                    return false;
                };

                let paragraph = self.document.paragraph_mut(resolved.location);
                let mut style_source = crate::model::RunProperties::empty();
                for &idx in &resolved.run_indices {
                    let placeholder = ParagraphChild::Run(crate::model::Run::new(
                        crate::model::RunProperties::empty(),
                        String::new(),
                    ));
                    let ParagraphChild::Run(run) = std::mem::replace(&mut paragraph.children[idx], placeholder)
                    else {
                        unreachable!("resolved indices always point at live runs");
                    };
                    style_source = run.properties.clone();
                    paragraph.children[idx] = self.builder.track_delete(run);
                }

                let last_index = *resolved.run_indices.last().expect("non-empty");
                let ins = self.builder.track_insert(new_text, &style_source);
                paragraph.children.insert(last_index + 1, ins);
                true
            }

            EditOperation::Insertion => {
                let Some(new_text) = edit.new_text.as_deref().filter(|t| !t.is_empty()) else {
                    return false;
                };
                let Some(resolved) = mapper.find_target_runs(&mut self.document, &edit.target_text)
                else {
                    tracing::warn!(anchor = %edit.target_text, "insertion anchor not found");
                    return false;
                };

                let last_index = *resolved.run_indices.last().expect("non-empty");
                let paragraph = self.document.paragraph_mut(resolved.location);
                let style_source = paragraph.children[last_index]
                    .as_run()
                    .expect("live index")
                    .properties
                    .clone();
                let ins = self.builder.track_insert(new_text, &style_source);
                paragraph.children.insert(last_index + 1, ins);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockNode, Document, Paragraph, Run, RunProperties};

    fn doc_from_runs(runs: &[(&str, bool)]) -> Document {
        let mut doc = Document::new();
        let mut p = Paragraph::new();
        for (text, bold) in runs {
            let mut props = RunProperties::empty();
            if *bold {
                props
                    .props
                    .push(crate::model::PropertyElement::new("w:b", vec![]));
            }
            p.children
                .push(ParagraphChild::Run(Run::new(props, *text)));
        }
        doc.body.push(BlockNode::Paragraph(p));
        doc
    }

    fn engine(doc: Document) -> RedlineEngine {
        RedlineEngine::new(doc, "Tester", "2026-01-01T00:00:00Z")
    }

    #[test]
    fn scenario_1_modification() {
        let doc = doc_from_runs(&[("Contract Agreement between Buyer and Seller.", false)]);
        let mut engine = engine(doc);
        let summary = engine.apply_edits(&[Edit::modification("Seller", "Vendor")]);
        assert_eq!(summary, ApplySummary { applied: 1, skipped: 0 });

        let doc = engine.into_document();
        let paragraph = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        let has_del = paragraph
            .children
            .iter()
            .any(|c| matches!(c, ParagraphChild::Del(r) if r.run.text == "Seller"));
        let has_ins = paragraph
            .children
            .iter()
            .any(|c| matches!(c, ParagraphChild::Ins(r) if r.run.text == "Vendor"));
        assert!(has_del);
        assert!(has_ins);
    }

    #[test]
    fn scenario_2_deletion_splits_surrounding_text() {
        let doc = doc_from_runs(&[("The quick brown fox.", false)]);
        let mut engine = engine(doc);
        engine.apply_edits(&[Edit::deletion("brown")]);

        let doc = engine.into_document();
        let paragraph = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        assert_eq!(paragraph.children.len(), 3);
        assert_eq!(
            paragraph.children[0].as_run().unwrap().text,
            "The quick "
        );
        assert!(matches!(&paragraph.children[1], ParagraphChild::Del(r) if r.run.text == "brown"));
        assert_eq!(paragraph.children[2].as_run().unwrap().text, " fox.");
    }

    #[test]
    fn scenario_3_insertion_between_fragmented_bold_runs() {
        let doc = doc_from_runs(&[("ARTICLE", true), ("3", false), ("FEES", true)]);
        let mut engine = engine(doc);
        engine.apply_edits(&[Edit::insertion("3", " ")]);

        let doc = engine.into_document();
        let paragraph = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        // ARTICLE, 3, INS(" "), FEES
        assert_eq!(paragraph.children.len(), 4);
        assert!(matches!(&paragraph.children[2], ParagraphChild::Ins(_)));
        assert_eq!(paragraph.children[3].as_run().unwrap().text, "FEES");
    }

    #[test]
    fn scenario_4_insertion_splits_coalesced_run() {
        let doc = doc_from_runs(&[("ARTICLE3", false)]);
        let mut engine = engine(doc);
        engine.apply_edits(&[Edit::insertion("ARTICLE", " ")]);

        let doc = engine.into_document();
        let paragraph = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        assert_eq!(paragraph.children.len(), 3);
        assert_eq!(paragraph.children[0].as_run().unwrap().text, "ARTICLE");
        assert!(matches!(&paragraph.children[1], ParagraphChild::Ins(_)));
        assert_eq!(paragraph.children[2].as_run().unwrap().text, "3");
    }

    #[test]
    fn scenario_5_only_matching_paragraph_is_touched() {
        let mut doc = Document::new();
        for text in ["Section 1: Fee", "Section 2: Fee"] {
            let mut p = Paragraph::new();
            p.children
                .push(ParagraphChild::Run(Run::new(RunProperties::empty(), text)));
            doc.body.push(BlockNode::Paragraph(p));
        }
        let mut engine = engine(doc);
        let summary = engine.apply_edits(&[Edit::modification(
            "Section 2: Fee",
            "Section 2: Price",
        )]);
        assert_eq!(summary.applied, 1);

        let doc = engine.into_document();
        let first = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        assert_eq!(first.children.len(), 1);
        assert_eq!(first.children[0].as_run().unwrap().text, "Section 1: Fee");
    }

    #[test]
    fn skipped_when_target_missing() {
        let doc = doc_from_runs(&[("Hello", false)]);
        let mut engine = engine(doc);
        let summary = engine.apply_edits(&[Edit::deletion("Goodbye")]);
        assert_eq!(summary, ApplySummary { applied: 0, skipped: 1 });
    }

    #[test]
    fn revision_ids_are_unique_across_edits() {
        let doc = doc_from_runs(&[("one two three", false)]);
        let mut engine = engine(doc);
        engine.apply_edits(&[Edit::deletion("one"), Edit::deletion("three")]);

        let doc = engine.into_document();
        let paragraph = match &doc.body[0] {
            BlockNode::Paragraph(p) => p,
            _ => unreachable!(),
        };
        let ids: Vec<u32> = paragraph
            .children
            .iter()
            .filter_map(|c| match c {
                ParagraphChild::Del(r) | ParagraphChild::Ins(r) => Some(r.id),
                _ => None,
            })
            .collect();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn longest_target_applied_first_via_descending_sort() {
        // Both edits target overlapping text; sorting by descending length
        // means the longer, more specific edit binds before the shorter one
        // invalidates its own match by mutating the tree first.
        let doc = doc_from_runs(&[("Section 2: Fee", false)]);
        let mut engine = engine(doc);
        let summary = engine.apply_edits(&[
            Edit::deletion("Fee"),
            Edit::modification("Section 2: Fee", "Section 2: Price"),
        ]);
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped, 1);
    }
}
