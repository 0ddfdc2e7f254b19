//! The flat text view and the span index relating it back to run positions.

use crate::model::{Document, ParagraphLocation};

/// A `(start, end, run, paragraph)` record per §3: `end - start` equals the
/// length of the run's text, spans are strictly non-overlapping, and they
/// cover every live run exactly once.
#[derive(Debug, Clone, Copy)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub location: ParagraphLocation,
    pub run_index: usize,
}

/// Paragraph separator injected between successive paragraphs in the flat
/// view. Must match the external text extractor byte-for-byte (§3, §9).
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Synthesizes the flat text view and its span index by walking every
/// paragraph in document order and every live run within it.
pub fn build_flat_and_spans(doc: &Document) -> (String, Vec<TextSpan>) {
    let mut flat = String::new();
    let mut spans = Vec::new();

    let locations = doc.paragraph_locations();
    for location in locations {
        let paragraph = doc.paragraph(location);
        for run_index in paragraph.live_run_indices() {
            let run = paragraph.children[run_index].as_run().expect("live index");
            if run.text.is_empty() {
                continue;
            }
            let start = flat.len();
            flat.push_str(&run.text);
            let end = flat.len();
            spans.push(TextSpan {
                start,
                end,
                location,
                run_index,
            });
        }
        flat.push_str(PARAGRAPH_SEPARATOR);
    }

    (flat, spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockNode, Paragraph, ParagraphChild, Run, RunProperties};

    fn doc_with_paragraphs(texts: &[&[&str]]) -> Document {
        let mut doc = Document::new();
        for runs in texts {
            let mut p = Paragraph::new();
            for t in *runs {
                p.children
                    .push(ParagraphChild::Run(Run::new(RunProperties::empty(), *t)));
            }
            doc.body.push(BlockNode::Paragraph(p));
        }
        doc
    }

    #[test]
    fn flat_view_joins_paragraphs_with_double_newline() {
        let doc = doc_with_paragraphs(&[&["Hello"], &["World"]]);
        let (flat, spans) = build_flat_and_spans(&doc);
        assert_eq!(flat, "Hello\n\nWorld\n\n");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 5);
        assert_eq!(spans[1].start, 7);
        assert_eq!(spans[1].end, 12);
    }

    #[test]
    fn empty_runs_are_skipped() {
        let doc = doc_with_paragraphs(&[&["", "text"]]);
        let (flat, spans) = build_flat_and_spans(&doc);
        assert_eq!(flat, "text\n\n");
        assert_eq!(spans.len(), 1);
    }
}
