//! The Text-to-Run Mapper (§4.2): owns the flat text view and span index,
//! locates targets, and splits runs at arbitrary character offsets.

use crate::model::{Document, ParagraphChild, ResolvedRuns, Run};
use crate::span::{build_flat_and_spans, TextSpan};

/// Stateless from the document's point of view: a `Mapper` owns a snapshot
/// of the flat view and span index, never a borrow of the tree. That lets
/// `find_target_runs` mutate the document (to split runs) and then rebuild
/// its own snapshot, with no lifetime entangling it with `Document` itself.
#[derive(Debug, Default)]
pub struct Mapper {
    flat: String,
    spans: Vec<TextSpan>,
}

impl Mapper {
    pub fn build(doc: &Document) -> Self {
        let (flat, spans) = build_flat_and_spans(doc);
        Self { flat, spans }
    }

    pub fn flat_text(&self) -> &str {
        &self.flat
    }

    /// Rescans the document, rebuilding the flat view and span index.
    pub fn rebuild(&mut self, doc: &Document) {
        let (flat, spans) = build_flat_and_spans(doc);
        self.flat = flat;
        self.spans = spans;
    }

    /// Locates `target` in the current flat view and returns the minimal
    /// contiguous run sequence realizing it, splitting the boundary runs if
    /// the match starts or ends mid-run. Returns `None` if `target` isn't a
    /// substring, or if the match straddles a paragraph separator.
    pub fn find_target_runs(&mut self, doc: &mut Document, target: &str) -> Option<ResolvedRuns> {
        if target.is_empty() {
            return None;
        }

        let match_start = self.flat.find(target)?;
        let match_end = match_start + target.len();

        let affected: Vec<TextSpan> = self
            .spans
            .iter()
            .copied()
            .filter(|s| s.end > match_start && s.start < match_end)
            .collect();

        if affected.is_empty() || !covers_contiguously(&affected, match_start, match_end) {
            tracing::warn!(target, "match straddles paragraph separator; skipping");
            return None;
        }

        let location = affected[0].location;
        let mut run_indices: Vec<usize> = affected.iter().map(|s| s.run_index).collect();
        let mut dirty = false;

        // Left boundary: if the match starts inside the first affected
        // run, split it and keep the right half.
        let first = affected[0];
        let local_start = match_start - first.start;
        if local_start > 0 {
            let paragraph = doc.paragraph_mut(location);
            split_run_at(paragraph, first.run_index, local_start);
            // The right half is the new sibling, inserted immediately
            // after the original at `first.run_index + 1`.
            run_indices[0] = first.run_index + 1;
            for idx in run_indices.iter_mut().skip(1) {
                *idx += 1;
            }
            dirty = true;
        }

        // Right boundary: if the match ends inside the last affected run,
        // split it and keep the left half. Recompute the local split point
        // from the (possibly just-shifted) last span's own length, since a
        // left split only ever touches the first run in a multi-run match.
        let last = *affected.last().expect("non-empty");
        let extra_len = last.end - match_end;
        if extra_len > 0 {
            let last_idx = *run_indices.last().expect("non-empty");
            let paragraph = doc.paragraph_mut(location);
            let run_len = paragraph.children[last_idx]
                .as_run()
                .expect("live index")
                .text
                .len();
            split_run_at(paragraph, last_idx, run_len - extra_len);
            dirty = true;
        }

        if dirty {
            self.rebuild(doc);
        }

        Some(ResolvedRuns {
            location,
            run_indices,
        })
    }
}

/// True iff `affected` spans, taken together, cover `[match_start, match_end)`
/// with no gap — i.e. the match never dips into a paragraph separator,
/// which belongs to no run and so can never be part of a contiguous run
/// sequence (§4.2).
fn covers_contiguously(affected: &[TextSpan], match_start: usize, match_end: usize) -> bool {
    if affected[0].start > match_start || affected.last().unwrap().end < match_end {
        return false;
    }
    affected.windows(2).all(|w| w[0].end == w[1].start)
}

/// Splits `paragraph.children[run_index]` (which must be a live run) at
/// byte offset `at`, truncating the original to the prefix and inserting a
/// structural clone holding the suffix immediately after it (§4.2).
fn split_run_at(paragraph: &mut crate::model::Paragraph, run_index: usize, at: usize) {
    let run = paragraph.children[run_index]
        .as_run_mut()
        .expect("split target must be a live run");
    let suffix = run.text.split_off(at);
    let right = Run::new(run.properties.clone(), suffix);
    paragraph
        .children
        .insert(run_index + 1, ParagraphChild::Run(right));
}
