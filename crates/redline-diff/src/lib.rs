//! Compiles a plain-text diff into the anchored [`redline_core::Edit`] list
//! the Redline Engine consumes (§4.5).

use redline_core::{Edit, EditOperation};
use similar::{ChangeTag, TextDiff};

/// How much of the trailing equal-run is kept as an insertion anchor. The
/// Mapper only needs enough context to disambiguate the first occurrence.
const ANCHOR_TAIL_CHARS: usize = 50;

/// Cap on the synthesized anchor when converting a start-of-document
/// insertion into a modification, for inputs with no whitespace near the
/// start of the following equal segment.
const START_OF_DOC_ANCHOR_CHARS: usize = 20;

/// Compiles an ordered edit list from `(original, modified)` plain text.
/// Word-level diffing stands in for a character-level diff with a semantic
/// cleanup pass (§4.5): grouping by word already yields human-meaningful
/// change spans without a separate cleanup step.
pub fn compile_diff(original: &str, modified: &str) -> Vec<Edit> {
    let diff = TextDiff::from_words(original, modified);
    let changes = coalesce_runs(diff.iter_all_changes().map(|c| (c.tag(), c.value())));

    let mut edits = Vec::new();
    let mut last_equal = String::new();

    for (i, (tag, text)) in changes.iter().enumerate() {
        match tag {
            ChangeTag::Equal => last_equal = text.clone(),
            ChangeTag::Delete => edits.push(Edit::deletion(text.clone())),
            ChangeTag::Insert => {
                let anchor = last_n_chars(&last_equal, ANCHOR_TAIL_CHARS);
                if anchor.is_empty() {
                    match start_of_document_edit(&changes, i, text) {
                        Some(edit) => edits.push(edit),
                        None => {
                            tracing::warn!(
                                inserted = %truncate_for_log(text),
                                "insertion at start of document ignored; no following context to anchor on"
                            );
                        }
                    }
                    continue;
                }
                edits.push(Edit::insertion(anchor, text.clone()));
            }
        }
    }

    fuse_delete_insert_pairs(edits)
}

/// Merges consecutive word-level changes sharing the same tag into one
/// segment, so an inserted/deleted phrase spanning several word tokens is
/// treated as a single contiguous span — matching what a character-level
/// diff would emit as one insert/delete run.
fn coalesce_runs<'a>(changes: impl Iterator<Item = (ChangeTag, &'a str)>) -> Vec<(ChangeTag, String)> {
    let mut out: Vec<(ChangeTag, String)> = Vec::new();
    for (tag, text) in changes {
        if let Some((last_tag, last_text)) = out.last_mut() {
            if *last_tag == tag {
                last_text.push_str(text);
                continue;
            }
        }
        out.push((tag, text.to_string()));
    }
    out
}

/// Converts a start-of-document insertion into a MODIFICATION anchored on
/// the first word (or first 20 chars) of the next equal segment (§4.5).
fn start_of_document_edit(changes: &[(ChangeTag, String)], index: usize, inserted: &str) -> Option<Edit> {
    let (next_tag, next_text) = changes.get(index + 1)?;
    if *next_tag != ChangeTag::Equal {
        return None;
    }
    let next_text = next_text.as_str();

    let anchor_target = if let Some((first, _)) = next_text.split_once(' ') {
        first
    } else {
        first_n_chars(next_text, START_OF_DOC_ANCHOR_CHARS)
    };

    if anchor_target.is_empty() {
        return None;
    }

    tracing::info!(
        anchor = anchor_target,
        "start-of-document insertion converted to modification"
    );
    Some(Edit::modification(
        anchor_target,
        format!("{inserted}{anchor_target}"),
    ))
}

/// Fuses an adjacent `DELETION(A)` immediately followed by `INSERTION(anchor, B)`
/// into a single `MODIFICATION(target=A, new=B)` (§4.5's post-pass): the diff
/// naturally emits substitutions as a delete-then-insert pair, and a single
/// replacement site is easier for the engine to bind correctly than two
/// independent edits that could each resolve to a different run split.
fn fuse_delete_insert_pairs(edits: Vec<Edit>) -> Vec<Edit> {
    let mut merged = Vec::with_capacity(edits.len());
    let mut iter = edits.into_iter().peekable();

    while let Some(current) = iter.next() {
        if current.operation == EditOperation::Deletion {
            if let Some(next) = iter.peek() {
                if next.operation == EditOperation::Insertion {
                    let next = iter.next().expect("peeked");
                    merged.push(Edit::modification(
                        current.target_text,
                        next.new_text.unwrap_or_default(),
                    ));
                    continue;
                }
            }
        }
        merged.push(current);
    }

    merged
}

fn last_n_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn first_n_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn truncate_for_log(s: &str) -> String {
    first_n_chars(s, 20).to_string()
}
