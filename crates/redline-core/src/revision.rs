//! The Revision Builder (§4.3): emits `⟨ins⟩`/`⟨del⟩` wrappers carrying a
//! monotonically increasing id, a fixed author, and a fixed timestamp.

use crate::model::{ParagraphChild, Revision, Run, RunProperties};

#[derive(Debug)]
pub struct RevisionBuilder {
    author: String,
    date: String,
    next_id: u32,
}

impl RevisionBuilder {
    pub fn new(author: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            date: date.into(),
            next_id: 1,
        }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Builds a `⟨ins⟩` wrapping a freshly synthesized run carrying `text`,
    /// styled from `style_source` (the anchor or last-deleted run's
    /// properties, per §4.4).
    pub fn track_insert(&mut self, text: &str, style_source: &RunProperties) -> ParagraphChild {
        let id = self.take_id();
        ParagraphChild::Ins(Revision {
            id,
            author: self.author.clone(),
            date: self.date.clone(),
            run: Run::new(style_source.clone(), text.to_string()),
        })
    }

    /// Wraps `run` in a `⟨del⟩`, preserving its properties and text. The
    /// text is serialized into a `⟨delText⟩` leaf rather than `⟨t⟩` by the
    /// OOXML writer — the model itself doesn't distinguish the two; it's
    /// the `Del` variant that carries that meaning.
    pub fn track_delete(&mut self, run: Run) -> ParagraphChild {
        let id = self.take_id();
        ParagraphChild::Del(Revision {
            id,
            author: self.author.clone(),
            date: self.date.clone(),
            run,
        })
    }
}
