//! The edit record (§3) that the Diff Compiler produces and the Redline
//! Engine consumes — the contract between the two cores and the CLI's JSON
//! surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EditOperation {
    Insertion,
    Deletion,
    Modification,
}

/// One semantic edit instruction. Field names accept the CLI's flexible
/// aliases (§6) so a hand-written or LLM-authored JSON edit list can use
/// either vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edit {
    pub operation: EditOperation,

    #[serde(alias = "original")]
    pub target_text: String,

    #[serde(alias = "replace", skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Edit {
    pub fn deletion(target_text: impl Into<String>) -> Self {
        Self {
            operation: EditOperation::Deletion,
            target_text: target_text.into(),
            new_text: None,
            comment: None,
        }
    }

    pub fn insertion(anchor: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            operation: EditOperation::Insertion,
            target_text: anchor.into(),
            new_text: Some(new_text.into()),
            comment: None,
        }
    }

    pub fn modification(target_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            operation: EditOperation::Modification,
            target_text: target_text.into(),
            new_text: Some(new_text.into()),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Infers an operation from presence/absence of `target`/`new`, per §6:
    /// both ⇒ MODIFICATION, target only ⇒ DELETION, new only ⇒ INSERTION.
    /// Returns `None` when neither is present (the edit should be dropped).
    pub fn infer_operation(target: &Option<String>, new: &Option<String>) -> Option<EditOperation> {
        match (
            target.as_ref().is_some_and(|s| !s.is_empty()),
            new.as_ref().is_some_and(|s| !s.is_empty()),
        ) {
            (true, true) => Some(EditOperation::Modification),
            (true, false) => Some(EditOperation::Deletion),
            (false, true) => Some(EditOperation::Insertion),
            (false, false) => None,
        }
    }
}

/// Mirrors the on-disk JSON shape (§6): `operation` is optional and is
/// inferred from which of `target`/`new` are present when absent.
#[derive(Debug, Clone, Deserialize)]
struct RawEdit {
    operation: Option<EditOperation>,
    #[serde(alias = "original")]
    target_text: Option<String>,
    #[serde(alias = "replace")]
    new_text: Option<String>,
    comment: Option<String>,
}

impl Edit {
    /// Parses a JSON array of edit objects, inferring missing `operation`
    /// fields and dropping entries with neither a target nor a new text.
    pub fn parse_json_list(json: &str) -> serde_json::Result<Vec<Edit>> {
        let raw: Vec<RawEdit> = serde_json::from_str(json)?;
        Ok(raw
            .into_iter()
            .filter_map(|r| {
                let operation = r
                    .operation
                    .or_else(|| Edit::infer_operation(&r.target_text, &r.new_text))?;
                Some(Edit {
                    operation,
                    target_text: r.target_text.unwrap_or_default(),
                    new_text: r.new_text,
                    comment: r.comment,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_operation_matches_spec_table() {
        let t = Some("x".to_string());
        let n = Some("y".to_string());
        let none: Option<String> = None;

        assert_eq!(
            Edit::infer_operation(&t, &n),
            Some(EditOperation::Modification)
        );
        assert_eq!(
            Edit::infer_operation(&t, &none),
            Some(EditOperation::Deletion)
        );
        assert_eq!(
            Edit::infer_operation(&none, &n),
            Some(EditOperation::Insertion)
        );
        assert_eq!(Edit::infer_operation(&none, &none), None);
    }

    #[test]
    fn deserializes_short_field_aliases() {
        let json = r#"{"operation":"MODIFICATION","original":"Seller","replace":"Vendor"}"#;
        let edit: Edit = serde_json::from_str(json).unwrap();
        assert_eq!(edit.target_text, "Seller");
        assert_eq!(edit.new_text.as_deref(), Some("Vendor"));
    }

    #[test]
    fn parse_json_list_infers_missing_operations_and_drops_empty_entries() {
        let json = r#"[
            {"target_text": "Seller", "new_text": "Vendor"},
            {"original": "obsolete clause"},
            {"new_text": "Appendix A."},
            {"comment": "no target or new text"}
        ]"#;
        let edits = Edit::parse_json_list(json).unwrap();
        assert_eq!(edits.len(), 3);
        assert_eq!(edits[0].operation, EditOperation::Modification);
        assert_eq!(edits[1].operation, EditOperation::Deletion);
        assert_eq!(edits[2].operation, EditOperation::Insertion);
    }

    #[test]
    fn parse_json_list_respects_explicit_operation() {
        let json = r#"[{"operation": "INSERTION", "target_text": "", "new_text": "X"}]"#;
        let edits = Edit::parse_json_list(json).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].operation, EditOperation::Insertion);
    }
}
