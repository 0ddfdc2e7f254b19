//! Document model, text-to-run mapping, and tracked-change redlining engine.
//!
//! This crate has no notion of files or archives — it operates purely on
//! the in-memory [`model::Document`] tree. Reading/writing `.docx` packages
//! lives in `redline-ooxml`; producing [`edit::Edit`] lists from a text diff
//! lives in `redline-diff`.

pub mod edit;
pub mod engine;
pub mod mapper;
pub mod model;
pub mod normalizer;
pub mod revision;
pub mod span;

pub use edit::{Edit, EditOperation};
pub use engine::{ApplySummary, RedlineEngine, DEFAULT_AUTHOR};
pub use mapper::Mapper;
pub use model::{
    BlockNode, Document, Paragraph, ParagraphChild, ParagraphLocation, PropertyElement,
    ResolvedRuns, Revision, Run, RunProperties, Table, TableCell, TableRow,
};
