//! Error types for OOXML package I/O (§7, Rust realization).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document.xml is not valid UTF-8")]
    InvalidUtf8,

    #[error("document.xml has no <w:body> element")]
    MissingBody,

    #[error("document.xml ended unexpectedly inside an open element")]
    UnexpectedEof,

    #[error("a w:ins/w:del revision wrapper contained no run")]
    EmptyRevision,

    #[error("revision w:id attribute was not a valid integer: {0}")]
    InvalidRevisionId(String),

    #[error("archive is missing required part {0}")]
    MissingPart(String),
}
