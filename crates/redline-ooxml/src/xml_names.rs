//! Wordprocessing namespace element names the parser/writer recognize.

pub const BODY: &[u8] = b"w:body";
pub const P: &[u8] = b"w:p";
pub const PPR: &[u8] = b"w:pPr";
pub const R: &[u8] = b"w:r";
pub const RPR: &[u8] = b"w:rPr";
pub const T: &[u8] = b"w:t";
pub const DEL_TEXT: &[u8] = b"w:delText";
pub const INS: &[u8] = b"w:ins";
pub const DEL: &[u8] = b"w:del";
pub const TBL: &[u8] = b"w:tbl";
pub const TBL_PR: &[u8] = b"w:tblPr";
pub const TBL_GRID: &[u8] = b"w:tblGrid";
pub const TR: &[u8] = b"w:tr";
pub const TR_PR: &[u8] = b"w:trPr";
pub const TC: &[u8] = b"w:tc";
pub const TC_PR: &[u8] = b"w:tcPr";

pub const ATTR_ID: &[u8] = b"w:id";
pub const ATTR_AUTHOR: &[u8] = b"w:author";
pub const ATTR_DATE: &[u8] = b"w:date";
