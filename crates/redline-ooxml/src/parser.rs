//! Parses `word/document.xml` into a [`redline_core::Document`] tree,
//! keeping whatever the core doesn't model (the XML declaration, the
//! `<w:document>` wrapper, paragraph/table formatting, and any trailing
//! body-level element such as `<w:sectPr>`) as verbatim byte spans so a
//! save can reproduce them untouched (§4.6).

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use redline_core::{
    BlockNode, Document, Paragraph, ParagraphChild, PropertyElement, Revision, Run, RunProperties,
    Table, TableCell, TableRow,
};

use crate::error::Error;
use crate::xml_names as tag;

/// The result of parsing `word/document.xml`: the live [`Document`] tree
/// plus the surrounding markup needed to reproduce the file byte-for-byte
/// around it.
#[derive(Debug, Clone)]
pub struct DocumentXml {
    /// Everything up to and including the opening `<w:body>` tag.
    pub prefix: String,
    pub tree: Document,
    /// Any body-level content the parser doesn't model (e.g. `<w:sectPr>`),
    /// verbatim, appearing after the last recognized paragraph/table.
    pub tail: String,
    /// `</w:body>` through end of file.
    pub suffix: String,
}

pub fn parse(xml: &str) -> Result<DocumentXml, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let prefix_end = find_body_start(&mut reader)?;
    let prefix = xml[..prefix_end].to_string();

    let mut tree = Document::new();
    let mut tail_start: Option<usize> = None;
    let mut body_close_start = xml.len();

    loop {
        let pos_before = reader.buffer_position() as usize;
        let event = reader.read_event()?;

        if let Event::End(ref e) = event {
            if e.name().as_ref() == tag::BODY {
                body_close_start = pos_before;
                break;
            }
        }

        if tail_start.is_some() {
            continue;
        }

        match event {
            Event::Start(ref e) if e.name().as_ref() == tag::P => {
                tree.body.push(BlockNode::Paragraph(parse_paragraph(&mut reader, xml)?));
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::P => {
                tree.body.push(BlockNode::Paragraph(Paragraph::new()));
            }
            Event::Start(ref e) if e.name().as_ref() == tag::TBL => {
                tree.body.push(BlockNode::Table(parse_table(&mut reader, xml)?));
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::TBL => {
                tree.body.push(BlockNode::Table(Table::default()));
            }
            Event::Text(ref t) if is_whitespace_only(t.as_ref()) => {}
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => tail_start = Some(pos_before),
        }
    }

    let tail = tail_start
        .map(|start| xml[start..body_close_start].to_string())
        .unwrap_or_default();
    let suffix = xml[body_close_start..].to_string();

    Ok(DocumentXml {
        prefix,
        tree,
        tail,
        suffix,
    })
}

fn is_whitespace_only(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

fn find_body_start(reader: &mut Reader<&[u8]>) -> Result<usize, Error> {
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::BODY => {
                return Ok(reader.buffer_position() as usize)
            }
            Event::Eof => return Err(Error::MissingBody),
            _ => {}
        }
    }
}

/// Reads from just after `<w:p ...>` through its matching `</w:p>`.
fn parse_paragraph(reader: &mut Reader<&[u8]>, xml: &str) -> Result<Paragraph, Error> {
    let mut paragraph = Paragraph::new();
    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::PPR => {
                paragraph.properties = Some(capture_element(reader, xml, pos_before, tag::PPR)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::PPR => {
                paragraph.properties = Some(xml[pos_before..reader.buffer_position() as usize].to_string());
            }
            Event::Start(ref e) if e.name().as_ref() == tag::R => {
                paragraph
                    .children
                    .push(ParagraphChild::Run(parse_run(reader)?));
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::R => {
                paragraph
                    .children
                    .push(ParagraphChild::Run(Run::new(RunProperties::empty(), String::new())));
            }
            Event::Start(ref e) if e.name().as_ref() == tag::INS => {
                let revision = parse_revision(reader, e, tag::INS)?;
                paragraph.children.push(ParagraphChild::Ins(revision));
            }
            Event::Start(ref e) if e.name().as_ref() == tag::DEL => {
                let revision = parse_revision(reader, e, tag::DEL)?;
                paragraph.children.push(ParagraphChild::Del(revision));
            }
            Event::End(ref e) if e.name().as_ref() == tag::P => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(paragraph)
}

/// Reads from just after `<w:r ...>` through its matching `</w:r>`.
fn parse_run(reader: &mut Reader<&[u8]>) -> Result<Run, Error> {
    let mut properties = RunProperties::empty();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::RPR => {
                properties = parse_run_properties(reader)?;
            }
            Event::Empty(_) => {}
            Event::Start(ref e) if e.name().as_ref() == tag::T || e.name().as_ref() == tag::DEL_TEXT => {
                text.push_str(&read_text_content(reader)?);
            }
            Event::End(ref e) if e.name().as_ref() == tag::R => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }

    Ok(Run::new(properties, text))
}

fn parse_run_properties(reader: &mut Reader<&[u8]>) -> Result<RunProperties, Error> {
    let mut props = RunProperties::empty();
    loop {
        match reader.read_event()? {
            Event::Empty(ref e) => props.props.push(property_element_from(e)?),
            Event::Start(ref e) => {
                let name = e.name().as_ref().to_vec();
                props.props.push(property_element_from(e)?);
                skip_to_end(reader, &name)?;
            }
            Event::End(ref e) if e.name().as_ref() == tag::RPR => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(props)
}

fn property_element_from(e: &BytesStart) -> Result<PropertyElement, Error> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(PropertyElement::new(name, attrs))
}

/// Reads text content (possibly split across multiple `Event::Text` chunks)
/// through the matching close tag of whichever leaf element is open.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, Error> {
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => out.push_str(&t.unescape()?),
            Event::End(_) => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(out)
}

fn parse_revision(reader: &mut Reader<&[u8]>, start: &BytesStart, close_name: &[u8]) -> Result<Revision, Error> {
    let mut id = 0u32;
    let mut author = String::new();
    let mut date = String::new();

    for attr in start.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            k if k == tag::ATTR_ID => {
                let raw = attr.unescape_value()?.into_owned();
                id = raw.parse().map_err(|_| Error::InvalidRevisionId(raw))?;
            }
            k if k == tag::ATTR_AUTHOR => author = attr.unescape_value()?.into_owned(),
            k if k == tag::ATTR_DATE => date = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }

    let mut run = None;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::R => {
                run = Some(parse_run(reader)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::R => {
                run = Some(Run::new(RunProperties::empty(), String::new()));
            }
            Event::End(ref e) if e.name().as_ref() == close_name => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }

    run.map(|run| Revision { id, author, date, run })
        .ok_or(Error::EmptyRevision)
}

fn parse_table(reader: &mut Reader<&[u8]>, xml: &str) -> Result<Table, Error> {
    let mut table = Table::default();
    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::TBL_PR || e.name().as_ref() == tag::TBL_GRID => {
                let name = e.name().as_ref().to_vec();
                let raw = capture_element(reader, xml, pos_before, &name)?;
                append_properties(&mut table.properties, raw);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::TBL_PR || e.name().as_ref() == tag::TBL_GRID => {
                let raw = xml[pos_before..reader.buffer_position() as usize].to_string();
                append_properties(&mut table.properties, raw);
            }
            Event::Start(ref e) if e.name().as_ref() == tag::TR => {
                table.rows.push(parse_table_row(reader, xml)?);
            }
            Event::End(ref e) if e.name().as_ref() == tag::TBL => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(table)
}

fn parse_table_row(reader: &mut Reader<&[u8]>, xml: &str) -> Result<TableRow, Error> {
    let mut row = TableRow::default();
    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::TR_PR => {
                row.properties = Some(capture_element(reader, xml, pos_before, tag::TR_PR)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::TR_PR => {
                row.properties = Some(xml[pos_before..reader.buffer_position() as usize].to_string());
            }
            Event::Start(ref e) if e.name().as_ref() == tag::TC => {
                row.cells.push(parse_table_cell(reader, xml)?);
            }
            Event::End(ref e) if e.name().as_ref() == tag::TR => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(row)
}

fn parse_table_cell(reader: &mut Reader<&[u8]>, xml: &str) -> Result<TableCell, Error> {
    let mut cell = TableCell::default();
    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == tag::TC_PR => {
                cell.properties = Some(capture_element(reader, xml, pos_before, tag::TC_PR)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::TC_PR => {
                cell.properties = Some(xml[pos_before..reader.buffer_position() as usize].to_string());
            }
            Event::Start(ref e) if e.name().as_ref() == tag::P => {
                cell.paragraphs.push(parse_paragraph(reader, xml)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == tag::P => {
                cell.paragraphs.push(Paragraph::new());
            }
            Event::End(ref e) if e.name().as_ref() == tag::TC => break,
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
    Ok(cell)
}

fn append_properties(slot: &mut Option<String>, raw: String) {
    match slot {
        Some(existing) => existing.push_str(&raw),
        None => *slot = Some(raw),
    }
}

/// Captures `xml[start_pos..]` through the matching close tag of `name`,
/// tracking nesting depth in case the element recurs (it never does for
/// the property elements we use this for, but depth tracking costs nothing
/// and keeps the helper honestly general).
fn capture_element(reader: &mut Reader<&[u8]>, xml: &str, start_pos: usize, name: &[u8]) -> Result<String, Error> {
    let mut depth = 1u32;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == name => depth += 1,
            Event::End(ref e) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    let end_pos = reader.buffer_position() as usize;
                    return Ok(xml[start_pos..end_pos].to_string());
                }
            }
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
}

fn skip_to_end(reader: &mut Reader<&[u8]>, name: &[u8]) -> Result<(), Error> {
    let mut depth = 1u32;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == name => depth += 1,
            Event::End(ref e) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Hello world.</w:t></w:r></w:p>
<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>
</w:body>
</w:document>"#;

    #[test]
    fn parses_single_paragraph_and_keeps_sect_pr_as_tail() {
        let parsed = parse(MINIMAL).unwrap();
        assert_eq!(parsed.tree.body.len(), 1);
        let BlockNode::Paragraph(p) = &parsed.tree.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].as_run().unwrap().text, "Hello world.");
        assert!(parsed.tail.contains("w:sectPr"));
        assert!(parsed.prefix.contains("<w:body>"));
        assert!(parsed.suffix.starts_with("</w:body>"));
    }

    #[test]
    fn parses_bold_run_properties() {
        let xml = r#"<?xml version="1.0"?>
<w:document><w:body>
<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r></w:p>
</w:body></w:document>"#;
        let parsed = parse(xml).unwrap();
        let BlockNode::Paragraph(p) = &parsed.tree.body[0] else {
            panic!()
        };
        let run = p.children[0].as_run().unwrap();
        assert_eq!(run.properties.props.len(), 1);
        assert_eq!(run.properties.props[0].name, "w:b");
    }

    #[test]
    fn parses_existing_ins_and_del_wrappers() {
        let xml = r#"<?xml version="1.0"?>
<w:document><w:body>
<w:p>
<w:ins w:id="7" w:author="Alice" w:date="2026-01-01T00:00:00Z"><w:r><w:t>new</w:t></w:r></w:ins>
<w:del w:id="8" w:author="Alice" w:date="2026-01-01T00:00:00Z"><w:r><w:delText>old</w:delText></w:r></w:del>
</w:p>
</w:body></w:document>"#;
        let parsed = parse(xml).unwrap();
        let BlockNode::Paragraph(p) = &parsed.tree.body[0] else {
            panic!()
        };
        assert_eq!(p.children.len(), 2);
        assert!(matches!(&p.children[0], ParagraphChild::Ins(r) if r.id == 7 && r.run.text == "new"));
        assert!(matches!(&p.children[1], ParagraphChild::Del(r) if r.id == 8 && r.run.text == "old"));
    }

    #[test]
    fn parses_table_with_nested_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
<w:document><w:body>
<w:tbl><w:tblPr/><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
</w:body></w:document>"#;
        let parsed = parse(xml).unwrap();
        let BlockNode::Table(t) = &parsed.tree.body[0] else {
            panic!("expected table")
        };
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0].cells.len(), 1);
        let cell = &t.rows[0].cells[0];
        assert_eq!(cell.paragraphs.len(), 1);
        assert_eq!(cell.paragraphs[0].children[0].as_run().unwrap().text, "cell");
    }

    #[test]
    fn missing_body_is_an_error() {
        let result = parse("<w:document></w:document>");
        assert!(matches!(result, Err(Error::MissingBody)));
    }
}
