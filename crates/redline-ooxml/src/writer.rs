//! Serializes a [`DocumentXml`] back into `word/document.xml` bytes,
//! reproducing every byte the parser didn't model (§4.6).

use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use redline_core::{BlockNode, Paragraph, ParagraphChild, Revision, Run, Table};
use std::io::Write;

use crate::error::Error;
use crate::parser::DocumentXml;

pub fn write_document_xml(doc: &DocumentXml) -> Result<String, Error> {
    let mut writer = Writer::new(Vec::new());
    for block in &doc.tree.body {
        write_block(&mut writer, block)?;
    }
    let body_xml = String::from_utf8(writer.into_inner()).map_err(|_| Error::InvalidUtf8)?;
    Ok(format!("{}{}{}{}", doc.prefix, body_xml, doc.tail, doc.suffix))
}

fn write_block(writer: &mut Writer<Vec<u8>>, block: &BlockNode) -> Result<(), Error> {
    match block {
        BlockNode::Paragraph(p) => write_paragraph(writer, p),
        BlockNode::Table(t) => write_table(writer, t),
    }
}

fn write_raw(writer: &mut Writer<Vec<u8>>, raw: &str) -> Result<(), Error> {
    writer.get_mut().write_all(raw.as_bytes())?;
    Ok(())
}

fn write_paragraph(writer: &mut Writer<Vec<u8>>, p: &Paragraph) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    if let Some(raw) = &p.properties {
        write_raw(writer, raw)?;
    }
    for child in &p.children {
        match child {
            ParagraphChild::Run(run) => write_run(writer, run, false)?,
            ParagraphChild::Ins(rev) => write_revision(writer, "w:ins", rev)?,
            ParagraphChild::Del(rev) => write_revision(writer, "w:del", rev)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_revision(writer: &mut Writer<Vec<u8>>, tag: &str, rev: &Revision) -> Result<(), Error> {
    let id = rev.id.to_string();
    let mut start = BytesStart::new(tag);
    start.push_attribute(("w:id", id.as_str()));
    start.push_attribute(("w:author", rev.author.as_str()));
    start.push_attribute(("w:date", rev.date.as_str()));
    writer.write_event(Event::Start(start))?;
    write_run(writer, &rev.run, tag == "w:del")?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_run(writer: &mut Writer<Vec<u8>>, run: &Run, as_delete: bool) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;

    if !run.properties.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        for prop in &run.properties.props {
            let mut el = BytesStart::new(prop.name.as_str());
            for (key, value) in &prop.attrs {
                el.push_attribute((key.as_str(), value.as_str()));
            }
            writer.write_event(Event::Empty(el))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    }

    let text_tag = if as_delete { "w:delText" } else { "w:t" };
    let mut leaf = BytesStart::new(text_tag);
    if run.needs_preserve_space() {
        leaf.push_attribute(("xml:space", "preserve"));
    }
    writer.write_event(Event::Start(leaf))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape(&run.text))))?;
    writer.write_event(Event::End(BytesEnd::new(text_tag)))?;

    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn write_table(writer: &mut Writer<Vec<u8>>, table: &Table) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    if let Some(raw) = &table.properties {
        write_raw(writer, raw)?;
    }
    for row in &table.rows {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
        if let Some(raw) = &row.properties {
            write_raw(writer, raw)?;
        }
        for cell in &row.cells {
            writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
            if let Some(raw) = &cell.properties {
                write_raw(writer, raw)?;
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(writer, paragraph)?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    Ok(())
}
