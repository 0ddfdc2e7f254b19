//! The `.docx` zip archive: `word/document.xml` is parsed into the live
//! tree, every other part is carried through as an opaque byte blob in its
//! original archive position (§4.6).

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use redline_core::Document;

use crate::error::Error;
use crate::parser::{self, DocumentXml};
use crate::writer;

const DOCUMENT_XML_PART: &str = "word/document.xml";

enum PackagePart {
    DocumentXml,
    Opaque { name: String, bytes: Vec<u8> },
}

pub struct Package {
    document: DocumentXml,
    parts: Vec<PackagePart>,
}

impl Package {
    /// Unzips `bytes`, eagerly parsing `word/document.xml` and keeping
    /// every other part opaque, in its original archive order.
    pub fn open(bytes: &[u8]) -> Result<Self, Error> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());
        let mut document = None;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;

            if name == DOCUMENT_XML_PART {
                let xml = String::from_utf8(buf).map_err(|_| Error::InvalidUtf8)?;
                document = Some(parser::parse(&xml)?);
                parts.push(PackagePart::DocumentXml);
            } else {
                parts.push(PackagePart::Opaque { name, bytes: buf });
            }
        }

        let document = document.ok_or_else(|| Error::MissingPart(DOCUMENT_XML_PART.to_string()))?;
        tracing::info!(parts = parts.len(), "opened package");
        Ok(Self { document, parts })
    }

    /// Re-serializes `word/document.xml` from the (possibly mutated) tree
    /// and re-zips every part, mutated and opaque alike, in original order.
    pub fn save(&self) -> Result<Vec<u8>, Error> {
        let document_xml = writer::write_document_xml(&self.document)?;

        let mut buf = Vec::new();
        {
            let mut zip_writer = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for part in &self.parts {
                match part {
                    PackagePart::DocumentXml => {
                        zip_writer.start_file(DOCUMENT_XML_PART, options)?;
                        zip_writer.write_all(document_xml.as_bytes())?;
                    }
                    PackagePart::Opaque { name, bytes } => {
                        zip_writer.start_file(name.as_str(), options)?;
                        zip_writer.write_all(bytes)?;
                    }
                }
            }
            zip_writer.finish()?;
        }
        Ok(buf)
    }

    pub fn document(&self) -> &Document {
        &self.document.tree
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document.tree
    }

    pub fn into_document(self) -> Document {
        self.document.tree
    }

    pub fn set_document(&mut self, tree: Document) {
        self.document.tree = tree;
    }
}
