//! The document tree: paragraphs, runs, tables, and the revision wrappers
//! that track changes splice into the paragraph child sequence.

/// A single `<w:rPr>`-style property marker, e.g. `<w:b/>` or `<w:sz w:val="24"/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl PropertyElement {
    pub fn new(name: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }

    /// Attribute comparison that ignores declaration order.
    fn attrs_eq(&self, other: &Self) -> bool {
        if self.attrs.len() != other.attrs.len() {
            return false;
        }
        self.attrs
            .iter()
            .all(|(k, v)| other.attrs.iter().any(|(ok, ov)| ok == k && ov == v))
    }
}

/// The formatting of a run, modeled as an ordered bag of property elements
/// rather than a fixed struct of known attributes — `w:rPr` content varies
/// too widely (bold, italic, font, size, color, language, …) to enumerate,
/// and the engine only ever needs to compare and clone it, never interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    pub props: Vec<PropertyElement>,
}

impl RunProperties {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Structural equality per §4.1: same properties, ignoring the order in
    /// which either the properties or their attributes were declared.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        if self.props.len() != other.props.len() {
            return false;
        }
        self.props.iter().all(|p| {
            other
                .props
                .iter()
                .any(|op| op.name == p.name && p.attrs_eq(op))
        })
    }
}

/// An atomic formatting span. Its visible text is the concatenation of its
/// text leaves, but since the core never needs to address leaves
/// individually, a run just holds the flattened string.
#[derive(Debug, Clone)]
pub struct Run {
    pub properties: RunProperties,
    pub text: String,
}

impl Run {
    pub fn new(properties: RunProperties, text: impl Into<String>) -> Self {
        Self {
            properties,
            text: text.into(),
        }
    }

    /// OOXML requires `xml:space="preserve"` whenever leading/trailing
    /// whitespace must survive a conforming XML processor.
    pub fn needs_preserve_space(&self) -> bool {
        needs_preserve_space(&self.text)
    }
}

pub fn needs_preserve_space(text: &str) -> bool {
    text.trim() != text
}

/// A tracked-change wrapper: `⟨ins⟩` or `⟨del⟩` in §3's terms.
#[derive(Debug, Clone)]
pub struct Revision {
    pub id: u32,
    pub author: String,
    pub date: String,
    pub run: Run,
}

/// One child of a paragraph's content sequence: either still-live text or a
/// tracked change wrapping exactly one run (§3, Revision wrapper).
#[derive(Debug, Clone)]
pub enum ParagraphChild {
    Run(Run),
    Ins(Revision),
    Del(Revision),
}

impl ParagraphChild {
    pub fn as_run(&self) -> Option<&Run> {
        match self {
            ParagraphChild::Run(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_run_mut(&mut self) -> Option<&mut Run> {
        match self {
            ParagraphChild::Run(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Raw `<w:pPr>...</w:pPr>` markup, if the source paragraph had one.
    /// The core never interprets paragraph formatting, only preserves it
    /// across a parse/serialize round trip.
    pub properties: Option<String>,
    pub children: Vec<ParagraphChild>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live run indices, in order — the only children the Mapper ever
    /// addresses. Once a run is wrapped in `Ins`/`Del` it drops out of
    /// every future rescan, matching the word processor's own behavior:
    /// revision-wrapped content is no longer "the document", just a record
    /// of what changed.
    pub fn live_run_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| matches!(c, ParagraphChild::Run(_)).then_some(i))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableCell {
    /// Raw `<w:tcPr>...</w:tcPr>`, preserved verbatim if present.
    pub properties: Option<String>,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// Raw `<w:trPr>...</w:trPr>`, preserved verbatim if present.
    pub properties: Option<String>,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Raw `<w:tblPr>...</w:tblPr>` and `<w:tblGrid>...</w:tblGrid>`,
    /// preserved verbatim if present.
    pub properties: Option<String>,
    pub rows: Vec<TableRow>,
}

/// A top-level document block: either a paragraph or a table. Table cells
/// hold paragraphs one level deep (§3: "recursion one level deep is
/// sufficient for the core; deeper nesting is a natural generalization").
#[derive(Debug, Clone)]
pub enum BlockNode {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub body: Vec<BlockNode>,
}

/// A stable (until the next mutation) coordinate identifying exactly one
/// paragraph in the tree. This plays the role of python-docx's `Paragraph`
/// object handle, made explicit as data instead of a borrowed reference so
/// the Mapper never has to fight the borrow checker to mutate the tree it
/// describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphLocation {
    Body { block_index: usize },
    TableCell {
        block_index: usize,
        row: usize,
        cell: usize,
        paragraph_index: usize,
    },
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(&self, loc: ParagraphLocation) -> &Paragraph {
        match loc {
            ParagraphLocation::Body { block_index } => match &self.body[block_index] {
                BlockNode::Paragraph(p) => p,
                BlockNode::Table(_) => panic!("ParagraphLocation::Body points at a table"),
            },
            ParagraphLocation::TableCell {
                block_index,
                row,
                cell,
                paragraph_index,
            } => match &self.body[block_index] {
                BlockNode::Table(t) => &t.rows[row].cells[cell].paragraphs[paragraph_index],
                BlockNode::Paragraph(_) => {
                    panic!("ParagraphLocation::TableCell points at a paragraph")
                }
            },
        }
    }

    pub fn paragraph_mut(&mut self, loc: ParagraphLocation) -> &mut Paragraph {
        match loc {
            ParagraphLocation::Body { block_index } => match &mut self.body[block_index] {
                BlockNode::Paragraph(p) => p,
                BlockNode::Table(_) => panic!("ParagraphLocation::Body points at a table"),
            },
            ParagraphLocation::TableCell {
                block_index,
                row,
                cell,
                paragraph_index,
            } => match &mut self.body[block_index] {
                BlockNode::Table(t) => &mut t.rows[row].cells[cell].paragraphs[paragraph_index],
                BlockNode::Paragraph(_) => {
                    panic!("ParagraphLocation::TableCell points at a paragraph")
                }
            },
        }
    }

    /// Every paragraph in document order: body paragraphs interleaved with
    /// table cells visited row-major, cell-major (§6, "tables flattened by
    /// cell-order traversal").
    pub fn paragraph_locations(&self) -> Vec<ParagraphLocation> {
        let mut out = Vec::new();
        for (block_index, block) in self.body.iter().enumerate() {
            match block {
                BlockNode::Paragraph(_) => out.push(ParagraphLocation::Body { block_index }),
                BlockNode::Table(table) => {
                    for (row, r) in table.rows.iter().enumerate() {
                        for (cell, c) in r.cells.iter().enumerate() {
                            for paragraph_index in 0..c.paragraphs.len() {
                                out.push(ParagraphLocation::TableCell {
                                    block_index,
                                    row,
                                    cell,
                                    paragraph_index,
                                });
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

/// The result of resolving an edit's target text to a contiguous run of
/// paragraph children, as produced by [`crate::mapper::Mapper::find_target_runs`].
#[derive(Debug, Clone)]
pub struct ResolvedRuns {
    pub location: ParagraphLocation,
    /// Contiguous indices into `paragraph.children`, all pointing at `Run`
    /// variants, in document order.
    pub run_indices: Vec<usize>,
}
