//! Minimal WordprocessingML package model.
//!
//! A `.docx` is a ZIP archive; the visible content lives in `word/document.xml`.
//! We keep every other part byte-for-byte and model the document body as an
//! ordered list of top-level blocks. Paragraphs are addressable by their plain
//! text; everything else (tables, section properties) is carried through untouched.

pub mod scaffold;

use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Twips per inch (1/20 of a point).
pub const TWIPS_PER_INCH: f32 = 1440.0;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a valid .docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(String),

    #[error("Package has no {DOCUMENT_PART}")]
    MissingDocumentPart,

    #[error("Document has no <w:body>")]
    MissingBody,
}

impl From<quick_xml::Error> for DocxError {
    fn from(e: quick_xml::Error) -> Self {
        DocxError::Xml(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paragraph model
// ────────────────────────────────────────────────────────────────────────────

/// Paragraph styles used by the weekly report template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    ListParagraph,
    BodyText,
    FirstParagraph,
    Heading3,
}

impl ParagraphStyle {
    /// The `w:styleId` referenced from `<w:pStyle>`. `Normal` is implicit.
    pub fn style_id(self) -> Option<&'static str> {
        match self {
            ParagraphStyle::Normal => None,
            ParagraphStyle::ListParagraph => Some("ListParagraph"),
            ParagraphStyle::BodyText => Some("BodyText"),
            ParagraphStyle::FirstParagraph => Some("FirstParagraph"),
            ParagraphStyle::Heading3 => Some("Heading3"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    fn to_xml(&self) -> String {
        let props = if self.bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
        format!(
            r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#,
            escape(self.text.as_str())
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Raw `<w:pPr>…</w:pPr>` element, empty when the paragraph has none.
    properties: String,
    xml: String,
    text: String,
}

impl Paragraph {
    /// Builds a new paragraph. Empty runs are dropped.
    pub fn new(style: ParagraphStyle, left_indent_in: Option<f32>, runs: &[Run]) -> Self {
        let mut properties = String::new();
        if style.style_id().is_some() || left_indent_in.is_some() {
            properties.push_str("<w:pPr>");
            if let Some(id) = style.style_id() {
                properties.push_str(&format!(r#"<w:pStyle w:val="{id}"/>"#));
            }
            if let Some(inches) = left_indent_in {
                let twips = (inches * TWIPS_PER_INCH).round() as i64;
                properties.push_str(&format!(r#"<w:ind w:left="{twips}"/>"#));
            }
            properties.push_str("</w:pPr>");
        }

        let runs: Vec<&Run> = runs.iter().filter(|r| !r.text.is_empty()).collect();
        let text: String = runs.iter().map(|r| r.text.as_str()).collect();
        let body: String = runs.iter().map(|r| r.to_xml()).collect();

        Self {
            xml: format!("<w:p>{properties}{body}</w:p>"),
            properties,
            text,
        }
    }

    /// Concatenated text of all runs (tabs and breaks included).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Replaces all runs with a single plain run, keeping paragraph properties.
    pub fn set_text(&mut self, text: &str) {
        let run = if text.is_empty() {
            String::new()
        } else {
            Run::plain(text).to_xml()
        };
        self.xml = format!("<w:p>{}{run}</w:p>", self.properties);
        self.text = text.to_string();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    /// Any other body child (`w:tbl`, `w:sectPr`, bookmarks…), kept verbatim.
    Other(String),
}

impl Block {
    fn xml(&self) -> &str {
        match self {
            Block::Paragraph(p) => p.xml(),
            Block::Other(xml) => xml,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// An opened `.docx` package with an editable body.
#[derive(Debug, Clone)]
pub struct Document {
    /// All ZIP entries in archive order; the document part is a placeholder.
    parts: Vec<(String, Vec<u8>)>,
    /// `document.xml` up to and including the `<w:body>` start tag.
    head: String,
    blocks: Vec<Block>,
    /// `</w:body>` through end of `document.xml`.
    tail: String,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());
        let mut document_xml = None;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            if name == DOCUMENT_PART {
                document_xml = Some(
                    String::from_utf8(data)
                        .map_err(|e| DocxError::Xml(format!("document.xml is not UTF-8: {e}")))?,
                );
                parts.push((name, Vec::new()));
            } else {
                parts.push((name, data));
            }
        }

        let document_xml = document_xml.ok_or(DocxError::MissingDocumentPart)?;
        let (head, blocks, tail) = parse_body(&document_xml)?;
        Ok(Self {
            parts,
            head,
            blocks,
            tail,
        })
    }

    /// Assembles a package from parts, with `document_xml` as the body part.
    pub fn from_parts(parts: Vec<(String, Vec<u8>)>, document_xml: &str) -> Result<Self, DocxError> {
        let (head, blocks, tail) = parse_body(document_xml)?;
        let mut parts: Vec<_> = parts.into_iter().filter(|(n, _)| n != DOCUMENT_PART).collect();
        parts.push((DOCUMENT_PART.to_string(), Vec::new()));
        Ok(Self {
            parts,
            head,
            blocks,
            tail,
        })
    }

    pub fn document_xml(&self) -> String {
        let mut xml = String::with_capacity(self.head.len() + self.tail.len() + self.blocks.len() * 128);
        xml.push_str(&self.head);
        for block in &self.blocks {
            xml.push_str(block.xml());
        }
        xml.push_str(&self.tail);
        xml
    }

    /// Serializes the package back into `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let document_xml = self.document_xml();

        for (name, data) in &self.parts {
            if name.ends_with('/') {
                writer.add_directory(name.as_str(), options)?;
                continue;
            }
            writer.start_file(name.as_str(), options)?;
            if name == DOCUMENT_PART {
                writer.write_all(document_xml.as_bytes())?;
            } else {
                writer.write_all(data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Top-level paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Other(_) => None,
        })
    }

    #[cfg(test)]
    pub fn paragraph_texts(&self) -> Vec<&str> {
        self.paragraphs().map(Paragraph::text).collect()
    }

    /// Block index of the first paragraph whose trimmed text equals `text` (trimmed).
    pub fn find_paragraph(&self, text: &str) -> Option<usize> {
        let wanted = text.trim();
        self.blocks.iter().position(|b| match b {
            Block::Paragraph(p) => p.text().trim() == wanted,
            Block::Other(_) => false,
        })
    }

    /// Block index of the first paragraph whose trimmed text starts with `prefix`.
    pub fn find_paragraph_starting_with(&self, prefix: &str) -> Option<usize> {
        self.blocks.iter().position(|b| match b {
            Block::Paragraph(p) => p.text().trim().starts_with(prefix.trim()),
            Block::Other(_) => false,
        })
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        match self.blocks.get_mut(index) {
            Some(Block::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    /// Inserts `paragraph` directly after block `index`, returning the new block's index.
    pub fn insert_after(&mut self, index: usize, paragraph: Paragraph) -> usize {
        let at = (index + 1).min(self.blocks.len());
        self.blocks.insert(at, Block::Paragraph(paragraph));
        at
    }

    /// Removes the paragraphs following block `index` up to (not including) the
    /// first paragraph whose trimmed text is one of `stops`. Non-paragraph blocks
    /// in the range are kept. With no matching stop, removal runs to the end.
    pub fn remove_paragraphs_after(&mut self, index: usize, stops: &[&str]) -> usize {
        let mut removed = 0;
        let mut i = index + 1;
        while i < self.blocks.len() {
            match &self.blocks[i] {
                Block::Paragraph(p) if stops.iter().any(|s| s.trim() == p.text().trim()) => break,
                Block::Paragraph(_) => {
                    self.blocks.remove(i);
                    removed += 1;
                }
                Block::Other(_) => i += 1,
            }
        }
        removed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// document.xml parsing
// ────────────────────────────────────────────────────────────────────────────

struct PendingBlock {
    start: usize,
    is_paragraph: bool,
    text: String,
    properties: String,
    properties_start: Option<usize>,
}

/// Splits `document.xml` into head, top-level body blocks and tail.
fn parse_body(xml: &str) -> Result<(String, Vec<Block>, String), DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut head_end = None;
    let mut tail_start = None;
    let mut blocks = Vec::new();
    let mut pending: Option<PendingBlock> = None;
    let mut in_text = false;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name();
                match body_depth {
                    None if local.as_ref() == b"body" => {
                        body_depth = Some(depth);
                        head_end = Some(end);
                    }
                    Some(bd) if depth == bd + 1 => {
                        pending = Some(PendingBlock {
                            start,
                            is_paragraph: local.as_ref() == b"p",
                            text: String::new(),
                            properties: String::new(),
                            properties_start: None,
                        });
                    }
                    Some(bd) => {
                        if let Some(block) = pending.as_mut().filter(|b| b.is_paragraph) {
                            if depth == bd + 2 && local.as_ref() == b"pPr" {
                                block.properties_start = Some(start);
                            } else if local.as_ref() == b"t" {
                                in_text = true;
                            }
                        }
                    }
                    None => {}
                }
            }
            Event::Empty(e) => {
                let local = e.local_name();
                if let Some(bd) = body_depth {
                    if depth == bd {
                        let raw = &xml[start..end];
                        if local.as_ref() == b"p" {
                            blocks.push(Block::Paragraph(Paragraph {
                                properties: String::new(),
                                xml: raw.to_string(),
                                text: String::new(),
                            }));
                        } else {
                            blocks.push(Block::Other(raw.to_string()));
                        }
                    } else if let Some(block) = pending.as_mut().filter(|b| b.is_paragraph) {
                        match local.as_ref() {
                            b"pPr" if depth == bd + 1 => block.properties = xml[start..end].to_string(),
                            // tab stops inside <w:pPr> are not text
                            b"tab" if block.properties_start.is_none() => block.text.push('\t'),
                            b"br" | b"cr" => block.text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::End(e) => {
                let local = e.local_name();
                if let Some(bd) = body_depth {
                    if depth == bd && local.as_ref() == b"body" {
                        tail_start = Some(start);
                    } else if depth == bd + 1 {
                        if let Some(block) = pending.take() {
                            let raw = xml[block.start..end].to_string();
                            blocks.push(if block.is_paragraph {
                                Block::Paragraph(Paragraph {
                                    properties: block.properties,
                                    xml: raw,
                                    text: block.text,
                                })
                            } else {
                                Block::Other(raw)
                            });
                        }
                    } else if let Some(block) = pending.as_mut() {
                        if depth == bd + 2 && local.as_ref() == b"pPr" {
                            if let Some(ps) = block.properties_start.take() {
                                block.properties = xml[ps..end].to_string();
                            }
                        } else if local.as_ref() == b"t" {
                            in_text = false;
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if in_text => {
                if let Some(block) = pending.as_mut() {
                    let text = t.unescape()?;
                    block.text.push_str(&text);
                }
            }
            Event::CData(t) if in_text => {
                if let Some(block) = pending.as_mut() {
                    block.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let head_end = head_end.ok_or(DocxError::MissingBody)?;
    let tail_start = tail_start.ok_or(DocxError::MissingBody)?;
    Ok((
        xml[..head_end].to_string(),
        blocks,
        xml[tail_start..].to_string(),
    ))
}
