//! Sequential paragraph insertion below an anchor, plus the content formatting rules
//! (bullet marker, continuation lines, `N/A` for empty values).

use crate::docx::{Document, Paragraph, ParagraphStyle, Run};
use crate::report::EMPTY_VALUE;

/// A line whose first non-blank character is this marker renders as a bullet.
pub const BULLET_MARKER: char = '-';
/// Rendered prefix of a bullet paragraph.
pub const BULLET_GLYPH: &str = "• ";

/// One output line of parsed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLine {
    Bullet(String),
    Text(String),
}

impl ContentLine {
    pub fn render(&self) -> String {
        match self {
            ContentLine::Bullet(text) => format!("{BULLET_GLYPH}{text}"),
            ContentLine::Text(text) => text.clone(),
        }
    }
}

/// Splits free text into bullet / continuation lines. Blank lines are skipped.
/// Returns an empty vector when there is no visible content.
pub fn parse_content(content: &str) -> Vec<ContentLine> {
    content
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let stripped = line.trim_start();
            match stripped.strip_prefix(BULLET_MARKER) {
                Some(rest) => ContentLine::Bullet(rest.trim().to_string()),
                None => ContentLine::Text(stripped.to_string()),
            }
        })
        .collect()
}

/// Writes paragraphs one after another, starting just below `anchor`.
pub struct SectionWriter<'a> {
    doc: &'a mut Document,
    at: usize,
    style: ParagraphStyle,
    indent: Option<f32>,
}

impl<'a> SectionWriter<'a> {
    pub fn new(doc: &'a mut Document, anchor: usize, style: ParagraphStyle) -> Self {
        Self {
            doc,
            at: anchor,
            style,
            indent: None,
        }
    }

    pub fn indent(mut self, inches: f32) -> Self {
        self.indent = Some(inches);
        self
    }

    pub fn set_style(&mut self, style: ParagraphStyle) {
        self.style = style;
    }

    pub fn runs(&mut self, runs: &[Run]) {
        let paragraph = Paragraph::new(self.style, self.indent, runs);
        self.at = self.doc.insert_after(self.at, paragraph);
    }

    pub fn line(&mut self, text: &str) {
        self.runs(&[Run::plain(text)]);
    }

    /// Scalar value or `N/A`.
    pub fn value_or_na(&mut self, value: &str) {
        let value = value.trim();
        self.line(if value.is_empty() { EMPTY_VALUE } else { value });
    }

    /// Empty paragraph in `style`, without indent.
    pub fn spacer(&mut self, style: ParagraphStyle) {
        let paragraph = Paragraph::new(style, None, &[]);
        self.at = self.doc.insert_after(self.at, paragraph);
    }

    /// Bold label followed by the value on the same line; empty value → `N/A`.
    pub fn label_value(&mut self, label: &str, value: &str) {
        let value = value.trim();
        let value = if value.is_empty() { EMPTY_VALUE } else { value };
        self.runs(&[Run::bold(label), Run::plain(value)]);
    }

    /// Label and value on one line when the value is a single plain line,
    /// otherwise a bold label paragraph followed by parsed content.
    pub fn label_block(&mut self, label: &str, value: &str) {
        let v = value.trim_matches('\n');
        if v.trim().is_empty() {
            self.runs(&[Run::bold(label), Run::plain(format!(" {EMPTY_VALUE}"))]);
            return;
        }
        let single_line = !v.contains('\n') && !v.trim_start().starts_with(BULLET_MARKER);
        if single_line {
            self.runs(&[Run::bold(label), Run::plain(format!(" {v}"))]);
            return;
        }
        self.runs(&[Run::bold(label)]);
        self.content(v);
    }

    /// One paragraph per content line; `N/A` when there is none.
    pub fn content(&mut self, content: &str) {
        let lines = parse_content(content);
        if lines.is_empty() {
            self.line(EMPTY_VALUE);
            return;
        }
        for line in lines {
            self.line(&line.render());
        }
    }
}
