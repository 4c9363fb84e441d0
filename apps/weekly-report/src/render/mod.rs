//! Template Renderer — maps a `ReportRecord` onto the weekly report template.
//!
//! Flow: open template → fill header lines → replace each section's paragraphs →
//! serialize → write atomically. Any missing placeholder aborts the whole render;
//! nothing is retried and no partial output is left behind.

pub mod headings;
pub mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::docx::{Document, DocxError, ParagraphStyle, Run};
use crate::report::week::week_or_current;
use crate::report::{ReportRecord, EMPTY_VALUE};
use crate::render::writer::SectionWriter;

/// Left indent for task, SOP, friction and focus entries.
const ENTRY_INDENT_IN: f32 = 0.25;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] DocxError),

    #[error("Template is missing placeholder '{0}'")]
    MissingPlaceholder(String),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `record` into a new document at `output` using the template at `template`.
pub fn generate_report(
    template: &Path,
    record: &ReportRecord,
    output: &Path,
) -> Result<(), RenderError> {
    let bytes = render_file(template, record)?;
    write_atomically(output, &bytes)?;
    info!("Generated {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

/// Renders `record` with the template at `template`, returning `.docx` bytes.
pub fn render_file(template: &Path, record: &ReportRecord) -> Result<Vec<u8>, RenderError> {
    if !template.exists() {
        return Err(RenderError::TemplateNotFound(template.to_path_buf()));
    }
    let mut doc = Document::open(template)?;
    render_document(&mut doc, record)?;
    Ok(doc.to_bytes()?)
}

/// Applies every field of `record` to an opened template.
pub fn render_document(doc: &mut Document, record: &ReportRecord) -> Result<(), RenderError> {
    set_line_value(doc, headings::NAME, or_na(&record.name))?;
    set_line_value(doc, headings::ROLE, or_na(&record.role))?;
    set_line_value(doc, headings::WEEK, &week_or_current(&record.week))?;

    render_objective(doc, record)?;
    render_execution(doc, record)?;
    render_ai_tasks(doc, record)?;
    render_sop(doc, record);
    render_friction(doc, record)?;
    render_next_week(doc, record);

    debug!(
        "Rendered {} paragraphs in {} body blocks",
        doc.paragraphs().count(),
        doc.blocks().len()
    );
    Ok(())
}

fn or_na(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        EMPTY_VALUE
    } else {
        value
    }
}

/// Replaces the text of the `Prefix: …` header line.
fn set_line_value(doc: &mut Document, prefix: &str, value: &str) -> Result<(), RenderError> {
    let idx = doc
        .find_paragraph_starting_with(prefix)
        .ok_or_else(|| RenderError::MissingPlaceholder(prefix.trim().to_string()))?;
    if let Some(p) = doc.paragraph_mut(idx) {
        p.set_text(&format!("{prefix}{value}"));
    }
    Ok(())
}

/// Clears the paragraphs under `heading` up to the first of `stops`; returns the heading index.
fn clear_section(doc: &mut Document, heading: &str, stops: &[&str]) -> Result<usize, RenderError> {
    let idx = doc
        .find_paragraph(heading)
        .ok_or_else(|| RenderError::MissingPlaceholder(heading.to_string()))?;
    let removed = doc.remove_paragraphs_after(idx, stops);
    debug!("Cleared {removed} placeholder paragraphs under '{heading}'");
    Ok(idx)
}

fn render_objective(doc: &mut Document, record: &ReportRecord) -> Result<(), RenderError> {
    let anchor = clear_section(
        doc,
        headings::OBJECTIVE,
        &[headings::EXECUTION, headings::TRANSFORMATION_LOG],
    )?;
    let mut w = SectionWriter::new(doc, anchor, ParagraphStyle::ListParagraph);
    w.value_or_na(&record.weekly_objective);
    w.spacer(ParagraphStyle::ListParagraph);
    Ok(())
}

fn render_execution(doc: &mut Document, record: &ReportRecord) -> Result<(), RenderError> {
    let anchor = clear_section(doc, headings::EXECUTION, &[headings::TRANSFORMATION_LOG])?;
    let style = ParagraphStyle::ListParagraph;
    let mut w = SectionWriter::new(doc, anchor, style);

    let items: Vec<_> = record
        .execution_output
        .iter()
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        w.line(EMPTY_VALUE);
    }
    for (idx, item) in items.iter().enumerate() {
        let summary = item.summary.trim();
        if !summary.is_empty() {
            w.runs(&[Run::bold(summary)]);
        }
        w.content(&item.content);
        if idx + 1 < items.len() {
            w.spacer(style);
        }
    }
    w.spacer(style);
    Ok(())
}

fn render_ai_tasks(doc: &mut Document, record: &ReportRecord) -> Result<(), RenderError> {
    let anchor = clear_section(
        doc,
        headings::AI_ACCELERATION,
        &[headings::SOP, headings::FRICTION],
    )?;
    let tasks = record.ai_tasks();
    let mut w = SectionWriter::new(doc, anchor, ParagraphStyle::FirstParagraph).indent(ENTRY_INDENT_IN);

    if tasks.is_empty() {
        w.line(EMPTY_VALUE);
    }
    for (idx, task) in tasks.iter().enumerate() {
        let style = if idx == 0 {
            ParagraphStyle::FirstParagraph
        } else {
            ParagraphStyle::BodyText
        };
        w.set_style(style);
        w.label_value(&format!("Task {}: ", idx + 1), &task.task);
        w.label_value("Tool / Agent: ", &task.tool_agent);
        w.label_value("Time Saved (Est.): ", &task.time_saved);
        w.runs(&[Run::bold("Insight / Limitation:")]);
        w.content(&task.insight_failure);
        if idx + 1 < tasks.len() {
            w.spacer(style);
        }
    }
    w.spacer(ParagraphStyle::BodyText);
    Ok(())
}

/// Optional section: templates without the SOP heading skip it.
fn render_sop(doc: &mut Document, record: &ReportRecord) {
    let Some(anchor) = doc.find_paragraph(headings::SOP) else {
        debug!("Template has no SOP section; skipping");
        return;
    };
    doc.remove_paragraphs_after(anchor, &[headings::FRICTION, headings::NEXT_WEEK]);

    let items = record.sop_process_solidification.items_or_default();
    let style = ParagraphStyle::Normal;
    let mut w = SectionWriter::new(doc, anchor, style).indent(ENTRY_INDENT_IN);
    for (idx, sop) in items.iter().enumerate() {
        w.label_value("Item: ", &sop.item);
        w.label_block("Impact:", &sop.impact);
        if idx + 1 < items.len() {
            w.spacer(style);
        }
    }
    w.spacer(style);
}

fn render_friction(doc: &mut Document, record: &ReportRecord) -> Result<(), RenderError> {
    let anchor = clear_section(doc, headings::FRICTION, &[headings::NEXT_WEEK])?;
    let items: Vec<_> = record
        .friction_blockers_ask
        .iter()
        .filter(|item| !item.is_empty())
        .collect();
    let style = ParagraphStyle::Normal;
    let mut w = SectionWriter::new(doc, anchor, style).indent(ENTRY_INDENT_IN);

    if items.is_empty() {
        w.line(EMPTY_VALUE);
    }
    for (idx, item) in items.iter().enumerate() {
        w.label_value(&format!("Friction {}: ", idx + 1), &item.friction);
        w.label_block("Action/Mitigation:", &item.action_mitigation);
        w.label_block("Ask/Attention needed:", &item.ask_attention_needed);
        if idx + 1 < items.len() {
            w.spacer(style);
        }
    }
    w.spacer(style);
    Ok(())
}

/// Optional section: everything after the heading is replaced.
fn render_next_week(doc: &mut Document, record: &ReportRecord) {
    let Some(anchor) = doc.find_paragraph(headings::NEXT_WEEK) else {
        debug!("Template has no next-week section; skipping");
        return;
    };
    doc.remove_paragraphs_after(anchor, &[]);

    let focus: Vec<&str> = record
        .next_week_focus
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let mut w = SectionWriter::new(doc, anchor, ParagraphStyle::Normal).indent(ENTRY_INDENT_IN);
    if focus.is_empty() {
        w.line(EMPTY_VALUE);
    }
    for (idx, line) in focus.iter().enumerate() {
        w.label_value(&format!("Focus {}: ", idx + 1), line);
    }
}

/// Writes through a temp file in the destination directory, so a failed write
/// never leaves a partial document at `output`.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let err = |source| RenderError::Output {
        path: output.to_path_buf(),
        source,
    };
    let dir = match output.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(err)?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(err)?;
    tmp.write_all(bytes).map_err(err)?;
    tmp.persist(output).map_err(|e| err(e.error))?;
    Ok(())
}
