//! Default weekly report template.
//!
//! Produces a blank `.docx` carrying every placeholder the renderer looks for,
//! so a fresh checkout can generate reports without a hand-made template.

use std::path::Path;

use tracing::info;

use crate::docx::{Document, DocxError, Paragraph, ParagraphStyle, Run};
use crate::render::headings;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="200" w:after="80"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="BodyText"><w:name w:val="Body Text"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="120"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="FirstParagraph"><w:name w:val="First Paragraph"/><w:basedOn w:val="BodyText"/></w:style></w:styles>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_TAIL: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Builds the default template in memory.
pub fn default_template() -> Result<Document, DocxError> {
    let title = r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Weekly Report</w:t></w:r></w:p>"#;

    let mut body = String::from(title);
    for prefix in [headings::NAME, headings::ROLE, headings::WEEK] {
        body.push_str(Paragraph::new(ParagraphStyle::Normal, None, &[Run::plain(prefix)]).xml());
    }

    let sections: [(&str, ParagraphStyle); 7] = [
        (headings::OBJECTIVE, ParagraphStyle::ListParagraph),
        (headings::EXECUTION, ParagraphStyle::ListParagraph),
        (headings::TRANSFORMATION_LOG, ParagraphStyle::Normal),
        (headings::AI_ACCELERATION, ParagraphStyle::BodyText),
        (headings::SOP, ParagraphStyle::Normal),
        (headings::FRICTION, ParagraphStyle::Normal),
        (headings::NEXT_WEEK, ParagraphStyle::Normal),
    ];
    for (heading, placeholder_style) in sections {
        body.push_str(Paragraph::new(ParagraphStyle::Heading3, None, &[Run::plain(heading)]).xml());
        // The transformation log heading only groups AI Acceleration.
        if heading != headings::TRANSFORMATION_LOG {
            body.push_str(Paragraph::new(placeholder_style, None, &[Run::plain("…")]).xml());
        }
    }

    let document_xml = format!("{DOCUMENT_HEAD}{body}{DOCUMENT_TAIL}");
    let parts = vec![
        ("[Content_Types].xml".to_string(), CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels".to_string(), PACKAGE_RELS.as_bytes().to_vec()),
        ("word/_rels/document.xml.rels".to_string(), DOCUMENT_RELS.as_bytes().to_vec()),
        ("word/styles.xml".to_string(), STYLES.as_bytes().to_vec()),
    ];
    Document::from_parts(parts, &document_xml)
}

/// Writes the default template to `path`, creating parent directories.
pub fn write_default_template(path: &Path) -> Result<(), DocxError> {
    let bytes = default_template()?.to_bytes()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!("Wrote default template to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_every_placeholder() {
        let doc = default_template().unwrap();
        for heading in headings::ALL_SECTIONS {
            assert!(doc.find_paragraph(heading).is_some(), "missing heading {heading}");
        }
        for prefix in [headings::NAME, headings::ROLE, headings::WEEK] {
            assert!(doc.find_paragraph_starting_with(prefix).is_some());
        }
    }

    #[test]
    fn test_write_default_template_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates/Weekly_Report_Template.docx");
        write_default_template(&path).unwrap();
        let reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.paragraph_texts()[0], "Weekly Report");
    }
}
