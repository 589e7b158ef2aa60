// Document Exporter
// Packs text into a single-paragraph .docx and checks the container before handing it out

use docx_rs::{BreakType, Docx, Paragraph, Run};
use std::io::{Cursor, Read};
use thiserror::Error;

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DEFAULT_FILENAME: &str = "article.docx";

const DOCUMENT_PART: &str = "word/document.xml";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Error creating document: {0}")]
    Pack(String),
    #[error("Error creating document: produced file is not a valid docx container ({0})")]
    InvalidContainer(String),
}

/// One paragraph; line breaks in the text become soft breaks inside it.
fn build_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

pub fn create_docx(text: &str) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(build_paragraph(text))
        .build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Pack(e.to_string()))?;

    let bytes = buffer.into_inner();
    verify_docx(&bytes)?;
    Ok(bytes)
}

/// The bytes must open as a zip holding the content-types and main document parts.
pub fn verify_docx(bytes: &[u8]) -> Result<(), ExportError> {
    let invalid = |e: zip::result::ZipError| ExportError::InvalidContainer(e.to_string());
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(invalid)?;
    archive.by_name(CONTENT_TYPES_PART).map_err(invalid)?;
    archive.by_name(DOCUMENT_PART).map_err(invalid)?;
    Ok(())
}

/// Main document XML, for callers that want to inspect the exported text.
pub fn read_document_xml(bytes: &[u8]) -> Result<String, ExportError> {
    let invalid = |e: zip::result::ZipError| ExportError::InvalidContainer(e.to_string());
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(invalid)?;
    let mut part = archive.by_name(DOCUMENT_PART).map_err(invalid)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExportError::InvalidContainer(e.to_string()))?;
    Ok(xml)
}

/// Ensure a user-supplied download name ends in `.docx`.
pub fn sanitize_filename(name: Option<&str>) -> String {
    let trimmed = name.map(str::trim).unwrap_or_default();
    let base: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '"' | '\0'))
        .collect();
    if base.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    if base.to_lowercase().ends_with(".docx") {
        base
    } else {
        format!("{}.docx", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_docx_is_valid_container() {
        let bytes = create_docx("Markets rallied today.\nAnalysts were surprised.").unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..2], b"PK");
        let xml = read_document_xml(&bytes).unwrap();
        assert!(xml.contains("Markets rallied today."));
        assert!(xml.contains("Analysts were surprised."));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(verify_docx(b"not a zip"), Err(ExportError::InvalidContainer(_))));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename(None), "article.docx");
        assert_eq!(sanitize_filename(Some("  ")), "article.docx");
        assert_eq!(sanitize_filename(Some("report")), "report.docx");
        assert_eq!(sanitize_filename(Some("../Story.DOCX")), "..Story.DOCX");
    }
}
