//! Resume text extraction for uploaded files.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file type '{0}' (expected .pdf, .docx, .txt, or .md)")]
    Unsupported(String),

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("file is not valid UTF-8 text")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Extracts plain text from an uploaded resume, dispatching on extension.
/// PDF and DOCX extraction are CPU-bound; call from a blocking context.
pub fn extract_resume_text(file_name: &str, data: &[u8]) -> Result<String, DocumentError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| DocumentError::Pdf(e.to_string())),
        "docx" => extract_docx_text(data),
        "txt" | "md" => Ok(String::from_utf8(data.to_vec())?),
        _ => Err(DocumentError::Unsupported(file_name.to_string())),
    }
}

/// One line per paragraph, run text concatenated in order.
fn extract_docx_text(data: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(data).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut lines = Vec::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for run in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = run {
                    for piece in run.children {
                        if let docx_rs::RunChild::Text(t) = piece {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            lines.push(line);
        }
    }
    Ok(lines.join("\n"))
}
