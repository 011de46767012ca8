use std::path::Path;

use thiserror::Error;

pub mod docx;
pub mod plain;

pub use docx::{paragraphs_to_text, DocxBackend};
pub use plain::PlainTextBackend;
// Re-export backend types for convenience
pub use refcheck_core::{BackendError, DocumentStructureInspector, ParagraphInfo, TextExtractor};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("text extraction failed: {0}")]
    Backend(#[from] BackendError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of refcheck-ingest)")]
    NoPdfSupport,
}

/// Input format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    PlainText,
    /// Anything not recognised is handed to the PDF backend.
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "docx" => Self::Docx,
            "txt" | "md" | "text" => Self::PlainText,
            _ => Self::Pdf,
        }
    }
}

/// A loaded manuscript.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub kind: DocumentKind,
    pub text: String,
    /// Paragraph formatting, for formats that carry it (DOCX).
    pub paragraphs: Option<Vec<ParagraphInfo>>,
}

/// Extract the plain text of a PDF, DOCX or text file.
///
/// Dispatches on file extension:
/// - `.docx` → [`DocxBackend`]
/// - `.txt` / `.md` → [`PlainTextBackend`]
/// - anything else → PDF (requires the `pdf` feature / mupdf)
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    Ok(ingest(path)?.text)
}

/// Load a document's text and, when available, its paragraph structure.
pub fn ingest(path: &Path) -> Result<IngestedDocument, IngestError> {
    let kind = DocumentKind::from_path(path);
    tracing::debug!(path = %path.display(), ?kind, "ingesting document");

    let (text, paragraphs) = match kind {
        DocumentKind::Docx => {
            let paragraphs = DocxBackend::new().read_paragraphs(path)?;
            (paragraphs_to_text(&paragraphs), Some(paragraphs))
        }
        DocumentKind::PlainText => (PlainTextBackend::new().extract_text(path)?, None),
        DocumentKind::Pdf => (extract_pdf(path)?, None),
    };

    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "document contains no extractable text");
    }
    Ok(IngestedDocument {
        kind,
        text,
        paragraphs,
    })
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    let backend = refcheck_pdf_mupdf::MupdfBackend::new();
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
