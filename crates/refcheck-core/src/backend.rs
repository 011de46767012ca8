use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("unsupported document format: {0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors turn a PDF/DOCX/plain-text file into one concatenated string.
/// Page and paragraph fidelity is not required; the reference analysis only
/// needs line boundaries to survive.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Trait for backends that expose per-paragraph formatting.
pub trait DocumentStructureInspector: Send + Sync {
    fn paragraphs(&self, path: &Path) -> Result<Vec<ParagraphInfo>, BackendError>;
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Formatting of a single paragraph, as reported by a
/// [`DocumentStructureInspector`].
///
/// Lengths are in inches, sizes and spacing in points. `None` means the
/// property is inherited / unspecified in the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphInfo {
    pub text: String,
    pub style_name: String,
    pub font_name: Option<String>,
    pub font_size_pt: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub alignment: Option<Alignment>,
    pub first_line_indent_in: Option<f32>,
    pub left_indent_in: Option<f32>,
    pub line_spacing: Option<f32>,
    pub spacing_before_pt: f32,
    pub spacing_after_pt: f32,
}
