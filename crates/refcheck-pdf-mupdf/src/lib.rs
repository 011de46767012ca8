use std::path::Path;

use mupdf::{Document, Page, TextPageFlags};

use refcheck_core::{BackendError, TextExtractor};

/// Fractions of the page height treated as running header and footer.
///
/// Blocks lying entirely inside the top band, or starting inside the bottom
/// band, are dropped. This keeps page numbers and running titles from being
/// glued onto reference entries that cross a page break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: f32,
    pub bottom: f32,
}

impl PageMargins {
    /// Keep the whole page.
    pub const NONE: PageMargins = PageMargins {
        top: 0.0,
        bottom: 0.0,
    };
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 0.04,
            bottom: 0.05,
        }
    }
}

/// MuPDF-based implementation of [`TextExtractor`].
///
/// This crate isolates the AGPL-3.0 `mupdf` dependency so that the DOCX and
/// plain-text paths do not pull it in.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    margins: PageMargins,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the header/footer bands. Ratios are clamped to `0.0..=0.5`.
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = PageMargins {
            top: margins.top.clamp(0.0, 0.5),
            bottom: margins.bottom.clamp(0.0, 0.5),
        };
        self
    }

    pub fn margins(&self) -> PageMargins {
        self.margins
    }

    fn page_text(&self, page: &Page) -> Result<String, BackendError> {
        let bounds = page.bounds().map_err(extraction)?;
        let height = bounds.y1 - bounds.y0;
        let header_end = bounds.y0 + height * self.margins.top;
        let footer_start = bounds.y1 - height * self.margins.bottom;

        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(extraction)?;

        let mut out = String::new();
        for block in text_page.blocks() {
            let b = block.bounds();
            let in_header = self.margins.top > 0.0 && b.y1 <= header_end;
            let in_footer = self.margins.bottom > 0.0 && b.y0 >= footer_start;
            if in_header || in_footer {
                continue;
            }
            for line in block.lines() {
                out.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                out.push('\n');
            }
        }
        Ok(out)
    }
}

fn extraction(e: mupdf::Error) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl TextExtractor for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;
        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut text = String::new();
        let mut pages = 0usize;
        for page in document.pages().map_err(extraction)? {
            let page = page.map_err(extraction)?;
            text.push_str(&self.page_text(&page)?);
            pages += 1;
        }
        tracing::debug!(path = %path.display(), pages, chars = text.len(), "pdf text extracted");
        Ok(text)
    }
}
