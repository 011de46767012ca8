use std::path::Path;

use refcheck_core::{BackendError, TextExtractor};

/// Reads `.txt` / `.md` files as-is.
///
/// Invalid UTF-8 is replaced rather than rejected, since manuscripts exported
/// from older editors are often Latin-1.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PlainTextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let bytes = std::fs::read(path)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(path = %path.display(), "file is not valid UTF-8, replacing invalid bytes");
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}
