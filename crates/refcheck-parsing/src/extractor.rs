use refcheck_core::{CitationMarker, CitationScanner, LocatedSection, ReferenceExtractor};

use crate::citations;
use crate::config::ParsingConfig;
use crate::section;

/// Heading-based reference extractor.
///
/// Finds the `References` heading and splits the block after it according to
/// the configured [`SegmentationStrategy`](refcheck_core::SegmentationStrategy).
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    config: ParsingConfig,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }
}

impl ReferenceExtractor for SectionExtractor {
    fn locate<'a>(&self, text: &'a str) -> Option<LocatedSection<'a>> {
        section::locate_references_section_with_config(text, &self.config)
    }

    fn segment(&self, section: &str) -> Vec<String> {
        section::segment_with_config(section, &self.config)
    }
}

/// Scanner for bracketed numeric citations such as `[1]`, `[2, 4]` and `[3-5]`.
#[derive(Debug, Clone, Default)]
pub struct BracketScanner {
    config: ParsingConfig,
}

impl BracketScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }
}

impl CitationScanner for BracketScanner {
    fn scan_markers(&self, text: &str) -> Vec<CitationMarker> {
        citations::scan_markers_with_config(text, &self.config)
    }
}
