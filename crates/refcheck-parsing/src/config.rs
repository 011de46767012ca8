use regex::Regex;

use refcheck_core::config_file::ParsingSection;
use refcheck_core::SegmentationStrategy;

/// Default cap on the width of a citation range such as `[1-40]`.
pub const DEFAULT_MAX_RANGE_SPAN: usize = 1000;

/// Configuration for the heuristic extractor and scanner.
///
/// Regex fields are `Option<Regex>`: `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Regex locating the references heading.
    pub(crate) section_header_re: Option<Regex>,
    /// Regex marking the end of the references block (none by default).
    pub(crate) section_end_re: Option<Regex>,
    pub(crate) segmentation: SegmentationStrategy,

    // ── citations.rs ──
    /// Ranges spanning more indices than this are treated as malformed.
    pub(crate) max_range_span: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            section_header_re: None,
            section_end_re: None,
            segmentation: SegmentationStrategy::Lines,
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
        }
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    section_header_re: Option<String>,
    section_end_re: Option<String>,
    segmentation: Option<SegmentationStrategy>,
    max_range_span: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `[parsing]` section of a config file.
    pub fn from_section(section: &ParsingSection) -> Self {
        Self {
            section_header_re: section.section_header_regex.clone(),
            section_end_re: section.section_end_regex.clone(),
            segmentation: section.segmentation,
            max_range_span: section.max_range_span,
        }
    }

    pub fn section_header_regex(mut self, pattern: &str) -> Self {
        self.section_header_re = Some(pattern.to_string());
        self
    }

    pub fn section_end_regex(mut self, pattern: &str) -> Self {
        self.section_end_re = Some(pattern.to_string());
        self
    }

    pub fn segmentation(mut self, strategy: SegmentationStrategy) -> Self {
        self.segmentation = Some(strategy);
        self
    }

    pub fn max_range_span(mut self, span: usize) -> Self {
        self.max_range_span = Some(span);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            section_header_re: compile(self.section_header_re)?,
            section_end_re: compile(self.section_end_re)?,
            segmentation: self.segmentation.unwrap_or_default(),
            max_range_span: self.max_range_span.unwrap_or(DEFAULT_MAX_RANGE_SPAN),
        })
    }
}
