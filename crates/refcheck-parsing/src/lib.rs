pub mod citations;
pub mod config;
pub mod extractor;
pub mod formatter;
pub mod section;

pub use citations::extract_intext_citations;
pub use config::{ParsingConfig, ParsingConfigBuilder, DEFAULT_MAX_RANGE_SPAN};
pub use extractor::{BracketScanner, SectionExtractor};
pub use formatter::{format_reference, format_references};
pub use section::locate_references_section;
// Re-export domain types from core (canonical definitions live there)
pub use refcheck_core::checks::find_missing;
pub use refcheck_core::{
    AnalysisConfig, AnalysisError, AnalysisReport, Analyzer, CitedSet, Reference, ReferenceList,
    SegmentationStrategy,
};

use refcheck_core::config_file::ConfigFile;
use refcheck_core::ReferenceExtractor as _;

/// Extract the reference list of `text` with default settings.
///
/// Returns an empty list when no references heading is found.
pub fn extract_references(text: &str) -> ReferenceList {
    let extractor = SectionExtractor::new();
    extractor
        .locate(text)
        .map(|located| {
            ReferenceList::from_entries(
                extractor.segment(located.section),
                refcheck_core::DEFAULT_MIN_REFERENCE_LENGTH,
            )
        })
        .unwrap_or_default()
}

/// Build an [`Analyzer`] backed by the heading extractor and bracket scanner.
pub fn analyzer(analysis: AnalysisConfig, parsing: ParsingConfig) -> Analyzer {
    Analyzer::new(
        analysis,
        Box::new(SectionExtractor::with_config(parsing.clone())),
        Box::new(BracketScanner::with_config(parsing)),
    )
}

/// Build an [`Analyzer`] from a loaded config file.
///
/// Fails when a configured regex does not compile.
pub fn analyzer_from_config_file(file: &ConfigFile) -> Result<Analyzer, regex::Error> {
    let parsing = match &file.parsing {
        Some(section) => ParsingConfigBuilder::from_section(section).build()?,
        None => ParsingConfig::default(),
    };
    Ok(analyzer(file.analysis_config(), parsing))
}

/// Analyze a document with default settings.
pub fn analyze(text: &str, author_name: Option<&str>) -> Result<AnalysisReport, AnalysisError> {
    analyzer(AnalysisConfig::default(), ParsingConfig::default()).analyze(text, author_name)
}
