use crate::checks;
use crate::config::{AnalysisConfig, CitationScope};
use crate::{AnalysisError, AnalysisReport, CitationMarker, CitedSet, ReferenceList};

/// A document split at its references heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedSection<'a> {
    /// Text before the heading.
    pub body: &'a str,
    /// Text after the heading line.
    pub section: &'a str,
}

/// Locates and segments the references section of a document.
///
/// The heuristic implementation lives in `refcheck-parsing`; the analyzer
/// only depends on this trait.
pub trait ReferenceExtractor: Send + Sync {
    /// Find the references heading. `None` means the document has no
    /// references section.
    fn locate<'a>(&self, text: &'a str) -> Option<LocatedSection<'a>>;

    /// Split a references block into candidate entries, in document order.
    /// Candidates are filtered and numbered by [`ReferenceList::from_entries`].
    fn segment(&self, section: &str) -> Vec<String>;
}

/// Finds in-text citation markers.
pub trait CitationScanner: Send + Sync {
    /// Every well-formed marker in `text`. Malformed tokens are skipped.
    fn scan_markers(&self, text: &str) -> Vec<CitationMarker>;

    /// Union of all marker expansions.
    fn cited_set(&self, text: &str) -> CitedSet {
        self.scan_markers(text)
            .iter()
            .flat_map(CitationMarker::expand)
            .collect()
    }
}

/// Runs every reference check over one document and assembles the report.
pub struct Analyzer {
    config: AnalysisConfig,
    extractor: Box<dyn ReferenceExtractor>,
    scanner: Box<dyn CitationScanner>,
}

impl Analyzer {
    pub fn new(
        config: AnalysisConfig,
        extractor: Box<dyn ReferenceExtractor>,
        scanner: Box<dyn CitationScanner>,
    ) -> Self {
        Self {
            config,
            extractor,
            scanner,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract the reference list. An empty list means no usable
    /// references section was found.
    pub fn extract(&self, text: &str) -> ReferenceList {
        self.extractor
            .locate(text)
            .map(|located| self.build_list(located.section))
            .unwrap_or_default()
    }

    fn build_list(&self, section: &str) -> ReferenceList {
        ReferenceList::from_entries(
            self.extractor.segment(section),
            self.config.min_reference_length,
        )
    }

    /// Analyze a document's references.
    ///
    /// Fails only when no references section (or no entry in it) is found.
    /// `author_name` enables the self-citation check.
    pub fn analyze(
        &self,
        text: &str,
        author_name: Option<&str>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let located = self
            .extractor
            .locate(text)
            .ok_or(AnalysisError::NoReferencesSection)?;
        let refs = self.build_list(located.section);
        if refs.is_empty() {
            tracing::debug!("references heading found but no entry survived filtering");
            return Err(AnalysisError::NoReferencesSection);
        }
        tracing::debug!(total = refs.len(), "references extracted");

        let (journal_citations, excess_journal_citations) = checks::check_journal_citations(
            &refs,
            &self.config.tracked_journal,
            self.config.allowed_journal_citations,
        );

        let scanned = match self.config.citation_scope {
            CitationScope::FullText => text,
            CitationScope::BodyOnly => located.body,
        };
        let cited = self.scanner.cited_set(scanned);
        let missing_in_text_citations = checks::find_missing(refs.len(), &cited);

        let report = AnalysisReport {
            total_references: refs.len(),
            duplicates: checks::check_duplicates(&refs),
            self_citations: checks::check_self_citations(&refs, author_name),
            journal_citations,
            excess_journal_citations,
            apa_violations: checks::check_apa_format(&refs),
            highly_cited_authors: checks::check_author_frequency(
                &refs,
                self.config.author_threshold,
            ),
            missing_in_text_citations,
            references: refs,
        };
        tracing::debug!(
            duplicates = report.duplicates.len(),
            missing = report.missing_in_text_citations.len(),
            "analysis complete"
        );
        Ok(report)
    }
}
