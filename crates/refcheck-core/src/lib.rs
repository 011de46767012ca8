use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub mod analyzer;
pub mod authors;
pub mod backend;
pub mod checks;
pub mod config;
pub mod config_file;

// Re-export for convenience
pub use analyzer::{Analyzer, CitationScanner, LocatedSection, ReferenceExtractor};
pub use backend::{
    Alignment, BackendError, DocumentStructureInspector, ParagraphInfo, TextExtractor,
};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, AuthorThreshold, CitationScope, DoiDisplayPolicy,
    SegmentationStrategy, ThresholdComparison, DEFAULT_ALLOWED_JOURNAL_CITATIONS,
    DEFAULT_AUTHOR_THRESHOLD, DEFAULT_MIN_REFERENCE_LENGTH, DEFAULT_TRACKED_JOURNAL,
};

/// A single bibliography entry extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// 1-based position in the extracted reference list. This is the number
    /// in-text markers such as `[3]` point at.
    pub index: usize,
    #[serde(rename = "text")]
    pub raw_text: String,
}

/// The ordered reference list of one document.
///
/// Built once per analysis run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceList {
    entries: Vec<Reference>,
}

impl ReferenceList {
    /// Build a list from raw candidate entries.
    ///
    /// Each candidate is trimmed; candidates whose character count is
    /// `<= min_len` are dropped as extraction noise. Indices are assigned in
    /// order of survival, starting at 1.
    pub fn from_entries<I, S>(candidates: I, min_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = candidates
            .into_iter()
            .filter_map(|c| {
                let trimmed = c.as_ref().trim();
                (trimmed.chars().count() > min_len).then(|| trimmed.to_string())
            })
            .enumerate()
            .map(|(i, raw_text)| Reference {
                index: i + 1,
                raw_text,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.entries.iter()
    }

    /// Look up a reference by its 1-based index.
    pub fn get(&self, index: usize) -> Option<&Reference> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

}

impl<'a> IntoIterator for &'a ReferenceList {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One in-text citation occurrence: a bare number or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationMarker {
    Single(usize),
    Range { start: usize, end: usize },
}

impl CitationMarker {
    /// All reference indices covered by this marker.
    ///
    /// A range with `start > end` is malformed and covers nothing.
    pub fn expand(&self) -> std::ops::RangeInclusive<usize> {
        match *self {
            CitationMarker::Single(n) => n..=n,
            CitationMarker::Range { start, end } if start <= end => start..=end,
            // Empty range
            CitationMarker::Range { .. } => 1..=0,
        }
    }
}

/// Every reference index cited anywhere in the scanned text.
pub type CitedSet = BTreeSet<usize>;

/// Collapse every run of whitespace to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// A reference text that occurs more than once in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    #[serde(rename = "Reference")]
    pub text: String,
    /// Indices of every instance, ascending.
    #[serde(rename = "Occurrences")]
    pub indices: Vec<usize>,
}

/// APA presentation problems found in the raw (unformatted) entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApaViolations {
    #[serde(rename = "Missing Bold Year")]
    pub missing_bold_year: Vec<Reference>,
    #[serde(rename = "Contains DOI")]
    pub contains_doi: Vec<Reference>,
}

impl ApaViolations {
    pub fn is_empty(&self) -> bool {
        self.missing_bold_year.is_empty() && self.contains_doi.is_empty()
    }
}

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "Total References")]
    pub total_references: usize,
    #[serde(rename = "Duplicate References")]
    pub duplicates: Vec<DuplicateGroup>,
    #[serde(rename = "Self-Citations")]
    pub self_citations: Vec<Reference>,
    #[serde(rename = "Qubahan Citations")]
    pub journal_citations: Vec<Reference>,
    #[serde(rename = "Excess Qubahan Citations")]
    pub excess_journal_citations: Vec<Reference>,
    #[serde(rename = "APA Style Violations")]
    pub apa_violations: ApaViolations,
    /// Author key → deduplicated texts of the references it appears in.
    #[serde(rename = "Highly Cited Authors (≥4)")]
    pub highly_cited_authors: BTreeMap<String, Vec<String>>,
    #[serde(rename = "Missing In-Text Citations")]
    pub missing_in_text_citations: Vec<usize>,
    #[serde(rename = "Extracted References")]
    pub references: ReferenceList,
}

impl AnalysisReport {
    /// Whether any check reported something.
    pub fn has_issues(&self) -> bool {
        !self.duplicates.is_empty()
            || !self.self_citations.is_empty()
            || !self.excess_journal_citations.is_empty()
            || !self.apa_violations.is_empty()
            || !self.highly_cited_authors.is_empty()
            || !self.missing_in_text_citations.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No references found. Ensure your document contains a 'References' section.")]
    NoReferencesSection,
}
