use serde::{Deserialize, Serialize};

/// Journal whose citations are tracked by the journal-bias check.
pub const DEFAULT_TRACKED_JOURNAL: &str = "Qubahan Academic Journal";
/// Citations of the tracked journal tolerated before the rest count as excess.
pub const DEFAULT_ALLOWED_JOURNAL_CITATIONS: usize = 2;
/// Number of references an author key needs to be reported as highly cited.
pub const DEFAULT_AUTHOR_THRESHOLD: usize = 4;
/// Entries with this many characters or fewer are treated as extraction noise.
pub const DEFAULT_MIN_REFERENCE_LENGTH: usize = 30;

/// How the citation formatter presents DOIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoiDisplayPolicy {
    /// Replace resolver URLs and bare DOIs with a `[doi:…](url)` link.
    #[default]
    Hyperlink,
    /// Delete resolver URLs from the entry.
    Remove,
}

/// How the author-frequency count is compared against its threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdComparison {
    #[default]
    AtLeast,
    MoreThan,
}

/// Which part of the document is scanned for in-text citation markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationScope {
    /// The whole document, references section included.
    #[default]
    FullText,
    /// Only the text before the references heading.
    BodyOnly,
}

/// How a references block is cut into candidate entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// One candidate per physical line. Entries wrapped over several lines
    /// are not reassembled.
    #[default]
    Lines,
    /// Join continuation lines onto the preceding `[n]` / `n.` marker line.
    /// Falls back to [`SegmentationStrategy::Lines`] when fewer than three
    /// sequential markers are present.
    Markers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorThreshold {
    pub count: usize,
    pub comparison: ThresholdComparison,
}

impl Default for AuthorThreshold {
    fn default() -> Self {
        Self {
            count: DEFAULT_AUTHOR_THRESHOLD,
            comparison: ThresholdComparison::AtLeast,
        }
    }
}

impl AuthorThreshold {
    /// Whether `n` references are enough to report an author.
    pub fn is_met(&self, n: usize) -> bool {
        match self.comparison {
            ThresholdComparison::AtLeast => n >= self.count,
            ThresholdComparison::MoreThan => n > self.count,
        }
    }
}

/// Thresholds and policies for the reference analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub tracked_journal: String,
    pub allowed_journal_citations: usize,
    pub author_threshold: AuthorThreshold,
    pub min_reference_length: usize,
    pub doi_policy: DoiDisplayPolicy,
    pub citation_scope: CitationScope,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tracked_journal: DEFAULT_TRACKED_JOURNAL.to_string(),
            allowed_journal_citations: DEFAULT_ALLOWED_JOURNAL_CITATIONS,
            author_threshold: AuthorThreshold::default(),
            min_reference_length: DEFAULT_MIN_REFERENCE_LENGTH,
            doi_policy: DoiDisplayPolicy::default(),
            citation_scope: CitationScope::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`]. Unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    tracked_journal: Option<String>,
    allowed_journal_citations: Option<usize>,
    author_threshold: Option<usize>,
    author_comparison: Option<ThresholdComparison>,
    min_reference_length: Option<usize>,
    doi_policy: Option<DoiDisplayPolicy>,
    citation_scope: Option<CitationScope>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_journal(mut self, name: &str) -> Self {
        self.tracked_journal = Some(name.to_string());
        self
    }

    pub fn allowed_journal_citations(mut self, n: usize) -> Self {
        self.allowed_journal_citations = Some(n);
        self
    }

    pub fn author_threshold(mut self, n: usize) -> Self {
        self.author_threshold = Some(n);
        self
    }

    pub fn author_comparison(mut self, comparison: ThresholdComparison) -> Self {
        self.author_comparison = Some(comparison);
        self
    }

    pub fn min_reference_length(mut self, n: usize) -> Self {
        self.min_reference_length = Some(n);
        self
    }

    pub fn doi_policy(mut self, policy: DoiDisplayPolicy) -> Self {
        self.doi_policy = Some(policy);
        self
    }

    pub fn citation_scope(mut self, scope: CitationScope) -> Self {
        self.citation_scope = Some(scope);
        self
    }

    pub fn build(self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            tracked_journal: self.tracked_journal.unwrap_or(defaults.tracked_journal),
            allowed_journal_citations: self
                .allowed_journal_citations
                .unwrap_or(defaults.allowed_journal_citations),
            author_threshold: AuthorThreshold {
                count: self
                    .author_threshold
                    .unwrap_or(defaults.author_threshold.count),
                comparison: self
                    .author_comparison
                    .unwrap_or(defaults.author_threshold.comparison),
            },
            min_reference_length: self
                .min_reference_length
                .unwrap_or(defaults.min_reference_length),
            doi_policy: self.doi_policy.unwrap_or(defaults.doi_policy),
            citation_scope: self.citation_scope.unwrap_or(defaults.citation_scope),
        }
    }
}
