//! Individual reference-list checks.
//!
//! Every check reads the [`ReferenceList`] and returns its own findings; none
//! of them mutate the list or depend on another check's output.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::authors::author_keys;
use crate::config::AuthorThreshold;
use crate::{normalize_whitespace, ApaViolations, CitedSet, DuplicateGroup, Reference, ReferenceList};

/// Group references with identical (whitespace-normalized) text.
///
/// Each duplicated text is reported once, carrying the indices of all of its
/// instances. Groups appear in order of first occurrence.
pub fn check_duplicates(refs: &ReferenceList) -> Vec<DuplicateGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, DuplicateGroup> = HashMap::new();

    for r in refs {
        let key = normalize_whitespace(&r.raw_text);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                DuplicateGroup {
                    text: r.raw_text.clone(),
                    indices: Vec::new(),
                }
            })
            .indices
            .push(r.index);
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter(|g| g.indices.len() > 1)
        .collect()
}

/// References whose text contains `author_name`, case-insensitively.
///
/// A missing or blank author name disables the check.
pub fn check_self_citations(refs: &ReferenceList, author_name: Option<&str>) -> Vec<Reference> {
    let needle = match author_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => return Vec::new(),
    };
    refs.iter()
        .filter(|r| r.raw_text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// References citing `journal`, plus the ones beyond the first `allowed`.
///
/// Returns `(all_citations, excess)`; `excess` is a suffix of
/// `all_citations` in list order.
pub fn check_journal_citations(
    refs: &ReferenceList,
    journal: &str,
    allowed: usize,
) -> (Vec<Reference>, Vec<Reference>) {
    let needle = journal.trim().to_lowercase();
    if needle.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let cited: Vec<Reference> = refs
        .iter()
        .filter(|r| r.raw_text.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    let excess = cited.iter().skip(allowed).cloned().collect();
    (cited, excess)
}

/// Flag entries that lack the bold-year marker or still carry a DOI URL.
///
/// This runs on the raw entries, so a clean result means the manuscript was
/// already formatted.
pub fn check_apa_format(refs: &ReferenceList) -> ApaViolations {
    static BOLD_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\(\d{4}\)\*\*").unwrap());

    let mut violations = ApaViolations::default();
    for r in refs {
        if !BOLD_YEAR_RE.is_match(&r.raw_text) {
            violations.missing_bold_year.push(r.clone());
        }
        if r.raw_text.to_lowercase().contains("doi.org") {
            violations.contains_doi.push(r.clone());
        }
    }
    violations
}

/// Authors appearing in at least `threshold` distinct references.
///
/// Maps each author key to the deduplicated texts of the references it was
/// found in, in list order.
pub fn check_author_frequency(
    refs: &ReferenceList,
    threshold: AuthorThreshold,
) -> BTreeMap<String, Vec<String>> {
    let mut by_author: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for r in refs {
        for key in author_keys(&r.raw_text) {
            let texts = by_author.entry(key).or_default();
            if !texts.contains(&r.raw_text) {
                texts.push(r.raw_text.clone());
            }
        }
    }
    by_author.retain(|_, texts| threshold.is_met(texts.len()));
    by_author
}

/// Indices in `1..=total` that no in-text marker cites, ascending.
pub fn find_missing(total: usize, cited: &CitedSet) -> Vec<usize> {
    (1..=total).filter(|i| !cited.contains(i)).collect()
}
