//! Checks that only need the extracted plain text.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Section headings every manuscript is expected to contain.
pub const REQUIRED_HEADINGS: [&str; 8] = [
    "ABSTRACT",
    "INTRODUCTION",
    "LITERATURE REVIEW",
    "METHOD",
    "RESULT",
    "DISCUSSION",
    "CONCLUSION",
    "REFERENCES",
];

/// Report every required heading that does not appear anywhere in `text`.
///
/// Matching is case-insensitive containment, so `METHODS` satisfies `METHOD`.
pub fn check_headings(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    REQUIRED_HEADINGS
        .iter()
        .filter(|h| !upper.contains(*h))
        .map(|h| format!("Missing heading: {h}"))
        .collect()
}

/// Report table and figure captions whose number is never referenced by a
/// `see Table N` / `see Figure N` phrase.
pub fn check_tables_figures(text: &str) -> Vec<String> {
    static TABLE_CAPTION_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bTable\s*(\d+)[.:]").unwrap());
    static TABLE_REF_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bsee\s+Table\s*(\d+)").unwrap());
    static FIGURE_CAPTION_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bFigure\s*(\d+)[.:]").unwrap());
    static FIGURE_REF_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bsee\s+Figure\s*(\d+)").unwrap());

    let mut issues = unreferenced_captions(text, &TABLE_CAPTION_RE, &TABLE_REF_RE);
    issues.extend(unreferenced_captions(text, &FIGURE_CAPTION_RE, &FIGURE_REF_RE));
    issues
}

fn unreferenced_captions(text: &str, caption_re: &Regex, ref_re: &Regex) -> Vec<String> {
    let referenced: BTreeSet<&str> = ref_re
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    let mut issues: Vec<String> = Vec::new();
    for caps in caption_re.captures_iter(text) {
        let (Some(caption), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if referenced.contains(num.as_str()) {
            continue;
        }
        let issue = format!("{} not referenced in text.", caption.as_str().trim());
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_headings_present() {
        let text = "Abstract\nIntroduction\nLiterature Review\nMethods\nResults\n\
                    Discussion\nConclusion\nReferences\n";
        assert!(check_headings(text).is_empty());
    }

    #[test]
    fn test_missing_headings_in_order() {
        let text = "ABSTRACT\nINTRODUCTION\nMETHODOLOGY\nREFERENCES\n";
        assert_eq!(
            check_headings(text),
            vec![
                "Missing heading: LITERATURE REVIEW",
                "Missing heading: RESULT",
                "Missing heading: DISCUSSION",
                "Missing heading: CONCLUSION",
            ]
        );
    }

    #[test]
    fn test_referenced_table_is_fine() {
        let text = "Table 1: Accuracy.\nThe results (see Table 1) hold.";
        assert!(check_tables_figures(text).is_empty());
    }

    #[test]
    fn test_unreferenced_caption() {
        let text = "Table 2. Runtime.\nFigure 3: Pipeline.\nsee Figure 3 for details.";
        assert_eq!(
            check_tables_figures(text),
            vec!["Table 2. not referenced in text."]
        );
    }

    #[test]
    fn test_reference_numbers_match_exactly() {
        let text = "Table 1: A.\nTable 12: B.\nsee Table 12";
        assert_eq!(
            check_tables_figures(text),
            vec!["Table 1: not referenced in text."]
        );
    }

    #[test]
    fn test_case_insensitive_figures() {
        let text = "FIGURE 4. Overview.\nAs shown, SEE figure 4.";
        assert!(check_tables_figures(text).is_empty());
    }

    #[test]
    fn test_repeated_caption_reported_once() {
        let text = "Table 5: X.\nTable 5: X (continued).";
        assert_eq!(check_tables_figures(text).len(), 1);
    }
}
