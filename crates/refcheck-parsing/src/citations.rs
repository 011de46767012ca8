use once_cell::sync::Lazy;
use regex::Regex;

use refcheck_core::{CitationMarker, CitedSet};

use crate::config::ParsingConfig;

/// Collect every reference index cited by a bracketed marker in `text`.
///
/// `[3]`, `[1, 4]`, `[2-5]` and `[6–8; 10]` are all recognised. Tokens that
/// are not integers or ranges are skipped, as are inverted ranges.
pub fn extract_intext_citations(text: &str) -> CitedSet {
    scan_markers_with_config(text, &ParsingConfig::default())
        .iter()
        .flat_map(CitationMarker::expand)
        .collect()
}

/// Config-aware marker scan.
pub(crate) fn scan_markers_with_config(text: &str, config: &ParsingConfig) -> Vec<CitationMarker> {
    // Single-line bracket group with no nested brackets
    static GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]\n]*)\]").unwrap());

    GROUP_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|inner| inner.as_str())
        .filter(|inner| inner.bytes().any(|b| b.is_ascii_digit()))
        .flat_map(|inner| inner.split([',', ';']))
        .filter_map(|token| parse_token(token.trim(), config.max_range_span))
        .collect()
}

/// Parse one citation token: a bare integer or an inclusive range.
fn parse_token(token: &str, max_span: usize) -> Option<CitationMarker> {
    static RANGE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d+)\s*[-–]\s*(\d+)$").unwrap());

    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok().map(CitationMarker::Single);
    }

    let caps = RANGE_RE.captures(token)?;
    let start: usize = caps[1].parse().ok()?;
    let end: usize = caps[2].parse().ok()?;
    if start > end {
        tracing::trace!(token, "skipping inverted citation range");
        return None;
    }
    if end - start > max_span {
        tracing::debug!(token, max_span, "skipping oversized citation range");
        return None;
    }
    Some(CitationMarker::Range { start, end })
}
