use once_cell::sync::Lazy;
use regex::Regex;

use refcheck_core::{LocatedSection, SegmentationStrategy};

use crate::config::ParsingConfig;

/// Minimum number of sequential list markers before [`SegmentationStrategy::Markers`]
/// trusts them over plain line splitting.
const MIN_MARKERS: usize = 3;

/// Locate the references heading and split the document around it.
///
/// Headings are tried from strictest to loosest, and the first tier with a
/// match wins:
/// 1. `References` alone on its line, optionally numbered (`7.`, `VII`) and
///    followed by a colon;
/// 2. a whole-word `references` (any case) ending its line;
/// 3. `References` / `REFERENCES` followed by entries on the same line, as
///    left behind when PDF extraction merges lines. The block then starts
///    right after the heading word.
///
/// Returns `None` when the document has no such heading.
pub fn locate_references_section(text: &str) -> Option<LocatedSection<'_>> {
    locate_references_section_with_config(text, &ParsingConfig::default())
}

static STANDALONE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[^\S\n]*(?:[\dIVX]+\.?[^\S\n]*)?references[^\S\n]*:?[^\S\n]*$").unwrap()
});
static LINE_END_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)\breferences\b[^\S\n]*:?[^\S\n]*$").unwrap());
// Case-sensitive: a lowercase mid-sentence "references" never opens the block.
static INLINE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:References|REFERENCES)\b[^\S\n]*:?[^\S\n]+").unwrap());

fn find_heading<'t>(text: &'t str, config: &ParsingConfig) -> Option<regex::Match<'t>> {
    if let Some(custom) = config.section_header_re.as_ref() {
        return custom.find(text);
    }
    [&*STANDALONE_HEADER_RE, &*LINE_END_HEADER_RE, &*INLINE_HEADER_RE]
        .into_iter()
        .find_map(|re| re.find(text))
}

/// Config-aware version of [`locate_references_section`].
pub(crate) fn locate_references_section_with_config<'a>(
    text: &'a str,
    config: &ParsingConfig,
) -> Option<LocatedSection<'a>> {
    let m = find_heading(text, config)?;
    let rest = &text[m.end()..];

    // A heading on its own line: the block starts on the next one.
    let rest = rest.strip_prefix('\n').unwrap_or(rest);

    let section = match config.section_end_re.as_ref().and_then(|re| re.find(rest)) {
        Some(end) => &rest[..end.start()],
        None => rest,
    };

    tracing::debug!(
        heading_at = m.start(),
        section_len = section.len(),
        "references section located"
    );
    Some(LocatedSection {
        body: &text[..m.start()],
        section,
    })
}

/// Split a references block into candidate entries using the configured strategy.
pub(crate) fn segment_with_config(section: &str, config: &ParsingConfig) -> Vec<String> {
    match config.segmentation {
        SegmentationStrategy::Lines => segment_lines(section),
        SegmentationStrategy::Markers => segment_markers(section).unwrap_or_else(|| {
            tracing::debug!("too few list markers, falling back to line segmentation");
            segment_lines(section)
        }),
    }
}

/// One candidate per non-blank physical line, trimmed.
pub fn segment_lines(section: &str) -> Vec<String> {
    section
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Join wrapped lines onto the preceding `[n]` or `n.` marker line.
///
/// Markers must be numbered sequentially from 1, which keeps a wrapped line
/// that happens to start with a year (`2020. Title`) from opening a new entry.
/// Lines before the first marker are kept as standalone candidates.
///
/// Returns `None` when fewer than three sequential markers are found.
pub fn segment_markers(section: &str) -> Option<Vec<String>> {
    static MARKER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:\[(\d+)\]|(\d+)\.)(?:\s|$)").unwrap());

    let mut entries: Vec<String> = Vec::new();
    let mut open = false;
    let mut next = 1usize;
    let mut markers = 0usize;

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let number = MARKER_RE.captures(line).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .and_then(|n| n.as_str().parse::<usize>().ok())
        });

        match number {
            Some(n) if n == next => {
                entries.push(line.to_string());
                open = true;
                next += 1;
                markers += 1;
            }
            _ if open => {
                if let Some(last) = entries.last_mut() {
                    last.push(' ');
                    last.push_str(line);
                }
            }
            _ => entries.push(line.to_string()),
        }
    }

    (markers >= MIN_MARKERS).then_some(entries)
}
