use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest author token (in characters) kept as a grouping key.
const MIN_KEY_CHARS: usize = 4;

/// Return the author segment of a reference: the text before the first
/// parenthesized four-digit year, or before the first period when no year
/// marker exists. A leading `[n]` or `n.` list marker is dropped first.
pub fn author_segment(ref_text: &str) -> &str {
    static LIST_MARKER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(?:\[\d+\]|\d+\.)\s*").unwrap());
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\d{4}\s*\)").unwrap());

    let text = match LIST_MARKER.find(ref_text) {
        Some(m) => &ref_text[m.end()..],
        None => ref_text,
    };

    if let Some(m) = YEAR_RE.find(text) {
        return &text[..m.start()];
    }
    match text.find('.') {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Extract normalized author keys from a reference.
///
/// Keys are lowercase, unique within the reference, and in order of
/// appearance. Initials, short particles and numeric fragments never become
/// keys.
pub fn author_keys(ref_text: &str) -> Vec<String> {
    static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bet\s+al\b\.?").unwrap());
    static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",|\s+and\s+|&").unwrap());
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let segment = ET_AL_RE.replace_all(author_segment(ref_text), "");
    let cleaned: String = segment
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, ',' | '.' | '-' | '&')
        })
        .collect();

    let mut keys: Vec<String> = Vec::new();
    for token in SPLIT_RE.split(&cleaned) {
        let token = token.trim_matches(|c: char| c.is_whitespace() || c == '.');
        let token = WS_RE.replace_all(token, " ");
        if token.chars().count() < MIN_KEY_CHARS || !token.chars().any(char::is_alphabetic) {
            continue;
        }
        let key = token.to_lowercase();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
