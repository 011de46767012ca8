//! APA presentation fixes for individual reference entries.
//!
//! Every function here is a pure `&str -> String` transform and is idempotent:
//! formatting an already formatted entry returns it unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use refcheck_core::{DoiDisplayPolicy, ReferenceList};

/// Absolute DOI resolver URL. Group 1 is the DOI suffix.
static DOI_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://(?:dx\.)?doi\.org/([^\s,;]+)").unwrap());

/// Bare DOI, optionally introduced by `doi:` or a scheme-less `doi.org/`.
/// Group 1 is the DOI itself.
static BARE_DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bdoi:\s*|\b(?:dx\.)?doi\.org/)?(10\.\d{4,9}/[^\s,;]+)").unwrap()
});

/// A DOI already rendered as a Markdown link.
static DOI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[doi:[^\]]*\]\(https?://(?:dx\.)?doi\.org/[^)\s]*\)").unwrap()
});

/// Apply year bolding and the DOI policy to one entry.
pub fn format_reference(text: &str, policy: DoiDisplayPolicy) -> String {
    let bolded = bold_year(text);
    match policy {
        DoiDisplayPolicy::Hyperlink => hyperlink_doi(&bolded),
        DoiDisplayPolicy::Remove => remove_doi_urls(&bolded),
    }
}

/// Format every entry of a list, in order.
pub fn format_references(refs: &ReferenceList, policy: DoiDisplayPolicy) -> Vec<String> {
    refs.iter()
        .map(|r| format_reference(&r.raw_text, policy))
        .collect()
}

/// Wrap every parenthesised four-digit year in bold: `(2020)` → `**(2020)**`.
///
/// Years already wrapped in `**` keep their markers; only the spaces inside
/// the parentheses are dropped (`**( 2020 )**` → `**(2020)**`).
pub fn bold_year(text: &str) -> String {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*(\d{4})\s*\)").unwrap());

    YEAR_RE
        .replace_all(text, |caps: &Captures| match caps.get(0) {
            Some(m) if text[..m.start()].ends_with("**") && text[m.end()..].starts_with("**") => {
                format!("({})", &caps[1])
            }
            _ => format!("**({})**", &caps[1]),
        })
        .into_owned()
}

/// Render the first DOI in `text` as a `[doi:…](https://doi.org/…)` link.
///
/// A resolver URL is preferred over a bare DOI. Text that already carries a
/// DOI link is returned unchanged.
pub fn hyperlink_doi(text: &str) -> String {
    if DOI_LINK_RE.is_match(text) {
        return text.to_string();
    }

    if let Some(caps) = DOI_URL_RE.captures(text) {
        let (Some(whole), Some(suffix)) = (caps.get(0), caps.get(1)) else {
            return text.to_string();
        };
        let doi = clean_doi(suffix.as_str());
        let url_end = suffix.start() + doi.len();
        let url = &text[whole.start()..url_end];
        let link = format!("[doi:{doi}]({url})");
        return splice(text, whole.start(), url_end, &link);
    }

    if let Some(caps) = BARE_DOI_RE.captures(text) {
        let (Some(whole), Some(bare)) = (caps.get(0), caps.get(1)) else {
            return text.to_string();
        };
        let doi = clean_doi(bare.as_str());
        let end = bare.start() + doi.len();
        let link = format!("[doi:{doi}](https://doi.org/{doi})");
        return splice(text, whole.start(), end, &link);
    }

    text.to_string()
}

/// Delete resolver URLs and collapse the spaces they leave behind.
///
/// Bare DOIs are kept. Punctuation trailing a URL stays in the text.
pub fn remove_doi_urls(text: &str) -> String {
    static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());
    static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([.,;])").unwrap());

    if !DOI_URL_RE.is_match(text) {
        return text.to_string();
    }

    let stripped = DOI_URL_RE.replace_all(text, |caps: &Captures| {
        let suffix = &caps[1];
        let tail = &suffix[clean_doi(suffix).len()..];
        // Avoid "Title.." when the URL ended the sentence.
        let before = caps.get(0).map_or("", |m| text[..m.start()].trim_end());
        match tail.strip_prefix('.') {
            Some(rest) if before.ends_with('.') => rest.to_string(),
            _ => tail.to_string(),
        }
    });
    let collapsed = SPACES_RE.replace_all(&stripped, " ");
    SPACE_BEFORE_PUNCT_RE
        .replace_all(&collapsed, "$1")
        .trim()
        .to_string()
}

/// Trim trailing sentence punctuation and unbalanced closing brackets.
fn clean_doi(doi: &str) -> &str {
    let mut doi = doi;
    loop {
        let before = doi;
        doi = doi.trim_end_matches(['.', ',', ';', ':']);
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
            if doi.ends_with(close) && doi.matches(close).count() > doi.matches(open).count() {
                doi = &doi[..doi.len() - close.len_utf8()];
            }
        }
        if doi == before {
            return doi;
        }
    }
}

fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_year() {
        assert_eq!(
            bold_year("Smith, J. (2020). Title."),
            "Smith, J. **(2020)**. Title."
        );
        assert_eq!(bold_year("Smith, J. ( 2020 ). Title."), "Smith, J. **(2020)**. Title.");
    }

    #[test]
    fn test_bold_year_idempotent() {
        let once = bold_year("Smith, J. (2020). Title.");
        assert_eq!(bold_year(&once), once);
    }

    #[test]
    fn test_bold_year_tightens_wrapped_year() {
        let text = "Smith, J. **( 2020 )**. Title of the work here.";
        let fixed = bold_year(text);
        assert_eq!(fixed, "Smith, J. **(2020)**. Title of the work here.");

        let list = ReferenceList::from_entries([fixed.as_str()], 0);
        assert!(refcheck_core::checks::check_apa_format(&list)
            .missing_bold_year
            .is_empty());
    }

    #[test]
    fn test_bold_year_ignores_non_years() {
        assert_eq!(bold_year("Vol. (12). Pages (123)."), "Vol. (12). Pages (123).");
    }

    #[test]
    fn test_hyperlink_url() {
        let out = hyperlink_doi("Title. https://doi.org/10.1234/abc.def.");
        assert_eq!(
            out,
            "Title. [doi:10.1234/abc.def](https://doi.org/10.1234/abc.def)."
        );
    }

    #[test]
    fn test_hyperlink_dx_url() {
        let out = hyperlink_doi("Title. http://dx.doi.org/10.1000/xyz123");
        assert_eq!(
            out,
            "Title. [doi:10.1000/xyz123](http://dx.doi.org/10.1000/xyz123)"
        );
    }

    #[test]
    fn test_hyperlink_bare_doi() {
        let out = hyperlink_doi("Title. doi:10.1145/3368089.3409740, pp. 1-10.");
        assert_eq!(
            out,
            "Title. [doi:10.1145/3368089.3409740](https://doi.org/10.1145/3368089.3409740), pp. 1-10."
        );
    }

    #[test]
    fn test_hyperlink_keeps_balanced_parens() {
        let out = hyperlink_doi("(see 10.1016/0021-9681(87)90171-8)");
        assert_eq!(
            out,
            "(see [doi:10.1016/0021-9681(87)90171-8](https://doi.org/10.1016/0021-9681(87)90171-8))"
        );
    }

    #[test]
    fn test_hyperlink_idempotent() {
        for input in [
            "Title. https://doi.org/10.1234/abc.",
            "Title. 10.1145/3368089.3409740",
            "(see 10.1016/0021-9681(87)90171-8)",
        ] {
            let once = hyperlink_doi(input);
            assert_eq!(hyperlink_doi(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_hyperlink_without_doi() {
        assert_eq!(hyperlink_doi("No identifier here."), "No identifier here.");
    }

    #[test]
    fn test_remove_doi_urls() {
        assert_eq!(
            remove_doi_urls("Title. https://doi.org/10.1234/abc"),
            "Title."
        );
        assert_eq!(
            remove_doi_urls("Title. https://doi.org/10.1234/abc. Next."),
            "Title. Next."
        );
        assert_eq!(
            remove_doi_urls("Title,  https://doi.org/10.1234/abc  2020."),
            "Title, 2020."
        );
    }

    #[test]
    fn test_remove_keeps_bare_doi() {
        let input = "Title. 10.1234/abc";
        assert_eq!(remove_doi_urls(input), input);
    }

    #[test]
    fn test_format_reference_both_policies() {
        let input = "Smith, J. (2020). Title. https://doi.org/10.1234/abc";
        assert_eq!(
            format_reference(input, DoiDisplayPolicy::Hyperlink),
            "Smith, J. **(2020)**. Title. [doi:10.1234/abc](https://doi.org/10.1234/abc)"
        );
        assert_eq!(
            format_reference(input, DoiDisplayPolicy::Remove),
            "Smith, J. **(2020)**. Title."
        );
    }

    #[test]
    fn test_format_reference_idempotent() {
        let input = "Smith, J. (2020). Title. https://doi.org/10.1234/abc";
        for policy in [DoiDisplayPolicy::Hyperlink, DoiDisplayPolicy::Remove] {
            let once = format_reference(input, policy);
            assert_eq!(format_reference(&once, policy), once);
        }
    }

    #[test]
    fn test_format_references_preserves_order() {
        let refs = ReferenceList::from_entries(
            [
                "Alpha, A. (2019). First entry long enough.",
                "Bravo, B. (2020). Second entry long enough.",
            ],
            30,
        );
        let formatted = format_references(&refs, DoiDisplayPolicy::Hyperlink);
        assert_eq!(formatted.len(), 2);
        assert!(formatted[0].starts_with("Alpha, A. **(2019)**"));
        assert!(formatted[1].starts_with("Bravo, B. **(2020)**"));
    }

    #[test]
    fn test_clean_doi() {
        assert_eq!(clean_doi("10.1234/abc."), "10.1234/abc");
        assert_eq!(clean_doi("10.1234/abc)."), "10.1234/abc");
        assert_eq!(clean_doi("10.1234/a(b)"), "10.1234/a(b)");
    }
}
