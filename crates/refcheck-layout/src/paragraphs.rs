//! Checks over the paragraph formatting of a structured document.

use once_cell::sync::Lazy;
use regex::Regex;

use refcheck_core::{Alignment, ParagraphInfo};

use crate::LayoutConfig;

const PREVIEW_CHARS: usize = 50;
const PT_EPSILON: f32 = 0.01;

/// First 50 characters of a paragraph, for issue messages.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

fn is_justified(p: &ParagraphInfo) -> bool {
    p.alignment == Some(Alignment::Justify)
}

fn within(value: Option<f32>, expected: f32, tolerance: f32) -> bool {
    value.is_some_and(|v| (v - expected).abs() <= tolerance)
}

/// Font family and size of every non-empty paragraph.
///
/// A paragraph passes the family check when its first run's font name
/// contains the first word of the configured family (`palatino` for
/// `Palatino Linotype`). A paragraph with no explicit font is flagged.
pub fn check_font(paragraphs: &[ParagraphInfo], config: &LayoutConfig) -> Vec<String> {
    let family = config
        .font_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let mut issues = Vec::new();
    for p in paragraphs.iter().filter(|p| !p.text.trim().is_empty()) {
        let text = preview(p.text.trim());
        let family_ok = p
            .font_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&family));
        if !family_ok {
            issues.push(format!("Font not {} in: '{text}'", config.font_name));
        }
        if let Some(size) = p
            .font_size_pt
            .filter(|size| (size - config.font_size_pt).abs() > PT_EPSILON)
        {
            issues.push(format!(
                "Font size is {size} pt instead of {} pt: '{text}'",
                config.font_size_pt
            ));
        }
    }
    issues
}

/// Body paragraphs must be justified and carry the first-line indent.
pub fn check_paragraph_format(paragraphs: &[ParagraphInfo], config: &LayoutConfig) -> Vec<String> {
    let mut issues = Vec::new();
    for p in paragraphs.iter().filter(|p| !p.text.trim().is_empty()) {
        let text = preview(p.text.trim());
        if !is_justified(p) {
            issues.push(format!("Paragraph not justified: '{text}'"));
        }
        if !within(
            p.first_line_indent_in,
            config.first_line_indent_in,
            config.indent_tolerance_in,
        ) {
            issues.push(format!(
                "Paragraph missing first-line indent (should be {}\"): '{text}'",
                config.first_line_indent_in
            ));
        }
    }
    issues
}

/// Numbered headings must be italic and spaced from the preceding text.
///
/// `1. METHOD` style subheadings need at least
/// [`LayoutConfig::subheading_spacing_before_pt`]; `1.1 Sampling` style
/// sub-subheadings need [`LayoutConfig::subsubheading_spacing_before_pt`].
pub fn check_subheadings(paragraphs: &[ParagraphInfo], config: &LayoutConfig) -> Vec<String> {
    static SUBHEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+[A-Z ]+$").unwrap());
    static SUBSUBHEADING_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\d+\.\d+\s+[A-Z][a-z]+").unwrap());

    let mut issues = Vec::new();
    for p in paragraphs {
        let text = p.text.trim();
        let (label, min_before) = if SUBHEADING_RE.is_match(text) {
            ("Subheading", config.subheading_spacing_before_pt)
        } else if SUBSUBHEADING_RE.is_match(text) {
            ("Sub-subheading", config.subsubheading_spacing_before_pt)
        } else {
            continue;
        };
        if !p.italic {
            issues.push(format!("{label} not italic: '{text}'"));
        }
        if p.spacing_before_pt < min_before {
            issues.push(format!(
                "{label} spacing before is {} pt, expected at least {min_before} pt: '{text}'",
                p.spacing_before_pt
            ));
        }
    }
    issues
}

/// Paragraphs with a `List…` style: bullet font size, left indent and justification.
pub fn check_bullet_points(paragraphs: &[ParagraphInfo], config: &LayoutConfig) -> Vec<String> {
    let mut issues = Vec::new();
    for p in paragraphs
        .iter()
        .filter(|p| p.style_name.to_lowercase().starts_with("list"))
    {
        let text = preview(p.text.trim());
        if !within(p.font_size_pt, config.bullet_font_size_pt, PT_EPSILON) {
            issues.push(format!(
                "Bullet point font size not {} pt: '{text}'",
                config.bullet_font_size_pt
            ));
        }
        if !within(p.left_indent_in, config.bullet_indent_in, config.indent_tolerance_in) {
            issues.push(format!(
                "Bullet indent not {} inch: '{text}'",
                config.bullet_indent_in
            ));
        }
        if !is_justified(p) {
            issues.push(format!("Bullet point not justified: '{text}'"));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> ParagraphInfo {
        ParagraphInfo {
            text: text.to_string(),
            style_name: "Normal".to_string(),
            font_name: Some("Palatino Linotype".to_string()),
            font_size_pt: Some(12.0),
            alignment: Some(Alignment::Justify),
            first_line_indent_in: Some(0.2),
            ..Default::default()
        }
    }

    #[test]
    fn test_preview_is_char_safe() {
        let long = "é".repeat(60);
        assert_eq!(preview(&long).chars().count(), 50);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_conforming_paragraph_has_no_issues() {
        let config = LayoutConfig::default();
        let paragraphs = vec![body("A well formatted body paragraph.")];
        assert!(check_font(&paragraphs, &config).is_empty());
        assert!(check_paragraph_format(&paragraphs, &config).is_empty());
        assert!(check_subheadings(&paragraphs, &config).is_empty());
        assert!(check_bullet_points(&paragraphs, &config).is_empty());
    }

    #[test]
    fn test_font_family_and_size() {
        let config = LayoutConfig::default();
        let mut wrong = body("Wrong font here.");
        wrong.font_name = Some("Calibri".to_string());
        wrong.font_size_pt = Some(11.0);
        let mut unset = body("No explicit font.");
        unset.font_name = None;
        let issues = check_font(&[wrong, unset, body("   ")], &config);
        assert_eq!(
            issues,
            vec![
                "Font not Palatino Linotype in: 'Wrong font here.'",
                "Font size is 11 pt instead of 12 pt: 'Wrong font here.'",
                "Font not Palatino Linotype in: 'No explicit font.'",
            ]
        );
    }

    #[test]
    fn test_paragraph_alignment_and_indent() {
        let config = LayoutConfig::default();
        let mut left = body("Left aligned.");
        left.alignment = Some(Alignment::Left);
        let mut close = body("Indent within tolerance.");
        close.first_line_indent_in = Some(0.24);
        let mut none = body("No indent.");
        none.first_line_indent_in = None;
        let issues = check_paragraph_format(&[left, close, none], &config);
        assert_eq!(
            issues,
            vec![
                "Paragraph not justified: 'Left aligned.'",
                "Paragraph missing first-line indent (should be 0.2\"): 'No indent.'",
            ]
        );
    }

    #[test]
    fn test_subheadings() {
        let config = LayoutConfig::default();
        let mut heading = body("2. LITERATURE REVIEW");
        heading.spacing_before_pt = 12.0;
        heading.italic = true;
        let mut plain = body("2.1 Prior work");
        plain.spacing_before_pt = 3.0;
        let issues = check_subheadings(&[heading, plain, body("3. Not a heading: prose.")], &config);
        assert_eq!(
            issues,
            vec![
                "Sub-subheading not italic: '2.1 Prior work'",
                "Sub-subheading spacing before is 3 pt, expected at least 5 pt: '2.1 Prior work'",
            ]
        );
    }

    #[test]
    fn test_bullets() {
        let config = LayoutConfig::default();
        let mut good = body("A bullet.");
        good.style_name = "List Paragraph".to_string();
        good.font_size_pt = Some(10.0);
        good.left_indent_in = Some(0.19);
        let mut bad = body("Another bullet.");
        bad.style_name = "List Bullet".to_string();
        bad.left_indent_in = Some(0.5);
        bad.alignment = None;
        let issues = check_bullet_points(&[good, bad, body("Not a list.")], &config);
        assert_eq!(
            issues,
            vec![
                "Bullet point font size not 10 pt: 'Another bullet.'",
                "Bullet indent not 0.19 inch: 'Another bullet.'",
                "Bullet point not justified: 'Another bullet.'",
            ]
        );
    }
}
