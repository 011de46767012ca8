use serde::Serialize;

use refcheck_core::config_file::LayoutSection;
use refcheck_core::ParagraphInfo;

pub mod paragraphs;
pub mod text;

pub use paragraphs::{check_bullet_points, check_font, check_paragraph_format, check_subheadings};
pub use text::{check_headings, check_tables_figures, REQUIRED_HEADINGS};

/// Expected manuscript formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub font_name: String,
    pub font_size_pt: f32,
    pub first_line_indent_in: f32,
    /// Allowed deviation for every indent check, in inches.
    pub indent_tolerance_in: f32,
    pub bullet_font_size_pt: f32,
    pub bullet_indent_in: f32,
    pub subheading_spacing_before_pt: f32,
    pub subsubheading_spacing_before_pt: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_name: "Palatino Linotype".to_string(),
            font_size_pt: 12.0,
            first_line_indent_in: 0.2,
            indent_tolerance_in: 0.05,
            bullet_font_size_pt: 10.0,
            bullet_indent_in: 0.19,
            subheading_spacing_before_pt: 10.0,
            subsubheading_spacing_before_pt: 5.0,
        }
    }
}

impl LayoutConfig {
    /// Defaults overridden by whatever the `[layout]` config section sets.
    pub fn from_section(section: &LayoutSection) -> Self {
        let d = Self::default();
        Self {
            font_name: section.font_name.clone().unwrap_or(d.font_name),
            font_size_pt: section.font_size_pt.unwrap_or(d.font_size_pt),
            first_line_indent_in: section.first_line_indent_in.unwrap_or(d.first_line_indent_in),
            indent_tolerance_in: section.indent_tolerance_in.unwrap_or(d.indent_tolerance_in),
            bullet_font_size_pt: section.bullet_font_size_pt.unwrap_or(d.bullet_font_size_pt),
            bullet_indent_in: section.bullet_indent_in.unwrap_or(d.bullet_indent_in),
            ..d
        }
    }
}

/// All layout findings for one document, grouped by check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    #[serde(rename = "Missing Headings")]
    pub headings: Vec<String>,
    #[serde(rename = "Table/Figure References")]
    pub tables_figures: Vec<String>,
    #[serde(rename = "Font Issues")]
    pub font: Vec<String>,
    #[serde(rename = "Paragraph Format Issues")]
    pub paragraph_format: Vec<String>,
    #[serde(rename = "Subheading Issues")]
    pub subheadings: Vec<String>,
    #[serde(rename = "Bullet Point Issues")]
    pub bullet_points: Vec<String>,
}

impl LayoutReport {
    /// Each check's display name with its findings, in report order.
    pub fn sections(&self) -> [(&'static str, &[String]); 6] {
        [
            ("Missing Headings", self.headings.as_slice()),
            ("Table/Figure References", self.tables_figures.as_slice()),
            ("Font Issues", self.font.as_slice()),
            ("Paragraph Format Issues", self.paragraph_format.as_slice()),
            ("Subheading Issues", self.subheadings.as_slice()),
            ("Bullet Point Issues", self.bullet_points.as_slice()),
        ]
    }

    pub fn total_issues(&self) -> usize {
        self.sections().iter().map(|(_, issues)| issues.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_issues() == 0
    }
}

/// Run every layout check.
///
/// `paragraphs` is `None` for formats without paragraph structure (plain
/// text, PDF); only the text checks run then.
pub fn check_document(
    text: &str,
    paragraphs: Option<&[ParagraphInfo]>,
    config: &LayoutConfig,
) -> LayoutReport {
    let mut report = LayoutReport {
        headings: check_headings(text),
        tables_figures: check_tables_figures(text),
        ..Default::default()
    };
    if let Some(paragraphs) = paragraphs {
        report.font = check_font(paragraphs, config);
        report.paragraph_format = check_paragraph_format(paragraphs, config);
        report.subheadings = check_subheadings(paragraphs, config);
        report.bullet_points = check_bullet_points(paragraphs, config);
    } else {
        tracing::debug!("no paragraph structure available, running text checks only");
    }
    tracing::debug!(issues = report.total_issues(), "layout checks complete");
    report
}
