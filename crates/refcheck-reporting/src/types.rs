use std::fmt;
use std::path::Path;
use std::str::FromStr;

use refcheck_core::{AnalysisError, AnalysisReport};
use refcheck_layout::LayoutReport;

/// Everything one report shows about one manuscript.
#[derive(Debug, Clone, Copy)]
pub struct ReportDocument<'a> {
    /// File name or path shown in the report header.
    pub source: &'a str,
    pub outcome: Result<&'a AnalysisReport, &'a AnalysisError>,
    /// Formatted reference entries, in list order.
    pub corrected: &'a [String],
    pub layout: Option<&'a LayoutReport>,
}

impl<'a> ReportDocument<'a> {
    pub fn new(source: &'a str, outcome: Result<&'a AnalysisReport, &'a AnalysisError>) -> Self {
        Self {
            source,
            outcome,
            corrected: &[],
            layout: None,
        }
    }

    pub fn with_corrected(mut self, corrected: &'a [String]) -> Self {
        self.corrected = corrected;
        self
    }

    pub fn with_layout(mut self, layout: &'a LayoutReport) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Whether the analysis failed or any check reported something.
    pub fn has_issues(&self) -> bool {
        let analysis = match self.outcome {
            Ok(report) => report.has_issues(),
            Err(_) => true,
        };
        analysis || self.layout.is_some_and(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Json,
    Markdown,
    #[default]
    Text,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Json, ExportFormat::Markdown, ExportFormat::Text]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// Pick a format from an output path's extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Markdown),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Text => "text",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" | "plain" => Ok(Self::Text),
            other => Err(format!(
                "unknown format '{other}' (expected json, markdown or text)"
            )),
        }
    }
}
