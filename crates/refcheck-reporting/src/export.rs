use std::io::Write;
use std::path::{Path, PathBuf};

use refcheck_core::AnalysisReport;
use refcheck_layout::LayoutReport;
use serde::Serialize;
use thiserror::Error;

use crate::outline::{self, Block};
use crate::types::{ExportFormat, ReportDocument};

const TITLE: &str = "Reference Analysis Report";
const LAYOUT_TITLE: &str = "Layout Check Report";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns a report document into a string in one output format.
pub trait ReportRenderer {
    fn render(&self, doc: &ReportDocument<'_>) -> Result<String, ReportError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(rename = "Corrected References", skip_serializing_if = "<[String]>::is_empty")]
    corrected: &'a [String],
    #[serde(rename = "Layout Issues", skip_serializing_if = "Option::is_none")]
    layout: Option<&'a LayoutReport>,
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, doc: &ReportDocument<'_>) -> Result<String, ReportError> {
        let value = match doc.outcome {
            Ok(report) => serde_json::to_value(JsonReport {
                source: doc.source,
                report,
                corrected: doc.corrected,
                layout: doc.layout,
            })?,
            Err(e) => {
                let mut value = serde_json::json!({
                    "Source": doc.source,
                    "error": e.to_string(),
                });
                if let Some(layout) = doc.layout {
                    value["Layout Issues"] = serde_json::to_value(layout)?;
                }
                value
            }
        };
        let mut out = serde_json::to_string_pretty(&value)?;
        out.push('\n');
        Ok(out)
    }
}

fn md_escape(s: &str) -> String {
    s.replace('*', "\\*").replace('_', "\\_")
}

fn write_markdown(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading(level, text) => {
                let hashes = "#".repeat(usize::from(*level));
                out.push_str(&format!("{hashes} {text}\n\n"));
            }
            Block::Bullets(items) => {
                for item in items {
                    out.push_str(&format!("- {}\n", md_escape(item)));
                }
                out.push('\n');
            }
            // Corrected entries keep their bold years and DOI links.
            Block::Numbered(items) => {
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&format!("{}. {item}\n", i + 1));
                }
                out.push('\n');
            }
            Block::Paragraph(text) => out.push_str(&format!("{text}\n\n")),
            Block::Error(msg) => out.push_str(&format!("> **Error:** {msg}\n\n")),
        }
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, doc: &ReportDocument<'_>) -> Result<String, ReportError> {
        let mut out = format!("# {TITLE}\n\n**Source:** `{}`\n\n", doc.source);
        write_markdown(&mut out, &outline::outline(doc));
        Ok(out)
    }
}

fn write_text(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading(2, text) => {
                out.push_str(&format!("\n{text}\n"));
                out.push_str(&"-".repeat(text.chars().count()));
                out.push('\n');
            }
            Block::Heading(_, text) => out.push_str(&format!("\n  {text}:\n")),
            Block::Bullets(items) => {
                for item in items {
                    out.push_str(&format!("  - {item}\n"));
                }
            }
            Block::Numbered(items) => {
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&format!("  {}. {item}\n", i + 1));
                }
            }
            Block::Paragraph(text) => out.push_str(&format!("  {text}\n")),
            Block::Error(msg) => out.push_str(&format!("\nError: {msg}\n")),
        }
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, doc: &ReportDocument<'_>) -> Result<String, ReportError> {
        let mut out = format!("{TITLE}\n");
        out.push_str(&"=".repeat(60));
        out.push_str(&format!("\nSource: {}\n", doc.source));
        write_text(&mut out, &outline::outline(doc));
        Ok(out)
    }
}

/// Render a document in the given format.
pub fn render(doc: &ReportDocument<'_>, format: ExportFormat) -> Result<String, ReportError> {
    match format {
        ExportFormat::Json => JsonRenderer.render(doc),
        ExportFormat::Markdown => MarkdownRenderer.render(doc),
        ExportFormat::Text => TextRenderer.render(doc),
    }
}

/// Render a standalone layout check, without any reference analysis.
pub fn render_layout(
    source: &str,
    layout: &LayoutReport,
    format: ExportFormat,
) -> Result<String, ReportError> {
    let mut blocks = Vec::new();
    outline::layout_blocks(layout, &mut blocks);
    let out = match format {
        ExportFormat::Json => {
            let mut s = serde_json::to_string_pretty(&serde_json::json!({
                "Source": source,
                "Layout Issues": layout,
            }))?;
            s.push('\n');
            s
        }
        ExportFormat::Markdown => {
            let mut s = format!("# {LAYOUT_TITLE}\n\n**Source:** `{source}`\n\n");
            write_markdown(&mut s, &blocks);
            s
        }
        ExportFormat::Text => {
            let mut s = format!("{LAYOUT_TITLE}\n");
            s.push_str(&"=".repeat(60));
            s.push_str(&format!("\nSource: {source}\n"));
            write_text(&mut s, &blocks);
            s
        }
    };
    Ok(out)
}

/// Render a document and write it to `path`.
pub fn export_report(
    doc: &ReportDocument<'_>,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render(doc, format)?;
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    tracing::info!(path = %path.display(), %format, "report written");
    Ok(())
}
