//! Format-independent structure shared by the Markdown and text renderers.

use refcheck_core::{AnalysisReport, Reference};
use refcheck_layout::LayoutReport;

use crate::types::ReportDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    /// Level 2 is a report section, level 3 a subsection.
    Heading(u8, String),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    Paragraph(String),
    Error(String),
}

fn entry(r: &Reference) -> String {
    format!("[{}] {}", r.index, r.raw_text)
}

fn entries(refs: &[Reference]) -> Vec<String> {
    refs.iter().map(entry).collect()
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per report field: scalars as `key: value`, lists as
/// `key: N item(s)`, nested maps as one `sub: N issue(s)` line per entry.
pub(crate) fn summary_lines(report: &AnalysisReport) -> Vec<String> {
    let items = |key: &str, n: usize| format!("{key}: {n} item(s)");
    let issues = |key: &str, n: usize| format!("{key}: {n} issue(s)");

    let mut lines = vec![
        format!("Total References: {}", report.total_references),
        items("Duplicate References", report.duplicates.len()),
        items("Self-Citations", report.self_citations.len()),
        items("Qubahan Citations", report.journal_citations.len()),
        items("Excess Qubahan Citations", report.excess_journal_citations.len()),
        issues("Missing Bold Year", report.apa_violations.missing_bold_year.len()),
        issues("Contains DOI", report.apa_violations.contains_doi.len()),
    ];
    lines.extend(
        report
            .highly_cited_authors
            .iter()
            .map(|(author, texts)| issues(author, texts.len())),
    );
    lines.push(items(
        "Missing In-Text Citations",
        report.missing_in_text_citations.len(),
    ));
    lines.push(items("Extracted References", report.references.len()));
    lines
}

fn analysis_details(report: &AnalysisReport, out: &mut Vec<Block>) {
    if !report.duplicates.is_empty() {
        out.push(Block::Heading(2, "Duplicate References".into()));
        out.push(Block::Bullets(
            report
                .duplicates
                .iter()
                .map(|d| format!("{} (entries {})", d.text, join_indices(&d.indices)))
                .collect(),
        ));
    }
    if !report.self_citations.is_empty() {
        out.push(Block::Heading(2, "Self-Citations".into()));
        out.push(Block::Bullets(entries(&report.self_citations)));
    }
    if !report.excess_journal_citations.is_empty() {
        out.push(Block::Heading(2, "Excess Qubahan Citations".into()));
        out.push(Block::Paragraph(format!(
            "{} of {} journal citations exceed the allowance.",
            report.excess_journal_citations.len(),
            report.journal_citations.len()
        )));
        out.push(Block::Bullets(entries(&report.excess_journal_citations)));
    }

    let apa = &report.apa_violations;
    if !apa.is_empty() {
        out.push(Block::Heading(2, "APA Style Violations".into()));
        for (name, refs) in [
            ("Missing Bold Year", &apa.missing_bold_year),
            ("Contains DOI", &apa.contains_doi),
        ] {
            if !refs.is_empty() {
                out.push(Block::Heading(3, name.into()));
                out.push(Block::Bullets(entries(refs)));
            }
        }
    }

    if !report.highly_cited_authors.is_empty() {
        out.push(Block::Heading(2, "Highly Cited Authors (≥4)".into()));
        for (author, texts) in &report.highly_cited_authors {
            out.push(Block::Heading(3, format!("{author} ({} references)", texts.len())));
            out.push(Block::Bullets(texts.clone()));
        }
    }

    if !report.missing_in_text_citations.is_empty() {
        out.push(Block::Heading(2, "Missing In-Text Citations".into()));
        out.push(Block::Paragraph(format!(
            "Never cited in the text: {}",
            join_indices(&report.missing_in_text_citations)
        )));
    }
}

pub(crate) fn layout_blocks(layout: &LayoutReport, out: &mut Vec<Block>) {
    out.push(Block::Heading(2, "Layout Issues".into()));
    if layout.is_empty() {
        out.push(Block::Paragraph("No layout issues found.".into()));
        return;
    }
    for (name, issues) in layout.sections() {
        if !issues.is_empty() {
            out.push(Block::Heading(3, name.into()));
            out.push(Block::Bullets(issues.to_vec()));
        }
    }
}

/// Lay out a document as a sequence of blocks.
pub(crate) fn outline(doc: &ReportDocument<'_>) -> Vec<Block> {
    let mut out = Vec::new();
    match doc.outcome {
        Err(e) => out.push(Block::Error(e.to_string())),
        Ok(report) => {
            out.push(Block::Heading(2, "Summary".into()));
            out.push(Block::Bullets(summary_lines(report)));
            if !doc.has_issues() {
                out.push(Block::Paragraph("No issues found.".into()));
            }
            analysis_details(report, &mut out);
        }
    }
    if !doc.corrected.is_empty() {
        out.push(Block::Heading(2, "Corrected References".into()));
        out.push(Block::Numbered(doc.corrected.to_vec()));
    }
    if let Some(layout) = doc.layout {
        layout_blocks(layout, &mut out);
    }
    out
}
