//! Reader for Office Open XML word-processing documents (`.docx`).
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p>
//!       <w:pPr><w:pStyle w:val="ListParagraph"/><w:jc w:val="both"/></w:pPr>
//!       <w:r><w:rPr><w:b/><w:sz w:val="24"/></w:rPr><w:t>Hello</w:t></w:r>
//!     </w:p>
//!   </w:body>
//! </w:document>
//! ```
//! Only directly applied formatting is reported. Values inherited from
//! styles or document defaults show up as `None`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use refcheck_core::{Alignment, BackendError, DocumentStructureInspector, ParagraphInfo, TextExtractor};

const TWIPS_PER_INCH: f32 = 1440.0;
/// `w:spacing` before/after and exact line heights are in twentieths of a point.
const TWENTIETHS_PER_POINT: f32 = 20.0;
/// `w:spacing w:line` with `lineRule="auto"` is in 240ths of a line.
const AUTO_LINE_UNIT: f32 = 240.0;

/// DOCX backend providing both plain text and paragraph formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxBackend;

impl DocxBackend {
    pub fn new() -> Self {
        Self
    }

    /// Read every paragraph of the document body, in document order.
    pub fn read_paragraphs(&self, path: &Path) -> Result<Vec<ParagraphInfo>, BackendError> {
        let file = File::open(path)
            .map_err(|e| BackendError::OpenError(format!("{}: {e}", path.display())))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| BackendError::OpenError(format!("not a DOCX container: {e}")))?;

        let document = read_entry(&mut archive, "word/document.xml")?.ok_or_else(|| {
            BackendError::ExtractionError("word/document.xml missing from container".into())
        })?;
        let style_names = match read_entry(&mut archive, "word/styles.xml")? {
            Some(xml) => parse_style_names(&xml)?,
            None => HashMap::new(),
        };

        let paragraphs = parse_document(&document, &style_names)?;
        tracing::debug!(path = %path.display(), paragraphs = paragraphs.len(), "docx parsed");
        Ok(paragraphs)
    }
}

/// Join paragraph texts, one paragraph per line.
pub fn paragraphs_to_text(paragraphs: &[ParagraphInfo]) -> String {
    let mut text = String::new();
    for p in paragraphs {
        text.push_str(&p.text);
        text.push('\n');
    }
    text
}

impl TextExtractor for DocxBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        Ok(paragraphs_to_text(&self.read_paragraphs(path)?))
    }
}

impl DocumentStructureInspector for DocxBackend {
    fn paragraphs(&self, path: &Path) -> Result<Vec<ParagraphInfo>, BackendError> {
        self.read_paragraphs(path)
    }
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, BackendError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(BackendError::ExtractionError(format!("{name}: {e}"))),
    };
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn xml_error(e: quick_xml::Error) -> BackendError {
    BackendError::ExtractionError(format!("malformed document XML: {e}"))
}

/// Value of attribute `key` (qualified name, e.g. `w:val`).
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn attr_f32(e: &BytesStart<'_>, key: &[u8]) -> Option<f32> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// Toggle properties such as `<w:b/>` are on unless `w:val` says otherwise.
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(
        attr(e, b"w:val").as_deref(),
        Some("0" | "false" | "off" | "none")
    )
}

fn alignment(value: &str) -> Option<Alignment> {
    match value {
        "left" | "start" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        "both" | "distribute" => Some(Alignment::Justify),
        _ => None,
    }
}

/// Map style ids (`ListParagraph`) to display names (`List Paragraph`).
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, BackendError> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) if e.name().as_ref() == b"w:style" => {
                current_id = attr(e, b"w:styleId");
            }
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"w:name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr(e, b"w:val")) {
                    names.insert(id.clone(), name);
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"w:style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(names)
}

/// Per-paragraph parse state.
#[derive(Default)]
struct ParagraphState {
    info: ParagraphInfo,
    in_paragraph_props: bool,
    /// Inside the `w:rPr` of the paragraph's first run.
    in_first_run_props: bool,
    runs: usize,
    in_text: bool,
}

impl ParagraphState {
    fn apply_property(&mut self, e: &BytesStart<'_>, styles: &HashMap<String, String>) {
        let name = e.name();
        if self.in_paragraph_props {
            let info = &mut self.info;
            match name.as_ref() {
                b"w:pStyle" => {
                    if let Some(id) = attr(e, b"w:val") {
                        info.style_name = styles.get(&id).cloned().unwrap_or(id);
                    }
                }
                b"w:jc" => info.alignment = attr(e, b"w:val").as_deref().and_then(alignment),
                b"w:ind" => {
                    if let Some(first) = attr_f32(e, b"w:firstLine") {
                        info.first_line_indent_in = Some(first / TWIPS_PER_INCH);
                    } else if let Some(hanging) = attr_f32(e, b"w:hanging") {
                        info.first_line_indent_in = Some(-hanging / TWIPS_PER_INCH);
                    }
                    if let Some(left) = attr_f32(e, b"w:left").or_else(|| attr_f32(e, b"w:start")) {
                        info.left_indent_in = Some(left / TWIPS_PER_INCH);
                    }
                }
                b"w:spacing" => {
                    if let Some(before) = attr_f32(e, b"w:before") {
                        info.spacing_before_pt = before / TWENTIETHS_PER_POINT;
                    }
                    if let Some(after) = attr_f32(e, b"w:after") {
                        info.spacing_after_pt = after / TWENTIETHS_PER_POINT;
                    }
                    if let Some(line) = attr_f32(e, b"w:line") {
                        let auto = attr(e, b"w:lineRule").is_none_or(|rule| rule == "auto");
                        info.line_spacing = Some(if auto {
                            line / AUTO_LINE_UNIT
                        } else {
                            line / TWENTIETHS_PER_POINT
                        });
                    }
                }
                _ => {}
            }
        } else if self.in_first_run_props {
            let info = &mut self.info;
            match name.as_ref() {
                b"w:rFonts" => {
                    info.font_name = attr(e, b"w:ascii").or_else(|| attr(e, b"w:hAnsi"));
                }
                b"w:sz" => info.font_size_pt = attr_f32(e, b"w:val").map(|half| half / 2.0),
                b"w:b" => info.bold = toggle(e),
                b"w:i" => info.italic = toggle(e),
                _ => {}
            }
        } else {
            // Run content
            match name.as_ref() {
                b"w:tab" => self.info.text.push('\t'),
                b"w:br" | b"w:cr" => self.info.text.push('\n'),
                _ => {}
            }
        }
    }
}

/// Parse `word/document.xml` into paragraphs.
///
/// Paragraphs nested inside another (text boxes) are emitted before the
/// paragraph that contains them.
fn parse_document(
    xml: &str,
    styles: &HashMap<String, String>,
) -> Result<Vec<ParagraphInfo>, BackendError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<ParagraphState> = Vec::new();
    let mut paragraphs = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:p" => stack.push(ParagraphState::default()),
                b"w:pPr" => {
                    if let Some(p) = stack.last_mut() {
                        p.in_paragraph_props = true;
                    }
                }
                b"w:r" => {
                    if let Some(p) = stack.last_mut() {
                        p.runs += 1;
                    }
                }
                b"w:rPr" => {
                    if let Some(p) = stack.last_mut().filter(|p| !p.in_paragraph_props) {
                        p.in_first_run_props = p.runs == 1;
                    }
                }
                b"w:t" => {
                    if let Some(p) = stack.last_mut() {
                        p.in_text = true;
                    }
                }
                _ => {
                    if let Some(p) = stack.last_mut() {
                        p.apply_property(e, styles);
                    }
                }
            },
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"w:p" {
                    paragraphs.push(ParagraphInfo::default());
                } else if let Some(p) = stack.last_mut() {
                    p.apply_property(e, styles);
                }
            }
            Event::Text(ref t) => {
                if let Some(p) = stack.last_mut().filter(|p| p.in_text) {
                    p.info.text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(ref e) => {
                let Some(p) = stack.last_mut() else {
                    continue;
                };
                match e.name().as_ref() {
                    b"w:pPr" => p.in_paragraph_props = false,
                    b"w:rPr" => p.in_first_run_props = false,
                    b"w:t" => p.in_text = false,
                    b"w:p" => {
                        if let Some(done) = stack.pop() {
                            paragraphs.push(done.info);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        tracing::warn!(unclosed = stack.len(), "document ended inside a paragraph");
        paragraphs.extend(stack.into_iter().rev().map(|p| p.info));
    }
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<ParagraphInfo> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let styles = HashMap::from([("ListParagraph".to_string(), "List Paragraph".to_string())]);
        parse_document(&xml, &styles).unwrap()
    }

    #[test]
    fn test_plain_paragraphs() {
        let paragraphs = parse("<w:p><w:r><w:t>First</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Second</w:t></w:r></w:p>");
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "", "Second"]);
    }

    #[test]
    fn test_runs_concatenate_with_preserved_space() {
        let paragraphs = parse(
            r#"<w:p><w:r><w:t xml:space="preserve">Smith, J. </w:t></w:r><w:r><w:t>(2020)&amp;co</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs[0].text, "Smith, J. (2020)&co");
    }

    #[test]
    fn test_tab_and_break() {
        let paragraphs = parse("<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>");
        assert_eq!(paragraphs[0].text, "a\tb\nc");
    }

    #[test]
    fn test_tab_stops_are_not_text() {
        let paragraphs = parse(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs[0].text, "x");
    }

    #[test]
    fn test_paragraph_properties() {
        let paragraphs = parse(
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:spacing w:before="240" w:after="120" w:line="360" w:lineRule="auto"/><w:ind w:left="274" w:firstLine="288"/><w:jc w:val="both"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>Item</w:t></w:r></w:p>"#,
        );
        let p = &paragraphs[0];
        assert_eq!(p.style_name, "List Paragraph");
        assert_eq!(p.alignment, Some(Alignment::Justify));
        assert_eq!(p.spacing_before_pt, 12.0);
        assert_eq!(p.spacing_after_pt, 6.0);
        assert_eq!(p.line_spacing, Some(1.5));
        assert_eq!(p.first_line_indent_in, Some(0.2));
        assert!((p.left_indent_in.unwrap() - 0.19).abs() < 0.001);
        // Paragraph-mark run properties are not the first run's.
        assert!(!p.bold);
    }

    #[test]
    fn test_first_run_properties_only() {
        let paragraphs = parse(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Palatino Linotype" w:hAnsi="Palatino Linotype"/><w:i/><w:sz w:val="24"/></w:rPr><w:t>One</w:t></w:r><w:r><w:rPr><w:b/><w:sz w:val="40"/></w:rPr><w:t>Two</w:t></w:r></w:p>"#,
        );
        let p = &paragraphs[0];
        assert_eq!(p.font_name.as_deref(), Some("Palatino Linotype"));
        assert_eq!(p.font_size_pt, Some(12.0));
        assert!(p.italic);
        assert!(!p.bold);
        assert_eq!(p.text, "OneTwo");
    }

    #[test]
    fn test_toggle_off() {
        let paragraphs = parse(r#"<w:p><w:r><w:rPr><w:i w:val="0"/></w:rPr><w:t>x</w:t></w:r></w:p>"#);
        assert!(!paragraphs[0].italic);
    }

    #[test]
    fn test_hanging_indent_is_negative() {
        let paragraphs = parse(r#"<w:p><w:pPr><w:ind w:left="720" w:hanging="720"/></w:pPr></w:p>"#);
        assert_eq!(paragraphs[0].first_line_indent_in, Some(-0.5));
        assert_eq!(paragraphs[0].left_indent_in, Some(0.5));
    }

    #[test]
    fn test_unknown_style_keeps_id() {
        let paragraphs = parse(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:p>"#);
        assert_eq!(paragraphs[0].style_name, "Heading1");
    }

    #[test]
    fn test_deleted_text_ignored() {
        let paragraphs = parse(
            "<w:p><w:del><w:r><w:delText>gone</w:delText></w:r></w:del><w:r><w:t>kept</w:t></w:r></w:p>",
        );
        assert_eq!(paragraphs[0].text, "kept");
    }

    #[test]
    fn test_style_names() {
        let xml = r#"<w:styles><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style></w:styles>"#;
        let names = parse_style_names(xml).unwrap();
        assert_eq!(names["ListBullet"], "List Bullet");
    }

    #[test]
    fn test_paragraphs_to_text() {
        let paragraphs = parse("<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p><w:r><w:t>B</w:t></w:r></w:p>");
        assert_eq!(paragraphs_to_text(&paragraphs), "A\nB\n");
    }

    #[test]
    fn test_malformed_xml_is_extraction_error() {
        let err = parse_document("<w:p><w:r></w:p>", &HashMap::new()).unwrap_err();
        assert!(matches!(err, BackendError::ExtractionError(_)));
    }
}
