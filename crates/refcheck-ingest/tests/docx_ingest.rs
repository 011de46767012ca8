use std::io::Write;
use std::path::{Path, PathBuf};

use refcheck_core::Alignment;
use refcheck_ingest::{ingest, BackendError, DocumentKind, DocxBackend, IngestError, TextExtractor};
use zip::write::SimpleFileOptions;

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:jc w:val="both"/><w:ind w:firstLine="288"/></w:pPr>
      <w:r><w:rPr><w:rFonts w:ascii="Palatino Linotype"/><w:sz w:val="24"/></w:rPr><w:t>As shown in [1], results hold.</w:t></w:r>
    </w:p>
    <w:p><w:r><w:t>References</w:t></w:r></w:p>
    <w:p>
      <w:pPr><w:pStyle w:val="ListParagraph"/><w:ind w:left="274"/></w:pPr>
      <w:r><w:rPr><w:sz w:val="20"/></w:rPr><w:t xml:space="preserve">[1] Smith, J. </w:t></w:r>
      <w:r><w:t>(2020). A long enough reference title.</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>
</w:styles>"#;

fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (entry, content) in entries {
        zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

#[test]
fn docx_text_and_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(
        dir.path(),
        "manuscript.docx",
        &[
            ("word/document.xml", DOCUMENT_XML),
            ("word/styles.xml", STYLES_XML),
        ],
    );

    let doc = ingest(&path).unwrap();
    assert_eq!(doc.kind, DocumentKind::Docx);
    assert_eq!(
        doc.text,
        "As shown in [1], results hold.\nReferences\n[1] Smith, J. (2020). A long enough reference title.\n"
    );

    let paragraphs = doc.paragraphs.unwrap();
    assert_eq!(paragraphs.len(), 3);

    let body = &paragraphs[0];
    assert_eq!(body.alignment, Some(Alignment::Justify));
    assert_eq!(body.first_line_indent_in, Some(0.2));
    assert_eq!(body.font_name.as_deref(), Some("Palatino Linotype"));
    assert_eq!(body.font_size_pt, Some(12.0));

    let item = &paragraphs[2];
    assert_eq!(item.style_name, "List Paragraph");
    assert_eq!(item.font_size_pt, Some(10.0));
    assert!(item.alignment.is_none());
}

#[test]
fn docx_without_styles_keeps_style_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(dir.path(), "bare.docx", &[("word/document.xml", DOCUMENT_XML)]);
    let paragraphs = ingest(&path).unwrap().paragraphs.unwrap();
    assert_eq!(paragraphs[2].style_name, "ListParagraph");
}

#[test]
fn container_without_document_part_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zip(dir.path(), "empty.docx", &[("docProps/app.xml", "<Properties/>")]);
    let err = DocxBackend::new().extract_text(&path).unwrap_err();
    assert!(matches!(err, BackendError::ExtractionError(_)));
}

#[test]
fn non_zip_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, "plain text pretending to be a docx").unwrap();
    let err = ingest(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Backend(BackendError::OpenError(_))
    ));
}

#[test]
fn plain_text_has_no_paragraph_structure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.txt");
    std::fs::write(&path, "Body [1]\nReferences\n").unwrap();
    let doc = ingest(&path).unwrap();
    assert_eq!(doc.kind, DocumentKind::PlainText);
    assert!(doc.paragraphs.is_none());
    assert_eq!(doc.text, "Body [1]\nReferences\n");
}
