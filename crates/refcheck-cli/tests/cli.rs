use std::path::Path;
use std::process::{Command, Output};

const MANUSCRIPT: &str = "ABSTRACT\nWe build on [1] and [2].\n\
References\n\
Hernandez, A. (2020). Graph methods for citation analysis. doi:10.1234/graph\n\
Smith, J. (2019). A survey of reference management tools.\n\
Lee, K. (2021). An entry that nobody cites in the body text.\n";

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_refcheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("REFCHECK_AUTHOR")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn check_prints_text_summary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper.txt"), MANUSCRIPT).unwrap();

    let out = run(dir.path(), &["check", "paper.txt", "--no-color", "--author", "Hernandez"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Reference Analysis Report\n"));
    assert!(stdout.contains("  - Total References: 3\n"));
    assert!(stdout.contains("  - Self-Citations: 1 item(s)\n"));
    assert!(stdout.contains("Never cited in the text: 3"));
}

#[test]
fn check_writes_json_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper.txt"), MANUSCRIPT).unwrap();

    let out = run(dir.path(), &["check", "paper.txt", "-o", "report.json"]);
    assert!(out.status.success());
    let json = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
    assert!(json.contains("\"Missing In-Text Citations\": [\n    3\n  ]"));
    assert!(json.contains("\"Corrected References\""));
}

#[test]
fn missing_references_section_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("draft.txt"), "Just a body citing [1].\n").unwrap();

    let out = run(dir.path(), &["check", "draft.txt", "--format", "json"]);
    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("\"error\""));

    let out = run(dir.path(), &["format", "draft.txt", "--no-color"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn format_prints_corrected_entries() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper.txt"), MANUSCRIPT).unwrap();

    let out = run(dir.path(), &["format", "paper.txt", "--no-color"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("1. Hernandez, A. **(2020)**."));
    assert!(stdout.contains("[doi:10.1234/graph](https://doi.org/10.1234/graph)"));
    assert!(stdout.contains("2. Smith, J. **(2019)**."));
}

#[test]
fn layout_on_plain_text_reports_headings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper.txt"), MANUSCRIPT).unwrap();

    let out = run(dir.path(), &["layout", "paper.txt", "--format", "markdown"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("# Layout Check Report\n"));
    assert!(stdout.contains("- Missing heading: INTRODUCTION\n"));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["check", "nope.pdf"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn config_prints_explicit_file_as_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("custom.toml"),
        "[parsing]\nsegmentation = \"markers\"\n",
    )
    .unwrap();

    let out = run(dir.path(), &["--config", "custom.toml", "config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("[parsing]\n"));
    assert!(stdout.contains("segmentation = \"markers\"\n"));
}

#[test]
fn config_with_misspelled_segmentation_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("custom.toml"),
        "[parsing]\nsegmentation = \"marker\"\n",
    )
    .unwrap();

    let out = run(dir.path(), &["--config", "custom.toml", "config"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to parse config"));
}
