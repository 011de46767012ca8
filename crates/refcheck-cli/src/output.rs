use std::io::Write;

use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// The count in a summary line such as `- Self-Citations: 2 item(s)`.
fn summary_count(line: &str) -> Option<usize> {
    let rest = line
        .strip_suffix(" item(s)")
        .or_else(|| line.strip_suffix(" issue(s)"))?;
    rest.rsplit(' ').next()?.parse().ok()
}

fn is_rule(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '=' || c == '-')
}

/// Print a plain-text report, highlighting headings, errors and non-zero
/// counts when color is on.
pub fn print_text_report(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if !color.enabled() {
        return w.write_all(text.as_bytes());
    }

    let mut lines = text.lines().enumerate().peekable();
    while let Some((i, line)) = lines.next() {
        let underlined = lines.peek().is_some_and(|(_, next)| is_rule(next));
        let trimmed = line.trim_start();
        if i == 0 {
            writeln!(w, "{}", line.bold())?;
        } else if is_rule(line) {
            writeln!(w, "{}", line.dimmed())?;
        } else if underlined {
            writeln!(w, "{}", line.bold().cyan())?;
        } else if trimmed.starts_with("Error:") {
            writeln!(w, "{}", line.bold().red())?;
        } else if trimmed.starts_with("No issues found") || trimmed.starts_with("No layout issues") {
            writeln!(w, "{}", line.green())?;
        } else if summary_count(line).is_some_and(|n| n > 0) {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    Ok(())
}

/// Print corrected reference entries as a numbered list.
pub fn print_corrected(
    w: &mut dyn Write,
    source: &str,
    corrected: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!("Corrected references for {} ({})", source, corrected.len());
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    writeln!(w)?;
    for (i, entry) in corrected.iter().enumerate() {
        let num = format!("{}.", i + 1);
        if color.enabled() {
            writeln!(w, "{} {}", num.dimmed(), entry)?;
        } else {
            writeln!(w, "{} {}", num, entry)?;
        }
    }
    Ok(())
}

/// Print a blocking error such as a missing references section.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".bold().red(), message)
    } else {
        writeln!(w, "Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_parsed_from_summary_lines() {
        assert_eq!(summary_count("  - Self-Citations: 2 item(s)"), Some(2));
        assert_eq!(summary_count("  - Contains DOI: 0 issue(s)"), Some(0));
        assert_eq!(summary_count("  - Total References: 12"), None);
    }

    #[test]
    fn plain_mode_writes_text_unchanged() {
        let mut buf = Vec::new();
        let text = "Title\n=====\n  - A: 1 item(s)\n";
        print_text_report(&mut buf, text, ColorMode(false)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), text);
    }

    #[test]
    fn colored_mode_keeps_content() {
        let mut buf = Vec::new();
        print_text_report(&mut buf, "Title\n=====\nSummary\n-------\n", ColorMode(true)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Summary"));
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn corrected_list_is_numbered() {
        let mut buf = Vec::new();
        let entries = vec!["A **(2020)**.".to_string(), "B **(2021)**.".to_string()];
        print_corrected(&mut buf, "paper.pdf", &entries, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "Corrected references for paper.pdf (2)\n\n1. A **(2020)**.\n2. B **(2021)**.\n"
        );
    }
}
