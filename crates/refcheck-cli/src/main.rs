use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use refcheck_core::config_file::{self, ConfigFile};
use refcheck_ingest::IngestedDocument;
use refcheck_layout::LayoutConfig;
use refcheck_reporting::{ExportFormat, ReportDocument};

mod output;

use output::ColorMode;

/// Exit status when the document has no references section.
const EXIT_NO_REFERENCES: u8 = 2;

/// Manuscript reference checker - duplicates, self-citations, APA style and missing citations
#[derive(Parser, Debug)]
#[command(name = "refcheck", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the .refcheck.toml / platform cascade
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format: text, json or markdown (default: from --output extension, else text)
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl OutputArgs {
    fn resolve_format(&self) -> ExportFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(ExportFormat::from_extension))
            .unwrap_or_default()
    }

    fn color(&self) -> ColorMode {
        ColorMode(!self.no_color && self.output.is_none())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the references of a PDF, DOCX or text manuscript
    Check {
        /// Path to the manuscript
        file_path: PathBuf,

        /// Author name for self-citation detection (default: $REFCHECK_AUTHOR)
        #[arg(long)]
        author: Option<String>,

        /// Also run the layout checks
        #[arg(long)]
        layout: bool,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Print the APA-corrected reference list
    Format {
        /// Path to the manuscript
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Check headings, captions and paragraph formatting
    Layout {
        /// Path to the manuscript
        file_path: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to the platform config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => config_file::read_config(path)?,
        None => config_file::load_config(),
    };

    match cli.command {
        Command::Check {
            file_path,
            author,
            layout,
            out,
        } => check(&file_path, author, layout, &out, &config),
        Command::Format {
            file_path,
            no_color,
        } => format(&file_path, ColorMode(!no_color), &config),
        Command::Layout { file_path, out } => layout(&file_path, &out, &config),
        Command::Config { save } => show_config(&config, save),
    }
}

/// `RUST_LOG` wins unless `--verbose` is given; the default is `warn`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(file_path: &Path) -> anyhow::Result<IngestedDocument> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    refcheck_ingest::ingest(file_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_path.display(), e))
}

fn display_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}

fn layout_config(config: &ConfigFile) -> LayoutConfig {
    config
        .layout
        .as_ref()
        .map(LayoutConfig::from_section)
        .unwrap_or_default()
}

fn check(
    file_path: &Path,
    author: Option<String>,
    run_layout: bool,
    out: &OutputArgs,
    config: &ConfigFile,
) -> anyhow::Result<ExitCode> {
    // CLI flag > env var
    let author = author.or_else(|| std::env::var("REFCHECK_AUTHOR").ok());
    let analyzer = refcheck_parsing::analyzer_from_config_file(config)
        .map_err(|e| anyhow::anyhow!("Invalid pattern in config: {}", e))?;

    let doc = load(file_path)?;
    let source = display_name(file_path);

    let outcome = analyzer.analyze(&doc.text, author.as_deref());
    let corrected = match &outcome {
        Ok(report) => {
            refcheck_parsing::format_references(&report.references, analyzer.config().doi_policy)
        }
        Err(_) => Vec::new(),
    };
    let layout_report = run_layout.then(|| {
        refcheck_layout::check_document(&doc.text, doc.paragraphs.as_deref(), &layout_config(config))
    });

    let mut report_doc = ReportDocument::new(&source, outcome.as_ref()).with_corrected(&corrected);
    if let Some(layout) = &layout_report {
        report_doc = report_doc.with_layout(layout);
    }

    let format = out.resolve_format();
    if let Some(path) = &out.output {
        refcheck_reporting::export_report(&report_doc, format, path)?;
        eprintln!("{} report written to {}", format.label(), path.display());
    } else {
        let rendered = refcheck_reporting::render(&report_doc, format)?;
        emit_stdout(&rendered, format, out.color())?;
    }

    Ok(if outcome.is_err() {
        ExitCode::from(EXIT_NO_REFERENCES)
    } else {
        ExitCode::SUCCESS
    })
}

fn format(file_path: &Path, color: ColorMode, config: &ConfigFile) -> anyhow::Result<ExitCode> {
    let analyzer = refcheck_parsing::analyzer_from_config_file(config)
        .map_err(|e| anyhow::anyhow!("Invalid pattern in config: {}", e))?;
    let doc = load(file_path)?;

    let references = analyzer.extract(&doc.text);
    let mut stdout = std::io::stdout();
    if references.is_empty() {
        let err = refcheck_core::AnalysisError::NoReferencesSection;
        output::print_error(&mut std::io::stderr(), &err.to_string(), color)?;
        return Ok(ExitCode::from(EXIT_NO_REFERENCES));
    }

    let corrected =
        refcheck_parsing::format_references(&references, analyzer.config().doi_policy);
    output::print_corrected(&mut stdout, &display_name(file_path), &corrected, color)?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn layout(file_path: &Path, out: &OutputArgs, config: &ConfigFile) -> anyhow::Result<ExitCode> {
    let doc = load(file_path)?;
    if doc.paragraphs.is_none() {
        tracing::warn!(
            kind = ?doc.kind,
            "no paragraph formatting available, only heading and caption checks apply"
        );
    }
    let report =
        refcheck_layout::check_document(&doc.text, doc.paragraphs.as_deref(), &layout_config(config));

    let format = out.resolve_format();
    let rendered = refcheck_reporting::render_layout(&display_name(file_path), &report, format)?;
    if let Some(path) = &out.output {
        std::fs::write(path, rendered)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
        eprintln!("{} report written to {}", format.label(), path.display());
    } else {
        emit_stdout(&rendered, format, out.color())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn show_config(config: &ConfigFile, save: bool) -> anyhow::Result<ExitCode> {
    print!("{}", toml::to_string_pretty(config)?);
    if save {
        let path = config_file::save_config(config)?;
        eprintln!("Config saved to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn emit_stdout(rendered: &str, format: ExportFormat, color: ColorMode) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    match format {
        ExportFormat::Text => output::print_text_report(&mut stdout, rendered, color)?,
        ExportFormat::Json | ExportFormat::Markdown => stdout.write_all(rendered.as_bytes())?,
    }
    stdout.flush()?;
    Ok(())
}
