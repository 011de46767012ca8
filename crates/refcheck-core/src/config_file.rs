use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{
    AnalysisConfig, AnalysisConfigBuilder, CitationScope, DoiDisplayPolicy, SegmentationStrategy,
    ThresholdComparison,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(#[from] std::io::Error),
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub analysis: Option<AnalysisSection>,
    pub parsing: Option<ParsingSection>,
    pub layout: Option<LayoutSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub tracked_journal: Option<String>,
    pub allowed_journal_citations: Option<usize>,
    pub author_threshold: Option<usize>,
    pub author_comparison: Option<ThresholdComparison>,
    pub doi_policy: Option<DoiDisplayPolicy>,
    pub citation_scope: Option<CitationScope>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    pub min_reference_length: Option<usize>,
    pub segmentation: Option<SegmentationStrategy>,
    pub section_header_regex: Option<String>,
    pub section_end_regex: Option<String>,
    pub max_range_span: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    pub font_name: Option<String>,
    pub font_size_pt: Option<f32>,
    pub first_line_indent_in: Option<f32>,
    pub indent_tolerance_in: Option<f32>,
    pub bullet_font_size_pt: Option<f32>,
    pub bullet_indent_in: Option<f32>,
}

impl ConfigFile {
    /// Build an [`AnalysisConfig`] from the `[analysis]` and `[parsing]`
    /// sections, falling back to defaults for anything unset.
    pub fn analysis_config(&self) -> AnalysisConfig {
        let mut builder = AnalysisConfigBuilder::new();
        if let Some(a) = &self.analysis {
            if let Some(name) = &a.tracked_journal {
                builder = builder.tracked_journal(name);
            }
            if let Some(n) = a.allowed_journal_citations {
                builder = builder.allowed_journal_citations(n);
            }
            if let Some(n) = a.author_threshold {
                builder = builder.author_threshold(n);
            }
            if let Some(c) = a.author_comparison {
                builder = builder.author_comparison(c);
            }
            if let Some(p) = a.doi_policy {
                builder = builder.doi_policy(p);
            }
            if let Some(s) = a.citation_scope {
                builder = builder.citation_scope(s);
            }
        }
        if let Some(n) = self.parsing.as_ref().and_then(|p| p.min_reference_length) {
            builder = builder.min_reference_length(n);
        }
        builder.build()
    }
}

/// Platform config directory path: `<config_dir>/refcheck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("refcheck").join("config.toml"))
}

/// Load config by cascading CWD `.refcheck.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".refcheck.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match read_config(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            None
        }
    }
}

/// Read and parse a config file, reporting why it could not be used.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Take the overlay's value when set, otherwise the base's.
fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (ba, oa) = (&base.analysis, &overlay.analysis);
    let (bp, op) = (&base.parsing, &overlay.parsing);
    let (bl, ol) = (&base.layout, &overlay.layout);

    ConfigFile {
        analysis: Some(AnalysisSection {
            tracked_journal: pick(oa, ba, |a| a.tracked_journal.clone()),
            allowed_journal_citations: pick(oa, ba, |a| a.allowed_journal_citations),
            author_threshold: pick(oa, ba, |a| a.author_threshold),
            author_comparison: pick(oa, ba, |a| a.author_comparison),
            doi_policy: pick(oa, ba, |a| a.doi_policy),
            citation_scope: pick(oa, ba, |a| a.citation_scope),
        }),
        parsing: Some(ParsingSection {
            min_reference_length: pick(op, bp, |p| p.min_reference_length),
            segmentation: pick(op, bp, |p| p.segmentation),
            section_header_regex: pick(op, bp, |p| p.section_header_regex.clone()),
            section_end_regex: pick(op, bp, |p| p.section_end_regex.clone()),
            max_range_span: pick(op, bp, |p| p.max_range_span),
        }),
        layout: Some(LayoutSection {
            font_name: pick(ol, bl, |l| l.font_name.clone()),
            font_size_pt: pick(ol, bl, |l| l.font_size_pt),
            first_line_indent_in: pick(ol, bl, |l| l.first_line_indent_in),
            indent_tolerance_in: pick(ol, bl, |l| l.indent_tolerance_in),
            bullet_font_size_pt: pick(ol, bl, |l| l.bullet_font_size_pt),
            bullet_indent_in: pick(ol, bl, |l| l.bullet_indent_in),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write a config as TOML to `path`, creating parent directories.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}
