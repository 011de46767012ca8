//! Rendering of analysis and layout results as JSON, Markdown or plain text.

mod export;
mod outline;
mod types;

pub use export::{
    export_report, render, render_layout, JsonRenderer, MarkdownRenderer, ReportError,
    ReportRenderer, TextRenderer,
};
pub use types::{ExportFormat, ReportDocument};
