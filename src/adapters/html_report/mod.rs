//! HTML report generation.
//!
//! Reads a template (either the built-in default or a custom file via
//! `template_path`), resolves the `{{PLACEHOLDER}}` markers and writes a
//! single self-contained `.html` file with the charts inlined as data URLs.

pub mod default_template;
pub mod entries;

use std::fs;
use std::path::{Path, PathBuf};

use html_escape::encode_text;

use crate::domain::error::HhhlError;
use crate::domain::report::Report;
use crate::ports::report_port::ReportPort;

/// Resolve all `{{PLACEHOLDER}}`s in `template` for `report` in a single
/// pass. Substituted values are never scanned again; unknown markers are
/// copied through unchanged.
pub fn resolve(template: &str, report: &Report) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let resolved = after.find("}}").and_then(|end| {
            placeholder_value(&after[..end], report).map(|value| (end, value))
        });
        match resolved {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn placeholder_value(name: &str, report: &Report) -> Option<String> {
    match name {
        "TITLE" => Some(encode_text(&report.title).into_owned()),
        "GENERATED_AT" => Some(report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        "ENTRY_COUNT" => Some(report.len().to_string()),
        "STOCK_ITEMS" => Some(entries::render_entries(report.entries())),
        _ => None,
    }
}

/// Path of the report file for `report` under `output_dir`.
pub fn report_path(output_dir: &Path, report: &Report) -> PathBuf {
    output_dir.join(report.file_name())
}

pub struct HtmlReportAdapter {
    template: Option<String>,
}

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    /// Uses the template file at `path` instead of the built-in one.
    pub fn with_template_file(path: &Path) -> Result<Self, HhhlError> {
        let content = fs::read_to_string(path).map_err(|e| HhhlError::ConfigInvalid {
            section: "report".into(),
            key: "template_path".into(),
            reason: format!("failed to read template {}: {}", path.display(), e),
        })?;
        Ok(Self {
            template: Some(content),
        })
    }

    fn template(&self) -> &str {
        self.template
            .as_deref()
            .unwrap_or(default_template::template())
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, report: &Report, output_path: &Path) -> Result<(), HhhlError> {
        let html = resolve(self.template(), report);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        Ok(())
    }
}
