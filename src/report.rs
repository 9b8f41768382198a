use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::controls::ControlInfo;
use crate::inputs::InputSource;
use crate::layout::Conversion;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Xml,
    Json,
    #[value(name = "jsonl")]
    JsonL,
}

/// What one input turned into.
#[derive(Debug)]
pub enum Outcome {
    Layout(Conversion),
    Controls(Vec<ControlInfo>),
}

impl Outcome {
    pub fn render_text(&self) -> String {
        match self {
            Outcome::Layout(conversion) => conversion.to_xml(),
            Outcome::Controls(controls) => format_controls(controls),
        }
    }
}

#[derive(Serialize)]
pub struct SourceReport<'a> {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'a Conversion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    controls: Option<&'a [ControlInfo]>,
}

impl<'a> SourceReport<'a> {
    pub fn new(source: &InputSource, outcome: &'a Outcome) -> Self {
        let (layout, controls) = match outcome {
            Outcome::Layout(conversion) => (Some(conversion), None),
            Outcome::Controls(controls) => (None, Some(controls.as_slice())),
        };
        Self {
            source: source.to_string(),
            layout,
            controls,
        }
    }
}

pub fn format_controls(controls: &[ControlInfo]) -> String {
    if controls.is_empty() {
        return "No controls found.\n".to_string();
    }

    let mut output = String::new();
    for control in controls {
        let bounds = control.bounds;
        output.push_str(&format!(
            "{:<12} {:<12} [{},{}][{},{}]  {:?}  {}\n",
            control.id,
            control.kind.to_string(),
            bounds.left,
            bounds.top,
            bounds.right,
            bounds.bottom,
            control.text.as_deref().unwrap_or(""),
            control.xpath
        ));
    }
    output
}

/// Print every successful outcome in `format`; `failures` feeds the JSON summary.
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[(&InputSource, &Outcome)],
    format: OutputFormat,
    failures: usize,
) -> Result<()> {
    match format {
        OutputFormat::Xml => {
            let multiple = reports.len() > 1;
            for (source, outcome) in reports {
                if multiple {
                    writeln!(out, "<!-- {source} -->")?;
                }
                write!(out, "{}", outcome.render_text())?;
            }
        }
        OutputFormat::Json => {
            let results: Vec<_> = reports
                .iter()
                .map(|(source, outcome)| SourceReport::new(source, outcome))
                .collect();
            let output = serde_json::json!({
                "results": results,
                "converted_count": reports.len(),
                "failed_count": failures,
            });
            serde_json::to_writer_pretty(&mut *out, &output)?;
            writeln!(out)?;
        }
        OutputFormat::JsonL => {
            for (source, outcome) in reports {
                serde_json::to_writer(&mut *out, &SourceReport::new(source, outcome))?;
                writeln!(out)?;
            }
            // Write metadata as last line
            let metadata = serde_json::json!({
                "_metadata": {
                    "converted_count": reports.len(),
                    "failed_count": failures,
                }
            });
            serde_json::to_writer(&mut *out, &metadata)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Write one file per outcome into `dir` and return the paths in input order.
///
/// Inputs that would land on the same file name get `_2`, `_3`, ... suffixes.
pub fn write_output_files(
    dir: &Path,
    reports: &[(&InputSource, &Outcome)],
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut taken = HashSet::new();
    let mut written = Vec::with_capacity(reports.len());

    for (source, outcome) in reports {
        let (extension, contents) = match (format, outcome) {
            (OutputFormat::Xml, Outcome::Layout(conversion)) => ("xml", conversion.to_xml()),
            (OutputFormat::Xml, Outcome::Controls(controls)) => ("txt", format_controls(controls)),
            (OutputFormat::Json | OutputFormat::JsonL, _) => (
                "json",
                serde_json::to_string_pretty(&SourceReport::new(source, outcome))?,
            ),
        };
        let path = unique_path(source.output_path(dir, extension), &mut taken);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(source = %source, output = %path.display(), "Wrote output");
        written.push(path);
    }

    Ok(written)
}

fn unique_path(path: PathBuf, taken: &mut HashSet<PathBuf>) -> PathBuf {
    if taken.insert(path.clone()) {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let unique = (2usize..)
        .map(|n| path.with_file_name(format!("{stem}_{n}.{extension}")))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| path.clone());
    tracing::warn!(
        wanted = %path.display(),
        output = %unique.display(),
        "Output file name already used in this run"
    );
    taken.insert(unique.clone());
    unique
}
