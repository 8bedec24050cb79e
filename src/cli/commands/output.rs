//! Rendering of command results

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for the terminal
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A result set with both a flat and a structured form
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub json: Value,
}

impl Report {
    pub fn new(headers: &[&str], rows: Vec<Vec<String>>, json: Value) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            json,
        }
    }
}

pub fn emit(args: &OutputArgs, report: &Report) -> Result<()> {
    let rendered = render(args.format, report, args.output.is_none())?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)
            .with_context(|| format!("Failed to write output to: {}", output_path.display()))?;
        println!(
            "💾 {} rows saved to: {}",
            report.rows.len(),
            output_path.display().to_string().bright_green()
        );
    } else {
        print!("{}", rendered);
    }
    Ok(())
}

fn render(format: OutputFormat, report: &Report, color: bool) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report, color)),
        OutputFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(&report.json).context("Failed to format JSON output")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::JsonCompact => {
            let mut out =
                serde_json::to_string(&report.json).context("Failed to format JSON output")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Csv => render_csv(report),
    }
}

fn render_csv(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&report.headers)?;
    for row in &report.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn render_table(report: &Report, color: bool) -> String {
    if report.rows.is_empty() {
        return "No rows\n".to_string();
    }

    let mut widths: Vec<usize> = report.headers.iter().map(|h| h.chars().count()).collect();
    for row in &report.rows {
        for (i, value) in row.iter().enumerate() {
            let len = value.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let line = |values: &[String]| -> String {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:<width$}", v, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let header = line(&report.headers);
    if color {
        out.push_str(&header.bright_white().bold().to_string());
    } else {
        out.push_str(&header);
    }
    out.push('\n');
    for row in &report.rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
