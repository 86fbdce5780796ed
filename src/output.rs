//! Rendering and export of a finished report.
//!
//! Supports an aligned text table, an ASCII bar chart, pretty JSON, and CSV
//! export.

use anyhow::Result;
use tracing::debug;

use crate::reports::report::{ChartConfig, Report};
use csv::WriterBuilder;
use std::io::Write;

const CHART_WIDTH: usize = 40;

/// Writes the report as an aligned text table.
pub fn write_table<W: Write>(out: &mut W, title: &str, report: &Report) -> Result<()> {
    let mut widths: Vec<usize> = report.headers.iter().map(String::len).collect();
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    writeln!(out, "{title}")?;
    for (i, header) in report.headers.iter().enumerate() {
        write!(out, "{:<width$}  ", header, width = widths[i])?;
    }
    writeln!(out)?;
    for (i, _) in report.headers.iter().enumerate() {
        write!(out, "{}  ", "-".repeat(widths[i]))?;
    }
    writeln!(out)?;
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            write!(out, "{:<width$}  ", cell, width = widths[i])?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Draws the chart series as horizontal ASCII bars scaled to the largest
/// value.
pub fn write_chart<W: Write>(out: &mut W, chart: &ChartConfig) -> Result<()> {
    if chart.data.is_empty() {
        return Ok(());
    }

    let max = chart.data.iter().copied().fold(0.0_f64, f64::max);
    let label_width = chart.labels.iter().map(String::len).max().unwrap_or(0);

    writeln!(out, "{}", chart.series_label)?;
    for (label, value) in chart.labels.iter().zip(&chart.data) {
        let bar_len = if max > 0.0 {
            ((value / max) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            out,
            "{:<label_width$}  {} {}",
            label,
            "#".repeat(bar_len),
            fmt_value(*value),
        )?;
    }

    Ok(())
}

fn fmt_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Prints the report as pretty-printed JSON to stdout.
pub fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the report to a CSV file, headers first. The export analog of
/// copying the dashboard table to the clipboard.
pub fn write_csv(path: &str, report: &Report) -> Result<()> {
    debug!(path, rows = report.rows.len(), "Writing report CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&report.headers)?;
    for row in &report.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    Ok(())
}
