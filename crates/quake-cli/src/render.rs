//! # Presentation
//!
//! Text, JSON and Markdown rendering of report outputs.

use crate::config::OutputFormat;
use quake_analytics::reports::to_json;
use quake_analytics::{ReportOutput, ResultSet, Value};

/// Columns printed with three decimals instead of two.
const HIGH_PRECISION_COLUMNS: &[&str] = &["Correlation"];

/// Render outputs in the requested format.
pub fn render(outputs: &[ReportOutput], format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(outputs),
        OutputFormat::Json => to_json(outputs)?,
        OutputFormat::Markdown => render_markdown(outputs),
    })
}

fn format_cell(column: &str, value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) if HIGH_PRECISION_COLUMNS.contains(&column) => format!("{v:.3}"),
        Value::Float(v) => format!("{v:.2}"),
        Value::Text(v) => v.clone(),
    }
}

fn formatted_rows(rs: &ResultSet) -> Vec<Vec<String>> {
    rs.rows
        .iter()
        .map(|row| {
            rs.columns
                .iter()
                .zip(row)
                .map(|(column, value)| format_cell(column, value))
                .collect()
        })
        .collect()
}

/// Aligned plain-text tables, one per result set.
pub fn render_text(outputs: &[ReportOutput]) -> String {
    let mut out = String::new();
    for output in outputs {
        out.push_str(&format!("Report {}: {}\n\n", output.number, output.title));
        for rs in &output.result_sets {
            out.push_str(&format!("{}\n", rs.name));
            out.push_str(&text_table(rs));
            out.push('\n');
        }
    }
    out
}

fn text_table(rs: &ResultSet) -> String {
    let rows = formatted_rows(rs);
    let widths: Vec<usize> = rs
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };
    let rule = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut table = rule.clone();
    table.push_str(&line(&rs.columns));
    table.push_str(&rule);
    for row in &rows {
        table.push_str(&line(row));
    }
    table.push_str(&rule);
    table
}

/// Markdown document with one section per report.
pub fn render_markdown(outputs: &[ReportOutput]) -> String {
    let mut md = String::new();
    md.push_str("# Earthquake Catalogue Report\n\n");

    for output in outputs {
        md.push_str(&format!("## R{}: {}\n\n", output.number, output.title));
        for rs in &output.result_sets {
            md.push_str(&format!("### {}\n\n", rs.name));
            md.push_str(&format!("| {} |\n", rs.columns.join(" | ")));
            md.push_str(&format!(
                "|{}|\n",
                rs.columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
            ));
            for row in formatted_rows(rs) {
                md.push_str(&format!("| {} |\n", row.join(" | ")));
            }
            md.push('\n');
        }
    }

    md
}
