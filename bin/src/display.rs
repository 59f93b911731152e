//! Display utilities and output formatting for the tsdlink CLI.

use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tsdlink_lib::prelude::*;

/// Output format for query rows.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Table,
    Csv,
    Json,
}

/// Creates a spinner on stderr, hidden in quiet mode.
pub(crate) fn spinner(quiet: bool, message: &'static str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Print the column list of a statement signature.
pub(crate) fn print_columns(metadata: &ContentMetadata) {
    println!(
        "{:<4} {:<24} {:<24} {:<12} {:<10} {}",
        "#", "NAME", "LABEL", "TYPE", "SQL TYPE", "TABLE"
    );
    println!("{}", "-".repeat(90));
    for column in metadata.columns_by_ordinal() {
        println!(
            "{:<4} {:<24} {:<24} {:<12} {:<10} {}",
            column.ordinal + 1,
            column.name,
            column.label(),
            column.type_name.as_deref().unwrap_or("-"),
            column.sql_type().as_str(),
            column.table.as_deref().unwrap_or("-"),
        );
    }
}

/// Print stored rows, decoding cells with the discovered columns.
pub(crate) fn print_rows(rows: &RowSet, columns: &[ColumnDescriptor], format: Format) -> Result<()> {
    let typed = rows.typed(columns)?;

    match format {
        Format::Table => print_table(&rows.headers, &typed),
        Format::Csv => {
            println!("{}", csv_line(rows.headers.iter().map(String::as_str)));
            for row in &typed {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                println!("{}", csv_line(cells.iter().map(String::as_str)));
            }
        }
        Format::Json => {
            let objects = typed
                .iter()
                .map(|row| {
                    rows.headers
                        .iter()
                        .cloned()
                        .zip(row.iter().map(serde_json::to_value))
                        .map(|(key, value)| value.map(|v| (key, v)))
                        .collect::<Result<serde_json::Map<_, _>, serde_json::Error>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}", serde_json::to_string_pretty(&objects)?);
        }
    }

    Ok(())
}

fn print_table(headers: &[String], rows: &[Vec<Value>]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(cell.len()),
                None => widths.push(cell.len()),
            }
        }
    }

    let line = |row: &[String]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &cells {
        println!("{}", line(row));
    }
    println!("\n{} row(s)", rows.len());
}

fn csv_line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(csv_field).collect::<Vec<_>>().join(",")
}

fn csv_field(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
