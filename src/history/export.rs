//! History export
//!
//! Writes the retained predictions as JSON or CSV for backup and analysis.

use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use super::error::{HistoryError, HistoryResult};
use super::store::HistoryEntry;
use crate::form::Field;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unsupported export format: {}. Use: json, csv", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl From<csv::Error> for HistoryError {
    fn from(err: csv::Error) -> Self {
        HistoryError::Serialization(err.to_string())
    }
}

/// Write `entries` to `out` in the requested format
pub fn export<W: Write>(entries: &[HistoryEntry], format: ExportFormat, out: W) -> HistoryResult<()> {
    match format {
        ExportFormat::Json => export_json(entries, out),
        ExportFormat::Csv => export_csv(entries, out),
    }
}

fn export_json<W: Write>(entries: &[HistoryEntry], mut out: W) -> HistoryResult<()> {
    serde_json::to_writer_pretty(&mut out, entries)?;
    writeln!(out)?;
    Ok(())
}

/// One row per entry: position, label, confidence, server timestamp, then the
/// submitted customer fields when the service echoed them back as `input`.
fn export_csv<W: Write>(entries: &[HistoryEntry], out: W) -> HistoryResult<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["index", "label", "confidence", "timestamp"];
    header.extend(Field::ALL.iter().map(Field::name));
    writer.write_record(&header)?;

    for (i, entry) in entries.iter().enumerate() {
        let input = entry.extra.get("input");

        let mut row = vec![
            (i + 1).to_string(),
            entry.label.clone(),
            entry.confidence.map(|c| c.to_string()).unwrap_or_default(),
            entry.timestamp().unwrap_or_default().to_string(),
        ];
        row.extend(
            Field::ALL
                .iter()
                .map(|f| cell(input.and_then(|v| v.get(f.name())))),
        );

        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
