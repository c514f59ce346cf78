//! CSV and JSON export of ranking results.

use crate::report::BestStockReport;
use crate::table::TableView;
use formosa_rules::{HeatmapMatrix, PassRate, RankingTable};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

fn writer_into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// One flattened ranking cell, used for the multi-table CSV of a report.
#[derive(Debug, Serialize)]
struct RankingCell<'a> {
    category: &'a str,
    rank: usize,
    stock_id: &'a str,
    stock_name: &'a str,
    pass_rate: f64,
    metric: &'a str,
    value: Option<f64>,
}

/// Write a table view as CSV, with empty cells for missing values.
fn table_csv<T: TableView + ?Sized>(view: &T) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(view.headers())?;
    for row in view.cells() {
        wtr.write_record(
            row.iter()
                .map(|c| if c == crate::table::MISSING { "" } else { c.as_str() }),
        )?;
    }
    writer_into_string(wtr)
}

impl Exporter for RankingTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => table_csv(self),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for HeatmapMatrix {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => table_csv(self),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for Vec<PassRate> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for rate in self {
                    wtr.serialize(rate)?;
                }
                writer_into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for BestStockReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for table in self.sections() {
                    for (rank, row) in table.rows.iter().enumerate() {
                        for (metric, value) in table.metric_labels.iter().zip(&row.metrics) {
                            wtr.serialize(RankingCell {
                                category: table.category.key(),
                                rank: rank + 1,
                                stock_id: &row.stock_id,
                                stock_name: &row.stock_name,
                                pass_rate: row.pass_rate,
                                metric,
                                value: *value,
                            })?;
                        }
                    }
                }
                writer_into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}
