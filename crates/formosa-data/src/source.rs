//! Sources of raw records, one per industry.
//!
//! The data-acquisition side writes one long-format table per industry. The
//! [`RecordSource`] trait abstracts over where those tables live: a directory
//! of CSV files in production, an in-memory map in tests.

use crate::error::{DataError, Result};
use crate::record::{RawRecord, StockEntry, parse_date};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A keyed collection of per-industry record batches.
pub trait RecordSource: Debug + Send + Sync {
    /// Names of all industries this source can load, sorted.
    fn industries(&self) -> Result<Vec<String>>;

    /// Load every record of one industry.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NotFound`] if the industry has no source.
    fn load(&self, industry: &str) -> Result<Vec<RawRecord>>;

    /// Check if an industry exists in this source.
    fn contains(&self, industry: &str) -> bool {
        self.industries()
            .map(|names| names.iter().any(|n| n == industry))
            .unwrap_or(false)
    }
}

/// A directory holding one `<industry>.csv` per industry.
///
/// Files need the columns `date, stock_id, stock_name, industry, type, value`
/// (in any order). Other columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

/// One CSV line before type conversion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    stock_id: String,
    stock_name: String,
    #[serde(default)]
    industry: String,
    #[serde(rename = "type")]
    metric: String,
    value: String,
}

impl CsvDirectory {
    /// Create a source rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing an industry.
    pub fn path_for(&self, industry: &str) -> PathBuf {
        self.root.join(format!("{}.csv", industry))
    }

    fn read_file(path: &Path) -> Result<Vec<RawRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            let Ok(value) = row.value.trim().parse::<f64>() else {
                skipped += 1;
                continue;
            };
            if !value.is_finite() {
                skipped += 1;
                continue;
            }
            let date = parse_date(&row.date).map_err(|e| {
                DataError::Parse(format!("{}:{}: {}", path.display(), line + 2, e))
            })?;

            records.push(RawRecord {
                date,
                stock_id: row.stock_id.trim().to_string(),
                stock_name: row.stock_name,
                industry: row.industry,
                metric: row.metric,
                value,
            });
        }

        if skipped > 0 {
            warn!(
                path = %path.display(),
                skipped,
                "skipped rows without a numeric value"
            );
        }
        debug!(path = %path.display(), rows = records.len(), "loaded records");

        Ok(records)
    }
}

impl RecordSource for CsvDirectory {
    fn industries(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, industry: &str) -> Result<Vec<RawRecord>> {
        let path = self.path_for(industry);
        if !path.is_file() {
            return Err(DataError::not_found(industry));
        }
        Self::read_file(&path)
    }

    fn contains(&self, industry: &str) -> bool {
        self.path_for(industry).is_file()
    }
}

/// Records held in memory, keyed by industry.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    batches: BTreeMap<String, Vec<RawRecord>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one industry's batch.
    pub fn insert(&mut self, industry: impl Into<String>, records: Vec<RawRecord>) {
        self.batches.insert(industry.into(), records);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_industry(mut self, industry: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.insert(industry, records);
        self
    }

    /// Number of industries.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether the source holds no industries.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn industries(&self) -> Result<Vec<String>> {
        Ok(self.batches.keys().cloned().collect())
    }

    fn load(&self, industry: &str) -> Result<Vec<RawRecord>> {
        self.batches
            .get(industry)
            .cloned()
            .ok_or_else(|| DataError::not_found(industry))
    }

    fn contains(&self, industry: &str) -> bool {
        self.batches.contains_key(industry)
    }
}

/// List the unique stocks of every industry in a source.
///
/// Each `(stock_id, stock_name)` pair is reported once per industry source it
/// appears in, with the source name as `industry_category`. Industries that fail
/// to load are skipped.
pub fn stock_directory(source: &dyn RecordSource) -> Result<Vec<StockEntry>> {
    let mut entries = BTreeSet::new();

    for industry in source.industries()? {
        let records = match source.load(&industry) {
            Ok(records) => records,
            Err(e) => {
                warn!(%industry, error = %e, "skipping industry in stock directory");
                continue;
            }
        };
        for record in records {
            entries.insert(StockEntry {
                stock_id: record.stock_id,
                stock_name: record.stock_name,
                industry_category: industry.clone(),
            });
        }
    }

    Ok(entries.into_iter().collect())
}
