//! Equipment catalog loading and normalization.
//!
//! Reads a four-column CSV (`domain, type, category, sub_category`, mapped
//! positionally), derives a display name per row, drops rows that end up
//! nameless, and assigns contiguous zero-based ids. The resulting catalog is
//! the search corpus and is immutable after construction.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

/// Number of data columns the source must expose.
const EXPECTED_COLUMNS: usize = 4;

/// One normalized catalog row.
///
/// `id` is the row's position in the filtered catalog and doubles as the
/// vector id in the index; `name` is the derived display name used as the
/// embedding input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: usize,
    pub domain: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub category: String,
    pub sub_category: String,
    pub name: String,
}

/// Ordered, id-aligned collection of catalog entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// Errors raised while loading the catalog source.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to read catalog source: {0}")]
    Csv(#[from] csv::Error),

    #[error("record {record} has {got} columns, expected 4")]
    ColumnCount { record: usize, got: usize },
}

impl Catalog {
    /// Load the catalog from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>, has_headers: bool) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let now = Instant::now();
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_path(path)?;

        let catalog = Self::from_csv_reader(reader)?;
        log::debug!(
            "took {}ms to read catalog csv",
            now.elapsed().as_micros() as f64 / 1000.0
        );
        log::info!(
            "catalog loaded: {} equipments from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load the catalog from any reader producing CSV data.
    pub fn from_reader<R: Read>(reader: R, has_headers: bool) -> Result<Self, DataLoadError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DataLoadError> {
        let mut entries = vec![];
        let mut dropped = 0usize;

        for (record_no, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != EXPECTED_COLUMNS {
                return Err(DataLoadError::ColumnCount {
                    record: record_no,
                    got: record.len(),
                });
            }

            let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
            let domain = cell(0);
            let type_ = cell(1);
            let category = cell(2);
            let sub_category = cell(3);

            let name = derive_name(&type_, &category, &sub_category);
            if name.is_empty() {
                dropped += 1;
                continue;
            }

            entries.push(CatalogEntry {
                // Contiguous ids over the surviving rows; this is the join
                // key between index hits and catalog rows.
                id: entries.len(),
                domain,
                type_,
                category,
                sub_category,
                name,
            });
        }

        if dropped > 0 {
            log::debug!("dropped {dropped} rows with empty derived names");
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Display names in id order, ready for bulk embedding.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

/// Join type/category/sub_category with single spaces, collapsing any
/// whitespace runs the cells themselves contain, and trim.
fn derive_name(type_: &str, category: &str, sub_category: &str) -> String {
    [type_, category, sub_category]
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
