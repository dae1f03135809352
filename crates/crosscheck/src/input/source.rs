//! Dataset model, run collection, and source metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Detected encoding.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A single rectangular dataset under analysis.
///
/// Cell values are kept as strings; numeric and temporal interpretation is
/// decided per-operation. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset name, unique within a run.
    pub name: String,
    /// Normalized column names, in file order.
    pub columns: Vec<String>,
    /// Row data as strings (row-major order; every row has one cell per column).
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Create a new dataset.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// Find a column's index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get the non-null values for a column by index.
    pub fn non_null_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.column_values(index).filter(|v| !Self::is_null_value(v))
    }

    /// Distinct non-null values for a column, in first-appearance order.
    pub fn distinct_values(&self, index: usize) -> IndexSet<&str> {
        self.non_null_values(index).collect()
    }

    /// Number of distinct non-null values for a column.
    pub fn distinct_count(&self, index: usize) -> usize {
        self.distinct_values(index).len()
    }

    /// Number of fully distinct rows (exact cell-for-cell comparison).
    pub fn distinct_row_count(&self) -> usize {
        self.rows.iter().collect::<HashSet<_>>().len()
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

/// Insertion-ordered collection of the datasets in one run.
///
/// Iteration order is load order, which keeps every downstream pass
/// deterministic. Inserting a dataset under an existing name replaces it.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    datasets: IndexMap<String, Dataset>,
}

impl DatasetCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from datasets, keyed by their names.
    pub fn from_datasets(datasets: impl IntoIterator<Item = Dataset>) -> Self {
        let mut collection = Self::new();
        for dataset in datasets {
            collection.insert(dataset);
        }
        collection
    }

    /// Add a dataset, keyed by its name.
    pub fn insert(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.name.clone(), dataset);
    }

    /// Look up a dataset by name.
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Iterate datasets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    /// Dataset names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(|k| k.as_str())
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Total row count across all datasets.
    pub fn total_rows(&self) -> usize {
        self.iter().map(|d| d.row_count()).sum()
    }

    /// Total cell count across all datasets.
    pub fn total_cells(&self) -> usize {
        self.iter().map(|d| d.cell_count()).sum()
    }
}

/// A file that failed to load. Analysis proceeds with the remaining files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFailure {
    /// Path of the file that failed.
    pub path: PathBuf,
    /// Human-readable failure description.
    pub message: String,
}
