//! CSV/TSV parser with delimiter detection and header normalization.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use super::source::{Dataset, DatasetCollection, LoadFailure, SourceMetadata};
use crate::error::{CrosscheckError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Everything the multi-file loader produced for one run.
#[derive(Debug, Default)]
pub struct LoadedData {
    /// Datasets that loaded successfully, in argument order.
    pub collection: DatasetCollection,
    /// Source metadata keyed by dataset name.
    pub sources: IndexMap<String, SourceMetadata>,
    /// Files that failed to load.
    pub failures: Vec<LoadFailure>,
}

/// Parses tabular data files into datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and its source metadata.
    ///
    /// The dataset is named after the file stem; column names are normalized
    /// (trimmed, lower-cased, spaces replaced with underscores).
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CrosscheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let metadata = file.metadata().map_err(|e| CrosscheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = metadata.len();

        // Read entire file for hashing
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CrosscheckError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let dataset = self.parse_bytes(name, &contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.row_count(),
            dataset.column_count(),
        );

        Ok((dataset, source_metadata))
    }

    /// Load several files, collecting per-file failures instead of aborting.
    pub fn load_files(&self, paths: &[PathBuf]) -> LoadedData {
        let mut loaded = LoadedData::default();

        for path in paths {
            match self.parse_file(path) {
                Ok((dataset, metadata)) => {
                    loaded.sources.insert(dataset.name.clone(), metadata);
                    loaded.collection.insert(dataset);
                }
                Err(e) => loaded.failures.push(LoadFailure {
                    path: path.clone(),
                    message: e.to_string(),
                }),
            }
        }

        loaded
    }

    /// Parse bytes directly.
    fn parse_bytes(&self, name: String, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let columns: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .map(normalize_column_name)
                .collect()
        } else {
            let first_record = reader.records().next();
            match first_record {
                Some(Ok(record)) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(CrosscheckError::EmptyData("No data rows found".to_string())),
            }
        };

        if columns.is_empty() {
            return Err(CrosscheckError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        let expected_cols = columns.len();

        // Re-create the reader; header handling may have consumed records
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Pad or truncate to the header width
            while row.len() < expected_cols {
                row.push(String::new());
            }
            row.truncate(expected_cols);

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(CrosscheckError::EmptyData("No data rows found".to_string()));
        }

        Ok(Dataset::new(name, columns, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a column name: trim, lowercase, spaces to underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(CrosscheckError::EmptyData("No lines to analyze".to_string()));
    }

    // Count occurrences of each delimiter in each line
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        if counts.is_empty() {
            continue;
        }

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts
                .iter()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a slight bonus as
        // it's less common inside actual data values
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        let data = b"a;b;c\n1;2;3";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let dataset = parser
            .parse_bytes("people".to_string(), data, b',')
            .unwrap();

        assert_eq!(dataset.name, "people");
        assert_eq!(dataset.columns, vec!["name", "age", "city"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0][0], "Alice");
        assert_eq!(dataset.rows[1][1], "25");
    }

    #[test]
    fn test_header_normalization() {
        let parser = Parser::new();
        let data = b"Customer ID, Full Name ,AMOUNT\n1,Alice,10";
        let dataset = parser
            .parse_bytes("export".to_string(), data, b',')
            .unwrap();

        assert_eq!(dataset.columns, vec!["customer_id", "full_name", "amount"]);
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Order Date "), "order_date");
        assert_eq!(normalize_column_name("id"), "id");
        assert_eq!(normalize_column_name("Unit Price USD"), "unit_price_usd");
    }

    #[test]
    fn test_ragged_rows_padded() {
        let parser = Parser::new();
        let data = b"a,b,c\n1,2\n4,5,6,7";
        let dataset = parser.parse_bytes("t".to_string(), data, b',').unwrap();

        assert_eq!(dataset.rows[0], vec!["1", "2", ""]);
        assert_eq!(dataset.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_empty_data_is_an_error() {
        let parser = Parser::new();
        let result = parser.parse_bytes("t".to_string(), b"a,b,c\n", b',');
        assert!(matches!(result, Err(CrosscheckError::EmptyData(_))));
    }

    #[test]
    fn test_load_files_collects_failures() {
        let mut good = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(good, "id,name").unwrap();
        writeln!(good, "1,Acme").unwrap();

        let parser = Parser::new();
        let loaded = parser.load_files(&[
            good.path().to_path_buf(),
            PathBuf::from("/nonexistent/missing.csv"),
        ]);

        assert_eq!(loaded.collection.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert!(loaded.failures[0].message.contains("IO error"));
        let name = loaded.collection.names().next().unwrap().to_string();
        assert!(loaded.sources.contains_key(&name));
    }
}
