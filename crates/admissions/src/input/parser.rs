//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::SourceMetadata;
use crate::error::{AdmissionsError, Result};
use crate::record::{RecordSet, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
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

/// Parses delimited admission files into record sets.
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

    /// Parse a file and return the record set and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RecordSet, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| AdmissionsError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let records = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = records.len(),
            format = %format,
            "parsed source file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            records.len(),
            records.fields().len(),
        );

        Ok((records, metadata))
    }

    /// Parse delimited text already held in memory.
    pub fn parse_str(&self, text: &str) -> Result<RecordSet> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    /// Parse delimited data from any reader (e.g. stdin).
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<RecordSet> {
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| AdmissionsError::Io {
                path: "<reader>".into(),
                source: e,
            })?;
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };
        self.parse_bytes(&contents, delimiter)
    }

    /// Parse bytes directly.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RecordSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            rows.push(record.iter().map(Value::parse_cell).collect::<Vec<_>>());
        }

        let fields: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            match rows.first() {
                Some(first) => (0..first.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                None => return Err(AdmissionsError::EmptyData("No data rows found".to_string())),
            }
        };

        if fields.is_empty() || fields.iter().all(|f| f.is_empty()) {
            return Err(AdmissionsError::EmptyData("No columns found".to_string()));
        }

        if rows.is_empty() {
            return Err(AdmissionsError::EmptyData("No data rows found".to_string()));
        }

        // RecordSet::new pads short rows with nulls and truncates long ones.
        Ok(RecordSet::new(fields, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
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
        return Err(AdmissionsError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus.
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
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"race|insurance\n\"WHITE, OTHER\"|Medicare\nBLACK|Medicaid";
        assert_eq!(detect_delimiter(data).unwrap(), b'|');
    }

    #[test]
    fn test_parse_maps_null_tokens() {
        let parser = Parser::new();
        let data = b"race,marital_status\nWHITE,\nBLACK/AFRICAN AMERICAN,?\n,MARRIED";
        let records = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(records.fields(), &["race", "marital_status"]);
        assert_eq!(records.len(), 3);
        assert_eq!(records.rows()[0][1], Value::Null);
        assert_eq!(records.rows()[1][1], Value::from("?"));
        assert_eq!(records.rows()[2][0], Value::Null);
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let parser = Parser::new();
        let records = parser.parse_bytes(b"a,b,c\n1\n1,2,3,4", b',').unwrap();
        assert_eq!(records.rows()[0], vec![Value::from("1"), Value::Null, Value::Null]);
        assert_eq!(records.rows()[1].len(), 3);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let records = parser.parse_bytes(b"WHITE,Medicare\nASIAN,Other", b',').unwrap();
        assert_eq!(records.fields(), &["column_1", "column_2"]);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"race,insurance\n", b',').unwrap_err();
        assert!(matches!(err, AdmissionsError::EmptyData(_)));
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let records = parser.parse_str("race\nWHITE\nBLACK\n").unwrap();
        assert_eq!(records.len(), 1);
    }
}
