//! Writing classified records and tables to CSV, TSV and JSON.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AdmissionsError, Result};
use crate::record::{RecordSet, Value};
use crate::tabulate::{Slice, Table, TableSet};

/// Output format for record sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl RecordFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RecordFormat::Csv => "csv",
            RecordFormat::Tsv => "tsv",
            RecordFormat::Json => "json",
        }
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(RecordFormat::Csv),
            "tsv" => Ok(RecordFormat::Tsv),
            "json" => Ok(RecordFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

/// Write records; nulls become empty cells in delimited output and `null` in JSON.
pub fn write_records<W: Write>(records: &RecordSet, writer: W, format: RecordFormat) -> Result<()> {
    match format {
        RecordFormat::Csv => write_delimited(records, writer, b','),
        RecordFormat::Tsv => write_delimited(records, writer, b'\t'),
        RecordFormat::Json => {
            let rows: Vec<IndexMap<&str, &Value>> =
                records.records().map(|r| r.iter().collect()).collect();
            serde_json::to_writer_pretty(writer, &rows)?;
            Ok(())
        }
    }
}

/// Write records to a file, creating parent directories as needed.
pub fn save_records(
    records: &RecordSet,
    path: impl AsRef<Path>,
    format: RecordFormat,
) -> Result<()> {
    let file = create_file(path.as_ref())?;
    write_records(records, BufWriter::new(file), format)
}

fn write_delimited<W: Write>(records: &RecordSet, writer: W, delimiter: u8) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    out.write_record(records.fields())?;
    for row in records.rows() {
        out.write_record(row.iter().map(|v| match v {
            v if v.is_null() => String::new(),
            other => other.to_string(),
        }))?;
    }
    out.flush().map_err(|e| AdmissionsError::Persistence(format!("Failed to flush: {}", e)))?;
    Ok(())
}

/// Write a table set in long form: `facet,row,column,count,status`.
///
/// Frequency tables leave `column` blank; unfaceted results leave `facet`
/// blank. An empty slice is written as one line with status `empty` and no
/// count, so "no data" stays distinguishable from a zero cell.
pub fn write_table_set_csv<W: Write>(set: &TableSet, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["facet", "row", "column", "count", "status"])?;

    match set {
        TableSet::Single(slice) => write_slice(&mut out, "", slice)?,
        TableSet::Faceted { facets, .. } => {
            for facet in facets {
                write_slice(&mut out, &facet.value, &facet.slice)?;
            }
        }
    }

    out.flush().map_err(|e| AdmissionsError::Persistence(format!("Failed to flush: {}", e)))?;
    Ok(())
}

fn write_slice<W: Write>(out: &mut csv::Writer<W>, facet: &str, slice: &Slice) -> Result<()> {
    match slice {
        Slice::Empty => out.write_record([facet, "", "", "", "empty"])?,
        Slice::Table(Table::Frequency(table)) => {
            for (label, count) in &table.entries {
                out.write_record([facet, label.as_str(), "", count.to_string().as_str(), "table"])?;
            }
        }
        Slice::Table(Table::Cross(table)) => {
            for (r, row_label) in table.row_labels.iter().enumerate() {
                for (c, col_label) in table.col_labels.iter().enumerate() {
                    out.write_record([
                        facet,
                        row_label.as_str(),
                        col_label.as_str(),
                        table.counts[r][c].to_string().as_str(),
                        "table",
                    ])?;
                }
            }
        }
    }
    Ok(())
}

/// Save a table set as pretty JSON.
pub fn save_table_set_json(set: &TableSet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = create_file(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), set).map_err(|e| {
        AdmissionsError::Persistence(format!("Failed to serialize tables: {}", e))
    })
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                AdmissionsError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    File::create(path).map_err(|e| {
        AdmissionsError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_all;
    use crate::tabulate::tabulate;

    fn records() -> RecordSet {
        RecordSet::from_records(vec![
            vec![("race", Some("WHITE")), ("insurance", Some("Medicare"))],
            vec![("race", Some("ASIAN")), ("insurance", None)],
        ])
    }

    #[test]
    fn test_write_csv_blanks_nulls() {
        let mut buf = Vec::new();
        write_records(&records(), &mut buf, RecordFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "race,insurance\nWHITE,Medicare\nASIAN,\n");
    }

    #[test]
    fn test_write_json_keeps_field_order() {
        let mut buf = Vec::new();
        write_records(&records(), &mut buf, RecordFormat::Json).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let race = text.find("\"race\"").unwrap();
        let insurance = text.find("\"insurance\"").unwrap();
        assert!(race < insurance);
        assert!(text.contains("null"));
    }

    #[test]
    fn test_table_set_csv_marks_empty_slices() {
        let classified = classify_all(&records());
        let set = tabulate(
            &classified,
            "race_simplified",
            Some("insurance"),
            Some("race_simplified"),
        )
        .unwrap();

        let mut buf = Vec::new();
        write_table_set_csv(&set, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "facet,row,column,count,status");
        assert!(lines.contains(&"Other / Unknown,,,,empty"));
        assert!(lines.contains(&"White,White,Medicare,1,table"));
    }

    #[test]
    fn test_save_records_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("classified.tsv");
        save_records(&records(), &path, RecordFormat::Tsv).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("race\tinsurance\n"));
    }

    #[test]
    fn test_record_format_from_str() {
        assert_eq!("TSV".parse::<RecordFormat>().unwrap(), RecordFormat::Tsv);
        assert!("xlsx".parse::<RecordFormat>().is_err());
    }
}
