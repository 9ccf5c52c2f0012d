//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use admissions::RecordFormat;

/// Admissions: classify and cross-tabulate hospital admission records
#[derive(Parser)]
#[command(name = "admissions")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Classification rules overriding the built-ins (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the fields that can be tabulated
    Fields {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add simplified category fields to a data file
    Classify {
        /// Path to the admissions file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_classified.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: RecordFormat,
    },

    /// Count records by one field, two fields, or two fields per facet
    Tabulate {
        /// Path to the admissions file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field for table rows
        #[arg(short, long)]
        row: String,

        /// Field for table columns
        #[arg(short, long)]
        col: Option<String>,

        /// Field to split into one table per value
        #[arg(long)]
        facet: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: TableFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the distribution of every field
    Summary {
        /// Path to the admissions file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum TableFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(TableFormat::Text),
            "json" => Ok(TableFormat::Json),
            "csv" => Ok(TableFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use text, json, or csv.", s)),
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableFormat::Text => write!(f, "text"),
            TableFormat::Json => write!(f, "json"),
            TableFormat::Csv => write!(f, "csv"),
        }
    }
}
