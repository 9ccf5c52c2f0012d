//! Admissions: categorical normalization and contingency tables for
//! hospital admission records.
//!
//! Raw admission records carry messy free-text fields (race, admission and
//! discharge locations, admission type, marital status). This crate collapses
//! them into small, stable category sets with ordered first-match-wins rules,
//! then cross-tabulates up to three fields at a time.
//!
//! # Core Principles
//!
//! - **Total classification**: every raw value maps to exactly one label
//! - **Non-destructive**: derived fields are added next to the raw ones
//! - **Dense tables**: every observed row × column pair has a cell
//!
//! # Example
//!
//! ```no_run
//! use admissions::{Engine, TabulationRequest};
//!
//! let mut engine = Engine::new();
//! let dataset = engine.load("admissions.csv").unwrap();
//!
//! let request = TabulationRequest::new("race_simplified").with_col("insurance");
//! let tables = engine.tabulate(&dataset, &request).unwrap();
//! println!("{}", serde_json::to_string_pretty(&tables).unwrap());
//! ```

pub mod cache;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod export;
pub mod input;
pub mod record;
pub mod tabulate;

mod engine;

pub use crate::engine::{Dataset, DatasetSummary, Engine, EngineConfig, FieldSummary};
pub use cache::{CacheStats, ClassifiedCache};
pub use catalog::{FieldCatalog, FieldSpec, MAX_SELECTED_FIELDS};
pub use classify::{Classifier, Fallback, Predicate, Rule, RuleSet, classify, classify_all};
pub use error::{AdmissionsError, Result};
pub use export::RecordFormat;
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use record::{Record, RecordSet, Value};
pub use tabulate::{
    CrossTable, Facet, FrequencyTable, Slice, Table, TableSet, TabulationRequest, Tabulator,
    tabulate,
};
