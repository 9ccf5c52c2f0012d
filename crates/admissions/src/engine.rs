//! Main `Engine` struct and public API.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{CacheStats, ClassifiedCache};
use crate::catalog::FieldCatalog;
use crate::classify::Classifier;
use crate::error::{AdmissionsError, Result};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::record::RecordSet;
use crate::tabulate::{FrequencyTable, TableSet, TabulationRequest, Tabulator};

/// Configuration for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// JSON file of rule sets overriding the built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,
    /// Selectable fields.
    pub catalog: FieldCatalog,
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| AdmissionsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| {
            AdmissionsError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }
}

/// A classified record set ready for tabulation.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source file metadata, when loaded from a file.
    pub source: Option<SourceMetadata>,
    /// Content hash of the raw records; the cache key.
    pub key: String,
    /// Records with every derived field added. Shared read-only.
    pub records: Arc<RecordSet>,
}

/// Per-field summary of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSummary {
    pub id: String,
    pub label: String,
    /// Distinct non-null values.
    pub distinct: usize,
    pub nulls: usize,
}

/// Summary of a classified dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub fields: Vec<FieldSummary>,
}

/// Loads, classifies and tabulates admission records.
pub struct Engine {
    parser: Parser,
    classifier: Classifier,
    tabulator: Tabulator,
    cache: ClassifiedCache,
}

impl Engine {
    /// Create an engine with built-in rules and the default catalog.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            classifier: Classifier::new(),
            tabulator: Tabulator::default(),
            cache: ClassifiedCache::new(),
        }
    }

    /// Create an engine from a configuration, reading its rules file if set.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let classifier = match &config.rules_path {
            Some(path) => Classifier::from_json_file(path)?,
            None => Classifier::new(),
        };
        Ok(Self {
            parser: Parser::with_config(config.parser),
            classifier,
            tabulator: Tabulator::new(config.catalog),
            cache: ClassifiedCache::new(),
        })
    }

    /// Replace the classifier. Cached classifications are discarded.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self.cache.clear();
        self
    }

    /// Replace the field catalog.
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.tabulator = Tabulator::new(catalog);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.tabulator.catalog()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Parse and classify a file, reusing a cached classification of identical content.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Dataset> {
        let (raw, source) = self.parser.parse_file(path)?;
        let classifier = &self.classifier;
        let records = self
            .cache
            .get_or_classify(&source.hash, || Ok(classifier.classify_all(&raw)))?;

        info!(
            file = %source.file,
            records = records.len(),
            hash = %source.hash,
            "loaded dataset"
        );

        Ok(Dataset {
            key: source.hash.clone(),
            source: Some(source),
            records,
        })
    }

    /// Classify an in-memory record set.
    pub fn load_records(&mut self, raw: RecordSet) -> Result<Dataset> {
        let key = raw.content_hash();
        let classifier = &self.classifier;
        let records = self
            .cache
            .get_or_classify(&key, || Ok(classifier.classify_all(&raw)))?;
        Ok(Dataset {
            source: None,
            key,
            records,
        })
    }

    /// Run a tabulation request against a dataset.
    pub fn tabulate(&self, dataset: &Dataset, request: &TabulationRequest) -> Result<TableSet> {
        self.tabulator.tabulate(&dataset.records, request)
    }

    /// One distribution per catalog field.
    pub fn overview(&self, dataset: &Dataset) -> Result<Vec<FrequencyTable>> {
        self.tabulator.overview(&dataset.records)
    }

    /// Count records, and distinct and null values per catalog field.
    pub fn summarize(&self, dataset: &Dataset) -> Result<DatasetSummary> {
        let records = &dataset.records;
        let fields = self
            .catalog()
            .iter()
            .map(|spec| -> Result<FieldSummary> {
                let column = records
                    .column(&spec.id)
                    .ok_or_else(|| AdmissionsError::MissingField(spec.id.clone()))?;
                let mut distinct = HashSet::new();
                let mut nulls = 0;
                for value in column {
                    match value.as_label() {
                        Some(label) => {
                            distinct.insert(label);
                        }
                        None => nulls += 1,
                    }
                }
                Ok(FieldSummary {
                    id: spec.id.clone(),
                    label: spec.label.clone(),
                    distinct: distinct.len(),
                    nulls,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DatasetSummary {
            records: records.len(),
            fields,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
