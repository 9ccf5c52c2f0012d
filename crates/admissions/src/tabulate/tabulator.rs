//! The tabulation engine.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use tracing::debug;

use super::request::TabulationRequest;
use super::table::{CrossTable, Facet, FrequencyTable, Slice, Table, TableSet};
use crate::catalog::{FieldCatalog, FieldSpec};
use crate::error::{AdmissionsError, Result};
use crate::record::RecordSet;

/// A catalog field resolved against a record set.
struct Axis<'a> {
    spec: &'a FieldSpec,
    index: usize,
}

impl Axis<'_> {
    fn canonical_order(&self) -> Option<&[String]> {
        self.spec.canonical_order.as_deref()
    }
}

/// Computes frequency and contingency tables over classified records.
///
/// The tabulator never mutates its input; concurrent requests may share one
/// record set.
#[derive(Debug, Clone, Default)]
pub struct Tabulator {
    catalog: FieldCatalog,
}

impl Tabulator {
    /// Create a tabulator restricted to the fields of `catalog`.
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Run a tabulation request.
    ///
    /// Fails with `InvalidField` when a requested field is not in the catalog
    /// and `MissingField` when the record set lacks a catalog field.
    pub fn tabulate(&self, records: &RecordSet, request: &TabulationRequest) -> Result<TableSet> {
        let row = self.resolve(records, &request.row)?;
        let col = request
            .col
            .as_deref()
            .map(|c| self.resolve(records, c))
            .transpose()?;
        let facet = request
            .facet
            .as_deref()
            .map(|f| self.resolve(records, f))
            .transpose()?;

        debug!(
            row = %request.row,
            col = ?request.col,
            facet = ?request.facet,
            records = records.len(),
            "tabulating"
        );

        let Some(facet) = facet else {
            let scope: Vec<usize> = (0..records.len()).collect();
            return Ok(TableSet::Single(slice(records, &row, col.as_ref(), &scope)));
        };

        // BTreeMap keys give ascending facet order; nulls never enter a partition.
        let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, row_values) in records.rows().iter().enumerate() {
            if let Some(value) = row_values[facet.index].as_label() {
                partitions.entry(value).or_default().push(i);
            }
        }

        let facets: Vec<Facet> = partitions
            .into_iter()
            .map(|(value, scope)| Facet {
                records: scope.len(),
                slice: slice(records, &row, col.as_ref(), &scope),
                value,
            })
            .collect();

        debug!(
            facets = facets.len(),
            empty = facets.iter().filter(|f| f.slice.is_empty()).count(),
            "faceted tabulation complete"
        );

        Ok(TableSet::Faceted {
            facet_field: facet.spec.id.clone(),
            facet_label: facet.spec.label.clone(),
            facets,
        })
    }

    /// One frequency table over all records.
    pub fn frequency(&self, records: &RecordSet, field: &str) -> Result<FrequencyTable> {
        let axis = self.resolve(records, field)?;
        let scope: Vec<usize> = (0..records.len()).collect();
        Ok(frequency_table(records, &axis, &scope))
    }

    /// One dense cross table over all records.
    pub fn cross(&self, records: &RecordSet, row: &str, col: &str) -> Result<CrossTable> {
        let row = self.resolve(records, row)?;
        let col = self.resolve(records, col)?;
        let scope: Vec<usize> = (0..records.len()).collect();
        Ok(cross_table(records, &row, &col, &scope))
    }

    /// A frequency table for every catalog field, in catalog order.
    pub fn overview(&self, records: &RecordSet) -> Result<Vec<FrequencyTable>> {
        self.catalog
            .ids()
            .map(|id| self.frequency(records, id))
            .collect()
    }

    fn resolve<'a>(&'a self, records: &RecordSet, field: &str) -> Result<Axis<'a>> {
        let spec = self.catalog.get(field)?;
        let index = records
            .field_index(&spec.id)
            .ok_or_else(|| AdmissionsError::MissingField(spec.id.clone()))?;
        Ok(Axis { spec, index })
    }
}

/// Tabulate one scope, or mark it empty when nothing in it can be counted.
fn slice(records: &RecordSet, row: &Axis<'_>, col: Option<&Axis<'_>>, scope: &[usize]) -> Slice {
    let table = match col {
        Some(col) => {
            let table = cross_table(records, row, col, scope);
            if table.total() == 0 {
                return Slice::Empty;
            }
            Table::Cross(table)
        }
        None => {
            let table = frequency_table(records, row, scope);
            if table.total() == 0 {
                return Slice::Empty;
            }
            Table::Frequency(table)
        }
    };
    Slice::Table(table)
}

/// Count non-null labels of one field over `scope`, in encounter order.
fn count_labels(records: &RecordSet, index: usize, scope: &[usize]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for &i in scope {
        if let Some(label) = records.rows()[i][index].as_label() {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Order labels for display.
///
/// Without a canonical order, labels sort by descending count; the sort is
/// stable, so ties keep encounter order. With one, canonical labels come first
/// in declared order (unobserved ones only when `include_unobserved`), then
/// any other observed labels by descending count.
fn order_labels(
    counts: &IndexMap<String, usize>,
    canonical: Option<&[String]>,
    include_unobserved: bool,
) -> Vec<String> {
    let mut by_frequency: Vec<(&String, &usize)> = counts.iter().collect();
    by_frequency.sort_by(|a, b| b.1.cmp(a.1));

    let Some(canonical) = canonical else {
        return by_frequency.into_iter().map(|(l, _)| l.clone()).collect();
    };

    let mut ordered: Vec<String> = canonical
        .iter()
        .filter(|l| include_unobserved || counts.contains_key(*l))
        .cloned()
        .collect();
    for (label, _) in by_frequency {
        if !canonical.contains(label) {
            ordered.push(label.clone());
        }
    }
    ordered
}

fn frequency_table(records: &RecordSet, axis: &Axis<'_>, scope: &[usize]) -> FrequencyTable {
    let counts = count_labels(records, axis.index, scope);
    let entries = order_labels(&counts, axis.canonical_order(), true)
        .into_iter()
        .map(|label| {
            let count = counts.get(&label).copied().unwrap_or(0);
            (label, count)
        })
        .collect();

    FrequencyTable {
        field: axis.spec.id.clone(),
        label: axis.spec.label.clone(),
        entries,
    }
}

fn cross_table(records: &RecordSet, row: &Axis<'_>, col: &Axis<'_>, scope: &[usize]) -> CrossTable {
    let mut row_counts: IndexMap<String, usize> = IndexMap::new();
    let mut col_counts: IndexMap<String, usize> = IndexMap::new();
    let mut pairs: HashMap<(String, String), usize> = HashMap::new();

    for &i in scope {
        let values = &records.rows()[i];
        let (Some(r), Some(c)) = (values[row.index].as_label(), values[col.index].as_label()) else {
            continue;
        };
        *row_counts.entry(r.clone()).or_insert(0) += 1;
        *col_counts.entry(c.clone()).or_insert(0) += 1;
        *pairs.entry((r, c)).or_insert(0) += 1;
    }

    let row_labels = order_labels(&row_counts, row.canonical_order(), false);
    let col_labels = order_labels(&col_counts, col.canonical_order(), false);

    let row_index: HashMap<&str, usize> = row_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let col_index: HashMap<&str, usize> = col_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut counts = vec![vec![0; col_labels.len()]; row_labels.len()];
    for ((r, c), count) in &pairs {
        if let (Some(&i), Some(&j)) = (row_index.get(r.as_str()), col_index.get(c.as_str())) {
            counts[i][j] = *count;
        }
    }

    CrossTable {
        row_field: row.spec.id.clone(),
        row_label: row.spec.label.clone(),
        col_field: col.spec.id.clone(),
        col_label: col.spec.label.clone(),
        row_labels,
        col_labels,
        counts,
    }
}
