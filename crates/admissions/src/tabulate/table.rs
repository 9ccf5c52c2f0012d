//! Table types produced by the tabulator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Counts per distinct label of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Field id.
    pub field: String,
    /// Display label of the field.
    pub label: String,
    /// Label counts in display order.
    pub entries: IndexMap<String, usize>,
}

impl FrequencyTable {
    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.values().sum()
    }

    /// Count for a label, if the label is listed.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries.get(label).copied()
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A dense row × column count matrix.
///
/// Every pair of an observed row label and an observed column label has a
/// cell, including pairs that never occur together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTable {
    pub row_field: String,
    pub row_label: String,
    pub col_field: String,
    pub col_label: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[r][c]` for `row_labels[r]` × `col_labels[c]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTable {
    /// Count for a `(row, col)` label pair.
    pub fn get(&self, row: &str, col: &str) -> Option<usize> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.col_labels.iter().position(|l| l == col)?;
        Some(self.counts[r][c])
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Number of cells, zero-count cells included.
    pub fn cell_count(&self) -> usize {
        self.counts.iter().map(|row| row.len()).sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.col_labels.len())
            .map(|c| self.counts.iter().map(|row| row[c]).sum())
            .collect()
    }
}

/// A one- or two-dimensional table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Table {
    Frequency(FrequencyTable),
    Cross(CrossTable),
}

impl Table {
    pub fn total(&self) -> usize {
        match self {
            Table::Frequency(t) => t.total(),
            Table::Cross(t) => t.total(),
        }
    }

    pub fn as_frequency(&self) -> Option<&FrequencyTable> {
        match self {
            Table::Frequency(t) => Some(t),
            Table::Cross(_) => None,
        }
    }

    pub fn as_cross(&self) -> Option<&CrossTable> {
        match self {
            Table::Cross(t) => Some(t),
            Table::Frequency(_) => None,
        }
    }
}

/// A table, or the marker for a scope that held no countable records.
///
/// `Empty` means "no data for this slice"; it is distinct from a table whose
/// cells are all zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "table", rename_all = "snake_case")]
pub enum Slice {
    Table(Table),
    Empty,
}

impl Slice {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slice::Empty)
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Slice::Table(t) => Some(t),
            Slice::Empty => None,
        }
    }
}

/// One partition of a faceted tabulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    /// The facet field's value for every record in this partition.
    pub value: String,
    /// Number of records in the partition.
    pub records: usize,
    pub slice: Slice,
}

/// The result of a tabulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum TableSet {
    /// No facet: a single table.
    Single(Slice),
    /// One slice per facet value, in ascending value order.
    Faceted {
        facet_field: String,
        facet_label: String,
        facets: Vec<Facet>,
    },
}

impl TableSet {
    /// The table of an unfaceted, non-empty result.
    pub fn single(&self) -> Option<&Table> {
        match self {
            TableSet::Single(slice) => slice.table(),
            TableSet::Faceted { .. } => None,
        }
    }

    /// Facets of a faceted result (empty for a single table).
    pub fn facets(&self) -> &[Facet] {
        match self {
            TableSet::Single(_) => &[],
            TableSet::Faceted { facets, .. } => facets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross() -> CrossTable {
        CrossTable {
            row_field: "race_simplified".into(),
            row_label: "Race".into(),
            col_field: "insurance".into(),
            col_label: "Insurance".into(),
            row_labels: vec!["White".into(), "Black".into()],
            col_labels: vec!["Medicare".into(), "Medicaid".into(), "Other".into()],
            counts: vec![vec![3, 0, 1], vec![1, 2, 0]],
        }
    }

    #[test]
    fn test_cross_table_totals() {
        let t = cross();
        assert_eq!(t.total(), 7);
        assert_eq!(t.cell_count(), 6);
        assert_eq!(t.row_totals(), vec![4, 3]);
        assert_eq!(t.col_totals(), vec![4, 2, 1]);
        assert_eq!(t.get("Black", "Medicaid"), Some(2));
        assert_eq!(t.get("White", "Medicaid"), Some(0));
        assert_eq!(t.get("Asian", "Medicaid"), None);
    }

    #[test]
    fn test_slice_json_shape() {
        let json = serde_json::to_value(&Slice::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"status": "empty"}));

        let slice = Slice::Table(Table::Cross(cross()));
        let json = serde_json::to_value(&slice).unwrap();
        assert_eq!(json["status"], "table");
        assert_eq!(json["table"]["kind"], "cross");
        assert_eq!(json["table"]["counts"][1][1], 2);
    }

    #[test]
    fn test_table_set_accessors() {
        let single = TableSet::Single(Slice::Table(Table::Cross(cross())));
        assert!(single.single().is_some());
        assert!(single.facets().is_empty());

        let faceted = TableSet::Faceted {
            facet_field: "marital_status".into(),
            facet_label: "Marital Status".into(),
            facets: vec![Facet {
                value: "MARRIED".into(),
                records: 0,
                slice: Slice::Empty,
            }],
        };
        assert!(faceted.single().is_none());
        assert!(faceted.facets()[0].slice.is_empty());
    }
}
