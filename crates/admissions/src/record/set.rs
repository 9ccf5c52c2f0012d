//! Ordered record sets sharing one field schema.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::value::Value;

/// An ordered sequence of records over a shared field schema.
///
/// Storage is row-major; every row holds exactly one value per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecordSet")]
pub struct RecordSet {
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Serialized form; rows are normalized to the schema width on the way in.
#[derive(Deserialize)]
struct RawRecordSet {
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl From<RawRecordSet> for RecordSet {
    fn from(raw: RawRecordSet) -> Self {
        RecordSet::new(raw.fields, raw.rows)
    }
}

impl RecordSet {
    /// Create a record set, padding short rows with nulls and truncating long ones.
    pub fn new(fields: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = fields.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { fields, rows }
    }

    /// Build a record set from per-record `(field, value)` pairs.
    ///
    /// Fields are ordered by first appearance; a field a record does not
    /// mention is null for that record.
    pub fn from_records<R, K, V>(records: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields: Vec<String> = Vec::new();
        let mut sparse: Vec<Vec<(usize, Value)>> = Vec::new();

        for record in records {
            let mut cells = Vec::new();
            for (key, value) in record {
                let key = key.into();
                let index = match fields.iter().position(|f| *f == key) {
                    Some(i) => i,
                    None => {
                        fields.push(key);
                        fields.len() - 1
                    }
                };
                cells.push((index, value.into()));
            }
            sparse.push(cells);
        }

        let width = fields.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row = vec![Value::Null; width];
                for (index, value) in cells {
                    row[index] = value;
                }
                row
            })
            .collect();

        Self { fields, rows }
    }

    /// Field names in schema order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a field in the schema.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Check whether the schema contains a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.field_index(field).is_some()
    }

    /// All values of a field, in record order.
    pub fn column(&self, field: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.field_index(field)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Borrow a single record.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            fields: &self.fields,
            values,
        })
    }

    /// Iterate over records in order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            fields: &self.fields,
            values,
        })
    }

    /// Raw rows in record order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Add a column, or overwrite it when the field already exists.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold exactly one value per record.
    pub fn add_field(&mut self, name: impl Into<String>, values: Vec<Value>) {
        assert_eq!(
            values.len(),
            self.rows.len(),
            "derived field must have one value per record"
        );
        let name = name.into();
        match self.field_index(&name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.fields.push(name);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Copy the records at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> RecordSet {
        RecordSet {
            fields: self.fields.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// SHA-256 over the schema and every value, formatted as `sha256:<hex>`.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for field in &self.fields {
            hasher.update(field.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
        for row in &self.rows {
            for value in row {
                match value {
                    Value::Null => hasher.update([0x00]),
                    Value::Text(s) => {
                        hasher.update([0x01]);
                        hasher.update(s.as_bytes());
                    }
                    Value::Number(n) => {
                        hasher.update([0x02]);
                        hasher.update(n.to_le_bytes());
                    }
                }
                hasher.update([0x1f]);
            }
            hasher.update([0x1e]);
        }
        format!("sha256:{:x}", hasher.finalize())
    }
}

/// A borrowed view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    /// Value of a field, or `None` when the schema has no such field.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        let index = self.fields.iter().position(|f| f == field)?;
        self.values.get(index)
    }

    /// Iterate over `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.fields
            .iter()
            .map(|f| f.as_str())
            .zip(self.values.iter())
    }
}
