//! Tabulation requests.

use serde::{Deserialize, Serialize};

use crate::catalog::MAX_SELECTED_FIELDS;
use crate::error::{AdmissionsError, Result};

/// Which fields to tabulate: rows, optional columns, optional facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabulationRequest {
    pub row: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
}

impl TabulationRequest {
    /// A one-dimensional request over `row`.
    pub fn new(row: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            col: None,
            facet: None,
        }
    }

    pub fn with_col(mut self, col: impl Into<String>) -> Self {
        self.col = Some(col.into());
        self
    }

    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facet = Some(facet.into());
        self
    }

    /// Map an ordered user selection of 1 to 3 fields onto row, column and facet.
    pub fn from_selection(selection: &[&str]) -> Result<Self> {
        match selection {
            [] => Err(AdmissionsError::EmptySelection),
            [row] => Ok(Self::new(*row)),
            [row, col] => Ok(Self::new(*row).with_col(*col)),
            [row, col, facet] => Ok(Self::new(*row).with_col(*col).with_facet(*facet)),
            _ => Err(AdmissionsError::TooManyFields {
                selected: selection.len(),
                max: MAX_SELECTED_FIELDS,
            }),
        }
    }

    /// Requested fields in row, column, facet order.
    pub fn fields(&self) -> Vec<&str> {
        std::iter::once(self.row.as_str())
            .chain(self.col.as_deref())
            .chain(self.facet.as_deref())
            .collect()
    }
}
