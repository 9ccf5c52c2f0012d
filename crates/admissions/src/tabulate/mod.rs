//! Frequency and contingency tables over classified records.

mod request;
mod table;
mod tabulator;

pub use request::TabulationRequest;
pub use table::{CrossTable, Facet, FrequencyTable, Slice, Table, TableSet};
pub use tabulator::Tabulator;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::record::RecordSet;

static DEFAULT_TABULATOR: Lazy<Tabulator> = Lazy::new(Tabulator::default);

/// Tabulate with the default field catalog.
pub fn tabulate(
    records: &RecordSet,
    row: &str,
    col: Option<&str>,
    facet: Option<&str>,
) -> Result<TableSet> {
    let mut request = TabulationRequest::new(row);
    if let Some(col) = col {
        request = request.with_col(col);
    }
    if let Some(facet) = facet {
        request = request.with_facet(facet);
    }
    DEFAULT_TABULATOR.tabulate(records, &request)
}
