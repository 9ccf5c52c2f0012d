//! In-memory record sets and raw cell values.

mod set;
mod value;

pub use set::{Record, RecordSet};
pub use value::Value;
