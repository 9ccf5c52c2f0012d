//! Rule-driven classification of messy categorical fields.
//!
//! Each classified source field owns an ordered [`RuleSet`]: a list of
//! `(predicate, label)` rules evaluated first-match-wins against the
//! upper-cased value, plus a mandatory fallback. Classification is total:
//! every value, including nulls and numbers, receives exactly one label.

mod builtin;
mod classifier;
mod rule;

pub use builtin::builtin_rule_sets;
pub use classifier::Classifier;
pub use rule::{Fallback, Predicate, Rule, RuleSet, RuleSetBuilder, RuleSetSpec};

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::record::{RecordSet, Value};

static DEFAULT_CLASSIFIER: Lazy<Classifier> = Lazy::new(Classifier::new);

/// Classify one raw value of `field` with the built-in rule sets.
pub fn classify(field: &str, value: &Value) -> Result<String> {
    DEFAULT_CLASSIFIER.classify(field, value)
}

/// Add every built-in derived field to a copy of `records`.
pub fn classify_all(records: &RecordSet) -> RecordSet {
    DEFAULT_CLASSIFIER.classify_all(records)
}
