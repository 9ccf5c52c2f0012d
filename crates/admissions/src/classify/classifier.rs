//! Classifier over a collection of per-field rule sets.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::builtin::builtin_rule_sets;
use super::rule::RuleSet;
use crate::error::{AdmissionsError, Result};
use crate::record::{RecordSet, Value};

/// Classifies raw field values with one rule set per source field.
#[derive(Debug, Clone)]
pub struct Classifier {
    rule_sets: Vec<RuleSet>,
}

impl Classifier {
    /// Create a classifier with the built-in rule sets.
    pub fn new() -> Self {
        Self {
            rule_sets: builtin_rule_sets(),
        }
    }

    /// Create a classifier with exactly the given rule sets.
    pub fn with_rule_sets(rule_sets: Vec<RuleSet>) -> Self {
        Self { rule_sets }
    }

    /// Add a rule set, replacing any existing one for the same source field.
    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        match self
            .rule_sets
            .iter_mut()
            .find(|s| s.source() == rule_set.source())
        {
            Some(existing) => *existing = rule_set,
            None => self.rule_sets.push(rule_set),
        }
        self
    }

    /// Built-in rule sets overridden by a JSON array of rule sets.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: Vec<RuleSet> = serde_json::from_str(json)?;
        Ok(overrides
            .into_iter()
            .fold(Self::new(), |classifier, set| classifier.with_rule_set(set)))
    }

    /// Built-in rule sets overridden by a JSON rules file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| AdmissionsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// All rule sets in evaluation order.
    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// The rule set reading `field`.
    pub fn rule_set(&self, field: &str) -> Option<&RuleSet> {
        self.rule_sets.iter().find(|s| s.source() == field)
    }

    /// Names of every derived field this classifier writes.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.iter().map(|s| s.target())
    }

    /// Classify one raw value of a source field.
    pub fn classify(&self, field: &str, value: &Value) -> Result<String> {
        self.rule_set(field)
            .map(|set| set.classify(value))
            .ok_or_else(|| {
                AdmissionsError::invalid_field(field, self.rule_sets.iter().map(|s| s.source()))
            })
    }

    /// Return a copy of `records` enriched with every derived field.
    ///
    /// Original fields and record order are preserved. All derived values are
    /// computed from the input before any is written, so a rule set that
    /// normalizes its field in place never feeds another rule set. A source
    /// field absent from the record set is classified as all-null.
    pub fn classify_all(&self, records: &RecordSet) -> RecordSet {
        let derived: Vec<(&str, Vec<Value>)> = self
            .rule_sets
            .iter()
            .map(|set| {
                let values = match records.column(set.source()) {
                    Some(column) => column.map(|v| set.apply(v)).collect(),
                    None => {
                        warn!(field = set.source(), "source field missing; classifying as null");
                        vec![set.apply(&Value::Null); records.len()]
                    }
                };
                (set.target(), values)
            })
            .collect();

        let mut enriched = records.clone();
        for (target, values) in derived {
            enriched.add_field(target, values);
        }

        debug!(
            records = enriched.len(),
            derived_fields = self.rule_sets.len(),
            "classified record set"
        );
        enriched
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> RecordSet {
        RecordSet::from_records(vec![
            vec![("race", Some("WHITE")), ("marital_status", None)],
            vec![("race", Some("White - Portuguese")), ("marital_status", Some("?"))],
            vec![("race", Some("BLACK/AFRICAN AMERICAN")), ("marital_status", Some(""))],
            vec![("race", Some("UNKNOWN")), ("marital_status", Some("MARRIED"))],
        ])
    }

    fn column(set: &RecordSet, field: &str) -> Vec<String> {
        set.column(field).unwrap().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_classify_unknown_field() {
        let err = Classifier::new()
            .classify("insurance", &Value::from("Medicare"))
            .unwrap_err();
        assert!(matches!(err, AdmissionsError::InvalidField { .. }));
    }

    #[test]
    fn test_classify_all_adds_derived_fields() {
        let enriched = Classifier::new().classify_all(&records());

        assert_eq!(
            column(&enriched, "race_simplified"),
            vec!["White", "White", "Black", "Other / Unknown"]
        );
        assert_eq!(
            column(&enriched, "marital_status"),
            vec!["Unknown", "Unknown", "Unknown", "MARRIED"]
        );
        // Missing source fields still produce a derived column.
        assert_eq!(
            column(&enriched, "discharge_loc_simple"),
            vec!["Other / Unknown"; 4]
        );
        assert_eq!(column(&enriched, "admission_type_simple"), vec!["Other"; 4]);
        // Raw race is untouched.
        assert_eq!(column(&enriched, "race")[1], "White - Portuguese");
        assert_eq!(&enriched.fields()[..2], &["race", "marital_status"]);
    }

    #[test]
    fn test_classify_all_is_deterministic() {
        let classifier = Classifier::new();
        let input = records();
        let first = classifier.classify_all(&input);
        let second = classifier.classify_all(&input);
        assert_eq!(first.content_hash(), second.content_hash());
    }

    #[test]
    fn test_classify_all_on_classified_set_is_stable() {
        let classifier = Classifier::new();
        let once = classifier.classify_all(&records());
        let twice = classifier.classify_all(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_json_override_replaces_builtin() {
        let json = r#"[{
            "source": "race",
            "target": "race_simplified",
            "rules": [{"when": {"type": "contains", "any": ["asian"]}, "label": "Asian"}],
            "fallback": {"label": "Other"}
        }]"#;
        let classifier = Classifier::from_json_str(json).unwrap();
        assert_eq!(classifier.rule_sets().len(), 5);
        assert_eq!(
            classifier.classify("race", &Value::from("ASIAN - CHINESE")).unwrap(),
            "Asian"
        );
        assert_eq!(classifier.classify("race", &Value::from("WHITE")).unwrap(), "Other");
    }

    #[test]
    fn test_json_adds_new_field() {
        let json = r#"[{
            "source": "insurance",
            "target": "insurance_simple",
            "rules": [{"when": {"type": "contains", "any": ["MEDIC"]}, "label": "Public"}],
            "fallback": {"label": "Private / Other"}
        }]"#;
        let classifier = Classifier::from_json_str(json).unwrap();
        assert_eq!(classifier.targets().last(), Some("insurance_simple"));
        assert_eq!(
            classifier.classify("insurance", &Value::from("Medicaid")).unwrap(),
            "Public"
        );
    }

    #[test]
    fn test_json_invalid_regex_rejected() {
        let json = r#"[{
            "source": "race",
            "target": "race_simplified",
            "rules": [{"when": {"type": "matches", "pattern": "("}, "label": "X"}],
            "fallback": "passthrough"
        }]"#;
        assert!(Classifier::from_json_str(json).is_err());
    }
}
