//! The catalog of selectable fields.
//!
//! The catalog is data: it restricts which fields a caller may tabulate,
//! supplies their display labels, and declares the optional canonical order
//! some fields are always listed in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AdmissionsError, Result};

/// Maximum number of fields one tabulation request may select.
pub const MAX_SELECTED_FIELDS: usize = 3;

/// Display order for simplified race labels.
pub const RACE_ORDER: &[&str] = &["White", "Black", "Hispanic / Latino", "Other / Unknown"];

/// Display order for simplified discharge locations.
pub const DISCHARGE_ORDER: &[&str] = &[
    "Death / Hospice",
    "Home / Community",
    "Skilled Nursing / Rehab",
    "Other Facility",
    "Other / Unknown",
];

/// One selectable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field identifier, as it appears in the classified record set.
    pub id: String,
    /// Human-readable label for headers.
    pub label: String,
    /// Fixed display order overriding frequency order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_order: Option<Vec<String>>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            canonical_order: None,
        }
    }

    /// Declare a canonical display order.
    pub fn with_canonical_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_order = Some(order.into_iter().map(Into::into).collect());
        self
    }
}

/// Ordered mapping from field id to its spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldCatalog {
    fields: IndexMap<String, FieldSpec>,
}

impl FieldCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Add or replace a field.
    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(spec.id.clone(), spec);
        self
    }

    /// Look up a field, failing with `InvalidField` when it is not selectable.
    pub fn get(&self, id: &str) -> Result<&FieldSpec> {
        self.fields
            .get(id)
            .ok_or_else(|| AdmissionsError::invalid_field(id, self.ids()))
    }

    /// Display label for a field id.
    pub fn label(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(|f| f.label.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Field ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Field specs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check a user selection: known fields only, at most [`MAX_SELECTED_FIELDS`].
    ///
    /// The tabulator relies on callers doing this; it never enforces the count.
    pub fn validate_selection(&self, selection: &[&str]) -> Result<()> {
        if selection.is_empty() {
            return Err(AdmissionsError::EmptySelection);
        }
        if selection.len() > MAX_SELECTED_FIELDS {
            return Err(AdmissionsError::TooManyFields {
                selected: selection.len(),
                max: MAX_SELECTED_FIELDS,
            });
        }
        for id in selection {
            self.get(id)?;
        }
        Ok(())
    }
}

impl Default for FieldCatalog {
    /// The six admission fields, in dashboard order.
    fn default() -> Self {
        Self::empty()
            .with_field(
                FieldSpec::new("race_simplified", "Race")
                    .with_canonical_order(RACE_ORDER.iter().copied()),
            )
            .with_field(FieldSpec::new("admission_loc_simple", "Admission Location"))
            .with_field(FieldSpec::new("insurance", "Insurance"))
            .with_field(FieldSpec::new("marital_status", "Marital Status"))
            .with_field(FieldSpec::new("admission_type_simple", "Admission Type"))
            .with_field(
                FieldSpec::new("discharge_loc_simple", "Discharge Location")
                    .with_canonical_order(DISCHARGE_ORDER.iter().copied()),
            )
    }
}

impl From<Vec<FieldSpec>> for FieldCatalog {
    fn from(specs: Vec<FieldSpec>) -> Self {
        specs
            .into_iter()
            .fold(Self::empty(), |catalog, spec| catalog.with_field(spec))
    }
}

impl From<FieldCatalog> for Vec<FieldSpec> {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.fields.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;

    #[test]
    fn test_default_catalog_order_and_labels() {
        let catalog = FieldCatalog::default();
        assert_eq!(
            catalog.ids().collect::<Vec<_>>(),
            vec![
                "race_simplified",
                "admission_loc_simple",
                "insurance",
                "marital_status",
                "admission_type_simple",
                "discharge_loc_simple",
            ]
        );
        assert_eq!(catalog.label("discharge_loc_simple"), Some("Discharge Location"));
        assert_eq!(catalog.label("race"), None);
    }

    #[test]
    fn test_catalog_in_sync_with_classifier() {
        let classifier = Classifier::new();
        let targets: Vec<&str> = classifier.targets().collect();
        for id in FieldCatalog::default().ids() {
            assert!(
                targets.contains(&id) || id == "insurance",
                "catalog field '{}' has no classifier output",
                id
            );
        }
    }

    #[test]
    fn test_canonical_orders_cover_vocabularies() {
        let classifier = Classifier::new();
        let catalog = FieldCatalog::default();
        for (source, target) in [
            ("race", "race_simplified"),
            ("discharge_location", "discharge_loc_simple"),
        ] {
            let mut vocabulary = classifier.rule_set(source).unwrap().vocabulary().unwrap();
            let mut order: Vec<&str> = catalog
                .get(target)
                .unwrap()
                .canonical_order
                .as_ref()
                .unwrap()
                .iter()
                .map(|s| s.as_str())
                .collect();
            vocabulary.sort();
            order.sort();
            assert_eq!(vocabulary, order);
        }
    }

    #[test]
    fn test_unknown_field_is_invalid() {
        let err = FieldCatalog::default().get("los_hours").unwrap_err();
        match err {
            AdmissionsError::InvalidField { field, expected } => {
                assert_eq!(field, "los_hours");
                assert!(expected.contains("race_simplified"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_selection() {
        let catalog = FieldCatalog::default();
        assert!(catalog.validate_selection(&["race_simplified"]).is_ok());
        assert!(catalog
            .validate_selection(&["race_simplified", "insurance", "marital_status"])
            .is_ok());
        assert!(matches!(
            catalog.validate_selection(&[]),
            Err(AdmissionsError::EmptySelection)
        ));
        assert!(matches!(
            catalog.validate_selection(&[
                "race_simplified",
                "insurance",
                "marital_status",
                "admission_type_simple"
            ]),
            Err(AdmissionsError::TooManyFields { selected: 4, max: 3 })
        ));
        assert!(matches!(
            catalog.validate_selection(&["race"]),
            Err(AdmissionsError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let catalog = FieldCatalog::default();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: FieldCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
