//! Raw cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens that mark a missing cell in delimited input (compared case-insensitively).
const NULL_TOKENS: &[&str] = &["na", "n/a", "nan", "null", "none", "#n/a", "<na>"];

/// A raw value held by a record: text, a number, or missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    /// Free-text value.
    Text(String),
    /// Numeric value.
    Number(f64),
}

impl Value {
    /// Interpret a raw delimited-file cell, mapping null tokens to `Value::Null`.
    pub fn parse_cell(raw: &str) -> Self {
        if Self::is_null_token(raw) {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    /// Check if a cell's text represents a missing value.
    ///
    /// `?` is not a null token; the marital-status rules map it to `Unknown`.
    pub fn is_null_token(raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
    }

    /// Returns true for `Value::Null` and for a NaN number.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(_) => false,
        }
    }

    /// The category label for this value, or `None` when it is missing.
    pub fn as_label(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Borrow the text of a `Value::Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nan"),
            Value::Number(n) if n.is_nan() => write!(f, "nan"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Option<&str>> for Value {
    fn from(s: Option<&str>) -> Self {
        s.map(Value::from).unwrap_or(Value::Null)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map(Value::Text).unwrap_or(Value::Null)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        if n.is_nan() {
            Value::Null
        } else {
            Value::Number(n)
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_token() {
        assert!(Value::is_null_token(""));
        assert!(Value::is_null_token("  "));
        assert!(Value::is_null_token("NA"));
        assert!(Value::is_null_token("n/a"));
        assert!(Value::is_null_token("NaN"));
        assert!(Value::is_null_token("None"));
        assert!(Value::is_null_token("#N/A"));
        assert!(!Value::is_null_token("?"));
        assert!(!Value::is_null_token("MARRIED"));
        assert!(!Value::is_null_token("0"));
    }

    #[test]
    fn test_nan_number_is_missing() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        let raw = Value::Number(f64::NAN);
        assert!(raw.is_null());
        assert_eq!(raw.as_label(), None);
        assert_eq!(raw.to_string(), "nan");
        assert!(!Value::from(0.0).is_null());
    }

    #[test]
    fn test_display_stringifies() {
        assert_eq!(Value::Null.to_string(), "nan");
        assert_eq!(Value::from("WHITE").to_string(), "WHITE");
        assert_eq!(Value::from(42_i64).to_string(), "42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_as_label_skips_null() {
        assert_eq!(Value::Null.as_label(), None);
        assert_eq!(Value::from("Medicare").as_label(), Some("Medicare".to_string()));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn test_json_shape() {
        let values = vec![Value::Null, Value::from("SINGLE"), Value::from(3.0)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,"SINGLE",3.0]"#);
    }
}
