//! Classification rules and rule sets.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AdmissionsError, Result};
use crate::record::Value;

/// A test applied to a raw value.
///
/// Text predicates see the upper-cased string form of the value; a null is
/// stringified (`NAN`) first, so only [`Predicate::Missing`] targets nulls
/// explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// The value is missing.
    Missing,
    /// The value contains any of the keywords.
    Contains { any: Vec<String> },
    /// The value equals one of the listed strings.
    Equals { any: Vec<String> },
    /// The value matches a regular expression.
    Matches { pattern: String },
}

/// One `(predicate, label)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub when: Predicate,
    pub label: String,
}

/// What a rule set returns when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Return a fixed default label.
    Label(String),
    /// Return the raw value unchanged (cleanup passes).
    Passthrough,
}

/// Serialized form of a rule set, as read from a rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetSpec {
    /// Raw field the rules read.
    pub source: String,
    /// Derived field the label is written to.
    pub target: String,
    pub rules: Vec<Rule>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone)]
enum Matcher {
    Missing,
    Contains(Vec<String>),
    Equals(Vec<String>),
    Matches(Regex),
}

impl Matcher {
    fn matches(&self, value: &Value, upper: &str) -> bool {
        match self {
            Matcher::Missing => value.is_null(),
            Matcher::Contains(keywords) => keywords.iter().any(|k| upper.contains(k.as_str())),
            Matcher::Equals(options) => options.iter().any(|o| o == upper),
            Matcher::Matches(re) => re.is_match(upper),
        }
    }
}

/// An ordered, first-match-wins rule list for one source field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleSetSpec", into = "RuleSetSpec")]
pub struct RuleSet {
    source: String,
    target: String,
    rules: Vec<Rule>,
    matchers: Vec<Matcher>,
    fallback: Fallback,
}

impl RuleSet {
    /// Start building a rule set that reads `source` and writes `target`.
    pub fn builder(source: impl Into<String>, target: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            source: source.into(),
            target: target.into(),
            rules: Vec::new(),
            matchers: Vec::new(),
        }
    }

    /// Raw field name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Derived field name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// Classify a value, keeping passthrough values in their original form.
    pub fn apply(&self, value: &Value) -> Value {
        let upper = value.to_string().to_uppercase();
        for (matcher, rule) in self.matchers.iter().zip(&self.rules) {
            if matcher.matches(value, &upper) {
                return Value::Text(rule.label.clone());
            }
        }
        match &self.fallback {
            Fallback::Label(label) => Value::Text(label.clone()),
            Fallback::Passthrough => value.clone(),
        }
    }

    /// Classify a value to its label string.
    pub fn classify(&self, value: &Value) -> String {
        self.apply(value).to_string()
    }

    /// The closed output vocabulary, or `None` for passthrough rule sets.
    ///
    /// Labels appear in rule order, followed by the fallback label.
    pub fn vocabulary(&self) -> Option<Vec<&str>> {
        let Fallback::Label(default) = &self.fallback else {
            return None;
        };
        let mut labels: Vec<&str> = Vec::new();
        for label in self
            .rules
            .iter()
            .map(|r| r.label.as_str())
            .chain(std::iter::once(default.as_str()))
        {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        Some(labels)
    }
}

impl TryFrom<RuleSetSpec> for RuleSet {
    type Error = AdmissionsError;

    fn try_from(spec: RuleSetSpec) -> Result<Self> {
        let mut builder = RuleSet::builder(spec.source, spec.target);
        for rule in spec.rules {
            builder = builder.rule(rule)?;
        }
        Ok(match spec.fallback {
            Fallback::Label(label) => builder.fallback(label),
            Fallback::Passthrough => builder.passthrough(),
        })
    }
}

impl From<RuleSet> for RuleSetSpec {
    fn from(set: RuleSet) -> Self {
        RuleSetSpec {
            source: set.source,
            target: set.target,
            rules: set.rules,
            fallback: set.fallback,
        }
    }
}

/// Builder for [`RuleSet`]; rules are kept in the order they are added.
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    source: String,
    target: String,
    rules: Vec<Rule>,
    matchers: Vec<Matcher>,
}

impl RuleSetBuilder {
    /// Match missing values.
    pub fn missing(self, label: impl Into<String>) -> Self {
        self.push(Predicate::Missing, Matcher::Missing, label)
    }

    /// Match values containing any of `keywords` (case-insensitive).
    pub fn contains<I, S>(self, keywords: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let any = upper_all(keywords);
        self.push(
            Predicate::Contains { any: any.clone() },
            Matcher::Contains(any),
            label,
        )
    }

    /// Match values equal to one of `options` (case-insensitive).
    pub fn equals<I, S>(self, options: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let any = upper_all(options);
        self.push(
            Predicate::Equals { any: any.clone() },
            Matcher::Equals(any),
            label,
        )
    }

    /// Match values against a regex applied to the upper-cased value.
    pub fn matches(self, pattern: &str, label: impl Into<String>) -> Result<Self> {
        let re = Regex::new(pattern)?;
        Ok(self.push(
            Predicate::Matches {
                pattern: pattern.to_string(),
            },
            Matcher::Matches(re),
            label,
        ))
    }

    /// Add a rule from its serialized form.
    pub fn rule(self, rule: Rule) -> Result<Self> {
        match rule.when {
            Predicate::Missing => Ok(self.missing(rule.label)),
            Predicate::Contains { any } => Ok(self.contains(any, rule.label)),
            Predicate::Equals { any } => Ok(self.equals(any, rule.label)),
            Predicate::Matches { pattern } => self.matches(&pattern, rule.label),
        }
    }

    /// Finish with a default label.
    pub fn fallback(self, label: impl Into<String>) -> RuleSet {
        self.finish(Fallback::Label(label.into()))
    }

    /// Finish with passthrough of unmatched values.
    pub fn passthrough(self) -> RuleSet {
        self.finish(Fallback::Passthrough)
    }

    fn push(mut self, when: Predicate, matcher: Matcher, label: impl Into<String>) -> Self {
        self.rules.push(Rule {
            when,
            label: label.into(),
        });
        self.matchers.push(matcher);
        self
    }

    fn finish(self, fallback: Fallback) -> RuleSet {
        RuleSet {
            source: self.source,
            target: self.target,
            rules: self.rules,
            matchers: self.matchers,
            fallback,
        }
    }
}

fn upper_all<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> RuleSet {
        RuleSet::builder("tier", "tier_simple")
            .missing("None")
            .contains(["gold", "platinum"], "Premium")
            .equals(["basic"], "Basic")
            .fallback("Other")
    }

    #[test]
    fn test_first_match_wins() {
        let set = RuleSet::builder("x", "y")
            .contains(["A"], "first")
            .contains(["B"], "second")
            .fallback("none");
        assert_eq!(set.classify(&Value::from("AB")), "first");
        assert_eq!(set.classify(&Value::from("B")), "second");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let set = tiers();
        assert_eq!(set.classify(&Value::from("Gold member")), "Premium");
        assert_eq!(set.classify(&Value::from("BASIC")), "Basic");
        assert_eq!(set.classify(&Value::from("basic plus")), "Other");
    }

    #[test]
    fn test_missing_only_matches_null() {
        let set = tiers();
        assert_eq!(set.classify(&Value::Null), "None");
        assert_eq!(set.classify(&Value::from("nan")), "Other");
    }

    #[test]
    fn test_null_without_missing_rule_falls_through() {
        let set = RuleSet::builder("x", "y").contains(["N"], "has n").fallback("d");
        // A null stringifies to "NAN", which a text predicate can see.
        assert_eq!(set.classify(&Value::Null), "has n");
    }

    #[test]
    fn test_passthrough_keeps_original_value() {
        let set = RuleSet::builder("m", "m").missing("Unknown").passthrough();
        assert_eq!(set.apply(&Value::from("Married")), Value::from("Married"));
        assert_eq!(set.apply(&Value::from(3_i64)), Value::Number(3.0));
        assert_eq!(set.vocabulary(), None);
    }

    #[test]
    fn test_regex_rule() {
        let set = RuleSet::builder("x", "y")
            .matches(r"^\d+$", "numeric")
            .unwrap()
            .fallback("text");
        assert_eq!(set.classify(&Value::from(12_i64)), "numeric");
        assert_eq!(set.classify(&Value::from("12a")), "text");
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let result = RuleSet::builder("x", "y").matches("(unclosed", "bad");
        assert!(matches!(result, Err(AdmissionsError::Regex(_))));
    }

    #[test]
    fn test_vocabulary_dedups_in_rule_order() {
        let set = RuleSet::builder("x", "y")
            .contains(["A"], "One")
            .equals(["B"], "One")
            .contains(["C"], "Two")
            .fallback("Two");
        assert_eq!(set.vocabulary(), Some(vec!["One", "Two"]));
    }

    #[test]
    fn test_json_roundtrip_preserves_behavior() {
        let json = serde_json::to_string(&tiers()).unwrap();
        let parsed: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source(), "tier");
        assert_eq!(parsed.classify(&Value::from("platinum")), "Premium");
        assert_eq!(parsed.rules(), tiers().rules());
    }

    #[test]
    fn test_json_lowercase_keywords_are_normalized() {
        let json = r#"{
            "source": "tier",
            "target": "tier_simple",
            "rules": [{"when": {"type": "contains", "any": ["gold"]}, "label": "Premium"}],
            "fallback": {"label": "Other"}
        }"#;
        let set: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.classify(&Value::from("GOLD")), "Premium");
    }
}
