//! Built-in rule sets for the admissions table.

use super::rule::RuleSet;

/// The five built-in rule sets, in evaluation order.
pub fn builtin_rule_sets() -> Vec<RuleSet> {
    vec![
        race(),
        marital_status(),
        admission_location(),
        admission_type(),
        discharge_location(),
    ]
}

fn race() -> RuleSet {
    // Nulls are stringified and fall through to the default.
    RuleSet::builder("race", "race_simplified")
        .contains(["HISPANIC", "LATINO"], "Hispanic / Latino")
        .contains(["BLACK"], "Black")
        .contains(["WHITE"], "White")
        .equals(["PORTUGUESE"], "White")
        .fallback("Other / Unknown")
}

fn marital_status() -> RuleSet {
    RuleSet::builder("marital_status", "marital_status")
        .missing("Unknown")
        .equals(["?", ""], "Unknown")
        .passthrough()
}

fn admission_location() -> RuleSet {
    RuleSet::builder("admission_location", "admission_loc_simple")
        .missing("Unknown")
        .contains(["EMERGENCY"], "Emergency")
        .contains(["REFERRAL", "WALK-IN", "SELF", "PROCEDURE"], "Referral")
        .contains(["TRANSFER"], "Transfer")
        .contains(["PACU"], "PACU")
        .fallback("Unknown")
}

fn admission_type() -> RuleSet {
    RuleSet::builder("admission_type", "admission_type_simple")
        .missing("Other")
        .contains(["EMER", "URGENT"], "Emergency / Urgent")
        .contains(["OBSERVATION"], "Observation")
        .contains(["SURGICAL SAME DAY", "ELECTIVE"], "Elective / Scheduled")
        .fallback("Other")
}

fn discharge_location() -> RuleSet {
    RuleSet::builder("discharge_location", "discharge_loc_simple")
        .missing("Other / Unknown")
        .contains(["DIED", "HOSPICE"], "Death / Hospice")
        .contains(["HOME", "AGAINST ADVICE"], "Home / Community")
        .contains(["SKILLED NURSING", "REHAB"], "Skilled Nursing / Rehab")
        .contains(
            ["CHRONIC", "LONG TERM", "ACUTE HOSPITAL", "PSYCH"],
            "Other Facility",
        )
        .fallback("Other / Unknown")
}
