//! Fuzz target for classification and tabulation.
//!
//! Any parsed file must classify without panicking, and every catalog
//! field must tabulate once the derived fields are present.

#![no_main]

use admissions::{Parser, ParserConfig, TabulationRequest, Tabulator, classify_all};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    // The fuzzed text fills every source column of a single record.
    let csv = format!(
        "race\tmarital_status\tadmission_location\tadmission_type\tdischarge_location\tinsurance\n{0}\t{0}\t{0}\t{0}\t{0}\t{0}\n",
        content.replace(['\t', '\n', '\r', '"'], " ")
    );
    let parser = Parser::with_config(ParserConfig {
        delimiter: Some(b'\t'),
        ..ParserConfig::default()
    });
    let Ok(records) = parser.parse_str(&csv) else {
        return;
    };

    let classified = classify_all(&records);
    let tabulator = Tabulator::default();
    assert!(tabulator.overview(&classified).is_ok());

    let request = TabulationRequest::new("race_simplified")
        .with_col("admission_type_simple")
        .with_facet("marital_status");
    assert!(tabulator.tabulate(&classified, &request).is_ok());
});
