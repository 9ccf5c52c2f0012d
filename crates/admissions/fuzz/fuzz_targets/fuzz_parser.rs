//! Fuzz target for the delimited-file parser.
//!
//! The parser must never panic on malformed input, whatever delimiter
//! detection decides.

#![no_main]

use admissions::Parser;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    // From a file, so delimiter detection and hashing run too.
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());
        }
    }

    let _ = Parser::new().parse_reader(data);
});
