//! Fuzz test for the CQL parser
//!
//! Runs arbitrary UTF-8 through statement and script parsing. Every outcome
//! must be a value, never a panic or a stack overflow, and every diagnostic
//! must carry a usable position.
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use cql_parser::{parse_script_with, parse_statement, ParserConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Err(err) = parse_statement(input) {
            let pos = err.position();
            assert!(pos.line >= 1, "Error line should be >= 1");
            assert!(pos.column >= 1, "Error column should be >= 1");
            assert!(!err.to_string().is_empty(), "Error message should not be empty");
        }

        for recover in [true, false] {
            let config = ParserConfig::default().with_recovery(recover);
            let output = parse_script_with(input, &config);
            for diagnostic in &output.diagnostics {
                assert!(diagnostic.position.line >= 1);
                assert!(diagnostic.position.column >= 1);
                assert!(diagnostic.position.offset <= input.len());
            }
            if !recover {
                assert!(output.errors().count() <= 1);
            }
        }
    }
});
