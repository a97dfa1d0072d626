//! Fuzz test for the CQL lexer
//!
//! Feeds arbitrary bytes to the lexer looking for panics, hangs and
//! tokens that do not tile the input.
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use cql_parser::{Lexer, TokenKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut lexer = match Lexer::from_utf8(data) {
        Ok(lexer) => lexer,
        Err(err) => {
            assert!(err.position.line >= 1, "Line numbers should be >= 1");
            assert!(err.position.offset <= data.len());
            return;
        }
    };

    let tokens = lexer.tokenize_with_trivia();
    assert_eq!(
        tokens.last().map(|t| &t.kind),
        Some(&TokenKind::Eof),
        "Last token should always be Eof"
    );

    let mut offset = 0;
    for token in &tokens {
        assert_eq!(token.span.start, offset, "Tokens should tile the input");
        assert!(token.span.start <= token.span.end, "Span start should be <= end");
        assert!(token.span.line >= 1, "Line numbers should be >= 1");
        assert!(token.span.column >= 1, "Column numbers should be >= 1");
        offset = token.span.end;
    }
    assert_eq!(offset, data.len());
});
