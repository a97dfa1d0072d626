//! CQL grammar recognition engine.
//!
//! Turns CQL statement text into a typed syntax tree. Scanning and parsing
//! are pure functions of their input: no I/O, no global state, and a
//! configurable cap on nesting depth instead of unbounded recursion.
//!
//! Architecture:
//! ```text
//! Source text (UTF-8)
//!     ↓
//! Lexer (tokens with line/column/offset, trivia dropped)
//!     ↓
//! Parser (statement dispatch → expression / relation grammars)
//!     ↓
//! Script { statements } + Diagnostics (recovery at ';')
//! ```
//!
//! ```
//! use cql_parser::{parse_statement, Statement};
//!
//! let stmt = parse_statement("SELECT * FROM ks.users WHERE id = ?").unwrap();
//! assert!(matches!(stmt, Statement::Select(_)));
//! ```

pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

// Re-export key types for convenience
pub use config::{ConfigError, ParserConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use diagnostics::{Diagnostic, LexicalError, ParseError, Severity, SyntaxError};
pub use lexer::{tokenize, Keyword, Lexer, Position, Span, Token, TokenKind};
pub use parser::*;
