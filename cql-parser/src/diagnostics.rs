//! Errors and positioned diagnostics

use crate::lexer::{LexErrorKind, Position, Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// A token the scanner could not form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("lexical error at {position}: {kind}")]
pub struct LexicalError {
    pub kind: LexErrorKind,
    pub position: Position,
    /// Source text consumed by the failed token.
    pub lexeme: String,
}

impl LexicalError {
    /// Lift an `Error` token into a `LexicalError`; `None` for any other token.
    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Error(kind) => Some(Self {
                kind: kind.clone(),
                position: token.position(),
                lexeme: token.text.clone(),
            }),
            _ => None,
        }
    }
}

/// An unexpected token at a grammar decision point.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("syntax error at {position}: {message}")]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
    /// The offending lexeme as written; `None` at end of input.
    pub found: Option<String>,
    /// First tokens of every alternative tried at `position`, sorted.
    pub expected: Vec<String>,
}

/// Every way a parse can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("nesting deeper than {limit} levels at {position}")]
    RecursionLimitExceeded { position: Position, limit: usize },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lexical(err) => err.position,
            ParseError::Syntax(err) => err.position,
            ParseError::RecursionLimitExceeded { position, .. } => *position,
        }
    }

    pub fn expected(&self) -> &[String] {
        match self {
            ParseError::Syntax(err) => &err.expected,
            _ => &[],
        }
    }
}

/// Render an expectation list the way humans read it.
pub(crate) fn summarize_expected(expected: &[String]) -> String {
    match expected {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("one of {} or {}", init.join(", "), last),
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A positioned finding handed to the caller of a script parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub position: Position,
    pub found: Option<String>,
    pub expected: Vec<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            position,
            found: None,
            expected: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let (message, found, expected) = match err {
            ParseError::Lexical(lex) => (lex.kind.to_string(), Some(lex.lexeme.clone()), Vec::new()),
            ParseError::Syntax(syn) => (
                syn.message.clone(),
                syn.found.clone(),
                syn.expected.clone(),
            ),
            ParseError::RecursionLimitExceeded { limit, .. } => (
                format!("nesting deeper than {} levels", limit),
                None,
                Vec::new(),
            ),
        };
        Self {
            severity: Severity::Error,
            message,
            position: err.position(),
            found,
            expected,
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::from(&err)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.message)
    }
}
