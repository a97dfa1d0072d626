//! Lexer token types

use super::keyword::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Token kinds for CQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// A word from the keyword table (reserved or soft).
    Keyword(Keyword),
    /// A bare name, as written.
    Identifier(String),
    /// A double-quoted name with `""` escapes already collapsed.
    QuotedIdentifier(String),

    // Literals
    /// Single-quoted string with `''` escapes already collapsed.
    String(String),
    Integer(String),
    Float(String),
    /// Hex blob digits, without the `0x` prefix.
    Hex(String),
    Uuid(String),
    /// Body of a `$$ ... $$` block.
    CodeBlock(String),

    // Operators
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,

    // Trivia
    Comment(String),
    Whitespace,

    // Special
    Eof,
    Error(LexErrorKind),
}

/// Why the scanner could not produce a well-formed token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,
    #[error("empty quoted identifier")]
    EmptyQuotedIdentifier,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated $$ code block")]
    UnterminatedCodeBlock,
    #[error("invalid UTF-8 byte sequence")]
    InvalidUtf8,
}

/// Coarse classification of a token, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    StringLiteral,
    NumericLiteral,
    HexLiteral,
    UuidLiteral,
    Operator,
    Punctuation,
    Comment,
    Whitespace,
    EndOfInput,
    Invalid,
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Keyword(_) => TokenCategory::Keyword,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => TokenCategory::Identifier,
            TokenKind::String(_) | TokenKind::CodeBlock(_) => TokenCategory::StringLiteral,
            TokenKind::Integer(_) | TokenKind::Float(_) => TokenCategory::NumericLiteral,
            TokenKind::Hex(_) => TokenCategory::HexLiteral,
            TokenKind::Uuid(_) => TokenCategory::UuidLiteral,
            TokenKind::Eq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Le
            | TokenKind::Ge
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent => TokenCategory::Operator,
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Dot
            | TokenKind::Question => TokenCategory::Punctuation,
            TokenKind::Comment(_) => TokenCategory::Comment,
            TokenKind::Whitespace => TokenCategory::Whitespace,
            TokenKind::Eof => TokenCategory::EndOfInput,
            TokenKind::Error(_) => TokenCategory::Invalid,
        }
    }

    /// Comments and whitespace never reach the grammar.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_) | TokenKind::Whitespace)
    }

    /// Is this token a keyword that may also be used as a bare identifier?
    pub fn is_soft_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(kw) if !kw.is_reserved())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{}", kw),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::QuotedIdentifier(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            TokenKind::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            TokenKind::Integer(s) | TokenKind::Float(s) | TokenKind::Uuid(s) => write!(f, "{}", s),
            TokenKind::Hex(s) => write!(f, "0x{}", s),
            TokenKind::CodeBlock(s) => write!(f, "$${}$$", s),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::Le => f.write_str("<="),
            TokenKind::Ge => f.write_str(">="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Question => f.write_str("?"),
            TokenKind::Comment(s) => write!(f, "{}", s),
            TokenKind::Whitespace => f.write_str(" "),
            TokenKind::Eof => f.write_str("end of input"),
            TokenKind::Error(kind) => write!(f, "<{}>", kind),
        }
    }
}

/// A point in the source: 1-based line and column, 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.start,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token with its kind, original lexeme and source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn position(&self) -> Position {
        self.span.position()
    }
}
