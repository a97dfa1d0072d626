//! Lexer implementation

use super::keyword::Keyword;
use super::token::*;
use crate::diagnostics::LexicalError;
use std::iter::Peekable;
use std::str::CharIndices;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Length of a canonical hyphenated UUID (8-4-4-4-12).
const UUID_LEN: usize = 36;

/// Lexer for CQL source text.
///
/// The lexer is lazy: it implements `Iterator` and scans one token per call,
/// including comment and whitespace trivia. [`Lexer::tokenize`] drains it into
/// the trivia-free vector the parser indexes into.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
            finished: false,
        }
    }

    /// Create a lexer over raw bytes, failing on the first invalid UTF-8 sequence.
    pub fn from_utf8(bytes: &'a [u8]) -> Result<Self, LexicalError> {
        match std::str::from_utf8(bytes) {
            Ok(source) => Ok(Self::new(source)),
            Err(err) => {
                let valid = &bytes[..err.valid_up_to()];
                // The prefix is valid by construction.
                let prefix = String::from_utf8_lossy(valid);
                let line = prefix.matches('\n').count() + 1;
                let column = prefix.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
                Err(LexicalError {
                    kind: LexErrorKind::InvalidUtf8,
                    position: Position {
                        line,
                        column,
                        offset: err.valid_up_to(),
                    },
                    lexeme: String::new(),
                })
            }
        }
    }

    /// Tokenize the entire source into the tokens the grammar consumes.
    ///
    /// Trivia is dropped; error tokens are kept in place so the parser can
    /// report them at their position. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let tokens: Vec<Token> = self.by_ref().filter(|t| !t.kind.is_trivia()).collect();
        tracing::trace!(count = tokens.len(), "tokenized source");
        tokens
    }

    /// Tokenize the entire source, keeping comments and whitespace.
    pub fn tokenize_with_trivia(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Token {
        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                ' ' | '\t' | '\r' | '\n' => self.scan_whitespace(),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ',' => self.single(TokenKind::Comma),
                ';' => self.single(TokenKind::Semicolon),
                ':' => self.single(TokenKind::Colon),
                '.' => self.single(TokenKind::Dot),
                '?' => self.single(TokenKind::Question),
                '*' => self.single(TokenKind::Star),
                '%' => self.single(TokenKind::Percent),
                '+' => self.single(TokenKind::Plus),
                '=' => self.single(TokenKind::Eq),

                '<' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }

                '>' => {
                    self.advance();
                    if self.peek_char() == Some('=') {
                        self.advance();
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }

                '-' => {
                    if self.peek_next_char() == Some('-') {
                        self.scan_line_comment()
                    } else {
                        self.single(TokenKind::Minus)
                    }
                }

                '/' => match self.peek_next_char() {
                    Some('/') => self.scan_line_comment(),
                    Some('*') => self.scan_block_comment(),
                    _ => self.single(TokenKind::Slash),
                },

                '\'' => self.scan_string(),
                '"' => self.scan_quoted_identifier(),

                '$' if self.peek_next_char() == Some('$') => self.scan_code_block(),

                c if c.is_ascii_hexdigit() && self.uuid_ahead() => self.scan_uuid(),

                c if c.is_ascii_digit() => self.scan_number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

                c => {
                    self.advance();
                    TokenKind::Error(LexErrorKind::UnexpectedChar(c))
                }
            },
        };

        Token {
            kind,
            text: self.source[start_pos..self.pos].to_string(),
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn scan_whitespace(&mut self) -> TokenKind {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.advance();
        }
        TokenKind::Whitespace
    }

    /// `--` and `//` comments run to the end of the line.
    fn scan_line_comment(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.pos].to_string())
    }

    /// Block comments do not nest.
    fn scan_block_comment(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek_char() {
                None => return TokenKind::Error(LexErrorKind::UnterminatedComment),
                Some('*') if self.peek_next_char() == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        TokenKind::Comment(self.source[start..self.pos].to_string())
    }

    /// Scan a string literal. A doubled quote is the only escape.
    fn scan_string(&mut self) -> TokenKind {
        match self.scan_delimited('\'') {
            Some(value) => TokenKind::String(value),
            None => TokenKind::Error(LexErrorKind::UnterminatedString),
        }
    }

    fn scan_quoted_identifier(&mut self) -> TokenKind {
        match self.scan_delimited('"') {
            Some(value) if value.is_empty() => TokenKind::Error(LexErrorKind::EmptyQuotedIdentifier),
            Some(value) => TokenKind::QuotedIdentifier(value),
            None => TokenKind::Error(LexErrorKind::UnterminatedQuotedIdentifier),
        }
    }

    /// Consume `quote ... quote`, collapsing doubled quotes. `None` when the
    /// input ends before the closing quote.
    fn scan_delimited(&mut self, quote: char) -> Option<String> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => return None,
                Some(c) if c == quote => {
                    self.advance();
                    if self.peek_char() == Some(quote) {
                        self.advance();
                        value.push(quote);
                    } else {
                        return Some(value);
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    fn scan_code_block(&mut self) -> TokenKind {
        self.advance(); // $
        self.advance(); // $
        let start = self.pos;
        loop {
            match self.peek_char() {
                None => return TokenKind::Error(LexErrorKind::UnterminatedCodeBlock),
                Some('$') if self.peek_next_char() == Some('$') => {
                    let body = self.source[start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return TokenKind::CodeBlock(body);
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Does a hyphenated 8-4-4-4-12 hex UUID start at the current position?
    fn uuid_ahead(&self) -> bool {
        let rest = self.source[self.pos..].as_bytes();
        if rest.len() < UUID_LEN {
            return false;
        }
        let shape_ok = rest[..UUID_LEN].iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        });
        let boundary_ok = rest
            .get(UUID_LEN)
            .map_or(true, |b| !(b.is_ascii_alphanumeric() || *b == b'_'));
        shape_ok && boundary_ok
    }

    fn scan_uuid(&mut self) -> TokenKind {
        let start = self.pos;
        for _ in 0..UUID_LEN {
            self.advance();
        }
        TokenKind::Uuid(self.source[start..self.pos].to_string())
    }

    /// Scan an integer, float or `0x` hex blob literal.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        if self.peek_char() == Some('0')
            && matches!(self.peek_next_char(), Some('x') | Some('X'))
            && self.char_at(2).map_or(false, |c| c.is_ascii_hexdigit())
        {
            self.advance(); // 0
            self.advance(); // x
            let digits_start = self.pos;
            while self.peek_char().map_or(false, |c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return TokenKind::Hex(self.source[digits_start..self.pos].to_string());
        }

        self.consume_digits();
        let mut is_float = false;

        if self.peek_char() == Some('.') && self.peek_next_char().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            self.advance(); // .
            self.consume_digits();
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let exponent_digit = match self.peek_next_char() {
                Some('+') | Some('-') => self.char_at(2),
                other => other,
            };
            if exponent_digit.map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.advance(); // e
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.consume_digits();
            }
        }

        let text = self.source[start..self.pos].to_string();
        if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Integer(text)
        }
    }

    fn consume_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ident = &self.source[start..self.pos];
        match Keyword::lookup(ident) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier(ident.to_string()),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        self.char_at(1)
    }

    fn char_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let (i, c) = self.chars.next()?;
        self.pos = i + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token including trivia, ending with exactly one `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

/// Tokenize `source`, failing on the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let tokens = Lexer::new(source).tokenize();
    if let Some(err) = tokens.iter().find_map(LexicalError::from_token) {
        return Err(err);
    }
    Ok(tokens)
}

// ============================================================================
// TESTS
// ============================================================================
