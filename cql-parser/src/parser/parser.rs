//! Parser core: token cursor, expectation tracking, statement dispatch and
//! script-level recovery.
//!
//! The grammar itself lives in sibling modules, each adding an `impl Parser`
//! block for one family of rules.

use super::ast::*;
use crate::config::{ParserConfig, MAX_DEPTH_LIMIT};
use crate::diagnostics::{summarize_expected, Diagnostic, LexicalError, ParseError, SyntaxError};
use crate::lexer::{Keyword, Lexer, Position, Span, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// Keywords that may open a statement, in dispatch order.
pub const STATEMENT_KEYWORDS: &[Keyword] = &[
    Keyword::Alter,
    Keyword::Apply,
    Keyword::Begin,
    Keyword::Create,
    Keyword::Delete,
    Keyword::Drop,
    Keyword::Grant,
    Keyword::Insert,
    Keyword::List,
    Keyword::Revoke,
    Keyword::Select,
    Keyword::Truncate,
    Keyword::Update,
    Keyword::Use,
];

/// Result of a script parse: everything that parsed, plus every finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub script: Script,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// The script when no error was reported, otherwise the diagnostics.
    pub fn into_result(self) -> Result<Script, Vec<Diagnostic>> {
        if self.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(self.script)
        }
    }
}

/// Recursive-descent parser over a pre-scanned token buffer.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    config: ParserConfig,
    depth: usize,
    /// Descriptions of what would have been accepted at `expected_at`.
    expected: Vec<String>,
    expected_at: usize,
    /// Deepest syntax error from a rewound `attempt`, keyed by token index.
    furthest_failure: Option<(usize, SyntaxError)>,
    warnings: Vec<Diagnostic>,
}

impl Parser {
    /// Create a new parser from a vector of tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    /// Depth limits above [`MAX_DEPTH_LIMIT`] are lowered to it.
    pub fn with_config(mut tokens: Vec<Token>, mut config: ParserConfig) -> Self {
        config.max_depth = config.max_depth.min(MAX_DEPTH_LIMIT);
        tokens.retain(|t| !t.kind.is_trivia());
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: Span {
                    start: end,
                    end,
                    ..Default::default()
                },
            });
        }
        Self {
            tokens,
            pos: 0,
            config,
            depth: 0,
            expected: Vec::new(),
            expected_at: 0,
            furthest_failure: None,
            warnings: Vec::new(),
        }
    }

    /// Scan `source` and build a parser over its tokens.
    pub fn from_source(source: &str, config: ParserConfig) -> Self {
        Self::with_config(Lexer::new(source).tokenize(), config)
    }

    /// Warnings collected so far, leaving none behind.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parse exactly one statement, optionally followed by `;`.
    pub fn parse_single(&mut self) -> Result<Statement, ParseError> {
        self.furthest_failure = None;
        let statement = self.parse_statement()?;
        self.eat(&TokenKind::Semicolon);
        if !self.is_at_end() {
            self.note_expected("end of input");
            return Err(self.unexpected());
        }
        Ok(statement)
    }

    /// Parse a whole script: `statement (';' statement)* ';'?`.
    ///
    /// Each failed statement is reported and, when recovery is enabled,
    /// skipped up to and including the next `;`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_script(&mut self) -> ParseOutput {
        let mut output = ParseOutput::default();

        while !self.is_at_end() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                output.script.empty_statements += 1;
                continue;
            }

            let start = self.current().position();
            let warnings_before = self.warnings.len();
            self.furthest_failure = None;
            let result = self.parse_statement().and_then(|statement| {
                if self.is_at_end() || self.eat(&TokenKind::Semicolon) {
                    Ok(statement)
                } else {
                    self.note_expected("';'");
                    Err(self.unexpected())
                }
            });

            match result {
                Ok(statement) => {
                    tracing::debug!(kind = statement.name(), line = start.line, "parsed statement");
                    output.diagnostics.append(&mut self.warnings);
                    output.script.statements.push(statement);
                }
                Err(err) => {
                    self.warnings.truncate(warnings_before);
                    output.diagnostics.push(Diagnostic::from(&err));
                    if !self.config.recover {
                        break;
                    }
                    tracing::warn!(line = start.line, error = %err, "skipping malformed statement");
                    self.synchronize(&err, &mut output.diagnostics);
                }
            }
        }

        output
    }

    /// Discard tokens up to and including the next `;`, reporting any
    /// further lexical errors found on the way.
    fn synchronize(&mut self, err: &ParseError, diagnostics: &mut Vec<Diagnostic>) {
        self.depth = 0;
        while !self.is_at_end() {
            let token = self.current();
            if token.kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if let Some(lexical) = LexicalError::from_token(token) {
                if lexical.position != err.position() {
                    diagnostics.push(Diagnostic::from(ParseError::Lexical(lexical)));
                }
            }
            self.advance();
        }
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    /// Route on the leading keyword to the statement grammar.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = match &self.current().kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        };

        match keyword {
            Some(Keyword::Alter) => {
                self.advance();
                self.parse_alter()
            }
            Some(Keyword::Apply) => {
                self.advance();
                self.expect_keyword(Keyword::Batch)?;
                Ok(Statement::ApplyBatch)
            }
            Some(Keyword::Begin) => self.parse_batched_statement(),
            Some(Keyword::Create) => {
                self.advance();
                self.parse_create()
            }
            Some(Keyword::Delete) => self.parse_delete(None).map(Statement::Delete),
            Some(Keyword::Drop) => {
                self.advance();
                self.parse_drop()
            }
            Some(Keyword::Grant) => self.parse_grant(),
            Some(Keyword::Insert) => self.parse_insert(None).map(Statement::Insert),
            Some(Keyword::List) => self.parse_list(),
            Some(Keyword::Revoke) => self.parse_revoke(),
            Some(Keyword::Select) => self.parse_select().map(Statement::Select),
            Some(Keyword::Truncate) => self.parse_truncate(),
            Some(Keyword::Update) => self.parse_update(None).map(Statement::Update),
            Some(Keyword::Use) => self.parse_use(),
            _ => {
                for kw in STATEMENT_KEYWORDS {
                    self.note_expected(kw.as_str());
                }
                Err(self.unexpected())
            }
        }
    }

    /// Everything after `CREATE`.
    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        if self.eat_keyword(Keyword::Keyspace) || self.eat_keyword(Keyword::Schema) {
            return self.parse_create_keyspace();
        }
        if self.eat_keyword(Keyword::Table) || self.eat_keyword(Keyword::Columnfamily) {
            return self.parse_create_table();
        }
        if self.eat_keyword(Keyword::Custom) {
            self.expect_keyword(Keyword::Index)?;
            return self.parse_create_index(true);
        }
        if self.eat_keyword(Keyword::Index) {
            return self.parse_create_index(false);
        }
        if self.eat_keyword(Keyword::Type) {
            return self.parse_create_type();
        }
        if self.eat_keyword(Keyword::Trigger) {
            return self.parse_create_trigger();
        }
        if self.eat_keyword(Keyword::Materialized) {
            self.expect_keyword(Keyword::View)?;
            return self.parse_create_materialized_view();
        }
        let or_replace = if self.eat_keyword(Keyword::Or) {
            self.expect_keyword(Keyword::Replace)?;
            true
        } else {
            false
        };
        if self.eat_keyword(Keyword::Function) {
            return self.parse_create_function(or_replace);
        }
        if self.eat_keyword(Keyword::Aggregate) {
            return self.parse_create_aggregate(or_replace);
        }
        if !or_replace {
            if self.eat_keyword(Keyword::Role) {
                return self.parse_create_role();
            }
            if self.eat_keyword(Keyword::User) {
                return self.parse_create_user();
            }
        }
        Err(self.unexpected())
    }

    /// Everything after `ALTER`.
    fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        if self.eat_keyword(Keyword::Keyspace) || self.eat_keyword(Keyword::Schema) {
            return self.parse_alter_keyspace();
        }
        if self.eat_keyword(Keyword::Table) || self.eat_keyword(Keyword::Columnfamily) {
            return self.parse_alter_table();
        }
        if self.eat_keyword(Keyword::Type) {
            return self.parse_alter_type();
        }
        if self.eat_keyword(Keyword::Materialized) {
            self.expect_keyword(Keyword::View)?;
            return self.parse_alter_materialized_view();
        }
        if self.eat_keyword(Keyword::Role) {
            return self.parse_alter_role();
        }
        if self.eat_keyword(Keyword::User) {
            return self.parse_alter_user();
        }
        Err(self.unexpected())
    }

    /// Everything after `DROP`.
    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        if self.eat_keyword(Keyword::Keyspace) || self.eat_keyword(Keyword::Schema) {
            let if_exists = self.parse_if_exists()?;
            let name = self.expect_identifier()?;
            return Ok(Statement::DropKeyspace(DropKeyspaceStmt { if_exists, name }));
        }
        if self.eat_keyword(Keyword::Table) || self.eat_keyword(Keyword::Columnfamily) {
            return self.parse_drop_object().map(Statement::DropTable);
        }
        if self.eat_keyword(Keyword::Index) {
            return self.parse_drop_object().map(Statement::DropIndex);
        }
        if self.eat_keyword(Keyword::Type) {
            return self.parse_drop_object().map(Statement::DropType);
        }
        if self.eat_keyword(Keyword::Materialized) {
            self.expect_keyword(Keyword::View)?;
            return self.parse_drop_object().map(Statement::DropMaterializedView);
        }
        if self.eat_keyword(Keyword::Trigger) {
            return self.parse_drop_trigger();
        }
        if self.eat_keyword(Keyword::Function) {
            return self.parse_drop_routine().map(Statement::DropFunction);
        }
        if self.eat_keyword(Keyword::Aggregate) {
            return self.parse_drop_routine().map(Statement::DropAggregate);
        }
        if self.eat_keyword(Keyword::Role) {
            return self.parse_drop_principal().map(Statement::DropRole);
        }
        if self.eat_keyword(Keyword::User) {
            return self.parse_drop_principal().map(Statement::DropUser);
        }
        Err(self.unexpected())
    }

    // ========================================================================
    // Shared clause helpers
    // ========================================================================

    /// `[IF NOT EXISTS]`
    pub(crate) fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.eat_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `[IF EXISTS]`
    pub(crate) fn parse_if_exists(&mut self) -> Result<bool, ParseError> {
        if self.eat_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `name` or `keyspace.name`.
    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let first = self.expect_identifier()?;
        if self.eat(&TokenKind::Dot) {
            let name = self.expect_identifier()?;
            Ok(QualifiedName::new(Some(first), name))
        } else {
            Ok(QualifiedName::unqualified(first))
        }
    }

    /// `ident (',' ident)*`
    pub(crate) fn parse_identifier_list(&mut self) -> Result<Vec<Identifier>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    pub(crate) fn current(&self) -> &Token {
        self.peek(0)
    }

    /// The token `n` places ahead; the trailing `Eof` repeats forever.
    pub(crate) fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub(crate) fn position(&self) -> Position {
        self.current().position()
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek_is_keyword(0, keyword)
    }

    pub(crate) fn peek_is_keyword(&self, n: usize, keyword: Keyword) -> bool {
        matches!(self.peek(n).kind, TokenKind::Keyword(kw) if kw == keyword)
    }

    /// Consume the token if it has the given kind; otherwise remember it was
    /// an option here.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            self.note_expected(&expected_label(kind));
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            self.note_expected(keyword.as_str());
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Can the current token serve as a bare or quoted name?
    pub(crate) fn check_identifier(&self) -> bool {
        identifier_from(self.current()).is_some()
    }

    pub(crate) fn peek_is_identifier(&self, n: usize) -> bool {
        identifier_from(self.peek(n)).is_some()
    }

    /// Expect a name. Soft keywords are accepted here as plain identifiers.
    pub(crate) fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        match identifier_from(self.current()) {
            Some(ident) => {
                self.advance();
                Ok(ident)
            }
            None => {
                self.note_expected("identifier");
                Err(self.unexpected())
            }
        }
    }

    pub(crate) fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => {
                self.note_expected("string literal");
                Err(self.unexpected())
            }
        }
    }

    /// `true` or `false`.
    pub(crate) fn parse_bool(&mut self) -> Result<bool, ParseError> {
        if self.eat_keyword(Keyword::True) {
            Ok(true)
        } else if self.eat_keyword(Keyword::False) {
            Ok(false)
        } else {
            Err(self.unexpected())
        }
    }

    /// Record one alternative that would have been accepted here.
    pub(crate) fn note_expected(&mut self, what: &str) {
        if self.expected_at != self.pos {
            self.expected.clear();
            self.expected_at = self.pos;
        }
        if !self.expected.iter().any(|e| e == what) {
            self.expected.push(what.to_string());
        }
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>, position: Position) {
        self.warnings.push(Diagnostic::warning(message, position));
    }

    /// Run `f` one nesting level deeper, failing once the configured limit
    /// is reached.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::RecursionLimitExceeded {
                position: self.position(),
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Try `f`; on a syntax error rewind to where it started and yield
    /// `None`. Lexical and recursion errors still propagate.
    ///
    /// A failure past the starting token is kept, so an error raised later
    /// at an earlier token reports the deeper one instead.
    pub(crate) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Option<T>, ParseError> {
        let saved_pos = self.pos;
        let saved_depth = self.depth;
        let saved_warnings = self.warnings.len();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(ParseError::Syntax(err)) => {
                let failed_at = self.pos;
                let deeper = match &self.furthest_failure {
                    Some((at, _)) => failed_at > *at,
                    None => failed_at > saved_pos,
                };
                if deeper {
                    self.furthest_failure = Some((failed_at, err));
                }
                self.pos = saved_pos;
                self.depth = saved_depth;
                self.warnings.truncate(saved_warnings);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// A syntax error with a specific message at the current token.
    pub(crate) fn error(&self, message: &str) -> ParseError {
        let token = self.current();
        if let Some(lexical) = LexicalError::from_token(token) {
            return ParseError::Lexical(lexical);
        }
        if let Some((at, furthest)) = &self.furthest_failure {
            if *at > self.pos {
                return ParseError::Syntax(furthest.clone());
            }
        }
        ParseError::Syntax(SyntaxError {
            position: token.position(),
            message: message.to_string(),
            found: match token.kind {
                TokenKind::Eof => None,
                _ => Some(token.text.clone()),
            },
            expected: self.expected_here(),
        })
    }

    /// A syntax error describing the current token against everything that
    /// was tried at this position.
    pub(crate) fn unexpected(&self) -> ParseError {
        let token = self.current();
        let expected = self.expected_here();
        let message = if expected.is_empty() {
            format!("unexpected {}", found_label(token))
        } else {
            format!(
                "unexpected {}, expected {}",
                found_label(token),
                summarize_expected(&expected)
            )
        };
        self.error(&message)
    }

    fn expected_here(&self) -> Vec<String> {
        if self.expected_at != self.pos {
            return Vec::new();
        }
        let mut expected = self.expected.clone();
        expected.sort();
        expected.dedup();
        expected
    }
}

/// Read a token as a name, when it can be one.
pub(crate) fn identifier_from(token: &Token) -> Option<Identifier> {
    match &token.kind {
        TokenKind::Identifier(s) => Some(Identifier::bare(s)),
        TokenKind::QuotedIdentifier(s) => Some(Identifier::quoted(s)),
        TokenKind::Keyword(_) if token.kind.is_soft_keyword() => Some(Identifier::bare(&token.text)),
        _ => None,
    }
}

fn found_label(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.text),
    }
}

/// How a token kind is named in an expectation list.
pub(crate) fn expected_label(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(kw) => kw.as_str().to_string(),
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => "identifier".to_string(),
        TokenKind::String(_) => "string literal".to_string(),
        TokenKind::Integer(_) => "integer".to_string(),
        TokenKind::Float(_) => "float".to_string(),
        TokenKind::Hex(_) => "hex literal".to_string(),
        TokenKind::Uuid(_) => "UUID literal".to_string(),
        TokenKind::CodeBlock(_) => "code block".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        other => format!("'{}'", other),
    }
}

// ============================================================================
// PUBLIC ENTRY POINTS
// ============================================================================

/// Parse a single statement. The first error aborts the parse.
pub fn parse_statement(source: &str) -> Result<Statement, ParseError> {
    Parser::from_source(source, ParserConfig::default()).parse_single()
}

/// Parse a script with the default configuration.
pub fn parse_script(source: &str) -> ParseOutput {
    parse_script_with(source, &ParserConfig::default())
}

pub fn parse_script_with(source: &str, config: &ParserConfig) -> ParseOutput {
    Parser::from_source(source, config.clone()).parse_script()
}
