//! Expression and literal grammar: data types, constants, terms, function
//! calls and collection literals.

use super::ast::*;
use super::parser::{identifier_from, Parser};
use crate::diagnostics::ParseError;
use crate::lexer::{Keyword, TokenKind};
use uuid::Uuid;

impl Parser {
    // ========================================================================
    // Data types
    // ========================================================================

    /// Parse a data type: a native type keyword, a collection, tuple or
    /// frozen constructor, or a user-defined type name.
    pub fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let start = self.position();
        let keyword = match &self.current().kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        };

        if let Some(native) = keyword.and_then(native_type) {
            self.advance();
            return Ok(DataType::Native(native));
        }

        // Constructor keywords are soft: `list` alone is a type name.
        let is_constructor = matches!(
            keyword,
            Some(Keyword::List | Keyword::Set | Keyword::Map | Keyword::Tuple | Keyword::Frozen)
        ) && self.peek(1).kind == TokenKind::Lt;

        if is_constructor {
            self.advance();
            self.expect(TokenKind::Lt)?;
            let data_type = self.nested(|p| match keyword {
                Some(Keyword::List) => Ok(DataType::List(Box::new(p.parse_data_type()?))),
                Some(Keyword::Set) => Ok(DataType::Set(Box::new(p.parse_data_type()?))),
                Some(Keyword::Map) => {
                    let key = p.parse_data_type()?;
                    p.expect(TokenKind::Comma)?;
                    let value = p.parse_data_type()?;
                    Ok(DataType::Map(Box::new(key), Box::new(value)))
                }
                Some(Keyword::Tuple) => {
                    let mut items = vec![p.parse_data_type()?];
                    while p.eat(&TokenKind::Comma) {
                        items.push(p.parse_data_type()?);
                    }
                    Ok(DataType::Tuple(items))
                }
                _ => Ok(DataType::Frozen(Box::new(p.parse_data_type()?))),
            })?;
            self.expect(TokenKind::Gt)?;

            if let DataType::Frozen(inner) = &data_type {
                if matches!(**inner, DataType::Frozen(_)) {
                    self.warn("redundant frozen<frozen<..>> type", start);
                }
            }
            return Ok(data_type);
        }

        if self.check_identifier() {
            return Ok(DataType::UserDefined(self.parse_qualified_name()?));
        }

        self.note_expected("data type");
        Err(self.unexpected())
    }

    /// `(type (',' type)*)`, possibly empty.
    pub(crate) fn parse_type_list(&mut self) -> Result<Vec<DataType>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut types = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            types.push(self.parse_data_type()?);
            while self.eat(&TokenKind::Comma) {
                types.push(self.parse_data_type()?);
            }
            self.expect(TokenKind::RParen)?;
        }
        Ok(types)
    }

    // ========================================================================
    // Constants
    // ========================================================================

    /// Parse a literal constant, including a leading sign on numbers.
    pub fn parse_constant(&mut self) -> Result<Constant, ParseError> {
        let constant = match &self.current().kind {
            TokenKind::String(s) => Constant::String(s.clone()),
            TokenKind::Integer(s) => Constant::Integer(s.clone()),
            TokenKind::Float(s) => Constant::Float(s.clone()),
            TokenKind::Hex(digits) => Constant::Hex(digits.clone()),
            TokenKind::Uuid(text) => match Uuid::parse_str(text) {
                Ok(uuid) => Constant::Uuid(uuid),
                Err(_) => return Err(self.error("malformed UUID literal")),
            },
            TokenKind::Keyword(Keyword::True) => Constant::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Constant::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Constant::Null,
            TokenKind::Keyword(Keyword::Nan) => Constant::Float("NaN".to_string()),
            TokenKind::Keyword(Keyword::Infinity) => Constant::Float("Infinity".to_string()),
            TokenKind::Minus => {
                self.advance();
                return self.parse_negative_number();
            }
            _ => {
                self.note_constant_starts();
                return Err(self.unexpected());
            }
        };
        self.advance();
        Ok(constant)
    }

    fn parse_negative_number(&mut self) -> Result<Constant, ParseError> {
        let constant = match &self.current().kind {
            TokenKind::Integer(s) => Constant::Integer(format!("-{}", s)),
            TokenKind::Float(s) => Constant::Float(format!("-{}", s)),
            TokenKind::Keyword(Keyword::Nan) => Constant::Float("NaN".to_string()),
            TokenKind::Keyword(Keyword::Infinity) => Constant::Float("-Infinity".to_string()),
            _ => {
                for what in ["integer", "float", "NAN", "INFINITY"] {
                    self.note_expected(what);
                }
                return Err(self.unexpected());
            }
        };
        self.advance();
        Ok(constant)
    }

    fn note_constant_starts(&mut self) {
        for what in [
            "string literal",
            "integer",
            "float",
            "hex literal",
            "UUID literal",
            "TRUE",
            "FALSE",
            "NULL",
            "NAN",
            "INFINITY",
            "'-'",
        ] {
            self.note_expected(what);
        }
    }

    pub(crate) fn check_constant(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::String(_)
                | TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::Hex(_)
                | TokenKind::Uuid(_)
                | TokenKind::Minus
                | TokenKind::Keyword(
                    Keyword::True | Keyword::False | Keyword::Null | Keyword::Nan | Keyword::Infinity
                )
        )
    }

    /// `{ constant : constant (',' constant : constant)* }`, as used by
    /// replication settings and option maps.
    pub(crate) fn parse_constant_map(&mut self) -> Result<Vec<(Constant, Constant)>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut entries = Vec::new();
        if !self.eat(&TokenKind::RBrace) {
            loop {
                let key = self.parse_constant()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_constant()?;
                entries.push((key, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
        }
        Ok(entries)
    }

    // ========================================================================
    // Terms
    // ========================================================================

    /// Parse a value: constant, bind marker, function call or collection,
    /// tuple or user-type literal.
    pub fn parse_term(&mut self) -> Result<Term, ParseError> {
        match &self.current().kind {
            TokenKind::Question | TokenKind::Colon => {
                Ok(Term::BindMarker(self.parse_bind_marker()?))
            }
            TokenKind::LBracket | TokenKind::LBrace | TokenKind::LParen => {
                self.parse_collection_literal()
            }
            _ if self.check_function_call() => Ok(Term::FunctionCall(self.parse_function_call()?)),
            _ if self.check_constant() => Ok(Term::Constant(self.parse_constant()?)),
            _ => {
                self.note_constant_starts();
                for what in ["'?'", "':'", "'['", "'{'", "'('", "function call"] {
                    self.note_expected(what);
                }
                Err(self.unexpected())
            }
        }
    }

    /// `term (',' term)*`
    pub(crate) fn parse_term_list(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut terms = vec![self.parse_term()?];
        while self.eat(&TokenKind::Comma) {
            terms.push(self.parse_term()?);
        }
        Ok(terms)
    }

    /// `?` or `:name`.
    pub(crate) fn parse_bind_marker(&mut self) -> Result<BindMarker, ParseError> {
        if self.eat(&TokenKind::Question) {
            return Ok(BindMarker::Anonymous);
        }
        self.expect(TokenKind::Colon)?;
        Ok(BindMarker::Named(self.expect_identifier()?))
    }

    pub(crate) fn check_bind_marker(&self) -> bool {
        self.check(&TokenKind::Question) || self.check(&TokenKind::Colon)
    }

    /// Parse `[...]`, `{...}` or `(...)`.
    ///
    /// `{}` is an empty map. A brace literal whose first item is a name
    /// followed by `:` is a user-type literal; otherwise the first `:`
    /// decides between map and set.
    pub fn parse_collection_literal(&mut self) -> Result<Term, ParseError> {
        if self.eat(&TokenKind::LBracket) {
            return self.nested(|p| {
                let mut items = Vec::new();
                if !p.eat(&TokenKind::RBracket) {
                    items = p.parse_term_list()?;
                    p.expect(TokenKind::RBracket)?;
                }
                Ok(Term::List(items))
            });
        }

        if self.eat(&TokenKind::LParen) {
            return self.nested(|p| {
                let items = p.parse_term_list()?;
                p.expect(TokenKind::RParen)?;
                Ok(Term::Tuple(items))
            });
        }

        self.expect(TokenKind::LBrace)?;
        self.nested(|p| {
            if p.eat(&TokenKind::RBrace) {
                return Ok(Term::Map(Vec::new()));
            }

            if p.check_identifier() && p.peek(1).kind == TokenKind::Colon {
                let mut fields = Vec::new();
                loop {
                    let name = p.expect_identifier()?;
                    p.expect(TokenKind::Colon)?;
                    fields.push((name, p.parse_term()?));
                    if !p.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                p.expect(TokenKind::RBrace)?;
                return Ok(Term::UserType(fields));
            }

            let first = p.parse_term()?;
            if p.eat(&TokenKind::Colon) {
                let mut entries = vec![(first, p.parse_term()?)];
                while p.eat(&TokenKind::Comma) {
                    let key = p.parse_term()?;
                    p.expect(TokenKind::Colon)?;
                    entries.push((key, p.parse_term()?));
                }
                p.expect(TokenKind::RBrace)?;
                return Ok(Term::Map(entries));
            }

            let mut items = vec![first];
            while p.eat(&TokenKind::Comma) {
                items.push(p.parse_term()?);
            }
            p.expect(TokenKind::RBrace)?;
            Ok(Term::Set(items))
        })
    }

    // ========================================================================
    // Function calls
    // ========================================================================

    /// Does a function call start here? `name (` or `ks.name (`.
    pub(crate) fn check_function_call(&self) -> bool {
        let is_name = |n: usize| {
            self.peek_is_identifier(n) || self.peek_is_keyword(n, Keyword::Token)
        };
        if !is_name(0) {
            return false;
        }
        match self.peek(1).kind {
            TokenKind::LParen => true,
            TokenKind::Dot => self.peek_is_identifier(2) && self.peek(3).kind == TokenKind::LParen,
            _ => false,
        }
    }

    /// `name '(' ['*' | arg (',' arg)*] ')'`
    ///
    /// `*` is only allowed as the sole argument, as in `count(*)`, and never
    /// for `token`. Any other argument is a column name or a term.
    pub fn parse_function_call(&mut self) -> Result<FunctionCall, ParseError> {
        let is_token = self.eat_keyword(Keyword::Token);
        let name = if is_token {
            QualifiedName::unqualified(Identifier::bare("token"))
        } else {
            self.parse_qualified_name()?
        };
        self.expect(TokenKind::LParen)?;

        let args = self.nested(|p| {
            let mut args = Vec::new();
            if p.eat(&TokenKind::RParen) {
                return Ok(args);
            }
            if !is_token && p.eat(&TokenKind::Star) {
                p.expect(TokenKind::RParen)?;
                return Ok(vec![FunctionArg::Star]);
            }
            loop {
                args.push(p.parse_function_arg()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::RParen)?;
            Ok(args)
        })?;

        Ok(FunctionCall { name, args })
    }

    fn parse_function_arg(&mut self) -> Result<FunctionArg, ParseError> {
        if !self.check_function_call() {
            if let Some(column) = identifier_from(self.current()) {
                self.advance();
                return Ok(FunctionArg::Column(column));
            }
        }
        Ok(FunctionArg::Term(self.parse_term()?))
    }
}

/// The native type a keyword names, if any.
pub(crate) fn native_type(keyword: Keyword) -> Option<NativeType> {
    let native = match keyword {
        Keyword::Ascii => NativeType::Ascii,
        Keyword::Bigint => NativeType::Bigint,
        Keyword::Blob => NativeType::Blob,
        Keyword::Boolean => NativeType::Boolean,
        Keyword::Counter => NativeType::Counter,
        Keyword::Date => NativeType::Date,
        Keyword::Decimal => NativeType::Decimal,
        Keyword::Double => NativeType::Double,
        Keyword::Duration => NativeType::Duration,
        Keyword::Float => NativeType::Float,
        Keyword::Inet => NativeType::Inet,
        Keyword::Int => NativeType::Int,
        Keyword::Smallint => NativeType::Smallint,
        Keyword::Text => NativeType::Text,
        Keyword::Time => NativeType::Time,
        Keyword::Timestamp => NativeType::Timestamp,
        Keyword::Timeuuid => NativeType::Timeuuid,
        Keyword::Tinyint => NativeType::Tinyint,
        Keyword::Uuid => NativeType::Uuid,
        Keyword::Varchar => NativeType::Varchar,
        Keyword::Varint => NativeType::Varint,
        _ => return None,
    };
    Some(native)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn parser(source: &str) -> Parser {
        Parser::from_source(source, ParserConfig::default())
    }

    fn data_type(source: &str) -> Result<DataType, ParseError> {
        parser(source).parse_data_type()
    }

    fn term(source: &str) -> Term {
        parser(source).parse_term().expect("term should parse")
    }

    #[test]
    fn test_native_types_cover_keyword_table() {
        let natives: Vec<_> = Keyword::ALL.iter().filter_map(|kw| native_type(*kw)).collect();
        assert_eq!(natives.len(), NativeType::ALL.len());
        for kw in Keyword::ALL {
            assert_eq!(kw.is_primitive_type(), native_type(*kw).is_some(), "{}", kw);
        }
    }

    #[test]
    fn test_nested_data_type() {
        let ty = data_type("frozen<map<text, list<frozen<tuple<int, text>>>>>").unwrap();
        assert_eq!(ty.depth(), 5);
        assert_eq!(ty.to_string(), "frozen<map<text, list<frozen<tuple<int, text>>>>>");
    }

    #[test]
    fn test_nested_data_type_respects_limit() {
        let source = "frozen<map<text, list<frozen<tuple<int, text>>>>>";
        let exact = ParserConfig::default().with_max_depth(5);
        assert!(Parser::from_source(source, exact).parse_data_type().is_ok());

        let tight = ParserConfig::default().with_max_depth(4);
        let err = Parser::from_source(source, tight).parse_data_type().unwrap_err();
        assert!(matches!(err, ParseError::RecursionLimitExceeded { limit: 4, .. }));
    }

    #[test]
    fn test_deep_nesting_fails_cleanly() {
        let source = format!("{}int{}", "list<".repeat(10_000), ">".repeat(10_000));
        let err = data_type(&source).unwrap_err();
        assert!(matches!(err, ParseError::RecursionLimitExceeded { limit: 128, .. }));
    }

    #[test]
    fn test_user_defined_and_soft_constructor_names() {
        assert_eq!(
            data_type("ks.address").unwrap(),
            DataType::UserDefined(QualifiedName::new(
                Some(Identifier::bare("ks")),
                Identifier::bare("address")
            ))
        );
        assert_eq!(
            data_type("list").unwrap(),
            DataType::UserDefined(QualifiedName::unqualified(Identifier::bare("list")))
        );
    }

    #[test]
    fn test_redundant_frozen_warns() {
        let mut p = parser("frozen<frozen<list<int>>>");
        assert!(p.parse_data_type().is_ok());
        let warnings = p.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_error());
    }

    #[test]
    fn test_map_type_needs_two_arguments() {
        let err = data_type("map<text>").unwrap_err();
        assert!(err.expected().iter().any(|e| e == "','"));
    }

    #[test]
    fn test_constants() {
        let cases = [
            ("'it''s'", Constant::String("it's".to_string())),
            ("42", Constant::Integer("42".to_string())),
            ("-42", Constant::Integer("-42".to_string())),
            ("1.5e3", Constant::Float("1.5e3".to_string())),
            ("-NaN", Constant::Float("NaN".to_string())),
            ("-Infinity", Constant::Float("-Infinity".to_string())),
            ("0xCAFE", Constant::Hex("CAFE".to_string())),
            ("TRUE", Constant::Boolean(true)),
            ("null", Constant::Null),
        ];
        for (source, expected) in cases {
            assert_eq!(parser(source).parse_constant().unwrap(), expected, "{}", source);
        }
    }

    #[test]
    fn test_uuid_constant() {
        let c = parser("123e4567-e89b-12d3-a456-426614174000").parse_constant().unwrap();
        match c {
            Constant::Uuid(uuid) => {
                assert_eq!(uuid.to_string(), "123e4567-e89b-12d3-a456-426614174000")
            }
            other => panic!("expected uuid, got {:?}", other),
        }
    }

    #[test]
    fn test_collection_literals() {
        assert_eq!(term("{}"), Term::Map(Vec::new()));
        assert!(matches!(term("[1, 2, 3]"), Term::List(items) if items.len() == 3));
        assert!(matches!(term("{1, 2}"), Term::Set(items) if items.len() == 2));
        assert!(matches!(term("{'a': 1, 'b': 2}"), Term::Map(entries) if entries.len() == 2));
        assert!(matches!(term("(1, 'x')"), Term::Tuple(items) if items.len() == 2));
        match term("{street: '1 Main', zip: 12345}") {
            Term::UserType(fields) => {
                assert_eq!(fields[0].0, Identifier::bare("street"));
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected user type literal, got {:?}", other),
        }
    }

    #[test]
    fn test_bind_markers() {
        assert_eq!(term("?"), Term::BindMarker(BindMarker::Anonymous));
        assert_eq!(
            term(":user_id"),
            Term::BindMarker(BindMarker::Named(Identifier::bare("user_id")))
        );
    }

    #[test]
    fn test_function_calls() {
        let call = parser("count(*)").parse_function_call().unwrap();
        assert_eq!(call.args, vec![FunctionArg::Star]);

        let call = parser("ks.blob_to_text(col, now(), 'x')").parse_function_call().unwrap();
        assert_eq!(call.name.to_string(), "ks.blob_to_text");
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args[0], FunctionArg::Column(Identifier::bare("col")));
        assert!(matches!(&call.args[1], FunctionArg::Term(Term::FunctionCall(inner)) if inner.args.is_empty()));

        let call = parser("token(k)").parse_function_call().unwrap();
        assert_eq!(call.name.name, Identifier::bare("token"));
    }

    #[test]
    fn test_star_only_as_sole_argument() {
        assert!(parser("count(*)").parse_function_call().is_ok());
        assert!(parser("f(a, *)").parse_function_call().is_err());
        assert!(parser("f(*, *)").parse_function_call().is_err());
        assert!(parser("f(*, a)").parse_function_call().is_err());
        assert!(parser("token(*)").parse_function_call().is_err());
    }

    #[test]
    fn test_term_error_lists_alternatives() {
        let err = parser(")").parse_term().unwrap_err();
        let expected = err.expected();
        assert!(expected.iter().any(|e| e == "string literal"));
        assert!(expected.iter().any(|e| e == "'['"));
    }
}
