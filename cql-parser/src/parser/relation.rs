//! Relation grammar for `WHERE` and `IF` clauses.
//!
//! Relations form a flat conjunction: `relation (AND relation)*`. There is
//! no `OR` and no grouping.

use super::ast::*;
use super::parser::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    /// `relation (AND relation)*`
    pub fn parse_relation_list(&mut self) -> Result<Vec<Relation>, ParseError> {
        let mut relations = vec![self.parse_relation()?];
        while self.eat_keyword(Keyword::And) {
            relations.push(self.parse_relation()?);
        }
        Ok(relations)
    }

    /// `[WHERE relations]`
    pub(crate) fn parse_where_clause(&mut self) -> Result<Vec<Relation>, ParseError> {
        if self.eat_keyword(Keyword::Where) {
            self.parse_relation_list()
        } else {
            Ok(Vec::new())
        }
    }

    /// `[IF EXISTS | IF relations]` after a modification.
    pub(crate) fn parse_condition(&mut self) -> Result<Option<Condition>, ParseError> {
        if !self.eat_keyword(Keyword::If) {
            return Ok(None);
        }
        if self.eat_keyword(Keyword::Exists) {
            return Ok(Some(Condition::Exists));
        }
        Ok(Some(Condition::Relations(self.parse_relation_list()?)))
    }

    /// One relation. The shape is decided by what follows the column,
    /// function call or column tuple.
    pub fn parse_relation(&mut self) -> Result<Relation, ParseError> {
        if self.eat(&TokenKind::LParen) {
            let columns = self.parse_identifier_list()?;
            self.expect(TokenKind::RParen)?;
            if self.eat_keyword(Keyword::In) {
                let values = self.parse_in_values()?;
                return Ok(Relation::TupleIn { columns, values });
            }
            let op = self.parse_compare_op()?;
            let value = self.parse_term()?;
            return Ok(Relation::TupleCompare { columns, op, value });
        }

        if self.check_function_call() {
            let lhs = Operand::FunctionCall(self.parse_function_call()?);
            let op = self.parse_compare_op()?;
            let rhs = self.parse_term()?;
            return Ok(Relation::Compare { lhs, op, rhs });
        }

        let column = self.expect_identifier()?;

        if self.eat_keyword(Keyword::In) {
            let values = self.parse_in_values()?;
            return Ok(Relation::In { column, values });
        }

        if self.eat_keyword(Keyword::Contains) {
            if self.eat_keyword(Keyword::Key) {
                let value = self.parse_term()?;
                return Ok(Relation::ContainsKey { column, value });
            }
            let value = self.parse_term()?;
            return Ok(Relation::Contains { column, value });
        }

        let op = self.parse_compare_op()?;
        let rhs = self.parse_term()?;
        Ok(Relation::Compare {
            lhs: Operand::Column(column),
            op,
            rhs,
        })
    }

    /// `=`, `<`, `>`, `<=` or `>=`.
    pub(crate) fn parse_compare_op(&mut self) -> Result<CompareOp, ParseError> {
        let op = match self.current().kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Le => CompareOp::Le,
            TokenKind::Ge => CompareOp::Ge,
            _ => {
                for what in ["'='", "'<'", "'>'", "'<='", "'>='"] {
                    self.note_expected(what);
                }
                return Err(self.unexpected());
            }
        };
        self.advance();
        Ok(op)
    }

    /// `'(' [term (',' term)*] ')'` or a bind marker.
    fn parse_in_values(&mut self) -> Result<InValues, ParseError> {
        if self.check_bind_marker() {
            return Ok(InValues::Marker(self.parse_bind_marker()?));
        }
        self.expect(TokenKind::LParen)?;
        if self.eat(&TokenKind::RParen) {
            return Ok(InValues::List(Vec::new()));
        }
        let values = self.parse_term_list()?;
        self.expect(TokenKind::RParen)?;
        Ok(InValues::List(values))
    }

    /// Materialized view filter: `IS NOT NULL` restrictions mixed with
    /// ordinary relations, joined by `AND`.
    pub(crate) fn parse_view_where(&mut self) -> Result<(Vec<Identifier>, Vec<Relation>), ParseError> {
        let mut not_null = Vec::new();
        let mut relations = Vec::new();
        loop {
            if self.check_identifier() && self.peek_is_keyword(1, Keyword::Is) {
                not_null.push(self.expect_identifier()?);
                self.expect_keyword(Keyword::Is)?;
                self.expect_keyword(Keyword::Not)?;
                self.expect_keyword(Keyword::Null)?;
            } else {
                relations.push(self.parse_relation()?);
            }
            if !self.eat_keyword(Keyword::And) {
                break;
            }
        }
        Ok((not_null, relations))
    }
}
