//! Data manipulation statements.

use super::ast::*;
use super::parser::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    /// `USE keyspace`
    pub(crate) fn parse_use(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Use)?;
        let keyspace = self.expect_identifier()?;
        Ok(Statement::Use(UseStmt { keyspace }))
    }

    /// `TRUNCATE [TABLE] [ks.]table`
    pub(crate) fn parse_truncate(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Truncate)?;
        let _ = self.eat_keyword(Keyword::Table) || self.eat_keyword(Keyword::Columnfamily);
        let table = self.parse_qualified_name()?;
        Ok(Statement::Truncate(TruncateStmt { table }))
    }

    // ========================================================================
    // SELECT
    // ========================================================================

    pub(crate) fn parse_select(&mut self) -> Result<SelectStmt, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        // JSON and DISTINCT are soft: `SELECT json FROM t` selects a column.
        let json = self.check_select_modifier(Keyword::Json);
        if json {
            self.advance();
        }
        let distinct = self.check_select_modifier(Keyword::Distinct);
        if distinct {
            self.advance();
        }

        let selection = self.parse_selection()?;
        self.expect_keyword(Keyword::From)?;
        let from = self.parse_qualified_name()?;
        let where_clause = self.parse_where_clause()?;

        let mut order_by = Vec::new();
        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            order_by.push(self.parse_ordering()?);
            while self.eat(&TokenKind::Comma) {
                order_by.push(self.parse_ordering()?);
            }
        }

        let per_partition_limit = if self.eat_keyword(Keyword::Per) {
            self.expect_keyword(Keyword::Partition)?;
            self.expect_keyword(Keyword::Limit)?;
            Some(self.parse_term()?)
        } else {
            None
        };

        let limit = if self.eat_keyword(Keyword::Limit) {
            Some(self.parse_term()?)
        } else {
            None
        };

        let allow_filtering = if self.eat_keyword(Keyword::Allow) {
            self.expect_keyword(Keyword::Filtering)?;
            true
        } else {
            false
        };

        Ok(SelectStmt {
            json,
            distinct,
            selection,
            from,
            where_clause,
            order_by,
            per_partition_limit,
            limit,
            allow_filtering,
        })
    }

    /// A modifier keyword counts only when a selection still follows it.
    fn check_select_modifier(&self, keyword: Keyword) -> bool {
        if !self.check_keyword(keyword) {
            return false;
        }
        let next = &self.peek(1).kind;
        !(matches!(next, TokenKind::Comma | TokenKind::LParen | TokenKind::Eof)
            || matches!(next, TokenKind::Keyword(Keyword::From | Keyword::As)))
    }

    /// `*` or `selector [AS alias] (',' selector [AS alias])*`
    pub(crate) fn parse_selection(&mut self) -> Result<Selection, ParseError> {
        if self.eat(&TokenKind::Star) {
            return Ok(Selection::Star);
        }
        let mut selectors = vec![self.parse_selector()?];
        while self.eat(&TokenKind::Comma) {
            selectors.push(self.parse_selector()?);
        }
        Ok(Selection::Selectors(selectors))
    }

    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let expr = if self.check_function_call() {
            SelectorExpr::FunctionCall(self.parse_function_call()?)
        } else {
            SelectorExpr::Column(self.expect_identifier()?)
        };
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        Ok(Selector { expr, alias })
    }

    /// `column [ASC | DESC]`
    pub(crate) fn parse_ordering(&mut self) -> Result<Ordering, ParseError> {
        let column = self.expect_identifier()?;
        let direction = if self.eat_keyword(Keyword::Desc) {
            Direction::Desc
        } else {
            let _ = self.eat_keyword(Keyword::Asc);
            Direction::Asc
        };
        Ok(Ordering { column, direction })
    }

    // ========================================================================
    // Batches
    // ========================================================================

    /// `BEGIN [LOGGED | UNLOGGED | COUNTER] BATCH [USING TIMESTAMP t]`
    /// followed by one modification statement.
    pub(crate) fn parse_batched_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Begin)?;
        let kind = if self.eat_keyword(Keyword::Unlogged) {
            BatchKind::Unlogged
        } else if self.eat_keyword(Keyword::Counter) {
            BatchKind::Counter
        } else {
            let _ = self.eat_keyword(Keyword::Logged);
            BatchKind::Logged
        };
        self.expect_keyword(Keyword::Batch)?;

        let timestamp = if self.eat_keyword(Keyword::Using) {
            self.expect_keyword(Keyword::Timestamp)?;
            Some(self.parse_term()?)
        } else {
            None
        };
        let header = Some(BatchHeader { kind, timestamp });

        if self.check_keyword(Keyword::Insert) {
            self.parse_insert(header).map(Statement::Insert)
        } else if self.check_keyword(Keyword::Update) {
            self.parse_update(header).map(Statement::Update)
        } else if self.check_keyword(Keyword::Delete) {
            self.parse_delete(header).map(Statement::Delete)
        } else {
            for kw in [Keyword::Insert, Keyword::Update, Keyword::Delete] {
                self.note_expected(kw.as_str());
            }
            Err(self.unexpected())
        }
    }

    /// `[USING (TTL t | TIMESTAMP t) (AND (TTL t | TIMESTAMP t))*]`
    pub(crate) fn parse_using_clause(&mut self) -> Result<UsingClause, ParseError> {
        let mut using = UsingClause::default();
        if !self.eat_keyword(Keyword::Using) {
            return Ok(using);
        }
        loop {
            if self.eat_keyword(Keyword::Ttl) {
                if using.ttl.is_some() {
                    return Err(self.error("TTL given more than once"));
                }
                using.ttl = Some(self.parse_term()?);
            } else if self.eat_keyword(Keyword::Timestamp) {
                if using.timestamp.is_some() {
                    return Err(self.error("TIMESTAMP given more than once"));
                }
                using.timestamp = Some(self.parse_term()?);
            } else {
                return Err(self.unexpected());
            }
            if !self.eat_keyword(Keyword::And) {
                break;
            }
        }
        Ok(using)
    }

    // ========================================================================
    // INSERT
    // ========================================================================

    pub(crate) fn parse_insert(
        &mut self,
        begin_batch: Option<BatchHeader>,
    ) -> Result<InsertStmt, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_qualified_name()?;

        let values = if self.eat_keyword(Keyword::Json) {
            InsertValues::Json(self.parse_term()?)
        } else {
            let mut columns = Vec::new();
            if self.eat(&TokenKind::LParen) {
                columns = self.parse_identifier_list()?;
                self.expect(TokenKind::RParen)?;
            }
            self.expect_keyword(Keyword::Values)?;
            self.expect(TokenKind::LParen)?;
            let values = self.parse_term_list()?;
            self.expect(TokenKind::RParen)?;
            InsertValues::Values { columns, values }
        };

        let if_not_exists = self.parse_if_not_exists()?;
        let using = self.parse_using_clause()?;

        Ok(InsertStmt {
            begin_batch,
            table,
            values,
            if_not_exists,
            using,
        })
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    pub(crate) fn parse_update(
        &mut self,
        begin_batch: Option<BatchHeader>,
    ) -> Result<UpdateStmt, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_qualified_name()?;
        let using = self.parse_using_clause()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.eat(&TokenKind::Comma) {
            assignments.push(self.parse_assignment()?);
        }

        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_relation_list()?;
        let condition = self.parse_condition()?;

        Ok(UpdateStmt {
            begin_batch,
            table,
            using,
            assignments,
            where_clause,
            condition,
        })
    }

    /// `c = term`, `c = c + term`, `c = term + c` or `c[key] = term`.
    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let column = self.expect_identifier()?;

        if self.eat(&TokenKind::LBracket) {
            let key = self.parse_term()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Eq)?;
            let value = self.parse_term()?;
            return Ok(Assignment::Element { column, key, value });
        }

        self.expect(TokenKind::Eq)?;

        if self.check_identifier() && matches!(self.peek(1).kind, TokenKind::Plus | TokenKind::Minus) {
            let source = self.expect_identifier()?;
            let op = self.parse_arithmetic_op()?;
            let value = self.parse_term()?;
            return Ok(Assignment::Arithmetic {
                column,
                source,
                op,
                value,
            });
        }

        let value = self.parse_term()?;
        if matches!(self.current().kind, TokenKind::Plus | TokenKind::Minus) && self.peek_is_identifier(1) {
            let op = self.parse_arithmetic_op()?;
            let source = self.expect_identifier()?;
            return Ok(Assignment::Prepend {
                column,
                value,
                op,
                source,
            });
        }
        Ok(Assignment::Value { column, value })
    }

    fn parse_arithmetic_op(&mut self) -> Result<ArithmeticOp, ParseError> {
        if self.eat(&TokenKind::Plus) {
            Ok(ArithmeticOp::Add)
        } else if self.eat(&TokenKind::Minus) {
            Ok(ArithmeticOp::Subtract)
        } else {
            Err(self.unexpected())
        }
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    pub(crate) fn parse_delete(
        &mut self,
        begin_batch: Option<BatchHeader>,
    ) -> Result<DeleteStmt, ParseError> {
        self.expect_keyword(Keyword::Delete)?;

        let mut columns = Vec::new();
        if !self.check_keyword(Keyword::From) {
            columns.push(self.parse_delete_target()?);
            while self.eat(&TokenKind::Comma) {
                columns.push(self.parse_delete_target()?);
            }
        }

        self.expect_keyword(Keyword::From)?;
        let table = self.parse_qualified_name()?;

        let timestamp = if self.eat_keyword(Keyword::Using) {
            self.expect_keyword(Keyword::Timestamp)?;
            Some(self.parse_term()?)
        } else {
            None
        };

        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_relation_list()?;
        let condition = self.parse_condition()?;

        Ok(DeleteStmt {
            begin_batch,
            columns,
            table,
            timestamp,
            where_clause,
            condition,
        })
    }

    fn parse_delete_target(&mut self) -> Result<DeleteTarget, ParseError> {
        let column = self.expect_identifier()?;
        if self.eat(&TokenKind::LBracket) {
            let key = self.parse_term()?;
            self.expect(TokenKind::RBracket)?;
            return Ok(DeleteTarget::Element { column, key });
        }
        Ok(DeleteTarget::Column(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statement;

    fn int(value: &str) -> Term {
        Term::Constant(Constant::Integer(value.to_string()))
    }

    fn select(source: &str) -> SelectStmt {
        match parse_statement(source) {
            Ok(Statement::Select(stmt)) => stmt,
            other => panic!("expected SELECT, got {:?}", other),
        }
    }

    fn update(source: &str) -> UpdateStmt {
        match parse_statement(source) {
            Ok(Statement::Update(stmt)) => stmt,
            other => panic!("expected UPDATE, got {:?}", other),
        }
    }

    #[test]
    fn test_select_all_clauses() {
        let stmt = select(
            "SELECT DISTINCT k, count(*) AS n FROM ks.t WHERE k = ? \
             ORDER BY c DESC, d PER PARTITION LIMIT 2 LIMIT 10 ALLOW FILTERING",
        );
        assert!(stmt.distinct);
        assert!(!stmt.json);
        match &stmt.selection {
            Selection::Selectors(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].alias, Some(Identifier::bare("n")));
            }
            Selection::Star => panic!("expected selectors"),
        }
        assert_eq!(stmt.from.keyspace, Some(Identifier::bare("ks")));
        assert_eq!(stmt.order_by.len(), 2);
        assert_eq!(stmt.order_by[0].direction, Direction::Desc);
        assert_eq!(stmt.order_by[1].direction, Direction::Asc);
        assert_eq!(stmt.per_partition_limit, Some(int("2")));
        assert_eq!(stmt.limit, Some(int("10")));
        assert!(stmt.allow_filtering);
    }

    #[test]
    fn test_select_json_is_soft() {
        let stmt = select("SELECT JSON * FROM t");
        assert!(stmt.json);
        let stmt = select("SELECT json FROM t");
        assert!(!stmt.json);
        assert_eq!(
            stmt.selection,
            Selection::Selectors(vec![Selector {
                expr: SelectorExpr::Column(Identifier::bare("json")),
                alias: None,
            }])
        );
    }

    #[test]
    fn test_select_missing_from() {
        let err = parse_statement("SELECT a b").unwrap_err();
        let expected = err.expected();
        assert!(expected.iter().any(|e| e == "FROM"));
        assert!(expected.iter().any(|e| e == "','"));
        assert!(expected.iter().any(|e| e == "AS"));
    }

    #[test]
    fn test_insert_json_and_using_either_order() {
        let stmt = match parse_statement("INSERT INTO t JSON '{\"a\": 1}' USING TIMESTAMP 5 AND TTL 60") {
            Ok(Statement::Insert(stmt)) => stmt,
            other => panic!("expected INSERT, got {:?}", other),
        };
        assert!(matches!(stmt.values, InsertValues::Json(_)));
        assert_eq!(stmt.using.ttl, Some(int("60")));
        assert_eq!(stmt.using.timestamp, Some(int("5")));
    }

    #[test]
    fn test_using_rejects_duplicates() {
        let err = parse_statement("INSERT INTO t (a) VALUES (1) USING TTL 1 AND TTL 2").unwrap_err();
        assert!(err.to_string().contains("TTL given more than once"));
    }

    #[test]
    fn test_update_assignment_forms() {
        let stmt = update(
            "UPDATE t USING TTL 5 SET a = 1, b = b + {'x'}, c = [0] + c, m['k'] = 'v', n = n - 1 \
             WHERE k = 1 IF EXISTS",
        );
        assert_eq!(stmt.assignments.len(), 5);
        assert!(matches!(&stmt.assignments[0], Assignment::Value { .. }));
        assert!(matches!(&stmt.assignments[1], Assignment::Arithmetic { op: ArithmeticOp::Add, .. }));
        assert!(matches!(&stmt.assignments[2], Assignment::Prepend { source, .. } if source.as_str() == "c"));
        assert!(matches!(&stmt.assignments[3], Assignment::Element { .. }));
        assert!(matches!(
            &stmt.assignments[4],
            Assignment::Arithmetic { op: ArithmeticOp::Subtract, value, .. } if *value == int("1")
        ));
        assert_eq!(stmt.condition, Some(Condition::Exists));
    }

    #[test]
    fn test_update_negative_value_and_conditions() {
        let stmt = update("UPDATE t SET a = -1 WHERE k = 1 IF a = 0 AND b > 2");
        assert_eq!(
            stmt.assignments[0],
            Assignment::Value {
                column: Identifier::bare("a"),
                value: int("-1"),
            }
        );
        assert!(matches!(stmt.condition, Some(Condition::Relations(ref r)) if r.len() == 2));
    }

    #[test]
    fn test_delete_targets() {
        let stmt = match parse_statement("DELETE a, m['k'] FROM t USING TIMESTAMP 9 WHERE k = 1") {
            Ok(Statement::Delete(stmt)) => stmt,
            other => panic!("expected DELETE, got {:?}", other),
        };
        assert_eq!(stmt.columns.len(), 2);
        assert!(matches!(&stmt.columns[1], DeleteTarget::Element { .. }));
        assert_eq!(stmt.timestamp, Some(int("9")));
    }

    #[test]
    fn test_batch_prefix_and_apply() {
        let stmt = parse_statement("BEGIN UNLOGGED BATCH USING TIMESTAMP 3 INSERT INTO t (a) VALUES (1)")
            .unwrap();
        match stmt {
            Statement::Insert(insert) => {
                let header = insert.begin_batch.expect("batch header");
                assert_eq!(header.kind, BatchKind::Unlogged);
                assert_eq!(header.timestamp, Some(int("3")));
            }
            other => panic!("expected INSERT, got {:?}", other),
        }
        assert_eq!(parse_statement("APPLY BATCH").unwrap(), Statement::ApplyBatch);

        let err = parse_statement("BEGIN BATCH SELECT * FROM t").unwrap_err();
        assert!(err.expected().iter().any(|e| e == "INSERT"));
    }

    #[test]
    fn test_truncate_and_use() {
        assert!(matches!(parse_statement("TRUNCATE TABLE ks.t"), Ok(Statement::Truncate(_))));
        assert!(matches!(parse_statement("truncate t"), Ok(Statement::Truncate(_))));
        assert_eq!(
            parse_statement("USE \"MyKs\"").unwrap(),
            Statement::Use(UseStmt {
                keyspace: Identifier::quoted("MyKs"),
            })
        );
    }
}
