//! Schema statements: keyspaces, tables, indexes, types, triggers,
//! materialized views, functions and aggregates.
//!
//! Each `parse_create_*` / `parse_alter_*` rule starts after the object
//! keyword, which the dispatcher has already consumed.

use super::ast::*;
use super::parser::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    // ========================================================================
    // Keyspaces
    // ========================================================================

    pub(crate) fn parse_create_keyspace(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.expect_identifier()?;
        let (replication, durable_writes) = self.parse_keyspace_options()?;
        Ok(Statement::CreateKeyspace(CreateKeyspaceStmt {
            if_not_exists,
            name,
            replication,
            durable_writes,
        }))
    }

    pub(crate) fn parse_alter_keyspace(&mut self) -> Result<Statement, ParseError> {
        let name = self.expect_identifier()?;
        let (replication, durable_writes) = self.parse_keyspace_options()?;
        Ok(Statement::AlterKeyspace(AlterKeyspaceStmt {
            name,
            replication,
            durable_writes,
        }))
    }

    /// `WITH REPLICATION = {..} [AND DURABLE_WRITES = bool]`
    fn parse_keyspace_options(
        &mut self,
    ) -> Result<(Vec<(Constant, Constant)>, Option<bool>), ParseError> {
        self.expect_keyword(Keyword::With)?;
        self.expect_keyword(Keyword::Replication)?;
        self.expect(TokenKind::Eq)?;
        let replication = self.parse_constant_map()?;
        let durable_writes = if self.eat_keyword(Keyword::And) {
            self.expect_keyword(Keyword::DurableWrites)?;
            self.expect(TokenKind::Eq)?;
            Some(self.parse_bool()?)
        } else {
            None
        };
        Ok((replication, durable_writes))
    }

    // ========================================================================
    // Tables
    // ========================================================================

    pub(crate) fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        self.expect(TokenKind::LParen)?;
        let mut columns = Vec::new();
        let mut primary_key = None;
        loop {
            if self.eat_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                primary_key = Some(self.parse_primary_key()?);
            } else {
                columns.push(self.parse_column_definition()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let options = if self.eat_keyword(Keyword::With) {
            self.parse_table_options()?
        } else {
            TableOptions::default()
        };

        Ok(Statement::CreateTable(CreateTableStmt {
            if_not_exists,
            name,
            columns,
            primary_key,
            options,
        }))
    }

    /// `name type [STATIC] [PRIMARY KEY]`
    fn parse_column_definition(&mut self) -> Result<ColumnDefinition, ParseError> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        let is_static = self.eat_keyword(Keyword::Static);
        let primary_key = if self.eat_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            true
        } else {
            false
        };
        Ok(ColumnDefinition {
            name,
            data_type,
            is_static,
            primary_key,
        })
    }

    /// `'(' (name | '(' names ')') (',' name)* ')'`
    pub(crate) fn parse_primary_key(&mut self) -> Result<PrimaryKey, ParseError> {
        self.expect(TokenKind::LParen)?;
        let partition_key = if self.eat(&TokenKind::LParen) {
            let names = self.parse_identifier_list()?;
            self.expect(TokenKind::RParen)?;
            names
        } else {
            vec![self.expect_identifier()?]
        };
        let mut clustering_columns = Vec::new();
        while self.eat(&TokenKind::Comma) {
            clustering_columns.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(PrimaryKey {
            partition_key,
            clustering_columns,
        })
    }

    /// Options after `WITH`: `COMPACT STORAGE`, `CLUSTERING ORDER BY (..)`
    /// and `name = value`, joined by `AND`.
    pub(crate) fn parse_table_options(&mut self) -> Result<TableOptions, ParseError> {
        let mut options = TableOptions::default();
        loop {
            if self.check_keyword(Keyword::Compact) && self.peek_is_keyword(1, Keyword::Storage) {
                self.advance();
                self.advance();
                options.compact_storage = true;
            } else if self.check_keyword(Keyword::Clustering) && self.peek_is_keyword(1, Keyword::Order) {
                self.advance();
                self.advance();
                self.expect_keyword(Keyword::By)?;
                self.expect(TokenKind::LParen)?;
                options.clustering_order.push(self.parse_ordering()?);
                while self.eat(&TokenKind::Comma) {
                    options.clustering_order.push(self.parse_ordering()?);
                }
                self.expect(TokenKind::RParen)?;
            } else {
                options.properties.push(self.parse_property()?);
            }
            if !self.eat_keyword(Keyword::And) {
                break;
            }
        }
        Ok(options)
    }

    /// `name = constant | name | {map}`
    fn parse_property(&mut self) -> Result<Property, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Eq)?;
        let value = if self.check(&TokenKind::LBrace) {
            PropertyValue::Map(self.parse_constant_map()?)
        } else if self.check_identifier() {
            PropertyValue::Identifier(self.expect_identifier()?)
        } else {
            PropertyValue::Constant(self.parse_constant()?)
        };
        Ok(Property { name, value })
    }

    pub(crate) fn parse_alter_table(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_qualified_name()?;

        let operation = if self.eat_keyword(Keyword::Add) {
            AlterTableOperation::Add(self.parse_field_definitions(true)?)
        } else if self.eat_keyword(Keyword::Drop) {
            if self.check_keyword(Keyword::Compact) && self.peek_is_keyword(1, Keyword::Storage) {
                self.advance();
                self.advance();
                AlterTableOperation::DropCompactStorage
            } else if self.eat(&TokenKind::LParen) {
                let names = self.parse_identifier_list()?;
                self.expect(TokenKind::RParen)?;
                AlterTableOperation::Drop(names)
            } else {
                AlterTableOperation::Drop(self.parse_identifier_list()?)
            }
        } else if self.eat_keyword(Keyword::Alter) {
            let column = self.expect_identifier()?;
            self.expect_keyword(Keyword::Type)?;
            let data_type = self.parse_data_type()?;
            AlterTableOperation::AlterColumnType { column, data_type }
        } else if self.eat_keyword(Keyword::Rename) {
            AlterTableOperation::Rename(self.parse_renames()?)
        } else if self.eat_keyword(Keyword::With) {
            AlterTableOperation::With(self.parse_table_options()?)
        } else {
            return Err(self.unexpected());
        };

        Ok(Statement::AlterTable(AlterTableStmt { name, operation }))
    }

    /// `name type (',' name type)*`, optionally parenthesized.
    fn parse_field_definitions(
        &mut self,
        allow_parens: bool,
    ) -> Result<Vec<(Identifier, DataType)>, ParseError> {
        let parenthesized = allow_parens && self.eat(&TokenKind::LParen);
        let mut fields = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let data_type = self.parse_data_type()?;
            fields.push((name, data_type));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if parenthesized {
            self.expect(TokenKind::RParen)?;
        }
        Ok(fields)
    }

    /// `a TO b (AND c TO d)*`
    fn parse_renames(&mut self) -> Result<Vec<(Identifier, Identifier)>, ParseError> {
        let mut renames = Vec::new();
        loop {
            let from = self.expect_identifier()?;
            self.expect_keyword(Keyword::To)?;
            let to = self.expect_identifier()?;
            renames.push((from, to));
            if !self.eat_keyword(Keyword::And) {
                break;
            }
        }
        Ok(renames)
    }

    /// `[IF EXISTS] [ks.]name`
    pub(crate) fn parse_drop_object(&mut self) -> Result<DropStmt, ParseError> {
        let if_exists = self.parse_if_exists()?;
        let name = self.parse_qualified_name()?;
        Ok(DropStmt { if_exists, name })
    }

    // ========================================================================
    // Indexes
    // ========================================================================

    pub(crate) fn parse_create_index(&mut self, custom: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = if self.check_keyword(Keyword::On) {
            None
        } else {
            Some(self.expect_identifier()?)
        };
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_qualified_name()?;

        self.expect(TokenKind::LParen)?;
        let target = match self.attempt(|p| p.parse_index_function_target())? {
            Some(target) => target,
            None => IndexTarget::Column(self.expect_identifier()?),
        };
        self.expect(TokenKind::RParen)?;

        let custom = if custom {
            self.expect_keyword(Keyword::Using)?;
            let class = self.expect_string()?;
            let options = if self.eat_keyword(Keyword::With) {
                self.expect_keyword(Keyword::Options)?;
                self.expect(TokenKind::Eq)?;
                self.parse_constant_map()?
            } else {
                Vec::new()
            };
            Some(CustomIndex { class, options })
        } else {
            None
        };

        Ok(Statement::CreateIndex(CreateIndexStmt {
            custom,
            if_not_exists,
            name,
            table,
            target,
        }))
    }

    /// `keys(c)`, `values(c)`, `entries(c)` or `full(c)`.
    fn parse_index_function_target(&mut self) -> Result<IndexTarget, ParseError> {
        let wrap: fn(Identifier) -> IndexTarget = match self.current().kind {
            TokenKind::Keyword(Keyword::Keys) => IndexTarget::Keys,
            TokenKind::Keyword(Keyword::Values) => IndexTarget::Values,
            TokenKind::Keyword(Keyword::Entries) => IndexTarget::Entries,
            TokenKind::Keyword(Keyword::Full) => IndexTarget::Full,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        self.expect(TokenKind::LParen)?;
        let column = self.expect_identifier()?;
        self.expect(TokenKind::RParen)?;
        Ok(wrap(column))
    }

    // ========================================================================
    // User-defined types
    // ========================================================================

    pub(crate) fn parse_create_type(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect(TokenKind::LParen)?;
        let fields = self.parse_field_definitions(false)?;
        self.expect(TokenKind::RParen)?;
        Ok(Statement::CreateType(CreateTypeStmt {
            if_not_exists,
            name,
            fields,
        }))
    }

    pub(crate) fn parse_alter_type(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_qualified_name()?;
        let operation = if self.eat_keyword(Keyword::Alter) {
            let field = self.expect_identifier()?;
            self.expect_keyword(Keyword::Type)?;
            let data_type = self.parse_data_type()?;
            AlterTypeOperation::AlterField { field, data_type }
        } else if self.eat_keyword(Keyword::Add) {
            AlterTypeOperation::Add(self.parse_field_definitions(false)?)
        } else if self.eat_keyword(Keyword::Rename) {
            AlterTypeOperation::Rename(self.parse_renames()?)
        } else {
            return Err(self.unexpected());
        };
        Ok(Statement::AlterType(AlterTypeStmt { name, operation }))
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// `[IF NOT EXISTS] [ks.]name [ON [ks.]table] USING 'class'`
    pub(crate) fn parse_create_trigger(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let table = if self.eat_keyword(Keyword::On) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Using)?;
        let class = self.expect_string()?;
        Ok(Statement::CreateTrigger(CreateTriggerStmt {
            if_not_exists,
            name,
            table,
            class,
        }))
    }

    pub(crate) fn parse_drop_trigger(&mut self) -> Result<Statement, ParseError> {
        let if_exists = self.parse_if_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_qualified_name()?;
        Ok(Statement::DropTrigger(DropTriggerStmt {
            if_exists,
            name,
            table,
        }))
    }

    // ========================================================================
    // Materialized views
    // ========================================================================

    pub(crate) fn parse_create_materialized_view(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::As)?;
        self.expect_keyword(Keyword::Select)?;
        let selection = self.parse_selection()?;
        self.expect_keyword(Keyword::From)?;
        let base_table = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::Where)?;
        let (not_null, where_clause) = self.parse_view_where()?;
        self.expect_keyword(Keyword::Primary)?;
        self.expect_keyword(Keyword::Key)?;
        let primary_key = self.parse_primary_key()?;
        let options = if self.eat_keyword(Keyword::With) {
            self.parse_table_options()?
        } else {
            TableOptions::default()
        };

        Ok(Statement::CreateMaterializedView(CreateMaterializedViewStmt {
            if_not_exists,
            name,
            selection,
            base_table,
            not_null,
            where_clause,
            primary_key,
            options,
        }))
    }

    pub(crate) fn parse_alter_materialized_view(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::With)?;
        let options = self.parse_table_options()?;
        Ok(Statement::AlterMaterializedView(AlterMaterializedViewStmt {
            name,
            options,
        }))
    }

    // ========================================================================
    // Functions and aggregates
    // ========================================================================

    /// `[IF NOT EXISTS] name (params) (CALLED | RETURNS NULL) ON NULL INPUT
    /// RETURNS type LANGUAGE lang AS body`
    pub(crate) fn parse_create_function(&mut self, or_replace: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            params = self.parse_field_definitions(false)?;
            self.expect(TokenKind::RParen)?;
        }

        let called_on_null_input = if self.eat_keyword(Keyword::Called) {
            true
        } else if self.eat_keyword(Keyword::Returns) {
            self.expect_keyword(Keyword::Null)?;
            false
        } else {
            return Err(self.unexpected());
        };
        self.expect_keyword(Keyword::On)?;
        self.expect_keyword(Keyword::Null)?;
        self.expect_keyword(Keyword::Input)?;

        self.expect_keyword(Keyword::Returns)?;
        let return_type = self.parse_data_type()?;
        self.expect_keyword(Keyword::Language)?;
        let language = self.expect_identifier()?;
        self.expect_keyword(Keyword::As)?;
        let body = match &self.current().kind {
            TokenKind::CodeBlock(body) | TokenKind::String(body) => body.clone(),
            _ => {
                self.note_expected("code block");
                self.note_expected("string literal");
                return Err(self.unexpected());
            }
        };
        self.advance();

        Ok(Statement::CreateFunction(CreateFunctionStmt {
            or_replace,
            if_not_exists,
            name,
            params,
            called_on_null_input,
            return_type,
            language,
            body,
        }))
    }

    /// `[IF NOT EXISTS] name (types) SFUNC f STYPE type [FINALFUNC f]
    /// [INITCOND term]`
    pub(crate) fn parse_create_aggregate(&mut self, or_replace: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let arg_types = self.parse_type_list()?;

        self.expect_keyword(Keyword::Sfunc)?;
        let state_function = self.expect_identifier()?;
        self.expect_keyword(Keyword::Stype)?;
        let state_type = self.parse_data_type()?;

        let final_function = if self.eat_keyword(Keyword::Finalfunc) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let initial_condition = if self.eat_keyword(Keyword::Initcond) {
            Some(self.parse_term()?)
        } else {
            None
        };

        Ok(Statement::CreateAggregate(CreateAggregateStmt {
            or_replace,
            if_not_exists,
            name,
            arg_types,
            state_function,
            state_type,
            final_function,
            initial_condition,
        }))
    }

    /// `[IF EXISTS] [ks.]name [(types)]`
    pub(crate) fn parse_drop_routine(&mut self) -> Result<DropRoutineStmt, ParseError> {
        let if_exists = self.parse_if_exists()?;
        let name = self.parse_qualified_name()?;
        let signature = if self.check(&TokenKind::LParen) {
            Some(self.parse_type_list()?)
        } else {
            None
        };
        Ok(DropRoutineStmt {
            if_exists,
            name,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_script, parse_statement};

    fn ident(name: &str) -> Identifier {
        Identifier::bare(name)
    }

    fn create_table(source: &str) -> CreateTableStmt {
        match parse_statement(source) {
            Ok(Statement::CreateTable(stmt)) => stmt,
            other => panic!("expected CREATE TABLE, got {:?}", other),
        }
    }

    #[test]
    fn test_create_keyspace() {
        let stmt = parse_statement(
            "CREATE KEYSPACE IF NOT EXISTS ks WITH REPLICATION = \
             {'class': 'SimpleStrategy', 'replication_factor': 3} AND DURABLE_WRITES = false",
        )
        .unwrap();
        match stmt {
            Statement::CreateKeyspace(ks) => {
                assert!(ks.if_not_exists);
                assert_eq!(ks.name, ident("ks"));
                assert_eq!(ks.replication.len(), 2);
                assert_eq!(ks.replication[1].1, Constant::Integer("3".to_string()));
                assert_eq!(ks.durable_writes, Some(false));
            }
            other => panic!("expected CREATE KEYSPACE, got {:?}", other),
        }
    }

    #[test]
    fn test_alter_and_drop_keyspace() {
        assert!(matches!(
            parse_statement("ALTER KEYSPACE ks WITH REPLICATION = {'class': 'NetworkTopologyStrategy'}"),
            Ok(Statement::AlterKeyspace(_))
        ));
        assert_eq!(
            parse_statement("DROP KEYSPACE IF EXISTS ks").unwrap(),
            Statement::DropKeyspace(DropKeyspaceStmt {
                if_exists: true,
                name: ident("ks"),
            })
        );
    }

    #[test]
    fn test_create_table_with_composite_key_and_options() {
        let stmt = create_table(
            "CREATE TABLE IF NOT EXISTS ks.events (\
                tenant uuid, day date, ts timeuuid, owner text STATIC, payload blob, \
                PRIMARY KEY ((tenant, day), ts)\
             ) WITH CLUSTERING ORDER BY (ts DESC) AND COMPACT STORAGE \
               AND compaction = {'class': 'LeveledCompactionStrategy'} AND gc_grace_seconds = 3600",
        );
        assert!(stmt.if_not_exists);
        assert_eq!(stmt.columns.len(), 5);
        assert!(stmt.columns[3].is_static);
        let key = stmt.primary_key.clone().expect("primary key element");
        assert_eq!(key.partition_key, vec![ident("tenant"), ident("day")]);
        assert_eq!(key.clustering_columns, vec![ident("ts")]);
        assert!(stmt.options.compact_storage);
        assert_eq!(stmt.options.clustering_order[0].direction, Direction::Desc);
        assert!(matches!(stmt.options.property("compaction"), Some(PropertyValue::Map(_))));
        assert_eq!(
            stmt.options.property("gc_grace_seconds"),
            Some(&PropertyValue::Constant(Constant::Integer("3600".to_string())))
        );
    }

    #[test]
    fn test_create_table_soft_keyword_names() {
        let stmt = create_table("CREATE TABLE key (key int PRIMARY KEY, type text)");
        assert_eq!(stmt.name.name, ident("key"));
        assert_eq!(stmt.columns[0].name, ident("key"));
        assert!(stmt.columns[0].primary_key);
        assert_eq!(stmt.columns[1].name, ident("type"));
        assert_eq!(
            stmt.effective_primary_key().map(|k| k.partition_key),
            Some(vec![ident("key")])
        );
    }

    #[test]
    fn test_create_table_reserved_column_name_fails() {
        let err = parse_statement("CREATE TABLE t (select int PRIMARY KEY)").unwrap_err();
        assert!(err.expected().iter().any(|e| e == "identifier"));
        assert!(err.expected().iter().any(|e| e == "PRIMARY"));
    }

    fn alter_operation(source: &str) -> AlterTableOperation {
        match parse_statement(source) {
            Ok(Statement::AlterTable(stmt)) => stmt.operation,
            other => panic!("{}: {:?}", source, other),
        }
    }

    #[test]
    fn test_alter_table_operations() {
        assert!(matches!(
            alter_operation("ALTER TABLE t ADD a int, b text"),
            AlterTableOperation::Add(cols) if cols.len() == 2
        ));
        assert!(matches!(
            alter_operation("ALTER TABLE t DROP a, b"),
            AlterTableOperation::Drop(cols) if cols.len() == 2
        ));
        assert_eq!(
            alter_operation("ALTER TABLE t DROP COMPACT STORAGE"),
            AlterTableOperation::DropCompactStorage
        );
        assert_eq!(
            alter_operation("ALTER TABLE t DROP compact"),
            AlterTableOperation::Drop(vec![ident("compact")])
        );
        assert!(matches!(
            alter_operation("ALTER TABLE t ALTER a TYPE blob"),
            AlterTableOperation::AlterColumnType { .. }
        ));
        assert!(matches!(
            alter_operation("ALTER TABLE t RENAME a TO b AND c TO d"),
            AlterTableOperation::Rename(pairs) if pairs.len() == 2
        ));
        assert!(matches!(
            alter_operation("ALTER TABLE t WITH comment = 'x'"),
            AlterTableOperation::With(opts) if opts.properties.len() == 1
        ));
    }

    #[test]
    fn test_create_index_targets() {
        let target = |source: &str| match parse_statement(source) {
            Ok(Statement::CreateIndex(stmt)) => stmt.target,
            other => panic!("{}: {:?}", source, other),
        };
        assert_eq!(target("CREATE INDEX ON t (v)"), IndexTarget::Column(ident("v")));
        assert_eq!(target("CREATE INDEX idx ON t (keys(m))"), IndexTarget::Keys(ident("m")));
        assert_eq!(target("CREATE INDEX ON t (entries(m))"), IndexTarget::Entries(ident("m")));
        assert_eq!(target("CREATE INDEX ON t (full(l))"), IndexTarget::Full(ident("l")));
        assert_eq!(target("CREATE INDEX ON t (values(s))"), IndexTarget::Values(ident("s")));
        // Backtracks: `keys` is the indexed column here.
        assert_eq!(target("CREATE INDEX ON t (keys)"), IndexTarget::Column(ident("keys")));
    }

    #[test]
    fn test_create_custom_index() {
        match parse_statement(
            "CREATE CUSTOM INDEX IF NOT EXISTS idx ON ks.t (v) USING 'org.example.Index' \
             WITH OPTIONS = {'mode': 'CONTAINS'}",
        ) {
            Ok(Statement::CreateIndex(stmt)) => {
                let custom = stmt.custom.expect("custom index");
                assert_eq!(custom.class, "org.example.Index");
                assert_eq!(custom.options.len(), 1);
                assert!(stmt.if_not_exists);
                assert_eq!(stmt.name, Some(ident("idx")));
            }
            other => panic!("expected CREATE INDEX, got {:?}", other),
        }
    }

    #[test]
    fn test_types() {
        match parse_statement("CREATE TYPE ks.address (street text, zip int, tags frozen<set<text>>)") {
            Ok(Statement::CreateType(stmt)) => assert_eq!(stmt.fields.len(), 3),
            other => panic!("expected CREATE TYPE, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("ALTER TYPE address ALTER zip TYPE varint"),
            Ok(Statement::AlterType(AlterTypeStmt { operation: AlterTypeOperation::AlterField { .. }, .. }))
        ));
        assert!(matches!(
            parse_statement("ALTER TYPE address RENAME zip TO postcode"),
            Ok(Statement::AlterType(_))
        ));
        assert!(matches!(parse_statement("DROP TYPE IF EXISTS address"), Ok(Statement::DropType(_))));
    }

    #[test]
    fn test_triggers() {
        match parse_statement("CREATE TRIGGER ks.audit ON t USING 'org.example.Audit'") {
            Ok(Statement::CreateTrigger(stmt)) => {
                assert_eq!(stmt.name.keyspace, Some(ident("ks")));
                assert_eq!(stmt.class, "org.example.Audit");
                assert!(stmt.table.is_some());
            }
            other => panic!("expected CREATE TRIGGER, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("CREATE TRIGGER audit USING 'x'"),
            Ok(Statement::CreateTrigger(CreateTriggerStmt { table: None, .. }))
        ));
        assert!(matches!(parse_statement("DROP TRIGGER audit ON ks.t"), Ok(Statement::DropTrigger(_))));
    }

    #[test]
    fn test_materialized_views() {
        let source = "CREATE MATERIALIZED VIEW ks.by_owner AS SELECT owner, id FROM ks.items \
                      WHERE owner IS NOT NULL AND id IS NOT NULL AND kind = 'a' \
                      PRIMARY KEY (owner, id) WITH comment = 'view'";
        match parse_statement(source) {
            Ok(Statement::CreateMaterializedView(stmt)) => {
                assert_eq!(stmt.not_null, vec![ident("owner"), ident("id")]);
                assert_eq!(stmt.where_clause.len(), 1);
                assert_eq!(stmt.primary_key.partition_key, vec![ident("owner")]);
                assert_eq!(stmt.options.properties.len(), 1);
            }
            other => panic!("expected CREATE MATERIALIZED VIEW, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("ALTER MATERIALIZED VIEW v WITH comment = 'x'"),
            Ok(Statement::AlterMaterializedView(_))
        ));
        assert!(matches!(
            parse_statement("DROP MATERIALIZED VIEW IF EXISTS ks.v"),
            Ok(Statement::DropMaterializedView(_))
        ));
    }

    #[test]
    fn test_create_function() {
        let source = "CREATE OR REPLACE FUNCTION IF NOT EXISTS ks.add_one (x int) \
                      RETURNS NULL ON NULL INPUT RETURNS int LANGUAGE java AS $$ return x + 1; $$";
        match parse_statement(source) {
            Ok(Statement::CreateFunction(stmt)) => {
                assert!(stmt.or_replace);
                assert!(stmt.if_not_exists);
                assert!(!stmt.called_on_null_input);
                assert_eq!(stmt.params, vec![(ident("x"), DataType::Native(NativeType::Int))]);
                assert_eq!(stmt.language, ident("java"));
                assert_eq!(stmt.body.trim(), "return x + 1;");
            }
            other => panic!("expected CREATE FUNCTION, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("CREATE FUNCTION f () CALLED ON NULL INPUT RETURNS text LANGUAGE lua AS 'return 1'"),
            Ok(Statement::CreateFunction(CreateFunctionStmt { called_on_null_input: true, .. }))
        ));
    }

    #[test]
    fn test_aggregates_and_drop_routines() {
        match parse_statement(
            "CREATE AGGREGATE ks.average (int) SFUNC avg_state STYPE tuple<int, bigint> \
             FINALFUNC avg_final INITCOND (0, 0)",
        ) {
            Ok(Statement::CreateAggregate(stmt)) => {
                assert_eq!(stmt.arg_types.len(), 1);
                assert_eq!(stmt.final_function, Some(ident("avg_final")));
                assert!(matches!(stmt.initial_condition, Some(Term::Tuple(_))));
            }
            other => panic!("expected CREATE AGGREGATE, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("CREATE AGGREGATE agg (int) SFUNC s STYPE int"),
            Ok(Statement::CreateAggregate(CreateAggregateStmt { final_function: None, initial_condition: None, .. }))
        ));
        match parse_statement("DROP FUNCTION IF EXISTS ks.f (int, text)") {
            Ok(Statement::DropFunction(stmt)) => {
                assert!(stmt.if_exists);
                assert_eq!(stmt.signature.map(|s| s.len()), Some(2));
            }
            other => panic!("expected DROP FUNCTION, got {:?}", other),
        }
        assert!(matches!(
            parse_statement("DROP AGGREGATE agg"),
            Ok(Statement::DropAggregate(DropRoutineStmt { signature: None, .. }))
        ));
    }

    #[test]
    fn test_drop_objects() {
        for (source, name) in [
            ("DROP TABLE IF EXISTS ks.t", "DROP TABLE"),
            ("DROP COLUMNFAMILY t", "DROP TABLE"),
            ("DROP INDEX ks.idx", "DROP INDEX"),
        ] {
            assert_eq!(parse_statement(source).unwrap().name(), name);
        }
    }

    #[test]
    fn test_redundant_frozen_reported_as_warning() {
        let output = parse_script("CREATE TABLE t (k int PRIMARY KEY, v frozen<frozen<list<int>>>);");
        assert_eq!(output.script.statements.len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert!(!output.diagnostics[0].is_error());
        assert_eq!(output.diagnostics[0].position.column, 38);
    }
}
