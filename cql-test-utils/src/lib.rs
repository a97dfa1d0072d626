//! CQL Test Utilities
//!
//! Shared test infrastructure for the cql-parser workspace:
//! - Proptest generators for names, types and literals
//! - A corpus of valid statements covering every statement kind
//! - Custom assertions for parse results and diagnostics

pub use cql_parser::{
    parse_script, parse_script_with, parse_statement, Constant, DataType, Diagnostic,
    Identifier, Keyword, NativeType, ParseError, ParseOutput, ParserConfig, QualifiedName,
    Severity, Statement,
};

use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating CQL source fragments and AST values.

    use super::*;
    use proptest::prelude::*;

    // === Names ===

    /// Generate a bare identifier that is not a keyword of any kind.
    pub fn arb_identifier() -> impl Strategy<Value = Identifier> {
        "[a-z][a-z0-9_]{0,11}"
            .prop_filter("keywords are not plain identifiers", |s| {
                Keyword::lookup(s).is_none()
            })
            .prop_map(|s| Identifier::bare(&s))
    }

    /// Generate a quoted identifier, mixed case and possibly containing `"`.
    pub fn arb_quoted_identifier() -> impl Strategy<Value = Identifier> {
        "[A-Za-z][A-Za-z0-9_ \"]{0,11}".prop_map(|s| Identifier::quoted(&s))
    }

    /// Generate a name with or without a keyspace prefix.
    pub fn arb_qualified_name() -> impl Strategy<Value = QualifiedName> {
        (proptest::option::of(arb_identifier()), arb_identifier())
            .prop_map(|(keyspace, name)| QualifiedName::new(keyspace, name))
    }

    /// Re-case a word randomly, one coin flip per character.
    pub fn arb_keyword_case(word: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
            word.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect()
        })
    }

    // === Types ===

    pub fn arb_native_type() -> impl Strategy<Value = NativeType> {
        proptest::sample::select(NativeType::ALL.to_vec())
    }

    /// Generate a data type tree up to four constructors deep.
    pub fn arb_data_type() -> impl Strategy<Value = DataType> {
        let leaf = prop_oneof![
            4 => arb_native_type().prop_map(DataType::Native),
            1 => arb_qualified_name().prop_map(DataType::UserDefined),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(|t| DataType::List(Box::new(t))),
                inner.clone().prop_map(|t| DataType::Set(Box::new(t))),
                (inner.clone(), inner.clone())
                    .prop_map(|(k, v)| DataType::Map(Box::new(k), Box::new(v))),
                proptest::collection::vec(inner.clone(), 1..4).prop_map(DataType::Tuple),
                inner.prop_map(|t| DataType::Frozen(Box::new(t))),
            ]
        })
    }

    // === Literals ===

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a constant whose display form lexes back to the same value.
    pub fn arb_constant() -> impl Strategy<Value = Constant> {
        prop_oneof![
            "[ -~]{0,16}".prop_map(Constant::String),
            "\\PC{0,8}".prop_map(Constant::String),
            any::<i64>().prop_map(|n| Constant::Integer(n.to_string())),
            (any::<i32>(), 0u32..1000)
                .prop_map(|(whole, frac)| Constant::Float(format!("{}.{:03}", whole, frac))),
            proptest::collection::vec(any::<u8>(), 1..16)
                .prop_map(|bytes| Constant::Hex(hex::encode(bytes))),
            arb_uuid().prop_map(Constant::Uuid),
            any::<bool>().prop_map(Constant::Boolean),
            Just(Constant::Null),
        ]
    }

    /// Arbitrary text biased toward CQL-looking fragments.
    pub fn arb_cql_noise() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            proptest::sample::select(Keyword::ALL.to_vec()).prop_map(|k| k.as_str().to_string()),
            "[a-z_]{1,6}",
            "[0-9]{1,4}",
            proptest::sample::select(vec![
                "(", ")", "<", ">", ",", ";", "=", "'", "\"", "{", "}", "[", "]", "?", ":",
                ".", "-", "$$", "/*", "--", "\n",
            ])
            .prop_map(str::to_string),
        ];
        proptest::collection::vec(fragment, 0..24).prop_map(|parts| parts.join(" "))
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Valid statements and scripts for tests and benchmarks.

    /// One valid statement per statement kind, in dispatch order.
    pub const STATEMENT_CORPUS: &[&str] = &[
        "USE analytics",
        "SELECT JSON DISTINCT id, name AS n, writetime(name) FROM ks.users \
         WHERE id = ? AND age >= 18 AND tags CONTAINS 'admin' ORDER BY name DESC \
         PER PARTITION LIMIT 2 LIMIT 100 ALLOW FILTERING",
        "INSERT INTO ks.users (id, name, emails) VALUES (now(), 'Ann', {'a@x.io'}) \
         IF NOT EXISTS USING TTL 86400 AND TIMESTAMP 1700000000",
        "UPDATE users USING TTL 60 SET visits = visits + 1, tags = ['new'] + tags, \
         prefs['theme'] = 'dark' WHERE id = 5 IF name = 'Ann'",
        "DELETE emails[0], name FROM users USING TIMESTAMP 42 WHERE id IN (1, 2) IF EXISTS",
        "BEGIN UNLOGGED BATCH USING TIMESTAMP 9 INSERT INTO t (k, v) VALUES (1, 'a')",
        "APPLY BATCH",
        "TRUNCATE TABLE ks.events",
        "CREATE KEYSPACE IF NOT EXISTS analytics WITH REPLICATION = \
         {'class': 'NetworkTopologyStrategy', 'dc1': 3} AND DURABLE_WRITES = false",
        "ALTER KEYSPACE analytics WITH REPLICATION = {'class': 'SimpleStrategy', 'replication_factor': 1}",
        "DROP KEYSPACE IF EXISTS analytics",
        "CREATE TABLE IF NOT EXISTS ks.events (tenant text, day date, at timeuuid, \
         payload frozen<map<text, list<int>>>, total counter static, \
         PRIMARY KEY ((tenant, day), at)) WITH CLUSTERING ORDER BY (at DESC) \
         AND comment = 'events' AND compaction = {'class': 'LeveledCompactionStrategy'}",
        "ALTER TABLE ks.events ADD source inet",
        "DROP TABLE IF EXISTS ks.events",
        "CREATE INDEX IF NOT EXISTS by_tag ON users (keys(prefs))",
        "DROP INDEX ks.by_tag",
        "CREATE TYPE IF NOT EXISTS ks.address (street text, zip int, geo tuple<float, float>)",
        "ALTER TYPE ks.address ADD country text",
        "DROP TYPE IF EXISTS ks.address",
        "CREATE TRIGGER audit ON ks.users USING 'org.example.AuditTrigger'",
        "DROP TRIGGER IF EXISTS audit ON ks.users",
        "CREATE MATERIALIZED VIEW ks.by_name AS SELECT id, name FROM ks.users \
         WHERE name IS NOT NULL AND id IS NOT NULL PRIMARY KEY (name, id) \
         WITH comment = 'lookup'",
        "ALTER MATERIALIZED VIEW ks.by_name WITH gc_grace_seconds = 3600",
        "DROP MATERIALIZED VIEW IF EXISTS ks.by_name",
        "CREATE OR REPLACE FUNCTION ks.plus (a int, b int) RETURNS NULL ON NULL INPUT \
         RETURNS int LANGUAGE java AS $$ return a + b; $$",
        "DROP FUNCTION IF EXISTS ks.plus (int, int)",
        "CREATE AGGREGATE IF NOT EXISTS ks.total (int) SFUNC plus STYPE int INITCOND 0",
        "DROP AGGREGATE ks.total",
        "CREATE ROLE IF NOT EXISTS analyst WITH PASSWORD = 'pw' AND LOGIN = true",
        "ALTER ROLE analyst WITH SUPERUSER = false",
        "DROP ROLE IF EXISTS analyst",
        "CREATE USER IF NOT EXISTS alice WITH PASSWORD 'secret' NOSUPERUSER",
        "ALTER USER alice SUPERUSER",
        "DROP USER IF EXISTS alice",
        "GRANT SELECT ON ALL KEYSPACES TO analyst",
        "REVOKE MODIFY ON TABLE ks.events FROM analyst",
        "LIST ALL PERMISSIONS ON KEYSPACE ks OF analyst NORECURSIVE",
        "LIST ROLES OF analyst",
        "LIST USERS",
    ];

    /// A small migration script with comments and every separator form.
    pub const MIGRATION_SCRIPT: &str = "\
-- schema v2
CREATE KEYSPACE IF NOT EXISTS shop
  WITH REPLICATION = {'class': 'SimpleStrategy', 'replication_factor': 1};
USE shop;

/* orders by customer */
CREATE TABLE orders (
  customer uuid,
  placed timestamp,
  items list<frozen<tuple<text, int>>>,
  PRIMARY KEY (customer, placed)
) WITH CLUSTERING ORDER BY (placed DESC);

CREATE INDEX ON orders (items);;
INSERT INTO orders (customer, placed, items)
  VALUES (123e4567-e89b-12d3-a456-426614174000, '2024-01-01', [('pen', 2)]);
";

    /// The whole corpus joined into one `;`-separated script.
    pub fn corpus_script() -> String {
        let mut script = STATEMENT_CORPUS.join(";\n");
        script.push(';');
        script
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for parse results and diagnostics.

    use super::*;

    /// Assert that a source parses as a single statement and return it.
    #[track_caller]
    pub fn assert_parses(source: &str) -> Statement {
        match parse_statement(source) {
            Ok(stmt) => stmt,
            Err(err) => panic!("Expected {:?} to parse, got: {}", source, err),
        }
    }

    /// Assert that a source is rejected and return the error.
    #[track_caller]
    pub fn assert_rejects(source: &str) -> ParseError {
        match parse_statement(source) {
            Ok(stmt) => panic!("Expected {:?} to be rejected, got: {:?}", source, stmt),
            Err(err) => err,
        }
    }

    /// Assert that an error is reported at the given line and column.
    #[track_caller]
    pub fn assert_error_at(err: &ParseError, line: usize, column: usize) {
        let pos = err.position();
        assert_eq!(
            (pos.line, pos.column),
            (line, column),
            "Wrong error position for: {}",
            err
        );
    }

    /// Assert that an error's expected set contains every listed label.
    #[track_caller]
    pub fn assert_expects(err: &ParseError, labels: &[&str]) {
        let expected = err.expected();
        for label in labels {
            assert!(
                expected.iter().any(|e| e == label),
                "Expected set of {} lacks {}: {:?}",
                err,
                label,
                expected
            );
        }
    }

    /// Assert that a script produced no error diagnostics.
    #[track_caller]
    pub fn assert_clean(output: &ParseOutput) {
        let errors: Vec<_> = output.errors().map(Diagnostic::to_string).collect();
        assert!(errors.is_empty(), "Unexpected errors: {:#?}", errors);
    }

    /// Assert the number of error-severity diagnostics.
    #[track_caller]
    pub fn assert_error_count(output: &ParseOutput, count: usize) {
        let errors: Vec<_> = output.errors().collect();
        assert_eq!(errors.len(), count, "Wrong error count: {:#?}", errors);
    }

    /// Assert the statement kinds of a script, in order.
    #[track_caller]
    pub fn assert_statement_names(output: &ParseOutput, names: &[&str]) {
        let actual: Vec<&str> = output.script.statements.iter().map(Statement::name).collect();
        assert_eq!(actual, names);
    }
}
