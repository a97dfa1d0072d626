//! Integration tests for whole-script parsing
//!
//! Tests verify:
//! - End-to-end parses of common statements
//! - Case folding of keywords and bare identifiers
//! - Soft keywords used as names
//! - Recovery at `;` and blank statements
//! - Recursion limit on nested types

use cql_parser::*;
use cql_test_utils::assertions::*;
use cql_test_utils::fixtures::{corpus_script, MIGRATION_SCRIPT, STATEMENT_CORPUS};
use std::collections::HashSet;

// ============================================================================
// HELPERS
// ============================================================================

fn int(value: &str) -> Term {
    Term::Constant(Constant::Integer(value.to_string()))
}

fn name(raw: &str) -> Identifier {
    Identifier::bare(raw)
}

fn only_statement(source: &str) -> Statement {
    let output = parse_script(source);
    assert_clean(&output);
    assert_eq!(output.script.statements.len(), 1, "for {:?}", source);
    output.script.statements.into_iter().next().unwrap()
}

// ============================================================================
// END-TO-END
// ============================================================================

#[test]
fn test_select_with_where_and_allow_filtering() {
    let stmt = only_statement("SELECT * FROM ks.tbl WHERE k=1 AND v IN (1,2,3) ALLOW FILTERING;");
    let select = match stmt {
        Statement::Select(select) => select,
        other => panic!("expected SELECT, got {:?}", other),
    };

    assert_eq!(select.from, QualifiedName::new(Some(name("ks")), name("tbl")));
    assert_eq!(select.selection, Selection::Star);
    assert_eq!(
        select.where_clause,
        vec![
            Relation::Compare {
                lhs: Operand::Column(name("k")),
                op: CompareOp::Eq,
                rhs: int("1"),
            },
            Relation::In {
                column: name("v"),
                values: InValues::List(vec![int("1"), int("2"), int("3")]),
            },
        ]
    );
    assert!(select.allow_filtering);
    assert!(select.limit.is_none());
}

#[test]
fn test_create_table_with_key_element() {
    let stmt = only_statement("CREATE TABLE t (a int, b text, PRIMARY KEY (a));");
    let table = match stmt {
        Statement::CreateTable(table) => table,
        other => panic!("expected CREATE TABLE, got {:?}", other),
    };

    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].data_type, DataType::Native(NativeType::Int));
    assert_eq!(table.columns[1].data_type, DataType::Native(NativeType::Text));
    let key = table.effective_primary_key().expect("primary key");
    assert_eq!(key.partition_key, vec![name("a")]);
    assert!(key.clustering_columns.is_empty());
}

#[test]
fn test_insert_if_not_exists() {
    let stmt = only_statement("INSERT INTO t (a,b) VALUES (1,'x') IF NOT EXISTS;");
    let insert = match stmt {
        Statement::Insert(insert) => insert,
        other => panic!("expected INSERT, got {:?}", other),
    };

    assert!(insert.if_not_exists);
    assert_eq!(
        insert.values,
        InsertValues::Values {
            columns: vec![name("a"), name("b")],
            values: vec![int("1"), Term::Constant(Constant::String("x".to_string()))],
        }
    );
}

#[test]
fn test_misspelled_statement_lists_statement_keywords() {
    let output = parse_script("SELEC * FROM t;");

    assert!(output.script.statements.is_empty());
    assert_error_count(&output, 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!((diagnostic.position.line, diagnostic.position.column), (1, 1));
    assert_eq!(diagnostic.found.as_deref(), Some("SELEC"));
    assert!(diagnostic.message.starts_with("unexpected 'SELEC'"), "{}", diagnostic.message);
    for keyword in [
        "ALTER", "APPLY", "BEGIN", "CREATE", "DELETE", "DROP", "GRANT", "INSERT", "LIST",
        "REVOKE", "SELECT", "TRUNCATE", "UPDATE", "USE",
    ] {
        assert!(
            diagnostic.expected.iter().any(|e| e == keyword),
            "{} missing from {:?}",
            keyword,
            diagnostic.expected
        );
    }
}

#[test]
fn test_blank_statement_between_two_statements() {
    let output = parse_script("DELETE FROM t WHERE k=1;; UPDATE t SET v=2 WHERE k=1;");

    assert_clean(&output);
    assert_statement_names(&output, &["DELETE", "UPDATE"]);
    assert_eq!(output.script.empty_statements, 1);
}

// ============================================================================
// CASE HANDLING
// ============================================================================

#[test]
fn test_keywords_are_case_insensitive() {
    let upper = assert_parses("SELECT a FROM t WHERE b = 1");
    let lower = assert_parses("select a from t where b = 1");
    let mixed = assert_parses("SeLeCt a FrOm t WhErE b = 1");
    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
}

#[test]
fn test_bare_names_fold_and_quoted_names_do_not() {
    let bare_upper = assert_parses("SELECT Foo FROM t");
    let bare_lower = assert_parses("SELECT foo FROM t");
    assert_eq!(bare_upper, bare_lower);

    let quoted_upper = assert_parses("SELECT \"Foo\" FROM t");
    let quoted_lower = assert_parses("SELECT \"foo\" FROM t");
    assert_ne!(quoted_upper, quoted_lower);

    // A quoted all-lowercase name denotes the same column as the bare name.
    assert_eq!(quoted_lower, bare_lower);
}

#[test]
fn test_quoted_identifier_escape() {
    match assert_parses("USE \"say \"\"hi\"\"\"") {
        Statement::Use(stmt) => {
            assert_eq!(stmt.keyspace.as_str(), "say \"hi\"");
            assert!(stmt.keyspace.quoted);
        }
        other => panic!("expected USE, got {:?}", other),
    }
}

#[test]
fn test_bare_name_keeps_source_spelling() {
    let select = match assert_parses("SELECT MyCol FROM MyKs.MyTable") {
        Statement::Select(select) => select,
        other => panic!("expected SELECT, got {:?}", other),
    };
    assert_eq!(select.from, QualifiedName::new(Some(name("myks")), name("mytable")));
    assert_eq!(select.from.name.raw, "MyTable");
    assert_eq!(select.from.name.source_text(), "MyTable");
    assert_eq!(select.from.keyspace.map(|ks| ks.raw), Some("MyKs".to_string()));
}

// ============================================================================
// FUNCTION ARGUMENTS
// ============================================================================

#[test]
fn test_count_star_is_accepted() {
    assert_parses("SELECT count(*) FROM t");
    assert_parses("SELECT COUNT(*) FROM t WHERE k = 1");
}

#[test]
fn test_star_rejected_beside_other_arguments() {
    let err = assert_rejects("SELECT f(a, *) FROM t");
    assert_error_at(&err, 1, 13);

    let err = assert_rejects("SELECT f(*, *) FROM t");
    assert_error_at(&err, 1, 11);
    assert_expects(&err, &["')'"]);
}

#[test]
fn test_star_rejected_in_token_call() {
    let err = assert_rejects("SELECT * FROM t WHERE token(*) > 1");
    assert_error_at(&err, 1, 29);
}

// ============================================================================
// SOFT KEYWORDS
// ============================================================================

#[test]
fn test_soft_keywords_as_table_and_column_names() {
    let stmt = only_statement("CREATE TABLE key (key int PRIMARY KEY, type text);");
    let table = match stmt {
        Statement::CreateTable(table) => table,
        other => panic!("expected CREATE TABLE, got {:?}", other),
    };

    assert_eq!(table.name, QualifiedName::unqualified(name("key")));
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["key", "type"]);
    assert!(table.columns[0].primary_key);
    assert_eq!(
        table.effective_primary_key().map(|k| k.partition_key),
        Some(vec![name("key")])
    );
}

#[test]
fn test_soft_keywords_in_select() {
    let stmt = assert_parses("SELECT json, distinct, ttl FROM list WHERE key = 1 AND type CONTAINS 'x'");
    let select = match stmt {
        Statement::Select(select) => select,
        other => panic!("expected SELECT, got {:?}", other),
    };
    assert!(!select.json);
    assert!(!select.distinct);
    assert_eq!(select.from, QualifiedName::unqualified(name("list")));
    assert_eq!(select.where_clause.len(), 2);
}

#[test]
fn test_index_on_column_named_keys() {
    match assert_parses("CREATE INDEX ON t (keys)") {
        Statement::CreateIndex(index) => {
            assert_eq!(index.target, IndexTarget::Column(name("keys")));
        }
        other => panic!("expected CREATE INDEX, got {:?}", other),
    }
    match assert_parses("CREATE INDEX ON t (keys(prefs))") {
        Statement::CreateIndex(index) => {
            assert_eq!(index.target, IndexTarget::Keys(name("prefs")));
        }
        other => panic!("expected CREATE INDEX, got {:?}", other),
    }
}

#[test]
fn test_index_target_error_points_inside_function() {
    let err = assert_rejects("CREATE INDEX ON t (keys(a b))");
    assert_error_at(&err, 1, 27);
    assert_expects(&err, &["')'"]);
}

#[test]
fn test_reserved_keyword_cannot_be_a_bare_name() {
    let err = assert_rejects("CREATE TABLE select (a int PRIMARY KEY)");
    assert_error_at(&err, 1, 14);
    assert_expects(&err, &["identifier"]);

    assert_parses("CREATE TABLE \"select\" (a int PRIMARY KEY)");
}

// ============================================================================
// NESTED TYPES AND RECURSION LIMIT
// ============================================================================

const DEEP_TABLE: &str =
    "CREATE TABLE t (k int PRIMARY KEY, v frozen<map<text, list<frozen<tuple<int, text>>>>>)";

#[test]
fn test_nested_type_keeps_full_tree() {
    let table = match assert_parses(DEEP_TABLE) {
        Statement::CreateTable(table) => table,
        other => panic!("expected CREATE TABLE, got {:?}", other),
    };
    let data_type = &table.columns[1].data_type;
    assert_eq!(data_type.depth(), 5);
    assert_eq!(
        data_type.to_string(),
        "frozen<map<text, list<frozen<tuple<int, text>>>>>"
    );
}

#[test]
fn test_recursion_limit_is_a_diagnostic() {
    let config = ParserConfig::default().with_max_depth(4);
    let output = parse_script_with(DEEP_TABLE, &config);
    assert!(output.script.statements.is_empty());
    assert_error_count(&output, 1);
    assert_eq!(output.diagnostics[0].message, "nesting deeper than 4 levels");

    let output = parse_script_with(DEEP_TABLE, &ParserConfig::default().with_max_depth(5));
    assert_clean(&output);
}

#[test]
fn test_pathological_nesting_fails_cleanly() {
    let depth = 50_000;
    let source = format!("INSERT INTO t (a) VALUES ({}1{})", "[".repeat(depth), "]".repeat(depth));
    let err = assert_rejects(&source);
    assert!(matches!(
        err,
        ParseError::RecursionLimitExceeded { limit: DEFAULT_MAX_DEPTH, .. }
    ));
}

#[test]
fn test_oversized_depth_limit_is_capped() {
    let depth = 50_000;
    let source = format!("INSERT INTO t (a) VALUES ({}1{})", "[".repeat(depth), "]".repeat(depth));
    let config = ParserConfig::default().with_max_depth(1_000_000);
    let output = parse_script_with(&source, &config);
    assert_error_count(&output, 1);
    assert_eq!(
        output.diagnostics[0].message,
        format!("nesting deeper than {} levels", MAX_DEPTH_LIMIT)
    );
}

#[test]
fn test_redundant_frozen_is_a_warning_not_an_error() {
    let output = parse_script("CREATE TYPE ks.t (f frozen<frozen<list<int>>>)");
    assert_clean(&output);
    assert_eq!(output.script.statements.len(), 1);
    let warnings: Vec<_> = output.diagnostics.iter().filter(|d| !d.is_error()).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
}

// ============================================================================
// RECOVERY
// ============================================================================

#[test]
fn test_recovery_reports_every_bad_statement() {
    let output = parse_script(
        "USE a;\n\
         SELECT FROM t;\n\
         INSERT INTO t VALUES;\n\
         USE b;",
    );
    assert_statement_names(&output, &["USE", "USE"]);
    assert_error_count(&output, 2);
    assert_eq!(output.diagnostics[0].position.line, 2);
    assert_eq!(output.diagnostics[1].position.line, 3);
}

#[test]
fn test_lexical_error_is_fatal_to_its_statement_only() {
    let output = parse_script("USE a; SELECT # FROM t; USE b;");
    assert_statement_names(&output, &["USE", "USE"]);
    assert_error_count(&output, 1);
    assert_eq!(output.diagnostics[0].position.column, 15);
}

#[test]
fn test_unterminated_comment_reaches_end_of_input() {
    let output = parse_script("USE a; /* never closed");
    assert_statement_names(&output, &["USE"]);
    assert_error_count(&output, 1);
}

#[test]
fn test_trailing_comment_after_last_statement() {
    let output = parse_script("USE a; -- done");
    assert_clean(&output);
    assert_statement_names(&output, &["USE"]);
}

#[test]
fn test_failed_parse_into_result() {
    let result = parse_script("DROP NONSENSE x").into_result();
    let diagnostics = result.unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].to_string().starts_with("1:6: error:"));
}

// ============================================================================
// CORPUS
// ============================================================================

#[test]
fn test_corpus_covers_every_statement_kind() {
    let names: HashSet<&str> = STATEMENT_CORPUS
        .iter()
        .map(|source| assert_parses(source).name())
        .collect();
    assert_eq!(names.len(), 38);
}

#[test]
fn test_corpus_as_one_script() {
    let output = parse_script(&corpus_script());
    assert_clean(&output);
    assert_eq!(output.script.statements.len(), STATEMENT_CORPUS.len());
    assert_eq!(output.script.empty_statements, 0);
}

#[test]
fn test_migration_script() {
    let output = parse_script(MIGRATION_SCRIPT);
    assert_clean(&output);
    assert_statement_names(
        &output,
        &["CREATE KEYSPACE", "USE", "CREATE TABLE", "CREATE INDEX", "INSERT"],
    );
    assert_eq!(output.script.empty_statements, 1);
}

#[test]
fn test_script_serializes_to_json() {
    let output = parse_script("SELECT a FROM t WHERE b = ?");
    let json = serde_json::to_value(&output).expect("serialize");
    assert!(json["script"]["statements"].is_array());
    let back: ParseOutput = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back.script, output.script);
}
