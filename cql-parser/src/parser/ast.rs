//! Abstract Syntax Tree types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

// ============================================================================
// SCRIPT ROOT
// ============================================================================

/// The root AST node for a CQL script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub statements: Vec<Statement>,
    /// Count of blank statements (`;;`) accepted as no-ops.
    pub empty_statements: usize,
}

// ============================================================================
// NAMES
// ============================================================================

/// A schema object name.
///
/// Bare names are case-folded to lower case when parsed; quoted names keep
/// their case verbatim. Equality and hashing look only at the folded name, so
/// `Foo`, `foo` and `"foo"` are the same identifier while `"Foo"` is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    /// The folded key the name is compared by.
    pub name: String,
    /// Spelling as written, before folding and without surrounding quotes.
    pub raw: String,
    pub quoted: bool,
}

impl Identifier {
    pub fn bare(raw: &str) -> Self {
        Self {
            name: raw.to_lowercase(),
            raw: raw.to_string(),
            quoted: false,
        }
    }

    pub fn quoted(raw: &str) -> Self {
        Self {
            name: raw.to_string(),
            raw: raw.to_string(),
            quoted: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The name the way it appeared in the source, quotes included.
    pub fn source_text(&self) -> String {
        if self.quoted {
            format!("\"{}\"", self.raw.replace('"', "\"\""))
        } else {
            self.raw.clone()
        }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.name.replace('"', "\"\""))
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A name optionally prefixed by its keyspace: `ks.tbl` or `tbl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub keyspace: Option<Identifier>,
    pub name: Identifier,
}

impl QualifiedName {
    pub fn new(keyspace: Option<Identifier>, name: Identifier) -> Self {
        Self { keyspace, name }
    }

    pub fn unqualified(name: Identifier) -> Self {
        Self {
            keyspace: None,
            name,
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.keyspace {
            Some(ks) => write!(f, "{}.{}", ks, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// ============================================================================
// DATA TYPES
// ============================================================================

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    Smallint,
    Text,
    Time,
    Timestamp,
    Timeuuid,
    Tinyint,
    Uuid,
    Varchar,
    Varint,
}

impl NativeType {
    pub const ALL: &'static [NativeType] = &[
        NativeType::Ascii,
        NativeType::Bigint,
        NativeType::Blob,
        NativeType::Boolean,
        NativeType::Counter,
        NativeType::Date,
        NativeType::Decimal,
        NativeType::Double,
        NativeType::Duration,
        NativeType::Float,
        NativeType::Inet,
        NativeType::Int,
        NativeType::Smallint,
        NativeType::Text,
        NativeType::Time,
        NativeType::Timestamp,
        NativeType::Timeuuid,
        NativeType::Tinyint,
        NativeType::Uuid,
        NativeType::Varchar,
        NativeType::Varint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NativeType::Ascii => "ascii",
            NativeType::Bigint => "bigint",
            NativeType::Blob => "blob",
            NativeType::Boolean => "boolean",
            NativeType::Counter => "counter",
            NativeType::Date => "date",
            NativeType::Decimal => "decimal",
            NativeType::Double => "double",
            NativeType::Duration => "duration",
            NativeType::Float => "float",
            NativeType::Inet => "inet",
            NativeType::Int => "int",
            NativeType::Smallint => "smallint",
            NativeType::Text => "text",
            NativeType::Time => "time",
            NativeType::Timestamp => "timestamp",
            NativeType::Timeuuid => "timeuuid",
            NativeType::Tinyint => "tinyint",
            NativeType::Uuid => "uuid",
            NativeType::Varchar => "varchar",
            NativeType::Varint => "varint",
        }
    }
}

/// A column, field or parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Native(NativeType),
    List(Box<DataType>),
    Set(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Tuple(Vec<DataType>),
    Frozen(Box<DataType>),
    /// Reference to a user-defined type.
    UserDefined(QualifiedName),
}

impl DataType {
    /// Number of nested type constructors; scalars and UDT references are 0.
    pub fn depth(&self) -> usize {
        match self {
            DataType::Native(_) | DataType::UserDefined(_) => 0,
            DataType::List(inner) | DataType::Set(inner) | DataType::Frozen(inner) => {
                1 + inner.depth()
            }
            DataType::Map(key, value) => 1 + key.depth().max(value.depth()),
            DataType::Tuple(items) => 1 + items.iter().map(DataType::depth).max().unwrap_or(0),
        }
    }

    /// `frozen<frozen<T>>` anywhere in the tree. Legal, but worth a warning.
    pub fn has_redundant_frozen(&self) -> bool {
        match self {
            DataType::Frozen(inner) => {
                matches!(**inner, DataType::Frozen(_)) || inner.has_redundant_frozen()
            }
            DataType::List(inner) | DataType::Set(inner) => inner.has_redundant_frozen(),
            DataType::Map(key, value) => key.has_redundant_frozen() || value.has_redundant_frozen(),
            DataType::Tuple(items) => items.iter().any(DataType::has_redundant_frozen),
            DataType::Native(_) | DataType::UserDefined(_) => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Native(native) => f.write_str(native.as_str()),
            DataType::List(inner) => write!(f, "list<{}>", inner),
            DataType::Set(inner) => write!(f, "set<{}>", inner),
            DataType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            DataType::Tuple(items) => {
                f.write_str("tuple<")?;
                write_separated(f, items, ", ")?;
                f.write_str(">")
            }
            DataType::Frozen(inner) => write!(f, "frozen<{}>", inner),
            DataType::UserDefined(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// LITERALS AND TERMS
// ============================================================================

/// A literal value.
///
/// Numeric literals keep their source spelling (sign included) so that
/// varint and decimal values survive without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    String(String),
    Integer(String),
    /// Decimal, exponent, `NaN` or `Infinity` forms.
    Float(String),
    /// Hex blob digits without the `0x` prefix.
    Hex(String),
    Uuid(Uuid),
    Boolean(bool),
    Null,
}

impl Constant {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Constant::Integer(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Integer(text) | Constant::Float(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a hex blob. Odd digit counts are rejected by the decoder.
    pub fn blob_bytes(&self) -> Option<Result<Vec<u8>, hex::FromHexError>> {
        match self {
            Constant::Hex(digits) => Some(hex::decode(digits)),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Constant::Integer(text) | Constant::Float(text) => f.write_str(text),
            Constant::Hex(digits) => write!(f, "0x{}", digits),
            Constant::Uuid(uuid) => write!(f, "{}", uuid),
            Constant::Boolean(b) => write!(f, "{}", b),
            Constant::Null => f.write_str("null"),
        }
    }
}

/// `?` or `:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindMarker {
    Anonymous,
    Named(Identifier),
}

impl fmt::Display for BindMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindMarker::Anonymous => f.write_str("?"),
            BindMarker::Named(name) => write!(f, ":{}", name),
        }
    }
}

/// A value expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Constant(Constant),
    BindMarker(BindMarker),
    FunctionCall(FunctionCall),
    List(Vec<Term>),
    Set(Vec<Term>),
    /// `{}` parses as an empty map.
    Map(Vec<(Term, Term)>),
    Tuple(Vec<Term>),
    /// `{field: value, ...}`
    UserType(Vec<(Identifier, Term)>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::BindMarker(m) => write!(f, "{}", m),
            Term::FunctionCall(call) => write!(f, "{}", call),
            Term::List(items) => {
                f.write_str("[")?;
                write_separated(f, items, ", ")?;
                f.write_str("]")
            }
            Term::Set(items) => {
                f.write_str("{")?;
                write_separated(f, items, ", ")?;
                f.write_str("}")
            }
            Term::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Term::Tuple(items) => {
                f.write_str("(")?;
                write_separated(f, items, ", ")?;
                f.write_str(")")
            }
            Term::UserType(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// `name(args)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: QualifiedName,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionArg {
    /// Only as in `count(*)`.
    Star,
    Column(Identifier),
    Term(Term),
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                FunctionArg::Star => f.write_str("*")?,
                FunctionArg::Column(column) => write!(f, "{}", column)?,
                FunctionArg::Term(term) => write!(f, "{}", term)?,
            }
        }
        f.write_str(")")
    }
}

fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ============================================================================
// RELATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Left-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Column(Identifier),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InValues {
    List(Vec<Term>),
    Marker(BindMarker),
}

/// One test in a `WHERE` or `IF` conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relation {
    Compare {
        lhs: Operand,
        op: CompareOp,
        rhs: Term,
    },
    In {
        column: Identifier,
        values: InValues,
    },
    Contains {
        column: Identifier,
        value: Term,
    },
    ContainsKey {
        column: Identifier,
        value: Term,
    },
    /// `(a, b) >= (1, 2)`
    TupleCompare {
        columns: Vec<Identifier>,
        op: CompareOp,
        value: Term,
    },
    /// `(a, b) IN ((1, 2), (3, 4))`
    TupleIn {
        columns: Vec<Identifier>,
        values: InValues,
    },
}

// ============================================================================
// CLAUSES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub column: Identifier,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Star,
    Selectors(Vec<Selector>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    pub expr: SelectorExpr,
    pub alias: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectorExpr {
    Column(Identifier),
    FunctionCall(FunctionCall),
}

/// `USING TTL n AND TIMESTAMP n`, in either order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsingClause {
    pub ttl: Option<Term>,
    pub timestamp: Option<Term>,
}

impl UsingClause {
    pub fn is_empty(&self) -> bool {
        self.ttl.is_none() && self.timestamp.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchKind {
    Logged,
    Unlogged,
    Counter,
}

/// `BEGIN [UNLOGGED | COUNTER] BATCH [USING TIMESTAMP n]` in front of a
/// modification statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchHeader {
    pub kind: BatchKind,
    pub timestamp: Option<Term>,
}

/// `IF EXISTS` or `IF <relations>` on a modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Exists,
    Relations(Vec<Relation>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
}

/// One `SET` item of an `UPDATE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assignment {
    /// `c = term`
    Value { column: Identifier, value: Term },
    /// `c = source + term`
    Arithmetic {
        column: Identifier,
        source: Identifier,
        op: ArithmeticOp,
        value: Term,
    },
    /// `c = term + source`
    Prepend {
        column: Identifier,
        value: Term,
        op: ArithmeticOp,
        source: Identifier,
    },
    /// `c[key] = term`
    Element {
        column: Identifier,
        key: Term,
        value: Term,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeleteTarget {
    Column(Identifier),
    Element { column: Identifier, key: Term },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertValues {
    /// `(cols) VALUES (terms)`; the column list may be omitted.
    Values {
        columns: Vec<Identifier>,
        values: Vec<Term>,
    },
    Json(Term),
}

// ============================================================================
// SCHEMA CLAUSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: Identifier,
    pub data_type: DataType,
    pub is_static: bool,
    /// Inline `PRIMARY KEY` marker.
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub partition_key: Vec<Identifier>,
    pub clustering_columns: Vec<Identifier>,
}

/// Value of a `WITH` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Constant(Constant),
    Identifier(Identifier),
    Map(Vec<(Constant, Constant)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: Identifier,
    pub value: PropertyValue,
}

/// Everything that may follow `WITH` on a table or materialized view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    pub properties: Vec<Property>,
    pub compact_storage: bool,
    pub clustering_order: Vec<Ordering>,
}

impl TableOptions {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && !self.compact_storage && self.clustering_order.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name.as_str() == name)
            .map(|p| &p.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterTableOperation {
    Add(Vec<(Identifier, DataType)>),
    Drop(Vec<Identifier>),
    DropCompactStorage,
    AlterColumnType { column: Identifier, data_type: DataType },
    Rename(Vec<(Identifier, Identifier)>),
    With(TableOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterTypeOperation {
    AlterField { field: Identifier, data_type: DataType },
    Add(Vec<(Identifier, DataType)>),
    Rename(Vec<(Identifier, Identifier)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexTarget {
    Column(Identifier),
    Keys(Identifier),
    Values(Identifier),
    Entries(Identifier),
    Full(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomIndex {
    pub class: String,
    pub options: Vec<(Constant, Constant)>,
}

// ============================================================================
// ACCESS CONTROL CLAUSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoleOption {
    Password(String),
    Login(bool),
    Superuser(bool),
    Options(Vec<(Constant, Constant)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Privilege {
    All,
    Alter,
    Authorize,
    Describe,
    Execute,
    Create,
    Drop,
    Modify,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    AllFunctions,
    AllFunctionsInKeyspace(Identifier),
    Function(QualifiedName),
    AllKeyspaces,
    Keyspace(Identifier),
    Table(QualifiedName),
    AllRoles,
    Role(Identifier),
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// One top-level CQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Use(UseStmt),
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    ApplyBatch,
    Truncate(TruncateStmt),

    CreateKeyspace(CreateKeyspaceStmt),
    AlterKeyspace(AlterKeyspaceStmt),
    DropKeyspace(DropKeyspaceStmt),
    CreateTable(CreateTableStmt),
    AlterTable(AlterTableStmt),
    DropTable(DropStmt),
    CreateIndex(CreateIndexStmt),
    DropIndex(DropStmt),
    CreateType(CreateTypeStmt),
    AlterType(AlterTypeStmt),
    DropType(DropStmt),
    CreateTrigger(CreateTriggerStmt),
    DropTrigger(DropTriggerStmt),
    CreateMaterializedView(CreateMaterializedViewStmt),
    AlterMaterializedView(AlterMaterializedViewStmt),
    DropMaterializedView(DropStmt),
    CreateFunction(CreateFunctionStmt),
    DropFunction(DropRoutineStmt),
    CreateAggregate(CreateAggregateStmt),
    DropAggregate(DropRoutineStmt),

    CreateRole(CreateRoleStmt),
    AlterRole(AlterRoleStmt),
    DropRole(DropPrincipalStmt),
    CreateUser(CreateUserStmt),
    AlterUser(AlterUserStmt),
    DropUser(DropPrincipalStmt),
    Grant(PermissionStmt),
    Revoke(PermissionStmt),
    ListPermissions(ListPermissionsStmt),
    ListRoles(ListRolesStmt),
    ListUsers,
}

impl Statement {
    /// Leading keywords of the statement form, for logs and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Statement::Use(_) => "USE",
            Statement::Select(_) => "SELECT",
            Statement::Insert(_) => "INSERT",
            Statement::Update(_) => "UPDATE",
            Statement::Delete(_) => "DELETE",
            Statement::ApplyBatch => "APPLY BATCH",
            Statement::Truncate(_) => "TRUNCATE",
            Statement::CreateKeyspace(_) => "CREATE KEYSPACE",
            Statement::AlterKeyspace(_) => "ALTER KEYSPACE",
            Statement::DropKeyspace(_) => "DROP KEYSPACE",
            Statement::CreateTable(_) => "CREATE TABLE",
            Statement::AlterTable(_) => "ALTER TABLE",
            Statement::DropTable(_) => "DROP TABLE",
            Statement::CreateIndex(_) => "CREATE INDEX",
            Statement::DropIndex(_) => "DROP INDEX",
            Statement::CreateType(_) => "CREATE TYPE",
            Statement::AlterType(_) => "ALTER TYPE",
            Statement::DropType(_) => "DROP TYPE",
            Statement::CreateTrigger(_) => "CREATE TRIGGER",
            Statement::DropTrigger(_) => "DROP TRIGGER",
            Statement::CreateMaterializedView(_) => "CREATE MATERIALIZED VIEW",
            Statement::AlterMaterializedView(_) => "ALTER MATERIALIZED VIEW",
            Statement::DropMaterializedView(_) => "DROP MATERIALIZED VIEW",
            Statement::CreateFunction(_) => "CREATE FUNCTION",
            Statement::DropFunction(_) => "DROP FUNCTION",
            Statement::CreateAggregate(_) => "CREATE AGGREGATE",
            Statement::DropAggregate(_) => "DROP AGGREGATE",
            Statement::CreateRole(_) => "CREATE ROLE",
            Statement::AlterRole(_) => "ALTER ROLE",
            Statement::DropRole(_) => "DROP ROLE",
            Statement::CreateUser(_) => "CREATE USER",
            Statement::AlterUser(_) => "ALTER USER",
            Statement::DropUser(_) => "DROP USER",
            Statement::Grant(_) => "GRANT",
            Statement::Revoke(_) => "REVOKE",
            Statement::ListPermissions(_) => "LIST PERMISSIONS",
            Statement::ListRoles(_) => "LIST ROLES",
            Statement::ListUsers => "LIST USERS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseStmt {
    pub keyspace: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStmt {
    pub json: bool,
    pub distinct: bool,
    pub selection: Selection,
    pub from: QualifiedName,
    pub where_clause: Vec<Relation>,
    pub order_by: Vec<Ordering>,
    pub per_partition_limit: Option<Term>,
    pub limit: Option<Term>,
    pub allow_filtering: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStmt {
    pub begin_batch: Option<BatchHeader>,
    pub table: QualifiedName,
    pub values: InsertValues,
    pub if_not_exists: bool,
    pub using: UsingClause,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStmt {
    pub begin_batch: Option<BatchHeader>,
    pub table: QualifiedName,
    pub using: UsingClause,
    pub assignments: Vec<Assignment>,
    pub where_clause: Vec<Relation>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStmt {
    pub begin_batch: Option<BatchHeader>,
    pub columns: Vec<DeleteTarget>,
    pub table: QualifiedName,
    pub timestamp: Option<Term>,
    pub where_clause: Vec<Relation>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncateStmt {
    pub table: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKeyspaceStmt {
    pub if_not_exists: bool,
    pub name: Identifier,
    pub replication: Vec<(Constant, Constant)>,
    pub durable_writes: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterKeyspaceStmt {
    pub name: Identifier,
    pub replication: Vec<(Constant, Constant)>,
    pub durable_writes: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropKeyspaceStmt {
    pub if_exists: bool,
    pub name: Identifier,
}

/// `DROP TABLE | INDEX | TYPE | MATERIALIZED VIEW [IF EXISTS] [ks.]name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropStmt {
    pub if_exists: bool,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableStmt {
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub columns: Vec<ColumnDefinition>,
    /// The `PRIMARY KEY (...)` element, when present.
    pub primary_key: Option<PrimaryKey>,
    pub options: TableOptions,
}

impl CreateTableStmt {
    /// The declared key, from the key element or an inline column marker.
    pub fn effective_primary_key(&self) -> Option<PrimaryKey> {
        if let Some(key) = &self.primary_key {
            return Some(key.clone());
        }
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| PrimaryKey {
                partition_key: vec![c.name.clone()],
                clustering_columns: Vec::new(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableStmt {
    pub name: QualifiedName,
    pub operation: AlterTableOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexStmt {
    pub custom: Option<CustomIndex>,
    pub if_not_exists: bool,
    pub name: Option<Identifier>,
    pub table: QualifiedName,
    pub target: IndexTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTypeStmt {
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub fields: Vec<(Identifier, DataType)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTypeStmt {
    pub name: QualifiedName,
    pub operation: AlterTypeOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTriggerStmt {
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub table: Option<QualifiedName>,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTriggerStmt {
    pub if_exists: bool,
    pub name: QualifiedName,
    pub table: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMaterializedViewStmt {
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub selection: Selection,
    pub base_table: QualifiedName,
    /// Columns restricted by `IS NOT NULL`.
    pub not_null: Vec<Identifier>,
    pub where_clause: Vec<Relation>,
    pub primary_key: PrimaryKey,
    pub options: TableOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterMaterializedViewStmt {
    pub name: QualifiedName,
    pub options: TableOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFunctionStmt {
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub params: Vec<(Identifier, DataType)>,
    /// `CALLED ON NULL INPUT` (true) or `RETURNS NULL ON NULL INPUT` (false).
    pub called_on_null_input: bool,
    pub return_type: DataType,
    pub language: Identifier,
    pub body: String,
}

/// `DROP FUNCTION | AGGREGATE [IF EXISTS] name [(types)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRoutineStmt {
    pub if_exists: bool,
    pub name: QualifiedName,
    pub signature: Option<Vec<DataType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAggregateStmt {
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub arg_types: Vec<DataType>,
    pub state_function: Identifier,
    pub state_type: DataType,
    pub final_function: Option<Identifier>,
    pub initial_condition: Option<Term>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoleStmt {
    pub if_not_exists: bool,
    pub name: Identifier,
    pub options: Vec<RoleOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterRoleStmt {
    pub name: Identifier,
    pub options: Vec<RoleOption>,
}

/// `DROP ROLE | USER [IF EXISTS] name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropPrincipalStmt {
    pub if_exists: bool,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserStmt {
    pub if_not_exists: bool,
    pub name: Identifier,
    pub password: Option<String>,
    pub superuser: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterUserStmt {
    pub name: Identifier,
    pub password: Option<String>,
    pub superuser: Option<bool>,
}

/// Body of `GRANT ... TO role` and `REVOKE ... FROM role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionStmt {
    pub privilege: Privilege,
    pub resource: Resource,
    pub role: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPermissionsStmt {
    pub privilege: Privilege,
    pub resource: Option<Resource>,
    pub of: Option<Identifier>,
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRolesStmt {
    pub of: Option<Identifier>,
    pub recursive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_case_rules() {
        assert_eq!(Identifier::bare("Foo"), Identifier::bare("foo"));
        assert_eq!(Identifier::bare("foo"), Identifier::quoted("foo"));
        assert_ne!(Identifier::quoted("Foo"), Identifier::quoted("foo"));
        assert_ne!(Identifier::quoted("Foo"), Identifier::bare("Foo"));
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::bare("Users").to_string(), "users");
        assert_eq!(Identifier::quoted("My \"Col\"").to_string(), "\"My \"\"Col\"\"\"");
    }

    #[test]
    fn test_identifier_keeps_source_spelling() {
        let ident = Identifier::bare("MyTable");
        assert_eq!(ident.as_str(), "mytable");
        assert_eq!(ident.raw, "MyTable");
        assert_eq!(ident.source_text(), "MyTable");
        assert_eq!(ident, Identifier::bare("MYTABLE"));

        let mut set = std::collections::HashSet::new();
        set.insert(Identifier::bare("MyTable"));
        assert!(set.contains(&Identifier::quoted("mytable")));

        assert_eq!(Identifier::quoted("a\"b").source_text(), "\"a\"\"b\"");
    }

    #[test]
    fn test_data_type_depth_and_display() {
        let ty = DataType::Frozen(Box::new(DataType::Map(
            Box::new(DataType::Native(NativeType::Text)),
            Box::new(DataType::List(Box::new(DataType::Native(NativeType::Int)))),
        )));
        assert_eq!(ty.depth(), 3);
        assert_eq!(ty.to_string(), "frozen<map<text, list<int>>>");
        assert!(!ty.has_redundant_frozen());
    }

    #[test]
    fn test_redundant_frozen_detection() {
        let ty = DataType::List(Box::new(DataType::Frozen(Box::new(DataType::Frozen(Box::new(
            DataType::Native(NativeType::Int),
        ))))));
        assert!(ty.has_redundant_frozen());
    }

    #[test]
    fn test_constant_accessors() {
        assert_eq!(Constant::Integer("-42".to_string()).as_i64(), Some(-42));
        assert_eq!(Constant::Float("2.5".to_string()).as_f64(), Some(2.5));
        assert_eq!(
            Constant::Hex("cafe".to_string()).blob_bytes(),
            Some(Ok(vec![0xca, 0xfe]))
        );
        assert!(matches!(Constant::Hex("abc".to_string()).blob_bytes(), Some(Err(_))));
        assert_eq!(Constant::String("it's".to_string()).to_string(), "'it''s'");
    }

    #[test]
    fn test_effective_primary_key_from_inline_marker() {
        let stmt = CreateTableStmt {
            if_not_exists: false,
            name: QualifiedName::unqualified(Identifier::bare("t")),
            columns: vec![ColumnDefinition {
                name: Identifier::bare("k"),
                data_type: DataType::Native(NativeType::Int),
                is_static: false,
                primary_key: true,
            }],
            primary_key: None,
            options: TableOptions::default(),
        };
        let key = stmt.effective_primary_key().expect("inline key");
        assert_eq!(key.partition_key, vec![Identifier::bare("k")]);
        assert!(key.clustering_columns.is_empty());
    }
}
