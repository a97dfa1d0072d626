//! Keyword table
//!
//! Every word CQL gives a meaning to. Keywords split into two classes:
//! reserved words never name a schema object when unquoted, while soft
//! keywords are ordinary identifiers everywhere except the clause position
//! that gives them their meaning (`KEY` in `PRIMARY KEY`, `TYPE` in
//! `CREATE TYPE`, `FULL` in `full(column)`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! keywords {
    ($($variant:ident => $text:literal),* $(,)?) => {
        /// A CQL keyword.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every keyword, in table order.
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)*];

            /// Canonical upper-case spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)*
                }
            }

            /// Case-insensitive lookup of a bare word.
            pub fn lookup(word: &str) -> Option<Keyword> {
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    $($text => Some(Keyword::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

keywords! {
    Add => "ADD",
    Aggregate => "AGGREGATE",
    All => "ALL",
    Allow => "ALLOW",
    Alter => "ALTER",
    And => "AND",
    Any => "ANY",
    Apply => "APPLY",
    As => "AS",
    Asc => "ASC",
    Ascii => "ASCII",
    Authorize => "AUTHORIZE",
    Batch => "BATCH",
    Begin => "BEGIN",
    Bigint => "BIGINT",
    Blob => "BLOB",
    Boolean => "BOOLEAN",
    By => "BY",
    Called => "CALLED",
    Clustering => "CLUSTERING",
    Columnfamily => "COLUMNFAMILY",
    Compact => "COMPACT",
    Consistency => "CONSISTENCY",
    Contains => "CONTAINS",
    Counter => "COUNTER",
    Create => "CREATE",
    Custom => "CUSTOM",
    Date => "DATE",
    Decimal => "DECIMAL",
    Delete => "DELETE",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Distinct => "DISTINCT",
    Double => "DOUBLE",
    Drop => "DROP",
    DurableWrites => "DURABLE_WRITES",
    Duration => "DURATION",
    EachQuorum => "EACH_QUORUM",
    Entries => "ENTRIES",
    Execute => "EXECUTE",
    Exists => "EXISTS",
    False => "FALSE",
    Filtering => "FILTERING",
    Finalfunc => "FINALFUNC",
    Float => "FLOAT",
    From => "FROM",
    Frozen => "FROZEN",
    Full => "FULL",
    Function => "FUNCTION",
    Functions => "FUNCTIONS",
    Grant => "GRANT",
    If => "IF",
    In => "IN",
    Index => "INDEX",
    Inet => "INET",
    Infinity => "INFINITY",
    Initcond => "INITCOND",
    Input => "INPUT",
    Insert => "INSERT",
    Int => "INT",
    Into => "INTO",
    Is => "IS",
    Json => "JSON",
    Key => "KEY",
    Keys => "KEYS",
    Keyspace => "KEYSPACE",
    Keyspaces => "KEYSPACES",
    Language => "LANGUAGE",
    Level => "LEVEL",
    Limit => "LIMIT",
    List => "LIST",
    LocalOne => "LOCAL_ONE",
    LocalQuorum => "LOCAL_QUORUM",
    Logged => "LOGGED",
    Login => "LOGIN",
    Map => "MAP",
    Materialized => "MATERIALIZED",
    Modify => "MODIFY",
    Nan => "NAN",
    Norecursive => "NORECURSIVE",
    Nosuperuser => "NOSUPERUSER",
    Not => "NOT",
    Null => "NULL",
    Of => "OF",
    On => "ON",
    One => "ONE",
    Options => "OPTIONS",
    Or => "OR",
    Order => "ORDER",
    Partition => "PARTITION",
    Password => "PASSWORD",
    Per => "PER",
    Permission => "PERMISSION",
    Permissions => "PERMISSIONS",
    Primary => "PRIMARY",
    Quorum => "QUORUM",
    Rename => "RENAME",
    Replace => "REPLACE",
    Replication => "REPLICATION",
    Returns => "RETURNS",
    Revoke => "REVOKE",
    Role => "ROLE",
    Roles => "ROLES",
    Schema => "SCHEMA",
    Select => "SELECT",
    Set => "SET",
    Sfunc => "SFUNC",
    Smallint => "SMALLINT",
    Static => "STATIC",
    Storage => "STORAGE",
    Stype => "STYPE",
    Superuser => "SUPERUSER",
    Table => "TABLE",
    Text => "TEXT",
    Three => "THREE",
    Time => "TIME",
    Timestamp => "TIMESTAMP",
    Timeuuid => "TIMEUUID",
    Tinyint => "TINYINT",
    To => "TO",
    Token => "TOKEN",
    Trigger => "TRIGGER",
    True => "TRUE",
    Truncate => "TRUNCATE",
    Ttl => "TTL",
    Tuple => "TUPLE",
    Two => "TWO",
    Type => "TYPE",
    Unlogged => "UNLOGGED",
    Update => "UPDATE",
    Use => "USE",
    User => "USER",
    Users => "USERS",
    Using => "USING",
    Uuid => "UUID",
    Values => "VALUES",
    Varchar => "VARCHAR",
    Varint => "VARINT",
    View => "VIEW",
    Where => "WHERE",
    With => "WITH",
    Writetime => "WRITETIME",
}

impl Keyword {
    /// Reserved keywords can only appear as identifiers when double-quoted.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Keyword::Add
                | Keyword::Allow
                | Keyword::Alter
                | Keyword::And
                | Keyword::Apply
                | Keyword::Asc
                | Keyword::Authorize
                | Keyword::Batch
                | Keyword::Begin
                | Keyword::By
                | Keyword::Columnfamily
                | Keyword::Create
                | Keyword::Delete
                | Keyword::Desc
                | Keyword::Describe
                | Keyword::Drop
                | Keyword::Execute
                | Keyword::False
                | Keyword::From
                | Keyword::Grant
                | Keyword::If
                | Keyword::In
                | Keyword::Index
                | Keyword::Infinity
                | Keyword::Insert
                | Keyword::Into
                | Keyword::Is
                | Keyword::Keyspace
                | Keyword::Limit
                | Keyword::Materialized
                | Keyword::Modify
                | Keyword::Nan
                | Keyword::Norecursive
                | Keyword::Not
                | Keyword::Null
                | Keyword::Of
                | Keyword::On
                | Keyword::Or
                | Keyword::Order
                | Keyword::Primary
                | Keyword::Rename
                | Keyword::Replace
                | Keyword::Revoke
                | Keyword::Schema
                | Keyword::Select
                | Keyword::Table
                | Keyword::To
                | Keyword::Token
                | Keyword::True
                | Keyword::Truncate
                | Keyword::Unlogged
                | Keyword::Update
                | Keyword::Use
                | Keyword::Using
                | Keyword::View
                | Keyword::Where
                | Keyword::With
        )
    }

    /// Keywords that name a built-in scalar type.
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            Keyword::Ascii
                | Keyword::Bigint
                | Keyword::Blob
                | Keyword::Boolean
                | Keyword::Counter
                | Keyword::Date
                | Keyword::Decimal
                | Keyword::Double
                | Keyword::Duration
                | Keyword::Float
                | Keyword::Inet
                | Keyword::Int
                | Keyword::Smallint
                | Keyword::Text
                | Keyword::Time
                | Keyword::Timestamp
                | Keyword::Timeuuid
                | Keyword::Tinyint
                | Keyword::Uuid
                | Keyword::Varchar
                | Keyword::Varint
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
