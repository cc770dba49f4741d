//! Parameterized SQL helper for SQLite.
//!
//! # Intention
//!
//! - Turn table operations (select, insert, update, delete, raw query) into
//!   SQL text plus a bound parameter set.
//! - Hand execution and row materialization to a database driver behind the
//!   [`sqlite::Driver`] trait, with a rusqlite-backed default.
//!
//! # Architectural Boundaries
//!
//! - Only statement assembly, bind normalization and execution dispatch live here.
//! - No pooling, migrations, schema management or dialect abstraction.
//! - Transactions go through the driver's own connection.

pub mod sqlite;

pub use sqlite::{
    cleanup, Bind, Columns, CreateOperation, CrudOperation, DeleteOperation, Driver, ErrorMode,
    Params, PreparedStatement, QueryBuilder, QueryResult, ReadOperation, Result, Row, SqlQuery,
    SqliteConfig, SqliteDriver, SqliteError, UpdateOperation, Value, ALL_FIELDS,
};
