//! SQLite statement building and execution.
//!
//! [`QueryBuilder`] assembles SQL for table operations ([`SqlQuery`]),
//! normalizes whatever bind input it is given into [`Params`], and runs the
//! result on a [`Driver`]. Execution failures come back as
//! [`QueryResult::NoResult`]; connection and prepare failures as
//! [`SqliteError`].

mod builder;
mod config;
mod driver;
mod error;
mod params;
mod result;
mod statement;
mod value;

pub use builder::QueryBuilder;
pub use config::{ConnectionTarget, ErrorMode, SqliteConfig, DEFAULT_DESCRIPTOR};
pub use driver::{Driver, PreparedStatement, SqliteDriver};
pub use error::{Result, SqliteError};
pub use params::{cleanup, Bind, Columns, Params};
pub use result::{QueryResult, Row};
pub use statement::{
    CreateOperation, CrudOperation, DeleteOperation, ReadOperation, SqlQuery, UpdateOperation,
    ALL_FIELDS,
};
pub use value::Value;
