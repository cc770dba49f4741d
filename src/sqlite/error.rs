use thiserror::Error;

/// Failures this layer propagates to the caller.
///
/// Execution failures are not in here: a statement that prepares but does not
/// run to completion yields [`QueryResult::NoResult`](super::QueryResult::NoResult).
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The connection descriptor names a driver other than SQLite, or no path.
    #[error("unsupported connection descriptor `{0}`")]
    UnsupportedDescriptor(String),

    #[error("failed to open `{descriptor}`: {source}")]
    Connection {
        descriptor: String,
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite rejected the statement text (unknown table, syntax error, ...).
    #[error("failed to prepare `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },
}

pub type Result<T> = std::result::Result<T, SqliteError>;
