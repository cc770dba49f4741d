use rusqlite::{Connection, Statement};
use tracing::{info, warn};

use super::config::ConnectionTarget;
use super::{Params, Result, Row, SqliteConfig, SqliteError, Value};

/// A statement compiled by a [`Driver`].
pub trait PreparedStatement {
    /// Bind `params` and run the statement to completion.
    ///
    /// Returns `false` when execution did not succeed; this is not an error
    /// the caller has to handle.
    fn execute(&mut self, params: &Params) -> bool;

    /// Rows produced by the last successful [`execute`](Self::execute).
    fn fetch_all(&mut self) -> Vec<Row>;
}

/// The database capability a [`QueryBuilder`](super::QueryBuilder) runs against.
pub trait Driver {
    /// Compile `sql`. Failures here are fatal to the call.
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + '_>>;

    /// Row id of the most recent successful insert, if the driver tracks one.
    fn last_insert_rowid(&self) -> Option<i64> {
        None
    }
}

/// [`Driver`] over a single rusqlite connection.
#[derive(Debug)]
pub struct SqliteDriver {
    connection: Connection,
}

impl SqliteDriver {
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let connection = match config.target()? {
            ConnectionTarget::Memory => Connection::open_in_memory(),
            ConnectionTarget::File(path) => Connection::open(path),
        }
        .map_err(|source| SqliteError::Connection {
            descriptor: config.descriptor.clone(),
            source,
        })?;

        info!(
            descriptor = %config.descriptor,
            persistent = config.persistent,
            error_mode = ?config.error_mode,
            "opened sqlite connection"
        );
        Ok(Self { connection })
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// The underlying connection, for transactions and anything else this
    /// layer does not wrap.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }
}

impl Driver for SqliteDriver {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + '_>> {
        let statement = self
            .connection
            .prepare(sql)
            .map_err(|source| SqliteError::Prepare {
                sql: sql.to_string(),
                source,
            })?;
        Ok(Box::new(SqliteStatement {
            statement,
            rows: Vec::new(),
        }))
    }

    fn last_insert_rowid(&self) -> Option<i64> {
        Some(self.connection.last_insert_rowid())
    }
}

struct SqliteStatement<'conn> {
    statement: Statement<'conn>,
    rows: Vec<Row>,
}

impl SqliteStatement<'_> {
    fn bind(&mut self, params: &Params) -> rusqlite::Result<()> {
        let expected = self.statement.parameter_count();
        if params.len() != expected {
            return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected));
        }

        let mut named_slots = Vec::with_capacity(expected);
        for (name, value) in params.named() {
            let index = self
                .statement
                .parameter_index(name)?
                .ok_or_else(|| rusqlite::Error::InvalidParameterName(name.to_string()))?;
            self.statement.raw_bind_parameter(index, value)?;
            named_slots.push(index);
        }

        // positional values fill whatever slots the names did not claim
        let open_slots = (1..=expected).filter(|index| !named_slots.contains(index));
        for (index, value) in open_slots.zip(params.positional()) {
            self.statement.raw_bind_parameter(index, value)?;
        }
        Ok(())
    }

    fn step_all(&mut self, params: &Params) -> rusqlite::Result<Vec<Row>> {
        self.bind(params)?;

        let columns: Vec<String> = self
            .statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut rows = self.statement.raw_query();
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Row::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                map.insert(column.clone(), Value::from(row.get_ref(index)?));
            }
            result.push(map);
        }
        Ok(result)
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    fn execute(&mut self, params: &Params) -> bool {
        match self.step_all(params) {
            Ok(rows) => {
                self.rows = rows;
                true
            }
            Err(err) => {
                warn!(error = %err, "statement execution failed");
                false
            }
        }
    }

    fn fetch_all(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }
}
