use tracing::{debug, warn};

use super::{
    Bind, Columns, CrudOperation, Driver, ErrorMode, Params, QueryResult, Result, SqlQuery,
    SqliteConfig, SqliteDriver,
};

/// Turns table operations into prepared statements on a [`Driver`].
///
/// Holds nothing between calls except the last statement it ran and the
/// parameters it bound, kept for debugging. Not meant to be shared between
/// callers.
pub struct QueryBuilder<D: Driver = SqliteDriver> {
    driver: D,
    error_mode: ErrorMode,
    last_sql: String,
    last_params: Params,
}

impl QueryBuilder<SqliteDriver> {
    /// Open the configured SQLite database. Connection failures propagate.
    pub fn connect(config: &SqliteConfig) -> Result<Self> {
        let driver = SqliteDriver::open(config)?;
        Ok(Self::with_driver(driver, config.error_mode))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::connect(&SqliteConfig::in_memory())
    }
}

impl<D: Driver> QueryBuilder<D> {
    pub fn with_driver(driver: D, error_mode: ErrorMode) -> Self {
        Self {
            driver,
            error_mode,
            last_sql: String::new(),
            last_params: Params::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// `SELECT <fields> FROM <table> [WHERE <where_clause>]`; pass
    /// [`ALL_FIELDS`](super::ALL_FIELDS) for every column.
    pub fn select(
        &mut self,
        table: &str,
        where_clause: &str,
        bind: impl Into<Bind>,
        fields: &str,
    ) -> Result<QueryResult> {
        self.run(SqlQuery::select(table, where_clause, bind, fields))
    }

    pub fn insert(&mut self, table: &str, data: &Columns) -> Result<QueryResult> {
        self.run(SqlQuery::insert(table, data))
    }

    /// SET values bind as `:u_<column>`; keep WHERE bind names clear of that prefix.
    pub fn update(
        &mut self,
        table: &str,
        data: &Columns,
        where_clause: &str,
        bind: impl Into<Bind>,
    ) -> Result<QueryResult> {
        self.run(SqlQuery::update(table, data, where_clause, bind))
    }

    pub fn delete(
        &mut self,
        table: &str,
        where_clause: &str,
        bind: impl Into<Bind>,
    ) -> Result<QueryResult> {
        self.run(SqlQuery::delete(table, where_clause, bind))
    }

    /// Run caller-authored SQL as is.
    ///
    /// Only the first statement in `sql` is prepared; anything after its `;` is ignored.
    pub fn query(&mut self, sql: &str, bind: impl Into<Bind>) -> Result<QueryResult> {
        self.run(SqlQuery::new(sql).with_bind(bind))
    }

    /// Perform a CRUD operation (type-safe API)
    pub fn execute_crud(&mut self, op: CrudOperation) -> Result<QueryResult> {
        self.run(op.into())
    }

    /// Prepare, bind and execute.
    ///
    /// A prepare failure is returned as an error (or, in [`ErrorMode::Silent`],
    /// logged and reported as [`QueryResult::NoResult`]). An execute failure is
    /// always [`QueryResult::NoResult`].
    pub fn run(&mut self, query: SqlQuery) -> Result<QueryResult> {
        self.last_sql = query.statement.trim().to_string();
        self.last_params = query.bind.cleanup();
        debug!(sql = %self.last_sql, params = self.last_params.len(), "running statement");

        let mut statement = match self.driver.prepare(&self.last_sql) {
            Ok(statement) => statement,
            Err(err) if self.error_mode == ErrorMode::Silent => {
                warn!(error = %err, "prepare failed, reporting no result");
                return Ok(QueryResult::NoResult);
            }
            Err(err) => return Err(err),
        };

        if statement.execute(&self.last_params) {
            Ok(QueryResult::Rows(statement.fetch_all()))
        } else {
            warn!(sql = %self.last_sql, "statement did not execute");
            Ok(QueryResult::NoResult)
        }
    }

    /// SQL text of the last statement run, trimmed.
    pub fn last_sql(&self) -> &str {
        &self.last_sql
    }

    /// Normalized parameters bound to the last statement run.
    pub fn last_params(&self) -> &Params {
        &self.last_params
    }

    pub fn last_insert_rowid(&self) -> Option<i64> {
        self.driver.last_insert_rowid()
    }
}
