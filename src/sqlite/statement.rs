use super::{Bind, Columns, Params};

/// Field list used when a select names no columns.
pub const ALL_FIELDS: &str = "*";

/// SQL text with the bind input it expects.
///
/// The bind is kept as handed over by the caller; it is normalized when the
/// statement runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub bind: Bind,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            bind: Bind::Empty,
        }
    }

    pub fn with_bind(mut self, bind: impl Into<Bind>) -> Self {
        self.bind = bind.into();
        self
    }

    /// `SELECT <fields> FROM <table> [WHERE <where_clause>]`
    ///
    /// The WHERE clause is taken verbatim and only appended when it has content.
    pub fn select(table: &str, where_clause: &str, bind: impl Into<Bind>, fields: &str) -> Self {
        let mut statement = format!("SELECT {fields} FROM {table}");
        if !where_clause.trim().is_empty() {
            statement.push_str(" WHERE ");
            statement.push_str(where_clause);
        }
        Self::new(&statement).with_bind(bind)
    }

    /// `INSERT INTO <table> (c1, c2) VALUES (:c1, :c2)` bound as `{:c1, :c2}`.
    pub fn insert(table: &str, data: &Columns) -> Self {
        let columns: Vec<&str> = data.names().collect();
        let placeholders: Vec<String> = columns.iter().map(|column| format!(":{column}")).collect();
        let statement = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        let params = placeholders
            .iter()
            .zip(data.iter())
            .map(|(placeholder, (_, value))| (placeholder, value.clone()))
            .collect::<Params>();
        Self::new(&statement).with_bind(params)
    }

    /// `UPDATE <table> SET c1 = :u_c1, ... WHERE <where_clause>`
    ///
    /// SET values bind under `:u_<column>` and are merged after the caller's
    /// WHERE binds. A WHERE bind named `:u_<column>` is overwritten.
    pub fn update(table: &str, data: &Columns, where_clause: &str, bind: impl Into<Bind>) -> Self {
        let assignments: Vec<String> = data
            .names()
            .map(|column| format!("{column} = :u_{column}"))
            .collect();
        let statement = format!(
            "UPDATE {table} SET {} WHERE {where_clause}",
            assignments.join(", ")
        );

        let mut params = bind.into().cleanup();
        for (column, value) in data.iter() {
            params.set(&format!(":u_{column}"), value.clone());
        }
        Self::new(&statement).with_bind(params)
    }

    /// `DELETE FROM <table> WHERE <where_clause>`; the clause is mandatory.
    pub fn delete(table: &str, where_clause: &str, bind: impl Into<Bind>) -> Self {
        Self::new(&format!("DELETE FROM {table} WHERE {where_clause}")).with_bind(bind)
    }
}

/// CRUD operation types
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOperation {
    pub table: String,
    pub data: Columns,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadOperation {
    pub table: String,
    pub where_clause: String,
    pub bind: Bind,
    /// `None` selects every column.
    pub fields: Option<Vec<String>>,
}

impl ReadOperation {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_clause: String::new(),
            bind: Bind::Empty,
            fields: None,
        }
    }

    pub fn with_where(mut self, where_clause: &str, bind: impl Into<Bind>) -> Self {
        self.where_clause = where_clause.to_string();
        self.bind = bind.into();
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|field| field.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOperation {
    pub table: String,
    pub data: Columns,
    pub where_clause: String,
    pub bind: Bind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOperation {
    pub table: String,
    pub where_clause: String,
    pub bind: Bind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CrudOperation {
    Create(CreateOperation),
    Read(ReadOperation),
    Update(UpdateOperation),
    Delete(DeleteOperation),
}

impl From<CrudOperation> for SqlQuery {
    fn from(op: CrudOperation) -> Self {
        match op {
            CrudOperation::Create(op) => SqlQuery::insert(&op.table, &op.data),
            CrudOperation::Read(op) => {
                let fields = op
                    .fields
                    .map_or_else(|| ALL_FIELDS.to_string(), |fields| fields.join(", "));
                SqlQuery::select(&op.table, &op.where_clause, op.bind, &fields)
            }
            CrudOperation::Update(op) => {
                SqlQuery::update(&op.table, &op.data, &op.where_clause, op.bind)
            }
            CrudOperation::Delete(op) => SqlQuery::delete(&op.table, &op.where_clause, op.bind),
        }
    }
}
