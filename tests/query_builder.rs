use anyhow::{anyhow, Result};
use rust_sqlite_helper::{
    Bind, Columns, CreateOperation, CrudOperation, DeleteOperation, ErrorMode, Params,
    QueryBuilder, QueryResult, ReadOperation, Row, SqliteConfig, SqliteDriver, SqliteError,
    UpdateOperation, Value, ALL_FIELDS,
};
use tempfile::NamedTempFile;

// Helper function to create an in-memory database for testing
fn create_test_db() -> Result<QueryBuilder> {
    let db = QueryBuilder::open_in_memory()?;
    initialize_schema(&db)?;
    Ok(db)
}

// Initialize the database schema
fn initialize_schema(db: &QueryBuilder) -> Result<()> {
    db.driver().connection().execute_batch(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            age INTEGER
        );
        CREATE INDEX idx_users_email ON users(email);
        "#,
    )?;
    Ok(())
}

fn john() -> Columns {
    Columns::new()
        .with_value("name", "John Doe")
        .with_value("email", "john@example.com")
        .with_value("age", 30)
}

fn rows(result: QueryResult) -> Result<Vec<Row>> {
    result
        .into_rows()
        .ok_or_else(|| anyhow!("statement reported no result"))
}

#[test]
fn test_insert_then_select_round_trip() -> Result<()> {
    let mut db = create_test_db()?;

    let inserted = rows(db.insert("users", &john())?)?;
    assert!(inserted.is_empty());
    assert_eq!(db.last_sql(), "INSERT INTO users (name, email, age) VALUES (:name, :email, :age)");

    let found = rows(db.select(
        "users",
        "email = :email",
        Params::new().with_value(":email", "john@example.com"),
        "name, email, age",
    )?)?;
    assert_eq!(found, vec![john().into_row()]);
    Ok(())
}

#[test]
fn test_select_everything_and_nothing() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;
    db.insert(
        "users",
        &Columns::new()
            .with_value("name", "Jane")
            .with_value("email", "jane@example.com")
            .with_value("age", None::<i64>),
    )?;

    let all = rows(db.select("users", "", Bind::Empty, ALL_FIELDS)?)?;
    assert_eq!(all.len(), 2);
    assert_eq!(db.last_sql(), "SELECT * FROM users");
    assert_eq!(all[1]["age"], Value::Null);
    assert_eq!(all[1]["id"], Value::Integer(2));

    // zero rows is a result, not the sentinel
    let none = db.select("users", "age > :age", Params::new().with_value(":age", 99), "*")?;
    assert_eq!(none, QueryResult::Rows(Vec::new()));
    Ok(())
}

#[test]
fn test_update_merges_set_and_where_binds() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;
    let id = db.last_insert_rowid().ok_or_else(|| anyhow!("no rowid"))?;

    let changes = Columns::new().with_value("age", 31).with_value("name", "John D.");
    let result = db.update("users", &changes, "id=:id", Params::new().with_value(":id", id))?;
    assert_eq!(result, QueryResult::Rows(Vec::new()));
    assert_eq!(db.last_sql(), "UPDATE users SET age = :u_age, name = :u_name WHERE id=:id");
    assert_eq!(db.last_params().len(), 3);

    let found = rows(db.select("users", "id = ?", id, "name, age")?)?;
    assert_eq!(found[0]["age"], Value::Integer(31));
    assert_eq!(found[0]["name"], Value::from("John D."));
    Ok(())
}

#[test]
fn test_update_with_positional_where() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    let changes = Columns::new().with_value("age", 40);
    let result = db.update("users", &changes, "email = ?", "john@example.com")?;
    assert!(!result.is_no_result());

    let found = rows(db.select("users", "", Bind::Empty, "age")?)?;
    assert_eq!(found[0]["age"], Value::Integer(40));
    Ok(())
}

#[test]
fn test_delete() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    db.delete("users", "id=:id", Params::new().with_value(":id", 1))?;
    assert_eq!(db.last_sql(), "DELETE FROM users WHERE id=:id");

    let remaining = rows(db.select("users", "", Bind::Empty, ALL_FIELDS)?)?;
    assert!(remaining.is_empty());
    Ok(())
}

#[test]
fn test_delete_without_where_is_fatal() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    let err = db
        .delete("users", "", Bind::Empty)
        .expect_err("an empty WHERE clause leaves incomplete SQL");
    assert!(matches!(err, SqliteError::Prepare { .. }));
    assert_eq!(db.last_sql(), "DELETE FROM users WHERE");

    let remaining = rows(db.select("users", "", Bind::Empty, ALL_FIELDS)?)?;
    assert_eq!(remaining.len(), 1);
    Ok(())
}

#[test]
fn test_zero_scalar_binds_as_a_value() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john().with_value("age", 0))?;

    let found = rows(db.select("users", "age = ?", 0, "name")?)?;
    assert_eq!(found.len(), 1);
    assert_eq!(db.last_params().positional(), &[Value::Integer(0)][..]);

    let by_text = rows(db.select("users", "CAST(age AS TEXT) = ?", "0", "name")?)?;
    assert_eq!(by_text.len(), 1);
    Ok(())
}

#[test]
fn test_rows_are_looked_up_by_column_name() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    let forward = rows(db.select("users", "", Bind::Empty, "name, email, age")?)?;
    let reversed = rows(db.select("users", "", Bind::Empty, "age, email, name")?)?;
    assert_eq!(forward, reversed);
    assert_eq!(reversed[0]["name"], Value::from("John Doe"));
    Ok(())
}

#[test]
fn test_query_runs_only_the_first_statement() -> Result<()> {
    let mut db = create_test_db()?;

    let result = db.query(
        "INSERT INTO users (name, email) VALUES ('A', 'a@example.com'); \
         INSERT INTO users (name, email) VALUES ('B', 'b@example.com')",
        Bind::Empty,
    )?;
    assert_eq!(result, QueryResult::Rows(Vec::new()));

    let count = rows(db.query("SELECT COUNT(*) AS n FROM users", Bind::Empty)?)?;
    assert_eq!(count[0]["n"], Value::Integer(1));
    Ok(())
}

#[test]
fn test_query_accepts_unprefixed_bind_names() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    let found = rows(db.query(
        "SELECT name FROM users WHERE id = :id",
        Params::new().with_value("id", 1),
    )?)?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], Value::from("John Doe"));

    let count = rows(db.query("SELECT COUNT(*) AS n FROM users", Bind::Empty)?)?;
    assert_eq!(count[0]["n"], Value::Integer(1));
    Ok(())
}

#[test]
fn test_constraint_violation_is_no_result() -> Result<()> {
    let mut db = create_test_db()?;
    db.insert("users", &john())?;

    // duplicate email
    let duplicate = db.insert("users", &john())?;
    assert!(duplicate.is_no_result());

    db.insert(
        "users",
        &Columns::new().with_value("name", "Jane").with_value("email", "jane@example.com"),
    )?;
    let clash = db.update(
        "users",
        &Columns::new().with_value("email", "john@example.com"),
        "name = :name",
        Params::new().with_value(":name", "Jane"),
    )?;
    assert!(clash.is_no_result());
    Ok(())
}

#[test]
fn test_mismatched_binds_are_no_result() -> Result<()> {
    let mut db = create_test_db()?;

    let missing = db.select("users", "id = :id", Bind::Empty, ALL_FIELDS)?;
    assert!(missing.is_no_result());

    let extra = db.select(
        "users",
        "id = :id",
        Params::new().with_value(":id", 1).with_value(":other", 2),
        ALL_FIELDS,
    )?;
    assert!(extra.is_no_result());

    let misnamed = db.select("users", "id = :id", Params::new().with_value(":ident", 1), "*")?;
    assert!(misnamed.is_no_result());
    Ok(())
}

#[test]
fn test_unknown_table_is_fatal() -> Result<()> {
    let mut db = create_test_db()?;

    let err = db
        .select("no_such_table", "", Bind::Empty, ALL_FIELDS)
        .expect_err("prepare should fail");
    assert!(matches!(err, SqliteError::Prepare { .. }));
    assert_eq!(db.last_sql(), "SELECT * FROM no_such_table");
    Ok(())
}

#[test]
fn test_silent_mode_reports_prepare_failure_as_no_result() -> Result<()> {
    let config = SqliteConfig::in_memory().with_error_mode(ErrorMode::Silent);
    let mut db = QueryBuilder::connect(&config)?;

    let result = db.delete("no_such_table", "id = ?", 1)?;
    assert!(result.is_no_result());
    Ok(())
}

#[test]
fn test_booleans_bind_as_integers() -> Result<()> {
    let mut db = create_test_db()?;
    db.query(
        "CREATE TABLE flags (name TEXT NOT NULL, enabled INTEGER NOT NULL)",
        Bind::Empty,
    )?;
    db.insert("flags", &Columns::new().with_value("name", "beta").with_value("enabled", true))?;

    let found = rows(db.select("flags", "enabled = ?", Value::Boolean(true), "enabled")?)?;
    assert_eq!(found[0]["enabled"], Value::Integer(1));
    Ok(())
}

#[test]
fn test_crud_operations() -> Result<()> {
    let mut db = create_test_db()?;

    db.execute_crud(CrudOperation::Create(CreateOperation {
        table: "users".to_string(),
        data: john(),
    }))?;
    db.execute_crud(CrudOperation::Update(UpdateOperation {
        table: "users".to_string(),
        data: Columns::new().with_value("age", 32),
        where_clause: "email = :email".to_string(),
        bind: Params::new().with_value("email", "john@example.com").into(),
    }))?;

    let read = ReadOperation::new("users")
        .with_where("email = :email", Params::new().with_value("email", "john@example.com"))
        .with_fields(&["age"]);
    let found = rows(db.execute_crud(CrudOperation::Read(read))?)?;
    assert_eq!(found[0]["age"], Value::Integer(32));

    db.execute_crud(CrudOperation::Delete(DeleteOperation {
        table: "users".to_string(),
        where_clause: "age = ?".to_string(),
        bind: Bind::from(32),
    }))?;
    let remaining = rows(db.execute_crud(CrudOperation::Read(ReadOperation::new("users")))?)?;
    assert!(remaining.is_empty());
    Ok(())
}

#[test]
fn test_file_backed_database_persists() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let descriptor = format!("sqlite:{}", temp_file.path().display());
    let config = SqliteConfig::new(descriptor).with_credentials("ignored", "ignored");

    {
        let mut db = QueryBuilder::connect(&config)?;
        initialize_schema(&db)?;
        db.insert("users", &john())?;
    }

    let mut db = QueryBuilder::connect(&config)?;
    let found = rows(db.select("users", "", Bind::Empty, "name, email, age")?)?;
    assert_eq!(found, vec![john().into_row()]);
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<()> {
    let config: SqliteConfig =
        serde_json::from_str(r#"{ "descriptor": "sqlite::memory:", "error_mode": "silent" }"#)?;
    assert_eq!(config.error_mode, ErrorMode::Silent);
    assert!(config.persistent);
    assert!(config.user.is_none());

    let mut db = QueryBuilder::connect(&config)?;
    assert!(db.query("SELECT * FROM nowhere", Bind::Empty)?.is_no_result());
    Ok(())
}

#[test]
fn test_unsupported_descriptor_fails_to_connect() {
    let err = QueryBuilder::connect(&SqliteConfig::new("mysql:host=localhost"))
        .err()
        .expect("mysql descriptors are not supported");
    assert!(matches!(err, SqliteError::UnsupportedDescriptor(_)));
}

#[test]
fn test_transactions_go_through_the_driver_connection() -> Result<()> {
    let connection = rusqlite::Connection::open_in_memory()?;
    let driver = SqliteDriver::from_connection(connection);
    let mut db = QueryBuilder::with_driver(driver, ErrorMode::Raise);
    initialize_schema(&db)?;

    {
        let tx = db.driver_mut().connection_mut().transaction()?;
        tx.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            rusqlite::params!["Temp", "temp@example.com"],
        )?;
        tx.rollback()?;
    }

    let remaining = rows(db.select("users", "", Bind::Empty, ALL_FIELDS)?)?;
    assert!(remaining.is_empty());
    Ok(())
}
