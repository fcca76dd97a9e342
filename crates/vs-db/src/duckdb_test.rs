use super::*;

#[test]
fn test_in_memory() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    assert!(!db.relation_exists("anything").unwrap());
}

#[test]
fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);")
        .unwrap();

    assert!(db.relation_exists("t1").unwrap());
    assert!(db.relation_exists("t2").unwrap());
    assert_eq!(db.query_count("SELECT * FROM t1").unwrap(), 1);
}

#[test]
fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").unwrap());
}

#[test]
fn test_schema_qualified_relation() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_schema_if_not_exists("meta").unwrap();
    db.execute_batch("CREATE TABLE meta.version (id INT)").unwrap();

    assert!(db.relation_exists("meta.version").unwrap());
    assert!(!db.relation_exists("version").unwrap());

    // IF NOT EXISTS makes this repeatable
    db.create_schema_if_not_exists("meta").unwrap();
}

#[test]
fn test_missing_table_is_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.query_count("SELECT * FROM missing_table").unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "{err}");
}

#[test]
fn test_syntax_error_is_execution_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("CREAT TABLE oops (id INT)").unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)), "{err}");
}

#[test]
fn test_from_path_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE kept (id INT)").unwrap();
    }
    assert!(path.exists());
    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert!(db.relation_exists("kept").unwrap());
}

#[test]
fn test_split_qualified() {
    assert_eq!(split_qualified("version"), ("main", "version"));
    assert_eq!(split_qualified("meta.version"), ("meta", "version"));
}
