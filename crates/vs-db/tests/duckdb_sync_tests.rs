//! End-to-end syncs against an in-memory DuckDB database.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vs_core::{
    discover_scripts, BroadcastListener, LoggingListener, SyncError, VersionApplier, Versioner,
    UNVERSIONED,
};
use vs_db::{build_versions, DuckDbBackend, TableVersionApplier, TransactionalListener};

fn write(dir: &Path, name: &str, sql: &str) {
    std::fs::write(dir.join(name), sql).unwrap();
}

/// Scripts 1..=4 creating tables t1..t4, each with a rollback, plus a
/// sentinel script 5 so the sync window reaches version 4.
fn migrations() -> TempDir {
    let dir = TempDir::new().unwrap();
    for n in 1..=4 {
        write(
            dir.path(),
            &format!("{n:04}_t{n}.up.sql"),
            &format!("CREATE TABLE t{n} (id INT);"),
        );
        write(
            dir.path(),
            &format!("{n:04}_t{n}.down.sql"),
            &format!("DROP TABLE t{n};"),
        );
    }
    write(dir.path(), "0005_sentinel.up.sql", "SELECT 1;");
    dir
}

fn build_versioner(
    db: &Arc<DuckDbBackend>,
    scripts_dir: &Path,
    transactional: bool,
) -> Versioner<TableVersionApplier> {
    let scripts = discover_scripts(&[scripts_dir.to_path_buf()]).unwrap();
    let versions = build_versions(db, "version", 0, scripts).unwrap();
    let applier = TableVersionApplier::new(Arc::clone(db), "version");
    let mut listeners = BroadcastListener::default().with(LoggingListener::new());
    if transactional {
        listeners.push(TransactionalListener::new(Arc::clone(db)));
    }
    Versioner::new(applier, versions).with_listener(listeners)
}

#[test]
fn upgrade_to_last_from_pristine_database() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let dir = migrations();
    let mut versioner = build_versioner(&db, dir.path(), true);

    assert_eq!(versioner.current_version().unwrap(), UNVERSIONED);
    versioner.upgrade_to_last().unwrap();

    assert_eq!(versioner.current_version().unwrap(), 4);
    for n in 1..=4 {
        assert!(db.relation_exists(&format!("t{n}")).unwrap(), "t{n}");
    }
    // bootstrap row plus one per script
    assert_eq!(db.query_count("SELECT * FROM version").unwrap(), 5);
}

#[test]
fn rollback_leaves_both_endpoint_versions_in_place() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let dir = migrations();
    let mut versioner = build_versioner(&db, dir.path(), true);
    versioner.upgrade_to_last().unwrap();

    versioner.sync(1).unwrap();

    // 3 then 2 are rolled back; 4 (current) and 1 (target) are not touched
    assert_eq!(versioner.current_version().unwrap(), 2);
    assert!(db.relation_exists("t1").unwrap());
    assert!(!db.relation_exists("t2").unwrap());
    assert!(!db.relation_exists("t3").unwrap());
    assert!(db.relation_exists("t4").unwrap());
}

#[test]
fn rollback_past_bootstrap_is_refused() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let dir = migrations();
    let mut versioner = build_versioner(&db, dir.path(), true);
    versioner.upgrade_to_last().unwrap();

    let err = versioner.sync(-1).unwrap_err();

    assert!(matches!(err, SyncError::Change { version: 0, .. }), "{err}");
    assert_eq!(versioner.current_version().unwrap(), 1);
}

#[test]
fn failing_script_is_rolled_back_with_its_version_row() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let dir = TempDir::new().unwrap();
    write(dir.path(), "0001_ok.up.sql", "CREATE TABLE ok (id INT);");
    write(
        dir.path(),
        "0002_half.up.sql",
        "CREATE TABLE half (id INT); INSERT INTO missing VALUES (1);",
    );
    write(dir.path(), "0003_never.up.sql", "CREATE TABLE never (id INT);");
    write(dir.path(), "0004_sentinel.up.sql", "SELECT 1;");
    let mut versioner = build_versioner(&db, dir.path(), true);

    let err = versioner.upgrade_to_last().unwrap_err();

    assert_eq!(err.version(), Some(2));
    assert_eq!(versioner.current_version().unwrap(), 1);
    assert!(db.relation_exists("ok").unwrap());
    assert!(!db.relation_exists("half").unwrap());
    assert!(!db.relation_exists("never").unwrap());
}

#[test]
fn without_transactions_partial_changes_remain() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "0001_half.up.sql",
        "CREATE TABLE half (id INT); INSERT INTO missing VALUES (1);",
    );
    write(dir.path(), "0002_sentinel.up.sql", "SELECT 1;");
    let mut versioner = build_versioner(&db, dir.path(), false);

    let err = versioner.upgrade_to_last().unwrap_err();

    assert_eq!(err.version(), Some(1));
    assert_eq!(versioner.current_version().unwrap(), 0);
    assert!(db.relation_exists("half").unwrap());
}

#[test]
fn state_survives_reopening_the_database() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.duckdb");
    let dir = migrations();
    {
        let db = Arc::new(DuckDbBackend::from_path(&path).unwrap());
        build_versioner(&db, dir.path(), true).sync(3).unwrap();
    }

    let db = Arc::new(DuckDbBackend::from_path(&path).unwrap());
    let applier = TableVersionApplier::new(Arc::clone(&db), "version");
    assert_eq!(applier.current_version().unwrap(), 2);

    let mut versioner = build_versioner(&db, dir.path(), true);
    versioner.upgrade_to_last().unwrap();
    assert_eq!(versioner.current_version().unwrap(), 4);
}
