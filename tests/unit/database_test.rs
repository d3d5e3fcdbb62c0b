//! Unit tests for the launcher database layer (connection + migrations).

use weblauncher::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use weblauncher::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in &["settings", "window_states", "schema_version"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name='idx_window_states_active'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists);
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopen_file_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("launcher.db");
    {
        let db = Database::open(&path).unwrap();
        db.connection()
            .execute("INSERT INTO settings (key, value) VALUES ('max_alive', '3')", [])
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let value: String = db
        .connection()
        .query_row("SELECT value FROM settings WHERE key = 'max_alive'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, "3");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}
