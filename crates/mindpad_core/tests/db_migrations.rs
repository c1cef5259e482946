use mindpad_core::db::migrations::latest_version;
use mindpad_core::db::{open_db, open_db_in_memory, DbError};
use mindpad_core::{KvStore, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn reopening_database_keeps_slot_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mindpad.db");

    {
        let mut store = SqliteKvStore::try_new(open_db(&path).unwrap()).unwrap();
        store.set("slot", "value").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let store = SqliteKvStore::try_new(conn).unwrap();
    assert_eq!(store.get("slot").unwrap().as_deref(), Some("value"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
