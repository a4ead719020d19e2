use brainstash_core::db::migrations::latest_version;
use brainstash_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contents");
    assert_table_exists(&conn, "tags");
    assert_table_exists(&conn, "content_tags");
    assert_table_exists(&conn, "share_links");
    assert_table_exists(&conn, "chat_sessions");
    assert_table_exists(&conn, "chat_messages");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brainstash.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "contents");
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

#[test]
fn tag_titles_are_unique_at_the_storage_layer() {
    let conn = open_db_in_memory().unwrap();

    conn.execute("INSERT INTO tags (title) VALUES ('rust');", [])
        .unwrap();
    let err = conn
        .execute("INSERT INTO tags (title) VALUES ('rust');", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn share_link_owner_is_unique_at_the_storage_layer() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO share_links (token, owner_uuid) VALUES ('a', 'owner-1');",
        [],
    )
    .unwrap();
    let err = conn
        .execute(
            "INSERT INTO share_links (token, owner_uuid) VALUES ('b', 'owner-1');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
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
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
