use notepad_core::db::migrations::latest_version;
use notepad_core::db::{open_db, open_db_in_memory, table_columns, DbError, POSTS_TABLE};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_posts_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    let columns = table_columns(&conn, POSTS_TABLE).unwrap();
    for column in ["id", "type", "created_at", "text", "url", "due_date"] {
        assert!(columns.contains(column), "missing column {column}");
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepad.sqlite");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO posts (type, created_at, text) VALUES ('Note', '2026-01-01T00:00:00Z', 'kept');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let kept: String = conn_second
        .query_row("SELECT text FROM posts WHERE id = 1;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(kept, "kept");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite");

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
fn unversioned_posts_table_is_adopted_with_rowids_as_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE posts (type, created_at, text, url, due_date);
         INSERT INTO posts VALUES ('Task', '2014-12-27 12:08:31 +0300', 'pay rent', NULL, NULL);
         INSERT INTO posts VALUES ('Memo', '2014-12-28 09:00:00 +0300', 'line one\nline two', NULL, NULL);
         INSERT INTO posts VALUES ('Link', '2014-12-29 10:30:00 +0300', 'docs', 'https://ruby-doc.org', NULL);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(table_columns(&conn, POSTS_TABLE).unwrap().contains("id"));
    assert!(table_columns(&conn, "posts_unversioned").unwrap().is_empty());

    let rows: Vec<(i64, String, Option<String>)> = conn
        .prepare("SELECT id, type, url FROM posts ORDER BY id;")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        rows,
        vec![
            (1, "Task".to_string(), None),
            (2, "Note".to_string(), None),
            (3, "Link".to_string(), Some("https://ruby-doc.org".to_string())),
        ]
    );

    conn.execute(
        "INSERT INTO posts (type, created_at, text) VALUES ('Note', '2026-01-01T00:00:00Z', 'new');",
        [],
    )
    .unwrap();
    assert_eq!(conn.last_insert_rowid(), 4);
}

#[test]
fn unversioned_posts_table_missing_columns_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE posts (type, created_at, text);
         INSERT INTO posts VALUES ('Memo', '2014-12-27 12:08:31 +0300', 'short');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let (kind, url): (String, Option<String>) = conn
        .query_row("SELECT type, url FROM posts WHERE id = 1;", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(kind, "Note");
    assert_eq!(url, None);
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn table_columns_is_empty_for_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(table_columns(&conn, POSTS_TABLE).unwrap().is_empty());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
