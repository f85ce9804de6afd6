//! Versioned schema bootstrap for the `posts` table.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Apply pending steps atomically on first open.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Existing columns are never renamed or dropped here.
//! - An unversioned `posts` table without an `id` column is adopted by
//!   version 1: its rowids become ids and `Memo` rows become `Note` rows.

use crate::db::{table_columns, DbError, DbResult, POSTS_TABLE};
use log::info;
use rusqlite::Connection;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    /// Runs inside the migration transaction before `sql`.
    prepare: Option<fn(&Connection) -> DbResult<()>>,
}

const POSTS_SQL: &str = include_str!("0001_posts.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: POSTS_SQL,
    prepare: Some(adopt_unversioned_posts),
}];

const UNVERSIONED_POSTS_TABLE: &str = "posts_unversioned";

/// Data columns carried over from an unversioned `posts` table.
const ADOPTED_COLUMNS: &[&str] = &["type", "created_at", "text", "url", "due_date"];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending schema steps on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        if let Some(prepare) = migration.prepare {
            prepare(&tx)?;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

/// Rebuilds a `posts` table created without an `id` column.
///
/// Each row keeps its rowid as `id`. Columns the old table lacks are copied
/// as NULL.
fn adopt_unversioned_posts(conn: &Connection) -> DbResult<()> {
    let existing = table_columns(conn, POSTS_TABLE)?;
    if existing.is_empty() || existing.contains("id") {
        return Ok(());
    }

    let selected = ADOPTED_COLUMNS
        .iter()
        .map(|column| match *column {
            _ if !existing.contains(*column) => "NULL".to_string(),
            "type" => "CASE \"type\" WHEN 'Memo' THEN 'Note' ELSE \"type\" END".to_string(),
            column => format!("\"{column}\""),
        })
        .collect::<Vec<_>>()
        .join(", ");
    let inserted = ADOPTED_COLUMNS
        .iter()
        .map(|column| format!("\"{column}\""))
        .collect::<Vec<_>>()
        .join(", ");

    conn.execute_batch(&format!(
        "ALTER TABLE {POSTS_TABLE} RENAME TO {UNVERSIONED_POSTS_TABLE};"
    ))?;
    conn.execute_batch(POSTS_SQL)?;
    let adopted = conn.execute(
        &format!(
            "INSERT INTO {POSTS_TABLE} (id, {inserted}) \
             SELECT rowid, {selected} FROM {UNVERSIONED_POSTS_TABLE} ORDER BY rowid;"
        ),
        [],
    )?;
    conn.execute_batch(&format!("DROP TABLE {UNVERSIONED_POSTS_TABLE};"))?;

    info!("event=db_migrate module=db status=ok step=adopt_unversioned_posts rows={adopted}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
