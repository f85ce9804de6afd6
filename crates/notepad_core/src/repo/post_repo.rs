//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert records of any registered kind into the shared `posts` table.
//! - Reconstruct the concrete kind of a stored row via the registry.
//!
//! # Invariants
//! - INSERT column and value lists come from one `StorageRow`, so they are
//!   always paired in order.
//! - A record is inserted at most once; its id is assigned from
//!   `last_insert_rowid` of that insert.
//! - Listing order is `id DESC` (newest first).

use crate::config::StoreConfig;
use crate::db::{open_db, table_columns, DbError, POSTS_TABLE};
use crate::model::record::{FieldValue, Record, RecordId, StorageRow, KIND_COLUMN};
use crate::model::registry::RecordRegistry;
use log::{debug, error, info, warn};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Instant;

const ID_COLUMN: &str = "id";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for record insert and lookup operations.
#[derive(Debug)]
pub enum StoreError {
    /// The requested kind is not registered.
    UnknownKind(String),
    /// The store file cannot be opened or bootstrapped.
    StorageUnavailable { path: PathBuf, source: DbError },
    NotFound(RecordId),
    /// A stored discriminator names a kind that is not registered.
    AmbiguousKind { id: RecordId, kind: String },
    /// A kind writes a column the `posts` table does not have.
    SchemaMismatch { kind: &'static str, column: String },
    AlreadyPersisted { kind: &'static str, id: RecordId },
    InvalidData(String),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "unknown record kind: {kind}"),
            Self::StorageUnavailable { path, source } => {
                write!(f, "cannot open store `{}`: {source}", path.display())
            }
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::AmbiguousKind { id, kind } => {
                write!(f, "record {id} has unregistered kind `{kind}`")
            }
            Self::SchemaMismatch { kind, column } => write!(
                f,
                "{kind} writes column `{column}` which is missing from table `{POSTS_TABLE}`"
            ),
            Self::AlreadyPersisted { kind, id } => {
                write!(f, "{kind} record is already stored with id {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Optional exact kind filter; must be a registered kind.
    pub kind: Option<String>,
    /// Maximum rows to return; `None` returns all.
    pub limit: Option<u32>,
}

/// Repository interface for record persistence.
pub trait PostRepository {
    /// Registry used to hydrate stored rows.
    fn registry(&self) -> &RecordRegistry;
    /// Stores a new record and assigns its id.
    fn insert(&self, record: &mut dyn Record) -> StoreResult<RecordId>;
    /// Loads one record as its concrete kind.
    fn find_by_id(&self, id: RecordId) -> StoreResult<Box<dyn Record>>;
    /// Lists records, newest first.
    fn list(&self, query: &ListQuery) -> StoreResult<Vec<Box<dyn Record>>>;
}

/// SQLite-backed repository opening one connection per operation.
pub struct SqlitePostRepository {
    config: StoreConfig,
    registry: RecordRegistry,
}

impl SqlitePostRepository {
    pub fn new(config: StoreConfig, registry: RecordRegistry) -> Self {
        Self { config, registry }
    }

    fn connect(&self) -> StoreResult<Connection> {
        open_db(self.config.db_path()).map_err(|source| StoreError::StorageUnavailable {
            path: self.config.db_path.clone(),
            source,
        })
    }

    fn hydrate(&self, stored: &StorageRow) -> StoreResult<Box<dyn Record>> {
        let id = match stored.get(ID_COLUMN) {
            Some(FieldValue::Integer(id)) => *id,
            other => {
                return Err(StoreError::InvalidData(format!(
                    "expected integer posts.{ID_COLUMN}, got {other:?}"
                )))
            }
        };
        let kind = stored
            .get(KIND_COLUMN)
            .and_then(FieldValue::as_text)
            .ok_or_else(|| {
                StoreError::InvalidData(format!("record {id} has no text posts.{KIND_COLUMN}"))
            })?;

        let ambiguous = || {
            warn!("event=post_hydrate module=repo status=error error_code=ambiguous_kind id={id} kind={kind}");
            StoreError::AmbiguousKind {
                id,
                kind: kind.to_string(),
            }
        };
        if !self.registry.contains(kind) {
            return Err(ambiguous());
        }
        let mut record = self.registry.create(kind).map_err(|_| ambiguous())?;
        record
            .load_from_storage_row(stored)
            .map_err(|err| StoreError::InvalidData(format!("record {id}: {err}")))?;
        record
            .assign_id(id)
            .map_err(|err| StoreError::InvalidData(format!("record {id}: {err}")))?;
        Ok(record)
    }
}

impl PostRepository for SqlitePostRepository {
    fn registry(&self) -> &RecordRegistry {
        &self.registry
    }

    fn insert(&self, record: &mut dyn Record) -> StoreResult<RecordId> {
        let started_at = Instant::now();
        let kind = record.kind();

        if let Some(id) = record.id() {
            return Err(StoreError::AlreadyPersisted { kind, id });
        }
        if !self.registry.contains(kind) {
            return Err(StoreError::UnknownKind(kind.to_string()));
        }

        let fields = record.to_storage_fields();
        let conn = self.connect()?;

        let known_columns = table_columns(&conn, POSTS_TABLE)?;
        if let Some(column) = fields
            .columns()
            .find(|column| !known_columns.contains(*column))
        {
            error!(
                "event=post_insert module=repo status=error error_code=schema_mismatch kind={kind} column={column}"
            );
            return Err(StoreError::SchemaMismatch {
                kind,
                column: column.to_string(),
            });
        }

        let column_list = fields
            .columns()
            .map(|column| format!("\"{column}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=fields.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute(
            &format!("INSERT INTO {POSTS_TABLE} ({column_list}) VALUES ({placeholders});"),
            params_from_iter(fields.values().map(to_sql_value)),
        )?;

        let id = conn.last_insert_rowid();
        record
            .assign_id(id)
            .map_err(|err| StoreError::InvalidData(err.to_string()))?;

        info!(
            "event=post_insert module=repo status=ok kind={kind} id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    fn find_by_id(&self, id: RecordId) -> StoreResult<Box<dyn Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {POSTS_TABLE} WHERE {ID_COLUMN} = ?1;"
        ))?;
        let column_names = owned_column_names(&stmt.column_names());

        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            debug!("event=post_find module=repo status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };
        let stored = read_storage_row(row, &column_names)?;

        let record = self.hydrate(&stored)?;
        debug!(
            "event=post_find module=repo status=ok id={id} kind={}",
            record.kind()
        );
        Ok(record)
    }

    fn list(&self, query: &ListQuery) -> StoreResult<Vec<Box<dyn Record>>> {
        let mut sql = format!("SELECT * FROM {POSTS_TABLE}");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind.as_deref() {
            let kind = kind.trim();
            if !self.registry.contains(kind) {
                return Err(StoreError::UnknownKind(kind.to_string()));
            }
            sql.push_str(&format!(" WHERE {KIND_COLUMN} = ?"));
            bind_values.push(Value::Text(kind.to_string()));
        }

        sql.push_str(&format!(" ORDER BY {ID_COLUMN} DESC"));

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let column_names = owned_column_names(&stmt.column_names());
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let stored = read_storage_row(row, &column_names)?;
            records.push(self.hydrate(&stored)?);
        }

        debug!(
            "event=post_list module=repo status=ok kind={} limit={:?} count={}",
            query.kind.as_deref().unwrap_or("*"),
            query.limit,
            records.len()
        );
        Ok(records)
    }
}

fn owned_column_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn read_storage_row(row: &Row<'_>, column_names: &[String]) -> StoreResult<StorageRow> {
    let mut stored = StorageRow::new();
    for (index, column) in column_names.iter().enumerate() {
        stored.insert(column.as_str(), from_sql_value(column, row.get_ref(index)?)?);
    }
    Ok(stored)
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(number) => Value::Integer(*number),
        FieldValue::Text(text) => Value::Text(text.clone()),
    }
}

fn from_sql_value(column: &str, value: ValueRef<'_>) -> StoreResult<FieldValue> {
    match value {
        ValueRef::Null => Ok(FieldValue::Null),
        ValueRef::Integer(number) => Ok(FieldValue::Integer(number)),
        ValueRef::Real(number) => Ok(FieldValue::Text(number.to_string())),
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
            .map(FieldValue::Text)
            .map_err(|_| StoreError::InvalidData(format!("non UTF-8 text in posts.{column}"))),
        ValueRef::Blob(_) => Err(StoreError::InvalidData(format!(
            "unexpected blob in posts.{column}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{from_sql_value, to_sql_value, StoreError};
    use crate::model::record::FieldValue;
    use rusqlite::types::{Value, ValueRef};

    #[test]
    fn field_values_map_to_sqlite_values() {
        assert_eq!(to_sql_value(&FieldValue::Null), Value::Null);
        assert_eq!(to_sql_value(&FieldValue::Integer(4)), Value::Integer(4));
        assert_eq!(
            to_sql_value(&FieldValue::text("x")),
            Value::Text("x".to_string())
        );
    }

    #[test]
    fn blobs_are_rejected_on_read() {
        let err = from_sql_value("text", ValueRef::Blob(&[0, 1])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(message) if message.contains("posts.text")));
    }

    #[test]
    fn reals_are_read_as_text() {
        assert_eq!(
            from_sql_value("url", ValueRef::Real(1.5)).unwrap(),
            FieldValue::text("1.5")
        );
    }
}
