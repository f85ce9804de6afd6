//! Record base contract shared by every concrete kind.
//!
//! # Responsibility
//! - Define the object-safe [`Record`] contract used by callers and storage.
//! - Define the static per-kind schema descriptor ([`RecordKind`], [`Column`]).
//! - Derive storage encoding/decoding from the descriptor, so column and value
//!   lists are always paired in the same order.
//!
//! # Invariants
//! - `kind` is fixed by the concrete type and never changes.
//! - `created_at` is set at construction and only replaced when hydrating.
//! - `id` is assigned at most once.
//! - Every storage row starts with `type` and `created_at`.

use crate::console::Console;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::any::Any;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Storage-assigned record identifier (`posts.id`).
pub type RecordId = i64;

/// Discriminator column name.
pub const KIND_COLUMN: &str = "type";
/// Creation timestamp column name.
pub const CREATED_AT_COLUMN: &str = "created_at";

const LEGACY_CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DISPLAY_CREATED_AT_FORMAT: &str = "%Y.%m.%d, %H:%M:%S";

/// Record-level error for console input and storage decoding.
#[derive(Debug)]
pub enum RecordError {
    /// Input ended before required fields were satisfied.
    InputClosed,
    Io(std::io::Error),
    IdAlreadyAssigned {
        kind: &'static str,
        id: RecordId,
    },
    MissingColumn {
        kind: &'static str,
        column: &'static str,
    },
    InvalidField {
        kind: &'static str,
        column: &'static str,
        message: String,
    },
    KindMismatch {
        expected: &'static str,
        found: String,
    },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputClosed => write!(f, "input closed before the record was complete"),
            Self::Io(err) => write!(f, "{err}"),
            Self::IdAlreadyAssigned { kind, id } => {
                write!(f, "{kind} record already has id {id}")
            }
            Self::MissingColumn { kind, column } => {
                write!(f, "{kind} row is missing required column `{column}`")
            }
            Self::InvalidField {
                kind,
                column,
                message,
            } => write!(f, "invalid {kind}.{column} value: {message}"),
            Self::KindMismatch { expected, found } => {
                write!(f, "row of kind `{found}` cannot be loaded as {expected}")
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RecordError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Storage-neutral cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Maps `None` to `Null`.
    pub fn optional_text(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Null, |text| Self::Text(text.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Renders the value as a plain table cell; `Null` becomes an empty string.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Ordered column-to-value mapping, as produced by a record or read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageRow {
    cells: Vec<(String, FieldValue)>,
}

impl StorageRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, replacing an existing value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for StorageRow {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for StorageRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Attributes shared by every record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    id: Option<RecordId>,
    created_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Stamps a fresh, unsaved record with the current time.
    pub fn new() -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes one column value into a kind's field.
pub type ColumnDecoder<K> = fn(&mut K, &FieldValue) -> Result<(), String>;

/// One entry of a kind's static schema descriptor.
pub struct Column<K> {
    pub name: &'static str,
    pub encode: fn(&K) -> FieldValue,
    pub decode: ColumnDecoder<K>,
}

/// Static description of a concrete record kind.
///
/// Implementors get [`Record`] through the blanket impl below; they only
/// describe their columns, prompts and detail rendering.
pub trait RecordKind: Default + Debug + 'static {
    /// Discriminator stored in `posts.type`.
    const KIND: &'static str;
    /// Type-specific columns, in storage order.
    const COLUMNS: &'static [Column<Self>];

    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Prompts for and fills type-specific fields.
    fn prompt(&mut self, console: &mut Console<'_>) -> Result<(), RecordError>;

    /// Human-readable lines for type-specific fields.
    fn detail_lines(&self) -> Vec<String>;
}

/// Object-safe record contract used by the registry and the gateway.
pub trait Record: Debug {
    fn kind(&self) -> &'static str;
    fn created_at(&self) -> DateTime<Utc>;
    fn id(&self) -> Option<RecordId>;

    /// Assigns the storage identifier; fails if one is already set.
    fn assign_id(&mut self, id: RecordId) -> Result<(), RecordError>;

    /// Prompts for and fills type-specific fields, blocking on `console`.
    fn read_from_console(&mut self, console: &mut Console<'_>) -> Result<(), RecordError>;

    fn to_display_lines(&self) -> Vec<String>;

    fn to_storage_fields(&self) -> StorageRow;

    /// Populates `created_at` and type-specific fields from a stored row.
    fn load_from_storage_row(&mut self, row: &StorageRow) -> Result<(), RecordError>;

    fn as_any(&self) -> &dyn Any;
}

impl<K: RecordKind> Record for K {
    fn kind(&self) -> &'static str {
        K::KIND
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta().created_at
    }

    fn id(&self) -> Option<RecordId> {
        self.meta().id
    }

    fn assign_id(&mut self, id: RecordId) -> Result<(), RecordError> {
        let meta = self.meta_mut();
        if let Some(existing) = meta.id {
            return Err(RecordError::IdAlreadyAssigned {
                kind: K::KIND,
                id: existing,
            });
        }
        meta.id = Some(id);
        Ok(())
    }

    fn read_from_console(&mut self, console: &mut Console<'_>) -> Result<(), RecordError> {
        self.prompt(console)
    }

    fn to_display_lines(&self) -> Vec<String> {
        let mut lines = self.detail_lines();
        lines.push(format!(
            "Created: {}",
            self.meta()
                .created_at
                .with_timezone(&Local)
                .format(DISPLAY_CREATED_AT_FORMAT)
        ));
        lines
    }

    fn to_storage_fields(&self) -> StorageRow {
        let mut row = StorageRow::new();
        row.insert(KIND_COLUMN, FieldValue::text(K::KIND));
        row.insert(
            CREATED_AT_COLUMN,
            FieldValue::Text(encode_created_at(self.meta().created_at)),
        );
        for column in K::COLUMNS {
            row.insert(column.name, (column.encode)(self));
        }
        row
    }

    fn load_from_storage_row(&mut self, row: &StorageRow) -> Result<(), RecordError> {
        if let Some(found) = row.get(KIND_COLUMN).and_then(FieldValue::as_text) {
            if found != K::KIND {
                return Err(RecordError::KindMismatch {
                    expected: K::KIND,
                    found: found.to_string(),
                });
            }
        }

        let created_at = row
            .get(CREATED_AT_COLUMN)
            .ok_or(RecordError::MissingColumn {
                kind: K::KIND,
                column: CREATED_AT_COLUMN,
            })?
            .as_text()
            .ok_or_else(|| invalid_field::<K>(CREATED_AT_COLUMN, "expected text".to_string()))?;
        self.meta_mut().created_at = decode_created_at(created_at)
            .map_err(|message| invalid_field::<K>(CREATED_AT_COLUMN, message))?;

        for column in K::COLUMNS {
            // Kind columns are nullable, so an absent cell decodes like NULL.
            let value = row.get(column.name).unwrap_or(&FieldValue::Null);
            (column.decode)(self, value).map_err(|message| invalid_field::<K>(column.name, message))?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn invalid_field<K: RecordKind>(column: &'static str, message: String) -> RecordError {
    RecordError::InvalidField {
        kind: K::KIND,
        column,
        message,
    }
}

/// Encodes a creation timestamp as RFC 3339 UTC with nanoseconds.
pub fn encode_created_at(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decodes RFC 3339, falling back to the legacy `YYYY-MM-DD HH:MM:SS +ZZZZ` form.
pub fn decode_created_at(value: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, LEGACY_CREATED_AT_FORMAT))
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("unparseable timestamp `{trimmed}`: {err}"))
}

/// Decodes a required text column; `NULL` decodes to an empty string.
pub fn decode_text(value: &FieldValue) -> Result<String, String> {
    match value {
        FieldValue::Null => Ok(String::new()),
        FieldValue::Text(text) => Ok(text.clone()),
        FieldValue::Integer(number) => Err(format!("expected text, got integer {number}")),
    }
}

/// Decodes a nullable text column.
pub fn decode_optional_text(value: &FieldValue) -> Result<Option<String>, String> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(text) => Ok(Some(text.clone())),
        FieldValue::Integer(number) => Err(format!("expected text, got integer {number}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_created_at, encode_created_at, FieldValue, StorageRow};
    use chrono::{TimeZone, Utc};

    #[test]
    fn created_at_round_trips_with_nanoseconds() {
        let value = Utc
            .timestamp_opt(1_760_000_000, 123_456_789)
            .single()
            .expect("valid timestamp");
        let encoded = encode_created_at(value);
        assert_eq!(encoded, "2025-10-09T08:53:20.123456789Z");
        assert_eq!(decode_created_at(&encoded).unwrap(), value);
    }

    #[test]
    fn created_at_accepts_legacy_format() {
        let decoded = decode_created_at("2014-12-27 12:08:31 +0300").unwrap();
        assert_eq!(
            decoded,
            Utc.with_ymd_and_hms(2014, 12, 27, 9, 8, 31).unwrap()
        );
    }

    #[test]
    fn created_at_rejects_garbage() {
        let err = decode_created_at("yesterday").unwrap_err();
        assert!(err.contains("yesterday"));
    }

    #[test]
    fn storage_row_insert_replaces_in_place() {
        let mut row = StorageRow::new();
        row.insert("type", FieldValue::text("Note"));
        row.insert("text", FieldValue::Null);
        row.insert("type", FieldValue::text("Task"));

        assert_eq!(row.len(), 2);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["type", "text"]);
        assert_eq!(row.get("type"), Some(&FieldValue::text("Task")));
    }

    #[test]
    fn storage_row_serializes_as_ordered_map() {
        let row: StorageRow = vec![
            ("id".to_string(), FieldValue::Integer(7)),
            ("type".to_string(), FieldValue::text("Link")),
            ("due_date".to_string(), FieldValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":7,"type":"Link","due_date":null}"#);
    }
}
