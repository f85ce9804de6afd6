//! Flat text table for record listings.

use notepad_core::{FieldValue, Record, StorageRow};

const ID_HEADER: &str = "id";
const MAX_CELL_CHARS: usize = 40;

/// Storage fields of `record`, prefixed with its id.
pub fn record_row(record: &dyn Record) -> StorageRow {
    let mut row = StorageRow::new();
    row.insert(
        ID_HEADER,
        record.id().map_or(FieldValue::Null, FieldValue::Integer),
    );
    for (column, value) in record.to_storage_fields().iter() {
        row.insert(column, value.clone());
    }
    row
}

/// Header line plus one line per record, cells in `columns` order.
pub fn render_table(columns: &[&str], records: &[Box<dyn Record>]) -> Vec<String> {
    let header = std::iter::once(ID_HEADER)
        .chain(columns.iter().copied())
        .map(|column| format!("| {column}\t"))
        .collect::<String>();

    let mut lines = vec![header];
    for record in records {
        let row = record_row(&**record);
        let line = std::iter::once(ID_HEADER)
            .chain(columns.iter().copied())
            .map(|column| {
                let cell = row.get(column).map(FieldValue::to_cell).unwrap_or_default();
                format!("| {}\t", sanitize_cell(&cell))
            })
            .collect::<String>();
        lines.push(line);
    }
    lines
}

fn sanitize_cell(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .take(MAX_CELL_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{record_row, render_table, sanitize_cell};
    use notepad_core::{FieldValue, Link, Note, Record, Task};

    #[test]
    fn cells_drop_newlines_and_truncate() {
        assert_eq!(sanitize_cell("a\r\nb"), "ab");
        assert_eq!(sanitize_cell(&"x".repeat(50)).len(), 40);
    }

    #[test]
    fn record_row_starts_with_id() {
        let mut link = Link::new("https://example.org", "example");
        link.assign_id(3).unwrap();

        let row = record_row(&link);
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["id", "type", "created_at", "url", "text"]
        );
        assert_eq!(row.get("id"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn table_has_header_and_blank_cells_for_other_kinds_columns() {
        let mut note = Note::new("multi\nline");
        note.assign_id(1).unwrap();
        let mut task = Task::new("todo", None);
        task.assign_id(2).unwrap();
        let records: Vec<Box<dyn Record>> = vec![Box::new(task), Box::new(note)];

        let lines = render_table(&["type", "text", "url"], &records);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "| id\t| type\t| text\t| url\t");
        assert_eq!(lines[1], "| 2\t| Task\t| todo\t| \t");
        assert_eq!(lines[2], "| 1\t| Note\t| multiline\t| \t");
    }
}
