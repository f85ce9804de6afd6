//! Free-text note kind.

use crate::console::Console;
use crate::model::record::{decode_text, Column, FieldValue, RecordError, RecordKind, RecordMeta};
use serde::{Deserialize, Serialize};

const BODY_TERMINATOR: &str = "end";

/// Multi-line free-text note, stored in `posts.text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(flatten)]
    meta: RecordMeta,
    /// Lines joined by `\n`.
    pub body: String,
}

impl Note {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::new(),
            body: body.into(),
        }
    }
}

impl RecordKind for Note {
    const KIND: &'static str = "Note";
    const COLUMNS: &'static [Column<Self>] = &[Column {
        name: "text",
        encode: encode_body,
        decode: decode_body,
    }];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn prompt(&mut self, console: &mut Console<'_>) -> Result<(), RecordError> {
        loop {
            let lines = console.read_block(
                &format!("Enter your note; finish with a line containing only \"{BODY_TERMINATOR}\":"),
                BODY_TERMINATOR,
            )?;
            if lines.iter().any(|line| !line.trim().is_empty()) {
                self.body = lines.join("\n");
                return Ok(());
            }
            console.say("A note cannot be empty.")?;
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        self.body.lines().map(str::to_string).collect()
    }
}

fn encode_body(note: &Note) -> FieldValue {
    FieldValue::text(note.body.as_str())
}

fn decode_body(note: &mut Note, value: &FieldValue) -> Result<(), String> {
    note.body = decode_text(value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Note;
    use crate::console::Console;
    use crate::model::record::{FieldValue, Record};
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_terminator() {
        let mut note = Note::default();
        let mut input = Cursor::new("Buy milk\n  and bread\nend\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);

        note.read_from_console(&mut console).unwrap();
        assert_eq!(note.body, "Buy milk\n  and bread");
    }

    #[test]
    fn blank_note_is_prompted_again() {
        let mut note = Note::default();
        let mut input = Cursor::new("\nend\nreal text\nend\n");
        let mut output = Vec::new();
        let mut console = Console::new(&mut input, &mut output);

        note.read_from_console(&mut console).unwrap();
        assert_eq!(note.body, "real text");
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("A note cannot be empty."));
    }

    #[test]
    fn storage_fields_start_with_discriminator() {
        let note = Note::new("hello");
        let row = note.to_storage_fields();
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["type", "created_at", "text"]
        );
        assert_eq!(row.get("type"), Some(&FieldValue::text("Note")));
        assert_eq!(row.get("text"), Some(&FieldValue::text("hello")));
    }

    #[test]
    fn display_lines_list_body_then_creation_time() {
        let note = Note::new("one\ntwo");
        let lines = note.to_display_lines();
        assert_eq!(lines[0], "one");
        assert_eq!(lines[1], "two");
        assert!(lines[2].starts_with("Created: "));
    }
}
