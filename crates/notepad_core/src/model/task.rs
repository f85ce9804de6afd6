//! Scheduled task kind.

use crate::console::Console;
use crate::model::record::{
    decode_optional_text, decode_text, Column, FieldValue, RecordError, RecordKind, RecordMeta,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage format for `posts.due_date`.
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";
/// Console input and display format, e.g. `12.05.2027`.
const CONSOLE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Task with an optional due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    meta: RecordMeta,
    pub body: String,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(body: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            meta: RecordMeta::new(),
            body: body.into(),
            due_date,
        }
    }
}

impl RecordKind for Task {
    const KIND: &'static str = "Task";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "text",
            encode: encode_body,
            decode: decode_body,
        },
        Column {
            name: "due_date",
            encode: encode_due_date,
            decode: decode_due_date,
        },
    ];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn prompt(&mut self, console: &mut Console<'_>) -> Result<(), RecordError> {
        self.body = console.ask_required("What needs to be done?")?;

        loop {
            let Some(answer) =
                console.ask("Due date (DD.MM.YYYY or YYYY-MM-DD, empty for none):")?
            else {
                self.due_date = None;
                return Ok(());
            };
            let answer = answer.trim();
            if answer.is_empty() {
                self.due_date = None;
                return Ok(());
            }
            match parse_console_date(answer) {
                Some(date) => {
                    self.due_date = Some(date);
                    return Ok(());
                }
                None => console.say(&format!("Cannot read `{answer}` as a date."))?,
            }
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        let due = self.due_date.map_or_else(
            || "no due date".to_string(),
            |date| date.format(CONSOLE_DATE_FORMAT).to_string(),
        );
        vec![format!("Task: {}", self.body), format!("Due: {due}")]
    }
}

fn parse_console_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, CONSOLE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, STORED_DATE_FORMAT))
        .ok()
}

fn encode_body(task: &Task) -> FieldValue {
    FieldValue::text(task.body.as_str())
}

fn decode_body(task: &mut Task, value: &FieldValue) -> Result<(), String> {
    task.body = decode_text(value)?;
    Ok(())
}

fn encode_due_date(task: &Task) -> FieldValue {
    FieldValue::optional_text(
        task.due_date
            .map(|date| date.format(STORED_DATE_FORMAT).to_string()),
    )
}

fn decode_due_date(task: &mut Task, value: &FieldValue) -> Result<(), String> {
    task.due_date = match decode_optional_text(value)? {
        Some(text) => Some(
            NaiveDate::parse_from_str(text.trim(), STORED_DATE_FORMAT)
                .map_err(|err| format!("unparseable date `{text}`: {err}"))?,
        ),
        None => None,
    };
    Ok(())
}
