//! Web link kind.

use crate::console::Console;
use crate::model::record::{decode_text, Column, FieldValue, RecordError, RecordKind, RecordMeta};
use serde::{Deserialize, Serialize};

/// Bookmarked URL with a short description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(flatten)]
    meta: RecordMeta,
    pub url: String,
    /// Description, stored in `posts.text`.
    pub body: String,
}

impl Link {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::new(),
            url: url.into(),
            body: body.into(),
        }
    }
}

impl RecordKind for Link {
    const KIND: &'static str = "Link";
    const COLUMNS: &'static [Column<Self>] = &[
        Column {
            name: "url",
            encode: encode_url,
            decode: decode_url,
        },
        Column {
            name: "text",
            encode: encode_body,
            decode: decode_body,
        },
    ];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn prompt(&mut self, console: &mut Console<'_>) -> Result<(), RecordError> {
        self.url = console.ask_required("Address (url):")?;
        self.body = console
            .ask("What is behind this link?")?
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        Ok(())
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![format!("Url: {}", self.url), self.body.clone()]
    }
}

fn encode_url(link: &Link) -> FieldValue {
    FieldValue::text(link.url.as_str())
}

fn encode_body(link: &Link) -> FieldValue {
    FieldValue::text(link.body.as_str())
}

fn decode_url(link: &mut Link, value: &FieldValue) -> Result<(), String> {
    link.url = decode_text(value)?;
    Ok(())
}

fn decode_body(link: &mut Link, value: &FieldValue) -> Result<(), String> {
    link.body = decode_text(value)?;
    Ok(())
}
