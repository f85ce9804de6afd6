//! Read command
//!
//! Usage: notepad read [--id <ID>] [--type <KIND>] [--limit <N>] [--json]

use crate::table::{record_row, render_table};
use clap::Args;
use notepad_core::{
    ListQuery, PostService, RecordId, RecordRegistry, SqlitePostRepository, StoreConfig,
    StoreError,
};
use std::io::Write;

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Show only this record, in full
    #[arg(long)]
    pub id: Option<RecordId>,

    /// Only list records of this kind (default: any)
    #[arg(long = "type", value_name = "KIND")]
    pub kind: Option<String>,

    /// How many of the newest records to list (default: all)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute read command
pub fn execute(args: ReadArgs, config: StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_records(args, config, &mut out)
}

fn write_records(
    args: ReadArgs,
    config: StoreConfig,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = RecordRegistry::standard();
    let columns = registry.columns();
    let service = PostService::new(SqlitePostRepository::new(config, registry));

    if let Some(id) = args.id {
        let record = match service.find(id) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                writeln!(out, "Record {id} not found")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if args.json {
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&record_row(&*record))?
            )?;
        } else {
            writeln!(out, "{}, id = {id}", record.kind())?;
            for line in record.to_display_lines() {
                writeln!(out, "{line}")?;
            }
        }
        return Ok(());
    }

    let records = service.list(&ListQuery {
        kind: args.kind,
        limit: args.limit,
    })?;

    if args.json {
        let rows: Vec<_> = records
            .iter()
            .map(|record| record_row(&**record))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        for line in render_table(&columns, &records) {
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_records, ReadArgs};
    use notepad_core::{
        Link, Note, PostRepository, RecordRegistry, SqlitePostRepository, StoreConfig, Task,
    };
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("notepad.sqlite"));
        let repo = SqlitePostRepository::new(config.clone(), RecordRegistry::standard());
        repo.insert(&mut Note::new("Buy milk")).unwrap();
        repo.insert(&mut Task::new("Renew passport", None)).unwrap();
        repo.insert(&mut Link::new("https://www.rust-lang.org", "Rust"))
            .unwrap();
        (dir, config)
    }

    fn args() -> ReadArgs {
        ReadArgs {
            id: None,
            kind: None,
            limit: None,
            json: false,
        }
    }

    fn run(args: ReadArgs, config: StoreConfig) -> String {
        let mut out = Vec::new();
        write_records(args, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn missing_id_reports_not_found_without_failing() {
        let (_dir, config) = seeded_store();
        let printed = run(
            ReadArgs {
                id: Some(42),
                ..args()
            },
            config,
        );
        assert_eq!(printed, "Record 42 not found\n");
    }

    #[test]
    fn single_record_prints_kind_and_display_lines() {
        let (_dir, config) = seeded_store();
        let printed = run(
            ReadArgs {
                id: Some(1),
                ..args()
            },
            config,
        );
        let mut lines = printed.lines();
        assert_eq!(lines.next(), Some("Note, id = 1"));
        assert_eq!(lines.next(), Some("Buy milk"));
        assert!(lines.next().unwrap().starts_with("Created: "));
    }

    #[test]
    fn json_listing_is_filtered_and_newest_first() {
        let (_dir, config) = seeded_store();
        let printed = run(
            ReadArgs {
                limit: Some(2),
                json: true,
                ..args()
            },
            config,
        );

        let rows: Vec<serde_json::Value> = serde_json::from_str(&printed).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 3);
        assert_eq!(rows[0]["type"], "Link");
        assert_eq!(rows[0]["url"], "https://www.rust-lang.org");
        assert_eq!(rows[1]["id"], 2);
        assert_eq!(rows[1]["due_date"], serde_json::Value::Null);
    }

    #[test]
    fn table_listing_only_shows_requested_kind() {
        let (_dir, config) = seeded_store();
        let printed = run(
            ReadArgs {
                kind: Some("Task".to_string()),
                ..args()
            },
            config,
        );
        assert!(printed.starts_with("| id\t| type\t"));
        assert!(printed.contains("Renew passport"));
        assert!(!printed.contains("Buy milk"));
    }

    #[test]
    fn unknown_kind_filter_is_an_error() {
        let (_dir, config) = seeded_store();
        let mut out = Vec::new();
        let err = write_records(
            ReadArgs {
                kind: Some("Memo".to_string()),
                ..args()
            },
            config,
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Memo"));
        assert!(out.is_empty());
    }
}
