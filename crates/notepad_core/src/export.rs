//! Per-record text file export.
//!
//! # Invariants
//! - File names are `{Kind}_{YYYY-MM-DD_HH-MM-SS}.txt` in local time, so two
//!   records of one kind created within the same second share a name.

use crate::model::record::Record;
use chrono::Local;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Returns the export file name for `record`.
pub fn export_file_name(record: &dyn Record) -> String {
    format!(
        "{}_{}.txt",
        record.kind(),
        record
            .created_at()
            .with_timezone(&Local)
            .format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Writes the display lines of `record` into `dir`, replacing an existing file.
pub fn export_to_file(record: &dyn Record, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = dir.as_ref().join(export_file_name(record));
    let mut writer = BufWriter::new(File::create(&path)?);
    for line in record.to_display_lines() {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    info!(
        "event=record_export module=export status=ok kind={} path={}",
        record.kind(),
        path.display()
    );
    Ok(path)
}
