//! New command
//!
//! Usage: notepad new [--export-dir <DIR>]

use clap::Args;
use notepad_core::{
    core_version, export_to_file, Console, PostService, RecordRegistry, SqlitePostRepository,
    StoreConfig,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Also write the record to a text file in this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

/// Execute new command
pub fn execute(args: NewArgs, config: StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = PostService::new(SqlitePostRepository::new(
        config,
        RecordRegistry::standard(),
    ));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    writeln!(output, "Hi, I am your notepad! Version {}", core_version())?;

    let record = {
        let mut console = Console::new(&mut input, &mut output);
        service.create_from_console(&mut console)?
    };

    if let Some(id) = record.id() {
        writeln!(output, "Saved, id = {id}")?;
    }

    if let Some(dir) = args.export_dir {
        let path = export_to_file(&*record, &dir)?;
        writeln!(output, "Exported to {}", path.display())?;
    }

    Ok(())
}
