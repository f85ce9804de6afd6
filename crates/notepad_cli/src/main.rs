//! notepad CLI
//!
//! Create notes, tasks and links at an interactive prompt and read them back.

use clap::{Parser, Subcommand};
use notepad_core::{default_log_level, init_logging, StoreConfig, DEFAULT_DB_FILE};
use std::path::{Path, PathBuf};

mod commands;
mod table;

#[derive(Debug, Parser)]
#[command(name = "notepad", version)]
#[command(about = "Personal notepad backed by SQLite", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "NOTEPAD_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Write rotating log files into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a new record
    New(commands::new::NewArgs),
    /// Show one record or a table of records
    Read(commands::read::ReadArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(e) = start_logging(level, log_dir) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    let config = StoreConfig::new(cli.db);
    let result = match cli.command {
        Commands::New(args) => commands::new::execute(args, config),
        Commands::Read(args) => commands::read::execute(args, config),
    };

    if let Err(e) = result {
        log::error!("event=cli_exit module=cli status=error error={e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn start_logging(level: &str, log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    init_logging(level, log_dir)?;
    Ok(())
}
