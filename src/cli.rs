use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clipvault", version, about = "Clipboard change monitor and history capture")]
pub struct Cli {
    /// Configuration file (defaults to `config.toml` in the data directory, if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Monitor the clipboard and print every snapshot as JSON until Ctrl-C
    Watch,
    /// Run one capture cycle now and print the snapshot, if any
    Capture,
    /// Put representations back on the clipboard
    Restore(RestoreArgs),
    /// List the capture formats in priority order
    Formats,
    /// Delete history entries older than the retention period
    Cleanup,
    /// Delete every history entry
    Purge,
}

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Plain text
    #[arg(long)]
    pub text: Option<String>,

    /// File paths joined by `|`
    #[arg(long)]
    pub files: Option<String>,

    /// Stored entry as `FORMAT=PATH`, e.g. `"HTML Format=History/HtmlFormat/x.html"`; repeatable
    #[arg(long = "stored", value_name = "FORMAT=PATH")]
    pub stored: Vec<String>,
}
