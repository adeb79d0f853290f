//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// weightlog - Weight and calorie log with cloud-folder sync
#[derive(Parser, Debug)]
#[command(name = "wl", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Record store path (default: ~/.weightlog/data/weights.txt)
    #[arg(long, global = true, env = "WEIGHTLOG_STORE")]
    pub store: Option<PathBuf>,

    /// Cloud-drive folder to sync through
    #[arg(long, global = true, env = "WEIGHTLOG_SYNC_DIR")]
    pub sync_dir: Option<PathBuf>,

    /// Skip the startup import and the export after changes
    #[arg(long, global = true)]
    pub no_sync: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a day's weight and calories
    Add(RecordArgs),

    /// Change the entry for a date
    Edit(RecordArgs),

    /// Remove every entry for a date
    Rm {
        /// Date of the entry to remove
        date: String,
    },

    /// List all entries
    List,

    /// Show average loss per entry and average calories
    Stats,

    /// Show weights with their trend line
    Trend,

    /// Sync with the cloud folder
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Fields of one entry.
#[derive(clap::Args, Debug)]
pub struct RecordArgs {
    /// Entry date (e.g. 2024-01-31)
    pub date: String,

    /// Weight
    pub weight: String,

    /// Calorie intake
    pub calorie: String,
}

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Publish the local store as a new snapshot
    Export,

    /// Replace the local store with the newest complete snapshot
    Import,

    /// Show snapshots, backups and whether the store is current
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
