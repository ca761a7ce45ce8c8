//! CLI type definitions: command enums and argument parsers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gamelist")]
#[command(about = "Maintain a metadata database for game collections", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/gamelist/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the settings file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Record every matching file and non-empty folder under a system's root
    Scan {
        /// System name from the settings file
        system: String,
    },

    /// Re-check which recorded files still exist on disk
    Refresh {
        system: String,
    },

    /// Merge a gamelist.xml file into the database
    Import {
        system: String,

        /// Gamelist file to read (default: the system's configured gamelist)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Write a system's records to a gamelist.xml file
    Export {
        system: String,

        /// Destination file (default: the system's configured gamelist)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show the stored record for a file
    Show {
        system: String,

        /// File path, relative to the system root or absolute
        path: PathBuf,
    },

    /// Store metadata for a file, keeping fields not given
    Set {
        system: String,

        /// File path, relative to the system root or absolute
        path: PathBuf,

        /// Fields to set, as key=value
        #[arg(required = true, value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// Create the record as a folder if it does not exist yet
        #[arg(long)]
        folder: bool,
    },

    /// Show record counts per system
    Stats,

    /// List configured systems
    Systems,
}

/// Parse a `key=value` argument. The value may be empty or contain `=`.
pub(crate) fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
