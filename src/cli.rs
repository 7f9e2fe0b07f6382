//! CLI definitions for SpyWeb.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SpyWeb CLI.
#[derive(Parser)]
#[command(name = "spyweb")]
#[command(about = "Inspect and manage persisted page masks")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.spyweb/config.toml)
    #[arg(short, long, global = true, env = "SPYWEB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List stored mask records
    List {
        /// Only show records of this domain
        #[arg(long)]
        domain: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write every record and the mask settings to a bundle file
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Replace stored records and settings with a bundle file
    Import {
        /// Bundle file to read
        file: PathBuf,
    },

    /// Remove one record, by selector or by its position in `list`
    Remove {
        /// Domain the record belongs to
        #[arg(long)]
        domain: String,

        /// Selector of the record
        #[arg(long, required_unless_present = "index", conflicts_with = "index")]
        selector: Option<String>,

        /// Zero-based position of the record within the domain
        #[arg(long)]
        index: Option<usize>,
    },

    /// Remove the records of one domain, or every record
    Clear {
        /// Only clear this domain
        #[arg(long)]
        domain: Option<String>,
    },

    /// Show the stored mask settings
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
