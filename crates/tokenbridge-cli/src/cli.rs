//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokenbridge_resolver::DuplicatePolicy;

/// tokenbridge - Resolve design tokens and sync them with a variable store
#[derive(Parser, Debug)]
#[command(name = "tokenbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a token document and print the result as JSON
    Resolve {
        /// Token document to resolve
        file: PathBuf,

        /// What to do when two leaves share a name
        #[arg(long, value_enum, default_value_t = OnDuplicate::Overwrite)]
        on_duplicate: OnDuplicate,
    },

    /// Import a token document into a variable store
    ///
    /// The collection is named after the file: `brand.dark.tokens.json`
    /// imports into collection `brand`, mode `dark`.
    Import {
        /// Token document to import
        file: PathBuf,

        /// Store file, created when missing
        #[arg(long)]
        store: PathBuf,

        #[arg(long, value_enum, default_value_t = OnDuplicate::Overwrite)]
        on_duplicate: OnDuplicate,
    },

    /// Write one token file per collection and mode
    Export {
        /// Store file to read
        #[arg(long)]
        store: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert solid paint styles into color variables
    MigrateStyles {
        /// JSON array of paint styles
        styles: PathBuf,

        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Later leaves replace earlier ones
    Overwrite,
    /// Later leaves are reported as failed
    Error,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::Overwrite => DuplicatePolicy::Overwrite,
            OnDuplicate::Error => DuplicatePolicy::Error,
        }
    }
}
