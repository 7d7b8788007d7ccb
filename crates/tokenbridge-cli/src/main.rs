//! tokenbridge CLI
//!
//! Resolves design-token documents and moves them in and out of a
//! JSON-file-backed variable store.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use serde_json::Value;
use tokenbridge_export::ExportOptions;
use tokenbridge_resolver::ResolveOptions;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!(command = ?cli.command, "starting");

    match cli.command {
        Commands::Resolve { file, on_duplicate } => {
            let options = ResolveOptions::new().with_duplicate_policy(on_duplicate.into());
            print_json(&commands::run_resolve(&file, &options)?)
        }
        Commands::Import {
            file,
            store,
            on_duplicate,
        } => {
            let options = ResolveOptions::new().with_duplicate_policy(on_duplicate.into());
            print_json(&commands::run_import(&file, &store, &options)?)
        }
        Commands::Export {
            store,
            out,
            compact,
        } => {
            let options = if compact {
                ExportOptions::new().compact()
            } else {
                ExportOptions::new()
            };
            for path in commands::run_export(&store, &out, &options)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::MigrateStyles { styles, store } => {
            print_json(&commands::run_migrate_styles(&styles, &store)?)
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
