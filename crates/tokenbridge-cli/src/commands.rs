//! Command implementations for tokenbridge-cli

use crate::error::{CliError, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokenbridge_export::{flatten_table, ExportOptions};
use tokenbridge_host::{export_all, import_document, migrate_styles, MemoryStore, PaintStyle};
use tokenbridge_resolver::{resolve_document, ResolveOptions};

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve a document; returns the flattened tokens and the report.
pub fn run_resolve(file: &Path, options: &ResolveOptions) -> Result<Value> {
    let report = resolve_document(&read(file)?, options)?;
    if !report.unresolved.is_empty() {
        tracing::warn!(count = report.unresolved.len(), "document has unresolved aliases");
    }
    Ok(json!({
        "tokens": flatten_table(&report.table),
        "outcomes": report.outcomes,
        "unresolved": report.unresolved,
        "passes": report.passes,
    }))
}

/// Import a document into the store file.
pub fn run_import(file: &Path, store_path: &Path, options: &ResolveOptions) -> Result<Value> {
    let body = read(file)?;
    let mut store = MemoryStore::load_or_default(store_path)?;
    let summary = import_document(&mut store, &file_name(file), &body, options)?;
    store.save(store_path)?;
    Ok(serde_json::to_value(summary)?)
}

/// Write every collection and mode in the store to `out`.
pub fn run_export(store_path: &Path, out: &Path, options: &ExportOptions) -> Result<Vec<PathBuf>> {
    let store = MemoryStore::load(store_path)?;
    let files = export_all(&store, options)?;
    std::fs::create_dir_all(out).map_err(|e| CliError::io(out, e))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out.join(&file.file_name);
        std::fs::write(&path, file.body).map_err(|e| CliError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "token file written");
        written.push(path);
    }
    Ok(written)
}

/// Migrate paint styles into a new timestamped collection.
pub fn run_migrate_styles(styles_path: &Path, store_path: &Path) -> Result<Value> {
    let styles: Vec<PaintStyle> = serde_json::from_str(&read(styles_path)?)?;
    let mut store = MemoryStore::load_or_default(store_path)?;
    let name = format!(
        "Style Token Migration: {}",
        chrono::Utc::now().timestamp_millis()
    );
    let summary = migrate_styles(&mut store, &styles, &name)?;
    store.save(store_path)?;
    Ok(serde_json::to_value(summary)?)
}
