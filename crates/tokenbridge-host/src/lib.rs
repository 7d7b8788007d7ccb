//! Variable-store adapter for tokenbridge.
//!
//! Connects the resolver and exporter to a design tool's variable storage:
//! - [`VariableStore`] is the host contract; [`MemoryStore`] implements it
//!   in memory and persists as JSON
//! - [`import_document`] resolves a token file into a collection
//! - [`export_all`] renders every collection and mode back to token files
//! - [`migrate_styles`] turns solid paint styles into color variables
//! - [`Plugin`] serves `IMPORT` / `EXPORT` requests from a plugin UI
//!
//! # Example
//!
//! ```
//! use tokenbridge_host::{import_document, export_all, MemoryStore};
//! use tokenbridge_export::ExportOptions;
//! use tokenbridge_resolver::ResolveOptions;
//!
//! let mut store = MemoryStore::new();
//! let body = r##"{"space": {"$type": "number", "md": {"$value": 16}}}"##;
//! import_document(&mut store, "brand.tokens.json", body, &ResolveOptions::default()).unwrap();
//!
//! let files = export_all(&store, &ExportOptions::default()).unwrap();
//! assert_eq!(files[0].file_name, "brand.Mode 1.tokens.json");
//! ```

mod error;
mod export;
mod import;
mod migrate;
mod plugin;
mod store;

pub use error::{HostError, Result};
pub use export::export_all;
pub use import::{import_document, target_from_file_name, ImportSummary};
pub use migrate::{migrate_styles, MigrationSummary, Paint, PaintStyle, StyleSkip};
pub use plugin::{Plugin, Request, Response};
pub use store::{MemoryStore, VariableStore, DEFAULT_MODE_NAME};
