//! Error types for tokenbridge-host.

use crate::migrate::StyleSkip;
use thiserror::Error;
use tokenbridge_core::{
    CollectionId, DocumentError, ExportError, ModeId, UnresolvedAlias, VariableId, VariableKind,
};
use tokenbridge_resolver::LeafOutcome;

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// Errors raised while talking to the variable store.
#[derive(Debug, Error)]
pub enum HostError {
    /// The document resolved to nothing the store can hold.
    ///
    /// Carries the per-leaf outcomes and unresolved aliases explaining why.
    #[error(
        "No convertible tokens found ({} leaves rejected, {} aliases unresolved)",
        .outcomes.len(),
        .unresolved.len()
    )]
    NoConvertibleTokens {
        outcomes: Vec<LeafOutcome>,
        unresolved: Vec<UnresolvedAlias>,
    },

    /// No paint style qualified for migration.
    #[error("No convertible styles found ({} skipped)", .skipped.len())]
    NoConvertibleStyles { skipped: Vec<(String, StyleSkip)> },

    /// The document could not be parsed at all.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Rendering an export document failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Unknown collection: {0}")]
    UnknownCollection(CollectionId),

    #[error("Unknown mode {mode} in collection {collection}")]
    UnknownMode {
        collection: CollectionId,
        mode: ModeId,
    },

    #[error("Unknown variable: {0}")]
    UnknownVariable(VariableId),

    /// A variable of that name already exists in the collection.
    #[error("Variable {name} already exists in collection {collection}")]
    DuplicateVariable {
        name: String,
        collection: CollectionId,
    },

    /// An existing variable has a different type than the incoming token.
    #[error("Variable {name} exists with type {existing:?}, token has type {incoming:?}")]
    KindConflict {
        name: String,
        existing: VariableKind,
        incoming: VariableKind,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
