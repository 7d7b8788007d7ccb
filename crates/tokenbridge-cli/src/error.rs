//! Error types for tokenbridge-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Host(#[from] tokenbridge_host::HostError),

    #[error(transparent)]
    Document(#[from] tokenbridge_core::DocumentError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// I/O error on a named path
    #[error("{path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Logging(String),
}

impl CliError {
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
