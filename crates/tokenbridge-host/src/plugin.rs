//! Request handling for a design-tool plugin.

use crate::error::Result;
use crate::export::export_all;
use crate::import::{import_document, ImportSummary};
use crate::store::VariableStore;
use serde::{Deserialize, Serialize};
use tokenbridge_export::{ExportOptions, ExportedFile};
use tokenbridge_resolver::ResolveOptions;

/// A message from the plugin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Import {
        #[serde(rename = "fileName")]
        file_name: String,
        body: String,
    },
    Export,
}

/// The reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Imported(ImportSummary),
    Exported { files: Vec<ExportedFile> },
}

/// Serves requests against a variable store.
#[derive(Debug)]
pub struct Plugin<S> {
    store: S,
    resolve_options: ResolveOptions,
    export_options: ExportOptions,
}

impl<S: VariableStore> Plugin<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            resolve_options: ResolveOptions::default(),
            export_options: ExportOptions::default(),
        }
    }

    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve_options = options;
        self
    }

    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Serve one request to completion.
    pub fn handle(&mut self, request: Request) -> Result<Response> {
        match request {
            Request::Import { file_name, body } => {
                tracing::debug!(file = %file_name, bytes = body.len(), "import requested");
                let summary = import_document(&mut self.store, &file_name, &body, &self.resolve_options)?;
                Ok(Response::Imported(summary))
            }
            Request::Export => {
                let files = export_all(&self.store, &self.export_options)?;
                Ok(Response::Exported { files })
            }
        }
    }

    /// Serve a JSON-encoded request, returning the JSON-encoded response.
    pub fn handle_json(&mut self, message: &str) -> Result<String> {
        let request: Request = serde_json::from_str(message)?;
        let response = self.handle(request)?;
        Ok(serde_json::to_string(&response)?)
    }
}
