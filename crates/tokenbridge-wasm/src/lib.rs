//! WebAssembly bindings for tokenbridge.
//!
//! ## Example
//!
//! ```js
//! import { resolveTokens, flattenTable, TokenBridge } from 'tokenbridge';
//!
//! const result = resolveTokens(body, { onDuplicate: 'error' });
//! console.log(result.unresolved);
//! const doc = flattenTable(result.table);
//!
//! // Plugin message loop backed by an in-memory store
//! const bridge = new TokenBridge();
//! const reply = bridge.handle(JSON.stringify({ type: 'EXPORT' }));
//! ```

use serde::{Deserialize, Serialize};
use tokenbridge_core::{ResolutionTable, UnresolvedAlias};
use tokenbridge_export::flatten_table;
use tokenbridge_host::{MemoryStore, Plugin};
use tokenbridge_resolver::{resolve_document, LeafOutcome, ResolveOptions};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
}

/// Get the version of the bindings.
#[wasm_bindgen(js_name = version)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Resolution result handed to JavaScript.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    pub table: ResolutionTable,
    /// The table rendered as a nested token document.
    pub document: serde_json::Value,
    pub outcomes: Vec<LeafOutcome>,
    pub unresolved: Vec<UnresolvedAlias>,
    pub passes: usize,
}

fn resolve(body: &str, options: &ResolveOptions) -> Result<ResolveResult, String> {
    let report = resolve_document(body, options).map_err(|e| e.to_string())?;
    Ok(ResolveResult {
        document: flatten_table(&report.table),
        table: report.table,
        outcomes: report.outcomes,
        unresolved: report.unresolved,
        passes: report.passes,
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Resolve a token document given as JSON text.
///
/// `options` may be `undefined`.
#[wasm_bindgen(js_name = resolveTokens)]
pub fn resolve_tokens(body: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options: ResolveOptions = if options.is_undefined() || options.is_null() {
        ResolveOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
    };

    let result = resolve(body, &options).map_err(|e| JsError::new(&e))?;
    to_js(&result)
}

/// Render a resolution table as a nested token document.
#[wasm_bindgen(js_name = flattenTable)]
pub fn flatten_table_js(table: JsValue) -> Result<JsValue, JsError> {
    let table: ResolutionTable = serde_wasm_bindgen::from_value(table)
        .map_err(|e| JsError::new(&format!("Invalid table: {}", e)))?;
    to_js(&flatten_table(&table))
}

/// Format normalized channels as hex (opaque) or `rgba(...)`.
#[wasm_bindgen(js_name = formatColor)]
pub fn format_color(r: f64, g: f64, b: f64, a: f64) -> String {
    tokenbridge_color::format_color(&tokenbridge_core::Color::rgba(r, g, b, a))
}

/// Parse a color string into `{ r, g, b, a }`.
#[wasm_bindgen(js_name = parseColor)]
pub fn parse_color(text: &str) -> Result<JsValue, JsError> {
    let color = tokenbridge_color::parse_color(text).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&color)
}

/// Plugin request handler backed by an in-memory variable store.
#[wasm_bindgen]
pub struct TokenBridge {
    plugin: Plugin<MemoryStore>,
}

impl Default for TokenBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl TokenBridge {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            plugin: Plugin::new(MemoryStore::new()),
        }
    }

    /// Restore a store previously returned by `saveStore`.
    #[wasm_bindgen(js_name = loadStore)]
    pub fn load_store(json: &str) -> Result<TokenBridge, JsError> {
        let store: MemoryStore = serde_json::from_str(json)
            .map_err(|e| JsError::new(&format!("Invalid store: {}", e)))?;
        Ok(Self {
            plugin: Plugin::new(store),
        })
    }

    #[wasm_bindgen(js_name = saveStore)]
    pub fn save_store(&self) -> Result<String, JsError> {
        serde_json::to_string(self.plugin.store())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Serve one JSON-encoded `IMPORT` or `EXPORT` request.
    pub fn handle(&mut self, message: &str) -> Result<String, JsError> {
        self.plugin
            .handle_json(message)
            .map_err(|e| JsError::new(&e.to_string()))
    }
}
