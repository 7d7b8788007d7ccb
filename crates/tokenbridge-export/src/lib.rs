//! Export resolved tokens as nested token documents.
//!
//! Two sources are supported:
//! - A [`ResolutionTable`] produced by the resolver
//! - Host variable collections, one document per (collection, mode) pair,
//!   named `{collection}.{mode}.tokens.json`
//!
//! Literals render through the color codec or as raw numbers; references
//! render as dotted alias strings (`{color.red}`).

mod builder;

pub use builder::DocumentBuilder;

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use tokenbridge_color::format_color;
use tokenbridge_core::{
    Collection, ExportError, Literal, Mode, ResolutionTable, ResolvedValue, TokenName, Variable,
    VariableId, VariableValue,
};

/// Read access to host variables by identifier.
pub trait VariableLookup {
    fn variable(&self, id: &VariableId) -> Option<&Variable>;
}

impl VariableLookup for IndexMap<VariableId, Variable> {
    fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.get(id)
    }
}

impl VariableLookup for HashMap<VariableId, Variable> {
    fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.get(id)
    }
}

/// Options for rendering documents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render single-line JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

/// One rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExportedFile {
    pub file_name: String,
    pub body: String,
}

/// File name for a (collection, mode) document.
pub fn file_name(collection: &str, mode: &str) -> String {
    format!("{collection}.{mode}.tokens.json")
}

/// Render a literal as a `$value`.
pub fn render_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Color(color) => Value::String(format_color(color)),
        Literal::Number(n) => number_value(*n),
    }
}

/// Integral floats render as JSON integers.
fn number_value(n: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Flatten a resolution table into a nested token document.
///
/// Entries whose path collides with another entry are skipped with a warning.
pub fn flatten_table(table: &ResolutionTable) -> Value {
    let mut builder = DocumentBuilder::new();
    for (name, token) in table {
        let value = match &token.value {
            ResolvedValue::Literal(literal) => render_literal(literal),
            ResolvedValue::Reference(target) => Value::String(target.to_alias()),
        };
        if let Err(err) = builder.insert(name.as_str(), token.kind, value) {
            tracing::warn!(error = %err, "token skipped during flatten");
        }
    }
    builder.build()
}

/// Render one collection in one mode.
pub fn flatten_collection(
    collection: &Collection,
    mode: &Mode,
    lookup: &impl VariableLookup,
) -> Value {
    let mut builder = DocumentBuilder::new();

    for id in &collection.variable_ids {
        let Some(variable) = lookup.variable(id) else {
            tracing::warn!(variable = %id, collection = %collection.name, "variable not found");
            continue;
        };
        let Some(kind) = variable.kind.token_kind() else {
            tracing::debug!(variable = %variable.name, kind = ?variable.kind, "unsupported kind skipped");
            continue;
        };
        let Some(value) = variable.values_by_mode.get(&mode.id) else {
            continue;
        };

        let rendered = match value {
            VariableValue::Color(color) => Value::String(format_color(color)),
            VariableValue::Float(n) => number_value(*n),
            VariableValue::Alias(target_id) => match lookup.variable(target_id) {
                Some(target) => Value::String(TokenName::new(target.name.as_str()).to_alias()),
                None => {
                    let err = ExportError::UnknownAliasTarget {
                        variable: variable.name.clone(),
                        target: target_id.to_string(),
                    };
                    tracing::warn!(error = %err, "alias skipped");
                    continue;
                }
            },
            VariableValue::String(_) | VariableValue::Boolean(_) => {
                tracing::debug!(variable = %variable.name, "value of unsupported kind skipped");
                continue;
            }
        };

        if let Err(err) = builder.insert(&variable.name, kind, rendered) {
            tracing::warn!(error = %err, "variable skipped during export");
        }
    }

    builder.build()
}

/// Render every mode of a collection as its own file.
pub fn export_collection(
    collection: &Collection,
    lookup: &impl VariableLookup,
    options: &ExportOptions,
) -> Result<Vec<ExportedFile>, ExportError> {
    collection
        .modes
        .iter()
        .map(|mode| {
            let file_name = file_name(&collection.name, &mode.name);
            let doc = flatten_collection(collection, mode, lookup);
            let body = render(&doc, options).map_err(|e| ExportError::Serialize {
                file_name: file_name.clone(),
                reason: e.to_string(),
            })?;
            Ok(ExportedFile { file_name, body })
        })
        .collect()
}

fn render(doc: &Value, options: &ExportOptions) -> serde_json::Result<String> {
    if options.pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    }
}
