//! Nested document construction.

use serde_json::{Map, Value};
use tokenbridge_core::{ExportError, TokenKind, NAME_SEPARATOR};

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";

/// Rebuilds a nested token document from slash-delimited names.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    root: Map<String, Value>,
    leaves: usize,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a leaf at `name`, creating intermediate groups on demand.
    ///
    /// Fails when the path runs through an existing leaf, or when the leaf
    /// would replace a group that already has children.
    pub fn insert(&mut self, name: &str, kind: TokenKind, value: Value) -> Result<(), ExportError> {
        let segments: Vec<&str> = name.split(NAME_SEPARATOR).collect();
        let Some((leaf, groups)) = segments.split_last() else {
            return Ok(());
        };

        let mut node = &mut self.root;
        for (depth, segment) in groups.iter().enumerate() {
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match child {
                Value::Object(map) if !map.contains_key(VALUE_KEY) => map,
                _ => {
                    return Err(ExportError::PathConflict {
                        name: name.to_string(),
                        existing: segments[..=depth].join("/"),
                    })
                }
            };
        }

        if let Some(Value::Object(existing)) = node.get(*leaf) {
            if !existing.contains_key(VALUE_KEY) && existing.keys().any(|k| !k.starts_with('$')) {
                return Err(ExportError::PathConflict {
                    name: name.to_string(),
                    existing: name.to_string(),
                });
            }
        }

        let mut token = Map::new();
        token.insert(TYPE_KEY.to_string(), Value::String(kind.type_tag().to_string()));
        token.insert(VALUE_KEY.to_string(), value);
        let replaced = node.insert(leaf.to_string(), Value::Object(token));
        if !matches!(&replaced, Some(Value::Object(old)) if old.contains_key(VALUE_KEY)) {
            self.leaves += 1;
        }
        Ok(())
    }

    /// Number of distinct leaves in the document.
    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    pub fn build(self) -> Value {
        Value::Object(self.root)
    }
}
