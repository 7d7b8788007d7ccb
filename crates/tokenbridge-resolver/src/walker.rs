//! Token tree walking.
//!
//! Descends a nested token document depth-first and classifies every leaf as
//! a literal or an alias. Keys starting with `$` are metadata: they are never
//! children, and a node is a leaf exactly when it carries `$value`.

use crate::options::{DuplicatePolicy, ResolveOptions};
use crate::outcome::{LeafStatus, SkipReason};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use tokenbridge_color::parse_color;
use tokenbridge_core::{
    is_alias, ColorFormatError, DocumentError, Literal, TokenError, TokenKind, TokenName,
};

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";
const METADATA_SIGIL: char = '$';

/// A classified leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Literal(Literal),
    Alias(TokenName),
}

/// A leaf that survived classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Position in document order.
    pub position: usize,
    /// Declared or inherited kind. Aliases may leave this open.
    pub kind: Option<TokenKind>,
    pub value: LeafValue,
}

/// A leaf that was skipped or failed during the walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub position: usize,
    pub name: TokenName,
    pub status: LeafStatus,
}

/// Everything the walk found.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    /// Accepted leaves keyed by token name, in first-seen order.
    pub leaves: IndexMap<TokenName, Leaf>,
    pub rejected: Vec<Rejected>,
}

/// Walk a parsed token document.
pub fn walk_document(doc: &Value, options: &ResolveOptions) -> Result<WalkOutput, DocumentError> {
    let root = doc.as_object().ok_or_else(|| DocumentError::MalformedDocument {
        reason: format!("expected a top-level object, found {}", json_type(doc)),
    })?;

    let mut walker = Walker::new(options);
    walker.walk_group(root, None);
    Ok(walker.output)
}

struct Walker<'a> {
    options: &'a ResolveOptions,
    path: SmallVec<[&'a str; 8]>,
    position: usize,
    output: WalkOutput,
}

impl<'a> Walker<'a> {
    fn new(options: &'a ResolveOptions) -> Self {
        Self {
            options,
            path: SmallVec::new(),
            position: 0,
            output: WalkOutput::default(),
        }
    }

    fn walk_group(&mut self, group: &'a Map<String, Value>, inherited: Option<&'a str>) {
        let type_tag = group.get(TYPE_KEY).and_then(Value::as_str).or(inherited);

        for (key, child) in group {
            if key.starts_with(METADATA_SIGIL) {
                continue;
            }
            self.path.push(key);
            self.walk_node(child, type_tag);
            self.path.pop();
        }
    }

    fn walk_node(&mut self, node: &'a Value, inherited: Option<&'a str>) {
        let Some(map) = node.as_object() else {
            self.reject(LeafStatus::Failed(TokenError::MalformedNode {
                reason: format!("expected an object, found {}", json_type(node)),
            }));
            return;
        };

        if let Some(value) = map.get(VALUE_KEY) {
            let type_tag = map.get(TYPE_KEY).and_then(Value::as_str).or(inherited);
            self.visit_leaf(value, type_tag);
        } else if map.keys().any(|k| !k.starts_with(METADATA_SIGIL)) {
            self.walk_group(map, inherited);
        } else {
            self.reject(LeafStatus::Failed(TokenError::MalformedNode {
                reason: "no $value and no child tokens".to_string(),
            }));
        }
    }

    fn visit_leaf(&mut self, raw: &Value, type_tag: Option<&str>) {
        let kind = match type_tag {
            Some(tag) => match TokenKind::from_type_tag(tag) {
                Some(kind) => Some(kind),
                None => {
                    self.reject(LeafStatus::Skipped(SkipReason::UnsupportedKind {
                        kind: tag.to_string(),
                    }));
                    return;
                }
            },
            None => None,
        };

        if let Some(text) = raw.as_str().filter(|s| is_alias(s)) {
            match TokenName::from_alias(text) {
                Some(target) => self.accept(kind, LeafValue::Alias(target)),
                None => self.reject(LeafStatus::Failed(TokenError::MalformedNode {
                    reason: format!("empty alias reference {text:?}"),
                })),
            }
            return;
        }

        let Some(kind) = kind else {
            self.reject(LeafStatus::Skipped(SkipReason::MissingType));
            return;
        };

        match parse_literal(kind, raw) {
            Ok(literal) => self.accept(Some(kind), LeafValue::Literal(literal)),
            Err(err) => self.reject(LeafStatus::Failed(err)),
        }
    }

    fn accept(&mut self, kind: Option<TokenKind>, value: LeafValue) {
        let name = self.current_name();
        let position = self.next_position();

        if let Some(earlier) = self.output.leaves.get(&name) {
            match self.options.on_duplicate {
                DuplicatePolicy::Error => {
                    tracing::warn!(token = %name, "duplicate token name rejected");
                    self.output.rejected.push(Rejected {
                        position,
                        status: LeafStatus::Failed(TokenError::DuplicateToken { name: name.clone() }),
                        name,
                    });
                    return;
                }
                DuplicatePolicy::Overwrite => {
                    tracing::debug!(token = %name, "duplicate token name overwrites earlier leaf");
                    self.output.rejected.push(Rejected {
                        position: earlier.position,
                        name: name.clone(),
                        status: LeafStatus::Skipped(SkipReason::Overwritten),
                    });
                }
            }
        }

        self.output.leaves.insert(name, Leaf { position, kind, value });
    }

    fn reject(&mut self, status: LeafStatus) {
        let name = self.current_name();
        let position = self.next_position();
        match &status {
            LeafStatus::Skipped(reason) => tracing::warn!(token = %name, %reason, "token skipped"),
            LeafStatus::Failed(err) => tracing::warn!(token = %name, error = %err, "token failed"),
            _ => {}
        }
        self.output.rejected.push(Rejected { position, name, status });
    }

    fn current_name(&self) -> TokenName {
        TokenName::from_segments(self.path.iter())
    }

    fn next_position(&mut self) -> usize {
        let position = self.position;
        self.position += 1;
        position
    }
}

/// Convert a non-alias `$value` of a known kind.
fn parse_literal(kind: TokenKind, raw: &Value) -> Result<Literal, TokenError> {
    match kind {
        TokenKind::Color => {
            let color = match raw {
                Value::String(text) => parse_color(text)?,
                // `{"r": .., "g": .., "b": ..}` objects use the float-object syntax.
                Value::Object(_) => parse_color(&raw.to_string())?,
                other => {
                    return Err(ColorFormatError::Unrecognized {
                        input: other.to_string(),
                    }
                    .into())
                }
            };
            Ok(Literal::Color(color))
        }
        TokenKind::Number => {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
                _ => None,
            };
            number.map(Literal::Number).ok_or_else(|| TokenError::InvalidNumber {
                value: raw.to_string(),
            })
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn walk(doc: Value) -> WalkOutput {
        walk_document(&doc, &ResolveOptions::default()).unwrap()
    }

    fn names(output: &WalkOutput) -> Vec<&str> {
        output.leaves.keys().map(TokenName::as_str).collect()
    }

    #[test]
    fn test_nested_names_and_inherited_type() {
        let output = walk(json!({
            "color": {
                "$type": "color",
                "brand": {
                    "primary": { "$value": "#0066cc" }
                }
            },
            "space": {
                "md": { "$type": "number", "$value": 16 }
            }
        }));

        assert_eq!(names(&output), vec!["color/brand/primary", "space/md"]);
        let primary = &output.leaves[&TokenName::new("color/brand/primary")];
        assert_eq!(primary.kind, Some(TokenKind::Color));
        assert!(output.rejected.is_empty());
    }

    #[test]
    fn test_metadata_keys_do_not_make_groups() {
        let output = walk(json!({
            "size": {
                "$type": "number",
                "$description": "sizes",
                "sm": {
                    "$value": 4,
                    "$extensions": { "com.example": { "note": "x" } }
                }
            }
        }));

        assert_eq!(names(&output), vec!["size/sm"]);
        assert!(output.rejected.is_empty());
    }

    #[test]
    fn test_alias_classified_and_normalized() {
        let output = walk(json!({
            "color": {
                "$type": "color",
                "redAlias": { "$value": " {color.red} " }
            }
        }));

        let leaf = &output.leaves[&TokenName::new("color/redAlias")];
        assert_eq!(leaf.value, LeafValue::Alias(TokenName::new("color/red")));
    }

    #[test]
    fn test_colon_in_alias_target_is_still_alias() {
        let output = walk(json!({
            "gutter": { "$type": "number", "$value": "{bp.sm:min}" }
        }));

        assert!(output.rejected.is_empty());
        assert_eq!(
            output.leaves[&TokenName::new("gutter")].value,
            LeafValue::Alias(TokenName::new("bp/sm:min"))
        );
    }

    #[test]
    fn test_unsupported_kind_skipped_siblings_kept() {
        let output = walk(json!({
            "font": { "$type": "typography", "$value": { "fontFamily": "Inter" } },
            "gap": { "$type": "number", "$value": 8 }
        }));

        assert_eq!(names(&output), vec!["gap"]);
        assert_eq!(output.rejected.len(), 1);
        assert_eq!(
            output.rejected[0].status,
            LeafStatus::Skipped(SkipReason::UnsupportedKind {
                kind: "typography".to_string()
            })
        );
    }

    #[test]
    fn test_bad_color_fails_only_that_leaf() {
        let output = walk(json!({
            "$type": "color",
            "bad": { "$value": "not-a-color" },
            "good": { "$value": "#fff" }
        }));

        assert_eq!(names(&output), vec!["good"]);
        assert!(matches!(
            output.rejected[0].status,
            LeafStatus::Failed(TokenError::ColorFormat(_))
        ));
    }

    #[test]
    fn test_malformed_nodes() {
        let output = walk(json!({
            "loose": 5,
            "empty": { "$type": "color" }
        }));

        assert!(output.leaves.is_empty());
        assert_eq!(output.rejected.len(), 2);
        assert!(output
            .rejected
            .iter()
            .all(|r| matches!(r.status, LeafStatus::Failed(TokenError::MalformedNode { .. }))));
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = walk_document(&json!([1, 2]), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedDocument { .. }));
    }

    #[test]
    fn test_numeric_strings_and_color_objects() {
        let output = walk(json!({
            "n": { "$type": "number", "$value": " 1.5 " },
            "c": { "$type": "color", "$value": { "r": 1, "g": 0, "b": 0, "a": 0.5 } }
        }));

        assert_eq!(
            output.leaves[&TokenName::new("n")].value,
            LeafValue::Literal(Literal::Number(1.5))
        );
        let LeafValue::Literal(Literal::Color(c)) = output.leaves[&TokenName::new("c")].value else {
            panic!("Expected color literal");
        };
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn test_duplicate_policy() {
        let doc = json!({
            "a": { "b": { "$type": "number", "$value": 1 } },
            "a/b": { "$type": "number", "$value": 2 }
        });

        let output = walk(doc.clone());
        assert_eq!(
            output.leaves[&TokenName::new("a/b")].value,
            LeafValue::Literal(Literal::Number(2.0))
        );
        assert_eq!(output.rejected.len(), 1);
        assert_eq!(output.rejected[0].position, 0);
        assert_eq!(
            output.rejected[0].status,
            LeafStatus::Skipped(SkipReason::Overwritten)
        );

        let strict = ResolveOptions::new().with_duplicate_policy(DuplicatePolicy::Error);
        let output = walk_document(&doc, &strict).unwrap();
        assert_eq!(
            output.leaves[&TokenName::new("a/b")].value,
            LeafValue::Literal(Literal::Number(1.0))
        );
        assert!(matches!(
            output.rejected[0].status,
            LeafStatus::Failed(TokenError::DuplicateToken { .. })
        ));
    }
}
