//! Token tree walking and alias resolution.
//!
//! This crate turns a nested design-token document into a flat
//! [`ResolutionTable`]:
//! - The walker classifies every leaf as a literal or an alias
//! - Literals go straight into the table
//! - Aliases resolve inline when their target is already known, otherwise
//!   they wait in an ordered worklist for the bounded multi-pass resolver
//!
//! Nothing is dropped silently: every leaf gets an outcome in the returned
//! [`ResolveReport`], and aliases that never resolve are listed with the
//! reason (missing target or cycle).
//!
//! # Example
//!
//! ```
//! use tokenbridge_resolver::{resolve_document, ResolveOptions};
//!
//! let body = r##"{"color": {"$type": "color",
//!     "red": {"$value": "#ff0000"},
//!     "redAlias": {"$value": "{color.red}"}}}"##;
//! let report = resolve_document(body, &ResolveOptions::default()).unwrap();
//! assert_eq!(report.resolved_count(), 2);
//! ```

mod alias;
mod options;
mod outcome;
mod walker;

pub use alias::{resolve_aliases, AliasResolution, PendingAlias, PendingAliases};
pub use options::{DuplicatePolicy, ResolveOptions};
pub use outcome::{LeafOutcome, LeafStatus, ResolveReport, SkipReason};
pub use walker::{walk_document, Leaf, LeafValue, Rejected, WalkOutput};

use alias::{try_resolve, Step};
use std::collections::HashMap;
use tokenbridge_core::{DocumentError, ResolutionTable, ResolvedToken, TokenName};

/// Resolve a token document from its JSON text.
pub fn resolve_document(body: &str, options: &ResolveOptions) -> Result<ResolveReport, DocumentError> {
    let doc: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DocumentError::MalformedDocument {
            reason: e.to_string(),
        })?;
    resolve_value(&doc, options)
}

/// Resolve an already-parsed token document.
pub fn resolve_value(
    doc: &serde_json::Value,
    options: &ResolveOptions,
) -> Result<ResolveReport, DocumentError> {
    let walked = walk_document(doc, options)?;
    Ok(resolve_walked(walked))
}

/// Resolve the leaves produced by a walk.
pub fn resolve_walked(walked: WalkOutput) -> ResolveReport {
    let WalkOutput { leaves, rejected } = walked;
    let mut table = ResolutionTable::new();
    let mut pending = PendingAliases::new();
    let mut failed = HashMap::new();

    for (name, leaf) in &leaves {
        match &leaf.value {
            LeafValue::Literal(literal) => {
                table.insert(name.clone(), ResolvedToken::literal(*literal));
            }
            LeafValue::Alias(target) => {
                let alias = PendingAlias {
                    target: target.clone(),
                    kind: leaf.kind,
                };
                match try_resolve(&mut table, name, &alias) {
                    Step::Resolved => {}
                    Step::Waiting => pending.push(name.clone(), alias),
                    Step::Failed(err) => {
                        tracing::warn!(token = %name, error = %err, "alias failed");
                        failed.insert(name.clone(), err);
                    }
                }
            }
        }
    }

    tracing::debug!(
        literals = table.len(),
        pending = pending.len(),
        "walk complete"
    );

    let resolution = resolve_aliases(&mut table, pending);
    failed.extend(resolution.failed);
    let unresolved: HashMap<&TokenName, _> = resolution
        .unresolved
        .iter()
        .map(|u| (&u.name, &u.cause))
        .collect();

    let mut positioned: Vec<(usize, LeafOutcome)> = leaves
        .iter()
        .map(|(name, leaf)| {
            let status = if let Some(err) = failed.remove(name) {
                LeafStatus::Failed(err)
            } else if let Some(cause) = unresolved.get(name) {
                LeafStatus::Unresolved((*cause).clone())
            } else {
                LeafStatus::Resolved
            };
            (
                leaf.position,
                LeafOutcome {
                    name: name.clone(),
                    status,
                },
            )
        })
        .chain(rejected.into_iter().map(|r| {
            (
                r.position,
                LeafOutcome {
                    name: r.name,
                    status: r.status,
                },
            )
        }))
        .collect();
    positioned.sort_by_key(|(position, _)| *position);

    ResolveReport {
        outcomes: positioned.into_iter().map(|(_, outcome)| outcome).collect(),
        table,
        unresolved: resolution.unresolved,
        passes: resolution.passes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokenbridge_core::{Color, Literal, ResolvedValue, TokenError, UnresolvedCause};

    fn resolve(doc: serde_json::Value) -> ResolveReport {
        resolve_value(&doc, &ResolveOptions::default()).unwrap()
    }

    #[test]
    fn test_red_alias_scenario() {
        let report = resolve_document(
            r##"{"color":{"$type":"color","red":{"$value":"#ff0000"},"redAlias":{"$value":"{color.red}"}}}"##,
            &ResolveOptions::default(),
        )
        .unwrap();

        let red = report.table.get(&"color/red".into()).unwrap();
        assert_eq!(red.value, ResolvedValue::Literal(Literal::Color(Color::rgb(1.0, 0.0, 0.0))));
        let alias = report.table.get(&"color/redAlias".into()).unwrap();
        assert_eq!(alias.value, ResolvedValue::Reference("color/red".into()));
        assert_eq!(report.passes, 0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_forward_reference_chain() {
        let report = resolve(json!({
            "$type": "number",
            "a": { "$value": "{b}" },
            "b": { "$value": "{c}" },
            "c": { "$value": 12 }
        }));

        assert!(report.unresolved.is_empty());
        assert!(report.passes <= 3);
        for name in ["a", "b", "c"] {
            assert_eq!(report.table.terminal(&name.into()), Some(&Literal::Number(12.0)));
        }
        let order: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_reported_not_dropped() {
        let report = resolve(json!({
            "$type": "color",
            "a": { "$value": "{b}" },
            "b": { "$value": "{a}" },
            "ok": { "$value": "#000" }
        }));

        assert_eq!(report.resolved_count(), 1);
        assert_eq!(report.unresolved.len(), 2);
        assert!(matches!(
            report.outcome("a"),
            Some(LeafStatus::Unresolved(UnresolvedCause::Circular { .. }))
        ));
        assert_eq!(report.outcome("ok"), Some(&LeafStatus::Resolved));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_untyped_alias_adopts_target_kind() {
        let report = resolve(json!({
            "base": { "$type": "number", "$value": 4 },
            "alias": { "$value": "{base}" }
        }));

        let alias = report.table.get(&"alias".into()).unwrap();
        assert_eq!(alias.kind, tokenbridge_core::TokenKind::Number);
    }

    #[test]
    fn test_inline_kind_mismatch_is_failed_outcome() {
        let report = resolve(json!({
            "base": { "$type": "number", "$value": 4 },
            "alias": { "$type": "color", "$value": "{base}" }
        }));

        assert!(matches!(
            report.outcome("alias"),
            Some(LeafStatus::Failed(TokenError::KindMismatch { .. }))
        ));
        assert_eq!(report.failed().count(), 1);
    }

    #[test]
    fn test_invalid_json_is_malformed_document() {
        let err = resolve_document("{not json", &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedDocument { .. }));
    }

    #[test]
    fn test_typography_skipped_without_aborting() {
        let report = resolve(json!({
            "type": { "$type": "typography", "$value": "Inter 16" },
            "space": { "$type": "number", "$value": 8 }
        }));

        assert_eq!(report.resolved_count(), 1);
        assert!(!report.table.contains(&"type".into()));
        assert_eq!(report.skipped().count(), 1);
    }

    #[test]
    fn test_overwritten_leaf_keeps_its_outcome() {
        let report = resolve(json!({
            "a": { "b": { "$type": "number", "$value": 1 } },
            "a/b": { "$type": "number", "$value": 2 }
        }));

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].status, LeafStatus::Skipped(SkipReason::Overwritten));
        assert_eq!(report.outcomes[1].status, LeafStatus::Resolved);
        assert_eq!(report.outcome("a/b"), Some(&LeafStatus::Resolved));
        assert_eq!(report.table.terminal(&"a/b".into()), Some(&Literal::Number(2.0)));
    }
}
