//! Alias resolution.
//!
//! Aliases may point at other aliases, or at leaves that appear later in the
//! document. Pending aliases are resolved by bounded fixed-point iteration:
//! each pass walks the worklist in first-seen order and promotes every alias
//! whose target is already in the table. The pass budget equals the number of
//! pending aliases, and a pass that promotes nothing ends the loop, so cyclic
//! or dangling references always terminate.

use indexmap::IndexMap;
use tokenbridge_core::{
    ResolutionTable, ResolvedToken, TokenError, TokenKind, TokenName, UnresolvedAlias,
    UnresolvedCause,
};

/// An alias waiting for its target.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAlias {
    pub target: TokenName,
    /// Declared kind; `None` adopts the target's kind.
    pub kind: Option<TokenKind>,
}

/// Ordered worklist of pending aliases, keyed by the alias's own name.
#[derive(Debug, Clone, Default)]
pub struct PendingAliases {
    edges: IndexMap<TokenName, PendingAlias>,
}

impl PendingAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: TokenName, alias: PendingAlias) {
        self.edges.insert(name, alias);
    }

    pub fn get(&self, name: &TokenName) -> Option<&PendingAlias> {
        self.edges.get(name)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Result of one attempt to resolve an alias.
#[derive(Debug)]
pub(crate) enum Step {
    Resolved,
    Waiting,
    Failed(TokenError),
}

/// Try to resolve `name` against the table, inserting it on success.
pub(crate) fn try_resolve(
    table: &mut ResolutionTable,
    name: &TokenName,
    alias: &PendingAlias,
) -> Step {
    let Some(target) = table.get(&alias.target) else {
        return Step::Waiting;
    };

    let kind = match alias.kind {
        Some(kind) if kind != target.kind => {
            return Step::Failed(TokenError::KindMismatch {
                alias_kind: kind,
                target: alias.target.clone(),
                target_kind: target.kind,
            });
        }
        Some(kind) => kind,
        None => target.kind,
    };

    table.insert(name.clone(), ResolvedToken::reference(kind, alias.target.clone()));
    Step::Resolved
}

/// Outcome of running the resolver over a worklist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasResolution {
    /// Passes executed.
    pub passes: usize,
    /// Aliases that failed for a reason other than a missing target.
    pub failed: Vec<(TokenName, TokenError)>,
    /// Aliases left pending, in first-seen order.
    pub unresolved: Vec<UnresolvedAlias>,
}

/// Resolve pending aliases into the table.
pub fn resolve_aliases(table: &mut ResolutionTable, mut pending: PendingAliases) -> AliasResolution {
    let mut resolution = AliasResolution::default();
    let mut budget = pending.len();

    while !pending.is_empty() && budget > 0 {
        let before = pending.len();
        resolution.passes += 1;

        let failed = &mut resolution.failed;
        pending.edges.retain(|name, alias| match try_resolve(table, name, alias) {
            Step::Resolved => false,
            Step::Waiting => true,
            Step::Failed(err) => {
                tracing::warn!(token = %name, error = %err, "alias failed");
                failed.push((name.clone(), err));
                false
            }
        });

        tracing::debug!(
            pass = resolution.passes,
            resolved = before - pending.len(),
            remaining = pending.len(),
            "alias resolution pass"
        );

        if pending.len() == before {
            break;
        }
        budget -= 1;
    }

    resolution.unresolved = pending
        .edges
        .iter()
        .map(|(name, alias)| {
            let unresolved = UnresolvedAlias {
                name: name.clone(),
                target: alias.target.clone(),
                cause: classify(name, &pending),
            };
            tracing::warn!(error = %unresolved, "alias left unresolved");
            unresolved
        })
        .collect();

    resolution
}

/// Follow an unresolved alias through the worklist to explain why it stuck.
///
/// Reaching a name outside the worklist means the chain ends at a missing
/// target; revisiting a name means the chain is circular.
fn classify(name: &TokenName, pending: &PendingAliases) -> UnresolvedCause {
    let mut chain = vec![name.clone()];
    let mut current = match pending.get(name) {
        Some(alias) => &alias.target,
        None => return UnresolvedCause::MissingTarget { missing: name.clone() },
    };

    loop {
        if let Some(start) = chain.iter().position(|seen| seen == current) {
            let mut cycle = chain.split_off(start);
            cycle.push(current.clone());
            return UnresolvedCause::Circular { cycle };
        }
        match pending.get(current) {
            Some(next) => {
                chain.push(current.clone());
                current = &next.target;
            }
            None => {
                return UnresolvedCause::MissingTarget {
                    missing: current.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tokenbridge_core::Literal;

    fn alias(target: &str) -> PendingAlias {
        PendingAlias {
            target: target.into(),
            kind: None,
        }
    }

    fn number_table(entries: &[(&str, f64)]) -> ResolutionTable {
        entries
            .iter()
            .map(|(name, n)| (TokenName::from(*name), ResolvedToken::literal(Literal::Number(*n))))
            .collect()
    }

    #[test]
    fn test_chain_resolves_to_one_terminal() {
        let mut table = number_table(&[("c", 3.0)]);
        let mut pending = PendingAliases::new();
        pending.push("a".into(), alias("b"));
        pending.push("b".into(), alias("c"));

        let resolution = resolve_aliases(&mut table, pending);

        assert!(resolution.unresolved.is_empty());
        assert!(resolution.passes <= 3);
        for name in ["a", "b", "c"] {
            assert_eq!(table.terminal(&name.into()), Some(&Literal::Number(3.0)));
        }
        assert_eq!(table.get(&"a".into()).unwrap().as_reference(), Some(&"b".into()));
    }

    #[test]
    fn test_cycle_terminates_and_reports_both() {
        let mut table = ResolutionTable::new();
        let mut pending = PendingAliases::new();
        pending.push("a".into(), alias("b"));
        pending.push("b".into(), alias("a"));

        let resolution = resolve_aliases(&mut table, pending);

        assert!(table.is_empty());
        assert!(resolution.passes <= 2);
        assert_eq!(resolution.unresolved.len(), 2);
        assert_eq!(
            resolution.unresolved[0].cause,
            UnresolvedCause::Circular {
                cycle: vec!["a".into(), "b".into(), "a".into()]
            }
        );
        assert_eq!(
            resolution.unresolved[1].cause,
            UnresolvedCause::Circular {
                cycle: vec!["b".into(), "a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn test_missing_target_distinct_from_cycle() {
        let mut table = ResolutionTable::new();
        let mut pending = PendingAliases::new();
        pending.push("a".into(), alias("b"));
        pending.push("b".into(), alias("nowhere"));

        let resolution = resolve_aliases(&mut table, pending);

        for unresolved in &resolution.unresolved {
            assert_eq!(
                unresolved.cause,
                UnresolvedCause::MissingTarget {
                    missing: "nowhere".into()
                }
            );
        }
    }

    #[test]
    fn test_self_alias_is_circular() {
        let mut table = ResolutionTable::new();
        let mut pending = PendingAliases::new();
        pending.push("a".into(), alias("a"));

        let resolution = resolve_aliases(&mut table, pending);
        assert!(matches!(
            resolution.unresolved[0].cause,
            UnresolvedCause::Circular { .. }
        ));
    }

    #[test]
    fn test_empty_worklist_is_noop() {
        let mut table = number_table(&[("x", 1.0)]);
        let before = table.clone();

        let resolution = resolve_aliases(&mut table, PendingAliases::new());

        assert_eq!(resolution, AliasResolution::default());
        assert_eq!(table, before);
    }

    #[test]
    fn test_kind_mismatch_fails_alias() {
        let mut table = number_table(&[("n", 1.0)]);
        let mut pending = PendingAliases::new();
        pending.push(
            "c".into(),
            PendingAlias {
                target: "n".into(),
                kind: Some(TokenKind::Color),
            },
        );

        let resolution = resolve_aliases(&mut table, pending);

        assert!(!table.contains(&"c".into()));
        assert!(matches!(
            resolution.failed[0].1,
            TokenError::KindMismatch { .. }
        ));
    }

    #[test]
    fn test_reverse_order_chain_needs_one_pass_per_link() {
        let mut table = number_table(&[("t", 0.0)]);
        let mut pending = PendingAliases::new();
        // Worst case: each alias is seen before the alias it points at.
        for i in 0..5 {
            let target = if i == 4 { "t".to_string() } else { format!("a{}", i + 1) };
            pending.push(format!("a{i}").into(), alias(&target));
        }

        let resolution = resolve_aliases(&mut table, pending);

        assert!(resolution.unresolved.is_empty());
        assert_eq!(resolution.passes, 5);
    }

    proptest! {
        #[test]
        fn random_graphs_terminate_within_budget(edges in proptest::collection::vec((0usize..8, 0usize..10), 0..8)) {
            let mut table = number_table(&[("n8", 1.0), ("n9", 2.0)]);
            let mut pending = PendingAliases::new();
            for (from, to) in &edges {
                pending.push(format!("n{from}").into(), alias(&format!("n{to}")));
            }
            let size = pending.len();

            let resolution = resolve_aliases(&mut table, pending);

            prop_assert!(resolution.passes <= size);
            prop_assert_eq!(
                table.len() - 2 + resolution.unresolved.len() + resolution.failed.len(),
                size
            );
            for (name, _) in table.iter() {
                prop_assert!(table.terminal(name).is_some());
            }
        }
    }
}
