//! Per-leaf outcomes and the batch report.

use std::fmt;
use tokenbridge_core::{ResolutionTable, TokenError, TokenName, UnresolvedAlias, UnresolvedCause};

/// Why a leaf was left out without being an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "reason", rename_all = "camelCase"))]
pub enum SkipReason {
    /// `$type` names a kind other than color or number.
    UnsupportedKind { kind: String },
    /// A literal leaf with no `$type` on itself or any ancestor.
    MissingType,
    /// A later leaf with the same name replaced this one.
    Overwritten,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedKind { kind } => write!(f, "unsupported kind {kind:?}"),
            SkipReason::MissingType => f.write_str("no $type"),
            SkipReason::Overwritten => f.write_str("overwritten by a later token"),
        }
    }
}

/// What happened to one leaf.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LeafStatus {
    Resolved,
    Skipped(SkipReason),
    Failed(TokenError),
    Unresolved(UnresolvedCause),
}

/// The outcome for a single leaf, in document order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafOutcome {
    pub name: TokenName,
    pub status: LeafStatus,
}

/// Result of resolving one document.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveReport {
    /// Every resolved token.
    pub table: ResolutionTable,
    /// One outcome per leaf encountered.
    pub outcomes: Vec<LeafOutcome>,
    /// Aliases still pending when resolution stopped.
    pub unresolved: Vec<UnresolvedAlias>,
    /// Resolution passes executed over the pending aliases.
    pub passes: usize,
}

impl ResolveReport {
    pub fn resolved_count(&self) -> usize {
        self.table.len()
    }

    /// Whether every leaf resolved.
    pub fn is_complete(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.status, LeafStatus::Resolved))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&TokenName, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            LeafStatus::Skipped(reason) => Some((&o.name, reason)),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&TokenName, &TokenError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            LeafStatus::Failed(err) => Some((&o.name, err)),
            _ => None,
        })
    }

    pub fn outcome(&self, name: &str) -> Option<&LeafStatus> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| o.name.as_str() == name)
            .map(|o| &o.status)
    }
}
