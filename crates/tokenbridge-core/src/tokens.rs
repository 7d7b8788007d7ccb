//! Resolved token values and the resolution table.

use crate::name::TokenName;
use crate::types::{Literal, TokenKind};
use indexmap::IndexMap;

/// A terminal token value: a literal, or a reference to another table entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResolvedValue {
    Literal(Literal),
    Reference(TokenName),
}

/// A resolved token value together with its kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedToken {
    pub kind: TokenKind,
    pub value: ResolvedValue,
}

impl ResolvedToken {
    pub fn literal(literal: Literal) -> Self {
        Self {
            kind: literal.kind(),
            value: ResolvedValue::Literal(literal),
        }
    }

    pub fn reference(kind: TokenKind, target: TokenName) -> Self {
        Self {
            kind,
            value: ResolvedValue::Reference(target),
        }
    }

    pub fn as_reference(&self) -> Option<&TokenName> {
        match &self.value {
            ResolvedValue::Reference(t) => Some(t),
            ResolvedValue::Literal(_) => None,
        }
    }
}

/// Mapping from token name to resolved token.
///
/// Entries keep insertion order. In tables built by the resolver a reference
/// only ever points at an entry inserted before it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResolutionTable {
    tokens: IndexMap<TokenName, ResolvedToken>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, returning the entry it replaced.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, name: TokenName, token: ResolvedToken) -> Option<ResolvedToken> {
        self.tokens.insert(name, token)
    }

    pub fn get(&self, name: &TokenName) -> Option<&ResolvedToken> {
        self.tokens.get(name)
    }

    pub fn contains(&self, name: &TokenName) -> bool {
        self.tokens.contains_key(name)
    }

    /// Follow references from `name` down to the literal they stand for.
    pub fn terminal(&self, name: &TokenName) -> Option<&Literal> {
        let mut current = name;
        // A well-formed table has no cycles, but never walk more hops than entries.
        for _ in 0..=self.tokens.len() {
            match &self.tokens.get(current)?.value {
                ResolvedValue::Literal(l) => return Some(l),
                ResolvedValue::Reference(next) => current = next,
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenName, &ResolvedToken)> {
        self.tokens.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &TokenName> {
        self.tokens.keys()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolutionTable {
    type Item = (&'a TokenName, &'a ResolvedToken);
    type IntoIter = indexmap::map::Iter<'a, TokenName, ResolvedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<(TokenName, ResolvedToken)> for ResolutionTable {
    fn from_iter<I: IntoIterator<Item = (TokenName, ResolvedToken)>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
