//! Host variable model.
//!
//! Mirrors what a design tool's variable storage exposes: collections with
//! ordered modes, and typed variables holding one value per mode.

use crate::types::{Color, TokenKind};
use indexmap::IndexMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Stable identifier of a variable.
    VariableId
);
string_id!(
    /// Stable identifier of a variable collection.
    CollectionId
);
string_id!(
    /// Stable identifier of a mode within a collection.
    ModeId
);

/// Resolved type of a host variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum VariableKind {
    Color,
    Float,
    String,
    Boolean,
}

impl VariableKind {
    /// The token kind this variable exports as, if any.
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            VariableKind::Color => Some(TokenKind::Color),
            VariableKind::Float => Some(TokenKind::Number),
            VariableKind::String | VariableKind::Boolean => None,
        }
    }
}

impl From<TokenKind> for VariableKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Color => VariableKind::Color,
            TokenKind::Number => VariableKind::Float,
        }
    }
}

/// A variable's value in one mode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum VariableValue {
    Color(Color),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Points at another variable.
    Alias(VariableId),
}

/// A named mode of a collection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

/// A collection of variables sharing a set of modes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    pub variable_ids: Vec<VariableId>,
}

impl Collection {
    pub fn default_mode(&self) -> Option<&Mode> {
        self.modes.first()
    }

    pub fn mode_by_name(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }
}

/// A typed variable. Its name is a slash-delimited path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub kind: VariableKind,
    pub collection_id: CollectionId,
    pub values_by_mode: IndexMap<ModeId, VariableValue>,
}
