//! Error types for tokenbridge.

use crate::name::TokenName;
use crate::types::TokenKind;
use thiserror::Error;

/// A color literal matched none of the recognized syntaxes.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorFormatError {
    #[error("Unrecognized color format: {input:?}")]
    Unrecognized { input: String },

    #[error("Color channel {channel} out of range in {input:?}: {value}")]
    OutOfRange {
        input: String,
        channel: String,
        value: f64,
    },
}

/// Errors that abort a whole document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Malformed token document: {reason}")]
    MalformedDocument { reason: String },
}

/// Errors attached to a single leaf. They never abort the document.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenError {
    #[error(transparent)]
    ColorFormat(#[from] ColorFormatError),

    #[error("Invalid number value: {value}")]
    InvalidNumber { value: String },

    #[error("Alias of kind {alias_kind} points at {target} of kind {target_kind}")]
    KindMismatch {
        alias_kind: TokenKind,
        target: TokenName,
        target_kind: TokenKind,
    },

    #[error("Duplicate token name: {name}")]
    DuplicateToken { name: TokenName },

    #[error("Malformed token node: {reason}")]
    MalformedNode { reason: String },
}

/// Why an alias never resolved.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnresolvedCause {
    #[error("missing target {missing}")]
    MissingTarget { missing: TokenName },

    #[error("circular alias {}", format_cycle(.cycle))]
    Circular { cycle: Vec<TokenName> },
}

fn format_cycle(cycle: &[TokenName]) -> String {
    cycle
        .iter()
        .map(TokenName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// An alias left pending once the resolution budget ran out.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("Unresolved alias {name} -> {target}: {cause}")]
pub struct UnresolvedAlias {
    pub name: TokenName,
    pub target: TokenName,
    pub cause: UnresolvedCause,
}

/// Errors while rendering tokens back to documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("Token {name} would nest under token {existing}")]
    PathConflict { name: String, existing: String },

    #[error("Variable {variable} aliases unknown variable {target}")]
    UnknownAliasTarget { variable: String, target: String },

    #[error("Failed to serialize {file_name}: {reason}")]
    Serialize { file_name: String, reason: String },
}
