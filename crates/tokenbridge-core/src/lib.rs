//! Core types, resolution table, and errors for tokenbridge.
//!
//! This crate provides the foundational types used across all other tokenbridge crates:
//! - Value types (colors, token kinds, literals)
//! - Token names and alias syntax
//! - The resolution table
//! - The host variable model
//! - Error types

pub mod errors;
pub mod name;
pub mod tokens;
pub mod types;
pub mod variables;

pub use errors::*;
pub use name::*;
pub use tokens::*;
pub use types::*;
pub use variables::*;
