//! Color codec for design tokens.
//!
//! Converts between the normalized float color used by the engine and the
//! textual forms found in token documents.
//!
//! # Example
//!
//! ```
//! use tokenbridge_color::{format_color, parse_color};
//!
//! let color = parse_color("hsl(0, 100%, 50%)").unwrap();
//! assert_eq!(format_color(&color), "#ff0000");
//! ```

mod format;
mod grammar;
mod lexer;

pub use format::format_color;
pub use grammar::parse_color;
pub use tokenbridge_core::{Color, ColorFormatError};
