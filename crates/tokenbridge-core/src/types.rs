//! Core value types for design tokens.

use std::fmt;

/// A color in normalized float form.
///
/// Channels are in `[0, 1]`. `a` is the opacity; `1.0` is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[cfg_attr(feature = "serde", serde(default = "opaque"))]
    pub a: f64,
}

#[cfg(feature = "serde")]
fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Return the same color with a different opacity.
    pub fn with_opacity(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Whether the color has no translucency.
    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Convert to 8-bit RGB, rounding each clamped channel to the nearest integer.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b))
    }

    /// Convert to a lowercase 6-digit hex string (e.g., "#ff5733"), ignoring opacity.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The kinds of token the engine converts.
///
/// Decided once from the `$type` tag while walking a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TokenKind {
    Color,
    Number,
}

impl TokenKind {
    /// Classify a `$type` tag. Returns `None` for unsupported kinds.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "color" => Some(TokenKind::Color),
            "number" => Some(TokenKind::Number),
            _ => None,
        }
    }

    /// The `$type` tag written into token documents.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TokenKind::Color => "color",
            TokenKind::Number => "number",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// A concrete token value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Literal {
    Color(Color),
    Number(f64),
}

impl Literal {
    pub fn kind(&self) -> TokenKind {
        match self {
            Literal::Color(_) => TokenKind::Color,
            Literal::Number(_) => TokenKind::Number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_rounds_channels() {
        let c = Color::rgb(0.6353, 0.5176, 0.3686);
        assert_eq!(c.to_hex(), "#a2845e");
    }

    #[test]
    fn test_to_rgb8_clamps() {
        let c = Color::rgb(1.5, -0.2, 0.5);
        assert_eq!(c.to_rgb8(), (255, 0, 128));
    }

    #[test]
    fn test_kind_from_type_tag() {
        assert_eq!(TokenKind::from_type_tag("color"), Some(TokenKind::Color));
        assert_eq!(TokenKind::from_type_tag("number"), Some(TokenKind::Number));
        assert_eq!(TokenKind::from_type_tag("typography"), None);
    }
}
