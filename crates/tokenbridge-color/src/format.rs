//! Color formatting.

use tokenbridge_core::Color;

/// Render a color as text.
///
/// Opaque colors render as 6-digit lowercase hex. Translucent colors render
/// as `rgba(R, G, B, O)` with 0-255 integer channels and opacity to 4 decimals.
pub fn format_color(color: &Color) -> String {
    if color.is_opaque() {
        color.to_hex()
    } else {
        let (r, g, b) = color.to_rgb8();
        format!("rgba({}, {}, {}, {:.4})", r, g, b, color.a)
    }
}
