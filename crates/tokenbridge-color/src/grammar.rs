//! Color literal grammar.
//!
//! Recognizes the six supported syntaxes and converts them to a normalized
//! [`Color`]:
//!
//! | syntax | channels |
//! |--------|----------|
//! | `#rgb`, `#rrggbb` | hex digits |
//! | `rgb(r, g, b)` | 0-255 |
//! | `rgba(r, g, b, a)` | 0-255, alpha 0-1 |
//! | `hsl(h, s%, l%)` | hue 0-360, 0-100% |
//! | `hsla(h, s%, l%, a)` | as `hsl`, alpha 0-1 |
//! | `{r: .., g: .., b: .., opacity: ..}` | 0-1 floats, opacity optional |

use crate::lexer::{component, hex_digits, object_key, ws, Component};
use nom::{
    branch::alt,
    character::complete::{alpha1, char},
    combinator::{all_consuming, map},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use tokenbridge_core::{Color, ColorFormatError};

/// Parse a color literal into normalized float form.
///
/// Surrounding whitespace is ignored. Function names and hex digits are
/// case-insensitive.
pub fn parse_color(text: &str) -> Result<Color, ColorFormatError> {
    let input = text.trim();
    let syntax = match all_consuming(color_syntax)(input) {
        Ok((_, syntax)) => syntax,
        Err(_) => return Err(unrecognized(text)),
    };
    syntax.into_color(text)
}

/// A color literal after lexing, before range checks.
#[derive(Debug)]
enum Syntax<'a> {
    Hex(&'a str),
    Function { name: &'a str, args: Vec<Component> },
    Object(Vec<(&'a str, f64)>),
}

fn color_syntax(input: &str) -> IResult<&str, Syntax<'_>> {
    alt((
        map(preceded(char('#'), hex_digits), Syntax::Hex),
        map(function, |(name, args)| Syntax::Function { name, args }),
        map(float_object, Syntax::Object),
    ))(input)
}

fn function(input: &str) -> IResult<&str, (&str, Vec<Component>)> {
    map(
        tuple((
            alpha1,
            ws(char('(')),
            separated_list1(char(','), ws(component)),
            char(')'),
        )),
        |(name, _, args, _)| (name, args),
    )(input)
}

fn float_object(input: &str) -> IResult<&str, Vec<(&str, f64)>> {
    delimited(
        ws(char('{')),
        separated_list1(
            char(','),
            ws(separated_pair(object_key, ws(char(':')), double)),
        ),
        ws(char('}')),
    )(input)
}

impl Syntax<'_> {
    fn into_color(self, input: &str) -> Result<Color, ColorFormatError> {
        match self {
            Syntax::Hex(digits) => hex_to_color(digits, input),
            Syntax::Function { name, args } => {
                match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
                    ("rgb", [r, g, b]) => rgb_to_color(input, *r, *g, *b, None),
                    ("rgba", [r, g, b, a]) => rgb_to_color(input, *r, *g, *b, Some(*a)),
                    ("hsl", [h, s, l]) => hsl_to_color(input, *h, *s, *l, None),
                    ("hsla", [h, s, l, a]) => hsl_to_color(input, *h, *s, *l, Some(*a)),
                    _ => Err(unrecognized(input)),
                }
            }
            Syntax::Object(fields) => object_to_color(input, &fields),
        }
    }
}

fn hex_to_color(digits: &str, input: &str) -> Result<Color, ColorFormatError> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let byte = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16).map_err(|_| unrecognized(input))
    };
    Ok(Color::from_rgb8(byte(0..2)?, byte(2..4)?, byte(4..6)?))
}

fn rgb_to_color(
    input: &str,
    r: Component,
    g: Component,
    b: Component,
    a: Option<Component>,
) -> Result<Color, ColorFormatError> {
    let r = channel(input, "r", r, 255.0, false)?;
    let g = channel(input, "g", g, 255.0, false)?;
    let b = channel(input, "b", b, 255.0, false)?;
    let color = Color::rgb(r / 255.0, g / 255.0, b / 255.0);
    match a {
        Some(a) => Ok(color.with_opacity(channel(input, "a", a, 1.0, false)?)),
        None => Ok(color),
    }
}

fn hsl_to_color(
    input: &str,
    h: Component,
    s: Component,
    l: Component,
    a: Option<Component>,
) -> Result<Color, ColorFormatError> {
    let h = channel(input, "h", h, 360.0, false)?;
    let s = channel(input, "s", s, 100.0, true)? / 100.0;
    let l = channel(input, "l", l, 100.0, true)? / 100.0;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    let color = Color::rgb(r, g, b);
    match a {
        Some(a) => Ok(color.with_opacity(channel(input, "a", a, 1.0, false)?)),
        None => Ok(color),
    }
}

fn object_to_color(input: &str, fields: &[(&str, f64)]) -> Result<Color, ColorFormatError> {
    let mut r = None;
    let mut g = None;
    let mut b = None;
    let mut a = None;
    for &(key, value) in fields {
        let slot = match key {
            "r" => &mut r,
            "g" => &mut g,
            "b" => &mut b,
            "a" | "opacity" => &mut a,
            _ => return Err(unrecognized(input)),
        };
        if slot.is_some() {
            return Err(unrecognized(input));
        }
        let checked = channel(input, key, Component { value, percent: false }, 1.0, false)?;
        *slot = Some(checked);
    }
    match (r, g, b) {
        (Some(r), Some(g), Some(b)) => Ok(Color::rgba(r, g, b, a.unwrap_or(1.0))),
        _ => Err(unrecognized(input)),
    }
}

/// Check a component's unit and range, returning its value.
fn channel(
    input: &str,
    name: &str,
    component: Component,
    max: f64,
    percent: bool,
) -> Result<f64, ColorFormatError> {
    if component.percent != percent {
        return Err(unrecognized(input));
    }
    let value = component.value;
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        return Err(ColorFormatError::OutOfRange {
            input: input.to_string(),
            channel: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Convert hue (degrees), saturation and lightness (0-1) to RGB floats.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sextant = (h % 360.0) / 60.0;
    let x = chroma * (1.0 - (sextant % 2.0 - 1.0).abs());
    let (r, g, b) = match sextant as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    (r + m, g + m, b + m)
}

fn unrecognized(input: &str) -> ColorFormatError {
    ColorFormatError::Unrecognized {
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Color, expected: (f64, f64, f64, f64)) {
        let tolerance = 1.0 / 255.0;
        assert!((actual.r - expected.0).abs() <= tolerance, "r: {:?}", actual);
        assert!((actual.g - expected.1).abs() <= tolerance, "g: {:?}", actual);
        assert!((actual.b - expected.2).abs() <= tolerance, "b: {:?}", actual);
        assert!((actual.a - expected.3).abs() <= 1e-9, "a: {:?}", actual);
    }

    #[test]
    fn test_parse_hex6() {
        let c = parse_color("#a2845e").unwrap();
        assert_close(c, (0.6353, 0.5176, 0.3686, 1.0));
    }

    #[test]
    fn test_parse_hex3_expands() {
        let c = parse_color("#F0a").unwrap();
        assert_eq!(c, Color::from_rgb8(0xff, 0x00, 0xaa));
    }

    #[test]
    fn test_parse_rgb_and_rgba() {
        let c = parse_color("rgb(255, 0, 51)").unwrap();
        assert_close(c, (1.0, 0.0, 0.2, 1.0));

        let c = parse_color("  rgba( 0 ,128,255 , 0.25 ) ").unwrap();
        assert_close(c, (0.0, 0.502, 1.0, 0.25));
    }

    #[test]
    fn test_parse_hsl_sextants() {
        assert_close(parse_color("hsl(0, 100%, 50%)").unwrap(), (1.0, 0.0, 0.0, 1.0));
        assert_close(parse_color("hsl(120, 100%, 50%)").unwrap(), (0.0, 1.0, 0.0, 1.0));
        assert_close(parse_color("hsl(240, 100%, 50%)").unwrap(), (0.0, 0.0, 1.0, 1.0));
        assert_close(parse_color("hsl(300, 100%, 25%)").unwrap(), (0.5, 0.0, 0.5, 1.0));
        assert_close(parse_color("hsl(30, 0%, 50%)").unwrap(), (0.5, 0.5, 0.5, 1.0));
        assert_close(parse_color("hsl(360, 100%, 50%)").unwrap(), (1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_hsla_opacity_is_float() {
        let c = parse_color("hsla(60, 100%, 50%, 0.4)").unwrap();
        assert_close(c, (1.0, 1.0, 0.0, 0.4));
    }

    #[test]
    fn test_parse_float_object() {
        let c = parse_color("{r: 0.2, g: 0.4, b: 0.6}").unwrap();
        assert_close(c, (0.2, 0.4, 0.6, 1.0));

        let c = parse_color(r#"{"r": 1, "g": 0, "b": 0, "opacity": 0.5}"#).unwrap();
        assert_close(c, (1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_wrong_channel_count_is_unrecognized() {
        assert!(matches!(
            parse_color("rgb(1, 2)"),
            Err(ColorFormatError::Unrecognized { .. })
        ));
        assert!(matches!(
            parse_color("rgba(1, 2, 3)"),
            Err(ColorFormatError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_out_of_range_channels() {
        assert!(matches!(
            parse_color("rgb(256, 0, 0)"),
            Err(ColorFormatError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_color("hsl(10, 120%, 50%)"),
            Err(ColorFormatError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_color("rgba(0, 0, 0, 1.5)"),
            Err(ColorFormatError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unrecognized_inputs() {
        for input in ["red", "#abcd", "#12345", "cmyk(0, 0, 0, 0)", "hsl(10, 50, 50)", "", "{g: 1, b: 1}"] {
            assert!(parse_color(input).is_err(), "{input} should not parse");
        }
    }
}
