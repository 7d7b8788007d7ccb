//! Lexical building blocks for color literals.

use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::{alpha1, char, multispace0},
    combinator::{map, opt},
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it tolerates surrounding whitespace.
pub fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A numeric function argument, optionally suffixed with `%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub value: f64,
    pub percent: bool,
}

/// Parse a number with an optional percent sign.
pub fn component(input: &str) -> IResult<&str, Component> {
    map(pair(double, opt(char('%'))), |(value, pct)| Component {
        value,
        percent: pct.is_some(),
    })(input)
}

/// Parse hex digits: exactly six, or exactly three.
pub fn hex_digits(input: &str) -> IResult<&str, &str> {
    let is_hex = |c: char| c.is_ascii_hexdigit();
    alt((take_while_m_n(6, 6, is_hex), take_while_m_n(3, 3, is_hex)))(input)
}

/// Parse an object key, bare (`r`) or quoted (`"r"`).
pub fn object_key(input: &str) -> IResult<&str, &str> {
    alt((delimited(char('"'), alpha1, char('"')), alpha1))(input)
}
