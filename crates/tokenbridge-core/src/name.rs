//! Fully-qualified token names.

use smallvec::SmallVec;
use std::fmt;

/// Separator between path segments in a resolved table key.
pub const NAME_SEPARATOR: char = '/';

/// Separator between path segments inside an alias reference.
pub const ALIAS_SEPARATOR: char = '.';

/// The fully-qualified path to a leaf token, slash-joined (e.g. `color/red`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenName(String);

impl TokenName {
    /// Create a name from an already slash-joined path.
    pub fn new(path: impl Into<String>) -> Self {
        TokenName(path.into())
    }

    /// Join path segments into a name.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                joined.push(NAME_SEPARATOR);
            }
            joined.push_str(segment.as_ref());
        }
        TokenName(joined)
    }

    /// Normalize an alias reference (`{color.red}`) into a table name (`color/red`).
    ///
    /// Returns `None` when the text is not alias syntax or names nothing.
    pub fn from_alias(reference: &str) -> Option<Self> {
        let trimmed = reference.trim();
        if !is_alias(trimmed) {
            return None;
        }
        let inner = trimmed
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim();
        if inner.is_empty() {
            return None;
        }
        Some(TokenName(inner.replace(ALIAS_SEPARATOR, "/")))
    }

    /// Render as alias syntax (`{color.red}`).
    pub fn to_alias(&self) -> String {
        format!("{{{}}}", self.0.replace(NAME_SEPARATOR, "."))
    }

    /// Split into path segments.
    pub fn segments(&self) -> SmallVec<[&str; 6]> {
        self.0.split(NAME_SEPARATOR).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keys that open a float-object color literal.
const CHANNEL_KEYS: [&str; 5] = ["r", "g", "b", "a", "opacity"];

/// Whether a raw `$value` string is alias syntax.
///
/// Float-object color literals (`{r: 1, g: 0, b: 0}`) also open with a brace;
/// they are told apart by a channel key before the first colon. Any other
/// colon is part of the referenced name.
pub fn is_alias(value: &str) -> bool {
    let Some(body) = value.trim_start().strip_prefix('{') else {
        return false;
    };
    match body.split_once(':') {
        Some((key, _)) => {
            let key = key.trim().trim_matches('"');
            !CHANNEL_KEYS.contains(&key)
        }
        None => true,
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenName {
    fn from(s: &str) -> Self {
        TokenName(s.to_string())
    }
}

impl From<String> for TokenName {
    fn from(s: String) -> Self {
        TokenName(s)
    }
}

impl AsRef<str> for TokenName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
