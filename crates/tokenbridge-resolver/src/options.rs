//! Resolution options.

/// What to do when two leaves share a token name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    /// The later leaf replaces the earlier one.
    #[default]
    Overwrite,
    /// The later leaf is rejected with a `DuplicateToken` failure.
    Error,
}

/// Options for resolving a token document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ResolveOptions {
    /// Handling of duplicate token names.
    pub on_duplicate: DuplicatePolicy,
}

impl ResolveOptions {
    /// Create default resolve options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate name policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }
}
