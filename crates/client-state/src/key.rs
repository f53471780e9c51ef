//! Hierarchical cache keys.
//!
//! Keys are segment lists, e.g. `("bookings", "list", <user id>)`.
//! Invalidating a prefix cascades to every descendant, so invalidating
//! `("bookings",)` reaches both the list and any detail entries.

use std::fmt;

/// Hierarchical cache key.
///
/// # Examples
/// ```
/// use client_state::QueryKey;
///
/// let all = QueryKey::new(["bookings"]);
/// let list = all.child("list").child("user-1");
/// assert!(list.starts_with(&all));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Extend the key with one more segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Whether this key lives under the given prefix (or equals it).
    #[must_use]
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }

    /// The key's segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(QueryKey::new(["bookings"]), true)]
    #[case(QueryKey::new(["bookings", "list"]), true)]
    #[case(QueryKey::new(["notifications"]), false)]
    #[case(QueryKey::new(["bookings", "detail"]), false)]
    fn prefix_matching(#[case] prefix: QueryKey, #[case] expected: bool) {
        let key = QueryKey::new(["bookings", "list", "user-1"]);
        assert_eq!(key.starts_with(&prefix), expected);
    }

    #[test]
    fn keys_display_with_separators() {
        let key = QueryKey::new(["notifications", "list"]).child("user-1");
        assert_eq!(key.to_string(), "notifications:list:user-1");
    }

    #[test]
    fn a_key_is_its_own_prefix() {
        let key = QueryKey::new(["bookings", "list"]);
        assert!(key.starts_with(&key.clone()));
    }
}
