//! Title search used to narrow an already-rendered bookmark list.

/// Case-insensitive substring test of `query` against `title`.
///
/// An empty query matches everything.
///
/// ```rust
/// use przwl_mark_core::matches;
///
/// assert!(matches("My Page", ""));
/// assert!(matches("My Page", "my"));
/// assert!(!matches("My Page", "zz"));
/// ```
#[must_use]
pub fn matches(title: &str, query: &str) -> bool {
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}
