//! The popup's bookmark list: flattened once, filtered live as the user types.

use crate::{flatten_leaves, matches, Bookmark, Node};

/// Bookmarks of the canonical folder in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkList {
    items: Vec<Bookmark>,
}

impl BookmarkList {
    /// Builds the list from a `getAllBookmarks` payload.
    #[must_use]
    pub fn from_forest(forest: &[Node]) -> Self {
        Self {
            items: flatten_leaves(forest).cloned().collect(),
        }
    }

    /// `true` when there is nothing to show ("No bookmarks yet").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items whose title matches `query`, without re-reading the tree.
    pub fn visible<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Bookmark> + 'a {
        self.items.iter().filter(move |b| matches(&b.title, query))
    }
}
