//! Traversals over a bookmark forest.
//!
//! [`flatten_leaves`] yields every bookmark in pre-order; [`render_folders`]
//! keeps only folders, preserving nesting, for the folder picker. Neither
//! caches anything: each call walks the forest it is given.

use crate::{Bookmark, Node};
use serde::{Deserialize, Serialize};
use std::slice;

/// Lazy pre-order iterator over the bookmarks of a forest.
///
/// Folders are descended into but never yielded.
pub struct Leaves<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Bookmark;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(Node::Bookmark(bookmark)) => return Some(bookmark),
                Some(Node::Folder(folder)) => self.stack.push(folder.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Returns the bookmarks of `forest` in pre-order, children in their given order.
///
/// ```rust
/// use przwl_mark_core::{flatten_leaves, Node};
///
/// let forest: Vec<Node> = serde_json::from_str(r#"[{"id":"1","title":"root","children":[
///     {"id":"2","title":"a","url":"https://a.test"},
///     {"id":"3","title":"sub","children":[{"id":"4","title":"b","url":"https://b.test"}]},
///     {"id":"5","title":"c","url":"https://c.test"}
/// ]}]"#).unwrap();
/// let titles: Vec<&str> = flatten_leaves(&forest).map(|b| b.title.as_str()).collect();
/// assert_eq!(titles, ["a", "b", "c"]);
/// ```
#[must_use]
pub fn flatten_leaves(forest: &[Node]) -> Leaves<'_> {
    Leaves {
        stack: vec![forest.iter()],
    }
}

/// A folder as shown in the folder picker: bookmarks pruned, nesting kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub id: String,
    pub title: String,
    pub children: Vec<FolderEntry>,
}

impl FolderEntry {
    /// Depth-first lookup of `id` within this entry, itself included.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&FolderEntry> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Projects `forest` onto its folders. Empty folders are kept: they are selectable.
#[must_use]
pub fn render_folders(forest: &[Node]) -> Vec<FolderEntry> {
    forest
        .iter()
        .filter_map(Node::as_folder)
        .map(|folder| FolderEntry {
            id: folder.id.clone(),
            title: folder.title.clone(),
            children: render_folders(&folder.children),
        })
        .collect()
}

/// Looks up `id` across a rendered forest.
#[must_use]
pub fn find_folder<'a>(entries: &'a [FolderEntry], id: &str) -> Option<&'a FolderEntry> {
    entries.iter().find_map(|entry| entry.find(id))
}
