//! The bookmark tree service this library drives.
//!
//! [`BookmarkTree`] is the whole surface the resolver, recorder, and
//! controller need from the host. [`SqliteBookmarkStore`](crate::SqliteBookmarkStore)
//! implements it on a local database; a browser embedding implements it over
//! the native bookmarks API.

use crate::{Node, Result};
use serde::{Deserialize, Serialize};

/// Exact-match search criteria. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: None,
        }
    }

    #[must_use]
    pub fn by_url(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: Some(url.into()),
        }
    }
}

/// Arguments for [`BookmarkTree::create`]. A `url` makes the node a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetails {
    pub parent_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Position among the parent's children; `None` appends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl CreateDetails {
    /// A folder inserted at the front of `parent_id`.
    #[must_use]
    pub fn folder_first(parent_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            title: title.into(),
            url: None,
            index: Some(0),
        }
    }

    /// A bookmark inserted at the front of `parent_id`.
    #[must_use]
    pub fn bookmark_first(
        parent_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: parent_id.into(),
            title: title.into(),
            url: Some(url.into()),
            index: Some(0),
        }
    }
}

/// Fields to change in [`BookmarkTree::update`]. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// CRUD access to a bookmark tree.
///
/// `get` and `search` return folders without their children; `get_sub_tree`
/// and `get_tree` return them fully populated. Implementations own id
/// assignment and sibling ordering.
pub trait BookmarkTree {
    /// Nodes matching every criterion in `query`, in tree order.
    fn search(&self, query: &SearchQuery) -> Result<Vec<Node>>;

    /// # Errors
    ///
    /// Returns [`crate::MarkError::NodeNotFound`] if `id` does not resolve.
    fn get(&self, id: &str) -> Result<Node>;

    /// The node `id` with all descendants.
    fn get_sub_tree(&self, id: &str) -> Result<Node>;

    /// The whole tree, as a forest of top-level nodes.
    fn get_tree(&self) -> Result<Vec<Node>>;

    fn create(&mut self, details: CreateDetails) -> Result<Node>;

    fn update(&mut self, id: &str, changes: NodeChanges) -> Result<Node>;

    fn remove(&mut self, id: &str) -> Result<()>;
}
