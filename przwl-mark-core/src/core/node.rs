//! Bookmark tree node types.
//!
//! A [`Node`] is either a [`Folder`] (ordered children) or a [`Bookmark`]
//! (has a URL). Identifiers are opaque strings owned by the bookmark tree
//! implementation; sibling order is display order.
//!
//! Nodes serialize in the host's camelCase shape, without an explicit tag:
//! a node with a `url` is a bookmark, anything else is a folder.
//!
//! ```rust
//! use przwl_mark_core::Node;
//!
//! let json = r#"{"id":"7","title":"Docs","parentId":"1","children":[
//!     {"id":"8","title":"Rust","parentId":"7","url":"https://rust-lang.org"}
//! ]}"#;
//! let node: Node = serde_json::from_str(json).unwrap();
//! assert!(node.is_folder());
//! assert_eq!(node.as_folder().unwrap().children[0].url(), Some("https://rust-lang.org"));
//! ```

use crate::{MarkError, Result};
use serde::{Deserialize, Serialize};

/// A folder and, when fetched as a subtree, its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A saved page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
}

/// An item in the bookmark tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    // Bookmark is tried first: only it requires `url`.
    Bookmark(Bookmark),
    Folder(Folder),
}

impl Node {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Bookmark(b) => &b.id,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Folder(f) => &f.title,
            Self::Bookmark(b) => &b.title,
        }
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Folder(f) => f.parent_id.as_deref(),
            Self::Bookmark(b) => b.parent_id.as_deref(),
        }
    }

    /// The bookmark URL, or `None` for folders.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Folder(_) => None,
            Self::Bookmark(b) => Some(&b.url),
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    #[must_use]
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::Bookmark(_) => None,
        }
    }

    /// Unwraps a folder node.
    ///
    /// # Errors
    ///
    /// Returns [`MarkError::InvalidNode`] if the node is a bookmark.
    pub fn into_folder(self) -> Result<Folder> {
        match self {
            Self::Folder(f) => Ok(f),
            Self::Bookmark(b) => Err(MarkError::InvalidNode(format!(
                "Node {} is a bookmark, not a folder",
                b.id
            ))),
        }
    }

    /// Unwraps a bookmark node.
    ///
    /// # Errors
    ///
    /// Returns [`MarkError::InvalidNode`] if the node is a folder.
    pub fn into_bookmark(self) -> Result<Bookmark> {
        match self {
            Self::Bookmark(b) => Ok(b),
            Self::Folder(f) => Err(MarkError::InvalidNode(format!(
                "Node {} is a folder, not a bookmark",
                f.id
            ))),
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<Bookmark> for Node {
    fn from(bookmark: Bookmark) -> Self {
        Self::Bookmark(bookmark)
    }
}
