//! Request/response payloads exchanged between the popup and the controller.
//!
//! Requests are a closed set tagged by `action`, so every action the popup
//! can send is matched exhaustively by
//! [`Controller::handle`](crate::Controller::handle).
//!
//! ```rust
//! use przwl_mark_core::Request;
//!
//! let req: Request = serde_json::from_str(r#"{"action":"createFolder","title":"Reading"}"#).unwrap();
//! assert_eq!(req, Request::CreateFolder { title: "Reading".to_string() });
//!
//! let json = serde_json::to_string(&Request::GetRecentBookmarks).unwrap();
//! assert_eq!(json, r#"{"action":"getRecentBookmarks"}"#);
//! ```

use crate::{FolderEntry, MarkError, Node, RecentEntry};
use serde::{Deserialize, Serialize};

/// An intent sent by the popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Save the active tab. Answered by a notification, not a payload.
    BookmarkCurrent,
    GetRecentBookmarks,
    /// The canonical folder with all its descendants.
    GetAllBookmarks,
    /// Create a folder inside the canonical folder.
    CreateFolder { title: String },
    /// Folders of the whole tree, for the folder picker.
    GetFolderTree,
    /// Make `folder_id` the canonical folder.
    #[serde(rename_all = "camelCase")]
    ChooseFolder { folder_id: String },
    UpdateBookmark { id: String, title: String, url: String },
    RemoveBookmark { id: String },
    GetPreferences,
    #[serde(rename_all = "camelCase")]
    SetPreferences {
        #[serde(default)]
        dark_mode: Option<bool>,
        #[serde(default)]
        read_later: Option<bool>,
    },
}

/// Outcome of a mutating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The controller's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    Recent { recent_bookmarks: Vec<RecentEntry> },
    Bookmarks { bookmarks: Vec<Node> },
    Folders { folders: Vec<FolderEntry> },
    #[serde(rename_all = "camelCase")]
    Preferences {
        dark_mode: bool,
        read_later: bool,
        theme_label: String,
    },
    Status(Status),
    /// No payload.
    Ack,
}

impl Response {
    #[must_use]
    pub fn ok() -> Self {
        Self::Status(Status {
            success: true,
            folder: None,
            error: None,
        })
    }

    #[must_use]
    pub fn created(folder: Node) -> Self {
        Self::Status(Status {
            success: true,
            folder: Some(folder),
            error: None,
        })
    }

    #[must_use]
    pub fn failure(error: &MarkError) -> Self {
        Self::Status(Status {
            success: false,
            folder: None,
            error: Some(error.user_message()),
        })
    }
}
