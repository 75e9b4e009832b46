//! Internal domain modules for the przwl-mark core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod bookmarks;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod host;
pub mod listing;
pub mod message;
pub mod node;
pub mod prefs;
pub mod recorder;
pub mod resolver;
pub mod storage;
pub mod tree;

#[doc(inline)]
pub use bookmarks::{BookmarkTree, CreateDetails, NodeChanges, SearchQuery};
#[doc(inline)]
pub use config::MarkConfig;
#[doc(inline)]
pub use controller::Controller;
#[doc(inline)]
pub use error::{MarkError, Result};
#[doc(inline)]
pub use filter::matches;
#[doc(inline)]
pub use host::{ActiveTab, HostCommand, Notifier, PageInfo};
#[doc(inline)]
pub use listing::BookmarkList;
#[doc(inline)]
pub use message::{Request, Response, Status};
#[doc(inline)]
pub use node::{Bookmark, Folder, Node};
#[doc(inline)]
pub use prefs::{JsonFileStore, KeyValueStore, Preferences, Theme};
#[doc(inline)]
pub use recorder::{BookmarkRecorder, RecentEntry, RecordOutcome};
#[doc(inline)]
pub use resolver::{FolderResolver, Resolution};
#[doc(inline)]
pub use storage::SqliteBookmarkStore;
#[doc(inline)]
pub use tree::{flatten_leaves, render_folders, FolderEntry, Leaves};
