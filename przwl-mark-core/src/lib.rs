//! Core library for przwl-mark: save the active page into a dedicated
//! bookmarks folder, then browse, search, edit, and delete those bookmarks.
//!
//! The primary entry point is [`Controller`], which answers popup
//! [`Request`]s and global shortcuts on top of a [`BookmarkTree`] and two
//! [`KeyValueStore`] scopes. The pieces it is built from ([`FolderResolver`],
//! [`BookmarkRecorder`], [`flatten_leaves`], [`render_folders`], [`matches`])
//! are usable on their own.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    bookmarks::{BookmarkTree, CreateDetails, NodeChanges, SearchQuery},
    config::{MarkConfig, DEFAULT_FOLDER_TITLE},
    controller::Controller,
    error::{MarkError, Result},
    filter::matches,
    host::{ActiveTab, HostCommand, Notifier, PageInfo},
    listing::BookmarkList,
    message::{Request, Response, Status},
    node::{Bookmark, Folder, Node},
    prefs::{
        store_dark_mode, store_folder_id, store_read_later, JsonFileStore, KeyValueStore,
        Preferences, Theme, ValueMap, DARK_MODE_KEY, FOLDER_ID_KEY, READ_LATER_KEY,
    },
    recorder::{load_recent, push_recent, BookmarkRecorder, RecentEntry, RecordOutcome, RECENT_KEY},
    resolver::{FolderResolver, Resolution},
    storage::{SqliteBookmarkStore, ROOT_ID},
    tree::{find_folder, flatten_leaves, render_folders, FolderEntry, Leaves},
};
