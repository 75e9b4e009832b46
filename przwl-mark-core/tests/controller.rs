use przwl_mark_core::{
    flatten_leaves, ActiveTab, BookmarkList, BookmarkTree, Controller, CreateDetails,
    JsonFileStore, MarkConfig, MarkError, Node, NodeChanges, Notifier, PageInfo, Preferences,
    RecordOutcome, Request, Response, Result, SearchQuery, SqliteBookmarkStore, Status, ROOT_ID,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

type Notes = Rc<RefCell<Vec<(String, String)>>>;

struct FixedTab(Rc<RefCell<Option<PageInfo>>>);

impl ActiveTab for FixedTab {
    fn active_tab(&self) -> Result<PageInfo> {
        self.0
            .borrow()
            .clone()
            .ok_or_else(|| MarkError::Collaborator("no active tab".to_string()))
    }
}

struct RecordingNotifier(Notes);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, title: &str, message: &str) -> Result<()> {
        self.0.borrow_mut().push((title.to_string(), message.to_string()));
        Ok(())
    }
}

struct Harness {
    _dir: TempDir,
    tab: Rc<RefCell<Option<PageInfo>>>,
    notes: Notes,
    controller: Controller<SqliteBookmarkStore, JsonFileStore>,
}

impl Harness {
    fn new() -> Self {
        Self::with_tree(SqliteBookmarkStore::in_memory().unwrap())
    }

    fn with_tree(tree: SqliteBookmarkStore) -> Self {
        let dir = TempDir::new().unwrap();
        let tab = Rc::new(RefCell::new(None));
        let notes: Notes = Rc::default();
        let controller = Controller::new(
            tree,
            JsonFileStore::new(dir.path().join("sync.json")),
            JsonFileStore::new(dir.path().join("local.json")),
            Box::new(FixedTab(Rc::clone(&tab))),
            Box::new(RecordingNotifier(Rc::clone(&notes))),
            MarkConfig::default(),
        );
        Self {
            _dir: dir,
            tab,
            notes,
            controller,
        }
    }

    fn visit(&self, title: &str, url: &str) {
        *self.tab.borrow_mut() = Some(PageInfo {
            title: title.to_string(),
            url: url.to_string(),
        });
    }

    fn last_note(&self) -> String {
        self.notes.borrow().last().map(|(_, m)| m.clone()).unwrap_or_default()
    }

    fn all_bookmarks(&mut self) -> Vec<Node> {
        match self.controller.handle(Request::GetAllBookmarks) {
            Response::Bookmarks { bookmarks } => bookmarks,
            other => panic!("unexpected response {other:?}"),
        }
    }

    fn status(&mut self, request: Request) -> Status {
        match self.controller.handle(request) {
            Response::Status(status) => status,
            other => panic!("unexpected response {other:?}"),
        }
    }

    fn folder_id(&self) -> Option<String> {
        Preferences::load(self.controller.synced()).unwrap().bookmark_folder_id
    }
}

#[test]
fn test_quick_bookmark_saves_and_notifies() {
    let mut h = Harness::new();
    h.visit("Rust", "https://www.rust-lang.org");

    let outcome = h.controller.on_command("quick-bookmark");

    assert!(matches!(outcome, Some(RecordOutcome::Created { .. })));
    assert_eq!(
        h.notes.borrow().last().cloned(),
        Some(("przwl-mark".to_string(), "Bookmark saved successfully!".to_string()))
    );
    let bookmarks = h.all_bookmarks();
    let titles: Vec<&str> = flatten_leaves(&bookmarks).map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Rust"]);
}

#[test]
fn test_bookmark_current_twice_reports_duplicate() {
    let mut h = Harness::new();
    h.visit("Rust", "https://www.rust-lang.org");

    assert_eq!(h.controller.handle(Request::BookmarkCurrent), Response::Ack);
    assert_eq!(h.controller.handle(Request::BookmarkCurrent), Response::Ack);

    assert_eq!(h.last_note(), "Bookmark already exists!");
    let bookmarks = h.all_bookmarks();
    assert_eq!(flatten_leaves(&bookmarks).count(), 1);
}

#[test]
fn test_missing_tab_notifies_failure_and_keeps_running() {
    let mut h = Harness::new();

    assert!(h.controller.bookmark_current().is_none());
    assert_eq!(h.last_note(), "Error saving bookmark. Please try again.");

    h.visit("Later", "https://later.test");
    assert!(h.controller.bookmark_current().is_some());
}

#[test]
fn test_unknown_command_is_ignored() {
    let mut h = Harness::new();
    h.visit("Rust", "https://www.rust-lang.org");

    assert!(h.controller.on_command("open-settings").is_none());
    assert!(h.notes.borrow().is_empty());
}

#[test]
fn test_recent_bookmarks_most_recent_first_and_capped() {
    let mut h = Harness::new();
    for n in 1..=11 {
        h.visit(&format!("Page {n}"), &format!("https://example.com/{n}"));
        h.controller.bookmark_current();
    }

    let Response::Recent { recent_bookmarks } = h.controller.handle(Request::GetRecentBookmarks)
    else {
        panic!("expected recent bookmarks");
    };
    assert_eq!(recent_bookmarks.len(), 10);
    assert_eq!(recent_bookmarks[0].title, "Page 11");
    assert_eq!(recent_bookmarks[9].title, "Page 2");
}

#[test]
fn test_recent_bookmarks_empty_by_default() {
    let mut h = Harness::new();
    assert_eq!(
        h.controller.handle(Request::GetRecentBookmarks),
        Response::Recent { recent_bookmarks: vec![] }
    );
}

#[test]
fn test_on_installed_reuses_existing_folder() {
    let mut tree = SqliteBookmarkStore::in_memory().unwrap();
    let existing = tree
        .create(CreateDetails::folder_first("2", "przwl-mark"))
        .unwrap();
    let mut h = Harness::with_tree(tree);

    h.controller.on_installed();

    assert_eq!(h.folder_id().as_deref(), Some(existing.id()));
    let found = h
        .controller
        .tree()
        .search(&SearchQuery::by_title("przwl-mark"))
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn test_create_folder_inside_canonical_folder() {
    let mut h = Harness::new();

    let status = h.status(Request::CreateFolder {
        title: "  Reading  ".to_string(),
    });

    assert!(status.success);
    let folder = status.folder.unwrap();
    assert_eq!(folder.title(), "Reading");
    assert_eq!(folder.parent_id().map(str::to_string), h.folder_id());
}

#[test]
fn test_create_folder_rejects_blank_name_without_touching_tree() {
    let mut h = Harness::new();

    let status = h.status(Request::CreateFolder {
        title: "   ".to_string(),
    });

    assert!(!status.success);
    assert_eq!(status.error.as_deref(), Some("Please enter a folder name"));
    // Validation happens before the canonical folder is even resolved.
    assert!(h.folder_id().is_none());
}

#[test]
fn test_choose_folder_redirects_saves() {
    let mut h = Harness::new();
    let target = h
        .status(Request::CreateFolder {
            title: "Elsewhere".to_string(),
        })
        .folder
        .unwrap();

    let status = h.status(Request::ChooseFolder {
        folder_id: target.id().to_string(),
    });
    assert!(status.success);

    h.visit("Docs", "https://docs.rs");
    let Some(RecordOutcome::Created { bookmark, .. }) = h.controller.bookmark_current() else {
        panic!("expected a new bookmark");
    };
    assert_eq!(bookmark.parent_id.as_deref(), Some(target.id()));
}

#[test]
fn test_choose_folder_rejects_bookmark_id() {
    let mut h = Harness::new();
    h.visit("Docs", "https://docs.rs");
    let Some(RecordOutcome::Created { bookmark, .. }) = h.controller.bookmark_current() else {
        panic!("expected a new bookmark");
    };

    let status = h.status(Request::ChooseFolder {
        folder_id: bookmark.id,
    });
    assert!(!status.success);
}

#[test]
fn test_folder_tree_lists_only_folders() {
    let mut h = Harness::new();
    h.visit("Docs", "https://docs.rs");
    h.controller.bookmark_current();

    let Response::Folders { folders } = h.controller.handle(Request::GetFolderTree) else {
        panic!("expected folders");
    };
    let root = &folders[0];
    let bar = root.find("1").unwrap();
    let canonical = bar.children.iter().find(|f| f.title == "przwl-mark").unwrap();
    assert!(canonical.children.is_empty());
}

#[test]
fn test_edit_then_delete_bookmark() {
    let mut h = Harness::new();
    h.visit("Docs", "https://docs.rs");
    h.controller.bookmark_current();
    let id = flatten_leaves(&h.all_bookmarks()).next().unwrap().id.clone();

    let status = h.status(Request::UpdateBookmark {
        id: id.clone(),
        title: "Docs.rs".to_string(),
        url: "https://docs.rs/releases".to_string(),
    });
    assert!(status.success);
    let list = BookmarkList::from_forest(&h.all_bookmarks());
    let edited: Vec<_> = list.visible("docs.rs").collect();
    assert_eq!(edited.len(), 1);
    assert_eq!(edited[0].url, "https://docs.rs/releases");

    assert!(h.status(Request::RemoveBookmark { id: id.clone() }).success);
    assert!(BookmarkList::from_forest(&h.all_bookmarks()).is_empty());

    // A repeated delete of the same id is reported, not swallowed.
    let again = h.status(Request::RemoveBookmark { id });
    assert!(!again.success);
    assert_eq!(again.error.as_deref(), Some("Bookmark no longer exists"));
}

#[test]
fn test_recent_entries_are_snapshots() {
    let mut h = Harness::new();
    h.visit("Docs", "https://docs.rs");
    h.controller.bookmark_current();
    let id = flatten_leaves(&h.all_bookmarks()).next().unwrap().id.clone();

    h.status(Request::UpdateBookmark {
        id,
        title: "Renamed".to_string(),
        url: "https://docs.rs".to_string(),
    });

    let Response::Recent { recent_bookmarks } = h.controller.handle(Request::GetRecentBookmarks)
    else {
        panic!("expected recent bookmarks");
    };
    assert_eq!(recent_bookmarks[0].title, "Docs");
}

#[test]
fn test_preferences_round_trip() {
    let mut h = Harness::new();

    let status = h.status(Request::SetPreferences {
        dark_mode: Some(true),
        read_later: None,
    });
    assert!(status.success);

    assert_eq!(
        h.controller.handle(Request::GetPreferences),
        Response::Preferences {
            dark_mode: true,
            read_later: false,
            theme_label: "Light Mode".to_string(),
        }
    );
}

#[test]
fn test_stale_folder_id_rebinds_by_title_on_listing() {
    let mut h = Harness::new();
    h.visit("Docs", "https://docs.rs");
    h.controller.bookmark_current();
    let first = h.folder_id().unwrap();

    // Point the preference at a folder that no longer exists.
    assert!(h
        .status(Request::ChooseFolder { folder_id: "gone".to_string() })
        .error
        .is_some());
    let json = serde_json::json!({ "bookmarkFolderId": "gone" });
    std::fs::write(h.controller.synced().path(), json.to_string()).unwrap();

    let bookmarks = h.all_bookmarks();
    assert_eq!(bookmarks[0].id(), first);
    assert_eq!(h.folder_id().as_deref(), Some(first.as_str()));
}

#[test]
fn test_choose_folder_rejects_invisible_root() {
    let mut h = Harness::new();

    let status = h.status(Request::ChooseFolder {
        folder_id: ROOT_ID.to_string(),
    });

    assert!(!status.success);
    assert!(h.folder_id().is_none());
}

#[test]
fn test_unreadable_recent_list_answers_empty() {
    let mut h = Harness::new();
    std::fs::write(h.controller.local().path(), r#"{"recentBookmarks": 5}"#).unwrap();

    assert_eq!(
        h.controller.handle(Request::GetRecentBookmarks),
        Response::Recent { recent_bookmarks: vec![] }
    );

    h.visit("Docs", "https://docs.rs");
    h.controller.handle(Request::BookmarkCurrent);
    // The recency write fails but the bookmark itself is kept.
    assert_eq!(h.last_note(), "Bookmark saved successfully!");
    assert_eq!(flatten_leaves(&h.all_bookmarks()).count(), 1);
}

/// Delegates to SQLite but cannot read whole subtrees.
struct NoSubTrees(SqliteBookmarkStore);

impl BookmarkTree for NoSubTrees {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Node>> {
        self.0.search(query)
    }

    fn get(&self, id: &str) -> Result<Node> {
        self.0.get(id)
    }

    fn get_sub_tree(&self, _id: &str) -> Result<Node> {
        Err(MarkError::Collaborator("subtree unavailable".to_string()))
    }

    fn get_tree(&self) -> Result<Vec<Node>> {
        Err(MarkError::Collaborator("tree unavailable".to_string()))
    }

    fn create(&mut self, details: CreateDetails) -> Result<Node> {
        self.0.create(details)
    }

    fn update(&mut self, id: &str, changes: NodeChanges) -> Result<Node> {
        self.0.update(id, changes)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        self.0.remove(id)
    }
}

#[test]
fn test_tree_read_failures_answer_empty_and_keep_serving() {
    let dir = TempDir::new().unwrap();
    let tab = Rc::new(RefCell::new(Some(PageInfo {
        title: "Docs".to_string(),
        url: "https://docs.rs".to_string(),
    })));
    let notes: Notes = Rc::default();
    let mut controller = Controller::new(
        NoSubTrees(SqliteBookmarkStore::in_memory().unwrap()),
        JsonFileStore::new(dir.path().join("sync.json")),
        JsonFileStore::new(dir.path().join("local.json")),
        Box::new(FixedTab(Rc::clone(&tab))),
        Box::new(RecordingNotifier(Rc::clone(&notes))),
        MarkConfig::default(),
    );

    assert_eq!(
        controller.handle(Request::GetAllBookmarks),
        Response::Bookmarks { bookmarks: vec![] }
    );
    assert_eq!(
        controller.handle(Request::GetFolderTree),
        Response::Folders { folders: vec![] }
    );

    assert_eq!(controller.handle(Request::BookmarkCurrent), Response::Ack);
    assert_eq!(
        notes.borrow().last().map(|(_, m)| m.as_str()),
        Some("Bookmark saved successfully!")
    );
    let Response::Recent { recent_bookmarks } = controller.handle(Request::GetRecentBookmarks)
    else {
        panic!("expected recent bookmarks");
    };
    assert_eq!(recent_bookmarks[0].title, "Docs");
}
