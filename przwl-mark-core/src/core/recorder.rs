//! Saving a page into the canonical folder and logging it as recent.

use crate::{
    Bookmark, BookmarkTree, CreateDetails, FolderResolver, KeyValueStore, MarkConfig, PageInfo,
    Result, SearchQuery, ValueMap,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the recency list in the device-local scope.
pub const RECENT_KEY: &str = "recentBookmarks";

/// Snapshot of a bookmark taken when it was saved.
///
/// Later edits to the bookmark are not reflected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub date_added: DateTime<Utc>,
}

/// Reads the recency list, most recent first. Absent means empty.
pub fn load_recent(store: &dyn KeyValueStore) -> Result<Vec<RecentEntry>> {
    match store.get(&[RECENT_KEY])?.remove(RECENT_KEY) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Prepends `entry` and keeps at most `limit` entries.
///
/// Read-then-write: two interleaved pushes can lose one entry.
pub fn push_recent(
    store: &mut dyn KeyValueStore,
    entry: RecentEntry,
    limit: usize,
) -> Result<Vec<RecentEntry>> {
    let mut entries = load_recent(store)?;
    entries.insert(0, entry);
    entries.truncate(limit);

    let mut values = ValueMap::new();
    values.insert(RECENT_KEY.to_string(), serde_json::to_value(&entries)?);
    store.set(values)?;
    Ok(entries)
}

/// Result of [`BookmarkRecorder::record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// A new bookmark was created at the front of the canonical folder.
    Created {
        bookmark: Bookmark,
        /// Set when the bookmark was saved but the recency list could not be updated.
        recent_error: Option<String>,
    },
    /// The canonical folder already holds this URL; nothing was changed.
    AlreadyExists { existing_id: String },
}

#[derive(Debug, Clone)]
pub struct BookmarkRecorder {
    resolver: FolderResolver,
    recent_limit: usize,
}

impl BookmarkRecorder {
    #[must_use]
    pub fn new(config: &MarkConfig) -> Self {
        Self {
            resolver: FolderResolver::new(config),
            recent_limit: config.recent_limit,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &FolderResolver {
        &self.resolver
    }

    /// Saves `page` into the canonical folder unless its URL is already there.
    ///
    /// Duplicates are detected by exact URL among the folder's direct children
    /// only. The recency list is touched only after a successful create, and a
    /// failure there does not undo the bookmark.
    ///
    /// # Errors
    ///
    /// Returns an error if folder resolution, the URL search, or the create fails.
    pub fn record(
        &self,
        tree: &mut dyn BookmarkTree,
        synced: &mut dyn KeyValueStore,
        local: &mut dyn KeyValueStore,
        page: &PageInfo,
        now: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let folder = self.resolver.resolve_and_persist(tree, synced)?;

        let duplicate = tree
            .search(&SearchQuery::by_url(page.url.as_str()))?
            .into_iter()
            .find(|node| node.parent_id() == Some(folder.id.as_str()));
        if let Some(existing) = duplicate {
            log::debug!("{} already saved as {}", page.url, existing.id());
            return Ok(RecordOutcome::AlreadyExists {
                existing_id: existing.id().to_string(),
            });
        }

        let bookmark = tree
            .create(CreateDetails::bookmark_first(
                folder.id.as_str(),
                page.title.as_str(),
                page.url.as_str(),
            ))?
            .into_bookmark()?;

        let entry = RecentEntry {
            id: bookmark.id.clone(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            date_added: now,
        };
        let recent_error = match push_recent(local, entry, self.recent_limit) {
            Ok(_) => None,
            Err(e) => {
                log::error!("bookmark {} saved but recent list not updated: {e}", bookmark.id);
                Some(e.user_message())
            }
        };

        Ok(RecordOutcome::Created {
            bookmark,
            recent_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonFileStore, MarkError, Node, SqliteBookmarkStore};
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct Scratch {
        _dir: TempDir,
        tree: SqliteBookmarkStore,
        synced: JsonFileStore,
        local: JsonFileStore,
    }

    fn scratch() -> Scratch {
        let dir = TempDir::new().unwrap();
        Scratch {
            synced: JsonFileStore::new(dir.path().join("sync.json")),
            local: JsonFileStore::new(dir.path().join("local.json")),
            tree: SqliteBookmarkStore::in_memory().unwrap(),
            _dir: dir,
        }
    }

    fn page(n: usize) -> PageInfo {
        PageInfo {
            title: format!("Page {n}"),
            url: format!("https://example.com/{n}"),
        }
    }

    fn at(second: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + second, 0).unwrap()
    }

    /// A local scope that refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _keys: &[&str]) -> Result<ValueMap> {
            Ok(ValueMap::new())
        }

        fn set(&mut self, _values: ValueMap) -> Result<()> {
            Err(MarkError::Collaborator("storage quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_record_creates_at_front_of_folder() {
        let mut s = scratch();
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        recorder.record(&mut s.tree, &mut s.synced, &mut s.local, &page(1), at(1)).unwrap();
        let outcome = recorder
            .record(&mut s.tree, &mut s.synced, &mut s.local, &page(2), at(2))
            .unwrap();

        let RecordOutcome::Created { bookmark, recent_error } = outcome else {
            panic!("expected Created");
        };
        assert!(recent_error.is_none());
        let folder = s
            .tree
            .get_sub_tree(bookmark.parent_id.as_deref().unwrap())
            .unwrap()
            .into_folder()
            .unwrap();
        assert_eq!(folder.children[0].id(), bookmark.id);
        assert_eq!(folder.children.len(), 2);
    }

    #[test]
    fn test_record_same_url_twice_is_deduplicated() {
        let mut s = scratch();
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        recorder.record(&mut s.tree, &mut s.synced, &mut s.local, &page(1), at(1)).unwrap();
        let second = recorder
            .record(&mut s.tree, &mut s.synced, &mut s.local, &page(1), at(2))
            .unwrap();

        assert!(matches!(second, RecordOutcome::AlreadyExists { .. }));
        assert_eq!(
            s.tree.search(&SearchQuery::by_url("https://example.com/1")).unwrap().len(),
            1
        );
        assert_eq!(load_recent(&s.local).unwrap().len(), 1);
    }

    #[test]
    fn test_same_url_elsewhere_is_not_a_duplicate() {
        let mut s = scratch();
        s.tree
            .create(CreateDetails::bookmark_first("2", "Page 1", "https://example.com/1"))
            .unwrap();
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        let outcome = recorder
            .record(&mut s.tree, &mut s.synced, &mut s.local, &page(1), at(1))
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::Created { .. }));
    }

    #[test]
    fn test_recent_list_is_capped_most_recent_first() {
        let mut s = scratch();
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        for n in 1..=11 {
            recorder
                .record(&mut s.tree, &mut s.synced, &mut s.local, &page(n), at(n as i64))
                .unwrap();
        }

        let recent = load_recent(&s.local).unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].url, "https://example.com/11");
        assert_eq!(recent[0].date_added, at(11));
        assert_eq!(recent[9].url, "https://example.com/2");
        assert!(recent.iter().all(|e| e.url != "https://example.com/1"));
    }

    #[test]
    fn test_recent_failure_keeps_bookmark() {
        let mut s = scratch();
        let mut local = ReadOnlyStore;
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        let outcome = recorder
            .record(&mut s.tree, &mut s.synced, &mut local, &page(1), at(1))
            .unwrap();

        let RecordOutcome::Created { bookmark, recent_error } = outcome else {
            panic!("expected Created");
        };
        assert_eq!(recent_error.as_deref(), Some("storage quota exceeded"));
        assert!(matches!(s.tree.get(&bookmark.id).unwrap(), Node::Bookmark(_)));
    }

    #[test]
    fn test_recent_entries_serialize_iso_dates() {
        let mut s = scratch();
        let entry = RecentEntry {
            id: "1".to_string(),
            title: "t".to_string(),
            url: "https://t.test".to_string(),
            date_added: at(0),
        };
        push_recent(&mut s.local, entry, 10).unwrap();

        let raw = std::fs::read_to_string(s.local.path()).unwrap();
        assert!(raw.contains("\"dateAdded\": \"2023-11-14T22:13:20"));
    }

    #[test]
    fn test_record_survives_mistyped_preference() {
        let mut s = scratch();
        std::fs::write(s.synced.path(), r#"{"darkMode": "yes"}"#).unwrap();
        let recorder = BookmarkRecorder::new(&MarkConfig::default());

        let outcome = recorder
            .record(&mut s.tree, &mut s.synced, &mut s.local, &page(1), at(1))
            .unwrap();

        assert!(matches!(outcome, RecordOutcome::Created { .. }));
    }
}
