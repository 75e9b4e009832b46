//! Locating the canonical folder bookmarks are saved into.
//!
//! Resolution order: the persisted folder ID, then the first folder whose
//! title is the configured name, then a newly created folder under the
//! configured default parent. A stale or failing ID is never an error here;
//! it just moves resolution on to the next step.

use crate::{
    store_folder_id, BookmarkTree, CreateDetails, Folder, KeyValueStore, MarkConfig, Node,
    Result, SearchQuery, FOLDER_ID_KEY,
};
use serde_json::Value;

/// How the canonical folder was found.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The persisted ID still points at a folder.
    Stored(Folder),
    /// An existing folder was found by title.
    Found(Folder),
    /// No folder existed; one was created.
    Created(Folder),
}

impl Resolution {
    #[must_use]
    pub fn folder(&self) -> &Folder {
        match self {
            Self::Stored(f) | Self::Found(f) | Self::Created(f) => f,
        }
    }

    #[must_use]
    pub fn into_folder(self) -> Folder {
        match self {
            Self::Stored(f) | Self::Found(f) | Self::Created(f) => f,
        }
    }

    /// Whether the persisted folder ID must be updated to match.
    #[must_use]
    pub fn is_rebound(&self) -> bool {
        !matches!(self, Self::Stored(_))
    }
}

#[derive(Debug, Clone)]
pub struct FolderResolver {
    title: String,
    default_parent_id: String,
}

impl FolderResolver {
    #[must_use]
    pub fn new(config: &MarkConfig) -> Self {
        Self {
            title: config.folder_title.clone(),
            default_parent_id: config.default_parent_id.clone(),
        }
    }

    /// Resolves the canonical folder starting from `stored_id`.
    ///
    /// Only the final fallback writes to `tree`. Nothing is persisted; see
    /// [`Self::resolve_and_persist`].
    ///
    /// # Errors
    ///
    /// Fails only if the title search or the folder creation fails.
    pub fn resolve(
        &self,
        tree: &mut dyn BookmarkTree,
        stored_id: Option<&str>,
    ) -> Result<Resolution> {
        if let Some(id) = stored_id {
            match tree.get(id) {
                Ok(Node::Folder(folder)) => return Ok(Resolution::Stored(folder)),
                Ok(Node::Bookmark(_)) => {
                    log::warn!("stored folder id {id} points at a bookmark; looking up by title");
                }
                Err(e) => {
                    log::warn!("stored folder id {id} did not resolve ({e}); looking up by title");
                }
            }
        }
        self.find_or_create(tree)
    }

    /// Resolves the canonical folder from the persisted preferences and writes
    /// back its ID when resolution had to fall back.
    pub fn resolve_and_persist(
        &self,
        tree: &mut dyn BookmarkTree,
        prefs: &mut dyn KeyValueStore,
    ) -> Result<Folder> {
        let stored = stored_folder_id(prefs);
        let resolution = self.resolve(tree, stored.as_deref())?;
        if resolution.is_rebound() {
            store_folder_id(prefs, &resolution.folder().id)?;
        }
        Ok(resolution.into_folder())
    }

    /// Binds the canonical folder by title alone, ignoring any persisted ID.
    ///
    /// Used on install, when a previously persisted ID cannot be trusted.
    pub fn bind(
        &self,
        tree: &mut dyn BookmarkTree,
        prefs: &mut dyn KeyValueStore,
    ) -> Result<Folder> {
        let folder = self.find_or_create(tree)?.into_folder();
        store_folder_id(prefs, &folder.id)?;
        Ok(folder)
    }

    fn find_or_create(&self, tree: &mut dyn BookmarkTree) -> Result<Resolution> {
        let existing = tree
            .search(&SearchQuery::by_title(self.title.as_str()))?
            .into_iter()
            .find_map(|node| match node {
                Node::Folder(folder) => Some(folder),
                Node::Bookmark(_) => None,
            });
        if let Some(folder) = existing {
            log::info!("using existing folder '{}' ({})", self.title, folder.id);
            return Ok(Resolution::Found(folder));
        }

        let folder = tree
            .create(CreateDetails::folder_first(
                self.default_parent_id.as_str(),
                self.title.as_str(),
            ))?
            .into_folder()?;
        log::info!("created folder '{}' ({})", self.title, folder.id);
        Ok(Resolution::Created(folder))
    }
}

/// Reads only the persisted folder ID. Anything unusable counts as absent.
fn stored_folder_id(prefs: &dyn KeyValueStore) -> Option<String> {
    match prefs.get(&[FOLDER_ID_KEY]) {
        Ok(mut values) => match values.remove(FOLDER_ID_KEY) {
            Some(Value::String(id)) => Some(id),
            Some(Value::Null) | None => None,
            Some(other) => {
                log::warn!("ignoring non-string {FOLDER_ID_KEY} {other}");
                None
            }
        },
        Err(e) => {
            log::warn!("could not read {FOLDER_ID_KEY} ({e}); looking up by title");
            None
        }
    }
}
