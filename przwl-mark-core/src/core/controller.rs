//! The background controller: one entry point per host event.
//!
//! Every collaborator failure is caught here, logged, and turned into a
//! response payload or a notification. Nothing escapes [`Controller::handle`],
//! so the controller is always ready for the next request.

use crate::{
    load_recent, render_folders, store_dark_mode, store_folder_id, store_read_later,
    ActiveTab, BookmarkRecorder, BookmarkTree, CreateDetails, Folder, HostCommand, KeyValueStore,
    MarkConfig, MarkError, Node, NodeChanges, Notifier, Preferences, RecordOutcome, Request,
    Response, Result,
};

const SAVED_MESSAGE: &str = "Bookmark saved successfully!";
const DUPLICATE_MESSAGE: &str = "Bookmark already exists!";
const SAVE_FAILED_MESSAGE: &str = "Error saving bookmark. Please try again.";

/// Owns the bookmark tree, both preference scopes, and the host services.
///
/// `synced` holds [`Preferences`]; `local` holds the recency list.
pub struct Controller<B, K> {
    tree: B,
    synced: K,
    local: K,
    tabs: Box<dyn ActiveTab>,
    notifier: Box<dyn Notifier>,
    config: MarkConfig,
    recorder: BookmarkRecorder,
}

impl<B: BookmarkTree, K: KeyValueStore> Controller<B, K> {
    pub fn new(
        tree: B,
        synced: K,
        local: K,
        tabs: Box<dyn ActiveTab>,
        notifier: Box<dyn Notifier>,
        config: MarkConfig,
    ) -> Self {
        let recorder = BookmarkRecorder::new(&config);
        Self {
            tree,
            synced,
            local,
            tabs,
            notifier,
            config,
            recorder,
        }
    }

    pub fn tree(&self) -> &B {
        &self.tree
    }

    pub fn synced(&self) -> &K {
        &self.synced
    }

    pub fn local(&self) -> &K {
        &self.local
    }

    /// Binds the canonical folder by title when the extension is installed.
    pub fn on_installed(&mut self) {
        match self
            .recorder
            .resolver()
            .bind(&mut self.tree, &mut self.synced)
        {
            Ok(folder) => log::info!("bound canonical folder {}", folder.id),
            Err(e) => log::error!("failed to initialise '{}' folder: {e}", self.config.folder_title),
        }
    }

    /// Reacts to a global shortcut by name.
    pub fn on_command(&mut self, name: &str) -> Option<RecordOutcome> {
        match HostCommand::parse(name) {
            Some(HostCommand::QuickBookmark) => self.bookmark_current(),
            None => {
                log::debug!("ignoring unknown command '{name}'");
                None
            }
        }
    }

    /// Saves the active tab and tells the user how it went.
    ///
    /// Returns `None` when saving failed; the failure has already been
    /// reported through the notifier.
    pub fn bookmark_current(&mut self) -> Option<RecordOutcome> {
        match self.try_bookmark_current() {
            Ok(outcome) => {
                let message = match &outcome {
                    RecordOutcome::Created { .. } => SAVED_MESSAGE,
                    RecordOutcome::AlreadyExists { .. } => DUPLICATE_MESSAGE,
                };
                self.notify(message);
                Some(outcome)
            }
            Err(e) => {
                log::error!("error saving bookmark: {e}");
                self.notify(SAVE_FAILED_MESSAGE);
                None
            }
        }
    }

    fn try_bookmark_current(&mut self) -> Result<RecordOutcome> {
        let page = self.tabs.active_tab()?;
        self.recorder.record(
            &mut self.tree,
            &mut self.synced,
            &mut self.local,
            &page,
            chrono::Utc::now(),
        )
    }

    /// Dispatches one popup request to completion.
    pub fn handle(&mut self, request: Request) -> Response {
        log::debug!("handling {request:?}");
        match request {
            Request::BookmarkCurrent => {
                self.bookmark_current();
                Response::Ack
            }
            Request::GetRecentBookmarks => {
                let recent_bookmarks = load_recent(&self.local).unwrap_or_else(|e| {
                    log::error!("error reading recent bookmarks: {e}");
                    Vec::new()
                });
                Response::Recent { recent_bookmarks }
            }
            Request::GetAllBookmarks => {
                let bookmarks = self.all_bookmarks().unwrap_or_else(|e| {
                    log::error!("error getting bookmarks: {e}");
                    Vec::new()
                });
                Response::Bookmarks { bookmarks }
            }
            Request::CreateFolder { title } => match self.create_folder(&title) {
                Ok(folder) => Response::created(folder),
                Err(e) => Self::failed("creating folder", &e),
            },
            Request::GetFolderTree => {
                let folders = self
                    .tree
                    .get_tree()
                    .map(|forest| render_folders(&forest))
                    .unwrap_or_else(|e| {
                        log::error!("error loading folders: {e}");
                        Vec::new()
                    });
                Response::Folders { folders }
            }
            Request::ChooseFolder { folder_id } => match self.choose_folder(&folder_id) {
                Ok(()) => Response::ok(),
                Err(e) => Self::failed("choosing folder", &e),
            },
            Request::UpdateBookmark { id, title, url } => {
                let changes = NodeChanges {
                    title: Some(title),
                    url: Some(url),
                };
                match self.tree.update(&id, changes) {
                    Ok(_) => Response::ok(),
                    Err(e) => Self::failed("updating bookmark", &e),
                }
            }
            // An already-removed id is reported as not found; there is no local guard.
            Request::RemoveBookmark { id } => match self.tree.remove(&id) {
                Ok(()) => Response::ok(),
                Err(e) => Self::failed("deleting bookmark", &e),
            },
            Request::GetPreferences => {
                let prefs = Preferences::load(&self.synced).unwrap_or_else(|e| {
                    log::error!("error reading preferences: {e}");
                    Preferences::default()
                });
                Response::Preferences {
                    dark_mode: prefs.dark_mode,
                    read_later: prefs.read_later,
                    theme_label: prefs.theme().toggle_label().to_string(),
                }
            }
            Request::SetPreferences {
                dark_mode,
                read_later,
            } => match self.set_preferences(dark_mode, read_later) {
                Ok(()) => Response::ok(),
                Err(e) => Self::failed("saving preferences", &e),
            },
        }
    }

    fn canonical_folder(&mut self) -> Result<Folder> {
        self.recorder
            .resolver()
            .resolve_and_persist(&mut self.tree, &mut self.synced)
    }

    fn all_bookmarks(&mut self) -> Result<Vec<Node>> {
        let folder = self.canonical_folder()?;
        Ok(vec![self.tree.get_sub_tree(&folder.id)?])
    }

    fn create_folder(&mut self, title: &str) -> Result<Node> {
        let title = title.trim();
        if title.is_empty() {
            return Err(MarkError::ValidationFailed(
                "Please enter a folder name".to_string(),
            ));
        }
        let parent = self.canonical_folder()?;
        self.tree
            .create(CreateDetails::folder_first(parent.id, title))
    }

    fn choose_folder(&mut self, folder_id: &str) -> Result<()> {
        let folder = self.tree.get(folder_id)?.into_folder()?;
        if folder.parent_id.is_none() {
            return Err(MarkError::InvalidNode(
                "Bookmarks cannot be saved into the root folder".to_string(),
            ));
        }
        store_folder_id(&mut self.synced, &folder.id)?;
        log::info!("canonical folder set to '{}' ({})", folder.title, folder.id);
        Ok(())
    }

    fn set_preferences(&mut self, dark_mode: Option<bool>, read_later: Option<bool>) -> Result<()> {
        if let Some(enabled) = dark_mode {
            store_dark_mode(&mut self.synced, enabled)?;
        }
        if let Some(enabled) = read_later {
            store_read_later(&mut self.synced, enabled)?;
        }
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        if let Err(e) = self.notifier.notify(&self.config.notification_title, message) {
            log::warn!("notification '{message}' not shown: {e}");
        }
    }

    fn failed(action: &str, error: &MarkError) -> Response {
        log::error!("error {action}: {error}");
        Response::failure(error)
    }
}
