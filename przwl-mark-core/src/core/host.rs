//! Browser-side services the controller calls but does not own.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Title and URL of the page to save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
}

/// Source of the currently active tab.
pub trait ActiveTab {
    fn active_tab(&self) -> Result<PageInfo>;
}

/// User-visible notifications.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str) -> Result<()>;
}

/// Named global shortcuts the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    QuickBookmark,
}

impl HostCommand {
    /// Maps a shortcut name to a command; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "quick-bookmark" => Some(Self::QuickBookmark),
            _ => None,
        }
    }
}
