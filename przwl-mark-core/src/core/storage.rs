//! SQLite-backed [`BookmarkTree`].
//!
//! New databases are seeded with the host-style roots: `"0"` (the invisible
//! root), `"1"` ("Bookmarks bar") and `"2"` ("Other bookmarks"). The roots
//! cannot be edited or removed. Sibling positions are kept gapless.

use crate::{
    Bookmark, BookmarkTree, CreateDetails, Folder, MarkError, Node, NodeChanges, Result,
    SearchQuery,
};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

/// ID of the invisible root every other node descends from.
pub const ROOT_ID: &str = "0";

const PROTECTED_IDS: [&str; 3] = [ROOT_ID, "1", "2"];

const NODE_COLUMNS: &str = "id, parent_id, title, url, date_added";

pub struct SqliteBookmarkStore {
    conn: Connection,
}

impl SqliteBookmarkStore {
    /// Creates (or re-seeds) a bookmark database at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing bookmark database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkError::Collaborator`] if the file has no `nodes` table,
    /// or [`MarkError::Database`] if it is not a SQLite database at all.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'nodes'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(MarkError::Collaborator(
                "Not a valid przwl-mark bookmark database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    /// A throwaway store that lives only as long as the value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    fn load_children(&self, parent_id: &str) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE parent_id = ?1 ORDER BY position"
        ))?;
        let rows = stmt
            .query_map([parent_id], map_node_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|node| match node {
                Node::Folder(mut folder) => {
                    folder.children = self.load_children(&folder.id)?;
                    Ok(Node::Folder(folder))
                }
                bookmark => Ok(bookmark),
            })
            .collect()
    }
}

impl BookmarkTree for SqliteBookmarkStore {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Node>> {
        let mut clauses = Vec::new();
        let mut params: Vec<&str> = Vec::new();
        if let Some(title) = &query.title {
            clauses.push("title = ?");
            params.push(title);
        }
        if let Some(url) = &query.url {
            clauses.push("url = ?");
            params.push(url);
        }
        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE id <> '{ROOT_ID}' AND {}
             ORDER BY date_added, rowid",
            clauses.join(" AND ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let nodes = stmt
            .query_map(rusqlite::params_from_iter(params), map_node_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    fn get(&self, id: &str) -> Result<Node> {
        self.conn
            .query_row(
                &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
                [id],
                map_node_row,
            )
            .optional()?
            .ok_or_else(|| MarkError::NodeNotFound(id.to_string()))
    }

    fn get_sub_tree(&self, id: &str) -> Result<Node> {
        match self.get(id)? {
            Node::Folder(mut folder) => {
                folder.children = self.load_children(&folder.id)?;
                Ok(Node::Folder(folder))
            }
            bookmark => Ok(bookmark),
        }
    }

    fn get_tree(&self) -> Result<Vec<Node>> {
        Ok(vec![self.get_sub_tree(ROOT_ID)?])
    }

    fn create(&mut self, details: CreateDetails) -> Result<Node> {
        if details.parent_id == ROOT_ID {
            return Err(MarkError::InvalidNode(
                "Cannot create a node directly under the root".to_string(),
            ));
        }

        let tx = self.conn.transaction()?;

        let parent_url: Option<Option<String>> = tx
            .query_row(
                "SELECT url FROM nodes WHERE id = ?1",
                [&details.parent_id],
                |row| row.get(0),
            )
            .optional()?;
        match parent_url {
            None => return Err(MarkError::NodeNotFound(details.parent_id)),
            Some(Some(_)) => {
                return Err(MarkError::InvalidNode(format!(
                    "Cannot create a node inside bookmark {}",
                    details.parent_id
                )))
            }
            Some(None) => {}
        }

        let sibling_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1",
            [&details.parent_id],
            |row| row.get(0),
        )?;
        let position = details
            .index
            .map_or(sibling_count, |index| {
                i64::try_from(index).unwrap_or(i64::MAX).min(sibling_count)
            });

        // Make room at the insertion point.
        tx.execute(
            "UPDATE nodes SET position = position + 1 WHERE parent_id = ?1 AND position >= ?2",
            rusqlite::params![details.parent_id, position],
        )?;

        let id = Uuid::new_v4().to_string();
        let date_added = chrono::Utc::now().timestamp_millis();
        tx.execute(
            "INSERT INTO nodes (id, parent_id, title, url, position, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id,
                details.parent_id,
                details.title,
                details.url,
                position,
                date_added
            ],
        )?;
        tx.commit()?;

        log::debug!("created node {id} under {} at {position}", details.parent_id);
        self.get(&id)
    }

    fn update(&mut self, id: &str, changes: NodeChanges) -> Result<Node> {
        if PROTECTED_IDS.contains(&id) {
            return Err(MarkError::InvalidNode(format!("Cannot modify root folder {id}")));
        }
        let node = self.get(id)?;
        if node.is_folder() && changes.url.is_some() {
            return Err(MarkError::InvalidNode(format!(
                "Folder {id} cannot be given a URL"
            )));
        }

        let tx = self.conn.transaction()?;
        if let Some(title) = &changes.title {
            tx.execute(
                "UPDATE nodes SET title = ?1 WHERE id = ?2",
                rusqlite::params![title, id],
            )?;
        }
        if let Some(url) = &changes.url {
            tx.execute(
                "UPDATE nodes SET url = ?1 WHERE id = ?2",
                rusqlite::params![url, id],
            )?;
        }
        tx.commit()?;

        self.get(id)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        if PROTECTED_IDS.contains(&id) {
            return Err(MarkError::InvalidNode(format!("Cannot remove root folder {id}")));
        }

        let tx = self.conn.transaction()?;
        let (parent_id, position): (Option<String>, i64) = tx
            .query_row(
                "SELECT parent_id, position FROM nodes WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| MarkError::NodeNotFound(id.to_string()))?;

        let child_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        if child_count > 0 {
            return Err(MarkError::InvalidNode(format!("Folder {id} is not empty")));
        }

        tx.execute("DELETE FROM nodes WHERE id = ?1", [id])?;
        // Close the gap left behind.
        tx.execute(
            "UPDATE nodes SET position = position - 1 WHERE parent_id IS ?1 AND position > ?2",
            rusqlite::params![parent_id, position],
        )?;
        tx.commit()?;

        log::debug!("removed node {id}");
        Ok(())
    }
}

fn map_node_row(row: &rusqlite::Row) -> rusqlite::Result<Node> {
    let id: String = row.get(0)?;
    let parent_id: Option<String> = row.get(1)?;
    let title: String = row.get(2)?;
    let url: Option<String> = row.get(3)?;
    let date_added: i64 = row.get(4)?;

    Ok(match url {
        Some(url) => Node::Bookmark(Bookmark {
            id,
            title,
            url,
            parent_id,
            date_added: Some(date_added),
        }),
        None => Node::Folder(Folder {
            id,
            title,
            parent_id,
            date_added: Some(date_added),
            children: Vec::new(),
        }),
    })
}
