//! Tag persistence primitives over the `tags(title UNIQUE)` table.
//!
//! # Responsibility
//! - Provide exact-match lookup and constrained insert for canonical tags.
//!
//! # Invariants
//! - Titles are matched byte-exact (case-sensitive); callers pre-trim.
//! - `insert_tag` surfaces a lost creation race as `RepoError::Conflict` so
//!   the resolver can retry the lookup. Correct across independent
//!   processes sharing one database file.

use rusqlite::Connection;

use crate::model::content::{Tag, TagId};
use crate::repo::{is_unique_violation, RepoError, RepoResult};

/// Repository interface for canonical tag storage.
pub trait TagRepository {
    /// Looks up one tag id by exact title match.
    fn find_tag_by_title(&self, title: &str) -> RepoResult<Option<TagId>>;
    /// Inserts one tag row; fails with `Conflict` when the title exists.
    fn insert_tag(&self, title: &str) -> RepoResult<TagId>;
    /// Returns all known tags sorted by title.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn find_tag_by_title(&self, title: &str) -> RepoResult<Option<TagId>> {
        find_tag_id(self.conn, title)
    }

    fn insert_tag(&self, title: &str) -> RepoResult<TagId> {
        insert_tag_row(self.conn, title)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        list_tag_rows(self.conn)
    }
}

pub(crate) fn find_tag_id(conn: &Connection, title: &str) -> RepoResult<Option<TagId>> {
    let mut stmt = conn.prepare("SELECT id FROM tags WHERE title = ?1;")?;
    let mut rows = stmt.query([title])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

pub(crate) fn insert_tag_row(conn: &Connection, title: &str) -> RepoResult<TagId> {
    match conn.execute("INSERT INTO tags (title) VALUES (?1);", [title]) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict("tags.title")),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn list_tag_rows(conn: &Connection) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare("SELECT id, title FROM tags ORDER BY title ASC;")?;
    let mut rows = stmt.query([])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get(0)?,
            title: row.get(1)?,
        });
    }
    Ok(tags)
}
