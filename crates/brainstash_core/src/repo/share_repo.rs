//! Share-link repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist bearer capability tokens bound to one owner each.
//! - Serve the anonymous read path: token -> owner -> current content set.
//!
//! # Invariants
//! - The `owner_uuid UNIQUE` constraint decides races between concurrent
//!   `insert_link` calls; at most one can succeed.
//! - `contents_for_owner` runs the live owner-content query; there is no
//!   snapshot taken at issuance time.

use rusqlite::Connection;

use crate::model::content::OwnerId;
use crate::model::share::ShareLink;
use crate::repo::content_repo::{load_contents_for_owner, ContentRecord};
use crate::repo::{is_unique_violation, parse_uuid, RepoError, RepoResult};

/// Repository interface for share-link storage.
pub trait ShareLinkRepository {
    /// Inserts one link; fails with `Conflict` when the owner already has
    /// an active link.
    fn insert_link(&self, link: &ShareLink) -> RepoResult<()>;
    /// Deletes the owner's active link; fails with `NotFound` when none
    /// exists.
    fn delete_link_for_owner(&self, owner: OwnerId) -> RepoResult<()>;
    /// Resolves one token to the owner it was issued for.
    fn owner_for_token(&self, token: &str) -> RepoResult<Option<OwnerId>>;
    /// Returns the owner's current content set (live, never cached).
    fn contents_for_owner(&self, owner: OwnerId) -> RepoResult<Vec<ContentRecord>>;
}

/// SQLite-backed share-link repository.
pub struct SqliteShareLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShareLinkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ShareLinkRepository for SqliteShareLinkRepository<'_> {
    fn insert_link(&self, link: &ShareLink) -> RepoResult<()> {
        let inserted = self.conn.execute(
            "INSERT INTO share_links (token, owner_uuid) VALUES (?1, ?2);",
            [link.token.as_str(), link.owner.to_string().as_str()],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::Conflict("share_links.owner_uuid"))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_link_for_owner(&self, owner: OwnerId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM share_links WHERE owner_uuid = ?1;",
            [owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(owner));
        }

        Ok(())
    }

    fn owner_for_token(&self, token: &str) -> RepoResult<Option<OwnerId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT owner_uuid FROM share_links WHERE token = ?1;")?;
        let mut rows = stmt.query([token])?;
        if let Some(row) = rows.next()? {
            let owner_text: String = row.get(0)?;
            return Ok(Some(parse_uuid(&owner_text, "share_links.owner_uuid")?));
        }
        Ok(None)
    }

    fn contents_for_owner(&self, owner: OwnerId) -> RepoResult<Vec<ContentRecord>> {
        load_contents_for_owner(self.conn, owner)
    }
}
