//! Content repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist owner-scoped content rows plus their tag links.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create_content` writes the content row and all tag links in one
//!   transaction; a content is never visible without its resolved tags.
//! - All reads and deletes are constrained by `owner_uuid`; a foreign
//!   content is indistinguishable from a missing one.

use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::model::content::{Content, ContentId, ContentKind, OwnerId, TagId};
use crate::repo::tag_repo::{find_tag_id, insert_tag_row, list_tag_rows, TagRepository};
use crate::repo::{parse_uuid, RepoError, RepoResult};

const CONTENT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    link,
    kind,
    title,
    created_at,
    updated_at
FROM contents";

/// Read model for content list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub content_id: ContentId,
    pub owner_id: OwnerId,
    pub link: String,
    pub kind: ContentKind,
    pub title: String,
    /// Attached tag titles, sorted.
    pub tags: Vec<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Repository interface for content CRUD operations.
///
/// `TagRepository` is a supertrait: content creation resolves tags against
/// the same store it writes content to.
pub trait ContentRepository: TagRepository {
    /// Persists one content row and its tag links atomically.
    fn create_content(&mut self, content: &Content, tag_ids: &[TagId]) -> RepoResult<ContentId>;
    /// Gets one owner-scoped content by id.
    fn get_content(&self, owner: OwnerId, content_id: ContentId)
        -> RepoResult<Option<ContentRecord>>;
    /// Lists the owner's contents, `updated_at DESC, uuid ASC`.
    fn list_contents(&self, owner: OwnerId) -> RepoResult<Vec<ContentRecord>>;
    /// Hard-deletes one owner-scoped content and its tag links.
    fn delete_content(&mut self, owner: OwnerId, content_id: ContentId) -> RepoResult<()>;
}

/// SQLite-backed content repository.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteContentRepository<'_> {
    fn find_tag_by_title(&self, title: &str) -> RepoResult<Option<TagId>> {
        find_tag_id(self.conn, title)
    }

    fn insert_tag(&self, title: &str) -> RepoResult<TagId> {
        insert_tag_row(self.conn, title)
    }

    fn list_tags(&self) -> RepoResult<Vec<crate::model::content::Tag>> {
        list_tag_rows(self.conn)
    }
}

impl ContentRepository for SqliteContentRepository<'_> {
    fn create_content(&mut self, content: &Content, tag_ids: &[TagId]) -> RepoResult<ContentId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO contents (uuid, owner_uuid, link, kind, title)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                content.uuid.to_string(),
                content.owner.to_string(),
                content.link.as_str(),
                content.kind.as_str(),
                content.title.as_str(),
            ],
        )?;

        for tag_id in tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO content_tags (content_uuid, tag_id) VALUES (?1, ?2);",
                params![content.uuid.to_string(), tag_id],
            )?;
        }

        tx.commit()?;
        Ok(content.uuid)
    }

    fn get_content(
        &self,
        owner: OwnerId,
        content_id: ContentId,
    ) -> RepoResult<Option<ContentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTENT_SELECT_SQL}
             WHERE uuid = ?1
               AND owner_uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![content_id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_content_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn list_contents(&self, owner: OwnerId) -> RepoResult<Vec<ContentRecord>> {
        load_contents_for_owner(self.conn, owner)
    }

    fn delete_content(&mut self, owner: OwnerId, content_id: ContentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM contents WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![content_id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(content_id));
        }

        Ok(())
    }
}

/// Loads the owner's full content set, newest first.
///
/// Shared by the owner list view and the share-link read path, which
/// re-evaluates this query live on every access.
pub(crate) fn load_contents_for_owner(
    conn: &Connection,
    owner: OwnerId,
) -> RepoResult<Vec<ContentRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{CONTENT_SELECT_SQL}
         WHERE owner_uuid = ?1
         ORDER BY updated_at DESC, uuid ASC;"
    ))?;

    let mut rows = stmt.query([owner.to_string()])?;
    let mut contents = Vec::new();
    while let Some(row) = rows.next()? {
        contents.push(parse_content_row(conn, row)?);
    }

    Ok(contents)
}

pub(crate) fn load_tags_for_content(conn: &Connection, content_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.title
         FROM content_tags ct
         INNER JOIN tags t ON t.id = ct.tag_id
         WHERE ct.content_uuid = ?1
         ORDER BY t.title ASC;",
    )?;
    let mut rows = stmt.query([content_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn parse_content_row(conn: &Connection, row: &Row<'_>) -> RepoResult<ContentRecord> {
    let uuid_text: String = row.get("uuid")?;
    let content_id = parse_uuid(&uuid_text, "contents.uuid")?;

    let owner_text: String = row.get("owner_uuid")?;
    let owner_id = parse_uuid(&owner_text, "contents.owner_uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = ContentKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid content kind `{kind_text}` in contents.kind"))
    })?;

    let tags = load_tags_for_content(conn, &uuid_text)?;

    Ok(ContentRecord {
        content_id,
        owner_id,
        link: row.get("link")?,
        kind,
        title: row.get("title")?,
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
