//! Chat session repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own session lifecycle rows and the append-only transcript.
//! - Provide the link-free content digest consumed by prompt assembly.
//!
//! # Invariants
//! - `append_turn` writes both messages and the `last_activity` bump in a
//!   single immediate transaction; no reader ever observes a lone user
//!   message.
//! - Message order is an explicit per-session `seq`, assigned inside the
//!   append transaction; transcripts are never reordered or edited.
//! - `get_session` folds the ownership check into the SQL predicate, so a
//!   foreign session reads exactly like a missing one.
//! - The digest query must not select the `link` column; it is the privacy
//!   boundary between stored content and the externally-sent prompt.

use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::model::chat::{ChatSession, MessageId, MessageRole, SessionId};
use crate::model::content::{ContentKind, OwnerId};
use crate::repo::content_repo::load_tags_for_content;
use crate::repo::{parse_uuid, RepoError, RepoResult};

/// Read model for one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub owner_id: OwnerId,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds; bumped by every appended turn.
    pub last_activity: i64,
}

/// Read model for one transcript message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub message_id: MessageId,
    pub session_id: SessionId,
    /// Per-session monotonic position.
    pub seq: i64,
    pub role: MessageRole,
    pub content: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Link-free projection of one content item for prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub title: String,
    pub kind: ContentKind,
    pub tags: Vec<String>,
}

/// Repository interface for chat session storage.
pub trait ChatSessionRepository {
    /// Persists one empty session and returns its stored record.
    fn create_session(&self, session: &ChatSession) -> RepoResult<SessionRecord>;
    /// Gets one session, owner-scoped.
    fn get_session(&self, session_id: SessionId, owner: OwnerId)
        -> RepoResult<Option<SessionRecord>>;
    /// Returns the last `limit` messages in chronological order.
    fn recent_messages(&self, session_id: SessionId, limit: u32) -> RepoResult<Vec<MessageRecord>>;
    /// Returns the full transcript in `seq` order.
    fn list_messages(&self, session_id: SessionId) -> RepoResult<Vec<MessageRecord>>;
    /// Appends a user/assistant pair atomically and bumps `last_activity`.
    fn append_turn(
        &mut self,
        session_id: SessionId,
        user_text: &str,
        assistant_text: &str,
    ) -> RepoResult<(MessageRecord, MessageRecord)>;
    /// Returns the owner's content set projected to title/kind/tags only.
    fn content_digest(&self, owner: OwnerId) -> RepoResult<Vec<ContentDigest>>;
}

/// SQLite-backed chat session repository.
pub struct SqliteChatSessionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteChatSessionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ChatSessionRepository for SqliteChatSessionRepository<'_> {
    fn create_session(&self, session: &ChatSession) -> RepoResult<SessionRecord> {
        self.conn.execute(
            "INSERT INTO chat_sessions (uuid, owner_uuid) VALUES (?1, ?2);",
            [session.uuid.to_string(), session.owner.to_string()],
        )?;

        self.get_session(session.uuid, session.owner)?
            .ok_or_else(|| {
                RepoError::InvalidData("created session not found in read-back".to_string())
            })
    }

    fn get_session(
        &self,
        session_id: SessionId,
        owner: OwnerId,
    ) -> RepoResult<Option<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, owner_uuid, created_at, last_activity
             FROM chat_sessions
             WHERE uuid = ?1
               AND owner_uuid = ?2;",
        )?;

        let mut rows = stmt.query([session_id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_session_row(row)?));
        }

        Ok(None)
    }

    fn recent_messages(&self, session_id: SessionId, limit: u32) -> RepoResult<Vec<MessageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, session_uuid, seq, role, content, created_at
             FROM chat_messages
             WHERE session_uuid = ?1
             ORDER BY seq DESC
             LIMIT ?2;",
        )?;

        let mut rows = stmt.query(params![session_id.to_string(), limit])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(parse_message_row(row)?);
        }

        messages.reverse();
        Ok(messages)
    }

    fn list_messages(&self, session_id: SessionId) -> RepoResult<Vec<MessageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, session_uuid, seq, role, content, created_at
             FROM chat_messages
             WHERE session_uuid = ?1
             ORDER BY seq ASC;",
        )?;

        let mut rows = stmt.query([session_id.to_string()])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(parse_message_row(row)?);
        }

        Ok(messages)
    }

    fn append_turn(
        &mut self,
        session_id: SessionId,
        user_text: &str,
        assistant_text: &str,
    ) -> RepoResult<(MessageRecord, MessageRecord)> {
        let session_uuid = session_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !session_exists_in_tx(&tx, session_uuid.as_str())? {
            return Err(RepoError::NotFound(session_id));
        }

        let next_seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), -1) + 1 FROM chat_messages WHERE session_uuid = ?1;",
            [session_uuid.as_str()],
            |row| row.get(0),
        )?;

        let user = insert_message_in_tx(&tx, session_id, next_seq, MessageRole::User, user_text)?;
        let assistant = insert_message_in_tx(
            &tx,
            session_id,
            next_seq + 1,
            MessageRole::Assistant,
            assistant_text,
        )?;

        tx.execute(
            "UPDATE chat_sessions
             SET last_activity = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [session_uuid.as_str()],
        )?;

        tx.commit()?;
        Ok((user, assistant))
    }

    fn content_digest(&self, owner: OwnerId) -> RepoResult<Vec<ContentDigest>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, kind
             FROM contents
             WHERE owner_uuid = ?1
             ORDER BY updated_at DESC, uuid ASC;",
        )?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut digest = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let kind_text: String = row.get("kind")?;
            let kind = ContentKind::parse(&kind_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid content kind `{kind_text}` in contents.kind"
                ))
            })?;
            digest.push(ContentDigest {
                title: row.get("title")?,
                kind,
                tags: load_tags_for_content(self.conn, &uuid_text)?,
            });
        }

        Ok(digest)
    }
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<SessionRecord> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;

    Ok(SessionRecord {
        session_id: parse_uuid(&uuid_text, "chat_sessions.uuid")?,
        owner_id: parse_uuid(&owner_text, "chat_sessions.owner_uuid")?,
        created_at: row.get("created_at")?,
        last_activity: row.get("last_activity")?,
    })
}

fn parse_message_row(row: &Row<'_>) -> RepoResult<MessageRecord> {
    let uuid_text: String = row.get("uuid")?;
    let session_text: String = row.get("session_uuid")?;
    let role_text: String = row.get("role")?;
    let role = MessageRole::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in chat_messages.role"))
    })?;

    Ok(MessageRecord {
        message_id: parse_uuid(&uuid_text, "chat_messages.uuid")?,
        session_id: parse_uuid(&session_text, "chat_messages.session_uuid")?,
        seq: row.get("seq")?,
        role,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn insert_message_in_tx(
    tx: &Transaction<'_>,
    session_id: SessionId,
    seq: i64,
    role: MessageRole,
    content: &str,
) -> RepoResult<MessageRecord> {
    let message_id = Uuid::new_v4();
    tx.execute(
        "INSERT INTO chat_messages (uuid, session_uuid, seq, role, content)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            message_id.to_string(),
            session_id.to_string(),
            seq,
            role.as_str(),
            content,
        ],
    )?;

    let created_at: i64 = tx.query_row(
        "SELECT created_at FROM chat_messages WHERE uuid = ?1;",
        [message_id.to_string()],
        |row| row.get(0),
    )?;

    Ok(MessageRecord {
        message_id,
        session_id,
        seq,
        role,
        content: content.to_string(),
        created_at,
    })
}

fn session_exists_in_tx(tx: &Transaction<'_>, session_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM chat_sessions
            WHERE uuid = ?1
        );",
        [session_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
