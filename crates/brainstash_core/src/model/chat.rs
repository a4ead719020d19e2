//! Chat session and message domain model.
//!
//! # Responsibility
//! - Define the session record and the two transcript roles.
//!
//! # Invariants
//! - Transcripts are mutated only by appending a user/assistant pair.
//! - A message is never edited or reordered after it is stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::content::OwnerId;

/// Stable identifier for a chat session.
pub type SessionId = Uuid;

/// Stable identifier for a transcript message.
pub type MessageId = Uuid;

/// Author of one transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Stable string id used in storage and prompt rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parses one role from its stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Write model for one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub uuid: SessionId,
    pub owner: OwnerId,
}

impl ChatSession {
    /// Creates a new empty session with a generated stable ID.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
        }
    }
}
