//! Content and tag domain model.
//!
//! # Responsibility
//! - Define the canonical bookmark record and its type enumeration.
//! - Define the canonical tag record shared by all contents.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another content.
//! - At most one tag row exists per distinct title; tag ids are weak
//!   references from content (content does not own tags).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a content record.
pub type ContentId = Uuid;

/// Authenticated owner identity, assigned by the external auth layer.
pub type OwnerId = Uuid;

/// Row id of a canonical tag.
pub type TagId = i64;

/// Media category of a saved content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Image,
    Video,
    Article,
    Audio,
    Tweet,
}

impl ContentKind {
    /// Stable string id used in storage and API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Article => "article",
            Self::Audio => "audio",
            Self::Tweet => "tweet",
        }
    }

    /// Parses one kind from its stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "article" => Some(Self::Article),
            "audio" => Some(Self::Audio),
            "tweet" => Some(Self::Tweet),
            _ => None,
        }
    }
}

/// Canonical deduplicated tag record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    /// Canonical title, stored case-sensitive after surrounding-whitespace
    /// trim.
    pub title: String,
}

/// Write model for one saved content item.
///
/// Timestamps and tag titles live on [`crate::repo::content_repo::ContentRecord`],
/// the read model produced by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Stable global ID used for linking and auditing.
    pub uuid: ContentId,
    /// Owning user; every content is owner-scoped.
    pub owner: OwnerId,
    /// Source URL of the bookmarked item.
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
}

impl Content {
    /// Creates a new content record with a generated stable ID.
    pub fn new(
        owner: OwnerId,
        kind: ContentKind,
        link: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
            link: link.into(),
            kind,
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContentKind;

    #[test]
    fn kind_string_ids_round_trip() {
        for kind in [
            ContentKind::Image,
            ContentKind::Video,
            ContentKind::Article,
            ContentKind::Audio,
            ContentKind::Tweet,
        ] {
            assert_eq!(ContentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ContentKind::parse("podcast"), None);
    }
}
