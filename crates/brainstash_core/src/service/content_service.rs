//! Content use-case service.
//!
//! # Responsibility
//! - Provide content create/list/delete APIs over the repository layer.
//! - Enforce resolve-then-create ordering for tags: no content row exists
//!   without its full resolved tag set.
//!
//! # Invariants
//! - Blank link or title is rejected before any mutation.
//! - Content list is always sorted by `updated_at DESC, uuid ASC`.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::info;

use crate::model::content::{Content, ContentId, ContentKind, OwnerId};
use crate::repo::content_repo::{ContentRecord, ContentRepository};
use crate::repo::RepoError;
use crate::service::tag_resolver::TagResolver;

/// Service error for content use-cases.
#[derive(Debug)]
pub enum ContentServiceError {
    /// Input rejected before any mutation.
    InvalidInput(&'static str),
    /// Target content does not exist for this owner.
    ContentNotFound(ContentId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ContentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(detail) => write!(f, "invalid content input: {detail}"),
            Self::ContentNotFound(content_id) => write!(f, "content not found: {content_id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent content state: {details}"),
        }
    }
}

impl Error for ContentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Input shape for one new content item.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub link: String,
    pub kind: ContentKind,
    pub title: String,
    /// Raw human-entered tag titles; resolved by [`TagResolver`].
    pub tags: Vec<String>,
}

/// Content service facade over repository implementations.
pub struct ContentService<R: ContentRepository> {
    repo: R,
}

impl<R: ContentRepository> ContentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one content item with its resolved tag set.
    ///
    /// Tags are resolved strictly before the content row is written; a
    /// resolution failure leaves no partial content behind.
    pub fn create_content(
        &mut self,
        owner: OwnerId,
        input: NewContent,
    ) -> Result<ContentRecord, ContentServiceError> {
        if input.title.trim().is_empty() {
            return Err(ContentServiceError::InvalidInput("title cannot be blank"));
        }
        if input.link.trim().is_empty() {
            return Err(ContentServiceError::InvalidInput("link cannot be blank"));
        }

        let tag_ids = TagResolver::new(&self.repo).resolve(&input.tags)?;
        let content = Content::new(owner, input.kind, input.link, input.title);
        self.repo.create_content(&content, &tag_ids)?;

        info!(
            "event=content_create module=content status=ok kind={} tag_count={}",
            content.kind.as_str(),
            tag_ids.len()
        );

        self.repo
            .get_content(owner, content.uuid)?
            .ok_or(ContentServiceError::InconsistentState(
                "created content not found in read-back",
            ))
    }

    /// Lists the owner's contents, newest first.
    pub fn list_contents(&self, owner: OwnerId) -> Result<Vec<ContentRecord>, ContentServiceError> {
        Ok(self.repo.list_contents(owner)?)
    }

    /// Deletes one owner-scoped content item.
    pub fn delete_content(
        &mut self,
        owner: OwnerId,
        content_id: ContentId,
    ) -> Result<(), ContentServiceError> {
        self.repo.delete_content(owner, content_id)?;
        info!("event=content_delete module=content status=ok");
        Ok(())
    }
}
