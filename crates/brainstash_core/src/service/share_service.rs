//! Share-link (capability token) use-case service.
//!
//! # Responsibility
//! - Issue, revoke, and resolve bearer capability tokens.
//! - Serve the anonymous read path over the owner's live content set.
//!
//! # Invariants
//! - Tokens carry 16 bytes from the OS CSPRNG, hex-encoded; they are never
//!   sequential or derived from request state.
//! - One active link per owner; the race between concurrent issues is
//!   decided by the storage constraint, not by this service.
//! - Unknown, malformed, and revoked tokens are all reported as not found.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::info;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;

use crate::model::content::OwnerId;
use crate::model::share::ShareLink;
use crate::repo::content_repo::ContentRecord;
use crate::repo::share_repo::ShareLinkRepository;
use crate::repo::RepoError;

const TOKEN_BYTE_LEN: usize = 16;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{32}$").expect("valid token regex"));

/// Service error for share-link use-cases.
#[derive(Debug)]
pub enum ShareServiceError {
    /// The owner already has an active link; revoke it first.
    AlreadyIssued(OwnerId),
    /// No matching link (never distinguishes unknown from revoked).
    LinkNotFound,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ShareServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyIssued(owner) => {
                write!(f, "share link already active for owner {owner}")
            }
            Self::LinkNotFound => write!(f, "share link not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShareServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

/// Share service facade over repository implementations.
pub struct ShareService<R: ShareLinkRepository> {
    repo: R,
}

impl<R: ShareLinkRepository> ShareService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Issues a fresh capability token for the owner.
    pub fn issue(&self, owner: OwnerId) -> Result<String, ShareServiceError> {
        let link = ShareLink::new(owner, generate_share_token());

        match self.repo.insert_link(&link) {
            Ok(()) => {
                info!("event=share_issue module=share status=ok");
                Ok(link.token)
            }
            Err(RepoError::Conflict(_)) => Err(ShareServiceError::AlreadyIssued(owner)),
            Err(other) => Err(ShareServiceError::Repo(other)),
        }
    }

    /// Revokes the owner's active token.
    pub fn revoke(&self, owner: OwnerId) -> Result<(), ShareServiceError> {
        match self.repo.delete_link_for_owner(owner) {
            Ok(()) => {
                info!("event=share_revoke module=share status=ok");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => Err(ShareServiceError::LinkNotFound),
            Err(other) => Err(ShareServiceError::Repo(other)),
        }
    }

    /// Resolves a presented token to the owner it was issued for.
    ///
    /// Tokens failing the shape check are rejected without a lookup, with
    /// the same error as unknown tokens.
    pub fn resolve(&self, token: &str) -> Result<OwnerId, ShareServiceError> {
        if !TOKEN_RE.is_match(token) {
            return Err(ShareServiceError::LinkNotFound);
        }

        match self.repo.owner_for_token(token) {
            Ok(Some(owner)) => Ok(owner),
            Ok(None) => Err(ShareServiceError::LinkNotFound),
            Err(err) => Err(ShareServiceError::Repo(err)),
        }
    }

    /// Returns the shared owner's current content set for a valid token.
    ///
    /// Re-evaluated live on every call: content added or removed after
    /// issuance is reflected immediately.
    pub fn shared_contents(&self, token: &str) -> Result<Vec<ContentRecord>, ShareServiceError> {
        let owner = self.resolve(token)?;
        self.repo
            .contents_for_owner(owner)
            .map_err(ShareServiceError::Repo)
    }
}

/// Generates one opaque bearer token (32 lowercase hex chars).
fn generate_share_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTE_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
