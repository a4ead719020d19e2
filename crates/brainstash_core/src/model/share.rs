//! Share-link (bearer capability) domain model.

use serde::{Deserialize, Serialize};

use crate::model::content::OwnerId;

/// Bearer capability granting read-only access to one owner's content set.
///
/// The token itself is the credential: any holder may resolve it. Access is
/// evaluated live against the owner's current content, never a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    /// Opaque high-entropy token (32 lowercase hex chars).
    pub token: String,
    pub owner: OwnerId,
}

impl ShareLink {
    pub fn new(owner: OwnerId, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            owner,
        }
    }
}
