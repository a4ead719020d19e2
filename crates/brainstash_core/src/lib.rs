//! Core domain logic for brainstash, a personal content-bookmarking
//! service. This crate is the single source of truth for business
//! invariants: canonical tag deduplication, bearer share capabilities, and
//! deadline-bounded chat generation over an append-only transcript.

pub mod db;
pub mod generation;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use generation::{
    GatewayError, GenerationGateway, GenerationProvider, HttpGenerationProvider,
    HttpProviderConfig, ProviderError, DEFAULT_GENERATION_DEADLINE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::chat::{ChatSession, MessageId, MessageRole, SessionId};
pub use model::content::{Content, ContentId, ContentKind, OwnerId, Tag, TagId};
pub use model::share::ShareLink;
pub use repo::chat_repo::{
    ChatSessionRepository, ContentDigest, MessageRecord, SessionRecord,
    SqliteChatSessionRepository,
};
pub use repo::content_repo::{ContentRecord, ContentRepository, SqliteContentRepository};
pub use repo::share_repo::{ShareLinkRepository, SqliteShareLinkRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::{RepoError, RepoResult};
pub use service::chat_service::{ChatService, ChatServiceError, ChatTurn};
pub use service::content_service::{ContentService, ContentServiceError, NewContent};
pub use service::context::{ContextAssembler, CONTEXT_MESSAGE_LIMIT};
pub use service::share_service::{ShareService, ShareServiceError};
pub use service::tag_resolver::TagResolver;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
