//! Chat use-case service.
//!
//! # Responsibility
//! - Orchestrate one chat turn: assemble context, run the bounded
//!   generation call, persist the exchange atomically.
//! - Provide session create/read APIs.
//!
//! # Invariants
//! - Generation runs strictly before any transcript mutation; a failed or
//!   timed-out call leaves the transcript untouched.
//! - A successful turn appends exactly two messages, user then assistant.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use log::{error, info};

use crate::generation::{GatewayError, GenerationGateway, ProviderError};
use crate::model::chat::{ChatSession, SessionId};
use crate::model::content::OwnerId;
use crate::repo::chat_repo::{ChatSessionRepository, MessageRecord, SessionRecord};
use crate::repo::RepoError;
use crate::service::context::ContextAssembler;

/// Service error for chat use-cases.
#[derive(Debug)]
pub enum ChatServiceError {
    /// Input rejected before any mutation.
    InvalidMessage(&'static str),
    /// Session absent or owned by someone else; never distinguished.
    SessionNotFound(SessionId),
    /// Generation deadline elapsed; no transcript mutation happened.
    DeadlineExceeded(Duration),
    /// Provider failure, upstream message preserved.
    Upstream(ProviderError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ChatServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMessage(detail) => write!(f, "invalid chat message: {detail}"),
            Self::SessionNotFound(session_id) => write!(f, "session not found: {session_id}"),
            Self::DeadlineExceeded(deadline) => {
                write!(f, "generation deadline of {}ms exceeded", deadline.as_millis())
            }
            Self::Upstream(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChatServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Upstream(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ChatServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::SessionNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<GatewayError> for ChatServiceError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::DeadlineExceeded(deadline) => Self::DeadlineExceeded(deadline),
            GatewayError::Provider(err) => Self::Upstream(err),
        }
    }
}

/// One persisted chat exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user_message: MessageRecord,
    pub assistant_message: MessageRecord,
}

/// Chat service facade over repository + generation gateway.
pub struct ChatService<R: ChatSessionRepository> {
    repo: R,
    gateway: GenerationGateway,
    assembler: ContextAssembler,
}

impl<R: ChatSessionRepository> ChatService<R> {
    /// Creates a service with the default context window.
    pub fn new(repo: R, gateway: GenerationGateway) -> Self {
        Self {
            repo,
            gateway,
            assembler: ContextAssembler::default(),
        }
    }

    /// Creates an empty session owned by `owner`.
    pub fn create_session(&self, owner: OwnerId) -> Result<SessionRecord, ChatServiceError> {
        let session = ChatSession::new(owner);
        let record = self.repo.create_session(&session)?;
        info!("event=chat_session_create module=chat status=ok");
        Ok(record)
    }

    /// Returns the full ordered transcript of an owner's session.
    pub fn get_messages(
        &self,
        owner: OwnerId,
        session_id: SessionId,
    ) -> Result<Vec<MessageRecord>, ChatServiceError> {
        if self.repo.get_session(session_id, owner)?.is_none() {
            return Err(ChatServiceError::SessionNotFound(session_id));
        }
        Ok(self.repo.list_messages(session_id)?)
    }

    /// Runs one full chat turn and returns both persisted messages.
    pub fn start_chat_turn(
        &mut self,
        owner: OwnerId,
        session_id: SessionId,
        text: &str,
    ) -> Result<ChatTurn, ChatServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatServiceError::InvalidMessage("chat message cannot be blank"));
        }

        let started_at = Instant::now();
        info!("event=chat_turn module=chat status=start");

        let prompt = self
            .assembler
            .assemble(&self.repo, owner, session_id, text)?;

        let reply = match self.gateway.generate(&prompt) {
            Ok(reply) => reply,
            Err(err) => {
                error!(
                    "event=chat_turn module=chat status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let (user_message, assistant_message) =
            self.repo.append_turn(session_id, text, &reply)?;

        info!(
            "event=chat_turn module=chat status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );

        Ok(ChatTurn {
            user_message,
            assistant_message,
        })
    }
}
