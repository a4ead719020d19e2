//! Prompt context assembly for chat turns.
//!
//! # Responsibility
//! - Build the exact prompt sent to the generation provider: persona
//!   block, saved-content digest, bounded recent turns, new message.
//!
//! # Invariants
//! - Session lookup is owner-scoped; a foreign session id fails exactly
//!   like a missing one.
//! - The digest renders title, kind, and tag titles only; raw links never
//!   reach the prompt.
//! - At most `message_limit` prior messages are included, oldest first.
//! - Section order is fixed; empty sections collapse to a placeholder
//!   (digest) or disappear (prior turns).

use crate::model::chat::SessionId;
use crate::model::content::OwnerId;
use crate::repo::chat_repo::{ChatSessionRepository, ContentDigest, MessageRecord};
use crate::repo::{RepoError, RepoResult};

/// Default number of prior messages carried into one generation prompt.
pub const CONTEXT_MESSAGE_LIMIT: u32 = 5;

const PERSONA_BLOCK: &str = "You are the assistant for one person's saved content library. \
Ground your answers in the saved items and the conversation so far, and say so plainly \
when the library holds no answer.";

/// Builds generation prompts from stored session + content state.
pub struct ContextAssembler {
    message_limit: u32,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            message_limit: CONTEXT_MESSAGE_LIMIT,
        }
    }
}

impl ContextAssembler {
    pub fn new(message_limit: u32) -> Self {
        Self { message_limit }
    }

    /// Produces the prompt for one new user message in one session.
    pub fn assemble<R: ChatSessionRepository>(
        &self,
        repo: &R,
        owner: OwnerId,
        session_id: SessionId,
        new_text: &str,
    ) -> RepoResult<String> {
        if repo.get_session(session_id, owner)?.is_none() {
            return Err(RepoError::NotFound(session_id));
        }

        let digest = repo.content_digest(owner)?;
        let history = repo.recent_messages(session_id, self.message_limit)?;
        Ok(render_prompt(&digest, &history, new_text))
    }
}

fn render_prompt(digest: &[ContentDigest], history: &[MessageRecord], new_text: &str) -> String {
    let mut prompt = String::from(PERSONA_BLOCK);

    prompt.push_str("\n\nSaved items:\n");
    if digest.is_empty() {
        prompt.push_str("(none)\n");
    } else {
        for entry in digest {
            prompt.push_str(&format!("- {} ({})", entry.title, entry.kind.as_str()));
            if !entry.tags.is_empty() {
                prompt.push_str(&format!(" [tags: {}]", entry.tags.join(", ")));
            }
            prompt.push('\n');
        }
    }

    if !history.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for message in history {
            prompt.push_str(&format!("{}: {}\n", message.role.as_str(), message.content));
        }
    }

    prompt.push_str(&format!("\nNew message:\nuser: {new_text}\n"));
    prompt
}
