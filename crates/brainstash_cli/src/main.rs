//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the core crate end-to-end against an in-memory database.
//! - Keep output deterministic enough for quick local sanity checks.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use brainstash_core::db::open_db_in_memory;
use brainstash_core::{
    ChatService, ContentKind, ContentService, GenerationGateway, GenerationProvider, NewContent,
    ShareService, SqliteChatSessionRepository, SqliteContentRepository,
    SqliteShareLinkRepository,
};
use uuid::Uuid;

/// Canned provider so the smoke run needs no network or credentials.
struct CannedProvider;

impl GenerationProvider for CannedProvider {
    fn generate(&self, prompt: &str) -> Result<String, brainstash_core::ProviderError> {
        Ok(format!("(smoke reply to a {}-char prompt)", prompt.len()))
    }
}

fn main() -> ExitCode {
    match run_smoke() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("brainstash smoke failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke() -> Result<(), String> {
    println!("brainstash_core version={}", brainstash_core::core_version());

    let log_dir = std::env::temp_dir().join("brainstash-smoke-logs");
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| "temp dir is not valid UTF-8".to_string())?;
    brainstash_core::init_logging(brainstash_core::default_log_level(), log_dir)?;

    let mut conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let owner = Uuid::new_v4();

    let created = {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut contents = ContentService::new(repo);
        contents
            .create_content(
                owner,
                NewContent {
                    link: "https://example.com/borrow-checker".to_string(),
                    kind: ContentKind::Article,
                    title: "Borrow checker deep dive".to_string(),
                    tags: vec!["rust".to_string(), " rust ".to_string(), "systems".to_string()],
                },
            )
            .map_err(|err| err.to_string())?
    };
    println!(
        "content created title={:?} tags={:?}",
        created.title, created.tags
    );

    let token = {
        let shares = ShareService::new(SqliteShareLinkRepository::new(&conn));
        let token = shares.issue(owner).map_err(|err| err.to_string())?;
        let shared = shares
            .shared_contents(&token)
            .map_err(|err| err.to_string())?;
        println!("share link issued, {} item(s) visible", shared.len());
        token
    };
    println!("share token length={}", token.len());

    let gateway = GenerationGateway::new(Arc::new(CannedProvider), Duration::from_secs(5));
    let repo = SqliteChatSessionRepository::new(&mut conn);
    let mut chat = ChatService::new(repo, gateway);
    let session = chat.create_session(owner).map_err(|err| err.to_string())?;
    let turn = chat
        .start_chat_turn(owner, session.session_id, "what did I save about rust?")
        .map_err(|err| err.to_string())?;
    println!(
        "chat turn persisted user_seq={} assistant_seq={}",
        turn.user_message.seq, turn.assistant_message.seq
    );

    Ok(())
}
