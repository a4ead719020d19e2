//! Domain model for the personal content library.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one identity scheme (UUID v4) across content, sessions, messages.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID, except tags, which
//!   are identified by their canonical title and carry an integer row id.
//! - Chat transcripts are append-only; messages are immutable once stored.

pub mod chat;
pub mod content;
pub mod share;
