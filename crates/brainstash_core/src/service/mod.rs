//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and gateway calls into use-case level APIs.
//! - Keep transport layers (HTTP routes, CLI) decoupled from storage and
//!   provider details.

pub mod chat_service;
pub mod content_service;
pub mod context;
pub mod share_service;
pub mod tag_resolver;
