//! Business logic for Askgate.
//!
//! This crate holds the quota policy, the user record store trait and its
//! orchestrating service, the session transcript log, and the chat service
//! that ties them to the external answer generator. Infrastructure
//! implementations (SQLite, OpenAI) live in askgate-infra.

pub mod chat;
pub mod user;
