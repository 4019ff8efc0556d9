//! Shared domain types for Askgate.
//!
//! This crate contains the core domain types used across the Askgate service:
//! user quota records, chat transcript turns, configuration, and the error
//! taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod user;
