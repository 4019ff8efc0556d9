//! Infrastructure implementations for Askgate.
//!
//! SQLite-backed user record store, configuration loading, and the
//! OpenAI-compatible answer generator.

pub mod config;
pub mod llm;
pub mod sqlite;
