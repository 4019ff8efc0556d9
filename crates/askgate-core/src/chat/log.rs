//! Per-user session transcript log.
//!
//! Transcripts are a convenience context cache for the answer generator, not
//! an authoritative store: process-lifetime only, dropped on restart or by the
//! admin clean endpoint. The trait seam exists so a TTL-backed external cache
//! can be swapped in without touching callers.

use dashmap::DashMap;

use askgate_types::chat::ChatTurn;

/// Session transcript store keyed by normalized email.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionLog: Send + Sync {
    /// Append one exchange to the user's transcript.
    fn append(
        &self,
        email: &str,
        turn: ChatTurn,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// Ordered transcript for the user; empty for unseen emails.
    fn get(&self, email: &str) -> impl std::future::Future<Output = Vec<ChatTurn>> + Send;

    /// Drop every user's transcript. Global by design; there is no per-user
    /// selector on the clean endpoint.
    fn clear_all(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Process-wide in-memory transcript log.
///
/// Backed by a `DashMap` so simultaneous appends for the same user never lose
/// updates. Each user's transcript is capped at `max_turns` exchanges, oldest
/// evicted first.
pub struct InMemorySessionLog {
    turns: DashMap<String, Vec<ChatTurn>>,
    max_turns: usize,
}

impl InMemorySessionLog {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: DashMap::new(),
            max_turns,
        }
    }
}

impl SessionLog for InMemorySessionLog {
    async fn append(&self, email: &str, turn: ChatTurn) {
        let mut entry = self.turns.entry(email.to_string()).or_default();
        entry.push(turn);
        let excess = entry.len().saturating_sub(self.max_turns);
        if excess > 0 {
            entry.drain(..excess);
        }
    }

    async fn get(&self, email: &str) -> Vec<ChatTurn> {
        self.turns
            .get(email)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    async fn clear_all(&self) {
        self.turns.clear();
    }
}
