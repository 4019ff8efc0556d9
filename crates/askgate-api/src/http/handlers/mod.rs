//! HTTP request handlers.

pub mod chat;
pub mod user;

use serde::Serialize;

/// Simple confirmation payload for endpoints that only report success.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
