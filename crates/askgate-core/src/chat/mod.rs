//! Conversation orchestration: transcript log, generator seam, ask flow.

pub mod generator;
pub mod log;
pub mod service;
