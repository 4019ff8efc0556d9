//! External answer-generation implementations.

pub mod openai;
