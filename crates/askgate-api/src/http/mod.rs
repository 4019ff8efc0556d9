//! HTTP surface: error mapping, handlers, router.

pub mod error;
pub mod handlers;
pub mod router;
