//! Observability setup for Askgate.

pub mod tracing_setup;
