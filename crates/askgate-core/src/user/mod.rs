//! User provisioning and daily quota enforcement.

pub mod policy;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
