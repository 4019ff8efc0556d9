//! UserRecordStore trait definition.
//!
//! Persistence seam for user quota records. Implementations live in
//! askgate-infra (e.g., `SqliteUserStore`). Uses native async fn in traits
//! (RPITIT, Rust 2024 edition).
//!
//! The backing store must enforce a uniqueness constraint on the normalized
//! email so duplicate-insert races fail fast with
//! [`RepositoryError::DuplicateKey`] instead of silently double-creating.

use askgate_types::error::RepositoryError;
use askgate_types::user::UserRecord;

/// Repository trait for user quota record persistence.
pub trait UserRecordStore: Send + Sync {
    /// Look up a record by normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserRecord>, RepositoryError>> + Send;

    /// Insert a new record. Fails with [`RepositoryError::DuplicateKey`] when
    /// a concurrent insert already created a record for that email.
    fn insert(
        &self,
        record: &UserRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Persist mutable fields of an existing record (`updated_at`). Fails
    /// with [`RepositoryError::NotFound`] if the record no longer exists.
    fn save(
        &self,
        record: &UserRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Atomically increment the counter for `(email, day)`, admitting the
    /// increment only while the counter is below `limit` (`None` means
    /// unconditional, used for admins). Returns whether the increment was
    /// admitted. Also bumps the record's `updated_at` on admission.
    ///
    /// Store-level atomicity is what closes the concurrent-increment race:
    /// two simultaneous calls can never under-count or breach the limit.
    fn increment_day(
        &self,
        email: &str,
        day: &str,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Zero the counter for `(email, day)`. A missing bucket is a no-op.
    fn reset_day(
        &self,
        email: &str,
        day: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
