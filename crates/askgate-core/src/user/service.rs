//! User provisioning and quota mutation service.
//!
//! Orchestrates get-or-create, increment, and reset against the store,
//! applying [`QuotaPolicy`] and recovering duplicate-insert races internally
//! so callers never see them.

use chrono::Utc;
use tracing::{debug, info};

use askgate_types::error::{RepositoryError, UserError};
use askgate_types::user::{UserRecord, UserStatus};

use crate::user::policy::{QuotaPolicy, today_utc};
use crate::user::repository::UserRecordStore;

/// Normalize an email for use as an identity key: trim plus lower-case.
///
/// Rejects empty strings and anything without an `@`.
pub fn normalize_email(email: &str) -> Result<String, UserError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(UserError::InvalidEmail(email.to_string()));
    }
    Ok(normalized)
}

/// Orchestrates user record lifecycle and quota mutations.
///
/// Generic over [`UserRecordStore`] so core never depends on askgate-infra.
pub struct UserRecordService<S: UserRecordStore> {
    store: S,
    policy: QuotaPolicy,
}

impl<S: UserRecordStore> UserRecordService<S> {
    pub fn new(store: S, policy: QuotaPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Fetch the record for `email`, creating it on first contact.
    ///
    /// Creation is idempotent under concurrency: when a concurrent request
    /// wins the insert race, the uniqueness constraint rejects ours and the
    /// winner's record is re-fetched and returned. Only a re-fetch miss after
    /// a lost race is an error (a store-level anomaly).
    pub async fn get_or_create(&self, email: &str) -> Result<UserRecord, UserError> {
        let email = normalize_email(email)?;

        if let Some(record) = self.store.find_by_email(&email).await? {
            return Ok(record);
        }

        let record = UserRecord::new(email.clone(), self.policy.is_admin(&email));
        match self.store.insert(&record).await {
            Ok(()) => {
                info!(email = %email, is_admin = record.is_admin, "created user record");
                Ok(record)
            }
            Err(RepositoryError::DuplicateKey(_)) => {
                debug!(email = %email, "lost insert race, re-fetching winner");
                self.store
                    .find_by_email(&email)
                    .await?
                    .ok_or(UserError::RecordVanished(email))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Consume one question from today's quota if admitted.
    ///
    /// Admins are always admitted; their counter is still incremented for
    /// observability. The increment itself is a single atomic store operation,
    /// so the daily limit holds even under concurrent calls for one user.
    pub async fn try_increment(&self, email: &str) -> Result<bool, UserError> {
        let record = self.get_or_create(email).await?;
        let limit = if record.is_admin {
            None
        } else {
            Some(self.policy.daily_limit())
        };

        let admitted = self
            .store
            .increment_day(&record.email, &today_utc(), limit)
            .await?;
        if !admitted {
            debug!(email = %record.email, "daily limit reached, increment denied");
        }
        Ok(admitted)
    }

    /// Zero today's counter. Returns `false` without mutating anything when
    /// the record is not an admin.
    pub async fn reset_today(&self, email: &str) -> Result<bool, UserError> {
        let mut record = self.get_or_create(email).await?;
        if !record.is_admin {
            return Ok(false);
        }

        self.store.reset_day(&record.email, &today_utc()).await?;
        record.updated_at = Utc::now();
        self.store.save(&record).await?;
        info!(email = %record.email, "daily count reset");
        Ok(true)
    }

    /// Quota status snapshot for the status endpoint; creates the record on
    /// first contact like the ask flow does.
    pub async fn status(&self, email: &str) -> Result<UserStatus, UserError> {
        let record = self.get_or_create(email).await?;
        let today = today_utc();
        Ok(UserStatus {
            email: record.email.clone(),
            is_admin: record.is_admin,
            remaining_questions: self.policy.remaining(&record, &today),
            today_used: record.used_on(&today),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::testing::MemoryUserStore;
    use askgate_types::user::RemainingQuota;

    fn service(store: MemoryUserStore, admin: Option<&str>) -> UserRecordService<MemoryUserStore> {
        UserRecordService::new(store, QuotaPolicy::new(10, admin))
    }

    #[tokio::test]
    async fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.Com ").unwrap(), "a@b.com");
        assert!(normalize_email("").is_err());
        assert!(normalize_email("   ").is_err());
        assert!(normalize_email("no-at-sign").is_err());
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let svc = service(MemoryUserStore::new(), None);
        let first = svc.get_or_create("A@B.com").await.unwrap();
        let second = svc.get_or_create("a@b.com ").await.unwrap();
        assert_eq!(first.email, "a@b.com");
        assert_eq!(second.email, "a@b.com");
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_get_or_create_marks_admin_at_creation() {
        let svc = service(MemoryUserStore::new(), Some("Admin@X.com"));
        let admin = svc.get_or_create("admin@x.com").await.unwrap();
        let user = svc.get_or_create("user@x.com").await.unwrap();
        assert!(admin.is_admin);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_lost_insert_race_returns_winner() {
        // Record exists, but the first lookup misses so the service attempts
        // an insert that the uniqueness constraint rejects.
        let store = MemoryUserStore::new();
        let winner = UserRecord::new("a@b.com".to_string(), false);
        store.seed(winner.clone());
        store.hide_next_find();

        let svc = service(store, None);
        let record = svc.get_or_create("a@b.com").await.unwrap();
        assert_eq!(record.created_at, winner.created_at);
    }

    #[tokio::test]
    async fn test_try_increment_stops_at_limit() {
        let svc = service(MemoryUserStore::new(), None);
        for _ in 0..10 {
            assert!(svc.try_increment("a@b.com").await.unwrap());
        }
        assert!(!svc.try_increment("a@b.com").await.unwrap());

        let record = svc.get_or_create("a@b.com").await.unwrap();
        assert_eq!(
            svc.policy().remaining(&record, &today_utc()),
            RemainingQuota::Count(0)
        );
    }

    #[tokio::test]
    async fn test_admin_increments_past_limit() {
        let svc = service(MemoryUserStore::new(), Some("admin@x.com"));
        for _ in 0..15 {
            assert!(svc.try_increment("admin@x.com").await.unwrap());
        }
        let record = svc.get_or_create("admin@x.com").await.unwrap();
        assert_eq!(record.used_on(&today_utc()), 15);
        assert_eq!(
            svc.policy().remaining(&record, &today_utc()),
            RemainingQuota::Unlimited
        );
    }

    #[tokio::test]
    async fn test_reset_today_denied_for_non_admin() {
        let svc = service(MemoryUserStore::new(), None);
        for _ in 0..3 {
            svc.try_increment("a@b.com").await.unwrap();
        }
        assert!(!svc.reset_today("a@b.com").await.unwrap());

        // Counters untouched.
        let record = svc.get_or_create("a@b.com").await.unwrap();
        assert_eq!(record.used_on(&today_utc()), 3);
    }

    #[tokio::test]
    async fn test_reset_today_zeroes_admin_counter() {
        let svc = service(MemoryUserStore::new(), Some("admin@x.com"));
        for _ in 0..5 {
            svc.try_increment("admin@x.com").await.unwrap();
        }
        assert!(svc.reset_today("admin@x.com").await.unwrap());

        let record = svc.get_or_create("admin@x.com").await.unwrap();
        assert_eq!(record.used_on(&today_utc()), 0);
    }

    #[tokio::test]
    async fn test_status_reports_usage() {
        let svc = service(MemoryUserStore::new(), None);
        for _ in 0..4 {
            svc.try_increment("a@b.com").await.unwrap();
        }
        let status = svc.status("a@b.com").await.unwrap();
        assert_eq!(status.email, "a@b.com");
        assert!(!status.is_admin);
        assert_eq!(status.today_used, 4);
        assert_eq!(status.remaining_questions, RemainingQuota::Count(6));
    }
}
