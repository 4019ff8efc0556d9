//! Pure admission logic for the daily question quota.
//!
//! No I/O here: every function takes an explicit `today` date string so the
//! policy is trivially testable across day boundaries. "Today" is always a
//! UTC `YYYY-MM-DD` string; day boundaries are UTC midnight, not user-local.

use chrono::Utc;

use askgate_types::user::{RemainingQuota, UserRecord};

/// Default questions per UTC day for non-admin users.
pub const DEFAULT_DAILY_LIMIT: u32 = 10;

/// Decides admission and remaining-quota for user records.
///
/// Admin status is a capability derived once at record creation time via
/// [`QuotaPolicy::is_admin`]; afterwards only the persisted `is_admin` flag
/// on the record is consulted.
#[derive(Debug, Clone)]
pub struct QuotaPolicy {
    daily_limit: u32,
    admin_email: Option<String>,
}

impl QuotaPolicy {
    /// Build a policy with the given limit and optional admin email.
    ///
    /// The admin email is normalized (trimmed, lower-cased) up front so
    /// membership tests are a plain comparison.
    pub fn new(daily_limit: u32, admin_email: Option<&str>) -> Self {
        Self {
            daily_limit,
            admin_email: admin_email.map(|e| e.trim().to_lowercase()),
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Membership test against the configured admin email, case-insensitive.
    pub fn is_admin(&self, email: &str) -> bool {
        match &self.admin_email {
            Some(admin) => admin == &email.trim().to_lowercase(),
            None => false,
        }
    }

    /// Remaining questions for `today`: the unlimited sentinel for admins,
    /// otherwise `max(0, daily_limit - used)`.
    pub fn remaining(&self, record: &UserRecord, today: &str) -> RemainingQuota {
        if record.is_admin {
            return RemainingQuota::Unlimited;
        }
        RemainingQuota::Count(self.daily_limit.saturating_sub(record.used_on(today)))
    }

    /// Whether one more question would be admitted on `today`.
    pub fn can_admit(&self, record: &UserRecord, today: &str) -> bool {
        record.is_admin || record.used_on(today) < self.daily_limit
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT, None)
    }
}

/// The current UTC date as a `YYYY-MM-DD` bucket key.
pub fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
