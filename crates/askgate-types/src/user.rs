//! User quota record types.
//!
//! A [`UserRecord`] tracks per-day question counts for one email identity.
//! Counts are bucketed by UTC calendar day (`YYYY-MM-DD` keys); each day is an
//! independent bucket, so the quota implicitly resets at UTC midnight.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A persisted user record keyed by normalized (lower-cased) email.
///
/// `is_admin` is decided once at creation time from the configured admin
/// allowlist and never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    /// UTC date string (`YYYY-MM-DD`) to question count for that day.
    pub questions_by_date: BTreeMap<String, u32>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a fresh record with empty counters and both timestamps set to now.
    pub fn new(email: String, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            email,
            questions_by_date: BTreeMap::new(),
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }

    /// Questions already used on the given UTC date.
    pub fn used_on(&self, day: &str) -> u32 {
        self.questions_by_date.get(day).copied().unwrap_or(0)
    }
}

/// Remaining daily quota for a user.
///
/// Serializes as the literal string `"Unlimited"` for admins and as a plain
/// number otherwise, matching the wire format consumed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingQuota {
    Unlimited,
    Count(u32),
}

impl RemainingQuota {
    /// The numeric count, if bounded.
    pub fn as_count(&self) -> Option<u32> {
        match self {
            RemainingQuota::Unlimited => None,
            RemainingQuota::Count(n) => Some(*n),
        }
    }
}

impl Serialize for RemainingQuota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RemainingQuota::Unlimited => serializer.serialize_str("Unlimited"),
            RemainingQuota::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

/// Snapshot of a user's quota state, returned by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatus {
    pub email: String,
    pub is_admin: bool,
    pub remaining_questions: RemainingQuota,
    pub today_used: u32,
    pub created_at: String,
    pub updated_at: String,
}
