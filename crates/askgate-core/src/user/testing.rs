//! In-memory [`UserRecordStore`] double for service-level tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use askgate_types::error::RepositoryError;
use askgate_types::user::UserRecord;

use crate::user::repository::UserRecordStore;

/// Mutex-backed store mirroring the SQLite implementation's semantics:
/// unique email, conditional atomic increment, counter reset.
#[derive(Default)]
pub struct MemoryUserStore {
    records: Mutex<HashMap<String, UserRecord>>,
    hide_next_find: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the trait.
    pub fn seed(&self, record: UserRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.email.clone(), record);
    }

    /// Make the next `find_by_email` miss, to simulate losing an insert race.
    pub fn hide_next_find(&self) {
        self.hide_next_find.store(true, Ordering::SeqCst);
    }
}

impl UserRecordStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        if self.hide_next_find.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.records.lock().unwrap().get(email).cloned())
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.email) {
            return Err(RepositoryError::DuplicateKey(record.email.clone()));
        }
        records.insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&record.email) {
            Some(existing) => {
                existing.updated_at = record.updated_at;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn increment_day(
        &self,
        email: &str,
        day: &str,
        limit: Option<u32>,
    ) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(email).ok_or(RepositoryError::NotFound)?;
        let count = record.questions_by_date.entry(day.to_string()).or_insert(0);
        if let Some(limit) = limit {
            if *count >= limit {
                return Ok(false);
            }
        }
        *count += 1;
        record.updated_at = Utc::now();
        Ok(true)
    }

    async fn reset_day(&self, email: &str, day: &str) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(email).ok_or(RepositoryError::NotFound)?;
        record.questions_by_date.insert(day.to_string(), 0);
        Ok(())
    }
}
