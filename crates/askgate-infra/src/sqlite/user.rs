//! SQLite user record store implementation.
//!
//! Implements `UserRecordStore` from `askgate-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, and a conditional
//! upsert for the quota increment so admission is decided inside the
//! database, not in application code.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::Row;

use askgate_core::user::repository::UserRecordStore;
use askgate_types::error::RepositoryError;
use askgate_types::user::UserRecord;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRecordStore`.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: DatabasePool,
}

impl SqliteUserStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn counts_for(&self, email: &str) -> Result<BTreeMap<String, u32>, RepositoryError> {
        let rows = sqlx::query("SELECT day, count FROM question_counts WHERE email = ?")
            .bind(email)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut counts = BTreeMap::new();
        for row in &rows {
            let day: String = row
                .try_get("day")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let count: i64 = row
                .try_get("count")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            counts.insert(day, count as u32);
        }
        Ok(counts)
    }
}

/// Internal row type for mapping SQLite rows to domain UserRecord.
struct UserRow {
    email: String,
    is_admin: i64,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            email: row.try_get("email")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(
        self,
        questions_by_date: BTreeMap<String, u32>,
    ) -> Result<UserRecord, RepositoryError> {
        Ok(UserRecord {
            email: self.email,
            questions_by_date,
            is_admin: self.is_admin != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl UserRecordStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                let counts = self.counts_for(email).await?;
                Ok(Some(user_row.into_record(counts)?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (email, is_admin, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.email)
        .bind(record.is_admin as i64)
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(RepositoryError::DuplicateKey(record.email.clone()))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn save(&self, record: &UserRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET updated_at = ? WHERE email = ?")
            .bind(format_datetime(&record.updated_at))
            .bind(&record.email)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn increment_day(
        &self,
        email: &str,
        day: &str,
        limit: Option<u32>,
    ) -> Result<bool, RepositoryError> {
        // A zero limit admits nothing; the upsert below would still create
        // the first row with count = 1.
        if limit == Some(0) {
            return Ok(false);
        }

        let result = match limit {
            Some(limit) => {
                sqlx::query(
                    r#"INSERT INTO question_counts (email, day, count) VALUES (?, ?, 1)
                       ON CONFLICT(email, day) DO UPDATE
                       SET count = question_counts.count + 1
                       WHERE question_counts.count < ?"#,
                )
                .bind(email)
                .bind(day)
                .bind(limit as i64)
                .execute(&self.pool.writer)
                .await
            }
            None => {
                sqlx::query(
                    r#"INSERT INTO question_counts (email, day, count) VALUES (?, ?, 1)
                       ON CONFLICT(email, day) DO UPDATE
                       SET count = question_counts.count + 1"#,
                )
                .bind(email)
                .bind(day)
                .execute(&self.pool.writer)
                .await
            }
        };

        let result = match result {
            Ok(result) => result,
            Err(e) if is_foreign_key_violation(&e) => return Err(RepositoryError::NotFound),
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        };

        // A conditional upsert whose WHERE excludes the row touches nothing.
        let admitted = result.rows_affected() > 0;
        if admitted {
            sqlx::query("UPDATE users SET updated_at = ? WHERE email = ?")
                .bind(format_datetime(&Utc::now()))
                .bind(email)
                .execute(&self.pool.writer)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        Ok(admitted)
    }

    async fn reset_day(&self, email: &str, day: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE question_counts SET count = 0 WHERE email = ? AND day = ?")
            .bind(email)
            .bind(day)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use std::sync::Arc;

    async fn test_store() -> SqliteUserStore {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteUserStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn make_record(email: &str, is_admin: bool) -> UserRecord {
        UserRecord::new(email.to_string(), is_admin)
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let store = test_store().await;
        let record = make_record("a@b.com", true);
        store.insert(&record).await.unwrap();

        let found = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.email, "a@b.com");
        assert!(found.is_admin);
        assert!(found.questions_by_date.is_empty());
        assert_eq!(found.created_at.timestamp(), record.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = test_store().await;
        assert!(store.find_by_email("ghost@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails_fast() {
        let store = test_store().await;
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        let err = store
            .insert(&make_record("a@b.com", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(email) if email == "a@b.com"));
    }

    #[tokio::test]
    async fn test_save_missing_record_is_not_found() {
        let store = test_store().await;
        let err = store.save(&make_record("ghost@b.com", false)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_increment_admits_up_to_limit() {
        let store = test_store().await;
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        for _ in 0..10 {
            assert!(
                store
                    .increment_day("a@b.com", "2024-01-15", Some(10))
                    .await
                    .unwrap()
            );
        }
        assert!(
            !store
                .increment_day("a@b.com", "2024-01-15", Some(10))
                .await
                .unwrap()
        );

        let record = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 10);
    }

    #[tokio::test]
    async fn test_unlimited_increment_passes_the_limit() {
        let store = test_store().await;
        store.insert(&make_record("admin@x.com", true)).await.unwrap();

        for _ in 0..15 {
            assert!(
                store
                    .increment_day("admin@x.com", "2024-01-15", None)
                    .await
                    .unwrap()
            );
        }

        let record = store.find_by_email("admin@x.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 15);
    }

    #[tokio::test]
    async fn test_zero_limit_admits_nothing() {
        let store = test_store().await;
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        assert!(
            !store
                .increment_day("a@b.com", "2024-01-15", Some(0))
                .await
                .unwrap()
        );
        let record = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 0);
    }

    #[tokio::test]
    async fn test_increment_for_missing_user_is_not_found() {
        let store = test_store().await;
        let err = store
            .increment_day("ghost@b.com", "2024-01-15", Some(10))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_days_are_independent_buckets() {
        let store = test_store().await;
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        for _ in 0..10 {
            store
                .increment_day("a@b.com", "2024-01-15", Some(10))
                .await
                .unwrap();
        }
        assert!(
            !store
                .increment_day("a@b.com", "2024-01-15", Some(10))
                .await
                .unwrap()
        );
        // Next UTC day starts fresh.
        assert!(
            store
                .increment_day("a@b.com", "2024-01-16", Some(10))
                .await
                .unwrap()
        );

        let record = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 10);
        assert_eq!(record.used_on("2024-01-16"), 1);
    }

    #[tokio::test]
    async fn test_concurrent_increments_admit_exactly_the_limit() {
        let store = Arc::new(test_store().await);
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .increment_day("a@b.com", "2024-01-15", Some(10))
                    .await
                    .unwrap()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
        let record = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 10);
    }

    #[tokio::test]
    async fn test_reset_day_zeroes_the_counter() {
        let store = test_store().await;
        store.insert(&make_record("a@b.com", false)).await.unwrap();

        for _ in 0..5 {
            store
                .increment_day("a@b.com", "2024-01-15", Some(10))
                .await
                .unwrap();
        }
        store.reset_day("a@b.com", "2024-01-15").await.unwrap();

        let record = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(record.used_on("2024-01-15"), 0);

        // And the bucket accepts increments again.
        assert!(
            store
                .increment_day("a@b.com", "2024-01-15", Some(10))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_increment_bumps_updated_at() {
        let store = test_store().await;
        let mut record = make_record("a@b.com", false);
        record.created_at = record.created_at - chrono::Duration::seconds(60);
        record.updated_at = record.created_at;
        store.insert(&record).await.unwrap();

        store
            .increment_day("a@b.com", "2024-01-15", Some(10))
            .await
            .unwrap();

        let found = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(found.updated_at > found.created_at);
    }
}
