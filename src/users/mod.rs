//! User registration: validation and the record store
//!
//! Registration validates inputs before any write. A duplicate phone number
//! is a structured refusal, not an error; only store failures surface as
//! errors.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::user::UserRecord;

/// International phone number shape, e.g. +256751124310. Requires at least
/// seven digits so obviously short inputs are rejected without a regional
/// lookup.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{6,15}$").expect("phone regex is valid"));

/// Validate a phone number against the international format
pub fn validate_phone(phone: &str) -> Result<()> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(Error::validation(
            "Please enter a valid phone number e.g. +256751124310",
        ))
    }
}

/// Validate a name: at least two words
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().split_whitespace().count() >= 2 {
        Ok(())
    } else {
        Err(Error::validation("Please enter your full name"))
    }
}

/// Trait for the user record store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>>;

    /// Create a user record
    async fn create(&self, name: &str, phone: &str) -> Result<UserRecord>;
}

/// SQLite-backed user store
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Create or open the store at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::database(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::database(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_phone ON users(phone);
            "#,
        )
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock();

        let record = conn
            .query_row(
                "SELECT id, name, phone, created_at FROM users WHERE phone = ?1",
                params![phone],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, chrono::DateTime<Utc>>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| Error::database(format!("User lookup failed: {}", e)))?;

        record
            .map(|(id, name, phone, created_at)| {
                Ok(UserRecord {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| Error::database(format!("Corrupt user id: {}", e)))?,
                    name,
                    phone,
                    created_at,
                })
            })
            .transpose()
    }

    async fn create(&self, name: &str, phone: &str) -> Result<UserRecord> {
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            created_at: Utc::now(),
        };

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (id, name, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.id.to_string(),
                record.name,
                record.phone,
                record.created_at
            ],
        )
        .map_err(|e| Error::database(format!("User insert failed: {}", e)))?;

        Ok(record)
    }
}

/// In-memory user store for tests
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store has no records
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.get(phone).map(|r| r.clone()))
    }

    async fn create(&self, name: &str, phone: &str) -> Result<UserRecord> {
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            created_at: Utc::now(),
        };
        self.users.insert(record.phone.clone(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_phone_numbers_validate() {
        assert!(validate_phone("+256751124310").is_ok());
        assert!(validate_phone("256751124310").is_ok());
    }

    #[test]
    fn short_or_malformed_phones_are_rejected() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0751124310").is_err()); // leading zero
        assert!(validate_phone("+0123").is_err());
        assert!(validate_phone("phone").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn names_need_two_words() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(validate_name("Ada").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_a_record() {
        let store = SqliteUserStore::in_memory().unwrap();

        assert!(store.find_by_phone("+256751124310").await.unwrap().is_none());

        let saved = store.create("Ada Lovelace", "+256751124310").await.unwrap();
        let found = store
            .find_by_phone("+256751124310")
            .await
            .unwrap()
            .expect("record should exist");

        assert_eq!(found.id, saved.id);
        assert_eq!(found.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn sqlite_store_rejects_a_second_identical_phone() {
        let store = SqliteUserStore::in_memory().unwrap();
        store.create("Ada Lovelace", "+256751124310").await.unwrap();

        let second = store.create("Grace Hopper", "+256751124310").await;
        assert!(matches!(second, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn sqlite_store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        {
            let store = SqliteUserStore::new(&path).unwrap();
            store.create("Ada Lovelace", "+256751124310").await.unwrap();
        }

        let reopened = SqliteUserStore::new(&path).unwrap();
        let found = reopened.find_by_phone("+256751124310").await.unwrap();
        assert!(found.is_some());
    }
}
