//! Token store abstraction backing the CSRF engine
//!
//! The store is an injected key-value interface so a multi-instance
//! deployment can swap the in-memory map for a distributed cache. The
//! bundled [`InMemoryTokenStore`] is valid only for a single-process
//! deployment; tokens do not survive a restart, which merely forces
//! re-issuance on the next safe request.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Stored metadata for an issued CSRF token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// User the token was bound to at issuance, if any
    pub user_id: Option<String>,
}

impl TokenRecord {
    /// Create a record issued now
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            issued_at: Utc::now(),
            user_id,
        }
    }
}

/// Key-value store for issued CSRF tokens
pub trait CsrfTokenStore: Send + Sync {
    /// Insert or replace a token record
    fn put(&self, token: &str, record: TokenRecord);

    /// Look up a token record
    fn get(&self, token: &str) -> Option<TokenRecord>;

    /// Remove a token
    fn delete(&self, token: &str);

    /// Remove every record older than `max_age`, returning how many were
    /// dropped. Called lazily on token issuance as best-effort hygiene.
    fn remove_expired(&self, max_age: Duration) -> usize;
}

/// Process-local token store backed by a mutex-guarded map
pub struct InMemoryTokenStore {
    entries: Mutex<HashMap<String, TokenRecord>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live entries (test helper)
    pub fn len(&self) -> usize {
        self.entries.lock().expect("token store poisoned").len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfTokenStore for InMemoryTokenStore {
    fn put(&self, token: &str, record: TokenRecord) {
        self.entries
            .lock()
            .expect("token store poisoned")
            .insert(token.to_string(), record);
    }

    fn get(&self, token: &str) -> Option<TokenRecord> {
        self.entries
            .lock()
            .expect("token store poisoned")
            .get(token)
            .cloned()
    }

    fn delete(&self, token: &str) {
        self.entries
            .lock()
            .expect("token store poisoned")
            .remove(token);
    }

    fn remove_expired(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut entries = self.entries.lock().expect("token store poisoned");
        let before = entries.len();
        entries.retain(|_, record| record.issued_at > cutoff);
        before - entries.len()
    }
}
