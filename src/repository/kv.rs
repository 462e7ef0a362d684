//! Key/Value Backend
//!
//! The persistence seam: a local string-keyed store holding whole values.
//! `SqliteKv` (see `db`) is the real backend; `MemoryKv` substitutes it in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Local key/value store. Values are written wholesale, never patched.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when absent
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Replace the value under `key` in one atomic write
    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;
}

/// In-memory store with a switch to simulate an unavailable backend
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error (or recover)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("storage backend unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.check_available()?;
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
