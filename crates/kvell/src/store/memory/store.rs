//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use kvell_core::store::validate_key;
use kvell_core::{Result, Store, StoreError, Ttl};
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Map size that triggers the first sweep of expired entries.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

/// Entry map that drops expired entries once it doubles in size since the
/// last sweep.
#[derive(Debug)]
struct Entries {
    map: HashMap<String, Entry>,
    sweep_at: usize,
}

impl Default for Entries {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            sweep_at: SWEEP_THRESHOLD,
        }
    }
}

impl Entries {
    fn insert(&mut self, key: String, entry: Entry, now: Instant) {
        self.map.insert(key, entry);
        if self.map.len() >= self.sweep_at {
            let before = self.map.len();
            self.map.retain(|_, entry| entry.is_live(now));
            self.sweep_at = (self.map.len() * 2).max(SWEEP_THRESHOLD);
            tracing::debug!(removed = before - self.map.len(), "Swept expired entries");
        }
    }

    /// Removes `key` if it has expired by `now`.
    fn remove_expired(&mut self, key: &str, now: Instant) {
        if self.map.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.map.remove(key);
        }
    }
}

/// Process-local store with the same TTL semantics as the remote backends.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
    ttl: Ttl,
    closed: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Ttl::DISABLED)
    }
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new(ttl: Ttl) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            ttl,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    ///
    /// Expired entries are reclaimed when read, and in bulk as the map grows.
    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn deadline(&self, now: Instant) -> Option<Instant> {
        self.ttl.is_enabled().then(|| now + self.ttl.duration())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Backend("Memory store is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        self.ensure_open()?;

        let now = Instant::now();
        let entry = Entry {
            value,
            expires_at: self.deadline(now),
        };
        self.entries
            .write()
            .await
            .insert(key.to_string(), entry, now);

        tracing::debug!(key = %key, "Stored entry in memory");
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        self.ensure_open()?;

        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.map.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        self.entries.write().await.remove_expired(key, now);
        Ok(None)
    }

    async fn update_ttl(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if !self.ttl.is_enabled() {
            return Ok(());
        }
        self.ensure_open()?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.map.get_mut(key).filter(|entry| entry.is_live(now)) {
            entry.expires_at = self.deadline(now);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.ensure_open()?;

        self.entries.write().await.map.remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.entries.write().await.map.clear();
        }
        Ok(())
    }
}
