//! Capacity-bounded, TTL-expiring store of shared schemas.
//!
//! Expired entries are never served and are purged lazily on every
//! create, count and fetch (and periodically by the server binary).

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;
use serde_json::Value;

// ============================================================================
// Constants
// ============================================================================

/// Length of generated share ids
pub const SHARE_ID_LENGTH: usize = 8;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareStoreError {
    #[error("Share capacity of {0} entries reached")]
    CapacityExceeded(usize),
}

#[derive(Debug, Clone)]
struct SharedEntry {
    data: Value,
    expires_at: DateTime<Utc>,
}

/// Shared schemas keyed by short random id
#[derive(Debug, Clone)]
pub struct ShareStore {
    entries: Arc<DashMap<String, SharedEntry>>,
    /// Serializes the capacity check with the insert
    create_lock: Arc<Mutex<()>>,
    capacity: usize,
    ttl: Duration,
}

impl ShareStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            create_lock: Arc::new(Mutex::new(())),
            capacity,
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self, data: Value) -> Result<String, ShareStoreError> {
        self.create_at(data, Utc::now())
    }

    /// Store `data` as of `now` and return its new id.
    ///
    /// An expiry beyond the last representable instant saturates there.
    pub fn create_at(&self, data: Value, now: DateTime<Utc>) -> Result<String, ShareStoreError> {
        let _guard = self.create_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.count_at(now) >= self.capacity {
            return Err(ShareStoreError::CapacityExceeded(self.capacity));
        }

        let entry = SharedEntry {
            data,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        loop {
            let id = generate_id();
            if let Entry::Vacant(slot) = self.entries.entry(id.clone()) {
                slot.insert(entry);
                return Ok(id);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.get_at(id, Utc::now())
    }

    /// Fetch a live entry. An expired entry is removed and reported missing.
    pub fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<Value> {
        self.purge_expired_at(now);
        self.entries.get(id).map(|entry| entry.data.clone())
    }

    pub fn count(&self) -> usize {
        self.count_at(Utc::now())
    }

    pub fn count_at(&self, now: DateTime<Utc>) -> usize {
        self.purge_expired_at(now);
        self.entries.len()
    }

    /// Drop every entry whose retention window has passed; returns how many.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SHARE_ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}
