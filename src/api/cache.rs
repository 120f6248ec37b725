//! Caller-owned reuse of pass results.
//!
//! The core is a pure function of the files on disk, so a result can be
//! reused while the directory listing is unchanged and the entry is younger
//! than the TTL. The cache is an ordinary value the caller owns and passes in;
//! nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::{ScanError, ScanResult};

use super::collector::FileCollector;

/// Default entry lifetime: five minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// SHA-256 digest of a directory's capture listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Fingerprints the capture files of `dir`: name, size and modification time of each.
///
/// Any change to the set of files, or a rewrite of one of them, yields a new digest.
pub fn fingerprint_directory(collector: &FileCollector, dir: &Path) -> ScanResult<Fingerprint> {
    let mut hasher = Sha256::new();
    hasher.update(dir.as_os_str().as_encoded_bytes());
    for path in collector.capture_paths(dir)? {
        let meta = fs::metadata(&path).map_err(|err| ScanError::io(&path, err))?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        hasher.update([0u8]);
        if let Some(name) = path.file_name() {
            hasher.update(name.as_encoded_bytes());
        }
        hasher.update(meta.len().to_le_bytes());
        hasher.update(modified.as_secs().to_le_bytes());
        hasher.update(modified.subsec_nanos().to_le_bytes());
    }
    Ok(Fingerprint(hasher.finalize().into()))
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    stored_at: DateTime<Utc>,
    value: T,
}

/// Fingerprint-keyed cache with an explicit time-to-live.
#[derive(Debug, Clone)]
pub struct ResultCache<T> {
    ttl: Duration,
    entries: HashMap<Fingerprint, CacheEntry<T>>,
}

impl<T: Clone> ResultCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live value for `key` as of `now`.
    #[must_use]
    pub fn get_at(&self, key: &Fingerprint, now: DateTime<Utc>) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.stored_at, now))
            .map(|entry| entry.value.clone())
    }

    #[must_use]
    pub fn get(&self, key: &Fingerprint) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Stores `value` and drops every entry that has expired as of `now`.
    pub fn insert_at(&mut self, key: Fingerprint, value: T, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| is_within(ttl, entry.stored_at, now));
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                value,
            },
        );
    }

    pub fn insert(&mut self, key: Fingerprint, value: T) {
        self.insert_at(key, value, Utc::now());
    }

    /// Returns the live value for `key`, computing and storing it on a miss.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: Fingerprint,
        now: DateTime<Utc>,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.get_at(&key, now) {
            trace!(%key, "result cache hit");
            return Ok(value);
        }
        trace!(%key, "result cache miss");
        let value = compute()?;
        self.insert_at(key, value.clone(), now);
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_within(self.ttl, stored_at, now)
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

fn is_within(ttl: Duration, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match (now - stored_at).to_std() {
        Ok(age) => age < ttl,
        // `now` before `stored_at`: clock went backwards, treat as fresh.
        Err(_) => true,
    }
}
