//! In-memory TTL storage with a tag index
//!
//! Entries expire lazily: an expired entry is only removed when a lookup
//! finds it (or when it is invalidated/cleared). There is no background sweep
//! and no capacity bound; the cache lives as long as the client session.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;

use super::key::CacheTag;

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
    tags: Vec<CacheTag>,
}

impl<V> CacheEntry<V> {
    fn is_valid(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) < self.ttl
    }
}

/// Key → value store where every entry carries its own TTL.
///
/// Not synchronized; wrap it in a `Mutex` when shared between tasks so that
/// lookup, expired-entry removal and insert stay atomic per call.
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    tag_index: HashMap<CacheTag, HashSet<String>>,
    /// Bumped by `invalidate` and `clear`, which can hit any tag
    generation: u64,
    /// Per-tag count of `invalidate_tag` calls
    tag_generations: HashMap<CacheTag, u64>,
    hits: u64,
    misses: u64,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            generation: 0,
            tag_generations: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Get a value if its entry is still within its TTL.
    ///
    /// An entry found past its TTL is deleted as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();

        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid(now),
            None => {
                self.misses += 1;
                return None;
            }
        };

        if valid {
            self.hits += 1;
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            self.misses += 1;
            self.remove_entry(key);
            None
        }
    }
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, stamped with the current time
    #[allow(dead_code)]
    pub fn set(&mut self, key: &str, value: V, ttl: Duration) {
        self.set_tagged(key, value, ttl, Vec::new());
    }

    /// Insert or overwrite an entry and index it under `tags`
    pub fn set_tagged(&mut self, key: &str, value: V, ttl: Duration, tags: Vec<CacheTag>) {
        // Overwrites must not leave the old entry's tags pointing at this key
        self.remove_entry(key);

        for tag in &tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl,
                tags,
            },
        );
    }

    /// Invalidation generation covering `tags`.
    ///
    /// Snapshot it before a slow fetch and hand it to `set_if_current`: any
    /// invalidation touching those tags in between makes the value stale.
    pub fn generation(&self, tags: &[CacheTag]) -> u64 {
        tags.iter()
            .filter_map(|tag| self.tag_generations.get(tag))
            .fold(self.generation, |acc, n| acc.wrapping_add(*n))
    }

    /// Like `set_tagged`, but skipped when `tags` were invalidated after
    /// `seen` was taken. Returns whether the value was stored.
    pub fn set_if_current(
        &mut self,
        key: &str,
        value: V,
        ttl: Duration,
        tags: Vec<CacheTag>,
        seen: u64,
    ) -> bool {
        if self.generation(&tags) != seen {
            return false;
        }
        self.set_tagged(key, value, ttl, tags);
        true
    }

    /// Delete a single entry
    #[allow(dead_code)]
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    /// Delete every entry whose key contains `pattern` as a substring.
    ///
    /// Linear scan over all keys. Returns the number of entries removed.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        self.generation = self.generation.wrapping_add(1);
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    /// Delete exactly the entries indexed under `tag`
    pub fn invalidate_tag(&mut self, tag: &CacheTag) -> usize {
        *self.tag_generations.entry(tag.clone()).or_default() += 1;

        let Some(keys) = self.tag_index.remove(tag) else {
            return 0;
        };

        let mut removed = 0;
        for key in keys {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }
        removed
    }

    /// Remove all entries. Hit/miss counters are kept.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.generation = self.generation.wrapping_add(1);
        self.entries.clear();
        self.tag_index.clear();
        count
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan all entries and report how many are still valid
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total_entries = self.entries.len();
        let valid_entries = self
            .entries
            .values()
            .filter(|entry| entry.is_valid(now))
            .count();

        let lookups = self.hits + self.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        };

        CacheStats {
            total_entries,
            valid_entries,
            expired_entries: total_entries - valid_entries,
            hits: self.hits,
            misses: self.misses,
            hit_rate,
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };

        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        true
    }
}

/// Statistics about cache state
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), 0.0 before the first lookup
    pub hit_rate: f64,
}
