//! Record Store Module
//!
//! Per-identity record sequences plus the global clean timestamp.
//!
//! Sequences are append-only, so the length of an identity's sequence is also
//! how far into the upstream pagination that identity has been read.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::TimeRecord;

// == Record Store ==
/// In-memory record storage keyed by identity (email).
#[derive(Debug)]
pub struct RecordStore {
    /// Records per identity, in the order they were fetched
    entries: HashMap<String, Vec<TimeRecord>>,
    /// When the whole store was last cleared
    last_clean_at: DateTime<Utc>,
}

impl RecordStore {
    // == Constructor ==
    /// Creates an empty store whose expiry window starts at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            entries: HashMap::new(),
            last_clean_at: now,
        }
    }

    // == Cached Length ==
    /// Number of records cached for `email`, or None if it has no entry.
    pub fn cached_len(&self, email: &str) -> Option<usize> {
        self.entries.get(email).map(Vec::len)
    }

    // == Append ==
    /// Appends `records` to the entry for `email` if its length is still `cursor`.
    ///
    /// A missing entry is created only when `cursor` is 0, so a batch fetched
    /// from offset `cursor` always lands at index `cursor`. The entry is
    /// created even for an empty batch. Returns the new length, or None if the
    /// entry moved on (or was cleared) since `cursor` was read.
    pub fn append(
        &mut self,
        email: &str,
        cursor: usize,
        records: Vec<TimeRecord>,
    ) -> Option<usize> {
        match self.entries.get_mut(email) {
            Some(entry) if entry.len() == cursor => {
                entry.extend(records);
                Some(entry.len())
            }
            Some(_) => None,
            None if cursor == 0 => {
                let len = records.len();
                self.entries.insert(email.to_string(), records);
                Some(len)
            }
            None => None,
        }
    }

    // == Slice ==
    /// Copies `[start, min(end, len))` of the entry for `email`.
    ///
    /// Out-of-range windows and unknown identities yield an empty vector.
    pub fn slice(&self, email: &str, start: usize, end: usize) -> Vec<TimeRecord> {
        match self.entries.get(email) {
            Some(records) => {
                let end = end.min(records.len());
                if start >= end {
                    Vec::new()
                } else {
                    records[start..end].to_vec()
                }
            }
            None => Vec::new(),
        }
    }

    // == Available Pages ==
    /// `ceil(cached / per_page)`, 0 for unknown identities.
    pub fn available_pages(&self, email: &str, per_page: usize) -> usize {
        let cached = self.cached_len(email).unwrap_or(0);
        cached.div_ceil(per_page.max(1))
    }

    pub fn last_clean_at(&self) -> DateTime<Utc> {
        self.last_clean_at
    }

    // == Clear If Expired ==
    /// Drops every entry if `ttl` has elapsed since the last clear.
    ///
    /// Returns the number of identities removed, or None if not yet expired.
    pub fn clear_if_expired(&mut self, now: DateTime<Utc>, ttl: Duration) -> Option<usize> {
        if !is_expired(now, self.last_clean_at, ttl) {
            return None;
        }

        let removed = self.entries.len();
        self.entries.clear();
        self.last_clean_at = now;
        Some(removed)
    }

    // == Length ==
    /// Returns the number of identities with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no identity has an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total records cached across all identities.
    pub fn total_records(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// True once `ttl` has fully elapsed since `last_clean_at`.
pub fn is_expired(now: DateTime<Utc>, last_clean_at: DateTime<Utc>, ttl: Duration) -> bool {
    now >= last_clean_at + ttl
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u32) -> TimeRecord {
        TimeRecord::new(
            format!("2023-01-{:02}T09:00:00.000+0000", n),
            format!("2023-01-{:02}T17:00:00.000+0000", n),
            "a@x.com".to_string(),
        )
    }

    #[test]
    fn test_store_new() {
        let now = Utc::now();
        let store = RecordStore::new(now);
        assert!(store.is_empty());
        assert_eq!(store.last_clean_at(), now);
        assert_eq!(store.cached_len("a@x.com"), None);
    }

    #[test]
    fn test_append_creates_and_grows() {
        let mut store = RecordStore::new(Utc::now());

        assert_eq!(store.append("a@x.com", 0, vec![record(1), record(2)]), Some(2));
        assert_eq!(store.append("a@x.com", 2, vec![record(3)]), Some(3));
        assert_eq!(store.cached_len("a@x.com"), Some(3));
        assert_eq!(store.total_records(), 3);
    }

    #[test]
    fn test_append_empty_batch_creates_entry() {
        let mut store = RecordStore::new(Utc::now());
        assert_eq!(store.append("a@x.com", 0, Vec::new()), Some(0));
        assert_eq!(store.cached_len("a@x.com"), Some(0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_rejects_stale_cursor() {
        let mut store = RecordStore::new(Utc::now());
        store.append("a@x.com", 0, vec![record(1), record(2)]);

        // Someone else already appended past cursor 1
        assert_eq!(store.append("a@x.com", 1, vec![record(2)]), None);
        assert_eq!(store.cached_len("a@x.com"), Some(2));
    }

    #[test]
    fn test_append_after_clear_needs_cursor_zero() {
        let start = Utc::now();
        let mut store = RecordStore::new(start);
        store.append("a@x.com", 0, vec![record(1)]);
        store.clear_if_expired(start + Duration::minutes(5), Duration::minutes(5));

        // A tail fetched before the clear must not become the head
        assert_eq!(store.append("a@x.com", 1, vec![record(2)]), None);
        assert_eq!(store.cached_len("a@x.com"), None);
        assert_eq!(store.append("a@x.com", 0, vec![record(1)]), Some(1));
    }

    #[test]
    fn test_slice_bounds() {
        let mut store = RecordStore::new(Utc::now());
        store.append("a@x.com", 0, (1..=5).map(record).collect());

        assert_eq!(store.slice("a@x.com", 1, 3), vec![record(2), record(3)]);
        assert_eq!(store.slice("a@x.com", 3, 100), vec![record(4), record(5)]);
        assert!(store.slice("a@x.com", 5, 10).is_empty());
        assert!(store.slice("a@x.com", 50, 60).is_empty());
        assert!(store.slice("b@x.com", 0, 10).is_empty());
    }

    #[test]
    fn test_available_pages() {
        let mut store = RecordStore::new(Utc::now());
        assert_eq!(store.available_pages("a@x.com", 10), 0);

        store.append("a@x.com", 0, (1..=3).map(record).collect());
        assert_eq!(store.available_pages("a@x.com", 10), 1);

        store.append("a@x.com", 3, (4..=20).map(record).collect());
        assert_eq!(store.available_pages("a@x.com", 10), 2);

        store.append("a@x.com", 20, vec![record(21)]);
        assert_eq!(store.available_pages("a@x.com", 10), 3);
    }

    #[test]
    fn test_clear_if_expired() {
        let start = Utc::now();
        let ttl = Duration::minutes(5);
        let mut store = RecordStore::new(start);
        store.append("a@x.com", 0, vec![record(1)]);
        store.append("b@x.com", 0, vec![record(2)]);

        assert_eq!(store.clear_if_expired(start + Duration::minutes(4), ttl), None);
        assert_eq!(store.len(), 2);

        let later = start + Duration::minutes(5);
        assert_eq!(store.clear_if_expired(later, ttl), Some(2));
        assert!(store.is_empty());
        assert_eq!(store.last_clean_at(), later);
    }

    #[test]
    fn test_expiry_boundary() {
        let start = Utc::now();
        let ttl = Duration::minutes(5);
        assert!(!is_expired(start + ttl - Duration::milliseconds(1), start, ttl));
        assert!(is_expired(start + ttl, start, ttl));
    }
}
