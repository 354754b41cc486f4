//! An in-process credential store

use std::{collections::HashMap, sync::Mutex};

use flugo_clock::{Clock, DurationSecs, System, UnixTime};

use super::SessionStore;
use crate::{CacheKeyRef, SessionToken, StoreError};

/// A credential store held entirely in process memory
///
/// TTLs are enforced lazily: an entry past its eviction time is dropped
/// the next time it is read. Suitable for a single process; it cannot
/// restore sessions across process boundaries.
#[derive(Debug, Default)]
pub struct MemoryStore<C = System> {
    entries: Mutex<HashMap<String, Shelved>>,
    clock: C,
}

#[derive(Debug)]
struct Shelved {
    entry: SessionToken,
    evict_at: UnixTime,
}

impl MemoryStore {
    /// Constructs an empty store on the system clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> MemoryStore<C> {
    /// Sets a custom clock for TTL enforcement
    ///
    /// Useful for testing purposes
    pub fn with_clock<D>(self, clock: D) -> MemoryStore<D> {
        MemoryStore {
            entries: self.entries,
            clock,
        }
    }
}

impl<C: Clock + Send + Sync> SessionStore for MemoryStore<C> {
    fn put(
        &self,
        key: &CacheKeyRef,
        entry: &SessionToken,
        ttl: DurationSecs,
    ) -> Result<(), StoreError> {
        let evict_at = self.clock.now() + ttl;
        let shelved = Shelved {
            entry: entry.clone_entry(),
            evict_at,
        };

        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::from("memory store lock poisoned"))?;
        entries.insert(key.as_str().to_owned(), shelved);
        Ok(())
    }

    fn get(&self, key: &CacheKeyRef) -> Result<Option<SessionToken>, StoreError> {
        let now = self.clock.now();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::from("memory store lock poisoned"))?;

        match entries.get(key.as_str()) {
            Some(shelved) if now < shelved.evict_at => Ok(Some(shelved.entry.clone_entry())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn forget(&self, key: &CacheKeyRef) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::from("memory store lock poisoned"))?;
        entries.remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::token_key;
    use crate::{BearerToken, SessionContext};
    use flugo_clock::TestClock;

    fn entry(value: &str, issued: u64, expiry: u64) -> SessionToken {
        SessionToken::new(
            BearerToken::new(value.to_string()),
            SessionContext::new(),
            UnixTime(issued),
            UnixTime(expiry),
        )
    }

    #[test]
    fn entries_become_unreadable_once_their_ttl_elapses() {
        let clock = TestClock::new(UnixTime(1_000));
        let store = MemoryStore::new().with_clock(clock.clone());
        let key = token_key(&BearerToken::new("t-1".to_string()));

        store
            .put(&key, &entry("t-1", 1_000, 1_060), DurationSecs(60))
            .unwrap();

        clock.advance(59);
        assert!(store.get(&key).unwrap().is_some());

        clock.advance(1);
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn forgetting_removes_an_entry_before_its_ttl() {
        let clock = TestClock::new(UnixTime(1_000));
        let store = MemoryStore::new().with_clock(clock.clone());
        let key = token_key(&BearerToken::new("t-2".to_string()));

        store
            .put(&key, &entry("t-2", 1_000, 1_600), DurationSecs(600))
            .unwrap();
        store.forget(&key).unwrap();

        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn forgetting_an_unknown_key_is_a_no_op() {
        let store = MemoryStore::new();
        let key = token_key(&BearerToken::new("never-stored".to_string()));

        store.forget(&key).unwrap();
    }

    #[test]
    fn a_rewrite_replaces_the_entry_and_its_ttl() {
        let clock = TestClock::new(UnixTime(1_000));
        let store = MemoryStore::new().with_clock(clock.clone());
        let key = token_key(&BearerToken::new("t-3".to_string()));

        store
            .put(&key, &entry("t-3", 1_000, 1_030), DurationSecs(30))
            .unwrap();
        store
            .put(&key, &entry("t-3", 1_000, 1_600), DurationSecs(600))
            .unwrap();

        clock.advance(100);
        let found = store.get(&key).unwrap().unwrap();
        assert_eq!(found.expiry(), UnixTime(1_600));
    }
}
