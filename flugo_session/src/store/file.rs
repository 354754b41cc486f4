//! A file-backed credential store

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};

use flugo_clock::{Clock, DurationSecs, System, UnixTime};

use super::SessionStore;
use crate::{CacheKeyRef, SessionToken, StoreError};

/// A credential store persisted as a single JSON file
///
/// A later process pointed at the same path can restore a still-valid
/// session instead of re-authenticating. The file holds bearer secrets,
/// so it is created with owner-only permissions.
///
/// Reads and writes go through an internal lock, so one store value may be
/// shared freely within a process. Separate processes writing the same
/// file race last-write-wins, the same ordering the manager itself
/// promises. Expired entries are pruned whenever the file is rewritten.
#[derive(Debug)]
pub struct FileStore<C = System> {
    path: PathBuf,
    lock: Mutex<()>,
    clock: C,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Shelf {
    entries: HashMap<String, Shelved>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Shelved {
    entry: SessionToken,
    evict_at: UnixTime,
}

impl FileStore {
    /// Constructs a store backed by the file at `path`
    ///
    /// The file is created on first write; a missing file reads as an
    /// empty store.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            clock: System,
        }
    }
}

impl<C> FileStore<C> {
    /// Sets a custom clock for TTL enforcement
    ///
    /// Useful for testing purposes
    pub fn with_clock<D>(self, clock: D) -> FileStore<D> {
        FileStore {
            path: self.path,
            lock: self.lock,
            clock,
        }
    }

    fn load(&self) -> Result<Shelf, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Shelf::default()),
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, shelf: &Shelf) -> Result<(), StoreError> {
        let mut file_opts = fs::OpenOptions::new();

        file_opts.create(true).truncate(true).write(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            file_opts.mode(0o600);
        }

        let mut file = file_opts.open(&self.path)?;
        let data = serde_json::to_string_pretty(shelf)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}

impl<C: Clock + Send + Sync> SessionStore for FileStore<C> {
    fn put(
        &self,
        key: &CacheKeyRef,
        entry: &SessionToken,
        ttl: DurationSecs,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::from("file store lock poisoned"))?;

        let mut shelf = self.load()?;
        shelf.entries.retain(|_, shelved| now < shelved.evict_at);
        shelf.entries.insert(
            key.as_str().to_owned(),
            Shelved {
                entry: entry.clone_entry(),
                evict_at: now + ttl,
            },
        );
        self.save(&shelf)
    }

    fn get(&self, key: &CacheKeyRef) -> Result<Option<SessionToken>, StoreError> {
        let now = self.clock.now();
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::from("file store lock poisoned"))?;

        let mut shelf = self.load()?;
        match shelf.entries.remove(key.as_str()) {
            Some(shelved) if now < shelved.evict_at => Ok(Some(shelved.entry)),
            _ => Ok(None),
        }
    }

    fn forget(&self, key: &CacheKeyRef) -> Result<(), StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::from("file store lock poisoned"))?;

        let mut shelf = self.load()?;
        if shelf.entries.remove(key.as_str()).is_some() {
            self.save(&shelf)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{current_slot, token_key};
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
    fn entries_survive_into_a_second_store_on_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let clock = TestClock::new(UnixTime(1_000));
        let key = token_key(&BearerToken::new("t-1".to_string()));

        let first = FileStore::new(path.clone()).with_clock(clock.clone());
        first
            .put(&key, &entry("t-1", 1_000, 1_600), DurationSecs(600))
            .unwrap();
        drop(first);

        let second = FileStore::new(path).with_clock(clock);
        let found = second.get(&key).unwrap().unwrap();

        assert_eq!(found.token().as_str(), "t-1");
        assert_eq!(found.expiry(), UnixTime(1_600));
    }

    #[test]
    fn a_missing_file_reads_as_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-written.json"));

        assert!(store.get(&current_slot()).unwrap().is_none());
    }

    #[test]
    fn entries_become_unreadable_once_their_ttl_elapses() {
        let dir = tempfile::tempdir().unwrap();
        let clock = TestClock::new(UnixTime(1_000));
        let store =
            FileStore::new(dir.path().join("sessions.json")).with_clock(clock.clone());
        let key = token_key(&BearerToken::new("t-2".to_string()));

        store
            .put(&key, &entry("t-2", 1_000, 1_060), DurationSecs(60))
            .unwrap();

        clock.advance(60);
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn rewrites_prune_entries_already_past_their_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let clock = TestClock::new(UnixTime(1_000));
        let store = FileStore::new(path.clone()).with_clock(clock.clone());

        let stale_key = token_key(&BearerToken::new("t-3".to_string()));
        store
            .put(&stale_key, &entry("t-3", 1_000, 1_030), DurationSecs(30))
            .unwrap();

        clock.advance(100);
        store
            .put(&current_slot(), &entry("t-4", 1_100, 1_700), DurationSecs(600))
            .unwrap();

        let data = fs::read_to_string(&path).unwrap();
        assert!(!data.contains(stale_key.as_str()));
    }

    #[cfg(unix)]
    #[test]
    fn the_backing_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let store = FileStore::new(path.clone());

        store
            .put(
                &token_key(&BearerToken::new("t-5".to_string())),
                &entry("t-5", 0, 600),
                DurationSecs(600),
            )
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
