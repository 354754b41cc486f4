//! The credential store contract and its key scheme
//!
//! The store is a plain key-value cache with per-entry time-to-live. It
//! carries no session semantics of its own: every key it ever sees is
//! derived here, and what it holds is opaque to it. An entry must be
//! unreadable no later than its TTL after the write that stored it, and
//! becomes unreadable earlier only through [`forget`][SessionStore::forget]
//! or a store-wide flush, never silently on read.
//!
//! Two kinds of key are in play. Each admitted token is filed under a
//! digest of its value, so any process that holds the token value can look
//! its record up without the raw secret ever entering the key space. The
//! store's single [`current_slot`] additionally names the active session
//! for the whole store namespace, which is what lets a fresh process pick
//! up a still-valid session without knowing any token value at all.

use sha2::{Digest, Sha256};

use crate::{BearerTokenRef, CacheKey, CacheKeyRef, SessionToken, StoreError};
use flugo_clock::DurationSecs;

#[cfg(feature = "file")]
pub mod file;
pub mod memory;

#[cfg(feature = "file")]
pub use file::FileStore;
pub use memory::MemoryStore;

const KEY_PREFIX: &str = "flugo.session";

/// The well-known key naming the store namespace's active session
///
/// Processes sharing a store share this slot, and with it the session.
pub fn current_slot() -> CacheKey {
    CacheKey::new(format!("{KEY_PREFIX}.current"))
}

/// The digest-derived key for one concrete token value
pub fn token_key(token: &BearerTokenRef) -> CacheKey {
    let digest = Sha256::digest(token.as_str().as_bytes());
    CacheKey::new(format!("{KEY_PREFIX}.token.{digest:x}"))
}

/// A key-value cache with per-entry TTL, holding session records
///
/// Writes for different keys are not ordered relative to each other, and
/// concurrent writers race last-write-wins; the manager layers its own
/// ordering on top. Operations are synchronous and must not suspend, so
/// implementations stay off the network.
pub trait SessionStore: Send + Sync {
    /// Writes `entry` under `key`, to be evicted once `ttl` has elapsed
    fn put(&self, key: &CacheKeyRef, entry: &SessionToken, ttl: DurationSecs)
        -> Result<(), StoreError>;

    /// Reads the entry under `key`
    ///
    /// Absent if the key was never written, was forgotten, or has outlived
    /// its TTL.
    fn get(&self, key: &CacheKeyRef) -> Result<Option<SessionToken>, StoreError>;

    /// Drops the entry under `key`; unknown keys are a no-op
    fn forget(&self, key: &CacheKeyRef) -> Result<(), StoreError>;
}
