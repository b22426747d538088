//! Session key cache.
//!
//! Holds the login password for the lifetime of a session so protected reads
//! and writes don't have to re-prompt. The derived key for the last
//! (password, user) pair is memoised and only reused while the backend still
//! holds that same password, so caches sharing one backend stay consistent.
//!
//! Callers must fetch from the cache on every operation instead of keeping
//! the password or key around: the cache may be cleared between two calls.

use crate::error::{SessionError, SessionResult};
use crate::store::{MemorySessionStore, SessionStore};
use networth_crypto::{derive_key_with_params, DerivedKey, KdfParams};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use zeroize::Zeroizing;

struct MemoizedKey {
    password: Zeroizing<String>,
    user_id: String,
    key: DerivedKey,
}

/// Password cache with an injectable backend.
pub struct SessionKeyCache {
    store: Arc<dyn SessionStore>,
    params: KdfParams,
    memo: Mutex<Option<MemoizedKey>>,
}

impl SessionKeyCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_params(store, KdfParams::default())
    }

    pub fn with_params(store: Arc<dyn SessionStore>, params: KdfParams) -> Self {
        Self {
            store,
            params,
            memo: Mutex::new(None),
        }
    }

    /// Cache backed by a fresh [`MemorySessionStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Stores the password captured at sign-in / sign-up.
    pub fn store(&self, password: &str) {
        self.store.save(password);
        self.invalidate();
        debug!("session password stored");
    }

    /// Returns the stored password, or `None` when the user must sign in again.
    pub fn get(&self) -> Option<Zeroizing<String>> {
        self.store.load()
    }

    /// Like [`get`](Self::get), but absence is a [`SessionError::MissingKey`].
    pub fn require(&self) -> SessionResult<Zeroizing<String>> {
        self.get().ok_or(SessionError::MissingKey)
    }

    /// Forgets the password and the memoised key. Called on sign-out only.
    pub fn clear(&self) {
        self.store.remove();
        self.invalidate();
        debug!("session password cleared");
    }

    pub fn is_active(&self) -> bool {
        self.get().is_some()
    }

    /// Returns the key for `user_id`, deriving it only when the memo is stale.
    ///
    /// The backend is read on every call; the memo is keyed by the password
    /// it was derived from, not by who last wrote it.
    pub fn key_for(&self, user_id: &str) -> SessionResult<DerivedKey> {
        let password = self.require()?;

        {
            let memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(m) = memo.as_ref() {
                if m.user_id == user_id && m.password == password {
                    debug!("session key cache hit");
                    return Ok(m.key.clone());
                }
            }
        }

        debug!("session key cache miss, deriving");
        let key = derive_key_with_params(&password, user_id, &self.params)?;

        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        *memo = Some(MemoizedKey {
            password,
            user_id: user_id.to_string(),
            key: key.clone(),
        });
        Ok(key)
    }

    fn invalidate(&self) {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        *memo = None;
    }
}

impl Default for SessionKeyCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for SessionKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeyCache")
            .field("active", &self.is_active())
            .field("iterations", &self.params.iterations)
            .finish_non_exhaustive()
    }
}
