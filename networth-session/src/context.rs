//! Explicit per-user session context.
//!
//! Replaces a global password slot: every call site that needs a key is
//! handed a `SessionContext`, which pairs the cache with the signed-in
//! user's id.

use crate::cache::SessionKeyCache;
use crate::error::SessionResult;
use networth_crypto::{DerivedKey, KdfParams};
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

#[derive(Clone, Debug)]
pub struct SessionContext {
    user_id: String,
    cache: Arc<SessionKeyCache>,
}

impl SessionContext {
    /// Binds `user_id` to an existing cache without touching its contents.
    pub fn new(user_id: impl Into<String>, cache: Arc<SessionKeyCache>) -> Self {
        Self {
            user_id: user_id.into(),
            cache,
        }
    }

    /// Authentication hook: called once after a successful sign-in or sign-up,
    /// before any protected read or write.
    pub fn sign_in(user_id: impl Into<String>, password: &str, cache: Arc<SessionKeyCache>) -> Self {
        let ctx = Self::new(user_id, cache);
        ctx.cache.store(password);
        debug!(user_id = %ctx.user_id, "session started");
        ctx
    }

    /// Authentication hook: called on explicit sign-out.
    pub fn sign_out(&self) {
        self.cache.clear();
        debug!(user_id = %self.user_id, "session ended");
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn cache(&self) -> &Arc<SessionKeyCache> {
        &self.cache
    }

    pub fn params(&self) -> &KdfParams {
        self.cache.params()
    }

    pub fn is_active(&self) -> bool {
        self.cache.is_active()
    }

    /// Current session password, or `MissingKey`.
    pub fn password(&self) -> SessionResult<Zeroizing<String>> {
        self.cache.require()
    }

    /// Key for this user, fetched fresh from the cache.
    pub fn key(&self) -> SessionResult<DerivedKey> {
        self.cache.key_for(&self.user_id)
    }
}
