//! Backends holding the session password.
//!
//! In the browser build this is session-scoped storage (gone when the tab
//! closes). Native builds and tests use [`MemorySessionStore`], which lives
//! exactly as long as the logical session that owns it.

use std::sync::{PoisonError, RwLock};
use zeroize::Zeroizing;

/// Storage tier for the session password. Must never persist across restarts.
pub trait SessionStore: Send + Sync {
    /// Current password, if any.
    fn load(&self) -> Option<Zeroizing<String>>;

    /// Replaces the stored password.
    fn save(&self, password: &str);

    /// Forgets the stored password.
    fn remove(&self);
}

/// In-memory session store. The password is zeroized when replaced or removed.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Zeroizing<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Zeroizing<String>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, password: &str) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Zeroizing::new(password.to_string()));
    }

    fn remove(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore").finish_non_exhaustive()
    }
}
