//! Session key cache for the net-worth tracker.
//!
//! The login password is held only for the lifetime of a session (never in
//! storage that survives a restart). Keys are re-derived from it on demand
//! and memoised until the session changes.

mod cache;
mod context;
mod error;
mod store;

pub use cache::SessionKeyCache;
pub use context::SessionContext;
pub use error::{SessionError, SessionResult};
pub use store::{MemorySessionStore, SessionStore};
