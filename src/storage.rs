//! Consumer-provided credential persistence.
//!
//! The browser original keeps the access token in a short-lived store and
//! the refresh token plus cached identity in a longer-lived one. This crate
//! funnels both through a single [`CredentialStore`] seam; implementations
//! are free to split the fields across stores, as long as everything is
//! cleared together on logout or refresh failure.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::Identity;

/// Snapshot of the session handed to the store on every credential write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub access: String,
    pub refresh: String,
    pub identity: Option<Identity>,
}

/// Consumer-provided persistence for session credentials.
///
/// # Example
///
/// ```rust,ignore
/// struct DiskStore { path: PathBuf }
///
/// impl CredentialStore for DiskStore {
///     fn load(&self) -> Option<PersistedSession> {
///         let raw = std::fs::read_to_string(&self.path).ok()?;
///         serde_json::from_str(&raw).ok()
///     }
///     fn store(&self, session: &PersistedSession) { /* write json */ }
///     fn clear(&self) { let _ = std::fs::remove_file(&self.path); }
/// }
/// ```
pub trait CredentialStore: Send + Sync + 'static {
    /// Load a previously persisted session, if any.
    fn load(&self) -> Option<PersistedSession>;

    /// Persist the current session wholesale.
    fn store(&self, session: &PersistedSession);

    /// Drop everything. Called on logout and on refresh failure.
    fn clear(&self);
}

/// In-memory store, the default. Useful for tests and hosts that accept
/// losing the session on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<PersistedSession>>,
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<PersistedSession> {
        self.slot.lock().ok()?.clone()
    }

    fn store(&self, session: &PersistedSession) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}
