//! The session store: the single mutable shared object of the layer.
//!
//! Tokens and identity are set and cleared together. No state exists where
//! an access token is present but identity is not, except transiently
//! during login before the response is applied.

use std::sync::{Arc, RwLock};

use crate::storage::{CredentialStore, MemoryStore, PersistedSession};
use crate::types::{Identity, Role, TokenPair};

#[derive(Debug, Clone)]
struct SessionState {
    tokens: TokenPair,
    identity: Option<Identity>,
    roles_resolved: bool,
}

#[derive(Debug)]
struct Inner {
    state: Option<SessionState>,
    /// Bumped on every credential write or clear. The refresh coordinator
    /// compares generations to detect that another caller already refreshed.
    generation: u64,
}

/// Cheaply cloneable handle to the current session.
///
/// All writers replace the credential/identity tuple wholesale; there are
/// no partial updates.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Inner>>,
    store: Arc<dyn CredentialStore>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    /// An empty session backed by an in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::default()))
    }

    /// A session backed by the given store. A previously persisted session
    /// is restored immediately, with roles left unresolved so the guard
    /// re-fetches identity on the first protected navigation.
    #[must_use]
    pub fn with_store(store: Arc<dyn CredentialStore>) -> Self {
        let state = store.load().map(|persisted| SessionState {
            tokens: TokenPair {
                access: persisted.access,
                refresh: persisted.refresh,
            },
            identity: persisted.identity,
            roles_resolved: false,
        });
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state,
                generation: 0,
            })),
            store,
        }
    }

    /// Install a fresh session after login. Roles start unresolved.
    pub fn establish(&self, tokens: TokenPair, identity: Identity) {
        let persisted = PersistedSession {
            access: tokens.access.clone(),
            refresh: tokens.refresh.clone(),
            identity: Some(identity.clone()),
        };
        {
            let mut inner = self.write();
            inner.state = Some(SessionState {
                tokens,
                identity: Some(identity),
                roles_resolved: false,
            });
            inner.generation += 1;
        }
        self.store.store(&persisted);
    }

    /// Apply a successful refresh: new access token plus identity, keeping
    /// the existing refresh token. A no-op if the session was cleared while
    /// the refresh was in flight; a dead session is never resurrected.
    pub(crate) fn apply_refresh(&self, access: String, identity: Identity) {
        let persisted = {
            let mut inner = self.write();
            let Some(state) = inner.state.as_mut() else {
                return;
            };
            state.tokens.access = access;
            state.identity = Some(identity);
            let snapshot = PersistedSession {
                access: state.tokens.access.clone(),
                refresh: state.tokens.refresh.clone(),
                identity: state.identity.clone(),
            };
            inner.generation += 1;
            snapshot
        };
        self.store.store(&persisted);
    }

    /// Record the identity fetched by the navigation guard and mark roles
    /// as resolved for the rest of the session.
    pub fn resolve_identity(&self, identity: Identity) {
        let persisted = {
            let mut inner = self.write();
            let Some(state) = inner.state.as_mut() else {
                return;
            };
            state.identity = Some(identity);
            state.roles_resolved = true;
            Some(PersistedSession {
                access: state.tokens.access.clone(),
                refresh: state.tokens.refresh.clone(),
                identity: state.identity.clone(),
            })
        };
        if let Some(persisted) = persisted {
            self.store.store(&persisted);
        }
    }

    /// Tear the session down: tokens, identity, resolved flag, and the
    /// credential store, together. Idempotent.
    pub fn clear(&self) {
        {
            let mut inner = self.write();
            inner.state = None;
            inner.generation += 1;
        }
        self.store.clear();
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .state
            .as_ref()
            .map(|s| s.tokens.access.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read()
            .state
            .as_ref()
            .map(|s| s.tokens.refresh.clone())
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.read().state.as_ref().and_then(|s| s.identity.clone())
    }

    /// Role set of the current identity; empty when logged out.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.identity().map(|i| i.role_set()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().state.is_some()
    }

    #[must_use]
    pub fn roles_resolved(&self) -> bool {
        self.read()
            .state
            .as_ref()
            .is_some_and(|s| s.roles_resolved)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        // Lock poisoning cannot happen: no writer panics while holding it.
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("SessionHandle")
            .field("authenticated", &inner.state.is_some())
            .field("generation", &inner.generation)
            .finish()
    }
}
