//! The navigation guard: a small state machine evaluated once per
//! navigation attempt.
//!
//! Guard runs for a single navigation complete before the next begins (the
//! host serializes navigation hooks), so route registration needs no extra
//! locking here.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::gateway::{Gateway, RequestDescriptor};
use crate::nav::catalog::RouteCatalog;
use crate::nav::registry::RouteRegistry;
use crate::session::SessionHandle;
use crate::types::{Identity, Role};

/// Where the session currently stands, as the guard sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No credential. Initial state, and the state after logout or any
    /// guard failure.
    Unauthenticated,
    /// Logged in, but roles not yet resolved this session.
    RolesUnresolved,
    /// Logged in with routes registered.
    RolesResolved,
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Continue to the destination.
    Proceed,
    /// Navigate elsewhere instead, optionally surfacing a message.
    Redirect {
        to: String,
        message: Option<String>,
    },
    /// Re-dispatch the same navigation, replacing the history entry, so
    /// freshly registered routes are resolvable.
    Redispatch { to: String },
}

/// Evaluates navigation attempts against the session and the route
/// registry, resolving roles on the first protected navigation.
#[derive(Clone)]
pub struct NavigationGuard {
    config: Arc<SessionConfig>,
    session: SessionHandle,
    catalog: Arc<RouteCatalog>,
    registry: RouteRegistry,
    gateway: Gateway,
}

impl NavigationGuard {
    pub(crate) fn new(
        config: Arc<SessionConfig>,
        session: SessionHandle,
        catalog: Arc<RouteCatalog>,
        registry: RouteRegistry,
        gateway: Gateway,
    ) -> Self {
        Self {
            config,
            session,
            catalog,
            registry,
            gateway,
        }
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        if !self.session.is_authenticated() {
            GuardState::Unauthenticated
        } else if self.session.roles_resolved() {
            GuardState::RolesResolved
        } else {
            GuardState::RolesUnresolved
        }
    }

    /// Evaluate one navigation attempt to `to`.
    pub async fn before_each(&self, to: &str) -> Verdict {
        match self.state() {
            GuardState::Unauthenticated => {
                if self.catalog.is_public(to) {
                    return Verdict::Proceed;
                }
                tracing::debug!(to, "unauthenticated navigation, redirecting to login");
                Verdict::Redirect {
                    to: self.config.login_route().to_owned(),
                    message: None,
                }
            }
            // The login page handles its own post-auth redirect; never loop.
            _ if to == self.config.login_route() => Verdict::Proceed,
            GuardState::RolesResolved => Verdict::Proceed,
            GuardState::RolesUnresolved => match self.resolve_roles().await {
                Ok(roles) => {
                    self.install_routes(&roles);
                    Verdict::Redispatch { to: to.to_owned() }
                }
                Err(err) => {
                    tracing::error!(error = %err, "role resolution failed, clearing session");
                    self.session.clear();
                    Verdict::Redirect {
                        to: self.config.login_route().to_owned(),
                        message: Some(err.to_string()),
                    }
                }
            },
        }
    }

    /// Fetch the current identity and mark roles resolved.
    async fn resolve_roles(&self) -> Result<Vec<Role>, Error> {
        let identity: Identity = self
            .gateway
            .send(&RequestDescriptor::get(self.config.identity_path()))
            .await
            .map_err(|e| Error::IdentityFetchFailed(e.to_string()))?;

        self.session.resolve_identity(identity.clone());
        Ok(identity.role_set())
    }

    fn install_routes(&self, roles: &[Role]) {
        if self.config.dynamic_filtering() {
            self.catalog.install_for_roles(&self.registry, roles);
        } else {
            self.catalog.install_all(&self.registry);
        }
        tracing::info!(
            routes = self.registry.len(),
            ?roles,
            "accessible routes registered"
        );
    }

    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }
}
