//! The session layer facade: wires the store, registry, gateway, and guard
//! together and owns login/logout.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::gateway::{Gateway, RequestDescriptor};
use crate::nav::catalog::RouteCatalog;
use crate::nav::guard::NavigationGuard;
use crate::nav::registry::RouteRegistry;
use crate::session::SessionHandle;
use crate::storage::{CredentialStore, MemoryStore};
use crate::types::{Identity, LoginResponse};

/// The assembled session layer.
///
/// One value per application; components share state through cheap clones,
/// so handing `gateway().clone()` to each screen is the expected pattern.
///
/// ```rust,ignore
/// use codecollab_session::{SessionConfig, SessionLayer};
///
/// let layer = SessionLayer::new(SessionConfig::new(base_url));
/// let identity = layer.login("a@b.com", "secret").await?;
/// match layer.guard().before_each("/code_week/subject-list").await {
///     Verdict::Proceed => { /* render */ }
///     Verdict::Redirect { to, .. } => { /* navigate */ }
///     Verdict::Redispatch { to } => { /* replace history, re-run */ }
/// }
/// ```
pub struct SessionLayer {
    config: Arc<SessionConfig>,
    session: SessionHandle,
    registry: RouteRegistry,
    catalog: Arc<RouteCatalog>,
    gateway: Gateway,
    guard: NavigationGuard,
}

impl SessionLayer {
    /// Assemble with the default route catalog, an in-memory credential
    /// store, and a fresh HTTP client.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_parts(
            config,
            RouteCatalog::default(),
            Arc::new(MemoryStore::default()),
            reqwest::Client::new(),
        )
    }

    /// Assemble with a custom catalog, credential store, and HTTP client
    /// (the latter for connection pool reuse or testing).
    #[must_use]
    pub fn with_parts(
        config: SessionConfig,
        catalog: RouteCatalog,
        store: Arc<dyn CredentialStore>,
        http: reqwest::Client,
    ) -> Self {
        let config = Arc::new(config);
        let catalog = Arc::new(catalog);
        let session = SessionHandle::with_store(store);
        let registry = RouteRegistry::new();
        catalog.install_constant(&registry);

        let gateway = Gateway::new(http, config.clone(), session.clone(), registry.clone());
        let guard = NavigationGuard::new(
            config.clone(),
            session.clone(),
            catalog.clone(),
            registry.clone(),
            gateway.clone(),
        );

        Self {
            config,
            session,
            registry,
            catalog,
            gateway,
            guard,
        }
    }

    /// Log in and establish the session.
    ///
    /// The login request is exempt from the bearer header. On success the
    /// credential pair and identity are written to the session store
    /// atomically; roles stay unresolved until the guard's first protected
    /// navigation.
    ///
    /// # Errors
    ///
    /// [`Error::Api`] with the backend's message on rejected credentials,
    /// [`Error::Http`] on transport failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, Error> {
        let request = RequestDescriptor::post(
            self.config.login_path(),
            serde_json::json!({ "email": email, "password": password }),
        );
        let response: LoginResponse = self.gateway.send(&request).await?;
        let identity = response.identity();
        self.session.establish(response.token_pair(), identity.clone());
        tracing::info!(user = %identity.user_id, "login successful");
        Ok(identity)
    }

    /// Tear the session down explicitly: credentials, persisted state, and
    /// every dynamic route, then hand back the login route for the host to
    /// navigate to. Idempotent; there is no full-page-reload crutch.
    pub fn logout(&self) -> &str {
        tracing::info!("logout; resetting session and dynamic routes");
        self.session.clear();
        self.registry.reset_dynamic();
        self.config.login_route()
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    #[must_use]
    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
