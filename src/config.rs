use std::time::Duration;

use url::Url;

use crate::error::Error;

const DEFAULT_LOGIN_PATH: &str = "/api/v1/accounts/login/";
const DEFAULT_REFRESH_PATH: &str = "/api/v1/accounts/refresh/";
const DEFAULT_IDENTITY_PATH: &str = "/api/v1/accounts/user/";
const DEFAULT_LOGIN_ROUTE: &str = "/login";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Session layer configuration.
///
/// The required field (`base_url`) is a constructor parameter; everything
/// else has a sensible default overridable by chaining.
///
/// ```rust,ignore
/// use codecollab_session::SessionConfig;
///
/// let config = SessionConfig::new("https://api.codecollab.example".parse()?)
///     .with_timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    base_url: Url,
    login_path: String,
    refresh_path: String,
    identity_path: String,
    login_route: String,
    timeout: Duration,
    dynamic_filtering: bool,
}

impl SessionConfig {
    /// Create a configuration pointing at the given backend.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            login_path: DEFAULT_LOGIN_PATH.into(),
            refresh_path: DEFAULT_REFRESH_PATH.into(),
            identity_path: DEFAULT_IDENTITY_PATH.into(),
            login_route: DEFAULT_LOGIN_ROUTE.into(),
            timeout: DEFAULT_TIMEOUT,
            dynamic_filtering: true,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Required env vars
    /// - `CODECOLLAB_BASE_URL`: backend base URL
    ///
    /// # Optional env vars
    /// - `CODECOLLAB_LOGIN_PATH`, `CODECOLLAB_REFRESH_PATH`,
    ///   `CODECOLLAB_IDENTITY_PATH`: endpoint path overrides
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is missing or invalid.
    pub fn from_env() -> Result<Self, Error> {
        let base = std::env::var("CODECOLLAB_BASE_URL")
            .map_err(|_| Error::Config("CODECOLLAB_BASE_URL is required".into()))?;
        let base_url: Url = base
            .parse()
            .map_err(|e| Error::Config(format!("CODECOLLAB_BASE_URL: {e}")))?;

        let mut config = Self::new(base_url);
        if let Ok(path) = std::env::var("CODECOLLAB_LOGIN_PATH") {
            config = config.with_login_path(path);
        }
        if let Ok(path) = std::env::var("CODECOLLAB_REFRESH_PATH") {
            config = config.with_refresh_path(path);
        }
        if let Ok(path) = std::env::var("CODECOLLAB_IDENTITY_PATH") {
            config = config.with_identity_path(path);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    #[must_use]
    pub fn with_identity_path(mut self, path: impl Into<String>) -> Self {
        self.identity_path = path.into();
        self
    }

    /// Override the route the host navigates to when unauthenticated.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable role-based filtering: every authenticated user gets the full
    /// protected route tree ("all routes" mode).
    #[must_use]
    pub fn with_dynamic_filtering(mut self, enabled: bool) -> Self {
        self.dynamic_filtering = enabled;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn refresh_path(&self) -> &str {
        &self.refresh_path
    }

    #[must_use]
    pub fn identity_path(&self) -> &str {
        &self.identity_path
    }

    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn dynamic_filtering(&self) -> bool {
        self.dynamic_filtering
    }

    /// Whether a request path is exempt from the bearer header.
    ///
    /// The exemption set is exactly {login endpoint, refresh endpoint}:
    /// those two never carry `Authorization` even when a token exists.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        path == self.login_path || path == self.refresh_path
    }

    /// Resolve a request path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid endpoint path {path:?}: {e}")))
    }
}
