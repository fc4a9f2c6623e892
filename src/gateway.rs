//! The authenticated request gateway.
//!
//! Wraps every outbound call: attaches the bearer header, recovers from
//! access-token expiry with refresh-and-retry, and normalizes all failures
//! into [`Error`].

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::SessionConfig;
use crate::error::{status_message, Error};
use crate::nav::registry::RouteRegistry;
use crate::refresh::RefreshCoordinator;
use crate::session::SessionHandle;

/// A replayable description of an outbound request.
///
/// The gateway rebuilds the actual HTTP request from this on every attempt,
/// so a retry after refresh resubmits the exact original call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends requests on behalf of the screens.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    config: Arc<SessionConfig>,
    session: SessionHandle,
    refresher: RefreshCoordinator,
    registry: RouteRegistry,
}

impl Gateway {
    pub(crate) fn new(
        http: reqwest::Client,
        config: Arc<SessionConfig>,
        session: SessionHandle,
        registry: RouteRegistry,
    ) -> Self {
        let refresher = RefreshCoordinator::new(http.clone(), config.clone(), session.clone());
        Self {
            http,
            config,
            session,
            refresher,
            registry,
        }
    }

    /// Send a request and deserialize the declared payload.
    ///
    /// A 401 on a non-login request triggers one refresh and one resubmit
    /// of the identical descriptor; a 401 on the resubmit surfaces as a
    /// normal [`Error::Api`]. A failed refresh clears the session and the
    /// dynamic routes, and the call fails with [`Error::RefreshFailed`].
    ///
    /// # Errors
    ///
    /// See [`Error`] for the full taxonomy.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, Error> {
        // Generation snapshot before dispatch: if the token changes while
        // this request is in flight, the coordinator knows a refresh it is
        // asked for has already happened.
        let observed_generation = self.session.generation();
        let response = self.dispatch(request).await?;

        let expired = response.status() == StatusCode::UNAUTHORIZED
            && request.path != self.config.login_path();
        if expired {
            // The retry flag lives on this call: at most one resubmit,
            // never a second even if the retry also answers 401.
            return match self.refresher.refresh(observed_generation).await {
                Ok(_) => {
                    tracing::debug!(path = %request.path, "retrying request after refresh");
                    let retried = self.dispatch(request).await?;
                    Self::into_payload(retried).await
                }
                Err(err) => {
                    self.force_logout();
                    Err(err)
                }
            };
        }

        Self::into_payload(response).await
    }

    /// Build and send the HTTP request for a descriptor, once.
    async fn dispatch(&self, request: &RequestDescriptor) -> Result<reqwest::Response, Error> {
        let url = self.config.endpoint(&request.path)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .timeout(self.config.timeout());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        // Login and refresh never carry the header, even with a token present.
        if !self.config.is_exempt(&request.path) {
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }
        }

        builder.send().await.map_err(Error::from)
    }

    async fn into_payload<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Error> {
        if response.status().is_success() {
            return response.json::<T>().await.map_err(Error::from);
        }
        Err(Self::normalize_error(response).await)
    }

    /// Map a non-2xx response to a single human-readable message: the
    /// backend's own `message` field wins, then the fixed status table,
    /// then a generic status line. Status and raw body stay attached.
    async fn normalize_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        let backend_message = body
            .as_deref()
            .and_then(|b| serde_json::from_str::<serde_json::Value>(b).ok())
            .and_then(|v| v.get("message")?.as_str().map(str::to_owned));

        let message = backend_message
            .or_else(|| status_message(status).map(str::to_owned))
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Error::Api {
            status,
            message,
            body,
        }
    }

    /// Refresh failure means the session is gone: clear it and tear down
    /// the dynamic routes. The host navigates to the login route.
    fn force_logout(&self) {
        tracing::warn!("token refresh failed; clearing session and dynamic routes");
        self.session.clear();
        self.registry.reset_dynamic();
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
