//! The refresh coordinator: turns a refresh token into a new access token,
//! at most one backend call in flight at a time.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::session::SessionHandle;
use crate::types::{Identity, RefreshRequest, RefreshResponse};

/// Obtains a new access token + identity from the refresh endpoint and
/// writes them into the session store wholesale.
///
/// Concurrent 401s from independently-initiated requests each ask for a
/// refresh; the coordinator coalesces them into one backend call
/// (single-flight) so racing refreshes cannot interleave writes to the
/// session store.
#[derive(Clone)]
pub struct RefreshCoordinator {
    http: reqwest::Client,
    config: Arc<SessionConfig>,
    session: SessionHandle,
    flight: Arc<tokio::sync::Mutex<()>>,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        http: reqwest::Client,
        config: Arc<SessionConfig>,
        session: SessionHandle,
    ) -> Self {
        Self {
            http,
            config,
            session,
            flight: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Refresh the access token.
    ///
    /// `observed_generation` is the session generation the caller saw when
    /// its request was dispatched. If the generation has advanced by the
    /// time this coordinator gets the flight lock, another caller already
    /// refreshed; the stored token is returned without a network call.
    ///
    /// # Errors
    ///
    /// [`Error::RefreshFailed`] when no refresh token is present, or when
    /// the refresh endpoint errors in any way (network, non-2xx, malformed
    /// body). On failure no partial write is made to the session.
    pub async fn refresh(&self, observed_generation: u64) -> Result<Identity, Error> {
        let _flight = self.flight.lock().await;

        // Someone else refreshed while we waited for the lock.
        if self.session.generation() > observed_generation {
            if let Some(identity) = self.session.identity() {
                if self.session.access_token().is_some() {
                    tracing::debug!("refresh coalesced into an earlier flight");
                    return Ok(identity);
                }
            }
        }

        let Some(refresh) = self.session.refresh_token() else {
            return Err(Error::RefreshFailed("no refresh token available".into()));
        };

        let url = self
            .config
            .endpoint(self.config.refresh_path())
            .map_err(|e| Error::RefreshFailed(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .timeout(self.config.timeout())
            .json(&RefreshRequest { refresh })
            .send()
            .await
            .map_err(|e| Error::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RefreshFailed(format!(
                "refresh endpoint returned {status}"
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| Error::RefreshFailed(format!("malformed refresh body: {e}")))?;

        let identity = body.identity();
        self.session.apply_refresh(body.access, identity.clone());
        tracing::info!(user = %identity.user_id, "access token refreshed");
        Ok(identity)
    }
}
