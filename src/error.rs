/// Errors surfaced by the session layer.
///
/// The request gateway is the single normalization boundary: callers either
/// get a successful payload or one of these, each carrying a single
/// human-readable message. Status code and raw body stay attached on
/// [`Error::Api`] for callers needing detail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, bad TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the backend.
    ///
    /// `message` is the backend's own `message` field when the body carried
    /// one, otherwise the fixed per-status fallback from
    /// [`status_message`], otherwise a generic status line.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// Token refresh failed. The session has already been cleared; the host
    /// should navigate to the login route.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Identity fetch during navigation guard resolution failed.
    #[error("identity fetch failed: {0}")]
    IdentityFetchFailed(String),

    /// Missing or invalid endpoint configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status code, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Fixed fallback message for a handful of well-known statuses.
///
/// Used only when the backend response body did not carry its own `message`
/// field. Unmapped statuses keep the underlying transport message.
#[must_use]
pub fn status_message(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Bad request"),
        403 => Some("Access denied"),
        404 => Some("Requested resource not found"),
        408 => Some("Request timed out"),
        500 => Some("Internal server error"),
        501 => Some("Not implemented"),
        502 => Some("Bad gateway"),
        503 => Some("Service unavailable"),
        504 => Some("Gateway timeout"),
        505 => Some("HTTP version not supported"),
        _ => None,
    }
}
