use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Backend user identifier (opaque string).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Role tag on an identity (`"ADMIN"`, `"TEACHER"`, `"STUDENT"`, ...).
///
/// Open set: the backend owns the vocabulary, this crate only compares tags.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct Role(pub String);

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Who the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
    pub name: String,
}

impl Identity {
    /// The identity's roles as a set.
    ///
    /// The backend models exactly one role per identity; consumers always
    /// see a one-element set so permission checks stay set-based.
    #[must_use]
    pub fn role_set(&self) -> Vec<Role> {
        vec![self.role.clone()]
    }
}

/// The credential pair owned by the session store.
///
/// Both fields are opaque bearer strings: `access` is short-lived,
/// `refresh` is long-lived and only ever sent to the refresh endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// Tokens never appear in logs or debug output.
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Body of a login request.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a successful login response.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user_id: UserId,
    pub role: Role,
    pub name: String,
}

impl LoginResponse {
    #[must_use]
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access: self.access.clone(),
            refresh: self.refresh.clone(),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            role: self.role.clone(),
            name: self.name.clone(),
        }
    }
}

/// Body of a refresh request.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Body of a successful refresh response.
///
/// The refresh endpoint returns a new access token plus the identity fields,
/// but never a new refresh token.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct RefreshResponse {
    pub access: String,
    pub user_id: UserId,
    pub role: Role,
    pub name: String,
}

impl RefreshResponse {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            role: self.role.clone(),
            name: self.name.clone(),
        }
    }
}
