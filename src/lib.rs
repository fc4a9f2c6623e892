//! Session layer for the CodeCollab single-page client.
//!
//! Keeps a short-lived access token valid across a browsing session,
//! transparently recovers from token expiry without disrupting in-flight
//! calls, and restricts navigation to the screens a user's role entitles
//! them to.
//!
//! # Architecture
//!
//! - [`SessionHandle`] holds the credential pair and identity; all writes
//!   are wholesale, never partial.
//! - [`Gateway`] wraps outbound calls: bearer header, 401-triggered
//!   refresh-and-retry (at most once), error normalization.
//! - [`RefreshCoordinator`] exchanges the refresh token for a new access
//!   token with single-flight semantics.
//! - [`nav`] filters the protected route tree by role and maintains the
//!   live registry; [`NavigationGuard`] ties it together per navigation.
//! - [`SessionLayer`] is the facade wiring all of the above.

pub mod config;
pub mod error;
pub mod gateway;
pub mod layer;
pub mod nav;
pub mod refresh;
pub mod session;
pub mod storage;
pub mod types;

pub use config::SessionConfig;
pub use error::{status_message, Error};
pub use gateway::{Gateway, RequestDescriptor};
pub use layer::SessionLayer;
pub use nav::{
    default_catalog, filter_accessible, has_permission, GuardState, NavigationGuard,
    RegisteredRoute, RouteCatalog, RouteMeta, RouteNode, RouteOrigin, RouteRegistry, Verdict,
};
pub use refresh::RefreshCoordinator;
pub use session::SessionHandle;
pub use storage::{CredentialStore, MemoryStore, PersistedSession};
pub use types::{
    Identity, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, Role, TokenPair,
    UserId,
};
