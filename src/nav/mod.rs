//! Navigation: route tree, role-based permission resolution, the live
//! route registry, and the per-navigation guard state machine.
//!
//! The protected route tree is filtered once per session (on the first
//! navigation that needs it) and torn down entirely on logout.

pub mod catalog;
pub mod guard;
pub mod permission;
pub mod registry;
pub mod route;

pub use catalog::{default_catalog, RouteCatalog};
pub use guard::{GuardState, NavigationGuard, Verdict};
pub use permission::{filter_accessible, has_permission};
pub use registry::{RegisteredRoute, RouteOrigin, RouteRegistry};
pub use route::{RouteMeta, RouteNode};
