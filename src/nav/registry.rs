//! The live route registry backing navigation.

use std::sync::{Arc, RwLock};

use crate::nav::route::RouteNode;

/// Where a registered route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    /// Always-public route, present regardless of auth state.
    Constant,
    /// Came from the protected tree; removed by [`RouteRegistry::reset_dynamic`].
    Dynamic,
}

/// A flattened, navigable route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRoute {
    pub name: String,
    /// Full path with ancestor segments joined in.
    pub full_path: String,
    pub title: Option<String>,
    pub hidden: bool,
    pub origin: RouteOrigin,
}

/// Registry of currently navigable routes, keyed by unique route name.
///
/// Registration is idempotent: a name already present is left untouched,
/// never an error. Insertion order is preserved for menu rendering.
#[derive(Clone, Default)]
pub struct RouteRegistry {
    inner: Arc<RwLock<Vec<RegisteredRoute>>>,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every node of `routes` (recursively), tagging entries with
    /// `origin`. Child paths are joined onto their parent's.
    pub fn register(&self, routes: &[RouteNode], origin: RouteOrigin) {
        let mut entries = self.write();
        for route in routes {
            Self::register_node(&mut entries, route, "", origin);
        }
    }

    fn register_node(
        entries: &mut Vec<RegisteredRoute>,
        node: &RouteNode,
        parent_path: &str,
        origin: RouteOrigin,
    ) {
        let full_path = join_paths(parent_path, &node.path);
        if !entries.iter().any(|e| e.name == node.name) {
            entries.push(RegisteredRoute {
                name: node.name.clone(),
                full_path: full_path.clone(),
                title: node.meta.title.clone(),
                hidden: node.meta.hidden,
                origin,
            });
        }
        for child in &node.children {
            Self::register_node(entries, child, &full_path, origin);
        }
    }

    /// Remove every route that came from the protected tree, leaving the
    /// always-public routes untouched. A no-op on a clean registry.
    pub fn reset_dynamic(&self) {
        self.write().retain(|e| e.origin == RouteOrigin::Constant);
    }

    #[must_use]
    pub fn route_by_name(&self, name: &str) -> Option<RegisteredRoute> {
        self.read().iter().find(|e| e.name == name).cloned()
    }

    /// Match a concrete path against the registered routes. Path segments
    /// starting with `:` are parameters and match any non-empty segment.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<RegisteredRoute> {
        self.read()
            .iter()
            .find(|e| path_matches(&e.full_path, path))
            .cloned()
    }

    /// Names of all registered routes, in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|e| e.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<RegisteredRoute>> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<RegisteredRoute>> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.names())
            .finish()
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_owned();
    }
    if child.is_empty() {
        return if parent.is_empty() { "/".to_owned() } else { parent.to_owned() };
    }
    if parent.is_empty() || parent == "/" {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return false;
    }
    pattern_segments
        .iter()
        .zip(&path_segments)
        .all(|(pattern_seg, path_seg)| {
            pattern_seg.starts_with(':') || pattern_seg == path_seg
        })
}
