use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Metadata attached to a route node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Display title for menus and the window title.
    #[serde(default)]
    pub title: Option<String>,
    /// Roles allowed to access the route. `None` means the route inherits
    /// its nearest ancestor's roles; a root-level route with `None` is
    /// accessible to every authenticated role.
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    /// Excluded from menus but still navigable.
    #[serde(default)]
    pub hidden: bool,
    /// Always-open tab. Irrelevant to permission logic.
    #[serde(default)]
    pub affix: bool,
}

/// One node of the route tree.
///
/// `name` must be unique across the whole tree; the live registry is keyed
/// by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default)]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.meta.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.meta.hidden = true;
        self
    }

    #[must_use]
    pub fn affix(mut self) -> Self {
        self.meta.affix = true;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chains() {
        let node = RouteNode::new("/teacher", "Teacher")
            .with_title("Teacher management")
            .with_roles(["ADMIN"])
            .hidden()
            .with_children(vec![RouteNode::new("create", "CreateTeacher")]);

        assert_eq!(node.path, "/teacher");
        assert_eq!(node.meta.title.as_deref(), Some("Teacher management"));
        assert_eq!(node.meta.roles, Some(vec![Role::from("ADMIN")]));
        assert!(node.meta.hidden);
        assert!(!node.meta.affix);
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].meta.roles.is_none());
    }

    #[test]
    fn meta_defaults_when_deserialized_sparse() {
        let node: RouteNode =
            serde_json::from_str(r#"{"path":"/login","name":"Login"}"#).unwrap();
        assert!(node.meta.roles.is_none());
        assert!(!node.meta.hidden);
        assert!(node.children.is_empty());
    }
}
