//! Pure role-based filtering of the protected route tree.

use crate::nav::route::RouteNode;
use crate::types::Role;

/// Whether `roles` grants access to `node`.
///
/// A node with its own `roles` tag requires a non-empty intersection. An
/// untagged node defers to its parent; with no ancestor at all, access is
/// granted to every authenticated role.
#[must_use]
pub fn has_permission(roles: &[Role], node: &RouteNode, parent: Option<&RouteNode>) -> bool {
    match &node.meta.roles {
        Some(required) => required.iter().any(|r| roles.contains(r)),
        None => parent.is_none_or(|p| has_permission(roles, p, None)),
    }
}

/// Filter the protected tree down to what `roles` can access.
///
/// Pure: the input is never mutated and the same `(routes, roles)` always
/// yields the same output. Nodes failing the check are dropped with their
/// entire subtree; sibling order is preserved. Kept children that did not
/// author their own `roles` receive the parent's, so inheritance is
/// materialized explicitly in the output rather than left implicit.
#[must_use]
pub fn filter_accessible(routes: &[RouteNode], roles: &[Role]) -> Vec<RouteNode> {
    filter_level(routes, roles, None)
}

fn filter_level(
    routes: &[RouteNode],
    roles: &[Role],
    parent: Option<&RouteNode>,
) -> Vec<RouteNode> {
    let mut kept = Vec::new();
    for route in routes {
        if !has_permission(roles, route, parent) {
            continue;
        }
        let mut node = route.clone();
        node.children = filter_level(&route.children, roles, Some(route))
            .into_iter()
            .map(|mut child| {
                if child.meta.roles.is_none() {
                    child.meta.roles = route.meta.roles.clone();
                }
                child
            })
            .collect();
        kept.push(node);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::route::RouteNode;

    fn roles(tags: &[&str]) -> Vec<Role> {
        tags.iter().copied().map(Role::from).collect()
    }

    #[test]
    fn keeps_overlapping_and_drops_disjoint_siblings() {
        let tree = vec![
            RouteNode::new("/shared", "Shared").with_roles(["ADMIN", "STUDENT"]),
            RouteNode::new("/admin-only", "AdminOnly").with_roles(["ADMIN"]),
        ];

        let filtered = filter_accessible(&tree, &roles(&["STUDENT"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Shared");
    }

    #[test]
    fn untagged_child_inherits_parent_roles() {
        let tree = vec![RouteNode::new("/teacher", "Teacher")
            .with_roles(["TEACHER"])
            .with_children(vec![RouteNode::new("create", "Create")])];

        let as_teacher = filter_accessible(&tree, &roles(&["TEACHER"]));
        assert_eq!(as_teacher.len(), 1);
        assert_eq!(as_teacher[0].children.len(), 1);

        let as_student = filter_accessible(&tree, &roles(&["STUDENT"]));
        assert!(as_student.is_empty());
    }

    #[test]
    fn inheritance_is_materialized_on_kept_children() {
        let tree = vec![RouteNode::new("/teacher", "Teacher")
            .with_roles(["TEACHER"])
            .with_children(vec![RouteNode::new("create", "Create")])];

        let filtered = filter_accessible(&tree, &roles(&["TEACHER"]));
        assert_eq!(
            filtered[0].children[0].meta.roles,
            Some(roles(&["TEACHER"]))
        );
    }

    #[test]
    fn child_with_own_roles_keeps_them() {
        let tree = vec![RouteNode::new("/code_week", "CodeWeek")
            .with_roles(["TEACHER", "ADMIN", "STUDENT"])
            .with_children(vec![
                RouteNode::new("course-manage", "CourseManage").with_roles(["TEACHER", "ADMIN"]),
                RouteNode::new("course-list", "CourseList").with_roles(["STUDENT"]),
            ])];

        let filtered = filter_accessible(&tree, &roles(&["STUDENT"]));
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].name, "CourseList");
        assert_eq!(
            filtered[0].children[0].meta.roles,
            Some(roles(&["STUDENT"]))
        );
    }

    #[test]
    fn rootless_untagged_route_is_open_to_everyone() {
        let tree = vec![RouteNode::new("/about", "About")];
        let filtered = filter_accessible(&tree, &roles(&["STUDENT"]));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn sibling_order_is_preserved() {
        let tree = vec![
            RouteNode::new("/a", "A").with_roles(["STUDENT"]),
            RouteNode::new("/b", "B").with_roles(["ADMIN"]),
            RouteNode::new("/c", "C").with_roles(["STUDENT"]),
        ];
        let filtered = filter_accessible(&tree, &roles(&["STUDENT"]));
        let names: Vec<_> = filtered.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn input_is_not_mutated_and_result_is_deterministic() {
        let tree = vec![RouteNode::new("/teacher", "Teacher")
            .with_roles(["TEACHER"])
            .with_children(vec![RouteNode::new("create", "Create")])];
        let snapshot = tree.clone();

        let first = filter_accessible(&tree, &roles(&["TEACHER"]));
        let second = filter_accessible(&tree, &roles(&["TEACHER"]));
        assert_eq!(tree, snapshot);
        assert_eq!(first, second);
        // The input child is untouched even though the output materialized roles.
        assert!(tree[0].children[0].meta.roles.is_none());
    }
}
