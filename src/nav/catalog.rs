//! The route catalog: the static public tree plus the permission-tagged
//! protected tree, and the two installation modes that feed the registry.

use crate::nav::permission::filter_accessible;
use crate::nav::registry::{RouteOrigin, RouteRegistry};
use crate::nav::route::RouteNode;
use crate::types::Role;

/// Paths reachable without authentication.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/register", "/403", "/404"];

/// The static route trees of the application.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    constant: Vec<RouteNode>,
    dynamic: Vec<RouteNode>,
    public_paths: Vec<String>,
}

impl RouteCatalog {
    #[must_use]
    pub fn new(constant: Vec<RouteNode>, dynamic: Vec<RouteNode>) -> Self {
        Self {
            constant,
            dynamic,
            public_paths: PUBLIC_PATHS.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Override the unauthenticated allow-list.
    #[must_use]
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn constant(&self) -> &[RouteNode] {
        &self.constant
    }

    #[must_use]
    pub fn dynamic(&self) -> &[RouteNode] {
        &self.dynamic
    }

    /// Whether a destination is reachable without authentication.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }

    /// Install the always-public tree. Done once at setup.
    pub fn install_constant(&self, registry: &RouteRegistry) {
        registry.register(&self.constant, RouteOrigin::Constant);
    }

    /// Filtered mode: register the subtree of the protected tree that
    /// `roles` can access.
    pub fn install_for_roles(&self, registry: &RouteRegistry, roles: &[Role]) {
        let accessible = filter_accessible(&self.dynamic, roles);
        registry.register(&accessible, RouteOrigin::Dynamic);
    }

    /// All-routes mode: register the whole protected tree, used when
    /// role-based filtering is disabled.
    pub fn install_all(&self, registry: &RouteRegistry) {
        registry.register(&self.dynamic, RouteOrigin::Dynamic);
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        default_catalog()
    }
}

/// The CodeCollab route table.
#[must_use]
pub fn default_catalog() -> RouteCatalog {
    let constant = vec![
        RouteNode::new("/register", "Register").hidden(),
        RouteNode::new("/403", "Forbidden").hidden(),
        RouteNode::new("/404", "NotFound").hidden(),
        RouteNode::new("/login", "Login").hidden(),
        RouteNode::new("/", "Home")
            .with_title("Dashboard")
            .with_children(vec![RouteNode::new("", "Dashboard")
                .with_title("Dashboard")
                .affix()]),
    ];

    let dynamic = vec![
        RouteNode::new("/permission", "Permission")
            .with_title("Permission demo")
            .with_roles(["ADMIN"])
            .hidden()
            .with_children(vec![
                RouteNode::new("page-level", "PermissionPageLevel")
                    .with_title("Page level")
                    .with_roles(["ADMIN"]),
                RouteNode::new("button-level", "PermissionButtonLevel")
                    .with_title("Button level")
                    .with_roles(["ADMIN"]),
            ]),
        RouteNode::new("/student", "Student")
            .with_title("Student sandbox")
            .with_roles(["STUDENT"])
            .hidden()
            .with_children(vec![
                RouteNode::new("stu-test", "StudentTest")
                    .with_title("Student permission test")
                    .with_roles(["STUDENT"]),
                RouteNode::new("stu-test2", "StudentTest2")
                    .with_title("Student permission test 2")
                    .with_roles(["STUDENT"]),
            ]),
        RouteNode::new("/code_week", "CodeWeek")
            .with_title("Code week")
            .with_roles(["TEACHER", "ADMIN", "STUDENT"])
            .with_children(vec![
                RouteNode::new("subject-list", "SubjectManage")
                    .with_title("Subjects")
                    .with_roles(["TEACHER", "ADMIN", "STUDENT"]),
                RouteNode::new("course-manage", "CourseManage")
                    .with_title("Courses")
                    .with_roles(["TEACHER", "ADMIN"]),
                RouteNode::new("course-list", "CourseList")
                    .with_title("Courses")
                    .with_roles(["STUDENT"]),
                RouteNode::new("course-detail/:id", "CourseDetail")
                    .with_title("Course detail")
                    .with_roles(["TEACHER", "ADMIN", "STUDENT"])
                    .hidden(),
                RouteNode::new("group-detail/:course_id/:group_id", "GroupDetail")
                    .with_title("Group detail")
                    .with_roles(["TEACHER", "ADMIN", "STUDENT"])
                    .hidden(),
                RouteNode::new("subject-detail/:id", "SubjectDetail")
                    .with_title("Subject detail")
                    .with_roles(["TEACHER", "ADMIN", "STUDENT"])
                    .hidden(),
            ]),
        RouteNode::new("/teacher", "Teacher")
            .with_title("Teacher management")
            .with_roles(["ADMIN"])
            .with_children(vec![RouteNode::new("create", "CreateTeacher")
                .with_title("Create teacher account")]),
    ];

    RouteCatalog::new(constant, dynamic)
}
