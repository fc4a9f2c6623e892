//! Navigation guard state machine against a mock backend.

mod support;

use codecollab_session::{GuardState, Verdict};
use serde_json::json;
use support::{layer_for, mount_identity, mount_login, refresh_body, IDENTITY_PATH, REFRESH_PATH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn unauthenticated_public_destination_proceeds() {
    let server = MockServer::start().await;
    let layer = layer_for(&server);

    assert_eq!(layer.guard().state(), GuardState::Unauthenticated);
    assert_eq!(layer.guard().before_each("/login").await, Verdict::Proceed);
    assert_eq!(layer.guard().before_each("/register").await, Verdict::Proceed);
    assert_eq!(layer.guard().before_each("/404").await, Verdict::Proceed);
}

#[tokio::test]
async fn unauthenticated_protected_destination_redirects_to_login() {
    let server = MockServer::start().await;
    let layer = layer_for(&server);

    let verdict = layer.guard().before_each("/code_week/subject-list").await;
    assert_eq!(
        verdict,
        Verdict::Redirect {
            to: "/login".to_owned(),
            message: None
        }
    );
}

#[tokio::test]
async fn login_then_protected_navigation_registers_student_routes() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;
    mount_identity(&server, "STUDENT").await;

    let layer = layer_for(&server);

    // Unauthenticated -> (login) -> roles not yet resolved.
    assert_eq!(layer.guard().state(), GuardState::Unauthenticated);
    layer.login("a@b.com", "x").await.unwrap();
    assert_eq!(layer.guard().state(), GuardState::RolesUnresolved);

    // First protected navigation resolves roles, registers routes, and
    // re-dispatches the same destination with history replacement.
    let verdict = layer.guard().before_each("/code_week/subject-list").await;
    assert_eq!(
        verdict,
        Verdict::Redispatch {
            to: "/code_week/subject-list".to_owned()
        }
    );
    assert_eq!(layer.guard().state(), GuardState::RolesResolved);

    // Only STUDENT-reachable routes are registered.
    let registry = layer.registry();
    assert!(registry.route_by_name("SubjectManage").is_some());
    assert!(registry.route_by_name("CourseList").is_some());
    assert!(registry.route_by_name("StudentTest").is_some());
    assert!(registry.route_by_name("CourseManage").is_none());
    assert!(registry.route_by_name("Teacher").is_none());
    assert!(registry.route_by_name("Permission").is_none());

    // The re-dispatched navigation now proceeds.
    assert_eq!(
        layer.guard().before_each("/code_week/subject-list").await,
        Verdict::Proceed
    );
    assert!(registry.resolve_path("/code_week/subject-list").is_some());
}

#[tokio::test]
async fn authenticated_navigation_to_login_route_proceeds_without_identity_fetch() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;

    Mock::given(method("GET"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let layer = layer_for(&server);
    layer.login("a@b.com", "x").await.unwrap();

    assert_eq!(layer.guard().before_each("/login").await, Verdict::Proceed);
    assert_eq!(layer.guard().state(), GuardState::RolesUnresolved);
}

#[tokio::test]
async fn identity_fetch_failure_clears_session_and_redirects() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;

    Mock::given(method("GET"))
        .and(path(IDENTITY_PATH))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "identity backend down"})),
        )
        .mount(&server)
        .await;

    let layer = layer_for(&server);
    layer.login("a@b.com", "x").await.unwrap();

    let verdict = layer.guard().before_each("/code_week/subject-list").await;
    match verdict {
        Verdict::Redirect { to, message } => {
            assert_eq!(to, "/login");
            assert!(message.unwrap().contains("identity fetch failed"));
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    assert_eq!(layer.guard().state(), GuardState::Unauthenticated);
    assert!(layer.session().access_token().is_none());
    assert!(layer.session().refresh_token().is_none());
}

#[tokio::test]
async fn identity_fetch_refreshes_an_expired_token_transparently() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(refresh_body("A2", "STUDENT")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(IDENTITY_PATH))
        .respond_with(|request: &Request| {
            let authorized = request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer A2");
            if authorized {
                ResponseTemplate::new(200).set_body_json(json!({
                    "user_id": "u1",
                    "role": "STUDENT",
                    "name": "Ann"
                }))
            } else {
                ResponseTemplate::new(401)
            }
        })
        .mount(&server)
        .await;

    let layer = layer_for(&server);
    layer.login("a@b.com", "x").await.unwrap();

    let verdict = layer.guard().before_each("/student/stu-test").await;
    assert_eq!(
        verdict,
        Verdict::Redispatch {
            to: "/student/stu-test".to_owned()
        }
    );
    assert_eq!(layer.session().access_token().as_deref(), Some("A2"));
}

#[tokio::test]
async fn disabled_filtering_registers_the_whole_protected_tree() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;
    mount_identity(&server, "STUDENT").await;

    let config = support::config_for(&server).with_dynamic_filtering(false);
    let layer = codecollab_session::SessionLayer::new(config);
    layer.login("a@b.com", "x").await.unwrap();

    layer.guard().before_each("/teacher/create").await;
    assert!(layer.registry().route_by_name("CourseManage").is_some());
    assert!(layer.registry().route_by_name("Teacher").is_some());
}

#[tokio::test]
async fn logout_returns_the_guard_to_its_initial_state() {
    let server = MockServer::start().await;
    mount_login(&server, "A1", "R1", "STUDENT").await;
    mount_identity(&server, "STUDENT").await;

    let layer = layer_for(&server);
    layer.login("a@b.com", "x").await.unwrap();
    layer.guard().before_each("/code_week/subject-list").await;
    assert_eq!(layer.guard().state(), GuardState::RolesResolved);

    assert_eq!(layer.logout(), "/login");
    assert_eq!(layer.guard().state(), GuardState::Unauthenticated);
    assert!(layer.registry().route_by_name("StudentTest").is_none());

    let verdict = layer.guard().before_each("/student/stu-test").await;
    assert_eq!(
        verdict,
        Verdict::Redirect {
            to: "/login".to_owned(),
            message: None
        }
    );
}
