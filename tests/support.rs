//! Shared helpers for the integration tests.

#![allow(dead_code)]

use codecollab_session::{SessionConfig, SessionLayer};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_PATH: &str = "/api/v1/accounts/login/";
pub const REFRESH_PATH: &str = "/api/v1/accounts/refresh/";
pub const IDENTITY_PATH: &str = "/api/v1/accounts/user/";

pub fn config_for(server: &MockServer) -> SessionConfig {
    SessionConfig::new(server.uri().parse().expect("mock server uri"))
}

pub fn layer_for(server: &MockServer) -> SessionLayer {
    SessionLayer::new(config_for(server))
}

pub fn login_body(access: &str, refresh: &str, role: &str) -> serde_json::Value {
    json!({
        "access": access,
        "refresh": refresh,
        "user_id": "u1",
        "role": role,
        "name": "Ann"
    })
}

pub fn refresh_body(access: &str, role: &str) -> serde_json::Value {
    json!({
        "access": access,
        "user_id": "u1",
        "role": role,
        "name": "Ann"
    })
}

pub fn identity_body(role: &str) -> serde_json::Value {
    json!({
        "user_id": "u1",
        "role": role,
        "name": "Ann"
    })
}

/// Mount a login endpoint answering with the given tokens and role.
pub async fn mount_login(server: &MockServer, access: &str, refresh: &str, role: &str) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(access, refresh, role)))
        .mount(server)
        .await;
}

/// Mount an identity endpoint answering with the given role.
pub async fn mount_identity(server: &MockServer, role: &str) {
    Mock::given(method("GET"))
        .and(path(IDENTITY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_body(role)))
        .mount(server)
        .await;
}
