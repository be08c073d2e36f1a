//! Error envelope and cross-cutting middleware behaviour.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_api::config::Environment;
use catalog_core::audit::Outcome;
use common::{body_json, build_test_app, build_test_app_with, TestOptions};

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = build_test_app();

    let response = app
        .send(
            Request::post("/api/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["details"][0]["path"], "body");
}

#[tokio::test]
async fn missing_fields_are_a_validation_error() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    let response = app
        .post_json_auth(
            "/api/v1/products",
            &token,
            serde_json::json!({ "name": "No price" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["message"], "Validation failed");
}

#[tokio::test]
async fn error_bodies_use_the_envelope() {
    let app = build_test_app();

    let response = app.get("/api/v1/users/me").await;
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].is_string());
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = build_test_app();

    let response = app.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_routes_return_the_envelope() {
    let app = build_test_app();

    let nested = app.get("/api/v1/nope").await;
    assert_eq!(nested.status(), StatusCode::NOT_FOUND);
    let json = body_json(nested).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Not Found - /api/v1/nope");

    let root = app.get("/nope").await;
    assert_eq!(root.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(root).await["message"], "Not Found - /nope");
}

#[tokio::test]
async fn handler_panic_is_a_500_envelope_and_audited() {
    let app = build_test_app_with(TestOptions {
        panic_on_list: true,
        ..Default::default()
    });
    let (user, token) = app.user().await;

    let response = app.get_auth("/api/v1/products", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Internal server error");
    assert!(!json.to_string().contains("exploded"));

    let events = app.audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].actor_id, Some(user.id));
    assert_eq!(events[0].details.status_code, 500);
    assert_eq!(events[0].outcome, Outcome::Failure);
}

#[tokio::test]
async fn development_mode_reveals_internal_detail() {
    let app = build_test_app_with(TestOptions {
        environment: Environment::Development,
        panic_on_list: true,
        ..Default::default()
    });
    let (_, token) = app.user().await;

    let response = app.get_auth("/api/v1/products", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let message = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("product table exploded"), "{message}");
}

#[tokio::test]
async fn development_mode_leaves_other_errors_alone() {
    let app = build_test_app_with(TestOptions {
        environment: Environment::Development,
        ..Default::default()
    });

    let response = app.get("/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Missing token");
}
