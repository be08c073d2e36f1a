//! HTTP-level integration tests for the product catalog and its cache.

mod common;

use axum::http::StatusCode;
use catalog_db::store::ProductStore;
use common::{body_json, build_test_app};
use serde_json::json;

#[tokio::test]
async fn reading_products_requires_auth() {
    let app = build_test_app();
    let response = app.get("/api/v1/products").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_can_read_but_not_write() {
    let app = build_test_app();
    let (_, token) = app.user().await;

    let list = app.get_auth("/api/v1/products", &token).await;
    assert_eq!(list.status(), StatusCode::OK);
    assert_eq!(body_json(list).await["data"], json!([]));

    let create = app
        .post_json_auth(
            "/api/v1/products",
            &token,
            json!({ "name": "Widget", "price": 9.99 }),
        )
        .await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let delete = app.delete_auth("/api/v1/products/1", &token).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_creates_product_with_populated_creator() {
    let app = build_test_app();
    let (admin, token) = app.admin().await;

    let response = app
        .post_json_auth(
            "/api/v1/products",
            &token,
            json!({ "name": "  Widget ", "description": "A widget", "price": 9.99 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let product = &json["data"];
    assert_eq!(product["name"], "Widget");
    assert_eq!(product["price"], 9.99);
    assert_eq!(product["createdBy"]["id"], admin.id);
    assert_eq!(product["createdBy"]["email"], "admin@example.com");
    assert!(product["createdBy"].get("passwordHash").is_none());
    assert!(product["createdBy"].get("role").is_none());
}

#[tokio::test]
async fn invalid_products_are_rejected_with_details() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    let response = app
        .post_json_auth(
            "/api/v1/products",
            &token,
            json!({ "name": "   ", "price": -1 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Validation failed");
    let paths: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["name", "price"]);
    assert!(app.store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn second_list_read_is_served_from_cache() {
    let app = build_test_app();
    let (_, admin) = app.admin().await;
    let (_, user) = app.user().await;

    app.post_json_auth(
        "/api/v1/products",
        &admin,
        json!({ "name": "Widget", "price": 9.99 }),
    )
    .await;

    let first = body_json(app.get_auth("/api/v1/products", &user).await).await;
    let second = body_json(app.get_auth("/api/v1/products", &user).await).await;

    assert_eq!(first, second);
    assert_eq!(app.products.list_reads(), 1);
    assert!(app.cache.contains("products:list"));
}

#[tokio::test]
async fn create_invalidates_cached_list() {
    let app = build_test_app();
    let (_, admin) = app.admin().await;

    let before = body_json(app.get_auth("/api/v1/products", &admin).await).await;
    assert_eq!(before["data"].as_array().unwrap().len(), 0);

    app.post_json_auth(
        "/api/v1/products",
        &admin,
        json!({ "name": "Gadget", "price": 5 }),
    )
    .await;

    let after = body_json(app.get_auth("/api/v1/products", &admin).await).await;
    assert_eq!(after["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.products.list_reads(), 2);
}

#[tokio::test]
async fn update_is_visible_on_next_read() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    let created = body_json(
        app.post_json_auth(
            "/api/v1/products",
            &token,
            json!({ "name": "Widget", "price": 9.99 }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/products/{id}");

    let cached = body_json(app.get_auth(&uri, &token).await).await;
    assert_eq!(cached["data"]["price"], 9.99);

    let patched = app
        .patch_json_auth(&uri, &token, json!({ "price": 12.99 }))
        .await;
    assert_eq!(patched.status(), StatusCode::OK);
    let patched = body_json(patched).await;
    assert_eq!(patched["data"]["name"], "Widget");
    assert_eq!(patched["data"]["price"], 12.99);

    let fresh = body_json(app.get_auth(&uri, &token).await).await;
    assert_eq!(fresh["data"]["price"], 12.99);
    assert_eq!(app.products.item_reads(), 2);
}

#[tokio::test]
async fn deleted_product_is_gone() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    let created = body_json(
        app.post_json_auth(
            "/api/v1/products",
            &token,
            json!({ "name": "Widget", "price": 9.99 }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/v1/products/{}", created["data"]["id"]);

    assert_eq!(app.get_auth(&uri, &token).await.status(), StatusCode::OK);
    assert_eq!(app.delete_auth(&uri, &token).await.status(), StatusCode::OK);

    let response = app.get_auth(&uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Product not found");

    assert_eq!(
        app.delete_auth(&uri, &token).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    let missing = app
        .patch_json_auth("/api/v1/products/999", &token, json!({ "price": 1 }))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = app.get_auth("/api/v1/products/abc", &token).await;
    assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(malformed).await["details"][0]["path"], "id");
}

#[tokio::test]
async fn sub_cent_and_oversized_prices_are_rejected() {
    let app = build_test_app();
    let (_, token) = app.admin().await;

    for price in [json!(0.001), json!(100_000_000_000u64)] {
        let response = app
            .post_json_auth(
                "/api/v1/products",
                &token,
                json!({ "name": "Widget", "price": price }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["details"][0]["path"], "price");
    }
    assert!(app.store.list_products().await.unwrap().is_empty());
}
