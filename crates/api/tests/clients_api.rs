//! Integration tests for the `/api/v1/clients` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: create returns 201 with id and timestamps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_client_returns_201() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/clients",
        json!({"name": "Acme", "email": "billing@acme.example", "tax_id": "123"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Acme");
    assert_eq!(json["email"], "billing@acme.example");
    assert!(json["phone"].is_null());
    assert!(json["id"].is_string());
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
}

// ---------------------------------------------------------------------------
// Test: read-after-create, overwrite, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_lifecycle() {
    let app = common::build_test_app();

    let created = body_json(post_json(app.clone(), "/api/v1/clients", json!({"name": "Initech"})).await).await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/clients/{id}");

    let fetched = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(fetched["name"], "Initech");
    assert_eq!(fetched["id"], created["id"]);

    let response = put_json(
        app.clone(),
        &uri,
        json!({"name": "Initech Ltd", "phone": "555-0100"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Initech Ltd");
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["created_at"], created["created_at"]);

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains(&id));

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: list honours skip/limit and creation order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_clients_paginates() {
    let app = common::build_test_app();
    for name in ["A", "B", "C"] {
        post_json(app.clone(), "/api/v1/clients", json!({"name": name})).await;
    }

    let all = body_json(get(app.clone(), "/api/v1/clients").await).await;
    let names: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let page = body_json(get(app, "/api/v1/clients?skip=1&limit=1").await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["name"], "B");
}

// ---------------------------------------------------------------------------
// Test: missing ids yield 404 on every verb
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_client_returns_404() {
    let app = common::build_test_app();
    let uri = format!("/api/v1/clients/{}", uuid::Uuid::new_v4());

    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        put_json(app.clone(), &uri, json!({"name": "x"})).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}
