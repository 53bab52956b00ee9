//! Integration tests for the `/api/v1/transactions` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put, put_json};
use serde_json::{json, Value};

fn transaction_body(amount: f64, kind: &str) -> Value {
    json!({
        "origin_account": "ACC-001",
        "destination_account": "ACC-002",
        "amount": amount,
        "currency": "BRL",
        "transaction_type": kind,
    })
}

async fn create(app: &axum::Router, amount: f64, kind: &str) -> Value {
    let response = post_json(app.clone(), "/api/v1/transactions", transaction_body(amount, kind)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: routing classification at creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn high_value_transaction_is_routed_high() {
    let app = common::build_test_app();
    let tx = create(&app, 10001.0, "transfer").await;

    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["routing_info"], json!({"route": "high_value", "priority": "high"}));
    assert_eq!(tx["amount"], 10001.0);
}

#[tokio::test]
async fn standard_transaction_is_routed_normal() {
    let app = common::build_test_app();
    let tx = create(&app, 9999.0, "transfer").await;
    assert_eq!(tx["routing_info"], json!({"route": "standard", "priority": "normal"}));
}

// ---------------------------------------------------------------------------
// Test: non-positive amount is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_positive_amount_returns_400() {
    let app = common::build_test_app();
    for amount in [0.0, -50.0] {
        let response = post_json(
            app.clone(),
            "/api/v1/transactions",
            transaction_body(amount, "payment"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let list = body_json(get(app, "/api/v1/transactions").await).await;
    assert!(list.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: status update via query and body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_update_via_query_parameter() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;
    let uri = format!("/api/v1/transactions/{}?status=completed", tx["id"].as_str().unwrap());

    let response = put(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "completed");
}

#[tokio::test]
async fn status_update_via_json_body() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;
    let uri = format!("/api/v1/transactions/{}/status", tx["id"].as_str().unwrap());

    let response = put_json(app, &uri, json!({"status": "processing"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "processing");
}

#[tokio::test]
async fn invalid_status_returns_400_and_keeps_status() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;
    let id = tx["id"].as_str().unwrap();

    let response = put(app.clone(), &format!("/api/v1/transactions/{id}?status=archived")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("pending, processing, completed, failed, cancelled"));

    let stored = body_json(get(app, &format!("/api/v1/transactions/{id}")).await).await;
    assert_eq!(stored["status"], "pending");
}

#[tokio::test]
async fn missing_status_parameter_returns_400() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;

    let response = put(app, &format!("/api/v1/transactions/{}", tx["id"].as_str().unwrap())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn status_update_on_unknown_id_returns_404() {
    let app = common::build_test_app();
    let uri = format!("/api/v1/transactions/{}?status=archived", uuid::Uuid::new_v4());
    assert_eq!(put(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelled_transaction_can_be_reopened() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;
    let id = tx["id"].as_str().unwrap();

    put(app.clone(), &format!("/api/v1/transactions/{id}?status=cancelled")).await;
    let response = put(app, &format!("/api/v1/transactions/{id}?status=pending")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "pending");
}

// ---------------------------------------------------------------------------
// Test: DELETE cancels without removing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_cancels_transaction() {
    let app = common::build_test_app();
    let tx = create(&app, 100.0, "payment").await;
    let uri = format!("/api/v1/transactions/{}", tx["id"].as_str().unwrap());

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());

    let stored = body_json(get(app, &uri).await).await;
    assert_eq!(stored["status"], "cancelled");
}

// ---------------------------------------------------------------------------
// Test: filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filter_by_status_returns_matching_subset_in_order() {
    let app = common::build_test_app();
    let mut completed = Vec::new();
    for i in 0..5 {
        let tx = create(&app, 100.0 + f64::from(i), "payment").await;
        if i % 2 == 1 {
            let id = tx["id"].as_str().unwrap().to_string();
            put(app.clone(), &format!("/api/v1/transactions/{id}?status=completed")).await;
            completed.push(id);
        }
    }

    let list = body_json(get(app, "/api/v1/transactions?status=completed").await).await;
    let ids: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|tx| tx["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, completed);
}

#[tokio::test]
async fn filter_by_type_and_paginate() {
    let app = common::build_test_app();
    create(&app, 10.0, "payment").await;
    create(&app, 20.0, "transfer").await;
    create(&app, 30.0, "transfer").await;

    let list = body_json(get(app.clone(), "/api/v1/transactions?type=transfer").await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let page = body_json(get(app, "/api/v1/transactions?type=transfer&skip=1&limit=5").await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["amount"], 30.0);
}

// ---------------------------------------------------------------------------
// Test: an empty filter value is ignored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_status_filter_lists_everything() {
    let app = common::build_test_app();
    create(&app, 100.0, "payment").await;
    create(&app, 200.0, "transfer").await;

    let list = body_json(get(app, "/api/v1/transactions?status=&type=").await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}
