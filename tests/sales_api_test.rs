mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn setup_app() -> Router {
    common::test_app(common::setup_test_state().await)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_sale(app: &Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/sales", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

fn laptop_payload() -> Value {
    json!({
        "product_name": "Laptop",
        "quantity": 2,
        "price": "999.99",
        "sale_date": "2024-11-27"
    })
}

fn mouse_payload() -> Value {
    json!({
        "product_name": "Mouse",
        "quantity": 5,
        "price": "19.99",
        "sale_date": "2024-11-26"
    })
}

#[tokio::test]
async fn create_sale_returns_201_with_assigned_fields() {
    let app = setup_app().await;

    let body = create_sale(&app, laptop_payload()).await;

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["product_name"], "Laptop");
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["price"], "999.99");
    assert_eq!(body["sale_date"], "2024-11-27");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn create_sale_rejects_invalid_payloads() {
    let app = setup_app().await;

    for payload in [
        json!({"product_name": "Laptop", "quantity": 0, "price": "10.00", "sale_date": "2024-11-27"}),
        json!({"product_name": "Laptop", "quantity": 1, "price": "-1.00", "sale_date": "2024-11-27"}),
        json!({"product_name": "", "quantity": 1, "price": "10.00", "sale_date": "2024-11-27"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/sales", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn get_sale_by_id_and_not_found() {
    let app = setup_app().await;
    let created = create_sale(&app, laptop_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/sales/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["price"], "999.99");

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales/999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Sale with id 999 not found");
}

#[tokio::test]
async fn list_sales_supports_optional_filters() {
    let app = setup_app().await;
    create_sale(&app, laptop_payload()).await;
    create_sale(&app, mouse_payload()).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 2);
    // Newest first by sale_date
    assert_eq!(all[0]["product_name"], "Laptop");
    assert_eq!(all[1]["product_name"], "Mouse");

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales?product_name=Mouse"))
        .await
        .unwrap();
    let body = response_json(response).await;
    let filtered = body.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["product_name"], "Mouse");

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/v1/sales?start_date=2024-11-27&end_date=2024-11-27",
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    let ranged = body.as_array().unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0]["product_name"], "Laptop");
}

#[tokio::test]
async fn update_sale_applies_partial_changes() {
    let app = setup_app().await;
    let created = create_sale(&app, laptop_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/sales/{}", id),
            json!({"quantity": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["product_name"], "Laptop");
    assert_eq!(body["price"], "999.99");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/sales/999",
            json!({"quantity": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_sale_rejects_invalid_values() {
    let app = setup_app().await;
    let created = create_sale(&app, laptop_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/sales/{}", id),
            json!({"quantity": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_sale_returns_204_then_404() {
    let app = setup_app().await;
    let created = create_sale(&app, laptop_payload()).await;
    let id = created["id"].as_i64().unwrap();

    let delete_request = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/sales/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete_request(id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete_request(id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn revenue_endpoint_sums_exactly_with_filters() {
    let app = setup_app().await;
    create_sale(&app, laptop_payload()).await;
    create_sale(&app, mouse_payload()).await;

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/v1/sales/analytics/revenue?product_name=Laptop",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total_revenue"], "1999.98");

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales/analytics/revenue"))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total_revenue"], "2099.93");
}

#[tokio::test]
async fn items_sold_endpoint_counts_quantities() {
    let app = setup_app().await;
    create_sale(&app, laptop_payload()).await;
    create_sale(&app, mouse_payload()).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales/analytics/items-sold"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total_items_sold"], 7);
}

#[tokio::test]
async fn aggregates_are_zero_when_nothing_matches() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales/analytics/revenue"))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total_revenue"], "0.00");

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/sales/analytics/items-sold"))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["total_items_sold"], 0);
}
