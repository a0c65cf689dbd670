mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use k9_hub::router::{HubState, hub_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn json_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(request).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not JSON")
    };
    (status, value)
}

async fn records_app(tag: &str) -> (std::path::PathBuf, axum::Router, String) {
    let (temp_path, url) = common::temp_database(tag);
    let pool = common::connect(&url).await;
    let cfg = Arc::new(common::test_config(&url, "http://127.0.0.1:9"));
    let user = common::seed_user(&pool, &format!("{tag}@k9.com")).await;
    let token = common::bearer_token(&user, &cfg);
    let app = hub_router(HubState::new(pool, cfg).unwrap());
    (temp_path, app, token)
}

#[tokio::test]
async fn client_and_dog_crud_round_trip() {
    let (temp_path, app, token) = records_app("records-crud").await;

    let (status, client) = json_request(
        &app,
        "POST",
        "/clients",
        Some(&token),
        Some(json!({
            "first_name": "Dana",
            "last_name": "Whitfield",
            "email": "dana@example.com",
            "phone_number": "+1-555-0100"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let client_id = client["id"].as_i64().unwrap();

    let (status, dog) = json_request(
        &app,
        "POST",
        "/dogs",
        Some(&token),
        Some(json!({
            "name": "Biscuit",
            "client_id": client_id,
            "breed": "Labrador Retriever",
            "date_of_birth": "2023-04-12",
            "sex": "FEMALE",
            "status": "ACTIVE",
            "weight_kg": 24.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let dog_id = dog["id"].as_i64().unwrap();
    assert_eq!(dog["sex"], "FEMALE");

    let (status, fetched) =
        json_request(&app, "GET", &format!("/dogs/{dog_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Biscuit");

    let (status, updated) = json_request(
        &app,
        "PUT",
        &format!("/dogs/{dog_id}"),
        Some(&token),
        Some(json!({
            "name": "Biscuit",
            "client_id": client_id,
            "status": "INACTIVE"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "INACTIVE");

    let (status, _) =
        json_request(&app, "DELETE", &format!("/dogs/{dog_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = json_request(&app, "GET", &format!("/dogs/{dog_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn address_belongs_to_client_and_lists_by_client() {
    let (temp_path, app, token) = records_app("records-addresses").await;

    let (_, client) = json_request(
        &app,
        "POST",
        "/clients",
        Some(&token),
        Some(json!({
            "first_name": "Omar",
            "last_name": "Reyes",
            "email": "omar@example.com"
        })),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();

    let (status, _) = json_request(
        &app,
        "POST",
        "/addresses",
        Some(&token),
        Some(json!({
            "client_id": client_id,
            "street_address_1": "14 Juniper Lane",
            "city": "Asheville",
            "state": "NC",
            "postal_code": "28801",
            "country": "US",
            "address_type": "MAILING"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = json_request(
        &app,
        "GET",
        &format!("/addresses?client_id={client_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["address_type"], "MAILING");

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn records_routes_require_authentication_and_validate_bodies() {
    let (temp_path, app, token) = records_app("records-validate").await;

    let (status, _) = json_request(&app, "GET", "/clients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Single-character name breaks the 2..=100 rule.
    let (status, body) = json_request(
        &app,
        "POST",
        "/clients",
        Some(&token),
        Some(json!({
            "first_name": "D",
            "last_name": "Whitfield",
            "email": "d@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");

    // Unknown fields are rejected at the boundary rather than ignored.
    let (status, _) = json_request(
        &app,
        "POST",
        "/clients",
        Some(&token),
        Some(json!({
            "first_name": "Dana",
            "last_name": "Whitfield",
            "email": "dana2@example.com",
            "favorite_color": "green"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let _ = std::fs::remove_file(&temp_path);
}
