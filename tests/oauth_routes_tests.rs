mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use k9_hub::db::CredentialsStorage;
use k9_hub::router::{HubState, hub_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

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

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

/// Walk the consent URL returned by the redirect route and pull the state
/// parameter out of its query string.
fn state_param(authorization_url: &str) -> String {
    let url = Url::parse(authorization_url).expect("authorization_url did not parse");
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("authorization_url carried no state")
}

async fn app_with_user(
    tag: &str,
    provider_base: &str,
) -> (std::path::PathBuf, axum::Router, k9_hub::db::SqlitePool, i64, String) {
    let (temp_path, url) = common::temp_database(tag);
    let pool = common::connect(&url).await;
    let cfg = Arc::new(common::test_config(&url, provider_base));
    let user = common::seed_user(&pool, &format!("{tag}@k9.com")).await;
    let token = common::bearer_token(&user, &cfg);

    let state = HubState::new(pool.clone(), cfg).expect("failed to build state");
    (temp_path, hub_router(state), pool, user.id, token)
}

#[tokio::test]
async fn signup_login_me_round_trip() {
    let (temp_path, url) = common::temp_database("signup-flow");
    let pool = common::connect(&url).await;
    let cfg = Arc::new(common::test_config(&url, "http://127.0.0.1:9"));
    let app = hub_router(HubState::new(pool, cfg).unwrap());

    let signup_body = json!({
        "email": "k@k9.com",
        "password": "kendr1ck!!",
        "password2": "kendr1ck!!",
        "first_name": "Keith",
        "last_name": "Hiamond"
    });
    let (status, body) = json_request(&app, "POST", "/users/signup", None, Some(signup_body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "k@k9.com");
    assert!(body.get("password_hash").is_none());

    // Same email again is rejected as a validation error.
    let (status, body) = json_request(&app, "POST", "/users/signup", None, Some(signup_body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION");

    let (status, body) = json_request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({"email": "k@k9.com", "password": "kendr1ck!!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = json_request(&app, "GET", "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "k@k9.com");

    let (status, _) = json_request(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({"email": "k@k9.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn redirect_returns_offline_consent_url() {
    let (temp_path, app, _pool, _owner, token) =
        app_with_user("redirect", "http://127.0.0.1:9").await;

    let (status, body) = json_request(&app, "GET", "/auth/google/redirect", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let auth_url = body["authorization_url"].as_str().unwrap();
    assert!(auth_url.contains("access_type=offline"));
    assert!(auth_url.contains("prompt=consent"));
    assert!(auth_url.contains("include_granted_scopes=true"));
    assert!(!state_param(auth_url).is_empty());

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn callback_without_code_is_rejected_before_any_exchange() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (temp_path, app, _pool, _owner, token) = app_with_user("missing-code", &server.uri()).await;

    let (_, body) = json_request(&app, "GET", "/auth/google/redirect", Some(&token), None).await;
    let state = state_param(body["authorization_url"].as_str().unwrap());

    let (status, body) = json_request(
        &app,
        "POST",
        "/auth/google/callback",
        Some(&token),
        Some(json!({"state": state})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "MISSING_CODE");

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn callback_state_is_validated_and_consumed_once() {
    let (temp_path, app, _pool, _owner, token) =
        app_with_user("state-check", "http://127.0.0.1:9").await;

    let (_, body) = json_request(&app, "GET", "/auth/google/redirect", Some(&token), None).await;
    let state = state_param(body["authorization_url"].as_str().unwrap());

    let (status, body) = json_request(
        &app,
        "POST",
        "/auth/google/callback",
        Some(&token),
        Some(json!({"state": "forged-elsewhere", "code": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_STATE");

    // The mismatch consumed the stored state, so even the genuine value is
    // now rejected: one authorization attempt per initiation.
    let (status, body) = json_request(
        &app,
        "POST",
        "/auth/google/callback",
        Some(&token),
        Some(json!({"state": state, "code": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_STATE");

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn callback_requires_authentication() {
    let (temp_path, app, _pool, _owner, _token) =
        app_with_user("callback-auth", "http://127.0.0.1:9").await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/auth/google/callback",
        None,
        Some(json!({"state": "s", "code": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn full_link_flow_persists_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-linked",
            "refresh_token": "rt-linked",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/calendar.readonly"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (temp_path, app, pool, owner_id, token) = app_with_user("full-link", &server.uri()).await;

    let (_, body) = json_request(&app, "GET", "/auth/google/redirect", Some(&token), None).await;
    let state = state_param(body["authorization_url"].as_str().unwrap());

    let (status, body) = json_request(
        &app,
        "POST",
        "/auth/google/callback",
        Some(&token),
        Some(json!({"state": state, "code": "auth-code-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Google account linked successfully");

    let stored = CredentialsStorage::new(pool)
        .get_by_owner(owner_id)
        .await
        .unwrap()
        .expect("credentials were not persisted");
    assert_eq!(stored.access_token, "at-linked");
    assert_eq!(stored.refresh_token, "rt-linked");
    assert!(stored.scopes.contains("calendar.readonly"));

    let _ = std::fs::remove_file(&temp_path);
}

#[tokio::test]
async fn events_route_reports_not_connected() {
    let (temp_path, app, _pool, _owner, token) =
        app_with_user("events-unlinked", "http://127.0.0.1:9").await;

    let (status, body) = json_request(&app, "GET", "/calendar/events", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "NOT_CONNECTED");

    let _ = std::fs::remove_file(&temp_path);
}
