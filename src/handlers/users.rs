use crate::db::models::User;
use crate::error::HubError;
use crate::handlers::require_len;
use crate::middleware::auth::{AuthUser, hash_password, mint_access_token, verify_password};
use crate::router::HubState;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

pub async fn signup(
    State(state): State<HubState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), HubError> {
    if req.password != req.password2 {
        return Err(HubError::Validation(
            "Password fields do not match.".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(HubError::Validation(
            "Password must be at least 8 characters long.".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(HubError::Validation("Enter a valid email address.".to_string()));
    }
    require_len("first_name", &req.first_name, 1, 255)?;
    require_len("last_name", &req.last_name, 1, 255)?;

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(
            &req.email,
            &password_hash,
            &req.first_name,
            &req.last_name,
            req.phone_number.as_deref(),
            Utc::now(),
        )
        .await?;
    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn login(
    State(state): State<HubState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HubError> {
    let Some(user) = state.users.get_by_email(&req.email).await? else {
        return Err(HubError::Unauthenticated);
    };
    if !verify_password(&req.password, &user.password_hash)? {
        return Err(HubError::Unauthenticated);
    }

    let ttl = state.config.token_ttl_secs;
    let token = mint_access_token(&user, &state.config.jwt_secret, ttl, Utc::now())?;
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in: ttl,
    }))
}

pub async fn me(State(state): State<HubState>, user: AuthUser) -> Result<Json<User>, HubError> {
    state
        .users
        .get_by_id(user.id)
        .await?
        .map(Json)
        .ok_or(HubError::Unauthenticated)
}
