use crate::error::HubError;
use crate::middleware::auth::AuthUser;
use crate::router::HubState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{error, info};

/// Session key holding the anti-forgery state between redirect and callback.
const STATE_SESSION_KEY: &str = "google_oauth_state";

#[derive(Debug, Serialize)]
pub struct AuthorizationUrlResponse {
    pub authorization_url: String,
}

/// GET /auth/google/redirect -> consent URL for the caller to navigate to.
/// The anti-forgery state is written to the caller's session before the URL
/// leaves the server.
pub async fn google_oauth_redirect(
    State(state): State<HubState>,
    user: AuthUser,
) -> Result<Json<AuthorizationUrlResponse>, HubError> {
    let (authorization_url, state_token) = state.flow.authorize_url()?;
    state
        .sessions
        .set(user.id, STATE_SESSION_KEY, state_token.secret())
        .await?;
    info!(user_id = user.id, "dispatching OAuth consent URL");
    Ok(Json(AuthorizationUrlResponse {
        authorization_url: authorization_url.into(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /auth/google/callback -> exchanges the auth code for tokens and
/// reconciles them into the caller's stored credential set.
pub async fn google_oauth_callback(
    State(state): State<HubState>,
    user: AuthUser,
    Json(req): Json<CallbackRequest>,
) -> Result<Json<MessageResponse>, HubError> {
    // The stored state is consumed exactly once, whatever the outcome below.
    let session_state = state.sessions.take(user.id, STATE_SESSION_KEY).await?;

    let (Some(received), Some(expected)) = (req.state.as_deref(), session_state.as_deref()) else {
        return Err(HubError::InvalidState);
    };
    if !bool::from(received.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(HubError::InvalidState);
    }

    let code = match req.code {
        Some(code) if !code.is_empty() => code,
        _ => return Err(HubError::MissingCode),
    };

    let credentials = state.flow.exchange_code(code).await.inspect_err(|e| {
        error!(user_id = user.id, error = %e, "token exchange failed");
    })?;

    let (_, created) = state
        .reconciler
        .reconcile(user.id, &credentials)
        .await
        .inspect_err(|e| {
            error!(user_id = user.id, error = %e, "failed to store credentials");
        })?;
    info!(user_id = user.id, created, "Google account linked");

    Ok(Json(MessageResponse {
        message: "Google account linked successfully".to_string(),
    }))
}
