use crate::error::HubError;
use crate::middleware::auth::AuthUser;
use crate::router::HubState;
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct EventPayload {
    pub id: i64,
    pub google_event_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventPayload>,
}

/// GET /calendar/events -> sync upcoming events for the caller and return
/// the reconciled records in provider order.
pub async fn list_events(
    State(state): State<HubState>,
    user: AuthUser,
) -> Result<Json<EventsResponse>, HubError> {
    let outcome = state.sync.sync(user.id).await.inspect_err(|e| {
        if !matches!(e, HubError::NotConnected) {
            error!(user_id = user.id, error = %e, "calendar sync failed");
        }
    })?;

    let events = outcome
        .events
        .into_iter()
        .map(|record| EventPayload {
            id: record.id,
            google_event_id: record.google_event_id,
            title: record.title,
            description: record.description,
            start: record.start_time.to_rfc3339(),
            end: record.end_time.to_rfc3339(),
        })
        .collect();
    Ok(Json(EventsResponse { events }))
}
