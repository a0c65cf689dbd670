use crate::db::models::Client;
use crate::db::records::ClientFields;
use crate::error::HubError;
use crate::handlers::require_len;
use crate::middleware::auth::AuthUser;
use crate::router::HubState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
}

impl ClientRequest {
    fn into_fields(self) -> Result<ClientFields, HubError> {
        require_len("first_name", &self.first_name, 2, 100)?;
        require_len("last_name", &self.last_name, 2, 100)?;
        if !self.email.contains('@') {
            return Err(HubError::Validation("Enter a valid email address.".to_string()));
        }
        Ok(ClientFields {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_phone: self.emergency_contact_phone,
        })
    }
}

pub async fn create(
    State(state): State<HubState>,
    _user: AuthUser,
    Json(req): Json<ClientRequest>,
) -> Result<(StatusCode, Json<Client>), HubError> {
    let client = state.clients.create(&req.into_fields()?, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list(
    State(state): State<HubState>,
    _user: AuthUser,
) -> Result<Json<Vec<Client>>, HubError> {
    Ok(Json(state.clients.list().await?))
}

pub async fn get(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Client>, HubError> {
    state
        .clients
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(HubError::NotFound)
}

pub async fn update(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ClientRequest>,
) -> Result<Json<Client>, HubError> {
    let client = state
        .clients
        .update(id, &req.into_fields()?, Utc::now())
        .await?;
    Ok(Json(client))
}

pub async fn remove(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HubError> {
    state.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
