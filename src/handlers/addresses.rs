use crate::db::models::{Address, AddressType};
use crate::db::records::AddressFields;
use crate::error::HubError;
use crate::handlers::require_len;
use crate::middleware::auth::AuthUser;
use crate::router::HubState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressRequest {
    pub client_id: i64,
    pub street_address_1: String,
    #[serde(default)]
    pub street_address_2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub country: String,
    #[serde(default)]
    pub address_type: Option<AddressType>,
}

impl AddressRequest {
    fn into_fields(self) -> Result<AddressFields, HubError> {
        require_len("street_address_1", &self.street_address_1, 1, 255)?;
        require_len("city", &self.city, 1, 100)?;
        require_len("country", &self.country, 1, 100)?;
        Ok(AddressFields {
            client_id: self.client_id,
            street_address_1: self.street_address_1,
            street_address_2: self.street_address_2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            address_type: self.address_type.unwrap_or(AddressType::Physical),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressListQuery {
    pub client_id: i64,
}

pub async fn create(
    State(state): State<HubState>,
    _user: AuthUser,
    Json(req): Json<AddressRequest>,
) -> Result<(StatusCode, Json<Address>), HubError> {
    let address = state
        .addresses
        .create(&req.into_fields()?, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn list(
    State(state): State<HubState>,
    _user: AuthUser,
    Query(query): Query<AddressListQuery>,
) -> Result<Json<Vec<Address>>, HubError> {
    Ok(Json(state.addresses.list_for_client(query.client_id).await?))
}

pub async fn get(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Address>, HubError> {
    state
        .addresses
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(HubError::NotFound)
}

pub async fn update(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<AddressRequest>,
) -> Result<Json<Address>, HubError> {
    let address = state
        .addresses
        .update(id, &req.into_fields()?, Utc::now())
        .await?;
    Ok(Json(address))
}

pub async fn remove(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HubError> {
    state.addresses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
