use crate::db::models::{Dog, DogStatus, Sex};
use crate::db::records::DogFields;
use crate::error::HubError;
use crate::handlers::require_len;
use crate::middleware::auth::AuthUser;
use crate::router::HubState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

const NOTES_MAX: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DogRequest {
    pub name: String,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub is_altered: Option<bool>,
    #[serde(default)]
    pub status: Option<DogStatus>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub behavioral_notes: Option<String>,
    #[serde(default)]
    pub training_goals: Option<String>,
    #[serde(default)]
    pub medical_notes: Option<String>,
    #[serde(default)]
    pub vaccination_rabies: Option<NaiveDate>,
    #[serde(default)]
    pub vaccination_dhpp: Option<NaiveDate>,
    #[serde(default)]
    pub vaccination_bordetella: Option<NaiveDate>,
}

impl DogRequest {
    fn into_fields(self) -> Result<DogFields, HubError> {
        require_len("name", &self.name, 2, 100)?;
        if let Some(w) = self.weight_kg
            && w <= 0.0
        {
            return Err(HubError::Validation(
                "weight_kg must be greater than zero.".to_string(),
            ));
        }
        for (field, value) in [
            ("behavioral_notes", &self.behavioral_notes),
            ("training_goals", &self.training_goals),
            ("medical_notes", &self.medical_notes),
        ] {
            if let Some(v) = value
                && v.chars().count() > NOTES_MAX
            {
                return Err(HubError::Validation(format!(
                    "{field} cannot exceed {NOTES_MAX} characters."
                )));
            }
        }
        Ok(DogFields {
            name: self.name,
            client_id: self.client_id,
            breed: self.breed,
            date_of_birth: self.date_of_birth,
            sex: self.sex.unwrap_or(Sex::Unknown),
            is_altered: self.is_altered,
            status: self.status.unwrap_or(DogStatus::Prospective),
            weight_kg: self.weight_kg,
            behavioral_notes: self.behavioral_notes.unwrap_or_default(),
            training_goals: self.training_goals.unwrap_or_default(),
            medical_notes: self.medical_notes.unwrap_or_default(),
            vaccination_rabies: self.vaccination_rabies,
            vaccination_dhpp: self.vaccination_dhpp,
            vaccination_bordetella: self.vaccination_bordetella,
        })
    }
}

pub async fn create(
    State(state): State<HubState>,
    _user: AuthUser,
    Json(req): Json<DogRequest>,
) -> Result<(StatusCode, Json<Dog>), HubError> {
    let dog = state.dogs.create(&req.into_fields()?, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(dog)))
}

pub async fn list(
    State(state): State<HubState>,
    _user: AuthUser,
) -> Result<Json<Vec<Dog>>, HubError> {
    Ok(Json(state.dogs.list().await?))
}

pub async fn get(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Dog>, HubError> {
    state
        .dogs
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(HubError::NotFound)
}

pub async fn update(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<DogRequest>,
) -> Result<Json<Dog>, HubError> {
    let dog = state.dogs.update(id, &req.into_fields()?, Utc::now()).await?;
    Ok(Json(dog))
}

pub async fn remove(
    State(state): State<HubState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, HubError> {
    state.dogs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
