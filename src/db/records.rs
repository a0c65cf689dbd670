//! Storage for the business records: clients (dog owners), their dogs and
//! addresses. Plain keyed CRUD; uniqueness and foreign keys live in the
//! schema.

use crate::db::credentials::SqlitePool;
use crate::db::events::parse_utc;
use crate::db::models::{Address, AddressType, Client, Dog, DogStatus, Sex};
use crate::error::HubError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

#[derive(Debug, Clone)]
pub struct ClientFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

#[derive(Clone)]
pub struct ClientsStorage {
    pool: SqlitePool,
}

impl ClientsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, fields: &ClientFields, now: DateTime<Utc>) -> Result<Client, HubError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (first_name, last_name, email, phone_number, address,
                                 emergency_contact_name, emergency_contact_phone,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.address)
        .bind(&fields.emergency_contact_name)
        .bind(&fields.emergency_contact_phone)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await;

        let done = match result {
            Ok(done) => done,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(HubError::DuplicateEmail);
            }
            Err(e) => return Err(e.into()),
        };
        self.get_by_id(done.last_insert_rowid())
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Client>, HubError> {
        let row = sqlx::query(&select_clients("WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(client_row).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Client>, HubError> {
        let rows = sqlx::query(&select_clients("ORDER BY last_name, first_name"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(client_row).collect()
    }

    pub async fn update(
        &self,
        id: i64,
        fields: &ClientFields,
        now: DateTime<Utc>,
    ) -> Result<Client, HubError> {
        let done = sqlx::query(
            r#"
            UPDATE clients SET first_name = ?, last_name = ?, email = ?, phone_number = ?,
                   address = ?, emergency_contact_name = ?, emergency_contact_phone = ?,
                   updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.address)
        .bind(&fields.emergency_contact_name)
        .bind(&fields.emergency_contact_phone)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        self.get_by_id(id)
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn delete(&self, id: i64) -> Result<(), HubError> {
        let done = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        Ok(())
    }
}

fn select_clients(tail: &str) -> String {
    format!(
        "SELECT id, first_name, last_name, email, phone_number, address, \
         emergency_contact_name, emergency_contact_phone, created_at, updated_at \
         FROM clients {tail}"
    )
}

fn client_row(row: SqliteRow) -> Result<Client, HubError> {
    Ok(Client {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone_number: row.try_get("phone_number")?,
        address: row.try_get("address")?,
        emergency_contact_name: row.try_get("emergency_contact_name")?,
        emergency_contact_phone: row.try_get("emergency_contact_phone")?,
        created_at: parse_utc(row.try_get("created_at")?)?,
        updated_at: parse_utc(row.try_get("updated_at")?)?,
    })
}

#[derive(Debug, Clone)]
pub struct DogFields {
    pub name: String,
    pub client_id: Option<i64>,
    pub breed: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Sex,
    pub is_altered: Option<bool>,
    pub status: DogStatus,
    pub weight_kg: Option<f64>,
    pub behavioral_notes: String,
    pub training_goals: String,
    pub medical_notes: String,
    pub vaccination_rabies: Option<NaiveDate>,
    pub vaccination_dhpp: Option<NaiveDate>,
    pub vaccination_bordetella: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct DogsStorage {
    pool: SqlitePool,
}

impl DogsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, fields: &DogFields, now: DateTime<Utc>) -> Result<Dog, HubError> {
        let done = sqlx::query(
            r#"
            INSERT INTO dogs (name, client_id, breed, date_of_birth, sex, is_altered,
                              status, weight_kg, behavioral_notes, training_goals,
                              medical_notes, vaccination_rabies, vaccination_dhpp,
                              vaccination_bordetella, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(fields.client_id)
        .bind(&fields.breed)
        .bind(fields.date_of_birth.map(|d| d.to_string()))
        .bind(fields.sex.as_str())
        .bind(fields.is_altered)
        .bind(fields.status.as_str())
        .bind(fields.weight_kg)
        .bind(&fields.behavioral_notes)
        .bind(&fields.training_goals)
        .bind(&fields.medical_notes)
        .bind(fields.vaccination_rabies.map(|d| d.to_string()))
        .bind(fields.vaccination_dhpp.map(|d| d.to_string()))
        .bind(fields.vaccination_bordetella.map(|d| d.to_string()))
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;
        self.get_by_id(done.last_insert_rowid())
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Dog>, HubError> {
        let row = sqlx::query(&select_dogs("WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(dog_row).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Dog>, HubError> {
        let rows = sqlx::query(&select_dogs("ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(dog_row).collect()
    }

    pub async fn update(&self, id: i64, fields: &DogFields, now: DateTime<Utc>) -> Result<Dog, HubError> {
        let done = sqlx::query(
            r#"
            UPDATE dogs SET name = ?, client_id = ?, breed = ?, date_of_birth = ?, sex = ?,
                   is_altered = ?, status = ?, weight_kg = ?, behavioral_notes = ?,
                   training_goals = ?, medical_notes = ?, vaccination_rabies = ?,
                   vaccination_dhpp = ?, vaccination_bordetella = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(fields.client_id)
        .bind(&fields.breed)
        .bind(fields.date_of_birth.map(|d| d.to_string()))
        .bind(fields.sex.as_str())
        .bind(fields.is_altered)
        .bind(fields.status.as_str())
        .bind(fields.weight_kg)
        .bind(&fields.behavioral_notes)
        .bind(&fields.training_goals)
        .bind(&fields.medical_notes)
        .bind(fields.vaccination_rabies.map(|d| d.to_string()))
        .bind(fields.vaccination_dhpp.map(|d| d.to_string()))
        .bind(fields.vaccination_bordetella.map(|d| d.to_string()))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        self.get_by_id(id)
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn delete(&self, id: i64) -> Result<(), HubError> {
        let done = sqlx::query("DELETE FROM dogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        Ok(())
    }
}

fn select_dogs(tail: &str) -> String {
    format!(
        "SELECT id, name, client_id, breed, date_of_birth, sex, is_altered, status, \
         weight_kg, behavioral_notes, training_goals, medical_notes, vaccination_rabies, \
         vaccination_dhpp, vaccination_bordetella, created_at, updated_at FROM dogs {tail}"
    )
}

fn dog_row(row: SqliteRow) -> Result<Dog, HubError> {
    let sex_raw: String = row.try_get("sex")?;
    let status_raw: String = row.try_get("status")?;
    Ok(Dog {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        client_id: row.try_get("client_id")?,
        breed: row.try_get("breed")?,
        date_of_birth: parse_opt_date(row.try_get("date_of_birth")?)?,
        sex: Sex::parse(&sex_raw).unwrap_or(Sex::Unknown),
        is_altered: row.try_get("is_altered")?,
        status: DogStatus::parse(&status_raw).unwrap_or(DogStatus::Prospective),
        weight_kg: row.try_get("weight_kg")?,
        behavioral_notes: row.try_get("behavioral_notes")?,
        training_goals: row.try_get("training_goals")?,
        medical_notes: row.try_get("medical_notes")?,
        vaccination_rabies: parse_opt_date(row.try_get("vaccination_rabies")?)?,
        vaccination_dhpp: parse_opt_date(row.try_get("vaccination_dhpp")?)?,
        vaccination_bordetella: parse_opt_date(row.try_get("vaccination_bordetella")?)?,
        created_at: parse_utc(row.try_get("created_at")?)?,
        updated_at: parse_utc(row.try_get("updated_at")?)?,
    })
}

fn parse_opt_date(raw: Option<String>) -> Result<Option<NaiveDate>, HubError> {
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|e| HubError::Storage(sqlx::Error::Decode(Box::new(e))))
    })
    .transpose()
}

#[derive(Debug, Clone)]
pub struct AddressFields {
    pub client_id: i64,
    pub street_address_1: String,
    pub street_address_2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub address_type: AddressType,
}

#[derive(Clone)]
pub struct AddressesStorage {
    pool: SqlitePool,
}

impl AddressesStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        fields: &AddressFields,
        now: DateTime<Utc>,
    ) -> Result<Address, HubError> {
        let done = sqlx::query(
            r#"
            INSERT INTO addresses (client_id, street_address_1, street_address_2, city,
                                   state, postal_code, country, address_type,
                                   created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fields.client_id)
        .bind(&fields.street_address_1)
        .bind(&fields.street_address_2)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .bind(fields.address_type.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;
        self.get_by_id(done.last_insert_rowid())
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Address>, HubError> {
        let row = sqlx::query(&select_addresses("WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(address_row).transpose()
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<Address>, HubError> {
        let rows = sqlx::query(&select_addresses("WHERE client_id = ? ORDER BY address_type"))
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(address_row).collect()
    }

    pub async fn update(
        &self,
        id: i64,
        fields: &AddressFields,
        now: DateTime<Utc>,
    ) -> Result<Address, HubError> {
        let done = sqlx::query(
            r#"
            UPDATE addresses SET client_id = ?, street_address_1 = ?, street_address_2 = ?,
                   city = ?, state = ?, postal_code = ?, country = ?, address_type = ?,
                   updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.client_id)
        .bind(&fields.street_address_1)
        .bind(&fields.street_address_2)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.postal_code)
        .bind(&fields.country)
        .bind(fields.address_type.as_str())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        self.get_by_id(id)
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn delete(&self, id: i64) -> Result<(), HubError> {
        let done = sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(HubError::NotFound);
        }
        Ok(())
    }
}

fn select_addresses(tail: &str) -> String {
    format!(
        "SELECT id, client_id, street_address_1, street_address_2, city, state, \
         postal_code, country, address_type, created_at, updated_at FROM addresses {tail}"
    )
}

fn address_row(row: SqliteRow) -> Result<Address, HubError> {
    let type_raw: String = row.try_get("address_type")?;
    Ok(Address {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        street_address_1: row.try_get("street_address_1")?,
        street_address_2: row.try_get("street_address_2")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        postal_code: row.try_get("postal_code")?,
        country: row.try_get("country")?,
        address_type: AddressType::parse(&type_raw).unwrap_or(AddressType::Physical),
        created_at: parse_utc(row.try_get("created_at")?)?,
        updated_at: parse_utc(row.try_get("updated_at")?)?,
    })
}
