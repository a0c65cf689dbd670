use crate::db::credentials::SqlitePool;
use crate::db::events::parse_utc;
use crate::db::models::User;
use crate::error::HubError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

#[derive(Clone)]
pub struct UsersStorage {
    pool: SqlitePool,
}

impl UsersStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, HubError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name,
                               phone_number, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
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

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, HubError> {
        let row = sqlx::query(
            r#"SELECT id, email, password_hash, first_name, last_name,
               phone_number, created_at, updated_at
               FROM users WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, HubError> {
        let row = sqlx::query(
            r#"SELECT id, email, password_hash, first_name, last_name,
               phone_number, created_at, updated_at
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    fn row_to_model(row: SqliteRow) -> Result<User, HubError> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            phone_number: row.try_get("phone_number")?,
            created_at: parse_utc(row.try_get("created_at")?)?,
            updated_at: parse_utc(row.try_get("updated_at")?)?,
        })
    }
}
