use crate::db::models::StoredCredential;
use crate::error::HubError;
use crate::google_oauth::credentials::CredentialSet;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

/// Persistence for per-user Google credential sets, keyed by `owner_id`.
#[derive(Clone)]
pub struct CredentialsStorage {
    pool: SqlitePool,
}

impl CredentialsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_owner(&self, owner_id: i64) -> Result<Option<StoredCredential>, HubError> {
        let row = sqlx::query(
            r#"SELECT id, owner_id, access_token, refresh_token, expires_at,
               token_uri, client_id, client_secret, scopes
               FROM google_credentials WHERE owner_id = ?"#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Upsert by unique `owner_id`, returning the stored row and whether it
    /// was newly created.
    ///
    /// The refresh token is preserved inside the statement itself: an empty
    /// incoming value never replaces a stored non-empty one. Keeping the
    /// read-modify-write in one `INSERT .. ON CONFLICT DO UPDATE` relies on
    /// SQLite's row-level update atomicity, so a concurrent re-link for the
    /// same owner cannot interleave and drop the token.
    pub async fn upsert_preserving_refresh(
        &self,
        owner_id: i64,
        creds: &CredentialSet,
    ) -> Result<(StoredCredential, bool), HubError> {
        let existed: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM google_credentials WHERE owner_id = ?)")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

        sqlx::query(
            r#"
            INSERT INTO google_credentials (
                owner_id, access_token, refresh_token, expires_at,
                token_uri, client_id, client_secret, scopes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(owner_id) DO UPDATE SET
                access_token=excluded.access_token,
                refresh_token=COALESCE(
                    NULLIF(excluded.refresh_token, ''),
                    google_credentials.refresh_token
                ),
                expires_at=excluded.expires_at,
                token_uri=excluded.token_uri,
                client_id=excluded.client_id,
                client_secret=excluded.client_secret,
                scopes=excluded.scopes
            "#,
        )
        .bind(owner_id)
        .bind(&creds.access_token)
        .bind(creds.refresh_token.as_deref().unwrap_or(""))
        .bind(creds.expires_at.to_rfc3339())
        .bind(&creds.token_uri)
        .bind(&creds.client_id)
        .bind(&creds.client_secret)
        .bind(creds.scopes_string())
        .execute(&self.pool)
        .await?;

        let stored = self
            .get_by_owner(owner_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((stored, !existed.0))
    }

    /// Persist a refreshed access token and expiry. The refresh token and
    /// provider identity columns are untouched.
    pub async fn update_access_token(
        &self,
        owner_id: i64,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), HubError> {
        sqlx::query(
            "UPDATE google_credentials SET access_token = ?, expires_at = ? WHERE owner_id = ?",
        )
        .bind(access_token)
        .bind(expires_at.to_rfc3339())
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<StoredCredential, HubError> {
        let expires_str: String = row.try_get("expires_at")?;
        let expires_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&expires_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(StoredCredential {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            access_token: row.try_get("access_token")?,
            refresh_token: row.try_get("refresh_token")?,
            expires_at,
            token_uri: row.try_get("token_uri")?,
            client_id: row.try_get("client_id")?,
            client_secret: row.try_get("client_secret")?,
            scopes: row.try_get("scopes")?,
        })
    }
}
