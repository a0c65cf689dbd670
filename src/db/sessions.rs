use crate::db::credentials::SqlitePool;
use crate::error::HubError;

/// Per-caller named session values. Each call commits its own statement,
/// which is the durability checkpoint: a value written by `set` survives a
/// process restart before the callback arrives.
#[derive(Clone)]
pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write a named value for the caller, creating the session row when
    /// missing.
    pub async fn set(&self, owner_id: i64, name: &str, value: &str) -> Result<(), HubError> {
        sqlx::query(
            r#"
            INSERT INTO session_values (owner_id, name, value) VALUES (?, ?, ?)
            ON CONFLICT(owner_id, name) DO UPDATE SET value=excluded.value
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Read and delete a named value in one statement, so a one-time value
    /// is consumed exactly once even under concurrent callbacks. Absent
    /// values read back as None; the cleanup itself never fails for that.
    pub async fn take(&self, owner_id: i64, name: &str) -> Result<Option<String>, HubError> {
        let row: Option<(String,)> = sqlx::query_as(
            "DELETE FROM session_values WHERE owner_id = ? AND name = ? RETURNING value",
        )
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.0))
    }
}
