use crate::db::credentials::SqlitePool;
use crate::db::models::CalendarEventRecord;
use crate::error::HubError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Fields written on every sync of an external event.
#[derive(Debug, Clone)]
pub struct SyncedEvent {
    pub google_event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Persistence for locally mirrored calendar events, keyed by the external
/// event id.
#[derive(Clone)]
pub struct EventsStorage {
    pool: SqlitePool,
}

impl EventsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert by unique `google_event_id`. `synced_with_google` is asserted
    /// on every sync regardless of prior value; `created_at` survives
    /// updates, `updated_at` does not.
    pub async fn upsert_synced(
        &self,
        event: &SyncedEvent,
        now: DateTime<Utc>,
    ) -> Result<CalendarEventRecord, HubError> {
        sqlx::query(
            r#"
            INSERT INTO calendar_events (
                google_event_id, title, description, start_time, end_time,
                synced_with_google, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT(google_event_id) DO UPDATE SET
                title=excluded.title,
                description=excluded.description,
                start_time=excluded.start_time,
                end_time=excluded.end_time,
                synced_with_google=1,
                updated_at=excluded.updated_at
            "#,
        )
        .bind(&event.google_event_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time.to_rfc3339())
        .bind(event.end_time.to_rfc3339())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_by_google_id(&event.google_event_id)
            .await?
            .ok_or_else(|| HubError::Storage(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_google_id(
        &self,
        google_event_id: &str,
    ) -> Result<Option<CalendarEventRecord>, HubError> {
        let row = sqlx::query(
            r#"SELECT id, google_event_id, title, description, start_time, end_time,
               synced_with_google, created_at, updated_at
               FROM calendar_events WHERE google_event_id = ?"#,
        )
        .bind(google_event_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn count(&self) -> Result<i64, HubError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM calendar_events")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<CalendarEventRecord, HubError> {
        let synced_i: i64 = row.try_get("synced_with_google")?;
        Ok(CalendarEventRecord {
            id: row.try_get("id")?,
            google_event_id: row.try_get("google_event_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            start_time: parse_utc(row.try_get("start_time")?)?,
            end_time: parse_utc(row.try_get("end_time")?)?,
            synced_with_google: synced_i != 0,
            created_at: parse_utc(row.try_get("created_at")?)?,
            updated_at: parse_utc(row.try_get("updated_at")?)?,
        })
    }
}

pub(crate) fn parse_utc(raw: String) -> Result<DateTime<Utc>, HubError> {
    Ok(chrono::DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc))
}
