use crate::calendar::api::{CalendarApi, RemoteEvent};
use crate::calendar::parse::parse_event_boundary;
use crate::db::models::CalendarEventRecord;
use crate::db::{CredentialsStorage, EventsStorage, SyncedEvent};
use crate::error::HubError;
use crate::google_oauth::endpoints::refresh_access_token;
use chrono::Utc;
use tracing::{info, warn};

/// Placeholder title for events the provider sends without a summary.
const UNTITLED: &str = "No title";

/// Result of one sync pass: the full synced set in provider order, plus the
/// count of malformed events that were skipped.
#[derive(Debug)]
pub struct SyncOutcome {
    pub events: Vec<CalendarEventRecord>,
    pub skipped: usize,
}

/// Pulls upcoming events for one owner and reconciles them into local
/// records, refreshing the access token transparently when expired.
#[derive(Clone)]
pub struct CalendarSyncEngine {
    credentials: CredentialsStorage,
    events: EventsStorage,
    api: CalendarApi,
    http: reqwest::Client,
}

impl CalendarSyncEngine {
    pub fn new(
        credentials: CredentialsStorage,
        events: EventsStorage,
        api: CalendarApi,
        http: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            events,
            api,
            http,
        }
    }

    pub async fn sync(&self, owner_id: i64) -> Result<SyncOutcome, HubError> {
        let Some(mut stored) = self.credentials.get_by_owner(owner_id).await? else {
            return Err(HubError::NotConnected);
        };

        let now = Utc::now();
        if stored.is_expired(now) && stored.has_refresh_token() {
            // The new token must be durable before the fetch, so a crash
            // mid-sync cannot leave a spent refresh grant unrecorded.
            let (access_token, expires_at) = refresh_access_token(&stored, &self.http).await?;
            self.credentials
                .update_access_token(owner_id, &access_token, expires_at)
                .await?;
            stored.access_token = access_token;
            stored.expires_at = expires_at;
        }
        // Expired with no refresh token: proceed with the stale token and
        // let the listing fail on its own terms.

        let remote = self.api.list_upcoming(&stored.access_token, now).await?;

        let mut synced = Vec::with_capacity(remote.len());
        let mut skipped = 0usize;
        for event in &remote {
            let fields = match Self::event_fields(event) {
                Ok(fields) => fields,
                Err(reason) => {
                    warn!(event_id = %event.id, %reason, "skipping malformed event");
                    skipped += 1;
                    continue;
                }
            };
            synced.push(self.events.upsert_synced(&fields, now).await?);
        }

        info!(
            owner_id,
            fetched = remote.len(),
            synced = synced.len(),
            skipped,
            "calendar sync complete"
        );
        Ok(SyncOutcome {
            events: synced,
            skipped,
        })
    }

    fn event_fields(event: &RemoteEvent) -> Result<SyncedEvent, String> {
        let start_raw = event
            .start
            .as_ref()
            .and_then(|b| b.raw())
            .ok_or_else(|| "missing start".to_string())?;
        let end_raw = event
            .end
            .as_ref()
            .and_then(|b| b.raw())
            .ok_or_else(|| "missing end".to_string())?;

        let start_time = parse_event_boundary(start_raw).map_err(|e| e.to_string())?;
        let end_time = parse_event_boundary(end_raw).map_err(|e| e.to_string())?;

        Ok(SyncedEvent {
            google_event_id: event.id.clone(),
            title: event
                .summary
                .clone()
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: event.description.clone(),
            start_time,
            end_time,
        })
    }
}
