use crate::error::HubError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

/// Stateless client for the Google Calendar v3 events listing.
#[derive(Clone)]
pub struct CalendarApi {
    base: Url,
    http: reqwest::Client,
}

/// Page size for upcoming-event listings.
const MAX_RESULTS: u32 = 10;

impl CalendarApi {
    pub fn new(base: Url, http: reqwest::Client) -> Self {
        Self { base, http }
    }

    /// List upcoming events from the primary calendar, ascending by start
    /// time, expanded to single events, capped at [`MAX_RESULTS`].
    pub async fn list_upcoming(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<RemoteEvent>, HubError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| HubError::FetchFailed("calendar API base cannot-be-a-base".to_string()))?
            .extend(["calendars", "primary", "events"]);
        url.query_pairs_mut()
            .append_pair("timeMin", &time_min.to_rfc3339())
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| HubError::FetchFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(HubError::FetchFailed(format!(
                "events listing returned {}",
                resp.status()
            )));
        }

        let body: EventsListResponse = resp
            .json()
            .await
            .map_err(|e| HubError::FetchFailed(format!("malformed events response: {e}")))?;
        Ok(body.items.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    items: Option<Vec<RemoteEvent>>,
}

/// One event as returned by the provider; boundaries arrive either as a
/// `dateTime` or, for all-day events, a bare `date`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventBoundary>,
    pub end: Option<EventBoundary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventBoundary {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventBoundary {
    /// The raw boundary string, preferring the timed representation.
    pub fn raw(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}
