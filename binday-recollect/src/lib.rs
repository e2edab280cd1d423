//! Schedule client for the ReCollect events API used by many municipalities.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use binday_core::{
    model::{DateRange, PickupEvent, PlaceId, ServiceId},
    ports::{RunError, SchedulePort, error_for_status},
};

const BASE_URL: &str = "https://api.recollect.net";
const DATE_FORMAT: &str = "%Y-%m-%d";
const LOCALE: &str = "en-US";

/// Response from /api/places/{place}/services/{service}/events
#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Vec<EventEntry>,
}

/// Single calendar entry. Reminder-only entries are hidden server side.
#[derive(Debug, Deserialize)]
struct EventEntry {
    day: NaiveDate,
    #[serde(default)]
    flags: Vec<EventFlag>,
}

/// What happens on that day, e.g. `{"subject": "Garbage", ...}`.
#[derive(Debug, Deserialize)]
struct EventFlag {
    #[serde(default)]
    subject: Option<String>,
    // name, event_type, colours etc. are not needed
}

impl From<EventEntry> for PickupEvent {
    fn from(entry: EventEntry) -> Self {
        PickupEvent::new(
            entry.day,
            entry
                .flags
                .into_iter()
                .filter_map(|flag| flag.subject)
                .map(|subject| subject.trim().to_owned())
                .filter(|subject| !subject.is_empty()),
        )
    }
}

/// Pickup schedule implementation for ReCollect.
pub struct RecollectSchedulePort {
    client: Client,
    base_url: String,
}

impl RecollectSchedulePort {
    /// Create a new schedule port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Create a schedule port talking to a different API host.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn request(
        &self,
        place_id: &PlaceId,
        service_id: &ServiceId,
        range: DateRange,
    ) -> RequestBuilder {
        let after = range.start.format(DATE_FORMAT).to_string();
        let before = range.end.format(DATE_FORMAT).to_string();

        self.client
            .get(format!(
                "{}/api/places/{place_id}/services/{service_id}/events",
                self.base_url
            ))
            .query(&[
                ("nomerge", "1"),
                ("hide", "reminder_only"),
                ("after", after.as_str()),
                ("before", before.as_str()),
                ("locale", LOCALE),
                ("include_message", "email"),
            ])
            .header("X-Recollect-Place", format!("{place_id}:{service_id}"))
            .header("X-Recollect-Locale", LOCALE)
    }
}

#[async_trait]
impl SchedulePort for RecollectSchedulePort {
    async fn schedule(
        &self,
        place_id: &PlaceId,
        service_id: &ServiceId,
        range: DateRange,
    ) -> Result<Vec<PickupEvent>, RunError> {
        let response =
            fetch_json::<EventsResponse>(self.request(place_id, service_id, range)).await?;

        let events: Vec<PickupEvent> = response.events.into_iter().map(Into::into).collect();
        tracing::debug!("ReCollect returned {} events", events.len());

        Ok(events)
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, RunError> {
    let response = error_for_status(req.send().await?)?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| RunError::Parse(err.to_string()))
}
