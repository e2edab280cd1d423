//! Domain data structures for identifiers, pickup schedules, and notifications.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Title attached to every notification.
pub const NOTIFICATION_TITLE: &str = "Tomorrow's Waste Collection";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a place (municipality/address) in the schedule provider.
pub struct PlaceId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a collection program within a place.
pub struct ServiceId(pub String);

impl fmt::Display for PlaceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Scheduled pickup for a specific day.
pub struct PickupEvent {
    /// Date of the pickup.
    pub date: NaiveDate,
    /// Waste streams collected that day, e.g. "Garbage" or "Recycling".
    pub streams: BTreeSet<String>,
}

impl PickupEvent {
    /// Build an event from a date and any collection of stream labels.
    #[must_use]
    pub fn new<I, S>(date: NaiveDate, streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date,
            streams: streams.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Inclusive start/end range for requested schedules.
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message handed to every enabled channel.
pub struct Notification {
    /// Short title, used where the channel supports one.
    pub title: String,
    /// Plain text body.
    pub message: String,
}

impl Notification {
    /// Compose the reminder for the streams collected tomorrow.
    #[must_use]
    pub fn for_streams(streams: &BTreeSet<String>) -> Self {
        let listed = streams
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title: NOTIFICATION_TITLE.to_owned(),
            message: format!("Tomorrow's collection includes: {listed}."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of delivering a notification through one channel.
pub struct DispatchResult {
    /// Whether the remote service acknowledged the message.
    pub success: bool,
    /// Transport or HTTP error recorded on failure.
    pub error: Option<String>,
}

impl DispatchResult {
    /// A delivered notification.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed delivery with its error detail.
    #[must_use]
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_streams_in_sorted_order() {
        let streams = BTreeSet::from(["Recycling".to_owned(), "Garbage".to_owned()]);

        let notification = Notification::for_streams(&streams);

        assert_eq!(notification.title, NOTIFICATION_TITLE);
        assert_eq!(
            notification.message,
            "Tomorrow's collection includes: Garbage, Recycling."
        );
    }

    #[test]
    fn pickup_event_collapses_duplicate_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).expect("valid date");

        let event = PickupEvent::new(date, ["Compost", "Compost", "Garbage"]);

        assert_eq!(event.streams.len(), 2);
    }
}
