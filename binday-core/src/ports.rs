//! Traits describing backend capabilities and the shared error type.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Error as ReqwestError, Response, StatusCode};

use crate::config::NotificationSettings;
use crate::model::{DateRange, Notification, PickupEvent, PlaceId, ServiceId};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while preparing a run or talking to remote services.
pub enum RunError {
    /// Configuration is malformed, incomplete, or still holds placeholders.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The configuration file could not be read or written.
    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Remote service answered with a non-success status.
    #[error("API error: {url} returned {status}")]
    Api {
        /// Status code returned by the service.
        status: StatusCode,
        /// Requested URL, without query string.
        url: String,
    },
    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Turn a non-success response into [`RunError::Api`].
///
/// # Errors
///
/// Returns [`RunError::Api`] carrying the status and the URL without its query
/// string.
pub fn error_for_status(response: Response) -> Result<Response, RunError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut url = response.url().clone();
    url.set_query(None);
    Err(RunError::Api {
        status,
        url: url.to_string(),
    })
}

#[async_trait]
/// Trait for collection schedule backends.
pub trait SchedulePort: Send + Sync {
    /// Fetch pickup events for a place/service pair within the given date range.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Network`], [`RunError::Api`] or [`RunError::Parse`]
    /// when the single request attempt fails.
    async fn schedule(
        &self,
        place_id: &PlaceId,
        service_id: &ServiceId,
        range: DateRange,
    ) -> Result<Vec<PickupEvent>, RunError>;
}

#[async_trait]
/// Trait for a notification delivery channel.
pub trait NotifierPort: Send + Sync {
    /// Stable channel name, used as key in dispatch results.
    fn name(&self) -> &str;

    /// Deliver one notification.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] when the request fails or is rejected.
    async fn notify(&self, notification: &Notification) -> Result<(), RunError>;
}

/// Builds the enabled channels from validated notification settings.
pub trait ChannelFactory: Send + Sync {
    /// One notifier per enabled channel; disabled channels are not built.
    fn channels(&self, settings: &NotificationSettings) -> Vec<Arc<dyn NotifierPort>>;
}
