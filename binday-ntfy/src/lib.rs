//! ntfy channel: raw message body posted to a topic URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use binday_core::{
    config::NtfySettings,
    model::Notification,
    ports::{NotifierPort, RunError, error_for_status},
};

/// Name under which ntfy results are reported.
pub const CHANNEL_NAME: &str = "ntfy";

const SERVER_URL: &str = "https://ntfy.sh";
const PRIORITY: &str = "default";
const TAGS: &str = "trash,recycle";

/// Publishes notifications to one ntfy topic.
pub struct NtfyNotifier {
    client: Client,
    topic_url: String,
}

impl NtfyNotifier {
    /// Create a notifier for the configured topic on ntfy.sh.
    #[must_use]
    pub fn new(client: Client, settings: &NtfySettings) -> Self {
        Self::with_server(client, settings, SERVER_URL)
    }

    /// Create a notifier for the configured topic on another ntfy server.
    #[must_use]
    pub fn with_server(client: Client, settings: &NtfySettings, server: &str) -> Self {
        Self {
            client,
            topic_url: format!(
                "{}/{}",
                server.trim_end_matches('/'),
                settings.topic.trim().trim_start_matches('/')
            ),
        }
    }
}

#[async_trait]
impl NotifierPort for NtfyNotifier {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn notify(&self, notification: &Notification) -> Result<(), RunError> {
        let response = self
            .client
            .post(&self.topic_url)
            .header("Title", notification.title.as_str())
            .header("Priority", PRIORITY)
            .header("Tags", TAGS)
            .body(notification.message.clone())
            .send()
            .await?;
        error_for_status(response)?;
        Ok(())
    }
}

/// Build the ntfy channel, or nothing when it is disabled.
#[must_use]
pub fn channel(client: Client, settings: &NtfySettings) -> Option<Arc<dyn NotifierPort>> {
    settings
        .enabled
        .then(|| -> Arc<dyn NotifierPort> { Arc::new(NtfyNotifier::new(client, settings)) })
}
