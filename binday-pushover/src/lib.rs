//! Pushover channel: form-encoded POST to the messages endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use binday_core::{
    config::PushoverSettings,
    model::Notification,
    ports::{NotifierPort, RunError, error_for_status},
};

/// Name under which Pushover results are reported.
pub const CHANNEL_NAME: &str = "pushover";

const MESSAGES_URL: &str = "https://api.pushover.net/1/messages.json";

/// Delivers notifications to a single Pushover user.
pub struct PushoverNotifier {
    client: Client,
    endpoint: String,
    user_key: String,
    api_token: String,
}

impl PushoverNotifier {
    /// Create a notifier from the configured credentials.
    #[must_use]
    pub fn new(client: Client, settings: &PushoverSettings) -> Self {
        Self::with_endpoint(client, settings, MESSAGES_URL)
    }

    /// Create a notifier posting to a different messages endpoint.
    #[must_use]
    pub fn with_endpoint(
        client: Client,
        settings: &PushoverSettings,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            user_key: settings.user_key.trim().to_owned(),
            api_token: settings.api_token.trim().to_owned(),
        }
    }
}

#[async_trait]
impl NotifierPort for PushoverNotifier {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn notify(&self, notification: &Notification) -> Result<(), RunError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("token", self.api_token.as_str()),
                ("user", self.user_key.as_str()),
                ("title", notification.title.as_str()),
                ("message", notification.message.as_str()),
            ])
            .send()
            .await?;
        error_for_status(response)?;
        Ok(())
    }
}

/// Build the Pushover channel, or nothing when it is disabled.
#[must_use]
pub fn channel(client: Client, settings: &PushoverSettings) -> Option<Arc<dyn NotifierPort>> {
    settings
        .enabled
        .then(|| -> Arc<dyn NotifierPort> { Arc::new(PushoverNotifier::new(client, settings)) })
}
