//! HTTP-backed channel wiring.

use std::sync::Arc;

use binday_core::{config::NotificationSettings, ports::ChannelFactory, ports::NotifierPort};
use binday_ntfy as ntfy;
use binday_pushover as pushover;
use reqwest::Client;

/// Builds the Pushover and ntfy channels that are enabled in configuration.
pub(crate) struct HttpChannels {
    client: Client,
}

impl HttpChannels {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ChannelFactory for HttpChannels {
    fn channels(&self, settings: &NotificationSettings) -> Vec<Arc<dyn NotifierPort>> {
        [
            pushover::channel(self.client.clone(), &settings.pushover),
            ntfy::channel(self.client.clone(), &settings.ntfy),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
