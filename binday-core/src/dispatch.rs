//! Sends one notification through every enabled channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{DispatchResult, Notification};
use crate::ports::NotifierPort;

/// Set of channels a notification is delivered through.
pub struct Dispatcher {
    channels: Vec<Arc<dyn NotifierPort>>,
}

impl Dispatcher {
    /// Build a dispatcher over the provided channel list.
    #[must_use]
    pub fn new(channels: Vec<Arc<dyn NotifierPort>>) -> Self {
        Self { channels }
    }

    /// Whether no channel is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Names of all channels, in dispatch order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|channel| channel.name())
    }

    /// Attempt delivery on each channel in turn and record every outcome.
    ///
    /// A failing channel never prevents the attempt on the next one.
    pub async fn send(&self, notification: &Notification) -> BTreeMap<String, DispatchResult> {
        let mut results = BTreeMap::new();

        for channel in &self.channels {
            let result = match channel.notify(notification).await {
                Ok(()) => {
                    tracing::info!(channel = channel.name(), "Notification sent");
                    DispatchResult::success()
                }
                Err(err) => {
                    tracing::warn!(channel = channel.name(), "Notification failed: {err}");
                    DispatchResult::failure(err.to_string())
                }
            };
            results.insert(channel.name().to_owned(), result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::ports::RunError;

    struct StubChannel {
        name: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubChannel {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl NotifierPort for StubChannel {
        fn name(&self) -> &str {
            self.name
        }

        async fn notify(&self, _notification: &Notification) -> Result<(), RunError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RunError::Api {
                    status: StatusCode::BAD_REQUEST,
                    url: format!("https://example.invalid/{}", self.name),
                });
            }
            Ok(())
        }
    }

    fn port(channel: &Arc<StubChannel>) -> Arc<dyn NotifierPort> {
        Arc::<StubChannel>::clone(channel)
    }

    fn notification() -> Notification {
        Notification {
            title: "title".to_owned(),
            message: "message".to_owned(),
        }
    }

    #[tokio::test]
    async fn no_channels_yield_no_results() {
        let dispatcher = Dispatcher::new(Vec::new());

        let results = dispatcher.send(&notification()).await;

        assert!(dispatcher.is_empty());
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_the_next_one() {
        let failing = StubChannel::new("pushover", true);
        let working = StubChannel::new("ntfy", false);
        let dispatcher = Dispatcher::new(vec![port(&failing), port(&working)]);

        let results = dispatcher.send(&notification()).await;

        assert_eq!(results.len(), 2);
        let pushover = results.get("pushover").expect("pushover result");
        assert!(!pushover.success);
        assert!(pushover.error.as_deref().is_some_and(|err| err.contains("400")));
        assert_eq!(results.get("ntfy"), Some(&DispatchResult::success()));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(working.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn channel_names_keep_dispatch_order() {
        let dispatcher = Dispatcher::new(vec![
            port(&StubChannel::new("pushover", false)),
            port(&StubChannel::new("ntfy", false)),
        ]);

        assert_eq!(
            dispatcher.channel_names().collect::<Vec<_>>(),
            ["pushover", "ntfy"]
        );
    }
}
