//! Single-shot run: day gate, schedule lookup, pickup extraction, dispatch.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::clock::Clock;
use crate::config::Configuration;
use crate::dispatch::Dispatcher;
use crate::model::{DateRange, DispatchResult, Notification, PickupEvent};
use crate::ports::{ChannelFactory, RunError, SchedulePort};

/// Weekday on which an unforced run proceeds.
pub const DEFAULT_TRIGGER_DAY: Weekday = Weekday::Sun;

/// Size of the schedule window requested from the provider, starting today.
pub const LOOKAHEAD_DAYS: u64 = 7;

/// Streams collected on `target`, merged over every event on that date.
#[must_use]
pub fn pickups_for_date(events: &[PickupEvent], target: NaiveDate) -> BTreeSet<String> {
    events
        .iter()
        .filter(|event| event.date == target)
        .flat_map(|event| event.streams.iter().cloned())
        .collect()
}

#[derive(Debug)]
/// Terminal state of one invocation.
pub enum RunOutcome {
    /// Not the trigger day and no force requested.
    Skipped {
        /// Date the run was attempted on.
        today: NaiveDate,
    },
    /// Schedule fetched, but nothing is collected tomorrow.
    NoPickup {
        /// The date that was checked.
        date: NaiveDate,
    },
    /// Notification handed to the enabled channels.
    Dispatched {
        /// Collection date the notification is about.
        date: NaiveDate,
        /// What was sent.
        notification: Notification,
        /// Per-channel delivery outcome, keyed by channel name.
        results: BTreeMap<String, DispatchResult>,
    },
    /// Configuration or schedule lookup failed before any dispatch.
    Failed(RunError),
}

impl RunOutcome {
    /// Whether the process should exit successfully.
    ///
    /// A dispatch counts as successful when at least one channel delivered,
    /// or when no channel was enabled at all.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Skipped { .. } | Self::NoPickup { .. } => true,
            Self::Dispatched { results, .. } => {
                results.is_empty() || results.values().any(|result| result.success)
            }
            Self::Failed(_) => false,
        }
    }
}

/// Public entry point wiring the clock, schedule backend, and channels together.
pub struct BindayService {
    clock: Arc<dyn Clock>,
    schedule_port: Arc<dyn SchedulePort>,
    channel_factory: Arc<dyn ChannelFactory>,
    trigger_day: Weekday,
}

impl BindayService {
    /// Create a service running on [`DEFAULT_TRIGGER_DAY`].
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        schedule_port: Arc<dyn SchedulePort>,
        channel_factory: Arc<dyn ChannelFactory>,
    ) -> Self {
        Self {
            clock,
            schedule_port,
            channel_factory,
            trigger_day: DEFAULT_TRIGGER_DAY,
        }
    }

    /// Override the weekday on which unforced runs proceed.
    #[must_use]
    pub fn with_trigger_day(mut self, trigger_day: Weekday) -> Self {
        self.trigger_day = trigger_day;
        self
    }

    /// Run once against the configuration at `config_path`.
    pub async fn run(&self, config_path: &Path, force: bool) -> RunOutcome {
        let today = self.clock.today();
        if !force && today.weekday() != self.trigger_day {
            tracing::info!(
                "Not running because today is {} and not {}; use --force to run anyway",
                today.weekday(),
                self.trigger_day
            );
            return RunOutcome::Skipped { today };
        }

        match self.notify_tomorrow(config_path, today).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Run failed: {err}");
                RunOutcome::Failed(err)
            }
        }
    }

    async fn notify_tomorrow(
        &self,
        config_path: &Path,
        today: NaiveDate,
    ) -> Result<RunOutcome, RunError> {
        let config = Configuration::load(config_path)?;
        let (place_id, service_id) = config.validate()?;

        let tomorrow = today + Days::new(1);
        let range = DateRange {
            start: today,
            end: today + Days::new(LOOKAHEAD_DAYS),
        };
        tracing::debug!(%place_id, %service_id, ?range, "Fetching collection schedule");
        let events = self
            .schedule_port
            .schedule(&place_id, &service_id, range)
            .await?;

        let streams = pickups_for_date(&events, tomorrow);
        if streams.is_empty() {
            tracing::info!("No waste collection scheduled for {tomorrow}");
            return Ok(RunOutcome::NoPickup { date: tomorrow });
        }

        let notification = Notification::for_streams(&streams);
        tracing::info!("{}", notification.message);

        let dispatcher = Dispatcher::new(self.channel_factory.channels(&config.notifications));
        if dispatcher.is_empty() {
            tracing::warn!("No notification channel is enabled; nothing was sent");
        }
        let results = dispatcher.send(&notification).await;
        if !results.is_empty() && results.values().all(|result| !result.success) {
            tracing::error!("No notification was delivered successfully");
        }

        Ok(RunOutcome::Dispatched {
            date: tomorrow,
            notification,
            results,
        })
    }
}
