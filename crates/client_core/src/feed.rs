//! Polling feed: the timer-driven fetch → extract → build → publish loop.
//!
//! Two states: Idle (no ticker task) and Polling (ticker task alive).
//! `start` runs one immediate cycle, then the ticker fires on a fixed
//! cadence, each tick spawning its cycle independently of in-flight
//! requests. Completions are ordered by a monotonic sequence number; a
//! response older than the last applied one is discarded instead of
//! overwriting newer chart state.

use std::{sync::Arc, time::Duration};

use shared::chart::{build_chart_pair, ChartPair};
use shared::domain::EventState;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::SnapshotSource;

/// Default poll cadence against `/api/get_data`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2098);

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A cycle completed; both chart models were published atomically.
    ChartsUpdated {
        charts: Arc<ChartPair>,
        sequence: u64,
    },
    /// A cycle failed; the previous charts remain current.
    FetchFailed { consecutive_failures: u32 },
}

struct FeedState {
    ticker_task: Option<JoinHandle<()>>,
    next_sequence: u64,
    last_applied: Option<u64>,
    latest: Option<Arc<ChartPair>>,
    consecutive_failures: u32,
}

/// Polling controller over a [`SnapshotSource`].
pub struct SensorFeed<S: SnapshotSource + 'static> {
    source: Arc<S>,
    interval: Duration,
    inner: Mutex<FeedState>,
    events: broadcast::Sender<FeedEvent>,
}

impl<S: SnapshotSource + 'static> SensorFeed<S> {
    pub fn new(source: Arc<S>) -> Arc<Self> {
        Self::with_interval(source, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(source: Arc<S>, interval: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            source,
            interval,
            inner: Mutex::new(FeedState {
                ticker_task: None,
                next_sequence: 0,
                last_applied: None,
                latest: None,
                consecutive_failures: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Latest published pair, or `None` before the first successful cycle.
    pub async fn latest_charts(&self) -> Option<Arc<ChartPair>> {
        self.inner.lock().await.latest.clone()
    }

    /// Failed polls since the last success; drives the staleness indicator.
    pub async fn consecutive_failures(&self) -> u32 {
        self.inner.lock().await.consecutive_failures
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.lock().await.ticker_task.is_some()
    }

    /// Idle → Polling. Runs one immediate cycle, then schedules the ticker.
    /// A no-op when already polling.
    pub async fn start(self: &Arc<Self>) {
        let first_sequence = {
            let mut guard = self.inner.lock().await;
            if guard.ticker_task.is_some() {
                return;
            }
            let first_sequence = guard.next_sequence;
            guard.next_sequence += 1;

            let feed = Arc::clone(self);
            guard.ticker_task = Some(tokio::spawn(async move {
                let mut ticker = interval(feed.interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // the immediate cycle below covers the first tick
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let sequence = {
                        let mut guard = feed.inner.lock().await;
                        let sequence = guard.next_sequence;
                        guard.next_sequence += 1;
                        sequence
                    };
                    // fire independently of in-flight cycles; stale
                    // completions are dropped in run_cycle
                    tokio::spawn(Arc::clone(&feed).run_cycle(sequence));
                }
            }));
            first_sequence
        };

        Arc::clone(self).run_cycle(first_sequence).await;
    }

    /// Polling → Idle. Aborts the ticker; in-flight fetches are left to
    /// finish and are subject to sequence ordering like any other.
    pub async fn stop(&self) {
        let task = self.inner.lock().await.ticker_task.take();
        if let Some(task) = task {
            task.abort();
        }
    }

    async fn run_cycle(self: Arc<Self>, sequence: u64) {
        match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                // extraction and model construction run synchronously
                // between awaits; no other cycle interleaves mid-build
                let events = EventState::from_snapshot(&snapshot);
                let charts = Arc::new(build_chart_pair(&snapshot, &events));
                {
                    let mut guard = self.inner.lock().await;
                    if guard
                        .last_applied
                        .is_some_and(|applied| sequence < applied)
                    {
                        debug!(sequence, "discarding out-of-order poll response");
                        return;
                    }
                    guard.last_applied = Some(sequence);
                    guard.consecutive_failures = 0;
                    guard.latest = Some(Arc::clone(&charts));
                }
                let _ = self
                    .events
                    .send(FeedEvent::ChartsUpdated { charts, sequence });
            }
            Err(err) => {
                let consecutive_failures = {
                    let mut guard = self.inner.lock().await;
                    guard.consecutive_failures += 1;
                    guard.consecutive_failures
                };
                warn!(sequence, consecutive_failures, "snapshot poll failed: {err}");
                let _ = self
                    .events
                    .send(FeedEvent::FetchFailed {
                        consecutive_failures,
                    });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
