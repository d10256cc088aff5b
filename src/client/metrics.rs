//! Observability for requests sent to Spotify.
//!
//! Every physical HTTP attempt the client makes, including retries, is reported to the client's
//! [ObservabilitySink] as an [ExecutionEvent]. The sink is given to the client when it's built with
//! [observability_sink](crate::client::SpotifyClientBuilder::observability_sink); by default events are discarded.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::debug;
use reqwest::StatusCode;

/// The name of the latency histogram [LatencyRecorder] maintains. The latencies are in milliseconds.
pub const LATENCY_METRIC_NAME: &str = "spotify.requests.latency";

/// A single HTTP attempt sent to Spotify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEvent {
    /// How long the attempt took, from sending the request until the response headers arrived or the request failed.
    pub elapsed: Duration,
    /// The response status, or `None` if no response was received.
    pub status: Option<StatusCode>,
    /// The path of the requested URL.
    pub route: String,
}

/// Receives an event for every HTTP attempt the client makes.
///
/// Multiple requests may be in flight at once, so implementations have to be safe to call concurrently. Recording
/// should be quick and must not panic; the client doesn't wait for anything else from the sink.
pub trait ObservabilitySink: Send + Sync {
    fn record(&self, event: &ExecutionEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

/// Writes every event as a debug log record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

/// An in-memory latency histogram keyed by response status and route.
///
/// Clones share the same underlying histogram, so a clone can be given to the client while the original is kept for
/// reading the recorded latencies.
#[derive(Debug, Default, Clone)]
pub struct LatencyRecorder {
    inner: Arc<Mutex<BTreeMap<LatencyKey, LatencyStats>>>,
}

/// The attributes latencies are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LatencyKey {
    /// The response status code, or 0 if no response was received.
    pub status: u16,
    pub route: String,
}

/// Latency statistics of a single [LatencyKey], in milliseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: u64,
    pub total_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl ObservabilitySink for NoopSink {
    fn record(&self, _event: &ExecutionEvent) {}
}

impl ObservabilitySink for LogSink {
    fn record(&self, event: &ExecutionEvent) {
        debug!(
            "{LATENCY_METRIC_NAME}: {} ms, status {}, route {}",
            event.elapsed.as_millis(),
            event.status.map_or(0, |status| status.as_u16()),
            event.route
        );
    }
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics of every recorded status and route combination.
    pub fn snapshot(&self) -> BTreeMap<LatencyKey, LatencyStats> {
        self.lock().clone()
    }

    /// Returns the total amount of recorded attempts.
    pub fn attempts(&self) -> u64 {
        self.lock().values().map(|stats| stats.count).sum()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<LatencyKey, LatencyStats>> {
        // a panic while holding the lock can't leave the histogram in a state worth refusing to read
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObservabilitySink for LatencyRecorder {
    fn record(&self, event: &ExecutionEvent) {
        let elapsed_ms = u64::try_from(event.elapsed.as_millis()).unwrap_or(u64::MAX);
        let key = LatencyKey {
            status: event.status.map_or(0, |status| status.as_u16()),
            route: event.route.clone(),
        };

        let mut histogram = self.lock();
        let stats = histogram.entry(key).or_default();

        stats.min_ms = if stats.count == 0 {
            elapsed_ms
        } else {
            stats.min_ms.min(elapsed_ms)
        };
        stats.max_ms = stats.max_ms.max(elapsed_ms);
        stats.total_ms = stats.total_ms.saturating_add(elapsed_ms);
        stats.count += 1;
    }
}

impl LatencyStats {
    /// Returns the average latency in milliseconds.
    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms as f64 / self.count as f64
        }
    }
}
