//! Cache lifecycle telemetry events and sinks.
//!
//! The contribution cache reports hits, misses, builds, invalidations and
//! evictions through a [`TelemetrySink`]. The server binary either drops
//! these events or writes them to stderr as JSON lines.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the contribution cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A lookup was answered from the cache.
    CacheHit {
        /// The user whose index was served.
        user: String,
    },
    /// A lookup found no entry and started a build.
    CacheMiss {
        /// The user whose index is being built.
        user: String,
    },
    /// A caller joined a build already in flight for the same user.
    BuildJoined {
        /// The user whose build was joined.
        user: String,
    },
    /// A build finished and its index was stored.
    IndexBuilt {
        /// The user whose index was built.
        user: String,
        /// Number of raw records fetched from upstream.
        records: usize,
        /// Number of distinct owners in the resulting index.
        owners: usize,
    },
    /// A build failed; nothing was stored.
    BuildFailed {
        /// The user whose build failed.
        user: String,
        /// Human-readable failure.
        message: String,
    },
    /// An entry was removed on request.
    CacheInvalidated {
        /// The user whose entry was removed.
        user: String,
    },
    /// An entry was dropped to stay within capacity.
    CacheEvicted {
        /// The least recently used user that was dropped.
        user: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Telemetry sink that keeps every event in memory for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingTelemetrySink {
    /// Returns a copy of the events recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
