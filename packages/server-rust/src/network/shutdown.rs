//! Graceful shutdown: health state machine and in-flight request tracking.
//!
//! Health state lives in an `ArcSwap` so probes read it lock-free; the
//! in-flight counter is an atomic with RAII guards, so a handler that
//! panics still decrements it during unwinding.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::watch;

/// Lifecycle state reported by the health endpoints.
///
/// Transitions: `Starting -> Ready -> Draining -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Initializing; not yet accepting requests.
    Starting,
    /// Fully operational.
    Ready,
    /// Shutdown signalled; finishing in-flight requests.
    Draining,
    /// All in-flight requests finished.
    Stopped,
}

impl HealthState {
    /// Lowercase name used in the health endpoint's JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

/// Coordinates graceful shutdown across the server.
///
/// Readiness probes consult [`health_state`](Self::health_state); the serve
/// loop selects on [`subscribe`](Self::subscribe); and
/// [`wait_for_drain`](Self::wait_for_drain) holds the final state
/// transition until every [`InFlightGuard`] has dropped.
#[derive(Debug)]
pub struct ShutdownController {
    signal: watch::Sender<bool>,
    in_flight: Arc<AtomicU64>,
    state: ArcSwap<HealthState>,
}

impl ShutdownController {
    /// New controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal,
            in_flight: Arc::new(AtomicU64::new(0)),
            state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    /// Marks the server ready to accept requests.
    pub fn set_ready(&self) {
        self.state.store(Arc::new(HealthState::Ready));
    }

    /// Moves to `Draining` and notifies every subscriber.
    pub fn trigger_shutdown(&self) {
        self.state.store(Arc::new(HealthState::Draining));
        // Subscribers may already be gone; that's fine.
        let _ = self.signal.send(true);
    }

    /// Current health state.
    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    /// Receiver that flips to `true` when shutdown is triggered.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// RAII guard counting one in-flight request.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Number of requests currently in flight.
    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Waits until every in-flight request completes, up to `timeout`.
    ///
    /// On success transitions to `Stopped` and returns `true`; on timeout
    /// the state stays `Draining` and this returns `false`.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.in_flight.load(Ordering::Relaxed) > 0 {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.state.store(Arc::new(HealthState::Stopped));
        true
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
