//! Remote availability tracking.
//!
//! Records whether the remote directory answered the last attempt and when,
//! so a flaky or offline directory is not hammered on every search.
//!
//! ## Gating rule
//!
//! > Attempt the remote when its state is unknown or it was reachable last
//! > time. Once it has failed, attempt again only after the recheck interval
//! > has elapsed since that failure.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::{DateTime, Duration, Utc};

/// Default time between probes of an unreachable remote, in seconds.
pub const RECHECK_INTERVAL_SECS: i64 = 5 * 60;

/// Default time between probes of an unreachable remote.
pub fn default_recheck_interval() -> Duration {
    Duration::seconds(RECHECK_INTERVAL_SECS)
}

/// Last known reachability of the remote directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unknown,
    Available,
    Unavailable,
}

/// Snapshot of the tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityState {
    pub availability: Availability,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub recheck_interval: Duration,
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-wide tracker shared by every consumer.
static GLOBAL: OnceLock<Arc<AvailabilityTracker>> = OnceLock::new();

/// Thread-safe availability tracker.
#[derive(Debug)]
pub struct AvailabilityTracker {
    state: Mutex<AvailabilityState>,
}

impl AvailabilityTracker {
    /// Create a tracker with the default five minute recheck interval.
    pub fn new() -> Self {
        Self::with_interval(default_recheck_interval())
    }

    /// Create a tracker with a custom recheck interval.
    pub fn with_interval(recheck_interval: Duration) -> Self {
        Self {
            state: Mutex::new(AvailabilityState {
                availability: Availability::Unknown,
                last_checked_at: None,
                recheck_interval,
            }),
        }
    }

    /// The process-wide instance.
    ///
    /// Created on first use with the default interval and lives for the rest
    /// of the process; nothing needs to tear it down. Tests should build their
    /// own tracker instead of touching this one.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Install the process-wide instance at startup. Returns `false` if one
    /// was already in place.
    pub fn install_global(tracker: Arc<Self>) -> bool {
        GLOBAL.set(tracker).is_ok()
    }

    fn lock(&self) -> MutexGuard<'_, AvailabilityState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a remote attempt should be made at `now`.
    pub fn should_attempt_remote(&self, now: DateTime<Utc>) -> bool {
        let state = self.lock();
        match state.availability {
            Availability::Unknown | Availability::Available => true,
            Availability::Unavailable => match state.last_checked_at {
                Some(checked) => now - checked >= state.recheck_interval,
                None => true,
            },
        }
    }

    /// Record a successful remote attempt.
    pub fn record_success(&self, now: DateTime<Utc>) {
        let mut state = self.lock();
        if state.availability != Availability::Available {
            log::info!("Remote directory is reachable");
        }
        state.availability = Availability::Available;
        state.last_checked_at = Some(now);
    }

    /// Record a failed remote attempt.
    pub fn record_failure(&self, now: DateTime<Utc>) {
        let mut state = self.lock();
        if state.availability != Availability::Unavailable {
            log::warn!(
                "Remote directory marked unavailable, next probe in {}s",
                state.recheck_interval.num_seconds()
            );
        }
        state.availability = Availability::Unavailable;
        state.last_checked_at = Some(now);
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AvailabilityState {
        *self.lock()
    }
}

impl Default for AvailabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}
