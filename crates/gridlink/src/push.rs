//! Periodic state-push timer.
//!
//! Designed to sit inside the session actor's `tokio::select!` loop:
//! while armed, [`PushTimer::wait`] resolves once per interval; while
//! disarmed (link down, session tearing down), it pends forever and the
//! other `select!` branches keep running.

use std::time::Duration;

use tokio::time::{self, Instant};

/// Fires at a fixed interval while armed.
#[derive(Debug)]
pub struct PushTimer {
    interval: Duration,
    next: Option<Instant>,
}

impl PushTimer {
    /// A disarmed timer for the given interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    /// Starts (or restarts) the cadence: the first fire is one full
    /// interval from now.
    pub fn arm(&mut self) {
        self.next = Some(Instant::now() + self.interval);
    }

    /// Stops firing. `wait` pends forever until re-armed.
    pub fn disarm(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Resolves at the next scheduled fire, then schedules the following
    /// one. Pends forever while disarmed.
    ///
    /// Cancellation-safe: a `select!` that takes another branch leaves the
    /// schedule untouched.
    pub async fn wait(&mut self) {
        let Some(at) = self.next else {
            // Never completes — select! keeps handling other branches.
            std::future::pending::<()>().await;
            unreachable!()
        };
        time::sleep_until(at).await;
        self.next = Some(Instant::now() + self.interval);
    }
}
