//! Single-slot cancellable timer.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// A deadline that every new trigger pushes back. Only the latest trigger
/// counts, so bursts of mutations collapse into one reapply.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one.
    pub fn trigger(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve once the pending deadline passes; never resolves while idle.
    /// The caller clears the slot with [`cancel`](Self::cancel) after firing.
    pub async fn elapsed(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
