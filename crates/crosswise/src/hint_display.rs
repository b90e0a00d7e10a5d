//! The hint currently on screen and its auto-hide timer.

use crosswise_tictactoe::Hint;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Sleep};
use tracing::{debug, instrument};

/// Visible hint, per-match usage counter and pending auto-hide.
///
/// The timer is a plain [`Sleep`] owned by this value, so dropping the
/// display (or the task holding it) cancels the pending hide.
#[derive(Debug)]
pub struct HintDisplay {
    current: Option<Hint>,
    hints_used: u32,
    deadline: Option<Pin<Box<Sleep>>>,
    display_for: Duration,
}

impl HintDisplay {
    /// Creates an empty display whose hints hide after `display_for`.
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: None,
            hints_used: 0,
            deadline: None,
            display_for,
        }
    }

    /// Hint on screen, if any.
    pub fn current(&self) -> Option<Hint> {
        self.current
    }

    /// Hints requested since the match started.
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// True while an auto-hide is pending.
    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// Shows `hint`, replacing any previous one and restarting the timer.
    #[instrument(skip(self))]
    pub fn show(&mut self, hint: Hint) {
        self.hints_used += 1;
        self.current = Some(hint);
        let deadline = Instant::now() + self.display_for;
        match self.deadline.as_mut() {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.deadline = Some(Box::pin(tokio::time::sleep_until(deadline))),
        }
        debug!(hints_used = self.hints_used, "Hint shown");
    }

    /// Hides the hint and cancels the timer.
    pub fn hide(&mut self) {
        if self.current.take().is_some() {
            debug!("Hint hidden");
        }
        self.deadline = None;
    }

    /// Hides the hint and zeroes the counter.
    pub fn reset(&mut self) {
        self.hide();
        self.hints_used = 0;
    }

    /// Completes when the visible hint times out, hiding it.
    ///
    /// Never completes while nothing is scheduled. Cancel safe: dropping the
    /// future leaves the display untouched.
    pub async fn expired(&mut self) {
        match self.deadline.as_mut() {
            Some(sleep) => sleep.await,
            None => std::future::pending().await,
        }
        debug!("Hint display timed out");
        self.hide();
    }
}
