//! Two-phase confirmation shown after a successful submit.
//!
//! Right after the insert the form shows [`ConfirmationPhase::Sent`]. After
//! `thank_you_after` it switches to [`ConfirmationPhase::ThankYou`], which disappears again
//! `clear_after` later. The phase is derived from the elapsed time whenever it is asked
//! for, so there is no timer to cancel.

use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPhase {
    Sent,
    ThankYou,
}

impl ConfirmationPhase {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmationPhase::Sent => "Order sent successfully!",
            ConfirmationPhase::ThankYou => "Thank you for your order! We are happy you are here.",
        }
    }
}

/// How long each confirmation phase stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfirmationTimings {
    pub thank_you_after_ms: u64,
    pub clear_after_ms: u64,
}

impl Default for ConfirmationTimings {
    fn default() -> Self {
        Self {
            thank_you_after_ms: 2_000,
            clear_after_ms: 3_000,
        }
    }
}

impl ConfirmationTimings {
    pub fn thank_you_after(&self) -> Duration {
        Duration::from_millis(self.thank_you_after_ms)
    }

    pub fn clear_after(&self) -> Duration {
        Duration::from_millis(self.clear_after_ms)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Confirmation {
    shown_at: Instant,
}

impl Confirmation {
    pub(crate) fn started(shown_at: Instant) -> Self {
        Self { shown_at }
    }

    pub(crate) fn phase_at(
        &self,
        now: Instant,
        timings: &ConfirmationTimings,
    ) -> Option<ConfirmationPhase> {
        let elapsed = now.saturating_duration_since(self.shown_at);
        if elapsed < timings.thank_you_after() {
            Some(ConfirmationPhase::Sent)
        } else if elapsed < timings.thank_you_after() + timings.clear_after() {
            Some(ConfirmationPhase::ThankYou)
        } else {
            None
        }
    }
}
