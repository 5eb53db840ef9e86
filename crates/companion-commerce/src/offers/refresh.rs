//! Debounced, single-in-flight refresh of the offer list.
//!
//! The storefront's quantity control does not ask the server on every
//! keystroke. Edits are coalesced until the input has been quiet for a
//! while, and a new request is held back while one is outstanding. The
//! latest quantity is sent on the next allowed poll; nothing is queued.

use std::time::{Duration, Instant};

use crate::offers::Quantity;

/// Default quiet period before a refresh fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Client-side refresh state for one product page.
///
/// Time is passed in by the caller so the gate stays deterministic.
#[derive(Debug, Clone)]
pub struct RefreshGate {
    quiet_period: Duration,
    pending: Option<Quantity>,
    last_edit: Option<Instant>,
    in_flight: bool,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl RefreshGate {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            last_edit: None,
            in_flight: false,
        }
    }

    /// Record a quantity edit. Restarts the quiet period.
    pub fn record_edit(&mut self, quantity: Quantity, now: Instant) {
        self.pending = Some(quantity);
        self.last_edit = Some(now);
    }

    /// Quantity to request now, if any.
    ///
    /// Fires once the quiet period has elapsed since the last edit and no
    /// request is in flight. Firing marks a request as in flight.
    pub fn poll(&mut self, now: Instant) -> Option<Quantity> {
        if self.in_flight {
            return None;
        }
        let last_edit = self.last_edit?;
        if now.saturating_duration_since(last_edit) < self.quiet_period {
            return None;
        }

        let quantity = self.pending.take()?;
        self.last_edit = None;
        self.in_flight = true;
        Some(quantity)
    }

    /// The outstanding request completed (successfully or not).
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Whether the offer UI should be shown as busy.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Whether an edit is waiting to be sent.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
