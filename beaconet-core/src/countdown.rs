//! Pausable level countdown.

use std::time::Duration;

/// Remaining time on the level's game clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Countdown {
    limit: Duration,
    remaining: Duration,
}

impl Countdown {
    /// Starts a countdown of `limit`.
    #[must_use]
    pub const fn new(limit: Duration) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Total length of the countdown.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    /// Time left before expiry.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Returns whether the countdown has reached zero.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Consumes `dt` of game time and reports whether this call expired the
    /// countdown. Later calls on an expired countdown return `false`.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        self.is_expired()
    }
}
