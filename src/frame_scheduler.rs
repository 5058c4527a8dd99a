//! Outer tick cadence.
//!
//! The engine decides on its own whether a tick renders (see
//! [`AnimationEngine::tick`](crate::engine::AnimationEngine::tick)); this
//! scheduler only paces how often the loop wakes up. The caller sleeps for
//! the returned duration.

use embassy_time::{Duration, Instant};

use crate::config::DEFAULT_REFRESH_RATE;

/// Timing of the next wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// When the next tick is due.
    pub next_deadline: Instant,
    /// Time left until `next_deadline`, zero when behind schedule.
    pub sleep_duration: Duration,
}

/// Fixed-cadence pacer with drift correction.
///
/// Falling behind by more than two periods resets the schedule to `now`
/// instead of bursting through the backlog.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    next_tick: Option<Instant>,
    period: Duration,
}

impl FrameScheduler {
    pub const fn new() -> Self {
        Self::with_period(DEFAULT_REFRESH_RATE)
    }

    pub const fn with_period(period: Duration) -> Self {
        Self {
            next_tick: None,
            period,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Account for a tick at `now` and compute the next deadline.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.period + self.period;
        let scheduled = match self.next_tick {
            Some(deadline) if now.saturating_duration_since(deadline) <= max_drift => deadline,
            _ => now,
        };

        let next_deadline = scheduled + self.period;
        self.next_tick = Some(next_deadline);

        FrameResult {
            next_deadline,
            sleep_duration: next_deadline.saturating_duration_since(now),
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
