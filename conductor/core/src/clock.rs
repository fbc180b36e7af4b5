//! Render Clock
//!
//! The single authoritative time source. It is owned by the render loop and
//! read by everything else; all scheduling decisions are made against it.

use std::time::Duration;

/// Monotonic elapsed time since the render loop started
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Clock {
    elapsed: Duration,
}

impl Clock {
    /// A clock at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Current elapsed time
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in seconds, as the surface model consumes it
    #[must_use]
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Move the clock forward to `elapsed`
    ///
    /// Earlier values are ignored so the clock never runs backwards.
    /// Returns the time actually advanced.
    pub fn advance_to(&mut self, elapsed: Duration) -> Duration {
        let delta = elapsed.saturating_sub(self.elapsed);
        self.elapsed += delta;
        delta
    }
}
