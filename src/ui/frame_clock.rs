//! Wall-clock pacing for indicator animations.
//!
//! The status loop wakes for endpoint events as well as for frame ticks.
//! Animations are advanced by the time that really passed since the last
//! pass, whatever woke it, so a steady stream of events cannot hold a
//! motion in place.

/// Measures the time between successive status passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    last_ms: Option<u64>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last_ms: None }
    }

    /// Milliseconds since the previous call. The first call only starts
    /// the clock and returns 0. A timestamp older than the previous one
    /// also yields 0.
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let elapsed = match self.last_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_ms = Some(now_ms);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}
