//! Explicit countdown state
//!
//! Every deferred continuation in the game (stun recovery, reload, teleport
//! fade phases, patrol waits, cover exposure, rotation sessions) is a value
//! of one of these types stored on its owner and stepped on the fixed tick.
//! Owners keep them in an `Option` so that "at most one timer per concern"
//! is enforced by the type: starting a new one replaces the old one.

/// One-shot countdown
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    /// Create a countdown that finishes after `duration` seconds
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advance by `delta_time`. Returns true on the tick the countdown
    /// reaches zero; later ticks return false.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            return true;
        }
        false
    }

    /// Whether the countdown has run out
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Seconds left
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Configured duration
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Elapsed fraction in `[0, 1]`. A zero-length countdown reports 1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    /// Start over from the full duration
    pub fn restart(&mut self) {
        self.remaining = self.duration;
    }
}

/// Recurring interval timer
///
/// Fires every `interval` seconds. The first fire happens after
/// `initial_delay`, which lets callers fire immediately on the first tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Repeating {
    interval: f32,
    until_next: f32,
}

impl Repeating {
    /// Create a repeating timer
    pub fn new(interval: f32, initial_delay: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            until_next: initial_delay.max(0.0),
        }
    }

    /// Advance by `delta_time` and return how many times the timer fired.
    pub fn tick(&mut self, delta_time: f32) -> u32 {
        self.until_next -= delta_time;
        let mut fired = 0;
        while self.until_next <= 0.0 {
            fired += 1;
            self.until_next += self.interval;
        }
        fired
    }

    /// Configured interval
    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Push the next fire back to a full interval from now
    pub fn reset(&mut self) {
        self.until_next = self.interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut timer = Countdown::new(1.0);
        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.6));
        assert!(timer.is_finished());
        assert!(!timer.tick(0.1));
    }

    #[test]
    fn test_countdown_progress() {
        let mut timer = Countdown::new(2.0);
        timer.tick(0.5);
        assert!((timer.progress() - 0.25).abs() < 1e-6);
        timer.restart();
        assert_eq!(timer.remaining(), 2.0);
        assert_eq!(Countdown::new(0.0).progress(), 1.0);
    }

    #[test]
    fn test_repeating_counts_fires() {
        let mut timer = Repeating::new(0.25, 0.0);
        assert_eq!(timer.tick(0.0), 1);
        assert_eq!(timer.tick(0.1), 0);
        assert_eq!(timer.tick(0.6), 2);
    }

    #[test]
    fn test_repeating_reset() {
        let mut timer = Repeating::new(1.0, 0.0);
        timer.reset();
        assert_eq!(timer.tick(0.9), 0);
        assert_eq!(timer.tick(0.2), 1);
    }
}
