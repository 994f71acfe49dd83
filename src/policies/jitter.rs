//! # Jitter policy for the music interval.
//!
//! [`JitterPolicy`] adds randomness to how long the music plays, so players
//! cannot anticipate the moment it stops.
//!
//! - [`JitterPolicy::None`]: no randomization, the configured interval exactly
//! - [`JitterPolicy::Full`]: random interval in [0, music]
//! - [`JitterPolicy::Equal`]: music/2 + random[0, music/2]

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of the music interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Play for exactly the configured interval.
    #[default]
    None,

    /// Random interval in [0, music].
    Full,

    /// interval = music/2 + random[0, music/2].
    ///
    /// Keeps some suspense without ever cutting the music too short.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given interval.
    pub fn apply(&self, interval: Duration) -> Duration {
        match self {
            JitterPolicy::None => interval,
            JitterPolicy::Full => self.full_jitter(interval),
            JitterPolicy::Equal => self.equal_jitter(interval),
        }
    }

    /// Full jitter: random[0, interval]
    fn full_jitter(&self, interval: Duration) -> Duration {
        let ms = interval.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=ms))
    }

    /// Equal jitter: interval/2 + random[0, interval/2]
    fn equal_jitter(&self, interval: Duration) -> Duration {
        let ms = interval.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let half = ms / 2;
        let jitter = if half == 0 {
            0
        } else {
            rand::rng().random_range(0..=half)
        };
        Duration::from_millis(half + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_keeps_the_interval() {
        let d = Duration::from_millis(1500);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn full_stays_within_bounds() {
        let d = Duration::from_millis(200);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn equal_keeps_at_least_half() {
        let d = Duration::from_millis(200);
        for _ in 0..100 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(100), "{j:?} below half");
            assert!(j <= d, "{j:?} above interval");
        }
    }

    #[test]
    fn zero_interval_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }
}
