//! Wall-clock source for the game store.
//!
//! Every timestamp the store writes (log entries, `last_save`) and the
//! offline catch-up computation read the time through a [`Clock`], so tests
//! can pin and advance time explicitly with [`ManualClock`].

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

/// A source of the current UTC time.
pub trait Clock {
    /// Return the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move forward by `delta`. Saturates instead of overflowing.
    pub fn advance(&self, delta: TimeDelta) {
        let current = self.now.get();
        self.now
            .set(current.checked_add_signed(delta).unwrap_or(current));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Exact elapsed seconds between two instants, at millisecond resolution.
///
/// Negative spans (the clock went backwards) count as zero.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    let millis = to.signed_duration_since(from).num_milliseconds().max(0);
    Decimal::new(millis, 3)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(epoch());
        assert_eq!(clock.now(), epoch());
        clock.advance(TimeDelta::seconds(90));
        assert_eq!(elapsed_seconds(epoch(), clock.now()), dec!(90));
    }

    #[test]
    fn manual_clock_set() {
        let clock = ManualClock::new(epoch());
        let later = epoch() + TimeDelta::hours(3);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn elapsed_is_exact_to_the_millisecond() {
        let later = epoch() + TimeDelta::milliseconds(10_001);
        assert_eq!(elapsed_seconds(epoch(), later), dec!(10.001));
    }

    #[test]
    fn elapsed_never_negative() {
        let earlier = epoch() - TimeDelta::seconds(5);
        assert_eq!(elapsed_seconds(epoch(), earlier), Decimal::ZERO);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
