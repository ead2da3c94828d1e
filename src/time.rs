//! Time abstraction traits for platform-agnostic, wraparound-safe timing.
//!
//! The engine only ever needs three primitives from a clock: read the current
//! instant, add a duration to an instant, and ask whether one instant comes
//! before another. [`TimeInstant`] expresses the last two with modular
//! semantics so a free-running millisecond counter may wrap without breaking
//! any comparison.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// Implementations backed by a wrapping counter must keep `is_before` correct
/// across the wrap, typically by comparing the signed difference of the two
/// raw values (valid while both instants are within half a period).
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Adds a duration, wrapping at the counter's period.
    fn wrapping_add(self, duration: Self::Duration) -> Self;

    /// Returns true if `self` is strictly earlier than `other`.
    fn is_before(&self, other: Self) -> bool;

    /// Time left until `later`, or ZERO if `later` is not in the future.
    fn duration_until(&self, later: Self) -> Self::Duration;
}

/// Millisecond duration paired with [`Ticks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickDuration(pub u32);

impl TimeDuration for TickDuration {
    const ZERO: Self = TickDuration(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        // Anything beyond half the tick period cannot be compared safely anyway.
        TickDuration(millis.min((Ticks::HALF_PERIOD - 1) as u64) as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TickDuration(self.0.saturating_sub(other.0))
    }
}

/// A free-running 32-bit millisecond counter that wraps after ~49.7 days.
///
/// Ordering follows the half-range rule: `a` is before `b` when the wrapped
/// difference `a - b`, read as a signed value, is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    const HALF_PERIOD: u32 = 1 << 31;

    /// Returns the raw counter value.
    pub fn as_millis(&self) -> u32 {
        self.0
    }

    fn diff(&self, other: Ticks) -> i32 {
        self.0.wrapping_sub(other.0) as i32
    }
}

impl TimeInstant for Ticks {
    type Duration = TickDuration;

    fn wrapping_add(self, duration: Self::Duration) -> Self {
        Ticks(self.0.wrapping_add(duration.0))
    }

    fn is_before(&self, other: Self) -> bool {
        self.diff(other) < 0
    }

    fn duration_until(&self, later: Self) -> Self::Duration {
        let diff = later.diff(*self);
        if diff > 0 {
            TickDuration(diff as u32)
        } else {
            TickDuration::ZERO
        }
    }
}
