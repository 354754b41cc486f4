//! Clock primitives for session lifetime math
//!
//! Expiry in the `flugo` crates is always a computed predicate, never a
//! scheduled callback, so every component that reasons about time accepts a
//! [`Clock`] instead of reading the wall clock directly. Production code
//! wires in [`System`]; tests drive a [`TestClock`] forward by hand and
//! observe lifetime transitions without waiting.

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_must_use
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{
    fmt,
    ops::{Add, Sub},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unix time
///
/// The number of whole seconds elapsed since the beginning of the Unix
/// epoch on 1970/01/01 at 00:00:00 UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UnixTime(pub u64);

impl From<SystemTime> for UnixTime {
    #[inline]
    fn from(t: SystemTime) -> Self {
        let time = t
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("times before the Unix epoch are not expected")
            .as_secs();

        UnixTime(time)
    }
}

impl Add<DurationSecs> for UnixTime {
    type Output = UnixTime;

    #[inline]
    fn add(self, rhs: DurationSecs) -> UnixTime {
        UnixTime(self.0 + rhs.0)
    }
}

// Subtraction requires the callers to have compared the operands first;
// taking a later time from an earlier one underflows like the raw integer
// arithmetic it is.
impl Sub<UnixTime> for UnixTime {
    type Output = DurationSecs;

    #[inline]
    fn sub(self, rhs: UnixTime) -> DurationSecs {
        DurationSecs(self.0 - rhs.0)
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for UnixTime {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for UnixTime {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = u64::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// A duration measured in whole seconds
///
/// Platform session lifetimes are reported and cached with second
/// granularity, so this is the unit all lifetime math is done in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DurationSecs(pub u64);

impl From<DurationSecs> for Duration {
    #[inline]
    fn from(d: DurationSecs) -> Self {
        Duration::from_secs(d.0)
    }
}

impl Add<DurationSecs> for DurationSecs {
    type Output = DurationSecs;

    #[inline]
    fn add(self, rhs: DurationSecs) -> DurationSecs {
        DurationSecs(self.0 + rhs.0)
    }
}

impl fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for DurationSecs {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for DurationSecs {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = u64::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// Represents a clock, which can tell the current time
pub trait Clock {
    /// Gets the current time according to this clock
    fn now(&self) -> UnixTime;
}

/// The system clock as provided by `std::time::SystemTime`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    #[inline]
    fn now(&self) -> UnixTime {
        UnixTime::from(SystemTime::now())
    }
}

/// A hand-driven clock for tests
///
/// Clones share one underlying instant: a manager and the store it was
/// wired with keep observing the same time as the test advances it.
#[derive(Clone, Debug, Default)]
pub struct TestClock(Arc<AtomicU64>);

impl Clock for TestClock {
    #[inline]
    fn now(&self) -> UnixTime {
        UnixTime(self.0.load(Ordering::Relaxed))
    }
}

impl TestClock {
    /// Creates a new test clock reading the specified time
    pub fn new(time: UnixTime) -> Self {
        Self(Arc::new(AtomicU64::new(time.0)))
    }

    /// Moves the clock to `val`
    pub fn set(&self, val: UnixTime) {
        self.0.store(val.0, Ordering::Relaxed);
    }

    /// Advances the clock by `secs` seconds
    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_duration_moves_time_forward() {
        assert_eq!(UnixTime(100) + DurationSecs(20), UnixTime(120));
    }

    #[test]
    fn subtracting_times_yields_the_span_between_them() {
        assert_eq!(UnixTime(120) - UnixTime(100), DurationSecs(20));
    }

    #[test]
    fn test_clock_clones_share_their_instant() {
        let clock = TestClock::new(UnixTime(1_000));
        let other = clock.clone();

        clock.advance(250);

        assert_eq!(other.now(), UnixTime(1_250));

        other.set(UnixTime(5_000));
        assert_eq!(clock.now(), UnixTime(5_000));
    }

    #[test]
    fn durations_convert_to_std() {
        let d: Duration = DurationSecs(90).into();
        assert_eq!(d, Duration::from_secs(90));
    }
}
