// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open intervals over instants or civil day numbers.
//!
//! - [`Interval<T>`]: generic `[start, end)` interval over any [`TimeInstant`]
//! - [`Period<S>`]: scale-based alias for `Interval<Time<S>>`
//! - [`DaySpan`]: interval of civil Julian Day Numbers
//!
//! Every calendar boundary in the crate (lunar months, pillar months,
//! civil days) is expressed with these types so that the
//! start-inclusive / end-exclusive convention is fixed in one place.

use super::{Time, TimeInstant};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the half-open interval `[start, end)` between two instants.
///
/// # Examples
///
/// ```
/// use bazi::{Interval, JulianDate};
///
/// let start = JulianDate::new(2451545.0);
/// let end = JulianDate::new(2451546.0);
/// let period = Interval::new(start, end);
/// assert!(period.contains(&start));
/// assert!(!period.contains(&end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Time-scale period alias: `Period<UT>`, `Period<JD>`.
pub type Period<S> = Interval<Time<S>>;

/// Interval of civil days, by Julian Day Number.
pub type DaySpan = Interval<i64>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration of the interval.
    ///
    /// ```
    /// use bazi::DaySpan;
    ///
    /// let month = DaySpan::new(2_451_550, 2_451_580);
    /// assert_eq!(month.duration(), 30);
    /// ```
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// `true` when `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: &T) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::UT;
    use qtty::Days;

    #[test]
    fn test_period_duration_and_contains() {
        let start = Time::<UT>::new(2_451_545.0);
        let period = Period::new(start, start + Days::new(29.5));
        assert_eq!(period.duration(), Days::new(29.5));
        assert!(period.contains(&(start + Days::new(10.0))));
        assert!(!period.contains(&(start - Days::new(1e-6))));
    }

    #[test]
    fn test_day_span_is_half_open() {
        let month = DaySpan::new(100, 130);
        assert!(month.contains(&100));
        assert!(month.contains(&129));
        assert!(!month.contains(&130));
    }

    #[test]
    fn test_display() {
        assert_eq!(DaySpan::new(1, 2).to_string(), "1 to 2");
    }
}
