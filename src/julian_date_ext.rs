// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scale-specific extensions: ephemeris epochs on `Time<JD>` and the
//! civil-clock mapping on `Time<UT>`.

use chrono::{FixedOffset, NaiveDate};
use qtty::*;

use super::instant::Time;
use super::scales::{JD, UT};

/// Milliseconds in a civil day.
pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

/// Julian Day Number of 0000-12-31 (chrono counts 0001-01-01 as day 1).
const JDN_OF_CE_DAY_ZERO: i64 = 1_721_425;

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT  (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// One Julian millennium expressed in days.
    pub const JULIAN_MILLENNIUM: Days = Days::new(365_250.0);

    /// Julian millennia since J2000.0 (argument of the VSOP87 series).
    #[inline]
    pub fn julian_millennias(&self) -> Millennia {
        Millennia::new(
            ((*self - Self::J2000) / Self::JULIAN_MILLENNIUM)
                .simplify()
                .value(),
        )
    }

    /// Julian centuries since J2000.0 (argument of the lunar series and
    /// nutation).
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        Centuries::new(
            ((*self - Self::J2000) / Self::JULIAN_CENTURY)
                .simplify()
                .value(),
        )
    }
}

impl Time<UT> {
    /// Build an instant from a civil day and clock reading.
    ///
    /// `jdn` is the Julian Day Number of the local calendar date,
    /// `millis_of_day` the clock reading after local midnight, and
    /// `offset` how far the local clock runs ahead of UT.
    pub fn from_civil(jdn: i64, millis_of_day: i64, offset: FixedOffset) -> Self {
        let local = jdn * MILLIS_PER_DAY + millis_of_day;
        let ut = local - offset_millis(offset);
        Self::new(ut as f64 / MILLIS_PER_DAY as f64 - 0.5)
    }

    /// Milliseconds since local midnight of JD 0 on the `offset` clock.
    ///
    /// Rounding to the millisecond absorbs floating-point noise, so an
    /// instant built by [`from_civil`](Self::from_civil) maps back to
    /// exactly the same civil day and clock reading.
    pub fn civil_millis(&self, offset: FixedOffset) -> i64 {
        ((self.value() + 0.5) * MILLIS_PER_DAY as f64).round() as i64 + offset_millis(offset)
    }

    /// Julian Day Number of the civil date this instant falls on.
    ///
    /// Days are half-open: local midnight belongs to the day it starts.
    pub fn civil_day(&self, offset: FixedOffset) -> i64 {
        self.civil_millis(offset).div_euclid(MILLIS_PER_DAY)
    }

    /// Whole minutes after local midnight.
    pub fn civil_minute(&self, offset: FixedOffset) -> u32 {
        (self.civil_millis(offset).rem_euclid(MILLIS_PER_DAY) / 60_000) as u32
    }
}

#[inline]
fn offset_millis(offset: FixedOffset) -> i64 {
    offset.local_minus_utc() as i64 * 1_000
}

/// Julian Day Number of a Gregorian calendar date.
pub fn jdn_from_date(date: NaiveDate) -> i64 {
    use chrono::Datelike;
    date.num_days_from_ce() as i64 + JDN_OF_CE_DAY_ZERO
}

/// Gregorian calendar date of a Julian Day Number.
pub fn date_from_jdn(jdn: i64) -> Option<NaiveDate> {
    let days = i32::try_from(jdn - JDN_OF_CE_DAY_ZERO).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}
