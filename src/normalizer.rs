// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil date and clock time → [`Instant`].
//!
//! The configured UTC offset is applied exactly once, here. Everything
//! downstream works on the UT axis and maps back to the same civil clock
//! through [`TimeNormalizer::civil_day`] and [`TimeNormalizer::civil_minute`].

use std::ops::RangeInclusive;

use chrono::{FixedOffset, NaiveDate, NaiveTime, Timelike};

use crate::config::BaziConfig;
use crate::error::{BaziError, Result};
use crate::julian_date_ext::{date_from_jdn, jdn_from_date};
use crate::Instant;

/// Civil years the normalizer accepts.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

/// Clock time assumed when the birth time is unknown.
pub const DEFAULT_BIRTH_TIME: (u32, u32) = (12, 0);

/// A birth moment after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBirth {
    /// The moment on the UT axis.
    pub instant: Instant,
    /// Civil date on the configured clock.
    pub date: NaiveDate,
    /// The clock time used, the noon default when none was given.
    pub time: NaiveTime,
    /// `false` when `time` is the noon default. Noon is safe for the day
    /// pillar but says nothing about the hour pillar.
    pub time_known: bool,
}

/// Maps civil readings of one fixed-offset clock onto the UT axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeNormalizer {
    offset: FixedOffset,
}

impl TimeNormalizer {
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_config(config: &BaziConfig) -> Result<Self> {
        Ok(Self::new(config.offset()?))
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Instant of a civil date and clock time.
    ///
    /// Fails with [`BaziError::OutOfRange`] outside [`SUPPORTED_YEARS`] and
    /// with [`BaziError::InvalidInput`] for dates or times that do not
    /// exist (February 30th, 24:00, minute 60).
    ///
    /// ```
    /// use bazi::TimeNormalizer;
    /// use chrono::FixedOffset;
    ///
    /// let utc = TimeNormalizer::new(FixedOffset::east_opt(0).unwrap());
    /// let instant = utc.to_instant(2000, 1, 1, 12, 0).unwrap();
    /// assert_eq!(instant.value(), 2_451_545.0);
    /// ```
    pub fn to_instant(&self, year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Instant> {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(BaziError::out_of_range(year, &SUPPORTED_YEARS));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            BaziError::invalid_input(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| BaziError::invalid_input(format!("{hour:02}:{minute:02} is not a clock time")))?;
        Ok(self.instant_of(date, time))
    }

    /// Normalize a birth date with an optional clock time.
    ///
    /// A missing time becomes [`DEFAULT_BIRTH_TIME`] and is flagged through
    /// [`NormalizedBirth::time_known`].
    pub fn normalize(&self, date: NaiveDate, time: Option<NaiveTime>) -> Result<NormalizedBirth> {
        use chrono::Datelike;
        let (hour, minute) = time
            .map(|t| (t.hour(), t.minute()))
            .unwrap_or(DEFAULT_BIRTH_TIME);
        let instant = self.to_instant(date.year(), date.month(), date.day(), hour, minute)?;
        let used = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| BaziError::invalid_input("clock time out of range"))?;
        Ok(NormalizedBirth {
            instant,
            date,
            time: used,
            time_known: time.is_some(),
        })
    }

    /// Instant of [`DEFAULT_BIRTH_TIME`] on `date`.
    pub fn to_instant_at_noon(&self, date: NaiveDate) -> Result<Instant> {
        Ok(self.normalize(date, None)?.instant)
    }

    fn instant_of(&self, date: NaiveDate, time: NaiveTime) -> Instant {
        let millis = (time.num_seconds_from_midnight() as i64) * 1_000;
        Instant::from_civil(jdn_from_date(date), millis, self.offset)
    }

    /// Julian Day Number of the local civil date of `instant`.
    #[inline]
    pub fn civil_day(&self, instant: Instant) -> i64 {
        instant.civil_day(self.offset)
    }

    /// Minutes after local midnight.
    #[inline]
    pub fn civil_minute(&self, instant: Instant) -> u32 {
        instant.civil_minute(self.offset)
    }

    /// Local calendar date of `instant`.
    pub fn civil_date(&self, instant: Instant) -> Result<NaiveDate> {
        let jdn = self.civil_day(instant);
        date_from_jdn(jdn).ok_or_else(|| BaziError::invalid_input(format!("JDN {jdn} has no calendar date")))
    }
}
