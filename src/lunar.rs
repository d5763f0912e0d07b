// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunisolar calendar: new moons, the winter-solstice year and leap months.
//!
//! A *sui* runs from the month containing one winter solstice (month 11)
//! to the month containing the next. Sui `Y` starts in December of `Y-1`.
//! When it holds 13 months, the first month without a principal term is
//! the leap month and repeats the number of the month before it.
//!
//! Every decision is taken on civil days of the configured clock, so a
//! new moon and a term falling on the same local date count as the same
//! day regardless of their order within it.

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{Datelike, FixedOffset};
use qtty::Days;
use tracing::{debug, trace};

use crate::cache::ReadThroughCache;
use crate::error::{BaziError, Result};
use crate::julian_date_ext::date_from_jdn;
use crate::period::DaySpan;
use crate::scales::{JD, UT};
use crate::search::{bracket_root, normalize_to_pm180};
use crate::solar_terms::{SolarTerm, SolarTermEngine, ENGINE_YEARS};
use crate::{fmt, moon, solar, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search half-width around the mean new moon.
const NEW_MOON_BRACKET: Days = Days::new(2.0);

/// How far `resolve` may walk from the civil year's sui.
const MAX_SUI_STEPS: usize = 3;

/// Month name: `Common(n)` for an ordinary month, `Leap(n)` for the leap
/// month that follows month `n`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Month {
    Common(u32),
    Leap(u32),
}

impl Month {
    /// Month number, leap or not.
    pub const fn num(&self) -> u32 {
        match *self {
            Month::Common(n) | Month::Leap(n) => n,
        }
    }

    pub const fn is_leap(&self) -> bool {
        matches!(self, Month::Leap(_))
    }

    /// Chinese name, e.g. `正月`, `闰六月`, `腊月`.
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

/// One lunar month: the civil days from one new moon to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarMonth {
    pub month: Month,
    /// Lunar (new-year based) year the month is counted in.
    pub year: i32,
    /// New moon opening the month.
    pub start: Instant,
    /// New moon opening the following month.
    pub end: Instant,
    /// Civil JDN of the first day.
    pub start_day: i64,
    /// 29 or 30.
    pub length: u32,
}

impl LunarMonth {
    pub fn days(&self) -> DaySpan {
        DaySpan::new(self.start_day, self.start_day + self.length as i64)
    }
}

/// Months between two winter-solstice months.
#[derive(Debug, Clone, PartialEq)]
pub struct LunarYear {
    pub sui: i32,
    /// 12 or 13 months starting with month 11 of the previous year.
    pub months: Vec<LunarMonth>,
}

impl LunarYear {
    /// The leap month, if this sui has one.
    pub fn leap_month(&self) -> Option<&LunarMonth> {
        self.months.iter().find(|m| m.month.is_leap())
    }

    /// Civil days covered, from month 11 to the next month 11 (exclusive).
    pub fn days(&self) -> DaySpan {
        let start = self.months.first().map_or(0, |m| m.start_day);
        let end = self.months.last().map_or(0, |m| m.start_day + m.length as i64);
        DaySpan::new(start, end)
    }

    /// Month and 1-based day ordinal of civil day `jdn`.
    pub fn month_for_day(&self, jdn: i64) -> Option<(&LunarMonth, u32)> {
        let month = self.months.iter().find(|m| m.days().contains(&jdn))?;
        let ordinal = (jdn - month.start_day + 1).clamp(1, month.length as i64) as u32;
        Some((month, ordinal))
    }
}

/// A date on the lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", fmt::lunar_date(self))
    }
}

/// Lunar years memoized by sui.
pub type LunarYearCache = ReadThroughCache<i32, LunarYear>;

/// Builds lunar years from computed new moons and solar terms.
#[derive(Debug, Clone)]
pub struct LunarCalendarResolver {
    terms: SolarTermEngine,
    offset: FixedOffset,
    cache: Arc<LunarYearCache>,
}

impl LunarCalendarResolver {
    pub fn new(terms: SolarTermEngine, offset: FixedOffset) -> Self {
        Self::with_cache(terms, offset, Arc::default())
    }

    /// Resolver backed by a caller-owned cache.
    pub fn with_cache(terms: SolarTermEngine, offset: FixedOffset, cache: Arc<LunarYearCache>) -> Self {
        Self { terms, offset, cache }
    }

    pub fn cache(&self) -> &Arc<LunarYearCache> {
        &self.cache
    }

    /// Sui numbers whose two winter solstices the term engine can compute.
    pub fn supported_sui() -> RangeInclusive<i32> {
        (*ENGINE_YEARS.start() + 1)..=*ENGINE_YEARS.end()
    }

    /// Instant of the true new moon of lunation `k`, counted from the new
    /// moon of 2000-01-06.
    pub fn new_moon(&self, k: i32) -> Result<Instant> {
        let root = bracket_root("new moon", moon::mean_new_moon(k), NEW_MOON_BRACKET, |jd| {
            normalize_to_pm180(moon::apparent_longitude(jd) - solar::apparent_longitude(jd))
        })?;
        Ok(root.to::<UT>())
    }

    /// Latest new moon at or before `instant`, with its lunation number.
    pub fn new_moon_on_or_before(&self, instant: Instant) -> Result<(i32, Instant)> {
        let mut k = moon::nearest_lunation(instant.to::<JD>()) + 1;
        loop {
            let nm = self.new_moon(k)?;
            if nm <= instant {
                return Ok((k, nm));
            }
            k -= 1;
        }
    }

    /// Lunation of the last new moon whose civil day is on or before `day`.
    fn lunation_on_or_before_day(&self, anchor: Instant, day: i64) -> Result<i32> {
        let mut k = moon::nearest_lunation(anchor.to::<JD>()) + 1;
        while self.new_moon(k)?.civil_day(self.offset) > day {
            k -= 1;
        }
        Ok(k)
    }

    /// The lunar year between the winter solstices of `sui - 1` and `sui`.
    pub fn lunar_year(&self, sui: i32) -> Result<Arc<LunarYear>> {
        let range = Self::supported_sui();
        if !range.contains(&sui) {
            return Err(BaziError::out_of_range(sui, &range));
        }
        self.cache.get_or_try_insert_with(sui, || self.compute_lunar_year(sui))
    }

    fn compute_lunar_year(&self, sui: i32) -> Result<LunarYear> {
        let ws = self.terms.boundary(sui - 1, SolarTerm::WinterSolstice)?;
        let ws_next = self.terms.boundary(sui, SolarTerm::WinterSolstice)?;
        let first = self.lunation_on_or_before_day(ws, ws.civil_day(self.offset))?;
        let last = self.lunation_on_or_before_day(ws_next, ws_next.civil_day(self.offset))?;

        let count = last - first;
        let mut needs_leap = match count {
            12 => false,
            13 => true,
            _ => {
                return Err(BaziError::invalid_input(format!(
                    "{count} months between the winter solstices of {} and {sui}",
                    sui - 1
                )))
            }
        };

        let new_moons = (first..=last)
            .map(|k| self.new_moon(k))
            .collect::<Result<Vec<_>>>()?;
        let principal_days = self.principal_term_days(sui)?;

        let mut months = Vec::with_capacity(count as usize);
        let mut number = 10;
        for pair in new_moons.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let start_day = start.civil_day(self.offset);
            let end_day = end.civil_day(self.offset);
            let span = DaySpan::new(start_day, end_day);

            let month = if needs_leap && !principal_days.iter().any(|d| span.contains(d)) {
                needs_leap = false;
                Month::Leap(number)
            } else {
                number = number % 12 + 1;
                Month::Common(number)
            };
            let year = if month.num() >= 11 { sui - 1 } else { sui };
            trace!(sui, ?month, start_day, "lunar month");
            months.push(LunarMonth {
                month,
                year,
                start,
                end,
                start_day,
                length: (end_day - start_day) as u32,
            });
        }
        if needs_leap {
            return Err(BaziError::invalid_input(format!(
                "sui {sui} has 13 months but every month holds a principal term"
            )));
        }
        let leap = months.iter().find(|m| m.month.is_leap()).map(|m| m.month);
        debug!(sui, months = months.len(), ?leap, "computed lunar year");
        Ok(LunarYear { sui, months })
    }

    /// Civil days of the principal terms from the winter solstice of
    /// `sui - 1` through the one of `sui`.
    fn principal_term_days(&self, sui: i32) -> Result<Vec<i64>> {
        let previous = self.terms.term_boundaries_for_year(sui - 1)?;
        let current = self.terms.term_boundaries_for_year(sui)?;
        let tail = &previous[SolarTerm::WinterSolstice.index()..];
        let head = &current[..=SolarTerm::WinterSolstice.index()];
        Ok(tail
            .iter()
            .chain(head)
            .filter(|b| b.term.is_principal())
            .map(|b| b.instant.civil_day(self.offset))
            .collect())
    }

    /// Lunar month containing `instant` and the day's ordinal in it.
    pub fn resolve(&self, instant: Instant) -> Result<(LunarMonth, u32)> {
        let day = instant.civil_day(self.offset);
        let mut sui = date_from_jdn(day)
            .map(|d| d.year())
            .ok_or_else(|| BaziError::invalid_input(format!("{instant} has no calendar date")))?;

        for _ in 0..=MAX_SUI_STEPS {
            let year = self.lunar_year(sui)?;
            let span = year.days();
            if day < span.start {
                sui -= 1;
            } else if day >= span.end {
                sui += 1;
            } else {
                return year
                    .month_for_day(day)
                    .map(|(m, d)| (*m, d))
                    .ok_or_else(|| BaziError::invalid_input(format!("day {day} falls between months")));
            }
        }
        Err(BaziError::invalid_input(format!("no lunar year contains civil day {day}")))
    }

    /// Lunar date of `instant`.
    pub fn lunar_date(&self, instant: Instant) -> Result<LunarDate> {
        let (month, day) = self.resolve(instant)?;
        Ok(LunarDate {
            year: month.year,
            month: month.month,
            day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian_date_ext::jdn_from_date;
    use chrono::NaiveDate;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn resolver() -> LunarCalendarResolver {
        LunarCalendarResolver::new(SolarTermEngine::new(), cst())
    }

    fn day(s: &str) -> i64 {
        jdn_from_date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn noon(s: &str) -> Instant {
        Instant::from_civil(day(s), 12 * 3_600_000, cst())
    }

    fn check_months(sui: i32, expected: &[(i32, &str)]) {
        let year = resolver().lunar_year(sui).unwrap();
        let mut starts: Vec<_> = year.months.iter().map(|m| (m.month, m.start_day)).collect();
        let end = year.days().end;
        starts.push((Month::Common(11), end));
        let expected: Vec<_> = expected
            .iter()
            .map(|&(n, s)| {
                let month = if n > 0 {
                    Month::Common(n as u32)
                } else {
                    Month::Leap(-n as u32)
                };
                (month, day(s))
            })
            .collect();
        assert_eq!(starts, expected);
    }

    #[test]
    fn new_moon_of_epoch_lunation() {
        // 2000-01-06 18:14 UT
        let nm = resolver().new_moon(0).unwrap();
        assert!((nm.value() - 2_451_550.259).abs() < 0.005, "{nm}");
    }

    #[test]
    fn new_moon_on_or_before_brackets_instant() {
        let r = resolver();
        let instant = noon("2017-07-30");
        let (k, nm) = r.new_moon_on_or_before(instant).unwrap();
        assert!(nm <= instant);
        assert!(r.new_moon(k + 1).unwrap() > instant);
        assert_eq!(nm.civil_day(cst()), day("2017-07-23"));
    }

    #[test]
    fn months_of_2000() {
        check_months(
            2000,
            &[
                (11, "1999-12-08"),
                (12, "2000-01-07"),
                (1, "2000-02-05"),
                (2, "2000-03-06"),
                (3, "2000-04-05"),
                (4, "2000-05-04"),
                (5, "2000-06-02"),
                (6, "2000-07-02"),
                (7, "2000-07-31"),
                (8, "2000-08-29"),
                (9, "2000-09-28"),
                (10, "2000-10-27"),
                (11, "2000-11-26"),
            ],
        );
    }

    #[test]
    fn leap_sixth_month_of_2017() {
        check_months(
            2017,
            &[
                (11, "2016-11-29"),
                (12, "2016-12-29"),
                (1, "2017-01-28"),
                (2, "2017-02-26"),
                (3, "2017-03-28"),
                (4, "2017-04-26"),
                (5, "2017-05-26"),
                (6, "2017-06-24"),
                (-6, "2017-07-23"),
                (7, "2017-08-22"),
                (8, "2017-09-20"),
                (9, "2017-10-20"),
                (10, "2017-11-18"),
                (11, "2017-12-18"),
            ],
        );
    }

    #[test]
    fn other_leap_months() {
        let r = resolver();
        let leap = r.lunar_year(2020).unwrap().leap_month().copied().unwrap();
        assert_eq!((leap.month, leap.start_day), (Month::Leap(4), day("2020-05-23")));
        let leap = r.lunar_year(2023).unwrap().leap_month().copied().unwrap();
        assert_eq!((leap.month, leap.start_day), (Month::Leap(2), day("2023-03-22")));
        assert!(r.lunar_year(2000).unwrap().leap_month().is_none());
    }

    #[test]
    fn resolves_dates() {
        let r = resolver();
        let cases = [
            ("2016-11-29", 2016, Month::Common(11), 1),
            ("2017-01-27", 2016, Month::Common(12), 30),
            ("2017-01-28", 2017, Month::Common(1), 1),
            ("2017-07-22", 2017, Month::Common(6), 29),
            ("2017-07-23", 2017, Month::Leap(6), 1),
            ("2017-12-17", 2017, Month::Common(10), 30),
            ("2017-12-18", 2017, Month::Common(11), 1),
            ("2000-01-01", 1999, Month::Common(11), 25),
            ("1999-12-31", 1999, Month::Common(11), 24),
        ];
        for (date, year, month, d) in cases {
            assert_eq!(
                r.lunar_date(noon(date)).unwrap(),
                LunarDate { year, month, day: d },
                "{date}"
            );
        }
    }

    #[test]
    fn day_boundary_is_local_midnight() {
        let r = resolver();
        let midnight = Instant::from_civil(day("2017-07-23"), 0, cst());
        assert_eq!(r.lunar_date(midnight).unwrap().month, Month::Leap(6));
        let just_before = Instant::from_civil(day("2017-07-22"), 86_399_000, cst());
        assert_eq!(
            r.lunar_date(just_before).unwrap(),
            LunarDate {
                year: 2017,
                month: Month::Common(6),
                day: 29
            }
        );
    }

    #[test]
    fn every_year_has_at_most_one_leap_month() {
        let r = resolver();
        for sui in 1901..=2100 {
            let year = r.lunar_year(sui).unwrap();
            let leaps = year.months.iter().filter(|m| m.month.is_leap()).count();
            assert!(leaps <= 1, "sui {sui}");
            assert_eq!(year.months.len() == 13, leaps == 1, "sui {sui}");
            assert_eq!(year.months[0].month, Month::Common(11));
            for pair in year.months.windows(2) {
                assert_eq!(pair[0].days().end, pair[1].start_day, "sui {sui}");
            }
            assert!(year.months.iter().all(|m| m.length == 29 || m.length == 30));
        }
    }

    #[test]
    fn warm_and_cold_caches_agree() {
        let warm = resolver();
        let instant = noon("1984-02-02");
        let first = warm.resolve(instant).unwrap();
        let again = warm.resolve(instant).unwrap();
        let cold = resolver().resolve(instant).unwrap();
        assert_eq!(first, again);
        assert_eq!(first, cold);
        assert_eq!(first.0.start.value().to_bits(), cold.0.start.value().to_bits());
        assert_eq!(first.0.month, Month::Common(1));
        assert_eq!(first.1, 1);
    }

    #[test]
    fn sui_outside_window() {
        assert!(matches!(
            resolver().lunar_year(1890),
            Err(BaziError::OutOfRange { year: 1890, .. })
        ));
    }
}
