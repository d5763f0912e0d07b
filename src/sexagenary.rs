// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Heavenly stems, earthly branches and the pillar rules.
//!
//! The sixty-term cycle pairs stem `i mod 10` with branch `i mod 12`; only
//! pairs of equal parity occur. Year, month, day and hour each advance
//! the cycle by one per unit, from these anchors:
//!
//! - year: 1984 is 甲子, turning over at Start of Spring;
//! - month: 寅 month opens at Start of Spring, stem by the five-tiger rule;
//! - day: `(JDN + 49) mod 60` on the local civil calendar;
//! - hour: two-hour blocks from 23:00, stem by the five-rat rule.

use chrono::{Datelike, FixedOffset, NaiveDate};
use tracing::trace;

use crate::config::ZiHourPolicy;
use crate::error::{BaziError, Result};
use crate::julian_date_ext::date_from_jdn;
use crate::normalizer::SUPPORTED_YEARS;
use crate::solar_terms::{SolarTerm, SolarTermEngine};
use crate::wuxing::{self, Element, Polarity};
use crate::{fmt, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Year whose pillar is 甲子.
pub const JIAZI_YEAR: i32 = 1984;

/// Offset between the Julian Day Number and the day cycle.
const DAY_CYCLE_OFFSET: i64 = 49;

/// Minute at which the late Zi hour begins.
const LATE_ZI_MINUTE: u32 = 23 * 60;

/// Heavenly stems (tiangan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// 0-based position, 甲 = 0.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Stem at `index mod 10`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 10) as usize]
    }

    #[inline]
    pub const fn element(self) -> Element {
        wuxing::stem_element(self)
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        wuxing::stem_polarity(self)
    }

    pub const fn chinese(self) -> &'static str {
        fmt::STEMS[self.index() as usize]
    }
}

/// Earthly branches (dizhi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// 0-based position, 子 = 0.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Branch at `index mod 12`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    #[inline]
    pub const fn element(self) -> Element {
        wuxing::branch_element(self)
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        wuxing::branch_polarity(self)
    }

    pub const fn chinese(self) -> &'static str {
        fmt::BRANCHES[self.index() as usize]
    }
}

/// A stem–branch pair of the sixty-term cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StemBranch {
    pub stem: Stem,
    pub branch: Branch,
}

impl StemBranch {
    /// 甲子, the first term of the cycle.
    pub const JIAZI: Self = Self::from_index(0);

    /// Pair a stem and branch; `None` when their parities differ.
    pub const fn new(stem: Stem, branch: Branch) -> Option<Self> {
        if stem.index() % 2 == branch.index() % 2 {
            Some(Self { stem, branch })
        } else {
            None
        }
    }

    /// Term at `index mod 60`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        let i = index % 60;
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Position in the cycle, 0 = 甲子. The unique `i` with
    /// `i ≡ stem (mod 10)` and `i ≡ branch (mod 12)`.
    #[inline]
    pub const fn index(self) -> u8 {
        (6 * self.stem.index() as i32 - 5 * self.branch.index() as i32).rem_euclid(60) as u8
    }

    /// Step `n` terms along the cycle, either direction.
    pub fn offset(self, n: i64) -> Self {
        Self::from_index((self.index() as i64 + n).rem_euclid(60) as u8)
    }

    /// e.g. `甲子`.
    pub fn chinese(self) -> String {
        fmt::sexagenary(self)
    }
}

impl std::fmt::Display for StemBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.chinese(), self.branch.chinese())
    }
}

/// Sexagenary term of a Start-of-Spring year.
#[inline]
pub fn year_cycle(year: i32) -> StemBranch {
    StemBranch::from_index((year - JIAZI_YEAR).rem_euclid(60) as u8)
}

/// Sexagenary term of a civil day, by Julian Day Number.
#[inline]
pub fn day_cycle(jdn: i64) -> StemBranch {
    StemBranch::from_index((jdn + DAY_CYCLE_OFFSET).rem_euclid(60) as u8)
}

/// Applies the pillar rules on one civil clock.
#[derive(Debug, Clone)]
pub struct SexagenaryEngine {
    terms: SolarTermEngine,
    offset: FixedOffset,
    zi_hour: ZiHourPolicy,
}

impl SexagenaryEngine {
    pub fn new(terms: SolarTermEngine, offset: FixedOffset, zi_hour: ZiHourPolicy) -> Self {
        Self {
            terms,
            offset,
            zi_hour,
        }
    }

    pub const fn zi_hour(&self) -> ZiHourPolicy {
        self.zi_hour
    }

    /// Local civil date of `instant`, restricted to the supported years.
    fn civil_date(&self, instant: Instant) -> Result<NaiveDate> {
        let jdn = instant.civil_day(self.offset);
        let date = date_from_jdn(jdn).ok_or_else(|| BaziError::invalid_input(format!("JDN {jdn} has no date")))?;
        if !SUPPORTED_YEARS.contains(&date.year()) {
            return Err(BaziError::invalid_input(format!(
                "{date} is outside the supported years {}..={}",
                SUPPORTED_YEARS.start(),
                SUPPORTED_YEARS.end()
            )));
        }
        Ok(date)
    }

    /// Year pillar, turning over at the Start of Spring of `civil_year`.
    ///
    /// `civil_year` must be the local civil year of `instant`.
    pub fn year_pillar(&self, civil_year: i32, instant: Instant) -> Result<StemBranch> {
        let date = self.civil_date(instant)?;
        if date.year() != civil_year {
            return Err(BaziError::invalid_input(format!(
                "{date} does not fall in civil year {civil_year}"
            )));
        }
        let lichun = self.terms.boundary(civil_year, SolarTerm::StartOfSpring)?;
        let year = if instant >= lichun { civil_year } else { civil_year - 1 };
        Ok(year_cycle(year))
    }

    /// Year pillar of a lunar (new-year based) year.
    pub fn lunar_year_pillar(&self, lunar_year: i32) -> StemBranch {
        year_cycle(lunar_year)
    }

    /// Month pillar for jie-month `ordinal` (1 = 寅 month).
    ///
    /// `year_pillar` is the Start-of-Spring year pillar the month belongs
    /// to. The ordinal is checked against the month in force at `instant`.
    pub fn month_pillar(&self, ordinal: u32, year_pillar: StemBranch, instant: Instant) -> Result<StemBranch> {
        if !(1..=12).contains(&ordinal) {
            return Err(BaziError::invalid_input(format!("month ordinal {ordinal} not in 1..=12")));
        }
        self.civil_date(instant)?;
        let resolved = self.terms.solar_month_at(instant)?;
        if resolved.ordinal != ordinal {
            return Err(BaziError::invalid_input(format!(
                "month ordinal {ordinal} does not match the solar month {} in force at {instant}",
                resolved.ordinal
            )));
        }
        // 甲己之年丙作首
        let first_stem = (year_pillar.stem.index() % 5) * 2 + 2;
        let stem = Stem::from_index(first_stem + (ordinal as u8 - 1));
        let branch = Branch::from_index(ordinal as u8 + 1);
        Ok(StemBranch { stem, branch })
    }

    /// Month pillar of the solar month in force at `instant`.
    pub fn month_pillar_at(&self, instant: Instant) -> Result<StemBranch> {
        let month = self.terms.solar_month_at(instant)?;
        self.month_pillar(month.ordinal, year_cycle(month.year), instant)
    }

    /// Day pillar of the local civil day, moved to the next day from 23:00
    /// under [`ZiHourPolicy::NextDay`].
    pub fn day_pillar(&self, instant: Instant) -> Result<StemBranch> {
        self.civil_date(instant)?;
        let mut jdn = instant.civil_day(self.offset);
        if self.zi_hour == ZiHourPolicy::NextDay && instant.civil_minute(self.offset) >= LATE_ZI_MINUTE {
            jdn += 1;
        }
        Ok(day_cycle(jdn))
    }

    /// Hour pillar. `day_pillar` must be the day pillar of `instant` under
    /// this engine's policy.
    pub fn hour_pillar(&self, day_pillar: StemBranch, instant: Instant) -> Result<StemBranch> {
        let expected = self.day_pillar(instant)?;
        if expected != day_pillar {
            return Err(BaziError::invalid_input(format!(
                "day pillar {day_pillar} does not match {expected} at {instant}"
            )));
        }
        let minute = instant.civil_minute(self.offset);
        let branch = Branch::from_index((((minute / 60 + 1) / 2) % 12) as u8);
        // 23:xx opens the next day's hour sequence
        let base = if minute >= LATE_ZI_MINUTE && self.zi_hour == ZiHourPolicy::SameDay {
            day_pillar.offset(1)
        } else {
            day_pillar
        };
        // 甲己還加甲
        let stem = Stem::from_index((base.stem.index() % 5) * 2 + branch.index());
        let pillar = StemBranch { stem, branch };
        trace!(minute, day = %day_pillar, hour = %pillar, "hour pillar");
        Ok(pillar)
    }
}
