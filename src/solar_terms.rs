// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The 24 solar terms (jieqi) and the engine that locates them.
//!
//! Term *i* begins when the apparent solar longitude reaches
//! `(315 + 15 i) mod 360` degrees. Even-indexed terms are the sectional
//! terms (jie) that open the pillar months; odd-indexed terms sit on
//! multiples of 30° and are the principal terms (zhongqi) that decide the
//! lunar leap month.

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use qtty::Days;
use tracing::{debug, trace};

use crate::cache::ReadThroughCache;
use crate::error::{BaziError, Result};
use crate::julian_date_ext::{date_from_jdn, jdn_from_date};
use crate::scales::{JD, UT};
use crate::search::{bracket_root, normalize_to_pm180};
use crate::{solar, Instant, JulianDate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Years the engine computes terms for. Wider than the public civil
/// window so that look-back and look-ahead around its edges succeed.
pub const ENGINE_YEARS: RangeInclusive<i32> = 1890..=2110;

/// Mean spacing of consecutive terms, a tropical year over 24.
const MEAN_TERM_SPACING: f64 = 365.242_189 / 24.0;

/// Search half-width around the mean-motion guess.
const TERM_BRACKET: Days = Days::new(5.0);

/// The 24 solar terms, 15° of solar longitude apart, from Start of Spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolarTerm {
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
    SpringEquinox,
    ClearAndBright,
    GrainRain,
    StartOfSummer,
    GrainBuds,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
    MinorCold,
    MajorCold,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::StartOfSpring,
        SolarTerm::RainWater,
        SolarTerm::AwakeningOfInsects,
        SolarTerm::SpringEquinox,
        SolarTerm::ClearAndBright,
        SolarTerm::GrainRain,
        SolarTerm::StartOfSummer,
        SolarTerm::GrainBuds,
        SolarTerm::GrainInEar,
        SolarTerm::SummerSolstice,
        SolarTerm::MinorHeat,
        SolarTerm::MajorHeat,
        SolarTerm::StartOfAutumn,
        SolarTerm::EndOfHeat,
        SolarTerm::WhiteDew,
        SolarTerm::AutumnEquinox,
        SolarTerm::ColdDew,
        SolarTerm::FrostDescent,
        SolarTerm::StartOfWinter,
        SolarTerm::MinorSnow,
        SolarTerm::MajorSnow,
        SolarTerm::WinterSolstice,
        SolarTerm::MinorCold,
        SolarTerm::MajorCold,
    ];

    /// Position in the year, 0 = Start of Spring.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Apparent solar longitude at which the term begins, degrees.
    #[inline]
    pub fn longitude(self) -> f64 {
        ((315 + 15 * self.index()) % 360) as f64
    }

    /// Principal term (zhongqi): longitude is a multiple of 30°.
    #[inline]
    pub const fn is_principal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Sectional term (jie): opens a pillar month.
    #[inline]
    pub const fn is_sectional(self) -> bool {
        !self.is_principal()
    }

    pub const fn name(self) -> &'static str {
        match self {
            SolarTerm::StartOfSpring => "Start of Spring",
            SolarTerm::RainWater => "Rain Water",
            SolarTerm::AwakeningOfInsects => "Awakening of Insects",
            SolarTerm::SpringEquinox => "Spring Equinox",
            SolarTerm::ClearAndBright => "Clear and Bright",
            SolarTerm::GrainRain => "Grain Rain",
            SolarTerm::StartOfSummer => "Start of Summer",
            SolarTerm::GrainBuds => "Grain Buds",
            SolarTerm::GrainInEar => "Grain in Ear",
            SolarTerm::SummerSolstice => "Summer Solstice",
            SolarTerm::MinorHeat => "Minor Heat",
            SolarTerm::MajorHeat => "Major Heat",
            SolarTerm::StartOfAutumn => "Start of Autumn",
            SolarTerm::EndOfHeat => "End of Heat",
            SolarTerm::WhiteDew => "White Dew",
            SolarTerm::AutumnEquinox => "Autumn Equinox",
            SolarTerm::ColdDew => "Cold Dew",
            SolarTerm::FrostDescent => "Frost's Descent",
            SolarTerm::StartOfWinter => "Start of Winter",
            SolarTerm::MinorSnow => "Minor Snow",
            SolarTerm::MajorSnow => "Major Snow",
            SolarTerm::WinterSolstice => "Winter Solstice",
            SolarTerm::MinorCold => "Minor Cold",
            SolarTerm::MajorCold => "Major Cold",
        }
    }

    /// e.g. `立春`.
    pub fn chinese(self) -> &'static str {
        crate::fmt::solar_term(self)
    }
}

/// The instant a term begins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolarTermBoundary {
    pub term: SolarTerm,
    pub instant: Instant,
}

/// A jie-delimited month: the span from one sectional term to the next.
///
/// `ordinal` 1 is the Yin (寅) month opened by Start of Spring and 12 the
/// Chou (丑) month opened by Minor Cold. `year` is the Start-of-Spring
/// year the month belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarMonth {
    pub year: i32,
    pub ordinal: u32,
    pub start: Instant,
}

/// Boundaries of one Start-of-Spring year, memoized by year.
pub type TermCache = ReadThroughCache<i32, [SolarTermBoundary; 24]>;

/// Locates solar-term boundaries and answers "which term is in force".
#[derive(Debug, Clone, Default)]
pub struct SolarTermEngine {
    cache: Arc<TermCache>,
}

impl SolarTermEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine backed by a caller-owned cache.
    pub fn with_cache(cache: Arc<TermCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<TermCache> {
        &self.cache
    }

    /// Apparent solar longitude at `instant`, degrees in `[0, 360)`.
    pub fn longitude_at(&self, instant: Instant) -> f64 {
        solar::apparent_longitude(instant.to::<JD>())
    }

    /// The 24 boundaries from Start of Spring of `year` to Major Cold of
    /// `year + 1`, strictly increasing.
    pub fn term_boundaries_for_year(&self, year: i32) -> Result<Arc<[SolarTermBoundary; 24]>> {
        if !ENGINE_YEARS.contains(&year) {
            return Err(BaziError::out_of_range(year, &ENGINE_YEARS));
        }
        self.cache.get_or_try_insert_with(year, || compute_year(year))
    }

    /// Start instant of `term` in the Start-of-Spring year `year`.
    pub fn boundary(&self, year: i32, term: SolarTerm) -> Result<Instant> {
        Ok(self.term_boundaries_for_year(year)?[term.index()].instant)
    }

    /// The term in force at `instant` (the last boundary at or before
    /// it), together with its Start-of-Spring year.
    pub fn term_at(&self, instant: Instant) -> Result<(i32, SolarTermBoundary)> {
        let year = approximate_year(instant)?;
        for y in [year, year - 1] {
            let boundaries = self.term_boundaries_for_year(y)?;
            if let Some(found) = boundaries.iter().rev().find(|b| b.instant <= instant) {
                return Ok((y, *found));
            }
        }
        Err(BaziError::invalid_input(format!("no solar term in force at {instant}")))
    }

    /// The jie-delimited month containing `instant`.
    pub fn solar_month_at(&self, instant: Instant) -> Result<SolarMonth> {
        let (year, current) = self.term_at(instant)?;
        let opening = current.term.index() / 2 * 2;
        let start = self.term_boundaries_for_year(year)?[opening].instant;
        Ok(SolarMonth {
            year,
            ordinal: (opening / 2 + 1) as u32,
            start,
        })
    }
}

/// Year of the UT calendar date of `instant`; only used to pick candidate
/// term years, so the civil offset does not matter.
fn approximate_year(instant: Instant) -> Result<i32> {
    let jdn = (instant.value() + 0.5).floor() as i64;
    date_from_jdn(jdn)
        .map(|d| d.year())
        .ok_or_else(|| BaziError::invalid_input(format!("{instant} has no calendar date")))
}

fn compute_year(year: i32) -> Result<[SolarTermBoundary; 24]> {
    let anchor = NaiveDate::from_ymd_opt(year, 2, 4)
        .ok_or_else(|| BaziError::invalid_input(format!("year {year} has no February 4th")))?;
    let first_guess = JulianDate::new(jdn_from_date(anchor) as f64);

    let mut out = [SolarTermBoundary {
        term: SolarTerm::StartOfSpring,
        instant: Instant::new(0.0),
    }; 24];
    for (slot, term) in out.iter_mut().zip(SolarTerm::ALL) {
        let target = term.longitude();
        let guess = first_guess + Days::new(MEAN_TERM_SPACING * term.index() as f64);
        let root = bracket_root(term.name(), guess, TERM_BRACKET, |jd| {
            normalize_to_pm180(solar::apparent_longitude(jd) - target)
        })?;
        let instant = root.to::<UT>();
        trace!(year, term = term.name(), jd_ut = instant.value(), "solar term located");
        *slot = SolarTermBoundary { term, instant };
    }
    debug!(year, "computed solar term boundaries");
    Ok(out)
}
