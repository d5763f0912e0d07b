// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Single entry point: civil birth date and time in, four pillars out.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use tracing::{debug, trace};

use crate::config::{BaziConfig, YearPivot};
use crate::error::{BaziError, Result};
use crate::lunar::{LunarCalendarResolver, LunarDate, LunarMonth, LunarYearCache};
use crate::normalizer::TimeNormalizer;
use crate::sexagenary::{year_cycle, Branch, SexagenaryEngine, Stem, StemBranch};
use crate::solar_terms::{SolarTermEngine, TermCache};
use crate::wuxing::Element;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Whether the hour pillar comes from a given clock time or the noon
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum HourConfidence {
    Exact,
    Approximate,
}

/// A stem–branch pair with the elements of both halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pillar {
    pub stem_branch: StemBranch,
    pub stem_element: Element,
    pub branch_element: Element,
}

impl Pillar {
    pub const fn new(stem_branch: StemBranch) -> Self {
        Self {
            stem_branch,
            stem_element: stem_branch.stem.element(),
            branch_element: stem_branch.branch.element(),
        }
    }

    /// Element pair, stem first, e.g. `土火`.
    pub fn wuxing(&self) -> String {
        format!("{}{}", self.stem_element.chinese(), self.branch_element.chinese())
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.stem_branch, f)
    }
}

/// The day pillar read as the person's own element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DayMaster {
    pub stem: Stem,
    pub branch: Branch,
    pub element: Element,
}

/// Year, month, day and hour pillars of a birth moment, with its lunar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    pub hour_confidence: HourConfidence,
    pub lunar_date: LunarDate,
    pub lunar_month: LunarMonth,
    /// `YYYY-MM-DD HH:MM` on the configured clock.
    pub solar: String,
    /// e.g. `一九八四年正月初一`.
    pub lunar: String,
    pub day_master: DayMaster,
}

impl FourPillars {
    /// Year, month, day and hour, in that order.
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// Element pairs of the four pillars, space separated.
    pub fn element_summary(&self) -> String {
        self.pillars().iter().map(Pillar::wuxing).collect::<Vec<_>>().join(" ")
    }

    /// How many of the eight characters carry each element.
    pub fn element_counts(&self) -> [(Element, usize); 5] {
        Element::ALL.map(|e| {
            let n = self
                .pillars()
                .iter()
                .map(|p| (p.stem_element == e) as usize + (p.branch_element == e) as usize)
                .sum();
            (e, n)
        })
    }
}

/// Owns the configuration and the engines, and through them the caches.
#[derive(Debug, Clone)]
pub struct BaziFacade {
    config: BaziConfig,
    normalizer: TimeNormalizer,
    terms: SolarTermEngine,
    lunar: LunarCalendarResolver,
    sexagenary: SexagenaryEngine,
}

impl BaziFacade {
    pub fn new(config: BaziConfig) -> Result<Self> {
        Self::with_caches(config, Arc::default(), Arc::default())
    }

    /// Facade backed by caller-owned caches.
    pub fn with_caches(config: BaziConfig, terms: Arc<TermCache>, lunar_years: Arc<LunarYearCache>) -> Result<Self> {
        let normalizer = TimeNormalizer::from_config(&config)?;
        let offset = normalizer.offset();
        let terms = SolarTermEngine::with_cache(terms);
        Ok(Self {
            config,
            normalizer,
            lunar: LunarCalendarResolver::with_cache(terms.clone(), offset, lunar_years),
            sexagenary: SexagenaryEngine::new(terms.clone(), offset, config.zi_hour),
            terms,
        })
    }

    pub const fn config(&self) -> &BaziConfig {
        &self.config
    }

    pub const fn normalizer(&self) -> &TimeNormalizer {
        &self.normalizer
    }

    pub const fn solar_terms(&self) -> &SolarTermEngine {
        &self.terms
    }

    pub const fn lunar_calendar(&self) -> &LunarCalendarResolver {
        &self.lunar
    }

    pub const fn sexagenary(&self) -> &SexagenaryEngine {
        &self.sexagenary
    }

    /// Four pillars of a civil birth date, with an optional clock time.
    ///
    /// A missing time is taken as noon and the hour pillar is marked
    /// [`HourConfidence::Approximate`].
    pub fn compute_four_pillars(&self, date: NaiveDate, time: Option<NaiveTime>) -> Result<FourPillars> {
        let birth = self.normalizer.normalize(date, time)?;
        let instant = birth.instant;

        let (lunar_month, lunar_day) = self.lunar.resolve(instant)?;
        let lunar_date = LunarDate {
            year: lunar_month.year,
            month: lunar_month.month,
            day: lunar_day,
        };

        let year = match self.config.year_pivot {
            YearPivot::StartOfSpring => self.sexagenary.year_pillar(date.year(), instant)?,
            YearPivot::LunarNewYear => self.sexagenary.lunar_year_pillar(lunar_date.year),
        };
        let solar_month = self.terms.solar_month_at(instant)?;
        trace!(
            jie_year = solar_month.year,
            ordinal = solar_month.ordinal,
            jie_start = solar_month.start.value(),
            "solar month in force"
        );
        // the month stem always follows the Start-of-Spring year
        let month = self
            .sexagenary
            .month_pillar(solar_month.ordinal, year_cycle(solar_month.year), instant)?;
        let day = self.sexagenary.day_pillar(instant)?;
        let hour = self.sexagenary.hour_pillar(day, instant)?;

        let result = FourPillars {
            year: Pillar::new(year),
            month: Pillar::new(month),
            day: Pillar::new(day),
            hour: Pillar::new(hour),
            hour_confidence: if birth.time_known {
                HourConfidence::Exact
            } else {
                HourConfidence::Approximate
            },
            lunar_date,
            lunar_month,
            solar: format!(
                "{} {:02}:{:02}",
                date.format("%Y-%m-%d"),
                birth.time.hour(),
                birth.time.minute()
            ),
            lunar: lunar_date.to_string(),
            day_master: DayMaster {
                stem: day.stem,
                branch: day.branch,
                element: day.stem.element(),
            },
        };
        debug!(
            solar = %result.solar,
            year = %year,
            month = %month,
            day = %day,
            hour = %hour,
            lunar = %result.lunar,
            "four pillars resolved"
        );
        Ok(result)
    }

    /// Parse `YYYY-MM-DD` and an optional `HH:MM`, then compute.
    pub fn compute_four_pillars_str(&self, date: &str, time: Option<&str>) -> Result<FourPillars> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| BaziError::invalid_input(format!("date {date:?}: {e}")))?;
        let time = time
            .map(|t| {
                NaiveTime::parse_from_str(t.trim(), "%H:%M")
                    .map_err(|e| BaziError::invalid_input(format!("time {t:?}: {e}")))
            })
            .transpose()?;
        self.compute_four_pillars(date, time)
    }
}
