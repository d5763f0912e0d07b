// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunisolar calendar and four-pillars encoding of civil birth dates.
//!
//! A civil date and clock time on a fixed-offset clock is mapped to an
//! instant on the UT axis, the solar terms and new moons around it are
//! located from low-order solar and lunar series, and the result is read
//! out as a lunar date and four stem–branch pillars.
//!
//! # Core types
//!
//! - [`Time<S>`]: generic instant parameterised by a [`TimeScale`] marker.
//! - [`Instant`]: type alias for `Time<UT>`, the axis birth moments live on.
//! - [`JulianDate`]: type alias for `Time<JD>`, the TT axis of the series.
//! - [`Interval<T>`], [`Period<S>`], [`DaySpan`]: half-open intervals.
//! - [`BaziFacade`] / [`FourPillars`]: the entry point and its result.
//!
//! # Engines
//!
//! | Engine | Answers |
//! |--------|---------|
//! | [`TimeNormalizer`] | civil reading → [`Instant`] and back |
//! | [`SolarTermEngine`] | the 24 term boundaries of a year, term in force |
//! | [`LunarCalendarResolver`] | new moons, lunar years, lunar date of an instant |
//! | [`SexagenaryEngine`] | year, month, day and hour pillars |
//!
//! # ΔT (Delta T)
//!
//! The difference **ΔT = TT − UT** is applied automatically when an
//! [`Instant`] is converted with `.to::<JD>()`. The raw value in seconds
//! is available via [`Time::<UT>::delta_t()`](Time::delta_t).
//!
//! # Example
//!
//! ```
//! use bazi::{BaziConfig, BaziFacade};
//!
//! let facade = BaziFacade::new(BaziConfig::default()).unwrap();
//! let pillars = facade.compute_four_pillars_str("2000-01-01", Some("12:00")).unwrap();
//! assert_eq!(pillars.day.to_string(), "戊午");
//! ```

mod cache;
mod config;
mod delta_t;
mod error;
mod facade;
pub mod fmt;
pub(crate) mod instant;
mod julian_date_ext;
mod lunar;
pub mod moon;
mod normalizer;
mod period;
pub(crate) mod scales;
mod search;
mod sexagenary;
pub mod solar;
mod solar_terms;
mod wuxing;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use cache::ReadThroughCache;
pub use config::{BaziConfig, YearPivot, ZiHourPolicy, DEFAULT_UTC_OFFSET_MINUTES};
pub use error::{BaziError, Result};
pub use facade::{BaziFacade, DayMaster, FourPillars, HourConfidence, Pillar};
pub use instant::{Time, TimeInstant, TimeScale};
pub use julian_date_ext::{date_from_jdn, jdn_from_date};
pub use lunar::{LunarCalendarResolver, LunarDate, LunarMonth, LunarYear, LunarYearCache, Month};
pub use normalizer::{NormalizedBirth, TimeNormalizer, DEFAULT_BIRTH_TIME, SUPPORTED_YEARS};
pub use period::{DaySpan, Interval, Period};
pub use scales::{JD, UT};
pub use search::{normalize_deg, normalize_to_pm180};
pub use sexagenary::{day_cycle, year_cycle, Branch, SexagenaryEngine, Stem, StemBranch, JIAZI_YEAR};
pub use solar_terms::{SolarMonth, SolarTerm, SolarTermBoundary, SolarTermEngine, TermCache, ENGINE_YEARS};
pub use wuxing::{
    branch_element, branch_polarity, element_of, stem_element, stem_polarity, Element, HasElement, Polarity,
};

// ── Type aliases ──────────────────────────────────────────────────────────

/// Julian Date on the TT axis, the argument of the solar and lunar series.
///
/// This is a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;

/// A moment on the Universal Time axis, where civil clocks live.
///
/// This is a type alias for [`Time<UT>`].
pub type Instant = Time<UT>;
