// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T): UT↔TT correction
//!
//! Piecewise model for **ΔT = TT − UT** over the window the calendar
//! supports (with margin):
//!
//! * **1880–1992**: biennial table compiled by J. Meeus (*Astronomical
//!   Algorithms*, ch. 9), interpolated with the three-point formula.
//! * **1992–2025**: annual observed values (IERS Bulletin A).
//! * **After 2025**: linear extrapolation at the recent observed rate.
//!
//! Before 1880 the first table value is held constant; the engine never
//! asks for dates that early.
//!
//! The correction is applied automatically by the [`UT`](super::scales::UT)
//! scale; callers only see it through `Time::<UT>::to::<JD>()` or
//! [`Time::<UT>::delta_t`](super::Time::delta_t).
//!
//! ΔT matters here because solar-term and new-moon instants come out on the
//! TT axis; a minute of error moves a term across local midnight about
//! once every 1440 terms.

use super::instant::Time;
use super::scales::UT;
use qtty::{Days, Seconds, Simplify};

const TABLE_TERMS: usize = 57;

/// Biennial ΔT (seconds), 1880.0 to 1992.0.
#[rustfmt::skip]
const DELTA_T: [Seconds; TABLE_TERMS] = qtty::qtty_vec!(
    Seconds;
     -5.4, -5.2, -5.5, -5.6, -5.8, -5.9, -6.2, -6.4, -6.1, -4.7,
     -2.7,  0.0,  2.6,  5.4,  7.7, 10.5, 13.4, 16.0, 18.2, 20.2,
     21.2, 22.4, 23.5, 23.9, 24.3, 24.0, 23.9, 23.9, 23.7, 24.0,
     24.3, 25.3, 26.2, 27.3, 28.2, 29.1, 30.0, 30.7, 31.4, 32.2,
     33.1, 34.0, 35.0, 36.5, 38.3, 40.2, 42.2, 44.5, 46.5, 48.5,
     50.5, 52.2, 53.8, 54.9, 55.8, 56.9, 58.3,
);

/// Annual ΔT (seconds) from IERS/USNO observations, 1992.0–2025.0.
const OBSERVED_TERMS: usize = 34;
const OBSERVED_START_YEAR: f64 = 1992.0;

#[rustfmt::skip]
const OBSERVED_DT: [Seconds; OBSERVED_TERMS] = qtty::qtty_vec!(
    Seconds;
    // 1992  1993   1994   1995   1996   1997   1998   1999
    58.31, 59.12, 59.98, 60.78, 61.63, 62.30, 62.97, 63.47,
    // 2000  2001   2002   2003   2004   2005   2006   2007
    63.83, 64.09, 64.30, 64.47, 64.57, 64.69, 64.85, 65.15,
    // 2008  2009   2010   2011   2012   2013   2014   2015
    65.46, 65.78, 66.07, 66.32, 66.60, 66.91, 67.28, 67.64,
    // 2016  2017   2018   2019   2020   2021   2022   2023
    68.10, 68.59, 68.97, 69.22, 69.36, 69.36, 69.29, 69.18,
    // 2024  2025
    69.09, 69.36,
);

const OBSERVED_END_YEAR: f64 = OBSERVED_START_YEAR + (OBSERVED_TERMS - 1) as f64;

/// Recent ΔT drift, seconds per year.
const EXTRAPOLATION_RATE: f64 = 0.02;

const JD_TABLE_START_1880: Days = Days::new(2_407_717.5);
const JD_OBSERVED_START_1992: Days = Days::new(2_448_622.5);
const J2000: Days = Days::new(2_451_545.0);
const JULIAN_YEAR: Days = Days::new(365.25);

/// **1880–1992**: three-point interpolation around the nearest tabulated
/// value.
#[inline]
fn delta_t_table(jd_ut: Days) -> Seconds {
    const BIENNIAL_STEP_D: Days = Days::new(730.5);

    let x = days_ratio(jd_ut - JD_TABLE_START_1880, BIENNIAL_STEP_D);
    let centre = (x.round() as usize).clamp(1, TABLE_TERMS - 2);
    let a: Seconds = DELTA_T[centre] - DELTA_T[centre - 1];
    let b: Seconds = DELTA_T[centre + 1] - DELTA_T[centre];
    let c: Seconds = b - a;
    let n = x - centre as f64;
    DELTA_T[centre] + n / 2.0 * (a + b + n * c)
}

/// **1992–2025**: linear interpolation between annual observations.
#[inline]
fn delta_t_observed(jd_ut: Days) -> Seconds {
    let idx_f = fractional_year(jd_ut) - OBSERVED_START_YEAR;
    let idx = idx_f as usize;
    if idx + 1 >= OBSERVED_TERMS {
        return OBSERVED_DT[OBSERVED_TERMS - 1];
    }
    let frac = idx_f - idx as f64;
    OBSERVED_DT[idx] + frac * (OBSERVED_DT[idx + 1] - OBSERVED_DT[idx])
}

/// **After 2025**: last observation plus the recent drift.
#[inline]
fn delta_t_extrapolated(jd_ut: Days) -> Seconds {
    let years_past = fractional_year(jd_ut) - OBSERVED_END_YEAR;
    OBSERVED_DT[OBSERVED_TERMS - 1] + Seconds::new(EXTRAPOLATION_RATE * years_past)
}

#[inline]
fn fractional_year(jd_ut: Days) -> f64 {
    2000.0 + days_ratio(jd_ut - J2000, JULIAN_YEAR)
}

#[inline]
fn days_ratio(num: Days, den: Days) -> f64 {
    (num / den).simplify().value()
}

/// Returns **ΔT** in seconds for a Julian Day on the **UT** axis.
#[inline]
pub(crate) fn delta_t_seconds_from_ut(jd_ut: Days) -> Seconds {
    if jd_ut < JD_TABLE_START_1880 {
        DELTA_T[0]
    } else if jd_ut < JD_OBSERVED_START_1992 {
        delta_t_table(jd_ut)
    } else if fractional_year(jd_ut) < OBSERVED_END_YEAR {
        delta_t_observed(jd_ut)
    } else {
        delta_t_extrapolated(jd_ut)
    }
}

impl Time<UT> {
    /// Returns **ΔT = TT − UT** in seconds for this UT epoch.
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t_seconds_from_ut(self.quantity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_t_2000() {
        // IERS reference value: ~63.83 s
        let dt = delta_t_seconds_from_ut(J2000);
        assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(0.1));
    }

    #[test]
    fn delta_t_table_hits_tabulated_points() {
        // 1900.0 is table index 10.
        let jd = JD_TABLE_START_1880 + Days::new(730.5 * 10.0);
        let dt = delta_t_seconds_from_ut(jd);
        assert!((dt - Seconds::new(-2.7)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn delta_t_is_continuous_across_sections() {
        let eps = Days::new(1e-6);
        let below = delta_t_seconds_from_ut(JD_OBSERVED_START_1992 - eps);
        let above = delta_t_seconds_from_ut(JD_OBSERVED_START_1992 + eps);
        assert!((below - above).abs() < Seconds::new(0.2));

        let end = J2000 + JULIAN_YEAR * (OBSERVED_END_YEAR - 2000.0);
        let below = delta_t_seconds_from_ut(end - eps);
        let above = delta_t_seconds_from_ut(end + eps);
        assert!((below - above).abs() < Seconds::new(0.2));
    }

    #[test]
    fn delta_t_stays_small_over_supported_window() {
        for year in (1890..=2110).step_by(5) {
            let jd = J2000 + JULIAN_YEAR * (year as f64 - 2000.0);
            let dt = delta_t_seconds_from_ut(jd);
            assert!(
                dt > Seconds::new(-10.0) && dt < Seconds::new(75.0),
                "ΔT({year}) = {dt}"
            );
        }
    }

    #[test]
    fn delta_t_convenience_method() {
        let ut = Time::<UT>::new(2_451_545.0);
        assert!((ut.delta_t() - Seconds::new(63.83)).abs() < Seconds::new(0.1));
    }
}
