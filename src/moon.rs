// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent geocentric ecliptic longitude of the Moon.
//!
//! Main periodic terms of the ELP-2000/82 theory as tabulated in Meeus,
//! *Astronomical Algorithms* (2nd ed.), ch. 47. Sixty longitude terms plus
//! the three additive corrections give about 10″, which places a new moon
//! to within a couple of minutes.

use crate::search::normalize_deg;
use crate::solar::nutation_in_longitude;
use crate::JulianDate;

/// Mean synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// JDE of the mean new moon of 2000-01-06, lunation `k = 0`.
const MEAN_NEW_MOON_EPOCH: f64 = 2_451_550.097_66;

/// `(D, M, M′, F, Σl coefficient in 1e-6 degrees)`.
type LongitudeTerm = (i8, i8, i8, i8, f64);

#[rustfmt::skip]
const LONGITUDE_TERMS: [LongitudeTerm; 60] = [
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
    (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0),
    (4, 0, -1, 0, 10_675.0),
    (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
    (2, 1, -1, 0, -7_888.0),
    (2, 1, 0, 0, -6_766.0),
    (1, 0, -1, 0, -5_163.0),
    (1, 1, 0, 0, 4_987.0),
    (2, -1, 1, 0, 4_036.0),
    (2, 0, 2, 0, 3_994.0),
    (4, 0, 0, 0, 3_861.0),
    (2, 0, -3, 0, 3_665.0),
    (0, 1, -2, 0, -2_689.0),
    (2, 0, -1, 2, -2_602.0),
    (2, -1, -2, 0, 2_390.0),
    (1, 0, 1, 0, -2_348.0),
    (2, -2, 0, 0, 2_236.0),
    (0, 1, 2, 0, -2_120.0),
    (0, 2, 0, 0, -2_069.0),
    (2, -2, -1, 0, 2_048.0),
    (2, 0, 1, -2, -1_773.0),
    (2, 0, 0, 2, -1_595.0),
    (4, -1, -1, 0, 1_215.0),
    (0, 0, 2, 2, -1_110.0),
    (3, 0, -1, 0, -892.0),
    (2, 1, 1, 0, -810.0),
    (4, -1, -2, 0, 759.0),
    (0, 2, -1, 0, -713.0),
    (2, 2, -1, 0, -700.0),
    (2, 1, -2, 0, 691.0),
    (2, -1, 0, -2, 596.0),
    (4, 0, 1, 0, 549.0),
    (0, 0, 4, 0, 537.0),
    (4, -1, 0, 0, 520.0),
    (1, 0, -2, 0, -487.0),
    (2, 1, 0, -2, -399.0),
    (0, 0, 2, -2, -381.0),
    (1, 1, 1, 0, 351.0),
    (3, 0, -2, 0, -340.0),
    (4, 0, -3, 0, 330.0),
    (2, -1, 2, 0, 327.0),
    (0, 2, 1, 0, -323.0),
    (1, 1, -1, 0, 299.0),
    (2, 0, 3, 0, 294.0),
    (2, 0, -1, -2, 0.0),
];

/// Fundamental arguments in degrees, `t` in Julian centuries of TT.
struct Arguments {
    mean_longitude: f64,
    elongation: f64,
    sun_anomaly: f64,
    moon_anomaly: f64,
    latitude_argument: f64,
    eccentricity: f64,
}

impl Arguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        Self {
            mean_longitude: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
                - t4 / 65_194_000.0,
            elongation: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
                - t4 / 113_065_000.0,
            sun_anomaly: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
            moon_anomaly: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
                - t4 / 14_712_000.0,
            latitude_argument: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
                + t4 / 863_310_000.0,
            eccentricity: 1.0 - 0.002_516 * t - 0.000_007_4 * t2,
        }
    }
}

/// Geometric longitude of the Moon (degrees, unwrapped), mean equinox of date.
fn geometric_longitude(t: f64) -> f64 {
    let a = Arguments::at(t);
    let d = a.elongation.to_radians();
    let m = a.sun_anomaly.to_radians();
    let mp = a.moon_anomaly.to_radians();
    let f = a.latitude_argument.to_radians();

    let sigma: f64 = LONGITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            let arg = cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f;
            let e = match cm.abs() {
                1 => a.eccentricity,
                2 => a.eccentricity * a.eccentricity,
                _ => 1.0,
            };
            coeff * e * arg.sin()
        })
        .sum();

    // Venus, Jupiter and flattening corrections
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let l = a.mean_longitude.to_radians();
    let additive = 3_958.0 * a1.sin() + 1_962.0 * (l - f).sin() + 318.0 * a2.sin();

    a.mean_longitude + (sigma + additive) / 1e6
}

/// Apparent geocentric ecliptic longitude of the Moon, degrees in `[0, 360)`.
///
/// `jd` is on the TT axis.
pub fn apparent_longitude(jd: JulianDate) -> f64 {
    let t = jd.julian_centuries().value();
    normalize_deg(geometric_longitude(t) + nutation_in_longitude(t))
}

/// JDE of the mean new moon of lunation `k` (Meeus eq. 49.1).
///
/// Within a day of the true conjunction, used to seed the search.
pub fn mean_new_moon(k: i32) -> JulianDate {
    let k = k as f64;
    let t = k / 1_236.85;
    JulianDate::new(MEAN_NEW_MOON_EPOCH + SYNODIC_MONTH * k + 0.000_154_37 * t * t)
}

/// Lunation number whose mean new moon is nearest to `jd`.
pub fn nearest_lunation(jd: JulianDate) -> i32 {
    ((jd.value() - MEAN_NEW_MOON_EPOCH) / SYNODIC_MONTH).round() as i32
}
