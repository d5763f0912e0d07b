// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Bounded root finding on the TT axis.
//!
//! Solar terms and new moons are both zero crossings of an angular
//! difference wrapped to (−180°, 180°]. The caller supplies a bracket a
//! few days wide around a mean-motion guess; inside it the function is
//! monotonic, so plain bisection converges in ~24 halvings.

use qtty::Days;

use crate::error::{BaziError, Result};
use crate::JulianDate;

/// Iteration budget for one root.
pub const MAX_BISECTIONS: u32 = 64;

/// Width at which a bracket counts as solved (~0.09 s).
pub const TOLERANCE: Days = Days::new(1e-6);

/// Wrap an angle to `[0, 360)` degrees.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negatives
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Wrap an angle to `(-180, 180]` degrees.
#[inline]
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = normalize_deg(deg);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// A sign change that is a real crossing, not a jump across the ±180° seam.
#[inline]
fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a * f_b < 0.0 && (f_a - f_b).abs() < 270.0
}

/// Bisect `f` between `a` and `b`.
///
/// Fails with [`BaziError::Convergence`] if the bracket does not hold a
/// genuine crossing or the budget runs out.
pub fn bisect_root<F>(what: &'static str, mut a: JulianDate, mut b: JulianDate, f: F) -> Result<JulianDate>
where
    F: Fn(JulianDate) -> f64,
{
    let mut f_a = f(a);
    let f_b = f(b);
    if f_a == 0.0 {
        return Ok(a);
    }
    if f_b == 0.0 {
        return Ok(b);
    }
    if !is_genuine_crossing(f_a, f_b) {
        return Err(BaziError::Convergence { what, iterations: 0 });
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = a.mean(b);
        let f_mid = f(mid);
        if f_a * f_mid <= 0.0 {
            b = mid;
        } else {
            a = mid;
            f_a = f_mid;
        }
        if (b - a) < TOLERANCE {
            return Ok(a.mean(b));
        }
    }
    Err(BaziError::Convergence {
        what,
        iterations: MAX_BISECTIONS,
    })
}

/// Bisect `f` in `[guess - half_width, guess + half_width]`.
pub fn bracket_root<F>(what: &'static str, guess: JulianDate, half_width: Days, f: F) -> Result<JulianDate>
where
    F: Fn(JulianDate) -> f64,
{
    bisect_root(what, guess - half_width, guess + half_width, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizers_wrap() {
        assert_eq!(normalize_deg(-30.0), 330.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_to_pm180(190.0), -170.0);
        assert_eq!(normalize_to_pm180(180.0), 180.0);
        assert_eq!(normalize_to_pm180(-180.0), 180.0);
        assert!(normalize_deg(-1e-17) < 360.0);
    }

    #[test]
    fn bisection_finds_linear_root() {
        let root = JulianDate::new(2_451_550.25);
        let found = bracket_root("line", JulianDate::new(2_451_549.0), Days::new(5.0), |t| {
            (t - root).value() * 12.0
        })
        .unwrap();
        assert!((found - root).abs() < TOLERANCE);
    }

    #[test]
    fn bisection_handles_wrapped_angles() {
        // Longitude sweeping through 0° at ~1°/day.
        let root = JulianDate::new(2_451_623.8);
        let f = |t: JulianDate| normalize_to_pm180((t - root).value() * 0.9856);
        let found = bracket_root("equinox", JulianDate::new(2_451_622.0), Days::new(5.0), f).unwrap();
        assert!((found - root).abs() < TOLERANCE);
    }

    #[test]
    fn missing_crossing_is_a_convergence_error() {
        let err = bracket_root("none", JulianDate::new(0.0), Days::new(1.0), |_| 1.0).unwrap_err();
        assert_eq!(err, BaziError::Convergence { what: "none", iterations: 0 });
    }

    #[test]
    fn seam_jump_is_not_a_crossing() {
        // f jumps from +179 to -179 at t = 0: not a root.
        let f = |t: JulianDate| if t.value() < 0.0 { 179.0 } else { -179.0 };
        assert!(bracket_root("seam", JulianDate::new(0.0), Days::new(1.0), f).is_err());
    }
}
