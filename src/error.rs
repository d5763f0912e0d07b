// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy for the calendrical engine.
//!
//! Every failure is a local computation failure: there is no partial
//! result and nothing to retry, since the whole crate is deterministic.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Errors raised while normalizing a birth moment or deriving its pillars.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BaziError {
    /// The civil year falls outside the window the solar and lunar series
    /// are valid for.
    #[error("year {year} outside supported range {min}..={max}")]
    OutOfRange {
        /// Offending civil year.
        year: i32,
        /// First supported year.
        min: i32,
        /// Last supported year.
        max: i32,
    },

    /// Malformed or internally inconsistent input or intermediate value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A bounded root search did not reach its tolerance.
    #[error("{what} did not converge after {iterations} iterations")]
    Convergence {
        /// Which quantity was being solved for.
        what: &'static str,
        /// Iteration budget that was exhausted.
        iterations: u32,
    },
}

impl BaziError {
    /// Create an `OutOfRange` error for `year` against `range`.
    pub fn out_of_range(year: i32, range: &RangeInclusive<i32>) -> Self {
        Self::OutOfRange {
            year,
            min: *range.start(),
            max: *range.end(),
        }
    }

    /// Create an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BaziError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = BaziError::out_of_range(1850, &(1900..=2100));
        assert_eq!(err.to_string(), "year 1850 outside supported range 1900..=2100");

        let err = BaziError::invalid_input("month 13");
        assert_eq!(err.to_string(), "invalid input: month 13");

        let err = BaziError::Convergence {
            what: "new moon",
            iterations: 64,
        };
        assert_eq!(err.to_string(), "new moon did not converge after 64 iterations");
    }
}
