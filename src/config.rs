// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Engine configuration: the civil clock and the two almanac conventions
//! that differ between sources.

use chrono::FixedOffset;

use crate::error::{BaziError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset of China Standard Time, the clock the conventional almanac uses.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 8 * 60;

/// Which civil day the late Zi hour (23:00–23:59) counts towards for the
/// **day** pillar.
///
/// The hour pillar is not affected: 23:00–23:59 is always the Zi block
/// that opens the following day's hour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZiHourPolicy {
    /// The day pillar changes at midnight; 23:xx keeps the current day.
    #[default]
    SameDay,
    /// The day pillar changes at 23:00.
    NextDay,
}

/// Where the **year** pillar turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum YearPivot {
    /// At the Start of Spring solar term (the four-pillars convention).
    #[default]
    StartOfSpring,
    /// At the lunar new year (first day of the first lunar month).
    LunarNewYear,
}

/// Configuration shared by the normalizer, the engines and the facade.
///
/// ```
/// use bazi::{BaziConfig, ZiHourPolicy};
///
/// let config = BaziConfig::default().with_zi_hour(ZiHourPolicy::NextDay);
/// assert_eq!(config.utc_offset_minutes, 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaziConfig {
    /// Local clock offset from UTC in minutes, applied once at ingestion and
    /// used for every civil-day decision.
    pub utc_offset_minutes: i32,
    /// Day pillar handling for the late Zi hour.
    pub zi_hour: ZiHourPolicy,
    /// Where the year pillar turns over.
    pub year_pivot: YearPivot,
}

impl Default for BaziConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            zi_hour: ZiHourPolicy::default(),
            year_pivot: YearPivot::default(),
        }
    }
}

impl BaziConfig {
    /// Returns a copy with the clock offset set, in minutes east of UTC.
    pub const fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Returns a copy with the late Zi hour policy set.
    pub const fn with_zi_hour(mut self, policy: ZiHourPolicy) -> Self {
        self.zi_hour = policy;
        self
    }

    /// Returns a copy with the year pivot set.
    pub const fn with_year_pivot(mut self, pivot: YearPivot) -> Self {
        self.year_pivot = pivot;
        self
    }

    /// The configured clock as a chrono offset.
    ///
    /// Fails for offsets of a day or more, which chrono cannot represent.
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            BaziError::invalid_input(format!(
                "UTC offset of {} minutes is not a valid clock offset",
                self.utc_offset_minutes
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_china_standard_time() {
        let config = BaziConfig::default();
        assert_eq!(config.offset().unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(config.zi_hour, ZiHourPolicy::SameDay);
        assert_eq!(config.year_pivot, YearPivot::StartOfSpring);
    }

    #[test]
    fn builders_override_fields() {
        let config = BaziConfig::default()
            .with_utc_offset_minutes(-300)
            .with_zi_hour(ZiHourPolicy::NextDay)
            .with_year_pivot(YearPivot::LunarNewYear);
        assert_eq!(config.offset().unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(config.zi_hour, ZiHourPolicy::NextDay);
        assert_eq!(config.year_pivot, YearPivot::LunarNewYear);
    }

    #[test]
    fn absurd_offset_is_rejected() {
        let config = BaziConfig::default().with_utc_offset_minutes(100 * 60);
        assert!(matches!(config.offset(), Err(BaziError::InvalidInput(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let config: BaziConfig = serde_json::from_str(r#"{"zi_hour":"NextDay"}"#).unwrap();
        assert_eq!(config.utc_offset_minutes, 480);
        assert_eq!(config.zi_hour, ZiHourPolicy::NextDay);
    }
}
