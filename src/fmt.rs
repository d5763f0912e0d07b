// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chinese display names for cycle terms, lunar dates and solar terms.

use crate::lunar::{LunarDate, Month};
use crate::sexagenary::StemBranch;
use crate::solar_terms::SolarTerm;

pub const STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

pub const BRANCHES: [&str; 12] = ["子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥"];

/// Chinese numerals; entry 0 is 十 so that `n % 10` indexes day names.
const NUM_CHINESE: [&str; 10] = ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Digits read one by one, as in year numbers.
const DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Solar term names, 立春 first.
const SOLAR_TERMS: [&str; 24] = [
    "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑",
    "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
];

/// `甲子`, `癸亥`, …
pub fn sexagenary(sb: StemBranch) -> String {
    format!("{}{}", STEMS[sb.stem.index() as usize], BRANCHES[sb.branch.index() as usize])
}

/// Month name with the 月 suffix. Months 1, 11 and 12 are 正月, 冬月 and
/// 腊月; a leap month is prefixed with 闰.
///
/// ```
/// use bazi::{fmt, Month};
///
/// assert_eq!(fmt::month(Month::Common(11)), "冬月");
/// assert_eq!(fmt::month(Month::Leap(6)), "闰六月");
/// ```
pub fn month(m: Month) -> String {
    let prefix = if m.is_leap() { "闰" } else { "" };
    let num = m.num();
    let name = match num {
        1 => "正",
        2..=10 => NUM_CHINESE[(num % 10) as usize],
        11 => "冬",
        12 => "腊",
        _ => return format!("{prefix}{num}月"),
    };
    format!("{prefix}{name}月")
}

/// Day name: 初一 to 初十, 十一 to 十九, 二十, 廿一 to 廿九, 三十.
pub fn day(d: u32) -> String {
    let head = match d {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => return d.to_string(),
    };
    format!("{head}{}", NUM_CHINESE[(d % 10) as usize])
}

/// Year number read digit by digit: `1984` → `一九八四`.
pub fn year_digits(year: i32) -> String {
    let digits: String = year
        .unsigned_abs()
        .to_string()
        .bytes()
        .map(|b| DIGITS[(b - b'0') as usize])
        .collect();
    if year < 0 {
        format!("前{digits}")
    } else {
        digits
    }
}

/// Full lunar date: `一九八四年正月初一`.
pub fn lunar_date(date: &LunarDate) -> String {
    format!("{}年{}{}", year_digits(date.year), month(date.month), day(date.day))
}

pub fn solar_term(term: SolarTerm) -> &'static str {
    SOLAR_TERMS[term.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_names() {
        assert_eq!(sexagenary(StemBranch::from_index(0)), "甲子");
        assert_eq!(sexagenary(StemBranch::from_index(26)), "庚寅");
        assert_eq!(sexagenary(StemBranch::from_index(59)), "癸亥");
    }

    #[test]
    fn month_names() {
        assert_eq!(month(Month::Common(1)), "正月");
        assert_eq!(month(Month::Common(10)), "十月");
        assert_eq!(month(Month::Common(12)), "腊月");
        assert_eq!(month(Month::Leap(1)), "闰正月");
    }

    #[test]
    fn day_names() {
        for (expected, d) in [
            ("初一", 1),
            ("初十", 10),
            ("十一", 11),
            ("二十", 20),
            ("廿一", 21),
            ("廿五", 25),
            ("三十", 30),
        ] {
            assert_eq!(day(d), expected);
        }
    }

    #[test]
    fn lunar_date_string() {
        let date = LunarDate {
            year: 1984,
            month: Month::Common(1),
            day: 1,
        };
        assert_eq!(lunar_date(&date), "一九八四年正月初一");
        let date = LunarDate {
            year: 2000,
            month: Month::Leap(4),
            day: 30,
        };
        assert_eq!(date.to_string(), "二〇〇〇年闰四月三十");
    }

    #[test]
    fn term_names() {
        assert_eq!(solar_term(SolarTerm::StartOfSpring), "立春");
        assert_eq!(solar_term(SolarTerm::GrainRain), "谷雨");
        assert_eq!(solar_term(SolarTerm::AwakeningOfInsects), "惊蛰");
        assert_eq!(solar_term(SolarTerm::GrainBuds), "小满");
        assert_eq!(solar_term(SolarTerm::EndOfHeat), "处暑");
        assert_eq!(solar_term(SolarTerm::WinterSolstice), "冬至");
        assert_eq!(solar_term(SolarTerm::MajorCold), "大寒");
    }
}
