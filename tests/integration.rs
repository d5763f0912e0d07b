use bazi::{
    BaziConfig, BaziError, BaziFacade, Element, HourConfidence, Instant, LunarCalendarResolver, LunarDate,
    LunarYearCache, Month, SolarTerm, SolarTermEngine, StemBranch, TermCache, YearPivot, ZiHourPolicy, JD,
};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use qtty::{Day, Seconds};
use std::sync::Arc;

fn facade() -> BaziFacade {
    BaziFacade::new(BaziConfig::default()).unwrap()
}

fn pillar_names(p: &bazi::FourPillars) -> Vec<String> {
    p.pillars().iter().map(|x| x.to_string()).collect()
}

#[test]
fn ut_applies_delta_t_near_j2000() {
    let ut = Instant::new(2_451_545.0);
    let jd = ut.to::<JD>();
    let offset_s = (jd.quantity() - ut.quantity()).to::<Day>().to::<qtty::Second>();
    assert!((offset_s - Seconds::new(63.83)).abs() < Seconds::new(1.0));
}

#[test]
fn new_millennium_noon() {
    let p = facade().compute_four_pillars_str("2000-01-01", Some("12:00")).unwrap();
    assert_eq!(pillar_names(&p), ["己卯", "丙子", "戊午", "戊午"]);
    assert_eq!(p.lunar, "一九九九年冬月廿五");
    assert_eq!(
        p.lunar_date,
        LunarDate {
            year: 1999,
            month: Month::Common(11),
            day: 25
        }
    );
    assert_eq!(p.day_master.element, Element::Earth);
}

#[test]
fn lunar_new_year_1984_under_both_pivots() {
    let date = NaiveDate::from_ymd_opt(1984, 2, 2).unwrap();
    let noon = NaiveTime::from_hms_opt(12, 0, 0);

    let lunar = BaziFacade::new(BaziConfig::default().with_year_pivot(YearPivot::LunarNewYear)).unwrap();
    let p = lunar.compute_four_pillars(date, noon).unwrap();
    assert_eq!(p.year.stem_branch, StemBranch::JIAZI);
    assert_eq!(p.lunar, "一九八四年正月初一");

    let spring = facade().compute_four_pillars(date, noon).unwrap();
    assert_eq!(spring.year.stem_branch.index(), 59);
    assert_eq!(spring.year.to_string(), "癸亥");
    // the month pillar does not depend on the pivot
    assert_eq!(spring.month, p.month);
    assert_eq!(spring.month.to_string(), "乙丑");

    let after = facade().compute_four_pillars_str("1984-02-05", Some("12:00")).unwrap();
    assert_eq!(after.year.stem_branch, StemBranch::JIAZI);
    assert_eq!(after.month.to_string(), "丙寅");
}

#[test]
fn missing_time_only_changes_confidence() {
    let f = facade();
    let without = f.compute_four_pillars_str("1975-11-03", None).unwrap();
    let with = f.compute_four_pillars_str("1975-11-03", Some("12:00")).unwrap();
    assert_eq!(without.hour_confidence, HourConfidence::Approximate);
    assert_eq!(with.hour_confidence, HourConfidence::Exact);
    assert_eq!(pillar_names(&without), pillar_names(&with));
    assert_eq!(without.lunar, with.lunar);
}

#[test]
fn zi_hour_edges() {
    let same = facade();
    let next = BaziFacade::new(BaziConfig::default().with_zi_hour(ZiHourPolicy::NextDay)).unwrap();

    let late = same.compute_four_pillars_str("2000-01-01", Some("23:30")).unwrap();
    let early = same.compute_four_pillars_str("2000-01-01", Some("00:30")).unwrap();
    assert_eq!(late.hour.stem_branch.branch, bazi::Branch::Zi);
    assert_eq!(early.hour.stem_branch.branch, bazi::Branch::Zi);
    assert_eq!(late.day, early.day);
    assert_ne!(late.hour, early.hour);

    let late_next = next.compute_four_pillars_str("2000-01-01", Some("23:30")).unwrap();
    let following = next.compute_four_pillars_str("2000-01-02", Some("00:30")).unwrap();
    assert_eq!(late_next.day, following.day);
    assert_eq!(late_next.hour, late.hour);
}

#[test]
fn leap_month_of_2017() {
    let f = facade();
    let before = f.compute_four_pillars_str("2017-07-22", Some("12:00")).unwrap();
    let first = f.compute_four_pillars_str("2017-07-23", Some("00:00")).unwrap();
    assert_eq!(before.lunar_date.month, Month::Common(6));
    assert_eq!(before.lunar_date.day, 29);
    assert_eq!(first.lunar_date.month, Month::Leap(6));
    assert_eq!(first.lunar_date.day, 1);
    assert_eq!(first.lunar_month.length, 30);
}

#[test]
fn lunar_strings_use_simplified_characters() {
    let f = facade();
    let leap = f.compute_four_pillars_str("2017-07-23", None).unwrap();
    assert_eq!(leap.lunar, "二〇一七年闰六月初一");
    let twelfth = f.compute_four_pillars_str("2018-01-20", None).unwrap();
    assert_eq!(twelfth.lunar, "二〇一七年腊月初四");
    assert_eq!(SolarTerm::AwakeningOfInsects.chinese(), "惊蛰");
}

#[test]
fn start_of_spring_2017_date() {
    let engine = SolarTermEngine::new();
    let lichun = engine.boundary(2017, SolarTerm::StartOfSpring).unwrap();
    let cst = FixedOffset::east_opt(8 * 3600).unwrap();
    assert_eq!(
        lichun.to_local(cst).unwrap().date_naive(),
        NaiveDate::from_ymd_opt(2017, 2, 3).unwrap()
    );
}

#[test]
fn shared_caches_give_identical_results() {
    let terms = Arc::new(TermCache::new());
    let years = Arc::new(LunarYearCache::new());
    let a = BaziFacade::with_caches(BaziConfig::default(), Arc::clone(&terms), Arc::clone(&years)).unwrap();
    let b = BaziFacade::with_caches(BaziConfig::default(), terms, years).unwrap();
    let cold = facade();
    for (date, time) in [("1950-06-15", Some("06:45")), ("2088-12-31", Some("23:59")), ("1900-01-01", None)] {
        let x = a.compute_four_pillars_str(date, time).unwrap();
        let y = b.compute_four_pillars_str(date, time).unwrap();
        let z = cold.compute_four_pillars_str(date, time).unwrap();
        assert_eq!(x, y);
        assert_eq!(x, z);
        assert_eq!(
            x.lunar_month.start.value().to_bits(),
            z.lunar_month.start.value().to_bits()
        );
    }
}

#[test]
fn resolver_is_usable_on_its_own() {
    let resolver = LunarCalendarResolver::new(SolarTermEngine::new(), FixedOffset::east_opt(8 * 3600).unwrap());
    let year = resolver.lunar_year(2017).unwrap();
    assert_eq!(year.months.len(), 13);
    assert_eq!(year.leap_month().map(|m| m.month), Some(Month::Leap(6)));
}

#[test]
fn errors() {
    let f = facade();
    assert!(matches!(
        f.compute_four_pillars_str("2101-01-01", None),
        Err(BaziError::OutOfRange {
            year: 2101,
            min: 1900,
            max: 2100
        })
    ));
    assert!(matches!(
        f.compute_four_pillars_str("2023-02-29", None),
        Err(BaziError::InvalidInput(_))
    ));
    assert!(matches!(
        BaziFacade::new(BaziConfig::default().with_utc_offset_minutes(24 * 60)),
        Err(BaziError::InvalidInput(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn four_pillars_serialize_to_json() {
    let p = facade().compute_four_pillars_str("2000-01-01", Some("12:00")).unwrap();
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["solar"], "2000-01-01 12:00");
    assert_eq!(json["hour_confidence"], "Exact");
    assert_eq!(json["day"]["stem_branch"]["stem"], "Wu");
    assert_eq!(json["day_master"]["element"], "Earth");
}
