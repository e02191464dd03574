//! Tests for time normalization, time ranges, and weekday codes.

use chrono::NaiveDate;
use finals_engine::time::{
    canonical_days, date_str_to_weekday_code, is_tba, meetings_per_week, parse_exam_date,
};
use finals_engine::{date_to_weekday_code, normalize_time, DayCode, TimeRange};

// ── normalize_time ──────────────────────────────────────────────────────────

#[test]
fn am_block_keeps_hours() {
    assert_eq!(normalize_time("0800-0915AM"), "08:00-09:15");
}

#[test]
fn pm_block_shifts_both_hours() {
    assert_eq!(normalize_time("0930-1045PM"), "21:30-22:45");
    assert_eq!(normalize_time("0100-0215PM"), "13:00-14:15");
}

#[test]
fn pm_block_straddling_noon_keeps_morning_start() {
    // End 12:15 is already >= 12; start + 12 = 23 would pass the end hour.
    assert_eq!(normalize_time("1100-1215PM"), "11:00-12:15");
}

#[test]
fn pm_block_straddling_one_oclock() {
    // End 01:50 PM → 13:50; start 12 is left alone, 11 → would be 23 > 13.
    assert_eq!(normalize_time("1130-0150PM"), "11:30-13:50");
}

#[test]
fn canonical_input_passes_through() {
    assert_eq!(normalize_time("08:00-09:15"), "08:00-09:15");
    assert_eq!(normalize_time(" 14:00 - 15:15 "), "14:00-15:15");
}

#[test]
fn lowercase_and_spaced_suffix_accepted() {
    assert_eq!(normalize_time("0200-0315 pm"), "14:00-15:15");
}

#[test]
fn tba_and_garbage_returned_unchanged() {
    assert_eq!(normalize_time("TBA"), "TBA");
    assert_eq!(normalize_time(""), "");
    assert_eq!(normalize_time("Online"), "Online");
    assert_eq!(normalize_time("08-09AM"), "08-09AM");
    assert_eq!(normalize_time("2500-2615AM"), "2500-2615AM");
}

// ── TimeRange ───────────────────────────────────────────────────────────────

#[test]
fn parse_and_display_roundtrip() {
    let range = TimeRange::parse("08:00-09:15").unwrap();
    assert_eq!(range.to_string(), "08:00-09:15");
    assert_eq!(range.duration_minutes(), 75);
}

#[test]
fn parse_rejects_backwards_and_malformed() {
    assert!(TimeRange::parse("10:00-09:00").is_err());
    assert!(TimeRange::parse("TBA").is_err());
    assert!(TimeRange::parse("0800-0915AM").is_err());
}

#[test]
fn overlapping_ranges_detected() {
    let a: TimeRange = "08:00-10:00".parse().unwrap();
    let b: TimeRange = "09:00-11:00".parse().unwrap();
    assert!(a.overlaps(&b, 0));
    assert!(b.overlaps(&a, 0));
}

#[test]
fn contiguous_ranges_do_not_overlap_without_buffer() {
    let a: TimeRange = "08:00-09:00".parse().unwrap();
    let b: TimeRange = "09:00-10:00".parse().unwrap();
    assert!(!a.overlaps(&b, 0));
    assert!(a.is_adjacent_to(&b));
    assert!(b.is_adjacent_to(&a));
}

#[test]
fn buffer_turns_near_misses_into_overlaps() {
    let a: TimeRange = "08:00-09:00".parse().unwrap();
    let b: TimeRange = "09:10-10:00".parse().unwrap();
    assert!(!a.overlaps(&b, 5));
    assert!(a.overlaps(&b, 15));
    assert!(b.overlaps(&a, 15));
    assert!(!a.is_adjacent_to(&b));
}

#[test]
fn buffer_does_not_wrap_past_midnight() {
    let late: TimeRange = "23:00-23:55".parse().unwrap();
    let early: TimeRange = "00:00-01:00".parse().unwrap();
    assert!(!late.overlaps(&early, 15));
}

#[test]
fn extreme_buffers_do_not_overflow() {
    let a: TimeRange = "08:00-09:00".parse().unwrap();
    let b: TimeRange = "13:00-14:00".parse().unwrap();
    assert!(a.overlaps(&b, i64::MAX));
    assert!(b.overlaps(&a, i64::MAX));
    assert!(!a.overlaps(&b, i64::MIN));
}

// ── Weekdays ────────────────────────────────────────────────────────────────

#[test]
fn weekday_mapping_is_fixed() {
    // 2026-12-07 is a Monday.
    let monday = NaiveDate::from_ymd_opt(2026, 12, 7).unwrap();
    let expected = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];
    for (offset, letter) in expected.iter().enumerate() {
        let day = date_to_weekday_code(monday + chrono::Duration::days(offset as i64));
        assert_eq!(day.letter(), *letter);
    }
}

#[test]
fn exam_dates_in_both_formats() {
    assert_eq!(
        parse_exam_date("2026-12-10").unwrap(),
        NaiveDate::from_ymd_opt(2026, 12, 10).unwrap()
    );
    assert_eq!(
        parse_exam_date("12/10/2026").unwrap(),
        NaiveDate::from_ymd_opt(2026, 12, 10).unwrap()
    );
    assert!(parse_exam_date("Dec 10").is_err());
    assert_eq!(date_str_to_weekday_code("2026-12-10"), Some(DayCode::Thursday));
    assert_eq!(date_str_to_weekday_code(""), None);
}

#[test]
fn day_code_parsing() {
    assert_eq!("R".parse::<DayCode>().unwrap(), DayCode::Thursday);
    assert_eq!("u".parse::<DayCode>().unwrap(), DayCode::Sunday);
    assert!("X".parse::<DayCode>().is_err());
    assert!("MW".parse::<DayCode>().is_err());
}

#[test]
fn membership_ignores_order_and_separators() {
    assert!(DayCode::Wednesday.is_in("W M"));
    assert!(DayCode::Friday.is_in("M-W-F"));
    assert!(!DayCode::Tuesday.is_in("MWF"));
}

#[test]
fn meetings_and_canonical_days() {
    assert_eq!(meetings_per_week("MWF"), 3);
    assert_eq!(meetings_per_week("T R"), 2);
    assert_eq!(meetings_per_week(""), 0);
    assert_eq!(canonical_days("t-r"), "TR");
    assert_eq!(canonical_days("M W F"), "MWF");
}

#[test]
fn tba_sentinel() {
    assert!(is_tba("TBA"));
    assert!(is_tba(" tba "));
    assert!(is_tba(""));
    assert!(!is_tba("KC 307"));
}
