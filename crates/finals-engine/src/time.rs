//! Time-of-day normalization, canonical time ranges, and weekday codes.
//!
//! Registrar exports encode meeting times either as glued 12-hour blocks with a
//! single trailing meridiem (`"0800-0915AM"`, `"0930-1045PM"`) or as canonical
//! 24-hour ranges (`"08:00-09:15"`). Everything downstream works on the canonical
//! form. The `TBA` sentinel and anything else non-numeric pass through untouched.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Sentinel used by registrar exports for unscheduled times and rooms.
pub const TBA: &str = "TBA";

/// True for the `TBA` sentinel and for blank fields.
pub fn is_tba(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(TBA)
}

/// Single-letter weekday code used by registrar meeting patterns.
///
/// Thursday is `R` and Sunday is `U`, so every day has a distinct letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayCode {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "R")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
    #[serde(rename = "S")]
    Saturday,
    #[serde(rename = "U")]
    Sunday,
}

impl DayCode {
    /// Parse a single pattern letter. Case-insensitive.
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            'M' => Ok(DayCode::Monday),
            'T' => Ok(DayCode::Tuesday),
            'W' => Ok(DayCode::Wednesday),
            'R' => Ok(DayCode::Thursday),
            'F' => Ok(DayCode::Friday),
            'S' => Ok(DayCode::Saturday),
            'U' => Ok(DayCode::Sunday),
            other => Err(EngineError::InvalidDay(other.to_string())),
        }
    }

    pub fn letter(self) -> char {
        match self {
            DayCode::Monday => 'M',
            DayCode::Tuesday => 'T',
            DayCode::Wednesday => 'W',
            DayCode::Thursday => 'R',
            DayCode::Friday => 'F',
            DayCode::Saturday => 'S',
            DayCode::Sunday => 'U',
        }
    }

    /// Whether this day is one of the letters of a meeting pattern such as `"MWF"`.
    ///
    /// Membership only; letter order and separators in the pattern are irrelevant.
    pub fn is_in(self, pattern: &str) -> bool {
        pattern
            .chars()
            .any(|c| c.to_ascii_uppercase() == self.letter())
    }
}

impl From<Weekday> for DayCode {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayCode::Monday,
            Weekday::Tue => DayCode::Tuesday,
            Weekday::Wed => DayCode::Wednesday,
            Weekday::Thu => DayCode::Thursday,
            Weekday::Fri => DayCode::Friday,
            Weekday::Sat => DayCode::Saturday,
            Weekday::Sun => DayCode::Sunday,
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for DayCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => DayCode::from_letter(letter),
            _ => Err(EngineError::InvalidDay(s.to_string())),
        }
    }
}

/// Map a calendar date to its weekday code.
pub fn date_to_weekday_code(date: NaiveDate) -> DayCode {
    DayCode::from(date.weekday())
}

/// Parse an exam date in `YYYY-MM-DD` or `MM/DD/YYYY` form.
pub fn parse_exam_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_err(|_| EngineError::InvalidDate(raw.to_string()))
}

/// Weekday code for a date string, or `None` when the date cannot be read.
pub fn date_str_to_weekday_code(raw: &str) -> Option<DayCode> {
    parse_exam_date(raw).ok().map(date_to_weekday_code)
}

/// The distinct weekday letters of a meeting pattern, separators dropped.
fn pattern_days(pattern: &str) -> BTreeSet<DayCode> {
    pattern
        .chars()
        .filter_map(|c| DayCode::from_letter(c).ok())
        .collect()
}

/// Number of class meetings per week implied by a day pattern (`"M W F"` → 3).
pub fn meetings_per_week(pattern: &str) -> usize {
    pattern_days(pattern).len()
}

/// A day pattern with separators removed and letters upper-cased (`"t-r"` → `"TR"`).
///
/// Letter order is preserved; this is the form used as a finals-grid key.
pub fn canonical_days(pattern: &str) -> String {
    pattern
        .chars()
        .filter_map(|c| DayCode::from_letter(c).ok())
        .map(DayCode::letter)
        .collect()
}

/// A parsed `HH:MM-HH:MM` time-of-day range within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Build a range, rejecting one whose end precedes its start.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end < start {
            return Err(EngineError::InvalidTime(format!(
                "{}-{} ends before it starts",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse the canonical `HH:MM-HH:MM` form.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTime(raw.to_string());
        let (start, end) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| invalid())?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        minutes_of_day(self.end) - minutes_of_day(self.start)
    }

    /// Half-open overlap test with both end instants pushed out by `buffer_minutes`.
    ///
    /// With a zero buffer two ranges overlap iff `other.end > self.start` and
    /// `other.start < self.end`, so contiguous ranges do not overlap. The test is
    /// symmetric for any buffer. Arithmetic is in minutes from midnight, so a
    /// buffer never wraps past 24:00.
    pub fn overlaps(&self, other: &TimeRange, buffer_minutes: i64) -> bool {
        let self_start = minutes_of_day(self.start);
        let self_end = minutes_of_day(self.end).saturating_add(buffer_minutes);
        let other_start = minutes_of_day(other.start);
        let other_end = minutes_of_day(other.end).saturating_add(buffer_minutes);
        other_end > self_start && other_start < self_end
    }

    /// Zero-gap contiguity: one range starts exactly where the other ends.
    pub fn is_adjacent_to(&self, other: &TimeRange) -> bool {
        self.start == other.end || self.end == other.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        TimeRange::parse(s)
    }
}

fn minutes_of_day(t: NaiveTime) -> i64 {
    i64::from(t.num_seconds_from_midnight() / 60)
}

/// Convert a raw registrar time into canonical `HH:MM-HH:MM` 24-hour form.
///
/// Accepts glued 12-hour blocks (`"0930-1045PM"` → `"21:30-22:45"`) and canonical
/// ranges. A `PM` suffix applies to the end hour unless it is already 12 or
/// later, and to the start hour only when that keeps the start at or before the
/// converted end hour (`"1100-1215PM"` → `"11:00-12:15"`).
///
/// Never fails: `TBA`, blanks and anything unparseable come back unchanged.
pub fn normalize_time(raw: &str) -> String {
    convert_block(raw).unwrap_or_else(|| raw.to_string())
}

fn convert_block(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if let Ok(range) = TimeRange::parse(&compact) {
        return Some(range.to_string());
    }

    let (body, pm) = match compact.strip_suffix("PM") {
        Some(body) => (body, true),
        None => (compact.strip_suffix("AM").unwrap_or(compact.as_str()), false),
    };

    let (start, end) = body.split_once('-')?;
    let (mut start_hour, start_min) = split_hhmm(start)?;
    let (mut end_hour, end_min) = split_hhmm(end)?;

    if pm {
        if end_hour < 12 {
            end_hour += 12;
        }
        if start_hour + 12 <= end_hour {
            start_hour += 12;
        }
    }

    let start = NaiveTime::from_hms_opt(start_hour, start_min, 0)?;
    let end = NaiveTime::from_hms_opt(end_hour, end_min, 0)?;
    TimeRange::new(start, end).ok().map(|r| r.to_string())
}

/// `"0915"` or `"09:15"` → `(9, 15)`.
fn split_hhmm(part: &str) -> Option<(u32, u32)> {
    let digits: String = part.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour = digits[..2].parse().ok()?;
    let minute = digits[2..].parse().ok()?;
    Some((hour, minute))
}
