//! Sections, final-exam entries, and the error codes attached during validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::time::{date_str_to_weekday_code, is_tba, DayCode, TimeRange};

/// One kind of fault found in a section's final-exam scheduling.
///
/// Declaration order is detection order, which is also the order used by
/// [`Report::summary`](crate::Report::summary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No final-exam entry shares the section's CRN.
    NoFinal,
    /// More than one final-exam entry shares the section's CRN.
    MultipleFinals,
    /// The final falls on a day the class never meets.
    WrongDay,
    /// Same instructor, same final slot, inconsistent regular blocks.
    InstrBlockOverlap,
    /// Instructor's final overlaps another of their finals.
    InstrIntervalOverlap,
    /// Instructor's finals are closer together than the back-to-back buffer.
    InstrBackToBack,
    /// Same room, same final slot, inconsistent regular blocks.
    RoomBlockOverlap,
    /// Room's final overlaps another final in that room.
    RoomIntervalOverlap,
    /// Room has a final starting the minute another one ends.
    RoomBackToBack,
    /// Combined enrollment of a shared room slot exceeds the room's seating.
    RoomCapacityExceeded,
    /// Final differs from the slot the finals grid mandates.
    GridMismatch,
    /// Final room is missing from the room capacity table.
    RoomUnknown,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::NoFinal,
        ErrorCode::MultipleFinals,
        ErrorCode::WrongDay,
        ErrorCode::InstrBlockOverlap,
        ErrorCode::InstrIntervalOverlap,
        ErrorCode::InstrBackToBack,
        ErrorCode::RoomBlockOverlap,
        ErrorCode::RoomIntervalOverlap,
        ErrorCode::RoomBackToBack,
        ErrorCode::RoomCapacityExceeded,
        ErrorCode::GridMismatch,
        ErrorCode::RoomUnknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoFinal => "NO_FINAL",
            ErrorCode::MultipleFinals => "MULTIPLE_FINALS",
            ErrorCode::WrongDay => "WRONG_DAY",
            ErrorCode::InstrBlockOverlap => "INSTR_BLOCK_OVERLAP",
            ErrorCode::InstrIntervalOverlap => "INSTR_INTERVAL_OVERLAP",
            ErrorCode::InstrBackToBack => "INSTR_BACK_TO_BACK",
            ErrorCode::RoomBlockOverlap => "ROOM_BLOCK_OVERLAP",
            ErrorCode::RoomIntervalOverlap => "ROOM_INTERVAL_OVERLAP",
            ErrorCode::RoomBackToBack => "ROOM_BACK_TO_BACK",
            ErrorCode::RoomCapacityExceeded => "ROOM_CAPACITY_EXCEEDED",
            ErrorCode::GridMismatch => "GRID_MISMATCH",
            ErrorCode::RoomUnknown => "ROOM_UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final-exam slot assigned to a section once it has been matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSlot {
    pub day: DayCode,
    /// Canonical `HH:MM-HH:MM`.
    pub time: String,
    pub room: String,
    pub date: String,
}

impl FinalSlot {
    /// The parsed final time, or `None` when it cannot be determined.
    pub fn range(&self) -> Option<TimeRange> {
        TimeRange::parse(&self.time).ok()
    }
}

/// One scheduled offering of a course, plus the annotations added by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Course reference number, unique within a term.
    pub crn: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub course_number: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub campus: String,
    #[serde(default)]
    pub credit_hours: u32,
    #[serde(default)]
    pub enrolled: u32,
    /// Meeting-day pattern over {M,T,W,R,F,S,U}, e.g. `"MWF"`.
    pub days: String,
    /// Regular meeting time, canonical `HH:MM-HH:MM` or `TBA`.
    pub time: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub instructor: String,

    /// Populated by matching; `None` when the section has no usable final.
    #[serde(default)]
    pub final_exam: Option<FinalSlot>,
    /// Fault codes in detection order, without duplicates.
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
}

impl Section {
    /// A minimal active section; remaining fields default to empty/zero.
    pub fn new(crn: &str, days: &str, time: &str) -> Self {
        Self {
            crn: crn.to_string(),
            subject: String::new(),
            course_number: String::new(),
            section: String::new(),
            status: "Active".to_string(),
            campus: String::new(),
            credit_hours: 0,
            enrolled: 0,
            days: days.to_string(),
            time: time.to_string(),
            room: String::new(),
            instructor: String::new(),
            final_exam: None,
            errors: Vec::new(),
        }
    }

    /// Append a code unless the section already carries it.
    pub fn add_error(&mut self, code: ErrorCode) {
        if !self.errors.contains(&code) {
            self.errors.push(code);
        }
    }

    /// Remove a code, returning whether it was present.
    pub fn remove_error(&mut self, code: ErrorCode) -> bool {
        let before = self.errors.len();
        self.errors.retain(|c| *c != code);
        self.errors.len() != before
    }

    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.contains(&code)
    }

    pub fn is_canceled(&self) -> bool {
        let status = self.status.trim();
        status.eq_ignore_ascii_case("Canceled") || status.eq_ignore_ascii_case("Cancelled")
    }

    /// The parsed regular meeting time, or `None` for `TBA`/unparseable.
    pub fn regular_range(&self) -> Option<TimeRange> {
        TimeRange::parse(&self.time).ok()
    }

    /// Clear everything validation writes, so a rerun starts clean.
    pub fn reset(&mut self) {
        self.final_exam = None;
        self.errors.clear();
    }
}

/// One scheduled final-exam slot from the calendar-system export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalExamEntry {
    pub crn: String,
    /// Weekday of the exam. When absent, blank or unrecognized it is derived
    /// from `date`.
    #[serde(default, deserialize_with = "lenient_day")]
    pub day: Option<DayCode>,
    /// Canonical `HH:MM-HH:MM`.
    pub time: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub date: String,
}

impl FinalExamEntry {
    pub fn new(crn: &str, day: DayCode, time: &str, room: &str) -> Self {
        Self {
            crn: crn.to_string(),
            day: Some(day),
            time: time.to_string(),
            room: room.to_string(),
            date: String::new(),
        }
    }

    /// The exam weekday: the explicit code, else the weekday of `date`.
    pub fn weekday(&self) -> Option<DayCode> {
        self.day.or_else(|| date_str_to_weekday_code(&self.date))
    }

    pub fn to_slot(&self, day: DayCode) -> FinalSlot {
        FinalSlot {
            day,
            time: self.time.clone(),
            room: self.room.clone(),
            date: self.date.clone(),
        }
    }
}

/// Read a weekday code without failing the whole export on one bad row.
fn lenient_day<'de, D>(deserializer: D) -> std::result::Result<Option<DayCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match raw.parse::<DayCode>() {
        Ok(day) => Ok(Some(day)),
        Err(_) => {
            warn!(day = %raw, "unrecognized final-exam weekday; deriving it from the date");
            Ok(None)
        }
    }
}

/// Seating capacity per room id. Rooms missing from the table have unknown capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCapacities(BTreeMap<String, u32>);

impl RoomCapacities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object such as `{"KC 307": 45}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, room: &str, capacity: u32) {
        self.0.insert(room.trim().to_string(), capacity);
    }

    /// Capacity of a room; `None` for unknown rooms and for the `TBA` sentinel.
    pub fn get(&self, room: &str) -> Option<u32> {
        if is_tba(room) {
            return None;
        }
        self.0.get(room.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
