//! The institutional finals grid.
//!
//! The grid maps a regular class slot (credit hours, meetings per week, day
//! pattern, class start time) to the final-exam day and time the institution
//! mandates for it. It is a policy artifact, so it is kept as an enumerated
//! table rather than derived. Lookup is exact on all four keys; a miss is the
//! normal outcome for independent studies and other non-standard sections.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::{canonical_days, meetings_per_week, DayCode, TimeRange};

use crate::time::DayCode::{Monday, Thursday, Tuesday, Wednesday};

/// One row of the finals grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRule {
    pub credit_hours: u32,
    pub meetings_per_week: usize,
    /// Day pattern, e.g. `"MWF"`.
    pub days: String,
    /// Class start time, `HH:MM`.
    pub start: String,
    pub final_day: DayCode,
    /// Mandated final time, `HH:MM-HH:MM`.
    pub final_time: String,
}

/// Exact-match lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    pub credit_hours: u32,
    pub meetings_per_week: usize,
    pub days: String,
    pub start: NaiveTime,
}

impl GridKey {
    /// Build a key, normalizing the day pattern and start time.
    ///
    /// Returns `None` when `start` is not an `HH:MM` time.
    pub fn new(credit_hours: u32, meetings_per_week: usize, days: &str, start: &str) -> Option<Self> {
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        Some(Self {
            credit_hours,
            meetings_per_week,
            days: canonical_days(days),
            start,
        })
    }
}

/// The loaded finals grid, indexed for exact lookup.
#[derive(Debug, Clone, Default)]
pub struct FinalsGrid {
    rules: HashMap<GridKey, GridRule>,
}

impl FinalsGrid {
    /// The institution's built-in grid, built once per process.
    pub fn standard() -> &'static FinalsGrid {
        static STANDARD: OnceLock<FinalsGrid> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut rules = HashMap::with_capacity(STANDARD_GRID.len());
            for &(credit_hours, days, start, final_day, final_time) in STANDARD_GRID {
                let rule = GridRule {
                    credit_hours,
                    meetings_per_week: meetings_per_week(days),
                    days: days.to_string(),
                    start: start.to_string(),
                    final_day,
                    final_time: final_time.to_string(),
                };
                if let Some(key) = GridKey::new(
                    rule.credit_hours,
                    rule.meetings_per_week,
                    &rule.days,
                    &rule.start,
                ) {
                    rules.insert(key, rule);
                }
            }
            FinalsGrid { rules }
        })
    }

    /// Build a grid from caller-supplied rows.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidGrid` when a row has an unparseable start or
    /// final time, a `meetings_per_week` that disagrees with its day pattern, or
    /// a key already used by an earlier row.
    pub fn from_rules(rules: Vec<GridRule>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        for (row, rule) in rules.into_iter().enumerate() {
            let invalid = |message: String| EngineError::InvalidGrid { row, message };

            let key = GridKey::new(
                rule.credit_hours,
                rule.meetings_per_week,
                &rule.days,
                &rule.start,
            )
            .ok_or_else(|| invalid(format!("start time '{}' is not HH:MM", rule.start)))?;

            if meetings_per_week(&rule.days) != rule.meetings_per_week {
                return Err(invalid(format!(
                    "meetings_per_week {} does not match day pattern '{}'",
                    rule.meetings_per_week, rule.days
                )));
            }
            TimeRange::parse(&rule.final_time)
                .map_err(|e| invalid(e.to_string()))?;

            if index.insert(key, rule).is_some() {
                return Err(invalid("duplicate grid key".to_string()));
            }
        }
        Ok(FinalsGrid { rules: index })
    }

    /// Load a grid from a JSON array of [`GridRule`] objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<GridRule> = serde_json::from_str(json)?;
        Self::from_rules(rules)
    }

    /// Exact four-key lookup.
    pub fn lookup(
        &self,
        credit_hours: u32,
        meetings_per_week: usize,
        days: &str,
        start: &str,
    ) -> Option<&GridRule> {
        let key = GridKey::new(credit_hours, meetings_per_week, days, start)?;
        self.rules.get(&key)
    }

    /// All rows, sorted by key.
    pub fn rules(&self) -> Vec<&GridRule> {
        let mut keyed: Vec<(&GridKey, &GridRule)> = self.rules.iter().collect();
        keyed.sort_by(|a, b| a.0.cmp(b.0));
        keyed.into_iter().map(|(_, rule)| rule).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// (credit hours, day pattern, class start, final day, final time)
///
/// Final slots: 08:00-10:00, 10:30-12:30, 13:00-15:00, 15:30-17:30, 18:00-20:00.
#[rustfmt::skip]
const STANDARD_GRID: &[(u32, &str, &str, DayCode, &str)] = &[
    // 2 credits, Monday/Wednesday
    (2, "MW", "08:00", Monday, "08:00-10:00"),
    (2, "MW", "09:30", Wednesday, "08:00-10:00"),
    (2, "MW", "11:00", Wednesday, "10:30-12:30"),
    (2, "MW", "12:30", Monday, "13:00-15:00"),
    (2, "MW", "14:00", Monday, "15:30-17:30"),
    (2, "MW", "15:30", Wednesday, "15:30-17:30"),
    (2, "MW", "17:30", Monday, "18:00-20:00"),
    (2, "MW", "19:00", Wednesday, "18:00-20:00"),
    // 2 credits, Tuesday/Thursday
    (2, "TR", "08:00", Tuesday, "08:00-10:00"),
    (2, "TR", "09:30", Thursday, "08:00-10:00"),
    (2, "TR", "11:00", Tuesday, "10:30-12:30"),
    (2, "TR", "12:30", Thursday, "10:30-12:30"),
    (2, "TR", "14:00", Tuesday, "13:00-15:00"),
    (2, "TR", "15:30", Thursday, "13:00-15:00"),
    (2, "TR", "17:30", Tuesday, "18:00-20:00"),
    (2, "TR", "19:00", Thursday, "18:00-20:00"),
    // 2 credits, one evening meeting
    (2, "M", "17:30", Monday, "18:00-20:00"),
    (2, "M", "18:00", Monday, "18:00-20:00"),
    (2, "T", "17:30", Tuesday, "18:00-20:00"),
    (2, "T", "18:00", Tuesday, "18:00-20:00"),
    (2, "W", "17:30", Wednesday, "18:00-20:00"),
    (2, "W", "18:00", Wednesday, "18:00-20:00"),
    (2, "R", "17:30", Thursday, "18:00-20:00"),
    (2, "R", "18:00", Thursday, "18:00-20:00"),
    // 3 credits, Monday/Wednesday
    (3, "MW", "08:00", Monday, "08:00-10:00"),
    (3, "MW", "09:30", Wednesday, "08:00-10:00"),
    (3, "MW", "11:00", Wednesday, "10:30-12:30"),
    (3, "MW", "12:30", Monday, "13:00-15:00"),
    (3, "MW", "14:00", Monday, "15:30-17:30"),
    (3, "MW", "15:30", Wednesday, "15:30-17:30"),
    (3, "MW", "17:30", Monday, "18:00-20:00"),
    (3, "MW", "19:00", Wednesday, "18:00-20:00"),
    // 3 credits, Tuesday/Thursday
    (3, "TR", "08:00", Tuesday, "08:00-10:00"),
    (3, "TR", "09:30", Thursday, "08:00-10:00"),
    (3, "TR", "11:00", Tuesday, "10:30-12:30"),
    (3, "TR", "12:30", Thursday, "10:30-12:30"),
    (3, "TR", "14:00", Tuesday, "13:00-15:00"),
    (3, "TR", "15:30", Thursday, "13:00-15:00"),
    (3, "TR", "17:30", Tuesday, "18:00-20:00"),
    (3, "TR", "19:00", Thursday, "18:00-20:00"),
    // 3 credits, Monday/Wednesday/Friday
    (3, "MWF", "08:00", Monday, "08:00-10:00"),
    (3, "MWF", "09:00", Wednesday, "08:00-10:00"),
    (3, "MWF", "10:00", Monday, "10:30-12:30"),
    (3, "MWF", "11:00", Wednesday, "10:30-12:30"),
    (3, "MWF", "12:00", Monday, "13:00-15:00"),
    (3, "MWF", "13:00", Wednesday, "13:00-15:00"),
    (3, "MWF", "14:00", Monday, "15:30-17:30"),
    (3, "MWF", "15:00", Wednesday, "15:30-17:30"),
    // 3 credits, one evening meeting
    (3, "M", "17:30", Monday, "18:00-20:00"),
    (3, "M", "18:00", Monday, "18:00-20:00"),
    (3, "T", "17:30", Tuesday, "18:00-20:00"),
    (3, "T", "18:00", Tuesday, "18:00-20:00"),
    (3, "W", "17:30", Wednesday, "18:00-20:00"),
    (3, "W", "18:00", Wednesday, "18:00-20:00"),
    (3, "R", "17:30", Thursday, "18:00-20:00"),
    (3, "R", "18:00", Thursday, "18:00-20:00"),
    // 4 credits, Monday/Wednesday
    (4, "MW", "08:00", Monday, "08:00-10:00"),
    (4, "MW", "09:30", Wednesday, "08:00-10:00"),
    (4, "MW", "11:00", Wednesday, "10:30-12:30"),
    (4, "MW", "12:30", Monday, "13:00-15:00"),
    (4, "MW", "14:00", Monday, "15:30-17:30"),
    (4, "MW", "15:30", Wednesday, "15:30-17:30"),
    (4, "MW", "17:30", Monday, "18:00-20:00"),
    (4, "MW", "19:00", Wednesday, "18:00-20:00"),
    // 4 credits, Tuesday/Thursday
    (4, "TR", "08:00", Tuesday, "08:00-10:00"),
    (4, "TR", "09:30", Thursday, "08:00-10:00"),
    (4, "TR", "11:00", Tuesday, "10:30-12:30"),
    (4, "TR", "12:30", Thursday, "10:30-12:30"),
    (4, "TR", "14:00", Tuesday, "13:00-15:00"),
    (4, "TR", "15:30", Thursday, "13:00-15:00"),
    (4, "TR", "17:30", Tuesday, "18:00-20:00"),
    (4, "TR", "19:00", Thursday, "18:00-20:00"),
    // 4 credits, Monday/Wednesday/Friday
    (4, "MWF", "08:00", Monday, "08:00-10:00"),
    (4, "MWF", "09:00", Wednesday, "08:00-10:00"),
    (4, "MWF", "10:00", Monday, "10:30-12:30"),
    (4, "MWF", "11:00", Wednesday, "10:30-12:30"),
    (4, "MWF", "12:00", Monday, "13:00-15:00"),
    (4, "MWF", "13:00", Wednesday, "13:00-15:00"),
    (4, "MWF", "14:00", Monday, "15:30-17:30"),
    (4, "MWF", "15:00", Wednesday, "15:30-17:30"),
    // 4 credits, one evening meeting
    (4, "M", "17:30", Monday, "18:00-20:00"),
    (4, "M", "18:00", Monday, "18:00-20:00"),
    (4, "T", "17:30", Tuesday, "18:00-20:00"),
    (4, "T", "18:00", Tuesday, "18:00-20:00"),
    (4, "W", "17:30", Wednesday, "18:00-20:00"),
    (4, "W", "18:00", Wednesday, "18:00-20:00"),
    (4, "R", "17:30", Thursday, "18:00-20:00"),
    (4, "R", "18:00", Thursday, "18:00-20:00"),
    // 5 credits, Monday/Wednesday/Friday
    (5, "MWF", "08:00", Monday, "08:00-10:00"),
    (5, "MWF", "09:00", Wednesday, "08:00-10:00"),
    (5, "MWF", "10:00", Monday, "10:30-12:30"),
    (5, "MWF", "11:00", Wednesday, "10:30-12:30"),
    (5, "MWF", "12:00", Monday, "13:00-15:00"),
    (5, "MWF", "13:00", Wednesday, "13:00-15:00"),
    (5, "MWF", "14:00", Monday, "15:30-17:30"),
    (5, "MWF", "15:00", Wednesday, "15:30-17:30"),
];
