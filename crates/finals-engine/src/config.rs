//! Validation parameters supplied by the institution rather than hardcoded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default instructor back-to-back buffer, in minutes.
pub const DEFAULT_BACK_TO_BACK_BUFFER_MINUTES: i64 = 15;

/// Largest accepted buffer: one whole day.
pub const MAX_BACK_TO_BACK_BUFFER_MINUTES: i64 = 24 * 60;

/// Parameters for one validation run.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Course numbers whose finals may sit on the Saturday before finals week.
    pub stretch_course_numbers: BTreeSet<String>,
    /// Minimum gap between one instructor's consecutive finals.
    pub back_to_back_buffer_minutes: i64,
    /// Validate canceled sections too. When false they pass through unannotated.
    pub include_canceled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            stretch_course_numbers: BTreeSet::new(),
            back_to_back_buffer_minutes: DEFAULT_BACK_TO_BACK_BUFFER_MINUTES,
            include_canceled: false,
        }
    }
}

impl ValidationConfig {
    /// Parse a config file and check its values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        check_buffer(config.back_to_back_buffer_minutes)?;
        Ok(config)
    }

    /// Builder-style setter for the stretch course numbers.
    pub fn with_stretch_courses<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stretch_course_numbers = numbers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the back-to-back buffer. Must lie in `0..=1440`.
    pub fn with_buffer_minutes(mut self, minutes: i64) -> Result<Self> {
        check_buffer(minutes)?;
        self.back_to_back_buffer_minutes = minutes;
        Ok(self)
    }

    pub fn is_stretch_course(&self, course_number: &str) -> bool {
        self.stretch_course_numbers.contains(course_number.trim())
    }
}

fn check_buffer(minutes: i64) -> Result<()> {
    if (0..=MAX_BACK_TO_BACK_BUFFER_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "back_to_back_buffer_minutes must be between 0 and {}, got {}",
            MAX_BACK_TO_BACK_BUFFER_MINUTES, minutes
        )))
    }
}
