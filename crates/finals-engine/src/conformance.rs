//! Compare each matched final against the institutional finals grid.

use tracing::{debug, info};

use crate::config::ValidationConfig;
use crate::grid::{FinalsGrid, GridRule};
use crate::matching::is_stretch_saturday;
use crate::model::{ErrorCode, Section};
use crate::time::{meetings_per_week, DayCode, TimeRange};

/// The grid rule governing a section's regular slot, if any.
///
/// `None` for sections with a `TBA`/unparseable regular time and for
/// non-standard slots the grid does not cover.
pub fn rule_for<'g>(grid: &'g FinalsGrid, section: &Section) -> Option<&'g GridRule> {
    let regular = section.regular_range()?;
    let start = regular.start().format("%H:%M").to_string();
    grid.lookup(
        section.credit_hours,
        meetings_per_week(&section.days),
        &section.days,
        &start,
    )
}

/// Whether a section's final sits where its grid rule says.
fn conforms(rule: &GridRule, day: DayCode, time: &str) -> bool {
    if rule.final_day != day {
        return false;
    }
    match (TimeRange::parse(&rule.final_time), TimeRange::parse(time)) {
        (Ok(expected), Ok(actual)) => expected == actual,
        _ => rule.final_time.trim() == time.trim(),
    }
}

/// Append GRID_MISMATCH to matched sections whose final differs from the
/// mandated grid slot. Stretch courses on Saturday are exempt.
pub fn check_grid(sections: &mut [Section], grid: &FinalsGrid, config: &ValidationConfig) -> usize {
    let mut flagged = 0usize;
    let mut uncovered = 0usize;

    for section in sections.iter_mut() {
        let Some(slot) = section.final_exam.as_ref() else {
            continue;
        };
        let Some(rule) = rule_for(grid, section) else {
            uncovered += 1;
            continue;
        };
        if conforms(rule, slot.day, &slot.time) || is_stretch_saturday(section, slot.day, config) {
            continue;
        }
        debug!(
            crn = %section.crn,
            code = %ErrorCode::GridMismatch,
            expected_day = %rule.final_day,
            expected_time = %rule.final_time,
            actual_day = %slot.day,
            actual_time = %slot.time,
            "final off the finals grid"
        );
        section.add_error(ErrorCode::GridMismatch);
        flagged += 1;
    }

    info!(flagged, uncovered, "grid conformance done");
    flagged
}
