//! Pair each section with its final-exam entry.
//!
//! A section must have exactly one final. Zero or several entries for a CRN are
//! terminal faults for that section: its final fields stay empty and every later
//! pass skips it. With exactly one entry the section is matched and its final
//! fields are filled in; the final's weekday must also be one of the class's
//! meeting days, except that stretch courses may hold their final on the
//! Saturday before finals week. A wrong-day final is still matched: it still
//! occupies its room and its instructor, so the later passes see it.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::ValidationConfig;
use crate::model::{ErrorCode, FinalExamEntry, Section};
use crate::time::DayCode;

/// Index final-exam entries by CRN.
pub fn index_finals(finals: &[FinalExamEntry]) -> HashMap<&str, Vec<&FinalExamEntry>> {
    let mut index: HashMap<&str, Vec<&FinalExamEntry>> = HashMap::new();
    for entry in finals {
        index.entry(entry.crn.trim()).or_default().push(entry);
    }
    index
}

/// Whether a final on `day` is sanctioned for this section despite the class
/// never meeting that day.
pub fn is_stretch_saturday(section: &Section, day: DayCode, config: &ValidationConfig) -> bool {
    day == DayCode::Saturday && config.is_stretch_course(&section.course_number)
}

/// Match every section against the finals export, populating `final_exam` and
/// appending NO_FINAL, MULTIPLE_FINALS or WRONG_DAY.
///
/// Sections flagged WRONG_DAY still carry their `final_exam` in the report; a
/// populated final is not a sign that the section is clean.
///
/// Canceled sections are left untouched unless `config.include_canceled` is set.
pub fn match_finals(sections: &mut [Section], finals: &[FinalExamEntry], config: &ValidationConfig) {
    let index = index_finals(finals);
    let mut matched = 0usize;

    for section in sections.iter_mut() {
        if section.is_canceled() && !config.include_canceled {
            continue;
        }

        let entries = index
            .get(section.crn.trim())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let entry = match entries {
            [] => {
                debug!(crn = %section.crn, code = %ErrorCode::NoFinal, "no final-exam entry");
                section.add_error(ErrorCode::NoFinal);
                continue;
            }
            [entry] => *entry,
            _ => {
                debug!(
                    crn = %section.crn,
                    code = %ErrorCode::MultipleFinals,
                    count = entries.len(),
                    "several final-exam entries"
                );
                section.add_error(ErrorCode::MultipleFinals);
                continue;
            }
        };

        let Some(day) = entry.weekday() else {
            warn!(crn = %section.crn, date = %entry.date, "final has no readable weekday; skipping");
            continue;
        };

        if !day.is_in(&section.days) && !is_stretch_saturday(section, day, config) {
            debug!(
                crn = %section.crn,
                code = %ErrorCode::WrongDay,
                day = %day,
                days = %section.days,
                "final falls outside the meeting days"
            );
            section.add_error(ErrorCode::WrongDay);
        }
        section.final_exam = Some(entry.to_slot(day));
        matched += 1;
    }

    info!(sections = sections.len(), matched, "matched sections to finals");
}
