//! The validation pipeline and its annotated output.
//!
//! Passes run in a fixed order, each appending codes to the sections it
//! touches: matching → overlaps → capacity → grid → unknown rooms. Because
//! codes are appended in that order and never duplicated, each section's
//! `errors` is already the assembled, first-seen-ordered report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capacity::{flag_unknown_rooms, reconcile_capacity};
use crate::config::ValidationConfig;
use crate::conformance::check_grid;
use crate::grid::FinalsGrid;
use crate::matching::match_finals;
use crate::model::{ErrorCode, FinalExamEntry, RoomCapacities, Section};
use crate::overlap::detect_overlaps;

/// Every input section, annotated, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    /// Number of sections carrying each code. Codes nobody carries are omitted.
    pub fn summary(&self) -> BTreeMap<ErrorCode, usize> {
        let mut counts = BTreeMap::new();
        for code in self.sections.iter().flat_map(|s| s.errors.iter()) {
            *counts.entry(*code).or_insert(0) += 1;
        }
        counts
    }

    /// Sections with at least one code.
    pub fn flagged(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.errors.is_empty())
    }

    pub fn is_clean(&self) -> bool {
        self.sections.iter().all(|s| s.errors.is_empty())
    }

    pub fn find(&self, crn: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.crn == crn)
    }
}

/// Validate a final-exam schedule against the regular class schedule.
///
/// Derived fields on the incoming sections are reset first, so feeding a
/// report's sections back in gives the same report.
pub fn validate(
    mut sections: Vec<Section>,
    finals: &[FinalExamEntry],
    capacities: &RoomCapacities,
    grid: &FinalsGrid,
    config: &ValidationConfig,
) -> Report {
    for section in &mut sections {
        section.reset();
    }

    match_finals(&mut sections, finals, config);
    detect_overlaps(&mut sections, config);
    reconcile_capacity(&mut sections, capacities);
    check_grid(&mut sections, grid, config);
    flag_unknown_rooms(&mut sections, capacities);

    let report = Report { sections };
    info!(
        sections = report.sections.len(),
        flagged = report.flagged().count(),
        "validation finished"
    );
    report
}
