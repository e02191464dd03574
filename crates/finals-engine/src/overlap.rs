//! Instructor and room double-booking detection.
//!
//! Matched sections are bucketed by (resource, final weekday), where the
//! resource is either the instructor or the final-exam room. Each bucket with
//! more than one section is then checked by independent passes:
//!
//! - **block**: the bucket has a different number of distinct regular times than
//!   distinct final times, meaning sections were merged into (or split across)
//!   final slots inconsistently with their regular blocks;
//! - **interval**: two distinct final ranges overlap under the half-open test;
//! - **back-to-back**: same as interval with both ends pushed out by a buffer;
//! - **adjacency**: one distinct final range starts exactly when another ends.
//!
//! Identical final ranges collapse to one distinct range, so sections sharing a
//! slot are only ever caught by the block pass.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::ValidationConfig;
use crate::model::{ErrorCode, Section};
use crate::time::{is_tba, DayCode, TimeRange};

/// Instructor names that stand for "not yet assigned".
const PLACEHOLDER_INSTRUCTORS: &[&str] = &["TBA", "STAFF", "TBD"];

/// Which shared resource a sweep groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Instructor,
    Room,
}

impl Resource {
    /// The bucket key for a matched section, or `None` when it has no real
    /// resource to collide on (unmatched, placeholder instructor, `TBA` room).
    pub fn key(self, section: &Section) -> Option<&str> {
        let slot = section.final_exam.as_ref()?;
        let key = match self {
            Resource::Instructor => section.instructor.trim(),
            Resource::Room => slot.room.trim(),
        };
        let placeholder = match self {
            Resource::Instructor => {
                key.is_empty()
                    || PLACEHOLDER_INSTRUCTORS
                        .iter()
                        .any(|p| key.eq_ignore_ascii_case(p))
            }
            Resource::Room => is_tba(key),
        };
        (!placeholder).then_some(key)
    }

    pub fn block_code(self) -> ErrorCode {
        match self {
            Resource::Instructor => ErrorCode::InstrBlockOverlap,
            Resource::Room => ErrorCode::RoomBlockOverlap,
        }
    }

    pub fn interval_code(self) -> ErrorCode {
        match self {
            Resource::Instructor => ErrorCode::InstrIntervalOverlap,
            Resource::Room => ErrorCode::RoomIntervalOverlap,
        }
    }
}

/// Indices of matched sections per (resource, final weekday), keeping only
/// buckets with more than one section.
fn buckets(sections: &[Section], resource: Resource) -> BTreeMap<(String, DayCode), Vec<usize>> {
    let mut buckets: BTreeMap<(String, DayCode), Vec<usize>> = BTreeMap::new();
    for (i, section) in sections.iter().enumerate() {
        let (Some(key), Some(slot)) = (resource.key(section), section.final_exam.as_ref()) else {
            continue;
        };
        buckets.entry((key.to_string(), slot.day)).or_default().push(i);
    }
    buckets.retain(|_, members| members.len() > 1);
    buckets
}

/// Group bucket members by their parsed final range. Members whose final time
/// cannot be parsed are left out.
fn by_final_range(sections: &[Section], members: &[usize]) -> BTreeMap<TimeRange, Vec<usize>> {
    let mut ranges: BTreeMap<TimeRange, Vec<usize>> = BTreeMap::new();
    for &i in members {
        if let Some(range) = sections[i].final_exam.as_ref().and_then(|slot| slot.range()) {
            ranges.entry(range).or_default().push(i);
        }
    }
    ranges
}

fn apply(sections: &mut [Section], flagged: BTreeSet<usize>, code: ErrorCode) -> usize {
    for &i in &flagged {
        debug!(crn = %sections[i].crn, code = %code, "overlap");
        sections[i].add_error(code);
    }
    flagged.len()
}

/// Flag every section in a bucket whose distinct-regular-time count differs
/// from its distinct-final-time count.
pub fn flag_block_overlaps(sections: &mut [Section], resource: Resource) -> usize {
    let mut flagged = BTreeSet::new();
    for members in buckets(sections, resource).into_values() {
        let regular: BTreeSet<&str> = members.iter().map(|&i| sections[i].time.trim()).collect();
        let finals: BTreeSet<&str> = members
            .iter()
            .filter_map(|&i| sections[i].final_exam.as_ref())
            .map(|slot| slot.time.trim())
            .collect();
        if regular.len() != finals.len() {
            flagged.extend(members);
        }
    }
    apply(sections, flagged, resource.block_code())
}

/// Flag sections whose distinct final range overlaps at least one other
/// distinct range in the same bucket, with ends extended by `buffer_minutes`.
///
/// A zero buffer is the plain interval-overlap pass; a positive buffer is the
/// back-to-back pass.
pub fn sweep_overlaps(
    sections: &mut [Section],
    resource: Resource,
    buffer_minutes: i64,
    code: ErrorCode,
) -> usize {
    let mut flagged = BTreeSet::new();
    for members in buckets(sections, resource).into_values() {
        let ranges: Vec<(TimeRange, Vec<usize>)> =
            by_final_range(sections, &members).into_iter().collect();
        for (i, (range, holders)) in ranges.iter().enumerate() {
            let hit = ranges
                .iter()
                .enumerate()
                .any(|(k, (other, _))| k != i && range.overlaps(other, buffer_minutes));
            if hit {
                flagged.extend(holders.iter().copied());
            }
        }
    }
    apply(sections, flagged, code)
}

/// Flag sections whose distinct final range is contiguous with another
/// distinct range in the same bucket (zero gap).
pub fn flag_adjacent(sections: &mut [Section], resource: Resource, code: ErrorCode) -> usize {
    let mut flagged = BTreeSet::new();
    for members in buckets(sections, resource).into_values() {
        let ranges: Vec<(TimeRange, Vec<usize>)> =
            by_final_range(sections, &members).into_iter().collect();
        for (i, (range, holders)) in ranges.iter().enumerate() {
            let hit = ranges
                .iter()
                .enumerate()
                .any(|(k, (other, _))| k != i && range.is_adjacent_to(other));
            if hit {
                flagged.extend(holders.iter().copied());
            }
        }
    }
    apply(sections, flagged, code)
}

/// Run all instructor passes, then all room passes.
pub fn detect_overlaps(sections: &mut [Section], config: &ValidationConfig) {
    let instr_block = flag_block_overlaps(sections, Resource::Instructor);
    let instr_interval = sweep_overlaps(
        sections,
        Resource::Instructor,
        0,
        Resource::Instructor.interval_code(),
    );
    let instr_b2b = sweep_overlaps(
        sections,
        Resource::Instructor,
        config.back_to_back_buffer_minutes,
        ErrorCode::InstrBackToBack,
    );

    let room_block = flag_block_overlaps(sections, Resource::Room);
    let room_interval = sweep_overlaps(sections, Resource::Room, 0, Resource::Room.interval_code());
    let room_b2b = flag_adjacent(sections, Resource::Room, ErrorCode::RoomBackToBack);

    info!(
        instr_block,
        instr_interval, instr_b2b, room_block, room_interval, room_b2b, "overlap passes done"
    );
}
