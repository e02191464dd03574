//! Room-capacity reconciliation.
//!
//! A block overlap often turns out to be a deliberate combined-seating final:
//! several sections share one room at one time and the room holds them all.
//! This pass looks at every (room, day, final time) slot and every
//! (instructor, day, final time) slot, sums the enrollment of the sections in
//! it, and drops the block-overlap flag when the room has a known capacity that
//! is not exceeded. Unknown rooms never have their flags removed.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::model::{ErrorCode, RoomCapacities, Section};
use crate::overlap::Resource;
use crate::time::DayCode;

type SlotKey = (String, DayCode, String);

/// Matched sections grouped by (resource, final day, final time).
fn slot_groups(sections: &[Section], resource: Resource) -> BTreeMap<SlotKey, Vec<usize>> {
    let mut groups: BTreeMap<SlotKey, Vec<usize>> = BTreeMap::new();
    for (i, section) in sections.iter().enumerate() {
        let (Some(key), Some(slot)) = (resource.key(section), section.final_exam.as_ref()) else {
            continue;
        };
        groups
            .entry((key.to_string(), slot.day, slot.time.trim().to_string()))
            .or_default()
            .push(i);
    }
    groups
}

fn total_enrolled(sections: &[Section], members: &[usize]) -> u64 {
    members.iter().map(|&i| u64::from(sections[i].enrolled)).sum()
}

/// The single final room shared by every member, if there is exactly one.
fn shared_room<'a>(sections: &'a [Section], members: &[usize]) -> Option<&'a str> {
    let rooms: BTreeSet<&str> = members
        .iter()
        .filter_map(|&i| sections[i].final_exam.as_ref())
        .map(|slot| slot.room.trim())
        .collect();
    match rooms.len() {
        1 => rooms.into_iter().next(),
        _ => None,
    }
}

/// Suppress block overlaps that fit in their room; flag room slots whose
/// combined enrollment exceeds seating.
pub fn reconcile_capacity(sections: &mut [Section], capacities: &RoomCapacities) {
    let mut suppressed = 0usize;
    let mut exceeded = 0usize;

    for ((room, _, _), members) in slot_groups(sections, Resource::Room) {
        let Some(capacity) = capacities.get(&room) else {
            continue;
        };
        let total = total_enrolled(sections, &members);
        if total <= u64::from(capacity) {
            suppressed += clear(sections, &members, ErrorCode::RoomBlockOverlap);
        } else {
            for &i in &members {
                debug!(
                    crn = %sections[i].crn,
                    code = %ErrorCode::RoomCapacityExceeded,
                    room = %room,
                    total,
                    capacity,
                    "room slot over capacity"
                );
                sections[i].add_error(ErrorCode::RoomCapacityExceeded);
            }
            exceeded += members.len();
        }
    }

    for (_, members) in slot_groups(sections, Resource::Instructor) {
        if !members
            .iter()
            .any(|&i| sections[i].has_error(ErrorCode::InstrBlockOverlap))
        {
            continue;
        }
        let Some(capacity) = shared_room(sections, &members).and_then(|room| capacities.get(room))
        else {
            continue;
        };
        if total_enrolled(sections, &members) <= u64::from(capacity) {
            suppressed += clear(sections, &members, ErrorCode::InstrBlockOverlap);
        }
    }

    info!(suppressed, exceeded, "capacity reconciliation done");
}

fn clear(sections: &mut [Section], members: &[usize], code: ErrorCode) -> usize {
    let mut cleared = 0;
    for &i in members {
        if sections[i].remove_error(code) {
            debug!(crn = %sections[i].crn, code = %code, "suppressed; room holds the combined slot");
            cleared += 1;
        }
    }
    cleared
}

/// Flag matched sections whose final room is a real room missing from the
/// capacity table.
pub fn flag_unknown_rooms(sections: &mut [Section], capacities: &RoomCapacities) -> usize {
    let mut flagged = 0;
    for section in sections.iter_mut() {
        let unknown = Resource::Room
            .key(section)
            .is_some_and(|room| capacities.get(room).is_none());
        if unknown {
            section.add_error(ErrorCode::RoomUnknown);
            flagged += 1;
        }
    }
    flagged
}
