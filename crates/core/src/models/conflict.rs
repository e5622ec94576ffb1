use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timetable::{TimetableEntry, Weekday};

/// Payload of a single conflict check: "would this teacher or room be
/// double-booked at this day and slot?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    pub teacher_id: Option<Uuid>,
    pub day_of_week: Weekday,
    pub time_slot_id: String,
    pub room_number: Option<String>,
    pub exclude_entry_id: Option<Uuid>,
}

impl ConflictCheckRequest {
    /// Check for an in-memory entry. Returns `None` when the entry has
    /// neither a teacher nor a room, as there is nothing to collide on.
    pub fn for_entry(entry: &TimetableEntry) -> Option<Self> {
        let room_number = entry
            .room_number
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        if entry.teacher_id.is_none() && room_number.is_none() {
            return None;
        }

        Some(Self {
            teacher_id: entry.teacher_id,
            day_of_week: entry.day,
            time_slot_id: entry.slot_id.clone(),
            room_number,
            exclude_entry_id: entry.id.persisted(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConflictRequest {
    pub checks: Vec<ConflictCheckRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Teacher,
    Room,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub message: String,
    /// The existing entry that clashes with the checked one.
    pub entry_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
}

impl ConflictCheckResponse {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self {
            has_conflicts: !conflicts.is_empty(),
            conflicts,
        }
    }
}
