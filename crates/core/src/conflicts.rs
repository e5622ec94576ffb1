use std::collections::HashSet;

use uuid::Uuid;

use crate::models::conflict::{Conflict, ConflictCheckRequest, ConflictKind};
use crate::models::timetable::Weekday;

/// An existing, persisted entry with the names needed to describe a clash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedEntry {
    pub entry_id: Uuid,
    pub class_name: String,
    pub day: Weekday,
    pub slot_id: String,
    pub slot_label: String,
    pub teacher_id: Option<Uuid>,
    pub teacher_name: Option<String>,
    pub room_number: Option<String>,
}

fn same_room(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

/// Every booked entry that would clash with `check`, as a teacher clash, a
/// room clash or both.
pub fn find_conflicts(check: &ConflictCheckRequest, booked: &[BookedEntry]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    let same_cell = booked.iter().filter(|b| {
        b.day == check.day_of_week
            && b.slot_id == check.time_slot_id
            && Some(b.entry_id) != check.exclude_entry_id
    });

    for other in same_cell {
        if let (Some(teacher_id), Some(other_teacher)) = (check.teacher_id, other.teacher_id) {
            if teacher_id == other_teacher {
                conflicts.push(Conflict {
                    kind: ConflictKind::Teacher,
                    message: format!(
                        "{} is already teaching {} on {} during {}",
                        other.teacher_name.as_deref().unwrap_or("Teacher"),
                        other.class_name,
                        other.day,
                        other.slot_label
                    ),
                    entry_id: Some(other.entry_id),
                });
            }
        }

        if let (Some(room), Some(other_room)) = (&check.room_number, &other.room_number) {
            if same_room(room, other_room) {
                conflicts.push(Conflict {
                    kind: ConflictKind::Room,
                    message: format!(
                        "Room {} is already booked by {} on {} during {}",
                        other_room.trim(),
                        other.class_name,
                        other.day,
                        other.slot_label
                    ),
                    entry_id: Some(other.entry_id),
                });
            }
        }
    }

    conflicts
}

/// Conflict messages in first-seen order, each kept once.
#[derive(Debug, Clone, Default)]
pub struct ConflictSet {
    seen: HashSet<String>,
    messages: Vec<String>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the message was already present.
    pub fn insert(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.seen.contains(&message) {
            return false;
        }
        self.seen.insert(message.clone());
        self.messages.push(message);
        true
    }

    pub fn extend_from<'a>(&mut self, conflicts: impl IntoIterator<Item = &'a Conflict>) {
        for conflict in conflicts {
            self.insert(conflict.message.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// De-duplicates conflicts by message, keeping the first occurrence.
pub fn dedup_conflicts(conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let mut seen = HashSet::new();
    conflicts
        .into_iter()
        .filter(|c| seen.insert(c.message.clone()))
        .collect()
}
