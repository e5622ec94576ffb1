use catalyst_core::conflicts::{BookedEntry, ConflictSet, dedup_conflicts, find_conflicts};
use catalyst_core::models::conflict::{Conflict, ConflictCheckRequest, ConflictKind};
use catalyst_core::models::timetable::Weekday;
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn booked(teacher_id: Option<Uuid>, room: Option<&str>) -> BookedEntry {
    BookedEntry {
        entry_id: Uuid::new_v4(),
        class_name: "Grade 7A".to_string(),
        day: Weekday::Monday,
        slot_id: "1".to_string(),
        slot_label: "Period 1".to_string(),
        teacher_id,
        teacher_name: Some("Ada Lovelace".to_string()),
        room_number: room.map(str::to_string),
    }
}

fn check(teacher_id: Option<Uuid>, room: Option<&str>) -> ConflictCheckRequest {
    ConflictCheckRequest {
        teacher_id,
        day_of_week: Weekday::Monday,
        time_slot_id: "1".to_string(),
        room_number: room.map(str::to_string),
        exclude_entry_id: None,
    }
}

#[test]
fn test_teacher_double_booking() {
    let teacher = Uuid::new_v4();
    let existing = booked(Some(teacher), None);

    let conflicts = find_conflicts(&check(Some(teacher), None), &[existing.clone()]);

    assert_eq!(
        conflicts,
        vec![Conflict {
            kind: ConflictKind::Teacher,
            message: "Ada Lovelace is already teaching Grade 7A on Monday during Period 1".to_string(),
            entry_id: Some(existing.entry_id),
        }]
    );
}

#[test]
fn test_room_match_ignores_case_and_whitespace() {
    let existing = booked(None, Some("Lab 2"));
    let conflicts = find_conflicts(&check(None, Some(" lab 2")), &[existing]);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Room);
    assert_eq!(
        conflicts[0].message,
        "Room Lab 2 is already booked by Grade 7A on Monday during Period 1"
    );
}

#[test]
fn test_excluded_entry_and_other_cells_do_not_conflict() {
    let teacher = Uuid::new_v4();
    let itself = booked(Some(teacher), Some("R1"));
    let mut other_day = booked(Some(teacher), Some("R1"));
    other_day.day = Weekday::Tuesday;
    let mut other_slot = booked(Some(teacher), Some("R1"));
    other_slot.slot_id = "2".to_string();

    let mut request = check(Some(teacher), Some("R1"));
    request.exclude_entry_id = Some(itself.entry_id);

    assert!(find_conflicts(&request, &[itself, other_day, other_slot]).is_empty());
}

#[test]
fn test_teacher_and_room_clash_together() {
    let teacher = Uuid::new_v4();
    let conflicts = find_conflicts(&check(Some(teacher), Some("R3")), &[booked(Some(teacher), Some("R3"))]);
    let kinds: Vec<ConflictKind> = conflicts.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConflictKind::Teacher, ConflictKind::Room]);
}

#[test]
fn test_same_message_from_two_entries_is_kept_once() {
    let mut set = ConflictSet::new();
    assert!(set.insert("Room R1 is already booked by Grade 7A on Monday during Period 1"));
    assert!(set.insert("Ada Lovelace is already teaching Grade 7B on Monday during Period 2"));
    assert!(!set.insert("Room R1 is already booked by Grade 7A on Monday during Period 1"));

    assert_eq!(set.len(), 2);
    assert_eq!(
        set.into_messages(),
        vec![
            "Room R1 is already booked by Grade 7A on Monday during Period 1".to_string(),
            "Ada Lovelace is already teaching Grade 7B on Monday during Period 2".to_string(),
        ]
    );
}

#[test]
fn test_dedup_conflicts_keeps_first() {
    let first = Conflict {
        kind: ConflictKind::Room,
        message: "same".to_string(),
        entry_id: Some(Uuid::new_v4()),
    };
    let second = Conflict {
        entry_id: Some(Uuid::new_v4()),
        ..first.clone()
    };

    let deduped = dedup_conflicts(vec![first.clone(), second]);
    assert_eq!(deduped, vec![first]);
}
