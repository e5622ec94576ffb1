use axum::http::StatusCode;
use catalyst_core::conflicts::BookedEntry;
use catalyst_core::models::{
    conflict::ConflictCheckResponse,
    timetable::{
        CopyTimetableResponse, CreateEntryResponse, ListEntriesResponse, ListSchemesResponse,
        TimetableScheme, Weekday,
    },
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user, class, entry};

fn booked(teacher_id: Uuid, room: &str, class_name: &str) -> BookedEntry {
    BookedEntry {
        entry_id: Uuid::new_v4(),
        class_name: class_name.to_string(),
        day: Weekday::Monday,
        slot_id: "1".to_string(),
        slot_label: "Period 1".to_string(),
        teacher_id: Some(teacher_id),
        teacher_name: Some("Ada Lovelace".to_string()),
        room_number: Some(room.to_string()),
    }
}

#[tokio::test]
async fn test_list_entries_requires_class_id() {
    let ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let server = ctx.server();

    let response = as_user(server.get("/api/admin/timetable/entries"), &admin).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Validation error: classId is required" }));
}

#[tokio::test]
async fn test_list_entries_of_class() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let class_id = Uuid::new_v4();
    let entries = vec![
        entry(class_id, Weekday::Monday, "1"),
        entry(class_id, Weekday::Tuesday, "2"),
    ];
    let expected = entries.clone();
    ctx.store
        .expect_list_entries()
        .with(eq(ctx.school_id), eq(class_id))
        .times(1)
        .returning(move |_, _| Ok(entries.clone()));
    let server = ctx.server();

    let response = as_user(
        server
            .get("/api/admin/timetable/entries")
            .add_query_param("classId", class_id),
        &admin,
    )
    .await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListEntriesResponse>().entries, expected);
}

#[tokio::test]
async fn test_create_entry() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let admin_id = admin.user_id;
    let school_id = ctx.school_id;
    let class = class("Grade 7A");
    let class_id = class.id;
    let entry_id = Uuid::new_v4();

    ctx.store
        .expect_get_class()
        .with(eq(school_id), eq(class_id))
        .returning(move |_, _| Ok(Some(class.clone())));
    ctx.store
        .expect_create_entry()
        .withf(move |school, request, user| {
            *school == school_id
                && request.day_of_week == Weekday::Wednesday
                && request.time_slot_id == "3"
                && request.room_number.as_deref() == Some("R4")
                && *user == admin_id
        })
        .times(1)
        .returning(move |_, _, _| Ok(Some(entry_id)));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/entries"), &admin)
        .json(&json!({
            "classId": class_id,
            "subjectId": Uuid::new_v4(),
            "teacherId": null,
            "timeSlotId": "3",
            "dayOfWeek": "Wednesday",
            "roomNumber": "R4"
        }))
        .await;

    response.assert_status_ok();
    let body: CreateEntryResponse = response.json();
    assert_eq!(body.entry_id, entry_id);
    assert!(body.success);
}

#[tokio::test]
async fn test_create_entry_in_taken_cell_conflicts() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let class = class("Grade 7A");
    let class_id = class.id;

    ctx.store
        .expect_get_class()
        .returning(move |_, _| Ok(Some(class.clone())));
    ctx.store
        .expect_create_entry()
        .returning(|_, _, _| Ok(None));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/entries"), &admin)
        .json(&json!({
            "classId": class_id,
            "subjectId": Uuid::new_v4(),
            "timeSlotId": "1",
            "dayOfWeek": "Monday"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    response.assert_json(&json!({
        "error": "Conflict: Grade 7A already has an entry on Monday in slot 1"
    }));
}

#[tokio::test]
async fn test_create_entry_for_foreign_class_is_not_found() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_get_class().returning(|_, _| Ok(None));
    ctx.store.expect_create_entry().never();
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/entries"), &admin)
        .json(&json!({
            "classId": Uuid::new_v4(),
            "subjectId": Uuid::new_v4(),
            "timeSlotId": "1",
            "dayOfWeek": "Monday"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_entry_with_missing_or_bad_fields_is_rejected() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_create_entry().never();
    let server = ctx.server();

    let missing_slot = as_user(server.post("/api/admin/timetable/entries"), &admin)
        .json(&json!({
            "classId": Uuid::new_v4(),
            "subjectId": Uuid::new_v4(),
            "dayOfWeek": "Monday"
        }))
        .await;
    missing_slot.assert_status(StatusCode::BAD_REQUEST);

    let sunday = as_user(server.post("/api/admin/timetable/entries"), &admin)
        .json(&json!({
            "classId": Uuid::new_v4(),
            "subjectId": Uuid::new_v4(),
            "timeSlotId": "1",
            "dayOfWeek": "Sunday"
        }))
        .await;
    sunday.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_entry_is_not_found() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let entry_id = Uuid::new_v4();
    ctx.store
        .expect_update_entry()
        .withf(move |_, request, _| request.entry_id == entry_id && request.room_number.is_none())
        .returning(|_, _, _| Ok(false));
    let server = ctx.server();

    let response = as_user(server.put("/api/admin/timetable/entries"), &admin)
        .json(&json!({ "entryId": entry_id, "subjectId": Uuid::new_v4() }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!(null))]
#[case(json!("   "))]
#[tokio::test]
async fn test_update_can_clear_room(#[case] room: serde_json::Value) {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let entry_id = Uuid::new_v4();
    ctx.store
        .expect_update_entry()
        .times(1)
        .withf(move |_, request, _| request.entry_id == entry_id && request.room_number.is_none())
        .returning(|_, _, _| Ok(true));
    let server = ctx.server();

    let response = as_user(server.put("/api/admin/timetable/entries"), &admin)
        .json(&json!({ "entryId": entry_id, "roomNumber": room }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));
}

#[tokio::test]
async fn test_update_trims_room() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store
        .expect_update_entry()
        .times(1)
        .withf(|_, request, _| request.room_number.as_deref() == Some("R12"))
        .returning(|_, _, _| Ok(true));
    let server = ctx.server();

    as_user(server.put("/api/admin/timetable/entries"), &admin)
        .json(&json!({ "entryId": Uuid::new_v4(), "roomNumber": " R12 " }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_entry() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let school_id = ctx.school_id;
    let entry_id = Uuid::new_v4();
    ctx.store
        .expect_delete_entry()
        .with(eq(school_id), eq(entry_id), eq(admin.user_id))
        .times(1)
        .returning(|_, _, _| Ok(true));
    let server = ctx.server();

    let missing = as_user(server.delete("/api/admin/timetable/entries"), &admin).await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let response = as_user(
        server
            .delete("/api/admin/timetable/entries")
            .add_query_param("entryId", entry_id),
        &admin,
    )
    .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));
}

#[tokio::test]
async fn test_conflict_check_reports_teacher_and_room() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let teacher_id = Uuid::new_v4();
    let other = booked(teacher_id, "R4", "Grade 8B");
    let other_id = other.entry_id;
    ctx.store
        .expect_list_booked_entries()
        .with(eq(ctx.school_id), eq(Some(Weekday::Monday)))
        .returning(move |_, _| Ok(vec![other.clone()]));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/conflicts"), &admin)
        .json(&json!({
            "teacherId": teacher_id,
            "dayOfWeek": "Monday",
            "timeSlotId": "1",
            "roomNumber": "r4",
            "excludeEntryId": null
        }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "hasConflicts": true,
        "conflicts": [
            {
                "type": "teacher",
                "message": "Ada Lovelace is already teaching Grade 8B on Monday during Period 1",
                "entryId": other_id
            },
            {
                "type": "room",
                "message": "Room R4 is already booked by Grade 8B on Monday during Period 1",
                "entryId": other_id
            }
        ]
    }));
}

#[tokio::test]
async fn test_conflict_check_excludes_the_entry_itself() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let teacher_id = Uuid::new_v4();
    let itself = booked(teacher_id, "R4", "Grade 7A");
    let itself_id = itself.entry_id;
    ctx.store
        .expect_list_booked_entries()
        .returning(move |_, _| Ok(vec![itself.clone()]));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/conflicts"), &admin)
        .json(&json!({
            "teacherId": teacher_id,
            "dayOfWeek": "Monday",
            "timeSlotId": "1",
            "roomNumber": "R4",
            "excludeEntryId": itself_id
        }))
        .await;

    let body: ConflictCheckResponse = response.json();
    assert!(!body.has_conflicts);
    assert!(body.conflicts.is_empty());
}

#[tokio::test]
async fn test_batch_conflicts_are_deduplicated() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let teacher_id = Uuid::new_v4();
    let other = booked(teacher_id, "R9", "Grade 8B");
    ctx.store
        .expect_list_booked_entries()
        .with(eq(ctx.school_id), eq(None))
        .times(1)
        .returning(move |_, _| Ok(vec![other.clone()]));
    let server = ctx.server();

    let check = json!({
        "teacherId": teacher_id,
        "dayOfWeek": "Monday",
        "timeSlotId": "1",
        "roomNumber": null,
        "excludeEntryId": null
    });
    let response = as_user(server.post("/api/admin/timetable/conflicts/batch"), &admin)
        .json(&json!({ "checks": [check.clone(), check] }))
        .await;

    response.assert_status_ok();
    let body: ConflictCheckResponse = response.json();
    assert_eq!(body.conflicts.len(), 1);
    assert!(body.has_conflicts);
}

#[tokio::test]
async fn test_copy_to_same_class_is_rejected() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_copy_entries().never();
    let server = ctx.server();
    let class_id = Uuid::new_v4();

    let response = as_user(server.post("/api/admin/timetable/copy"), &admin)
        .json(&json!({ "sourceClassId": class_id, "targetClassId": class_id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_copy_timetable() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let source = class("Grade 7A");
    let target = class("Grade 7B");
    let (source_id, target_id) = (source.id, target.id);

    ctx.store.expect_get_class().returning(move |_, class_id| {
        Ok([source.clone(), target.clone()]
            .into_iter()
            .find(|c| c.id == class_id))
    });
    ctx.store
        .expect_copy_entries()
        .with(eq(ctx.school_id), eq(source_id), eq(target_id), eq(admin.user_id))
        .times(1)
        .returning(|_, _, _, _| Ok(12));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/copy"), &admin)
        .json(&json!({ "sourceClassId": source_id, "targetClassId": target_id }))
        .await;

    response.assert_status_ok();
    let body: CopyTimetableResponse = response.json();
    assert_eq!(body.copied, 12);
    assert_eq!(body.message, "Copied 12 entries from Grade 7A to Grade 7B");
}

#[tokio::test]
async fn test_schemes_fall_back_to_presets() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_list_schemes().returning(|_| Ok(vec![]));
    let server = ctx.server();

    let response = as_user(server.get("/api/admin/timetable/schemes"), &admin).await;

    response.assert_status_ok();
    let names: Vec<String> = response
        .json::<ListSchemesResponse>()
        .schemes
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Standard Day", "Extended Day"]);
}

#[tokio::test]
async fn test_invalid_scheme_is_not_saved() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_create_scheme().never();
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/timetable/schemes"), &admin)
        .json(&json!({
            "name": "Overlapping",
            "workingDays": ["Monday"],
            "timeSlots": [
                { "id": "1", "startTime": "08:00", "endTime": "09:00", "label": "Period 1", "type": "period" },
                { "id": "2", "startTime": "08:30", "endTime": "09:15", "label": "Period 2", "type": "period" }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "error": "Validation error: 'Period 2' overlaps 'Period 1'"
    }));
}

#[tokio::test]
async fn test_apply_scheme_keeps_path_id() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let preset = TimetableScheme::standard_day();
    let id = Uuid::new_v4();
    ctx.store
        .expect_update_scheme()
        .withf(move |_, scheme, is_default| scheme.id == id && scheme.days_per_week == 6 && *is_default)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let server = ctx.server();

    let response = as_user(server.put(&format!("/api/admin/timetable/schemes/{}", id)), &admin)
        .json(&json!({
            "name": preset.name,
            "workingDays": preset.working_days,
            "timeSlots": preset.time_slots,
            "isDefault": true
        }))
        .await;

    response.assert_status_ok();
    let scheme: TimetableScheme = response.json();
    assert_eq!(scheme.id, id);
    assert_eq!(scheme.periods_per_day, 6);
}

#[tokio::test]
async fn test_apply_unknown_scheme_is_not_found() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let preset = TimetableScheme::extended_day();
    ctx.store.expect_update_scheme().returning(|_, _, _| Ok(false));
    let server = ctx.server();

    let response = as_user(
        server.put(&format!("/api/admin/timetable/schemes/{}", Uuid::new_v4())),
        &admin,
    )
    .json(&json!({
        "name": preset.name,
        "workingDays": preset.working_days,
        "timeSlots": preset.time_slots
    }))
    .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
