use crate::models::{DbBookedEntry, DbEntry};
use catalyst_core::models::timetable::{CreateEntryRequest, UpdateEntryRequest, Weekday};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_entries(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    class_id: Uuid,
) -> Result<Vec<DbEntry>> {
    tracing::debug!("Listing entries: school_id={}, class_id={}", school_id, class_id);

    let entries = sqlx::query_as::<_, DbEntry>(
        r#"
        SELECT id, class_id, subject_id, teacher_id, time_slot_id, day_of_week, room_number
        FROM timetable_entries
        WHERE school_id = $1 AND class_id = $2 AND is_active
        ORDER BY created_at ASC
        "#,
    )
    .bind(school_id)
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Inserts an entry. Returns `None` when the class already has an active
/// entry in that day and slot.
pub async fn create_entry(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    request: &CreateEntryRequest,
    created_by: Uuid,
) -> Result<Option<Uuid>> {
    tracing::debug!(
        "Creating entry: class_id={}, day={}, slot={}",
        request.class_id,
        request.day_of_week,
        request.time_slot_id
    );

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO timetable_entries
            (school_id, class_id, subject_id, teacher_id, time_slot_id, day_of_week, room_number, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(school_id)
    .bind(request.class_id)
    .bind(request.subject_id)
    .bind(request.teacher_id)
    .bind(&request.time_slot_id)
    .bind(request.day_of_week.as_str())
    .bind(request.room_number.as_deref())
    .bind(created_by)
    .fetch_optional(pool)
    .await?;

    match id {
        Some(id) => tracing::debug!("Entry created successfully: id={}", id),
        None => tracing::debug!("Entry cell already taken"),
    }

    Ok(id)
}

/// Keeps subject and teacher when they are absent from `request`. The room
/// is always replaced, so a `None` room clears it. Returns `false` when no
/// active entry with that id exists in the school.
pub async fn update_entry(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    request: &UpdateEntryRequest,
    updated_by: Uuid,
) -> Result<bool> {
    tracing::debug!("Updating entry: id={}", request.entry_id);

    let updated = sqlx::query(
        r#"
        UPDATE timetable_entries
        SET subject_id = COALESCE($3, subject_id),
            teacher_id = COALESCE($4, teacher_id),
            room_number = $5,
            updated_by = $6,
            updated_at = NOW()
        WHERE id = $1 AND school_id = $2 AND is_active
        "#,
    )
    .bind(request.entry_id)
    .bind(school_id)
    .bind(request.subject_id)
    .bind(request.teacher_id)
    .bind(request.room_number.as_deref())
    .bind(updated_by)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Soft-deletes an entry, freeing its cell.
pub async fn delete_entry(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    entry_id: Uuid,
    deleted_by: Uuid,
) -> Result<bool> {
    tracing::debug!("Deleting entry: id={}", entry_id);

    let deleted = sqlx::query(
        r#"
        UPDATE timetable_entries
        SET is_active = FALSE, updated_by = $3, updated_at = NOW()
        WHERE id = $1 AND school_id = $2 AND is_active
        "#,
    )
    .bind(entry_id)
    .bind(school_id)
    .bind(deleted_by)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(deleted > 0)
}

/// Active entries of the whole school, optionally on one day, with the names
/// conflict messages need. The slot label comes from the default scheme when
/// several schemes define the same slot id.
pub async fn list_booked_entries(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    day: Option<Weekday>,
) -> Result<Vec<DbBookedEntry>> {
    tracing::debug!("Listing booked entries: school_id={}, day={:?}", school_id, day);

    let entries = sqlx::query_as::<_, DbBookedEntry>(
        r#"
        SELECT e.id, c.name AS class_name, e.day_of_week, e.time_slot_id,
               COALESCE(slot.label, e.time_slot_id) AS slot_label,
               e.teacher_id,
               t.first_name AS teacher_first_name,
               t.last_name AS teacher_last_name,
               t.name AS teacher_name,
               t.email AS teacher_email,
               e.room_number
        FROM timetable_entries e
        JOIN classes c ON c.id = e.class_id
        LEFT JOIN profiles t ON t.user_id = e.teacher_id
        LEFT JOIN LATERAL (
            SELECT ts.label
            FROM time_slots ts
            JOIN timetable_schemes s ON s.id = ts.scheme_id
            WHERE s.school_id = e.school_id AND ts.slot_id = e.time_slot_id
            ORDER BY s.is_default DESC, s.updated_at DESC
            LIMIT 1
        ) slot ON TRUE
        WHERE e.school_id = $1 AND e.is_active
          AND ($2::varchar IS NULL OR e.day_of_week = $2)
        ORDER BY e.created_at ASC
        "#,
    )
    .bind(school_id)
    .bind(day.map(|d| d.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Replaces the target class's timetable with a copy of the source's.
/// Returns the number of entries copied.
pub async fn copy_entries(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    source_class_id: Uuid,
    target_class_id: Uuid,
    copied_by: Uuid,
) -> Result<u64> {
    tracing::debug!(
        "Copying entries: school_id={}, source={}, target={}",
        school_id,
        source_class_id,
        target_class_id
    );

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE timetable_entries
        SET is_active = FALSE, updated_by = $3, updated_at = NOW()
        WHERE school_id = $1 AND class_id = $2 AND is_active
        "#,
    )
    .bind(school_id)
    .bind(target_class_id)
    .bind(copied_by)
    .execute(&mut *tx)
    .await?;

    let copied = sqlx::query(
        r#"
        INSERT INTO timetable_entries
            (school_id, class_id, subject_id, teacher_id, time_slot_id, day_of_week, room_number, created_by, updated_by)
        SELECT school_id, $3, subject_id, teacher_id, time_slot_id, day_of_week, room_number, $4, $4
        FROM timetable_entries
        WHERE school_id = $1 AND class_id = $2 AND is_active
        "#,
    )
    .bind(school_id)
    .bind(source_class_id)
    .bind(target_class_id)
    .bind(copied_by)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    tracing::debug!("Copied {} entries", copied);
    Ok(copied)
}
