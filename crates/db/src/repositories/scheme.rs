use crate::models::{DbScheme, DbTimeSlot};
use catalyst_core::models::timetable::TimetableScheme;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

/// Schemes of a school, the default one first.
pub async fn list_schemes(pool: &Pool<Postgres>, school_id: Uuid) -> Result<Vec<DbScheme>> {
    tracing::debug!("Listing schemes: school_id={}", school_id);

    let schemes = sqlx::query_as::<_, DbScheme>(
        r#"
        SELECT id, name, description, working_days, is_default
        FROM timetable_schemes
        WHERE school_id = $1
        ORDER BY is_default DESC, name ASC
        "#,
    )
    .bind(school_id)
    .fetch_all(pool)
    .await?;

    Ok(schemes)
}

/// Slots of the given schemes, grouped by scheme and in display order.
pub async fn list_time_slots(pool: &Pool<Postgres>, scheme_ids: &[Uuid]) -> Result<Vec<DbTimeSlot>> {
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT scheme_id, slot_id, position, label, start_time, end_time, slot_type
        FROM time_slots
        WHERE scheme_id = ANY($1)
        ORDER BY scheme_id, position ASC
        "#,
    )
    .bind(scheme_ids)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

fn working_days(scheme: &TimetableScheme) -> Vec<String> {
    scheme
        .working_days
        .iter()
        .map(|day| day.as_str().to_string())
        .collect()
}

async fn clear_default(tx: &mut Transaction<'_, Postgres>, school_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE timetable_schemes SET is_default = FALSE WHERE school_id = $1")
        .bind(school_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn replace_slots(tx: &mut Transaction<'_, Postgres>, scheme: &TimetableScheme) -> Result<()> {
    sqlx::query("DELETE FROM time_slots WHERE scheme_id = $1")
        .bind(scheme.id)
        .execute(&mut **tx)
        .await?;

    for (position, slot) in scheme.time_slots.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO time_slots (scheme_id, slot_id, position, label, start_time, end_time, slot_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(scheme.id)
        .bind(&slot.id)
        .bind(position as i32)
        .bind(&slot.label)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.kind.as_str())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn create_scheme(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    scheme: &TimetableScheme,
    is_default: bool,
) -> Result<()> {
    tracing::debug!(
        "Creating scheme: id={}, name={}, slots={}, is_default={}",
        scheme.id,
        scheme.name,
        scheme.time_slots.len(),
        is_default
    );

    let mut tx = pool.begin().await?;

    if is_default {
        clear_default(&mut tx, school_id).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO timetable_schemes (id, school_id, name, description, working_days, is_default)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(scheme.id)
    .bind(school_id)
    .bind(&scheme.name)
    .bind(&scheme.description)
    .bind(working_days(scheme))
    .bind(is_default)
    .execute(&mut *tx)
    .await?;

    replace_slots(&mut tx, scheme).await?;
    tx.commit().await?;

    Ok(())
}

/// Overwrites a stored scheme and its slots. Returns `false` when the scheme
/// does not exist in this school.
pub async fn update_scheme(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    scheme: &TimetableScheme,
    is_default: bool,
) -> Result<bool> {
    tracing::debug!(
        "Updating scheme: id={}, name={}, slots={}, is_default={}",
        scheme.id,
        scheme.name,
        scheme.time_slots.len(),
        is_default
    );

    let mut tx = pool.begin().await?;

    if is_default {
        clear_default(&mut tx, school_id).await?;
    }

    let updated = sqlx::query(
        r#"
        UPDATE timetable_schemes
        SET name = $3, description = $4, working_days = $5, is_default = $6, updated_at = NOW()
        WHERE id = $1 AND school_id = $2
        "#,
    )
    .bind(scheme.id)
    .bind(school_id)
    .bind(&scheme.name)
    .bind(&scheme.description)
    .bind(working_days(scheme))
    .bind(is_default)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tracing::debug!("Scheme not found: id={}", scheme.id);
        tx.rollback().await?;
        return Ok(false);
    }

    replace_slots(&mut tx, scheme).await?;
    tx.commit().await?;

    Ok(true)
}
