use crate::models::DbClassAssignment;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_assignments(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    teacher_id: Uuid,
) -> Result<Vec<DbClassAssignment>> {
    tracing::debug!("Listing class assignments: school_id={}, teacher_id={}", school_id, teacher_id);

    let assignments = sqlx::query_as::<_, DbClassAssignment>(
        r#"
        SELECT a.id, a.class_id, c.name AS class_name, c.grade_level, c.section,
               a.subject, a.assigned_at
        FROM class_assignments a
        JOIN classes c ON c.id = a.class_id
        WHERE a.school_id = $1 AND a.teacher_id = $2
        ORDER BY c.grade_level ASC, c.section ASC
        "#,
    )
    .bind(school_id)
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

/// Swaps the teacher's assignments for `class_ids` in one transaction.
/// Classes outside the school are skipped. Returns how many were stored.
pub async fn replace_assignments(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    teacher_id: Uuid,
    class_ids: &[Uuid],
    subject: &str,
) -> Result<u64> {
    tracing::debug!(
        "Replacing class assignments: school_id={}, teacher_id={}, classes={}",
        school_id,
        teacher_id,
        class_ids.len()
    );

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM class_assignments WHERE school_id = $1 AND teacher_id = $2")
        .bind(school_id)
        .bind(teacher_id)
        .execute(&mut *tx)
        .await?;

    let assigned = sqlx::query(
        r#"
        INSERT INTO class_assignments (school_id, teacher_id, class_id, subject)
        SELECT school_id, $2, id, $4
        FROM classes
        WHERE school_id = $1 AND id = ANY($3)
        "#,
    )
    .bind(school_id)
    .bind(teacher_id)
    .bind(class_ids)
    .bind(subject)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(assigned)
}

pub async fn delete_assignment(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    teacher_id: Uuid,
    class_id: Uuid,
) -> Result<bool> {
    tracing::debug!("Removing class assignment: teacher_id={}, class_id={}", teacher_id, class_id);

    let deleted = sqlx::query(
        "DELETE FROM class_assignments WHERE school_id = $1 AND teacher_id = $2 AND class_id = $3",
    )
    .bind(school_id)
    .bind(teacher_id)
    .bind(class_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(deleted > 0)
}
