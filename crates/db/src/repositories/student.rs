use crate::models::DbStudent;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Students of a school, optionally narrowed to one class.
pub async fn list_students(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    class_id: Option<Uuid>,
) -> Result<Vec<DbStudent>> {
    tracing::debug!(
        "Listing students: school_id={}, class_id={:?}",
        school_id,
        class_id
    );

    let students = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT p.user_id, p.first_name, p.last_name, p.email,
               s.xp, s.level, s.streak_days, s.wellbeing_status
        FROM students s
        JOIN profiles p ON p.user_id = s.user_id
        WHERE p.school_id = $1 AND ($2::uuid IS NULL OR s.class_id = $2)
        "#,
    )
    .bind(school_id)
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    Ok(students)
}
