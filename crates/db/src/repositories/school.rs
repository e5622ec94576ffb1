use crate::models::{DbClass, DbGradeLevel, DbSubject, DbUser};
use catalyst_core::models::school::Role;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Users of one role in a school, with their teachable subjects.
pub async fn list_users(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    role: Role,
    limit: Option<i64>,
) -> Result<Vec<DbUser>> {
    tracing::debug!(
        "Listing users: school_id={}, role={}, limit={:?}",
        school_id,
        role.as_str(),
        limit
    );

    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT p.user_id, p.first_name, p.last_name, p.name, p.email,
               COALESCE(
                   array_agg(ts.subject_id) FILTER (WHERE ts.subject_id IS NOT NULL),
                   '{}'
               ) AS subject_ids
        FROM profiles p
        LEFT JOIN teacher_subjects ts ON ts.teacher_id = p.user_id
        WHERE p.school_id = $1 AND p.role = $2
        GROUP BY p.user_id
        ORDER BY p.created_at ASC
        LIMIT $3
        "#,
    )
    .bind(school_id)
    .bind(role.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn list_classes(pool: &Pool<Postgres>, school_id: Uuid) -> Result<Vec<DbClass>> {
    tracing::debug!("Listing classes: school_id={}", school_id);

    let classes = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, name, grade_level, section
        FROM classes
        WHERE school_id = $1
        ORDER BY grade_level ASC, section ASC, name ASC
        "#,
    )
    .bind(school_id)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}

pub async fn list_classes_by_grade(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    grade_level: &str,
) -> Result<Vec<DbClass>> {
    tracing::debug!(
        "Listing classes by grade: school_id={}, grade_level={}",
        school_id,
        grade_level
    );

    let classes = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, name, grade_level, section
        FROM classes
        WHERE school_id = $1 AND grade_level = $2
        ORDER BY section ASC, name ASC
        "#,
    )
    .bind(school_id)
    .bind(grade_level)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}

/// Distinct grades with classes, shorter labels first so "7" precedes "10".
pub async fn list_grade_levels(pool: &Pool<Postgres>, school_id: Uuid) -> Result<Vec<DbGradeLevel>> {
    tracing::debug!("Listing grade levels: school_id={}", school_id);

    let grades = sqlx::query_as::<_, DbGradeLevel>(
        r#"
        SELECT grade_level, COUNT(*) AS class_count
        FROM classes
        WHERE school_id = $1
        GROUP BY grade_level
        ORDER BY LENGTH(grade_level) ASC, grade_level ASC
        "#,
    )
    .bind(school_id)
    .fetch_all(pool)
    .await?;

    Ok(grades)
}

pub async fn get_class(
    pool: &Pool<Postgres>,
    school_id: Uuid,
    class_id: Uuid,
) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, name, grade_level, section
        FROM classes
        WHERE id = $1 AND school_id = $2
        "#,
    )
    .bind(class_id)
    .bind(school_id)
    .fetch_optional(pool)
    .await?;

    Ok(class)
}

pub async fn list_subjects(pool: &Pool<Postgres>, school_id: Uuid) -> Result<Vec<DbSubject>> {
    tracing::debug!("Listing subjects: school_id={}", school_id);

    let subjects = sqlx::query_as::<_, DbSubject>(
        r#"
        SELECT id, name, code, color
        FROM subjects
        WHERE school_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(school_id)
    .fetch_all(pool)
    .await?;

    Ok(subjects)
}
