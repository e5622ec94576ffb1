use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

// Deleted entries stay as inactive rows, so only active ones hold the cell.
const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_timetable_entries_cell \
     ON timetable_entries(class_id, day_of_week, time_slot_id) WHERE is_active",
    "CREATE INDEX IF NOT EXISTS idx_timetable_entries_school_id ON timetable_entries(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_profiles_school_id ON profiles(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_classes_school_id ON classes(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_subjects_school_id ON subjects(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_timetable_schemes_school_id ON timetable_schemes(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_students_class_id ON students(class_id)",
    "CREATE INDEX IF NOT EXISTS idx_class_assignments_teacher_id ON class_assignments(teacher_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schools (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One row per user; teachers, students and admins alike.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id UUID PRIMARY KEY,
            school_id UUID NOT NULL REFERENCES schools(id),
            role VARCHAR(16) NOT NULL,
            first_name VARCHAR(255) NULL,
            last_name VARCHAR(255) NULL,
            name VARCHAR(255) NULL,
            email VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_role CHECK (role IN ('admin', 'teacher', 'student', 'parent'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            school_id UUID NOT NULL REFERENCES schools(id),
            name VARCHAR(255) NOT NULL,
            grade_level VARCHAR(16) NOT NULL,
            section VARCHAR(32) NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            school_id UUID NOT NULL REFERENCES schools(id),
            name VARCHAR(255) NOT NULL,
            code VARCHAR(32) NOT NULL,
            color VARCHAR(32) NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teacher_subjects (
            teacher_id UUID NOT NULL REFERENCES profiles(user_id),
            subject_id UUID NOT NULL REFERENCES subjects(id),
            PRIMARY KEY (teacher_id, subject_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetable_schemes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            school_id UUID NOT NULL REFERENCES schools(id),
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            working_days TEXT[] NOT NULL,
            is_default BOOLEAN NOT NULL DEFAULT FALSE,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // `slot_id` is the editor's slot key; `position` keeps display order.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            scheme_id UUID NOT NULL REFERENCES timetable_schemes(id) ON DELETE CASCADE,
            slot_id VARCHAR(64) NOT NULL,
            position INTEGER NOT NULL,
            label VARCHAR(255) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            slot_type VARCHAR(16) NOT NULL,
            PRIMARY KEY (scheme_id, slot_id),
            CONSTRAINT valid_slot_type CHECK (slot_type IN ('period', 'break', 'lunch'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetable_entries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            school_id UUID NOT NULL REFERENCES schools(id),
            class_id UUID NOT NULL REFERENCES classes(id),
            subject_id UUID NOT NULL REFERENCES subjects(id),
            teacher_id UUID NULL REFERENCES profiles(user_id),
            time_slot_id VARCHAR(64) NOT NULL,
            day_of_week VARCHAR(16) NOT NULL,
            room_number VARCHAR(32) NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_by UUID NULL,
            updated_by UUID NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            user_id UUID PRIMARY KEY REFERENCES profiles(user_id),
            class_id UUID NULL REFERENCES classes(id),
            xp BIGINT NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            streak_days INTEGER NOT NULL DEFAULT 0,
            wellbeing_status VARCHAR(32) NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_assignments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            school_id UUID NOT NULL REFERENCES schools(id),
            teacher_id UUID NOT NULL REFERENCES profiles(user_id),
            class_id UUID NOT NULL REFERENCES classes(id),
            subject VARCHAR(255) NOT NULL DEFAULT 'General',
            assigned_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (teacher_id, class_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
