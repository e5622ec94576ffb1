//! Row types as they come out of PostgreSQL, and their conversion into the
//! typed domain models. Enumerations are stored as text and parsed here, so a
//! row holding an unknown value surfaces as an error instead of a default.

use catalyst_core::conflicts::BookedEntry;
use catalyst_core::models::{
    school::{Class, ClassAssignment, GradeLevel, Profile, Role, Subject, UserRecord, display_name},
    student::{Student, WellbeingStatus},
    timetable::{EntryId, SlotKind, TimeSlot, TimetableEntry, TimetableScheme, Weekday},
};
use chrono::{DateTime, NaiveTime, Utc};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub user_id: Uuid,
    pub school_id: Uuid,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<DbProfile> for Profile {
    type Error = eyre::Report;

    fn try_from(row: DbProfile) -> Result<Self> {
        Ok(Profile {
            user_id: row.user_id,
            school_id: row.school_id,
            role: row
                .role
                .parse::<Role>()
                .wrap_err_with(|| format!("profile {} has an invalid role", row.user_id))?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        })
    }
}

/// A profile row with the ids of the subjects the user can teach.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject_ids: Vec<Uuid>,
}

impl From<DbUser> for UserRecord {
    fn from(row: DbUser) -> Self {
        UserRecord {
            id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            name: row.name,
            email: row.email,
            subjects: row.subject_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClass {
    pub id: Uuid,
    pub name: String,
    pub grade_level: String,
    pub section: String,
}

impl From<DbClass> for Class {
    fn from(row: DbClass) -> Self {
        Class {
            id: row.id,
            name: row.name,
            grade_level: row.grade_level,
            section: row.section,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGradeLevel {
    pub grade_level: String,
    pub class_count: i64,
}

impl From<DbGradeLevel> for GradeLevel {
    fn from(row: DbGradeLevel) -> Self {
        GradeLevel {
            grade_level: row.grade_level,
            class_count: row.class_count,
        }
    }
}

/// An assignment row joined with its class.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassAssignment {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_name: String,
    pub grade_level: String,
    pub section: String,
    pub subject: String,
    pub assigned_at: DateTime<Utc>,
}

impl From<DbClassAssignment> for ClassAssignment {
    fn from(row: DbClassAssignment) -> Self {
        ClassAssignment {
            id: row.id,
            class: Class {
                id: row.class_id,
                name: row.class_name,
                grade_level: row.grade_level,
                section: row.section,
            },
            subject: row.subject,
            assigned_at: row.assigned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubject {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub color: String,
}

impl From<DbSubject> for Subject {
    fn from(row: DbSubject) -> Self {
        Subject {
            id: row.id,
            name: row.name,
            code: row.code,
            color: row.color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheme {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub working_days: Vec<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub scheme_id: Uuid,
    pub slot_id: String,
    pub position: i32,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_type: String,
}

impl TryFrom<DbTimeSlot> for TimeSlot {
    type Error = eyre::Report;

    fn try_from(row: DbTimeSlot) -> Result<Self> {
        Ok(TimeSlot {
            kind: row
                .slot_type
                .parse::<SlotKind>()
                .wrap_err_with(|| format!("slot {} has an invalid type", row.slot_id))?,
            id: row.slot_id,
            start_time: row.start_time,
            end_time: row.end_time,
            label: row.label,
        })
    }
}

impl DbScheme {
    /// Assembles the scheme from its row and its slots, already in position order.
    pub fn into_scheme(self, slots: Vec<DbTimeSlot>) -> Result<TimetableScheme> {
        let working_days = self
            .working_days
            .iter()
            .map(|day| day.parse::<Weekday>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err_with(|| format!("scheme {} has an invalid working day", self.id))?;

        let time_slots = slots
            .into_iter()
            .map(TimeSlot::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(TimetableScheme::new(
            self.id,
            self.name,
            self.description,
            working_days,
            time_slots,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEntry {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub time_slot_id: String,
    pub day_of_week: String,
    pub room_number: Option<String>,
}

impl TryFrom<DbEntry> for TimetableEntry {
    type Error = eyre::Report;

    fn try_from(row: DbEntry) -> Result<Self> {
        Ok(TimetableEntry {
            day: row
                .day_of_week
                .parse::<Weekday>()
                .wrap_err_with(|| format!("entry {} has an invalid day", row.id))?,
            id: EntryId::Persisted(row.id),
            slot_id: row.time_slot_id,
            class_id: row.class_id,
            subject_id: row.subject_id,
            teacher_id: row.teacher_id,
            room_number: row.room_number,
        })
    }
}

/// An active entry joined with its class name, slot label and teacher names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookedEntry {
    pub id: Uuid,
    pub class_name: String,
    pub day_of_week: String,
    pub time_slot_id: String,
    pub slot_label: String,
    pub teacher_id: Option<Uuid>,
    pub teacher_first_name: Option<String>,
    pub teacher_last_name: Option<String>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub room_number: Option<String>,
}

impl TryFrom<DbBookedEntry> for BookedEntry {
    type Error = eyre::Report;

    fn try_from(row: DbBookedEntry) -> Result<Self> {
        let teacher_name = display_name(
            row.teacher_first_name.as_deref(),
            row.teacher_last_name.as_deref(),
            row.teacher_name.as_deref(),
            row.teacher_email.as_deref(),
        );

        Ok(BookedEntry {
            day: row
                .day_of_week
                .parse::<Weekday>()
                .wrap_err_with(|| format!("entry {} has an invalid day", row.id))?,
            entry_id: row.id,
            class_name: row.class_name,
            slot_id: row.time_slot_id,
            slot_label: row.slot_label,
            teacher_id: row.teacher_id,
            teacher_name,
            room_number: row.room_number,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub xp: i64,
    pub level: i32,
    pub streak_days: i32,
    pub wellbeing_status: Option<String>,
}

impl TryFrom<DbStudent> for Student {
    type Error = eyre::Report;

    fn try_from(row: DbStudent) -> Result<Self> {
        let wellbeing_status = row
            .wellbeing_status
            .as_deref()
            .map(str::parse::<WellbeingStatus>)
            .transpose()
            .wrap_err_with(|| format!("student {} has an invalid wellbeing status", row.user_id))?;

        Ok(Student {
            id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            xp: row.xp,
            level: row.level,
            streak_days: row.streak_days,
            wellbeing_status,
        })
    }
}
