//! The persistence seam used by the API.

use std::collections::HashMap;

use async_trait::async_trait;
use catalyst_core::conflicts::BookedEntry;
use catalyst_core::models::{
    school::{Class, ClassAssignment, GradeLevel, Profile, Role, Subject, UserRecord},
    student::Student,
    timetable::{CreateEntryRequest, TimetableEntry, TimetableScheme, UpdateEntryRequest, Weekday},
};
use eyre::Result;
use uuid::Uuid;

use crate::DbPool;
use crate::models::DbTimeSlot;
use crate::repositories::{assignment, entry, profile, scheme, school, student};

/// Every query the API makes, each scoped to one school.
///
/// Arguments are owned so the trait can be mocked without lifetime juggling.
#[async_trait]
pub trait Store: Send + Sync {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    async fn list_users(&self, school_id: Uuid, role: Role, limit: Option<i64>) -> Result<Vec<UserRecord>>;

    async fn list_classes(&self, school_id: Uuid) -> Result<Vec<Class>>;

    async fn list_classes_by_grade(&self, school_id: Uuid, grade_level: String) -> Result<Vec<Class>>;

    async fn get_class(&self, school_id: Uuid, class_id: Uuid) -> Result<Option<Class>>;

    async fn list_subjects(&self, school_id: Uuid) -> Result<Vec<Subject>>;

    async fn list_grade_levels(&self, school_id: Uuid) -> Result<Vec<GradeLevel>>;

    async fn list_class_assignments(&self, school_id: Uuid, teacher_id: Uuid) -> Result<Vec<ClassAssignment>>;

    /// Replaces every assignment of `teacher_id`. Returns how many were stored.
    async fn replace_class_assignments(
        &self,
        school_id: Uuid,
        teacher_id: Uuid,
        class_ids: Vec<Uuid>,
        subject: String,
    ) -> Result<u64>;

    async fn delete_class_assignment(&self, school_id: Uuid, teacher_id: Uuid, class_id: Uuid) -> Result<bool>;

    /// Stored schemes, default first.
    async fn list_schemes(&self, school_id: Uuid) -> Result<Vec<TimetableScheme>>;

    async fn create_scheme(&self, school_id: Uuid, scheme: TimetableScheme, is_default: bool) -> Result<()>;

    async fn update_scheme(&self, school_id: Uuid, scheme: TimetableScheme, is_default: bool) -> Result<bool>;

    async fn list_entries(&self, school_id: Uuid, class_id: Uuid) -> Result<Vec<TimetableEntry>>;

    async fn create_entry(
        &self,
        school_id: Uuid,
        request: CreateEntryRequest,
        user_id: Uuid,
    ) -> Result<Option<Uuid>>;

    async fn update_entry(&self, school_id: Uuid, request: UpdateEntryRequest, user_id: Uuid) -> Result<bool>;

    async fn delete_entry(&self, school_id: Uuid, entry_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn list_booked_entries(&self, school_id: Uuid, day: Option<Weekday>) -> Result<Vec<BookedEntry>>;

    async fn copy_entries(
        &self,
        school_id: Uuid,
        source_class_id: Uuid,
        target_class_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64>;

    async fn list_students(&self, school_id: Uuid, class_id: Option<Uuid>) -> Result<Vec<Student>>;
}

/// [`Store`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        profile::get_profile(&self.pool, user_id)
            .await?
            .map(Profile::try_from)
            .transpose()
    }

    async fn list_users(&self, school_id: Uuid, role: Role, limit: Option<i64>) -> Result<Vec<UserRecord>> {
        let users = school::list_users(&self.pool, school_id, role, limit).await?;
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    async fn list_classes(&self, school_id: Uuid) -> Result<Vec<Class>> {
        let classes = school::list_classes(&self.pool, school_id).await?;
        Ok(classes.into_iter().map(Class::from).collect())
    }

    async fn list_classes_by_grade(&self, school_id: Uuid, grade_level: String) -> Result<Vec<Class>> {
        let classes = school::list_classes_by_grade(&self.pool, school_id, &grade_level).await?;
        Ok(classes.into_iter().map(Class::from).collect())
    }

    async fn get_class(&self, school_id: Uuid, class_id: Uuid) -> Result<Option<Class>> {
        let class = school::get_class(&self.pool, school_id, class_id).await?;
        Ok(class.map(Class::from))
    }

    async fn list_subjects(&self, school_id: Uuid) -> Result<Vec<Subject>> {
        let subjects = school::list_subjects(&self.pool, school_id).await?;
        Ok(subjects.into_iter().map(Subject::from).collect())
    }

    async fn list_grade_levels(&self, school_id: Uuid) -> Result<Vec<GradeLevel>> {
        let grades = school::list_grade_levels(&self.pool, school_id).await?;
        Ok(grades.into_iter().map(GradeLevel::from).collect())
    }

    async fn list_class_assignments(&self, school_id: Uuid, teacher_id: Uuid) -> Result<Vec<ClassAssignment>> {
        let assignments = assignment::list_assignments(&self.pool, school_id, teacher_id).await?;
        Ok(assignments.into_iter().map(ClassAssignment::from).collect())
    }

    async fn replace_class_assignments(
        &self,
        school_id: Uuid,
        teacher_id: Uuid,
        class_ids: Vec<Uuid>,
        subject: String,
    ) -> Result<u64> {
        assignment::replace_assignments(&self.pool, school_id, teacher_id, &class_ids, &subject).await
    }

    async fn delete_class_assignment(&self, school_id: Uuid, teacher_id: Uuid, class_id: Uuid) -> Result<bool> {
        assignment::delete_assignment(&self.pool, school_id, teacher_id, class_id).await
    }

    async fn list_schemes(&self, school_id: Uuid) -> Result<Vec<TimetableScheme>> {
        let rows = scheme::list_schemes(&self.pool, school_id).await?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let mut slots: HashMap<Uuid, Vec<DbTimeSlot>> = HashMap::new();
        for slot in scheme::list_time_slots(&self.pool, &ids).await? {
            slots.entry(slot.scheme_id).or_default().push(slot);
        }

        rows.into_iter()
            .map(|row| {
                let scheme_slots = slots.remove(&row.id).unwrap_or_default();
                row.into_scheme(scheme_slots)
            })
            .collect()
    }

    async fn create_scheme(&self, school_id: Uuid, scheme: TimetableScheme, is_default: bool) -> Result<()> {
        scheme::create_scheme(&self.pool, school_id, &scheme, is_default).await
    }

    async fn update_scheme(&self, school_id: Uuid, scheme: TimetableScheme, is_default: bool) -> Result<bool> {
        scheme::update_scheme(&self.pool, school_id, &scheme, is_default).await
    }

    async fn list_entries(&self, school_id: Uuid, class_id: Uuid) -> Result<Vec<TimetableEntry>> {
        entry::list_entries(&self.pool, school_id, class_id)
            .await?
            .into_iter()
            .map(TimetableEntry::try_from)
            .collect()
    }

    async fn create_entry(
        &self,
        school_id: Uuid,
        request: CreateEntryRequest,
        user_id: Uuid,
    ) -> Result<Option<Uuid>> {
        entry::create_entry(&self.pool, school_id, &request, user_id).await
    }

    async fn update_entry(&self, school_id: Uuid, request: UpdateEntryRequest, user_id: Uuid) -> Result<bool> {
        entry::update_entry(&self.pool, school_id, &request, user_id).await
    }

    async fn delete_entry(&self, school_id: Uuid, entry_id: Uuid, user_id: Uuid) -> Result<bool> {
        entry::delete_entry(&self.pool, school_id, entry_id, user_id).await
    }

    async fn list_booked_entries(&self, school_id: Uuid, day: Option<Weekday>) -> Result<Vec<BookedEntry>> {
        entry::list_booked_entries(&self.pool, school_id, day)
            .await?
            .into_iter()
            .map(BookedEntry::try_from)
            .collect()
    }

    async fn copy_entries(
        &self,
        school_id: Uuid,
        source_class_id: Uuid,
        target_class_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64> {
        entry::copy_entries(&self.pool, school_id, source_class_id, target_class_id, user_id).await
    }

    async fn list_students(&self, school_id: Uuid, class_id: Option<Uuid>) -> Result<Vec<Student>> {
        student::list_students(&self.pool, school_id, class_id)
            .await?
            .into_iter()
            .map(Student::try_from)
            .collect()
    }
}
