//! mockall double of [`Store`] for handler tests.

use async_trait::async_trait;
use catalyst_core::conflicts::BookedEntry;
use catalyst_core::models::{
    school::{Class, ClassAssignment, GradeLevel, Profile, Role, Subject, UserRecord},
    student::Student,
    timetable::{CreateEntryRequest, TimetableEntry, TimetableScheme, UpdateEntryRequest, Weekday},
};
use mockall::mock;
use uuid::Uuid;

use crate::store::Store;

mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
        async fn profile(&self, user_id: Uuid) -> eyre::Result<Option<Profile>>;

        async fn list_users(
            &self,
            school_id: Uuid,
            role: Role,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<UserRecord>>;

        async fn list_classes(&self, school_id: Uuid) -> eyre::Result<Vec<Class>>;

        async fn list_classes_by_grade(
            &self,
            school_id: Uuid,
            grade_level: String,
        ) -> eyre::Result<Vec<Class>>;

        async fn get_class(&self, school_id: Uuid, class_id: Uuid) -> eyre::Result<Option<Class>>;

        async fn list_subjects(&self, school_id: Uuid) -> eyre::Result<Vec<Subject>>;

        async fn list_grade_levels(&self, school_id: Uuid) -> eyre::Result<Vec<GradeLevel>>;

        async fn list_class_assignments(
            &self,
            school_id: Uuid,
            teacher_id: Uuid,
        ) -> eyre::Result<Vec<ClassAssignment>>;

        async fn replace_class_assignments(
            &self,
            school_id: Uuid,
            teacher_id: Uuid,
            class_ids: Vec<Uuid>,
            subject: String,
        ) -> eyre::Result<u64>;

        async fn delete_class_assignment(
            &self,
            school_id: Uuid,
            teacher_id: Uuid,
            class_id: Uuid,
        ) -> eyre::Result<bool>;

        async fn list_schemes(&self, school_id: Uuid) -> eyre::Result<Vec<TimetableScheme>>;

        async fn create_scheme(
            &self,
            school_id: Uuid,
            scheme: TimetableScheme,
            is_default: bool,
        ) -> eyre::Result<()>;

        async fn update_scheme(
            &self,
            school_id: Uuid,
            scheme: TimetableScheme,
            is_default: bool,
        ) -> eyre::Result<bool>;

        async fn list_entries(&self, school_id: Uuid, class_id: Uuid) -> eyre::Result<Vec<TimetableEntry>>;

        async fn create_entry(
            &self,
            school_id: Uuid,
            request: CreateEntryRequest,
            user_id: Uuid,
        ) -> eyre::Result<Option<Uuid>>;

        async fn update_entry(
            &self,
            school_id: Uuid,
            request: UpdateEntryRequest,
            user_id: Uuid,
        ) -> eyre::Result<bool>;

        async fn delete_entry(&self, school_id: Uuid, entry_id: Uuid, user_id: Uuid) -> eyre::Result<bool>;

        async fn list_booked_entries(
            &self,
            school_id: Uuid,
            day: Option<Weekday>,
        ) -> eyre::Result<Vec<BookedEntry>>;

        async fn copy_entries(
            &self,
            school_id: Uuid,
            source_class_id: Uuid,
            target_class_id: Uuid,
            user_id: Uuid,
        ) -> eyre::Result<u64>;

        async fn list_students(&self, school_id: Uuid, class_id: Option<Uuid>) -> eyre::Result<Vec<Student>>;
    }
}
