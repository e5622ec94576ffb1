use async_trait::async_trait;
use catalyst_core::{
    errors::CatalystResult,
    models::{
        conflict::{BatchConflictRequest, ConflictCheckRequest, ConflictCheckResponse},
        school::{AssignClassesRequest, Class, ClassAssignment, GradeLevel, Profile, Subject, Teacher},
        student::Student,
        timetable::{
            CopyTimetableRequest, CopyTimetableResponse, CreateEntryRequest, SaveSchemeRequest,
            TimetableEntry, TimetableScheme, UpdateEntryRequest,
        },
    },
};
use mockall::automock;
use uuid::Uuid;

/// The Catalyst API as seen by the client. Each method maps to one request.
#[automock]
#[async_trait]
pub trait TimetableBackend: Send + Sync {
    async fn profile(&self) -> CatalystResult<Profile>;

    async fn list_teachers(&self, school_id: Uuid) -> CatalystResult<Vec<Teacher>>;

    async fn list_classes(&self, school_id: Uuid) -> CatalystResult<Vec<Class>>;

    async fn classes_by_grade(&self, grade_level: String) -> CatalystResult<Vec<Class>>;

    async fn list_subjects(&self) -> CatalystResult<Vec<Subject>>;

    async fn list_schemes(&self) -> CatalystResult<Vec<TimetableScheme>>;

    async fn create_scheme(&self, request: SaveSchemeRequest) -> CatalystResult<TimetableScheme>;

    async fn apply_scheme(&self, scheme_id: Uuid, request: SaveSchemeRequest) -> CatalystResult<TimetableScheme>;

    async fn list_entries(&self, class_id: Uuid) -> CatalystResult<Vec<TimetableEntry>>;

    /// Returns the new entry's id.
    async fn create_entry(&self, request: CreateEntryRequest) -> CatalystResult<Uuid>;

    async fn update_entry(&self, request: UpdateEntryRequest) -> CatalystResult<()>;

    async fn delete_entry(&self, entry_id: Uuid) -> CatalystResult<()>;

    async fn check_conflicts(&self, request: ConflictCheckRequest) -> CatalystResult<ConflictCheckResponse>;

    async fn check_conflicts_batch(&self, request: BatchConflictRequest) -> CatalystResult<ConflictCheckResponse>;

    async fn copy_timetable(&self, request: CopyTimetableRequest) -> CatalystResult<CopyTimetableResponse>;

    async fn list_students(&self, class_id: Option<Uuid>) -> CatalystResult<Vec<Student>>;

    async fn grade_levels(&self) -> CatalystResult<Vec<GradeLevel>>;

    async fn class_assignments(&self) -> CatalystResult<Vec<ClassAssignment>>;

    /// Replaces the caller's assignments and returns the stored set.
    async fn assign_classes(&self, request: AssignClassesRequest) -> CatalystResult<Vec<ClassAssignment>>;

    async fn unassign_class(&self, class_id: Uuid) -> CatalystResult<()>;
}
