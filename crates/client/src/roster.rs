//! The teacher's roster screen: a cached student list plus the search,
//! status and sort controls applied over it.

use std::sync::Arc;

use catalyst_core::{
    cache::{CacheStore, MemoryStore, TtlCache},
    errors::CatalystResult,
    models::{
        school::{AssignClassesRequest, Class, ClassAssignment, GradeLevel},
        student::Student,
    },
    roster::{RosterQuery, SortField, SortOrder, StatusFilter, filter_and_sort},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{api::TimetableBackend, config::ClientConfig};

const GRADE_LEVELS_KEY: &str = "grade-levels";
const ASSIGNMENTS_KEY: &str = "assignments";

fn students_key(class_id: Option<Uuid>) -> String {
    match class_id {
        Some(id) => format!("students:{}", id),
        None => "students:all".to_string(),
    }
}

pub struct RosterView<S: CacheStore = MemoryStore> {
    backend: Arc<dyn TimetableBackend>,
    cache: Arc<TtlCache<S>>,
    class_id: Option<Uuid>,
    students: Vec<Student>,
    query: RosterQuery,
}

impl RosterView<MemoryStore> {
    /// A view over its own in-memory cache, expiring after the configured TTL.
    pub fn from_config(backend: Arc<dyn TimetableBackend>, config: &ClientConfig) -> Self {
        Self::new(
            backend,
            Arc::new(TtlCache::new(MemoryStore::new(), config.cache_ttl())),
        )
    }
}

impl<S: CacheStore> RosterView<S> {
    pub fn new(backend: Arc<dyn TimetableBackend>, cache: Arc<TtlCache<S>>) -> Self {
        Self {
            backend,
            cache,
            class_id: None,
            students: Vec::new(),
            query: RosterQuery::default(),
        }
    }

    fn remember<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.put(key, value) {
            warn!("Could not cache {}: {}", key, e);
        }
    }

    fn recall<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let hit = self.cache.get::<T>(key)?;
        debug!("Cache hit for {} (stored {})", key, hit.inserted_at);
        Some(hit.value)
    }

    /// Loads the roster of `class_id`, or of the whole school when `None`,
    /// serving it from the cache while fresh.
    pub async fn load(&mut self, class_id: Option<Uuid>) -> CatalystResult<()> {
        let key = students_key(class_id);

        let students = match self.recall::<Vec<Student>>(&key) {
            Some(students) => students,
            None => {
                let students = self.backend.list_students(class_id).await?;
                self.remember(&key, &students);
                students
            }
        };

        self.class_id = class_id;
        self.students = students;
        Ok(())
    }

    /// Drops the cached roster and fetches it again.
    pub async fn reload(&mut self) -> CatalystResult<()> {
        self.cache.invalidate(&students_key(self.class_id));
        self.load(self.class_id).await
    }

    pub async fn classes_for_grade(&self, grade_level: &str) -> CatalystResult<Vec<Class>> {
        let key = format!("classes:{}", grade_level);
        if let Some(classes) = self.recall::<Vec<Class>>(&key) {
            return Ok(classes);
        }

        let classes = self.backend.classes_by_grade(grade_level.to_string()).await?;
        self.remember(&key, &classes);
        Ok(classes)
    }

    pub async fn grade_levels(&self) -> CatalystResult<Vec<GradeLevel>> {
        if let Some(grades) = self.recall::<Vec<GradeLevel>>(GRADE_LEVELS_KEY) {
            return Ok(grades);
        }

        let grades = self.backend.grade_levels().await?;
        self.remember(GRADE_LEVELS_KEY, &grades);
        Ok(grades)
    }

    /// The caller's own classes.
    pub async fn assignments(&self) -> CatalystResult<Vec<ClassAssignment>> {
        if let Some(assignments) = self.recall::<Vec<ClassAssignment>>(ASSIGNMENTS_KEY) {
            return Ok(assignments);
        }

        let assignments = self.backend.class_assignments().await?;
        self.remember(ASSIGNMENTS_KEY, &assignments);
        Ok(assignments)
    }

    /// Replaces the caller's classes. The cached set is dropped first.
    pub async fn assign_classes(
        &self,
        class_ids: Vec<Uuid>,
        subject: impl Into<String>,
    ) -> CatalystResult<Vec<ClassAssignment>> {
        self.cache.invalidate(ASSIGNMENTS_KEY);

        let request = AssignClassesRequest {
            class_ids,
            subject: subject.into(),
        };
        let assignments = self.backend.assign_classes(request).await?;
        self.remember(ASSIGNMENTS_KEY, &assignments);
        Ok(assignments)
    }

    pub async fn unassign_class(&self, class_id: Uuid) -> CatalystResult<()> {
        self.cache.invalidate(ASSIGNMENTS_KEY);
        self.backend.unassign_class(class_id).await
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
    }

    pub fn set_sort(&mut self, sort_by: SortField, order: SortOrder) {
        self.query.sort_by = sort_by;
        self.query.order = order;
    }

    pub fn toggle_order(&mut self) {
        self.query.order = self.query.order.toggled();
    }

    pub fn query(&self) -> &RosterQuery {
        &self.query
    }

    pub fn class_id(&self) -> Option<Uuid> {
        self.class_id
    }

    /// Every loaded student, unfiltered.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// The students as the screen shows them.
    pub fn visible(&self) -> Vec<Student> {
        filter_and_sort(&self.students, &self.query)
    }
}
