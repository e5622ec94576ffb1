use async_trait::async_trait;
use catalyst_core::{
    errors::{CatalystError, CatalystResult},
    models::{
        conflict::{BatchConflictRequest, ConflictCheckRequest, ConflictCheckResponse},
        school::{
            AssignClassesRequest, Class, ClassAssignment, GradeLevel, ListAssignmentsResponse, ListClassesRequest,
            ListClassesResponse, ListGradeLevelsResponse, ListSubjectsResponse, ListUsersResponse, Profile, Subject,
            Teacher,
        },
        student::{ListStudentsResponse, Student},
        timetable::{
            CopyTimetableRequest, CopyTimetableResponse, CreateEntryRequest, CreateEntryResponse,
            ListEntriesResponse, ListSchemesResponse, SaveSchemeRequest, SuccessResponse, TimetableEntry,
            TimetableScheme, UpdateEntryRequest,
        },
    },
};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{api::TimetableBackend, config::ClientConfig};

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`TimetableBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> CatalystResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CatalystError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `path` with `segment` appended as one percent-encoded path segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> CatalystResult<Url> {
        let mut url = Url::parse(&self.config.url(path)).map_err(|e| CatalystError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CatalystError::Network(format!("{} is not a base URL", self.config.api_url)))?
            .push(segment);
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(USER_ID_HEADER, self.config.user_id.to_string())
    }

    /// Sends the request and decodes a 2xx body as `T`.
    ///
    /// Transport failures and non-2xx statuses become `Network`, carrying the
    /// server's `error` message when it sent one. A body that does not match
    /// `T` becomes `Decode`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> CatalystResult<T> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| CatalystError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalystError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!("API request failed with {}: {}", status, message);
            return Err(CatalystError::Network(format!("{}: {}", status.as_u16(), message)));
        }

        debug!("API request succeeded with {}", status);
        serde_json::from_str(&body).map_err(|e| CatalystError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TimetableBackend for HttpBackend {
    async fn profile(&self) -> CatalystResult<Profile> {
        self.send(self.client.get(self.config.url("/api/profile"))).await
    }

    async fn list_teachers(&self, school_id: Uuid) -> CatalystResult<Vec<Teacher>> {
        let request = self
            .client
            .get(self.config.url("/api/admin/users"))
            .query(&[("schoolId", school_id.to_string()), ("role", "teacher".to_string())]);
        let response: ListUsersResponse = self.send(request).await?;
        Ok(response.users)
    }

    async fn list_classes(&self, school_id: Uuid) -> CatalystResult<Vec<Class>> {
        let request = self
            .client
            .post(self.config.url("/api/admin/classes"))
            .json(&ListClassesRequest { school_id });
        let response: ListClassesResponse = self.send(request).await?;
        Ok(response.classes)
    }

    async fn classes_by_grade(&self, grade_level: String) -> CatalystResult<Vec<Class>> {
        let url = self.url_with_segment("/api/teacher/classes", &grade_level)?;
        let response: ListClassesResponse = self.send(self.client.get(url)).await?;
        Ok(response.classes)
    }

    async fn list_subjects(&self) -> CatalystResult<Vec<Subject>> {
        let url = self.config.url("/api/admin/timetable/subjects");
        let response: ListSubjectsResponse = self.send(self.client.get(url)).await?;
        Ok(response.subjects)
    }

    async fn list_schemes(&self) -> CatalystResult<Vec<TimetableScheme>> {
        let url = self.config.url("/api/admin/timetable/schemes");
        let response: ListSchemesResponse = self.send(self.client.get(url)).await?;
        Ok(response.schemes)
    }

    async fn create_scheme(&self, request: SaveSchemeRequest) -> CatalystResult<TimetableScheme> {
        let url = self.config.url("/api/admin/timetable/schemes");
        self.send(self.client.post(url).json(&request)).await
    }

    async fn apply_scheme(&self, scheme_id: Uuid, request: SaveSchemeRequest) -> CatalystResult<TimetableScheme> {
        let url = self.config.url(&format!("/api/admin/timetable/schemes/{}", scheme_id));
        self.send(self.client.put(url).json(&request)).await
    }

    async fn list_entries(&self, class_id: Uuid) -> CatalystResult<Vec<TimetableEntry>> {
        let request = self
            .client
            .get(self.config.url("/api/admin/timetable/entries"))
            .query(&[("classId", class_id.to_string())]);
        let response: ListEntriesResponse = self.send(request).await?;
        Ok(response.entries)
    }

    async fn create_entry(&self, request: CreateEntryRequest) -> CatalystResult<Uuid> {
        let url = self.config.url("/api/admin/timetable/entries");
        let response: CreateEntryResponse = self.send(self.client.post(url).json(&request)).await?;
        Ok(response.entry_id)
    }

    async fn update_entry(&self, request: UpdateEntryRequest) -> CatalystResult<()> {
        let url = self.config.url("/api/admin/timetable/entries");
        let _: SuccessResponse = self.send(self.client.put(url).json(&request)).await?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> CatalystResult<()> {
        let request = self
            .client
            .delete(self.config.url("/api/admin/timetable/entries"))
            .query(&[("entryId", entry_id.to_string())]);
        let _: SuccessResponse = self.send(request).await?;
        Ok(())
    }

    async fn check_conflicts(&self, request: ConflictCheckRequest) -> CatalystResult<ConflictCheckResponse> {
        let url = self.config.url("/api/admin/timetable/conflicts");
        self.send(self.client.post(url).json(&request)).await
    }

    async fn check_conflicts_batch(&self, request: BatchConflictRequest) -> CatalystResult<ConflictCheckResponse> {
        let url = self.config.url("/api/admin/timetable/conflicts/batch");
        self.send(self.client.post(url).json(&request)).await
    }

    async fn copy_timetable(&self, request: CopyTimetableRequest) -> CatalystResult<CopyTimetableResponse> {
        let url = self.config.url("/api/admin/timetable/copy");
        self.send(self.client.post(url).json(&request)).await
    }

    async fn list_students(&self, class_id: Option<Uuid>) -> CatalystResult<Vec<Student>> {
        let mut request = self.client.get(self.config.url("/api/teacher/students"));
        if let Some(class_id) = class_id {
            request = request.query(&[("classId", class_id.to_string())]);
        }
        let response: ListStudentsResponse = self.send(request).await?;
        Ok(response.students)
    }

    async fn grade_levels(&self) -> CatalystResult<Vec<GradeLevel>> {
        let url = self.config.url("/api/teacher/grade-levels");
        let response: ListGradeLevelsResponse = self.send(self.client.get(url)).await?;
        Ok(response.grade_levels)
    }

    async fn class_assignments(&self) -> CatalystResult<Vec<ClassAssignment>> {
        let url = self.config.url("/api/teacher/class-assignments");
        let response: ListAssignmentsResponse = self.send(self.client.get(url)).await?;
        Ok(response.assignments)
    }

    async fn assign_classes(&self, request: AssignClassesRequest) -> CatalystResult<Vec<ClassAssignment>> {
        let url = self.config.url("/api/teacher/class-assignments");
        let response: ListAssignmentsResponse = self.send(self.client.post(url).json(&request)).await?;
        Ok(response.assignments)
    }

    async fn unassign_class(&self, class_id: Uuid) -> CatalystResult<()> {
        let request = self
            .client
            .delete(self.config.url("/api/teacher/class-assignments"))
            .query(&[("classId", class_id.to_string())]);
        let _: SuccessResponse = self.send(request).await?;
        Ok(())
    }
}
