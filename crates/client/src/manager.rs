//! State behind the timetable editor: the active class, its entries and the
//! conflicts last detected for them.
//!
//! Every mutation goes through the [`TimetableBackend`] and is followed by a
//! re-fetch, so the in-memory list mirrors the server after each successful
//! call. Auto-generated drafts are the one exception: they live only here
//! until saved one by one.

use std::sync::Arc;

use catalyst_core::{
    analytics,
    conflicts::ConflictSet,
    errors::{CatalystError, CatalystResult},
    generator,
    models::{
        conflict::{BatchConflictRequest, ConflictCheckRequest},
        school::{Class, Profile, Subject, Teacher},
        timetable::{
            CopyTimetableRequest, CopyTimetableResponse, CreateEntryRequest, SaveSchemeRequest,
            TimetableEntry, TimetableScheme, UpdateEntryRequest, Weekday,
        },
    },
};
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::TimetableBackend;

/// Lists the editor needs before anything can be assigned.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub profile: Option<Profile>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub schemes: Vec<TimetableScheme>,
}

/// The contents of the entry dialog for one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub day: Weekday,
    pub slot_id: String,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_number: Option<String>,
}

impl EntryDraft {
    pub fn new(day: Weekday, slot_id: impl Into<String>) -> Self {
        Self {
            day,
            slot_id: slot_id.into(),
            subject_id: None,
            teacher_id: None,
            room_number: None,
        }
    }
}

pub struct EntryManager {
    backend: Arc<dyn TimetableBackend>,
    class_id: Option<Uuid>,
    entries: Vec<TimetableEntry>,
    conflicts: Vec<String>,
    reference: ReferenceData,
}

impl EntryManager {
    pub fn new(backend: Arc<dyn TimetableBackend>) -> Self {
        Self {
            backend,
            class_id: None,
            entries: Vec::new(),
            conflicts: Vec::new(),
            reference: ReferenceData::default(),
        }
    }

    pub fn active_class(&self) -> Option<Uuid> {
        self.class_id
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn entry_at(&self, day: Weekday, slot_id: &str) -> Option<&TimetableEntry> {
        let class_id = self.class_id?;
        self.entries.iter().find(|e| e.matches(day, slot_id, class_id))
    }

    /// Fetches the profile first, since the teacher and class lists are
    /// scoped to its school, then the remaining lists concurrently.
    pub async fn load_reference_data(&mut self) -> CatalystResult<&ReferenceData> {
        let profile = self.backend.profile().await?;
        let school_id = profile.school_id;

        let (teachers, classes, subjects, schemes) = tokio::try_join!(
            self.backend.list_teachers(school_id),
            self.backend.list_classes(school_id),
            self.backend.list_subjects(),
            self.backend.list_schemes(),
        )?;

        info!(
            "Loaded {} teachers, {} classes, {} subjects and {} schemes",
            teachers.len(),
            classes.len(),
            subjects.len(),
            schemes.len()
        );

        self.reference = ReferenceData {
            profile: Some(profile),
            teachers,
            classes,
            subjects,
            schemes,
        };
        Ok(&self.reference)
    }

    /// Makes `class_id` the class being edited and loads its entries.
    pub async fn select_class(&mut self, class_id: Uuid) -> CatalystResult<()> {
        self.class_id = Some(class_id);
        self.conflicts.clear();
        self.refresh().await
    }

    /// Replaces the in-memory entries with the server's, dropping drafts.
    pub async fn refresh(&mut self) -> CatalystResult<()> {
        let Some(class_id) = self.class_id else {
            self.entries.clear();
            return Ok(());
        };

        let entries = self.backend.list_entries(class_id).await?;
        debug!("Class {} has {} entries", class_id, entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Saves the cell described by `draft`.
    ///
    /// A persisted entry in the same cell is updated. Otherwise a new entry is
    /// created, which also covers saving an auto-generated draft.
    pub async fn upsert_entry(&mut self, draft: EntryDraft) -> CatalystResult<()> {
        let class_id = self
            .class_id
            .ok_or_else(|| CatalystError::Validation("Select a class first".to_string()))?;
        let subject_id = draft
            .subject_id
            .ok_or_else(|| CatalystError::Validation("Subject is required".to_string()))?;
        let teacher_id = draft
            .teacher_id
            .ok_or_else(|| CatalystError::Validation("Teacher is required".to_string()))?;
        let room_number = draft
            .room_number
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let existing = self
            .entries
            .iter()
            .find(|e| e.matches(draft.day, &draft.slot_id, class_id))
            .and_then(|e| e.id.persisted());

        match existing {
            Some(entry_id) => {
                self.backend
                    .update_entry(UpdateEntryRequest {
                        entry_id,
                        subject_id: Some(subject_id),
                        teacher_id: Some(teacher_id),
                        room_number,
                    })
                    .await?;
                info!("Updated entry {}", entry_id);
            }
            None => {
                let entry_id = self
                    .backend
                    .create_entry(CreateEntryRequest {
                        class_id,
                        subject_id,
                        teacher_id: Some(teacher_id),
                        time_slot_id: draft.slot_id.clone(),
                        day_of_week: draft.day,
                        room_number,
                    })
                    .await?;
                info!("Created entry {} on {} in slot {}", entry_id, draft.day, draft.slot_id);
            }
        }

        self.refresh().await
    }

    /// Clears a cell. Returns whether there was anything to clear.
    pub async fn delete_entry(&mut self, day: Weekday, slot_id: &str) -> CatalystResult<bool> {
        let Some(position) = self
            .class_id
            .and_then(|class_id| self.entries.iter().position(|e| e.matches(day, slot_id, class_id)))
        else {
            return Ok(false);
        };

        match self.entries[position].id.persisted() {
            None => {
                self.entries.remove(position);
                Ok(true)
            }
            Some(entry_id) => {
                self.backend.delete_entry(entry_id).await?;
                info!("Deleted entry {}", entry_id);
                self.refresh().await?;
                Ok(true)
            }
        }
    }

    /// Checks every entry that has a teacher or room, one request each.
    /// Failed checks are logged and skipped.
    pub async fn detect_conflicts(&mut self) -> &[String] {
        let checks: Vec<ConflictCheckRequest> = self
            .entries
            .iter()
            .filter_map(ConflictCheckRequest::for_entry)
            .collect();

        let mut found = ConflictSet::new();
        for check in checks {
            let slot = format!("{} {}", check.day_of_week, check.time_slot_id);
            match self.backend.check_conflicts(check).await {
                Ok(response) => found.extend_from(&response.conflicts),
                Err(e) => warn!("Conflict check for {} failed: {}", slot, e),
            }
        }

        self.conflicts = found.into_messages();
        &self.conflicts
    }

    /// Same result as [`detect_conflicts`](Self::detect_conflicts) from a
    /// single request. A failure leaves the stored list untouched.
    pub async fn detect_conflicts_batched(&mut self) -> CatalystResult<&[String]> {
        let checks: Vec<ConflictCheckRequest> = self
            .entries
            .iter()
            .filter_map(ConflictCheckRequest::for_entry)
            .collect();

        let mut found = ConflictSet::new();
        if !checks.is_empty() {
            let response = self
                .backend
                .check_conflicts_batch(BatchConflictRequest { checks })
                .await?;
            found.extend_from(&response.conflicts);
        }

        self.conflicts = found.into_messages();
        Ok(&self.conflicts)
    }

    /// Fills the active class's week with drafts. Nothing is saved.
    pub fn auto_generate<R: Rng + ?Sized>(
        &mut self,
        scheme: &TimetableScheme,
        subjects: &[Subject],
        teachers: &[Teacher],
        rng: &mut R,
    ) -> CatalystResult<usize> {
        let class_id = self
            .class_id
            .ok_or_else(|| CatalystError::Validation("Select a class first".to_string()))?;

        self.entries = generator::auto_generate(scheme, class_id, subjects, teachers, rng)?;
        self.conflicts.clear();
        info!("Generated {} draft entries for class {}", self.entries.len(), class_id);
        Ok(self.entries.len())
    }

    /// Copies the active class's timetable onto `target`. Returns `None`
    /// without a request when there is no active class or it is the target.
    pub async fn copy_to_class(&self, target: Uuid) -> CatalystResult<Option<CopyTimetableResponse>> {
        let Some(source) = self.class_id.filter(|source| *source != target) else {
            return Ok(None);
        };

        let response = self
            .backend
            .copy_timetable(CopyTimetableRequest {
                source_class_id: source,
                target_class_id: target,
            })
            .await?;
        info!("{}", response.message);
        Ok(Some(response))
    }

    /// Validates and persists an edited scheme, then reloads the scheme list.
    /// Built-in presets are stored as new schemes; anything else is updated
    /// in place.
    pub async fn save_scheme(&mut self, scheme: &TimetableScheme, is_default: bool) -> CatalystResult<TimetableScheme> {
        scheme.validate()?;

        let request = SaveSchemeRequest {
            name: scheme.name.clone(),
            description: scheme.description.clone(),
            working_days: scheme.working_days.clone(),
            time_slots: scheme.time_slots.clone(),
            is_default,
        };

        let is_preset = TimetableScheme::presets().iter().any(|p| p.id == scheme.id);
        let saved = if is_preset {
            self.backend.create_scheme(request).await?
        } else {
            self.backend.apply_scheme(scheme.id, request).await?
        };

        self.reference.schemes = self.backend.list_schemes().await?;
        Ok(saved)
    }

    /// Gaps, thin subjects and overloaded teachers in the active class.
    pub fn validation_warnings(&self, scheme: &TimetableScheme, max_periods_per_day: usize) -> Vec<String> {
        let Some(class_id) = self.class_id else {
            return Vec::new();
        };
        analytics::validate_timetable(
            scheme,
            class_id,
            &self.entries,
            &self.reference.subjects,
            &self.reference.teachers,
            max_periods_per_day,
        )
    }

    pub fn export_csv(&self, scheme: &TimetableScheme) -> CatalystResult<String> {
        let class_id = self
            .class_id
            .ok_or_else(|| CatalystError::Validation("Select a class first".to_string()))?;
        Ok(analytics::export_csv(
            scheme,
            class_id,
            &self.entries,
            &self.reference.subjects,
            &self.reference.teachers,
        ))
    }
}
