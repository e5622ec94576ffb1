//! Round-robin timetable generation.
//!
//! This is not a constraint solver: it walks every working day and every
//! period slot of a scheme in order and deals subjects out like cards.

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{CatalystError, CatalystResult};
use crate::models::school::{Subject, Teacher};
use crate::models::timetable::{EntryId, TimetableEntry, TimetableScheme};

/// Upper bound for the generated `R<n>` room labels.
pub const ROOM_COUNT: u32 = 20;

/// Builds a full week of draft entries for `class_id`.
///
/// The `i`-th period visited (days outer, slots inner) gets
/// `subjects[i % subjects.len()]`. The teacher is the first one able to teach
/// that subject, falling back to the first teacher. Only room labels depend
/// on `rng`.
pub fn auto_generate<R: Rng + ?Sized>(
    scheme: &TimetableScheme,
    class_id: Uuid,
    subjects: &[Subject],
    teachers: &[Teacher],
    rng: &mut R,
) -> CatalystResult<Vec<TimetableEntry>> {
    if subjects.is_empty() {
        return Err(CatalystError::Validation(
            "At least one subject is required to generate a timetable".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(scheme.working_days.len() * scheme.periods_per_day);
    let mut subject_index = 0usize;

    for &day in &scheme.working_days {
        for slot in scheme.period_slots() {
            let subject = &subjects[subject_index % subjects.len()];
            let teacher = teachers
                .iter()
                .find(|t| t.teaches(subject.id))
                .or_else(|| teachers.first());

            entries.push(TimetableEntry {
                id: EntryId::draft(day, &slot.id, class_id),
                day,
                slot_id: slot.id.clone(),
                class_id,
                subject_id: subject.id,
                teacher_id: teacher.map(|t| t.id),
                room_number: Some(format!("R{}", rng.gen_range(1..=ROOM_COUNT))),
            });

            subject_index += 1;
        }
    }

    debug!(
        class_id = %class_id,
        scheme = %scheme.name,
        entries = entries.len(),
        "generated round-robin timetable"
    );

    Ok(entries)
}
