//! Summaries over one class's timetable: workload, subject balance,
//! completeness checks and CSV export.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::school::{Subject, Teacher};
use crate::models::timetable::{TimetableEntry, TimetableScheme};

pub const DEFAULT_MAX_PERIODS_PER_DAY: usize = 6;

fn class_entries(entries: &[TimetableEntry], class_id: Uuid) -> impl Iterator<Item = &TimetableEntry> {
    entries.iter().filter(move |e| e.class_id == class_id)
}

/// Periods per teacher in the class. Every listed teacher appears, at zero if unassigned.
pub fn teacher_workload(
    teachers: &[Teacher],
    entries: &[TimetableEntry],
    class_id: Uuid,
) -> HashMap<Uuid, usize> {
    let mut workload: HashMap<Uuid, usize> = teachers.iter().map(|t| (t.id, 0)).collect();
    for teacher_id in class_entries(entries, class_id).filter_map(|e| e.teacher_id) {
        *workload.entry(teacher_id).or_default() += 1;
    }
    workload
}

/// Periods per subject in the class. Every listed subject appears.
pub fn subject_distribution(
    subjects: &[Subject],
    entries: &[TimetableEntry],
    class_id: Uuid,
) -> HashMap<Uuid, usize> {
    let mut distribution: HashMap<Uuid, usize> = subjects.iter().map(|s| (s.id, 0)).collect();
    for entry in class_entries(entries, class_id) {
        *distribution.entry(entry.subject_id).or_default() += 1;
    }
    distribution
}

/// Human-readable warnings about gaps, under-scheduled subjects and
/// overloaded teachers. An empty result means the timetable looks complete.
pub fn validate_timetable(
    scheme: &TimetableScheme,
    class_id: Uuid,
    entries: &[TimetableEntry],
    subjects: &[Subject],
    teachers: &[Teacher],
    max_periods_per_day: usize,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let total_slots = scheme.working_days.len() * scheme.period_slots().count();
    let filled = class_entries(entries, class_id).count();

    if filled < total_slots {
        warnings.push(format!("{} empty slots remaining", total_slots - filled));
    }

    if !subjects.is_empty() {
        let recommended = total_slots / subjects.len();
        let distribution = subject_distribution(subjects, entries, class_id);
        for subject in subjects {
            let count = distribution.get(&subject.id).copied().unwrap_or(0);
            if count + 2 < recommended {
                warnings.push(format!(
                    "{} has only {} periods (recommended: {})",
                    subject.name, count, recommended
                ));
            }
        }
    }

    let max_periods = max_periods_per_day * scheme.working_days.len();
    let workload = teacher_workload(teachers, entries, class_id);
    for teacher in teachers {
        let count = workload.get(&teacher.id).copied().unwrap_or(0);
        if count > max_periods {
            warnings.push(format!(
                "{} assigned {} periods (max: {})",
                teacher.name, count, max_periods
            ));
        }
    }

    warnings
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// `Day,Period,Subject,Teacher,Room`, one row per working day and period.
pub fn export_csv(
    scheme: &TimetableScheme,
    class_id: Uuid,
    entries: &[TimetableEntry],
    subjects: &[Subject],
    teachers: &[Teacher],
) -> String {
    let mut csv = String::from("Day,Period,Subject,Teacher,Room\n");

    for &day in &scheme.working_days {
        for slot in scheme.period_slots() {
            let entry = class_entries(entries, class_id).find(|e| e.day == day && e.slot_id == slot.id);
            let row = match entry {
                Some(entry) => {
                    let subject = subjects
                        .iter()
                        .find(|s| s.id == entry.subject_id)
                        .map(|s| s.name.as_str())
                        .unwrap_or("");
                    let teacher = entry
                        .teacher_id
                        .and_then(|id| teachers.iter().find(|t| t.id == id))
                        .map(|t| t.name.as_str())
                        .unwrap_or("");
                    format!(
                        "{},{},{},{},{}\n",
                        day,
                        csv_field(&slot.label),
                        csv_field(subject),
                        csv_field(teacher),
                        csv_field(entry.room_number.as_deref().unwrap_or(""))
                    )
                }
                None => format!("{},{},,,\n", day, csv_field(&slot.label)),
            };
            csv.push_str(&row);
        }
    }

    csv
}
