//! Editing operations on a [`TimetableScheme`].
//!
//! Editing never rejects a change: slots may overlap or be out of order while
//! an admin works on them. [`TimetableScheme::validate`] is run when a scheme
//! is saved.

use chrono::NaiveTime;
use uuid::Uuid;

use crate::errors::{CatalystError, CatalystResult};
use crate::models::timetable::{SlotKind, TimeSlot, TimetableScheme, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Field changes for [`TimetableScheme::update_slot`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub label: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn slot(id: &str, start: (u32, u32), end: (u32, u32), label: &str, kind: SlotKind) -> TimeSlot {
    TimeSlot {
        id: id.to_string(),
        start_time: hm(start.0, start.1),
        end_time: hm(end.0, end.1),
        label: label.to_string(),
        kind,
    }
}

impl TimetableScheme {
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        working_days: Vec<Weekday>,
        time_slots: Vec<TimeSlot>,
    ) -> Self {
        let mut scheme = Self {
            id,
            name: name.into(),
            description: description.into(),
            periods_per_day: 0,
            days_per_week: 0,
            working_days,
            time_slots,
        };
        scheme.working_days.sort();
        scheme.working_days.dedup();
        scheme.refresh_counts();
        scheme
    }

    /// Six working days, six periods, a short break and lunch.
    pub fn standard_day() -> Self {
        use SlotKind::*;
        Self::new(
            Uuid::from_u128(1),
            "Standard Day",
            "Six periods with a short break and lunch",
            Weekday::ALL.to_vec(),
            vec![
                slot("1", (8, 0), (8, 45), "Period 1", Period),
                slot("2", (8, 45), (9, 30), "Period 2", Period),
                slot("3", (9, 30), (10, 15), "Period 3", Period),
                slot("break1", (10, 15), (10, 30), "Short Break", Break),
                slot("4", (10, 30), (11, 15), "Period 4", Period),
                slot("5", (11, 15), (12, 0), "Period 5", Period),
                slot("lunch", (12, 0), (12, 45), "Lunch Break", Lunch),
                slot("6", (12, 45), (13, 30), "Period 6", Period),
            ],
        )
    }

    /// Five working days, eight periods, two breaks and lunch.
    pub fn extended_day() -> Self {
        use SlotKind::*;
        Self::new(
            Uuid::from_u128(2),
            "Extended Day",
            "Eight periods over a five day week",
            Weekday::ALL[..5].to_vec(),
            vec![
                slot("1", (7, 30), (8, 15), "Period 1", Period),
                slot("2", (8, 15), (9, 0), "Period 2", Period),
                slot("3", (9, 0), (9, 45), "Period 3", Period),
                slot("break1", (9, 45), (10, 0), "Tea Break", Break),
                slot("4", (10, 0), (10, 45), "Period 4", Period),
                slot("5", (10, 45), (11, 30), "Period 5", Period),
                slot("lunch", (11, 30), (12, 15), "Lunch Break", Lunch),
                slot("6", (12, 15), (13, 0), "Period 6", Period),
                slot("7", (13, 0), (13, 45), "Period 7", Period),
                slot("break2", (13, 45), (14, 0), "Short Break", Break),
                slot("8", (14, 0), (14, 45), "Period 8", Period),
            ],
        )
    }

    pub fn presets() -> Vec<Self> {
        vec![Self::standard_day(), Self::extended_day()]
    }

    pub fn period_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.time_slots.iter().filter(|slot| slot.is_period())
    }

    pub fn slot(&self, slot_id: &str) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.id == slot_id)
    }

    fn refresh_counts(&mut self) {
        self.periods_per_day = self.period_slots().count();
        self.days_per_week = self.working_days.len();
    }

    fn unique_slot_id(&self, prefix: &str, mut n: usize) -> String {
        loop {
            let candidate = format!("{}-{}", prefix, n);
            if self.slot(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Appends a slot with the default range for its kind and returns its index.
    pub fn add_slot(&mut self, kind: SlotKind) -> usize {
        let new_slot = match kind {
            SlotKind::Period => {
                let periods = self.period_slots().count();
                TimeSlot {
                    id: self.unique_slot_id("period", self.time_slots.len() + 1),
                    start_time: hm(14, 0),
                    end_time: hm(14, 45),
                    label: format!("Period {}", periods + 1),
                    kind,
                }
            }
            SlotKind::Break => TimeSlot {
                id: self.unique_slot_id("break", 1),
                start_time: hm(10, 30),
                end_time: hm(10, 45),
                label: "Break".to_string(),
                kind,
            },
            SlotKind::Lunch => TimeSlot {
                id: self.unique_slot_id("lunch", 1),
                start_time: hm(12, 0),
                end_time: hm(12, 45),
                label: "Lunch Break".to_string(),
                kind,
            },
        };

        self.time_slots.push(new_slot);
        self.refresh_counts();
        self.time_slots.len() - 1
    }

    /// Swaps the slot with its neighbour. Returns `false` when nothing moved.
    pub fn reorder_slot(&mut self, index: usize, direction: Direction) -> bool {
        let len = self.time_slots.len();
        if index >= len {
            return false;
        }

        let neighbour = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return false,
        };

        self.time_slots.swap(index, neighbour);
        true
    }

    pub fn update_slot(&mut self, index: usize, patch: SlotPatch) -> CatalystResult<()> {
        let slot = self.time_slots.get_mut(index).ok_or_else(|| {
            CatalystError::NotFound(format!("No time slot at position {}", index))
        })?;

        if let Some(label) = patch.label {
            slot.label = label;
        }
        if let Some(start_time) = patch.start_time {
            slot.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            slot.end_time = end_time;
        }
        Ok(())
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<TimeSlot> {
        if index >= self.time_slots.len() {
            return None;
        }
        let removed = self.time_slots.remove(index);
        self.refresh_counts();
        Some(removed)
    }

    /// Adds or removes a working day. Returns whether the day is now a working day.
    pub fn toggle_working_day(&mut self, day: Weekday) -> bool {
        let enabled = match self.working_days.iter().position(|d| *d == day) {
            Some(pos) => {
                self.working_days.remove(pos);
                false
            }
            None => {
                self.working_days.push(day);
                self.working_days.sort();
                true
            }
        };
        self.refresh_counts();
        enabled
    }

    /// Everything that would make this scheme unusable as a grid template.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push("Scheme name must not be empty".to_string());
        }
        if self.working_days.is_empty() {
            issues.push("At least one working day is required".to_string());
        }
        if self.period_slots().next().is_none() {
            issues.push("At least one period is required".to_string());
        }

        for (i, slot) in self.time_slots.iter().enumerate() {
            if slot.start_time >= slot.end_time {
                issues.push(format!("'{}' must end after it starts", slot.label));
            }
            if self.time_slots[..i].iter().any(|other| other.id == slot.id) {
                issues.push(format!("Duplicate slot id '{}'", slot.id));
            }
        }

        for pair in self.time_slots.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.overlaps(next) {
                issues.push(format!("'{}' overlaps '{}'", next.label, prev.label));
            } else if next.start_time < prev.start_time {
                issues.push(format!("'{}' is scheduled before '{}'", next.label, prev.label));
            }
        }

        issues
    }

    pub fn validate(&self) -> CatalystResult<()> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalystError::Validation(issues.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for scheme in TimetableScheme::presets() {
            assert!(scheme.validate().is_ok(), "{} should be valid", scheme.name);
        }
        assert_eq!(TimetableScheme::standard_day().periods_per_day, 6);
        assert_eq!(TimetableScheme::extended_day().days_per_week, 5);
    }

    #[test]
    fn added_ids_do_not_collide() {
        let mut scheme = TimetableScheme::new(Uuid::new_v4(), "Test", "", vec![], vec![]);
        scheme.add_slot(SlotKind::Break);
        scheme.add_slot(SlotKind::Break);
        assert_eq!(scheme.time_slots[0].id, "break-1");
        assert_eq!(scheme.time_slots[1].id, "break-2");
    }
}
