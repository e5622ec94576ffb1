use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CatalystError;

/// Days a school can teach on. The set is fixed at six; schemes pick a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalystError::Validation(format!("Unknown day of week: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Period,
    Break,
    Lunch,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Period => "period",
            SlotKind::Break => "break",
            SlotKind::Lunch => "lunch",
        }
    }
}

impl FromStr for SlotKind {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "period" => Ok(SlotKind::Period),
            "break" => Ok(SlotKind::Break),
            "lunch" => Ok(SlotKind::Lunch),
            other => Err(CatalystError::Validation(format!("Unknown slot type: {}", other))),
        }
    }
}

/// Serde adapter for `HH:MM` wall-clock times. Seconds are accepted on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| format!("invalid time '{}', expected HH:MM", raw))
    }
}

/// One row of the daily grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SlotKind,
}

impl TimeSlot {
    pub fn is_period(&self) -> bool {
        self.kind == SlotKind::Period
    }

    /// Half-open interval overlap: a slot ending at 10:15 does not overlap one starting at 10:15.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableScheme {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub periods_per_day: usize,
    pub days_per_week: usize,
    pub working_days: Vec<Weekday>,
    pub time_slots: Vec<TimeSlot>,
}

/// Entries loaded from the server carry their UUID; auto-generated ones only
/// have a draft id derived from their grid position until they are saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Persisted(Uuid),
    Draft(String),
}

impl EntryId {
    pub fn draft(day: Weekday, slot_id: &str, class_id: Uuid) -> Self {
        EntryId::Draft(format!("{}-{}-{}", day, slot_id, class_id))
    }

    pub fn persisted(&self) -> Option<Uuid> {
        match self {
            EntryId::Persisted(id) => Some(*id),
            EntryId::Draft(_) => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, EntryId::Draft(_))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Persisted(id) => write!(f, "{}", id),
            EntryId::Draft(id) => f.write_str(id),
        }
    }
}

/// The grid cell an entry occupies. At most one entry exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub day: Weekday,
    pub slot_id: String,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: EntryId,
    pub day: Weekday,
    pub slot_id: String,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
}

impl TimetableEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            day: self.day,
            slot_id: self.slot_id.clone(),
            class_id: self.class_id,
        }
    }

    pub fn matches(&self, day: Weekday, slot_id: &str, class_id: Uuid) -> bool {
        self.day == day && self.slot_id == slot_id && self.class_id == class_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesResponse {
    pub entries: Vec<TimetableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub time_slot_id: String,
    pub day_of_week: Weekday,
    pub room_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryResponse {
    pub entry_id: Uuid,
    pub success: bool,
}

/// Absent subject and teacher are left as stored. The room is always
/// replaced, so a missing or `null` room clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub entry_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyTimetableRequest {
    pub source_class_id: Uuid,
    pub target_class_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyTimetableResponse {
    pub message: String,
    pub copied: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchemesResponse {
    pub schemes: Vec<TimetableScheme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSchemeRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub working_days: Vec<Weekday>,
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub is_default: bool,
}
