//! Search, filter and sort over a class roster.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CatalystError;
use crate::models::student::{Student, WellbeingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Xp,
    Level,
    Streak,
}

impl FromStr for SortField {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "xp" => Ok(SortField::Xp),
            "level" => Ok(SortField::Level),
            "streak" => Ok(SortField::Streak),
            other => Err(CatalystError::Validation(format!("Unknown sort field: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CatalystError::Validation(format!("Unknown sort order: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(WellbeingStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: Option<WellbeingStatus>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == Some(*wanted),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl RosterQuery {
    pub fn matches(&self, student: &Student) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = student.full_name().to_lowercase().contains(&needle)
            || student
                .email
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle);

        matches_search && self.status.accepts(student.wellbeing_status)
    }

    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self.sort_by {
            SortField::Name => a.full_name().to_lowercase().cmp(&b.full_name().to_lowercase()),
            SortField::Xp => a.xp.cmp(&b.xp),
            SortField::Level => a.level.cmp(&b.level),
            SortField::Streak => a.streak_days.cmp(&b.streak_days),
        }
    }
}

/// Students matching `query`, stably sorted. Ties keep their input order in
/// both directions.
pub fn filter_and_sort(students: &[Student], query: &RosterQuery) -> Vec<Student> {
    let mut result: Vec<Student> = students
        .iter()
        .filter(|s| query.matches(s))
        .cloned()
        .collect();

    match query.order {
        SortOrder::Asc => result.sort_by(|a, b| query.compare(a, b)),
        SortOrder::Desc => result.sort_by(|a, b| query.compare(b, a)),
    }

    result
}
