use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CatalystError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl FromStr for Role {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            other => Err(CatalystError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// The authenticated caller, resolved once per request and passed to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Uuid,
    pub school_id: Uuid,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub grade_level: String,
    #[serde(default)]
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Subject ids this teacher can take.
    #[serde(default)]
    pub subjects: Vec<Uuid>,
}

impl Teacher {
    pub fn teaches(&self, subject_id: Uuid) -> bool {
        self.subjects.contains(&subject_id)
    }
}

pub const NO_EMAIL: &str = "No email provided";

/// A user row as stored, before the display name has been worked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub subjects: Vec<Uuid>,
}

impl UserRecord {
    /// Builds the display form of a teacher. `position` is the zero-based
    /// index in the listing and only matters when no name can be derived.
    pub fn into_teacher(self, position: usize) -> Teacher {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty() && *e != NO_EMAIL)
            .map(str::to_string);

        let name = display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.name.as_deref(),
            email.as_deref(),
        )
        .unwrap_or_else(|| format!("Teacher {}", position + 1));

        Teacher {
            id: self.id,
            name,
            email: email.unwrap_or_else(|| NO_EMAIL.to_string()),
            subjects: self.subjects,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First and last name, then a free-form name, then the e-mail local part
/// with separators turned into spaces and each word capitalised.
pub fn display_name(
    first_name: Option<&str>,
    last_name: Option<&str>,
    name: Option<&str>,
    email: Option<&str>,
) -> Option<String> {
    let from_parts = match (non_blank(first_name), non_blank(last_name)) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first.to_string()),
        (None, Some(last)) => Some(last.to_string()),
        (None, None) => non_blank(name).map(str::to_string),
    };

    if let Some(candidate) = from_parts {
        if !candidate.eq_ignore_ascii_case("no email") {
            return Some(candidate);
        }
    }

    let local = non_blank(email)?.split('@').next()?;
    let words: Vec<String> = local
        .split(['.', '_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<Teacher>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesRequest {
    pub school_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesResponse {
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubjectsResponse {
    pub subjects: Vec<Subject>,
}

/// A grade that has at least one class in the school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevel {
    pub grade_level: String,
    pub class_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGradeLevelsResponse {
    pub grade_levels: Vec<GradeLevel>,
}

pub const DEFAULT_ASSIGNMENT_SUBJECT: &str = "General";

fn default_assignment_subject() -> String {
    DEFAULT_ASSIGNMENT_SUBJECT.to_string()
}

/// A class a teacher has taken on for their roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAssignment {
    pub id: Uuid,
    pub class: Class,
    pub subject: String,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsResponse {
    pub assignments: Vec<ClassAssignment>,
}

/// Replaces the caller's assignments with `class_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignClassesRequest {
    pub class_ids: Vec<Uuid>,
    #[serde(default = "default_assignment_subject")]
    pub subject: String,
}
