use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CatalystError;

/// Bucket summarising a student's derived wellbeing risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellbeingStatus {
    Thriving,
    Good,
    Managing,
    NeedsSupport,
    AtRisk,
}

impl WellbeingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellbeingStatus::Thriving => "thriving",
            WellbeingStatus::Good => "good",
            WellbeingStatus::Managing => "managing",
            WellbeingStatus::NeedsSupport => "needs_support",
            WellbeingStatus::AtRisk => "at_risk",
        }
    }
}

impl fmt::Display for WellbeingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellbeingStatus {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thriving" => Ok(WellbeingStatus::Thriving),
            "good" => Ok(WellbeingStatus::Good),
            "managing" => Ok(WellbeingStatus::Managing),
            "needs_support" => Ok(WellbeingStatus::NeedsSupport),
            "at_risk" => Ok(WellbeingStatus::AtRisk),
            other => Err(CatalystError::Validation(format!(
                "Unknown wellbeing status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub streak_days: i32,
    pub wellbeing_status: Option<WellbeingStatus>,
}

impl Student {
    /// `"first last"` with missing parts dropped; may be empty.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsResponse {
    pub students: Vec<Student>,
}
