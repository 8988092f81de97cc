use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub color: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Habit {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Per-habit, per-day state as logged by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Done,
    Missed,
    Skipped,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Done => "done",
            HabitStatus::Missed => "missed",
            HabitStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid habit status '{0}' (expected done, missed or skipped)")]
pub struct ParseStatusError(pub String);

impl FromStr for HabitStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "done" => Ok(HabitStatus::Done),
            "missed" => Ok(HabitStatus::Missed),
            "skipped" => Ok(HabitStatus::Skipped),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Date -> habit id -> status. A day may omit any habit; absence means
/// "not tracked that day", never "missed".
pub type DailyLogs = BTreeMap<NaiveDate, HashMap<String, HabitStatus>>;
