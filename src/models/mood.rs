use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One mood/energy check-in per day, both on a 1-10 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: u8,
    pub energy: u8,
}

impl MoodEntry {
    pub fn new(date: NaiveDate, mood: u8, energy: u8) -> Self {
        Self {
            date,
            mood: mood.clamp(1, 10),
            energy: energy.clamp(1, 10),
        }
    }
}
