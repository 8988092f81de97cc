use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{
    BandRates, DailyLogs, Habit, HabitMoodCorrelation, HabitStatus, MoodEntry,
};
use crate::services::correlation_engine::pearson;

/// Thresholds for the mood/energy analysis. The band split partitions the
/// 1-10 score scale into low/medium/high.
#[derive(Debug, Clone)]
pub struct MoodEngineConfig {
    /// Minimum days with both a logged status and a mood entry.
    pub min_sample_size: usize,
    /// Scores at or below this are "low".
    pub low_band_max: u8,
    /// Scores at or below this (and above low) are "medium"; above is "high".
    pub medium_band_max: u8,
}

impl Default for MoodEngineConfig {
    fn default() -> Self {
        Self {
            min_sample_size: 5,
            low_band_max: 4,
            medium_band_max: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Band {
    Low,
    Medium,
    High,
}

fn band_for(score: u8, config: &MoodEngineConfig) -> Band {
    if score <= config.low_band_max {
        Band::Low
    } else if score <= config.medium_band_max {
        Band::Medium
    } else {
        Band::High
    }
}

#[derive(Default)]
struct BandCounter {
    done: HashMap<Band, usize>,
    total: HashMap<Band, usize>,
}

impl BandCounter {
    fn record(&mut self, band: Band, done: bool) {
        *self.total.entry(band).or_insert(0) += 1;
        if done {
            *self.done.entry(band).or_insert(0) += 1;
        }
    }

    fn rate(&self, band: Band) -> f64 {
        let total = self.total.get(&band).copied().unwrap_or(0);
        if total == 0 {
            return 0.0;
        }
        let done = self.done.get(&band).copied().unwrap_or(0);
        (done as f64 / total as f64) * 100.0
    }

    fn rates(&self) -> BandRates {
        BandRates {
            low: self.rate(Band::Low),
            medium: self.rate(Band::Medium),
            high: self.rate(Band::High),
        }
    }
}

/// Per-habit relationship between completion and daily mood/energy scores:
/// Pearson r of the binary completion indicator against each score, plus
/// completion rates partitioned by score band. Habits with fewer than
/// `min_sample_size` joint days are skipped.
pub fn compute_mood_correlations(
    habits: &[Habit],
    logs: &DailyLogs,
    moods: &[MoodEntry],
    config: &MoodEngineConfig,
) -> Vec<HabitMoodCorrelation> {
    let mood_by_date: HashMap<NaiveDate, &MoodEntry> =
        moods.iter().map(|m| (m.date, m)).collect();

    let mut results = Vec::new();

    for habit in habits {
        let mut completion: Vec<f64> = Vec::new();
        let mut mood_scores: Vec<f64> = Vec::new();
        let mut energy_scores: Vec<f64> = Vec::new();
        let mut mood_bands = BandCounter::default();
        let mut energy_bands = BandCounter::default();

        for (date, day) in logs {
            let (Some(status), Some(entry)) = (day.get(&habit.id), mood_by_date.get(date))
            else {
                continue;
            };
            let done = *status == HabitStatus::Done;
            completion.push(if done { 1.0 } else { 0.0 });
            mood_scores.push(entry.mood as f64);
            energy_scores.push(entry.energy as f64);
            mood_bands.record(band_for(entry.mood, config), done);
            energy_bands.record(band_for(entry.energy, config), done);
        }

        if completion.len() < config.min_sample_size {
            continue;
        }

        results.push(HabitMoodCorrelation {
            habit_id: habit.id.clone(),
            habit_title: habit.title.clone(),
            habit_color: habit.color.clone(),
            mood_correlation: pearson(&completion, &mood_scores),
            energy_correlation: pearson(&completion, &energy_scores),
            completion_rate_by_mood: mood_bands.rates(),
            completion_rate_by_energy: energy_bands.rates(),
            total_days_with_mood_data: completion.len(),
        });
    }

    results
}
