use serde::{Deserialize, Serialize};

/// Display identity of one side of a correlated pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitRef {
    pub id: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationType {
    Positive,
    Negative,
    None,
}

/// A statistically significant relationship between two habits, computed
/// over the days on which both were tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub habit_a: HabitRef,
    pub habit_b: HabitRef,

    /// Pearson r over the binary completion series, in [-1, 1].
    pub correlation_coefficient: f64,
    /// Percentage of A's done days on which B was also done.
    pub co_occurrence_rate: f64,
    /// Number of days on which both habits had a recorded status.
    pub total_days_tracked: usize,

    pub strength: Strength,
    pub correlation_type: CorrelationType,
    /// Both habits individually complete at a high rate.
    pub is_keystone_pair: bool,

    pub suggestion: String,
}

impl PairCorrelation {
    pub fn involves(&self, habit_id: &str) -> bool {
        self.habit_a.id == habit_id || self.habit_b.id == habit_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub habit_id: String,
    pub title: String,
    pub correlation: f64,
}

/// A habit with multiple significant correlations, suggesting outsized
/// influence on overall consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoneHabit {
    pub habit_id: String,
    pub title: String,
    pub color: String,
    pub avg_correlation: f64,
    pub connected_habits: usize,
    pub impact: Impact,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationInsights {
    pub strongest_positive: Vec<PairCorrelation>,
    pub strongest_negative: Vec<PairCorrelation>,
    pub keystone_habits: Vec<KeystoneHabit>,
    pub total_pairs: usize,
    /// Mean of |r| across all qualifying pairs, 0 when there are none.
    pub avg_correlation: f64,
    /// Habits absent from every qualifying pair.
    pub isolated_habits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub correlations: Vec<PairCorrelation>,
    pub insights: CorrelationInsights,
}

/// Completion rate (%) partitioned by a low/medium/high score band.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BandRates {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// How one habit's completion relates to daily mood and energy scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitMoodCorrelation {
    pub habit_id: String,
    pub habit_title: String,
    pub habit_color: String,
    pub mood_correlation: f64,
    pub energy_correlation: f64,
    pub completion_rate_by_mood: BandRates,
    pub completion_rate_by_energy: BandRates,
    pub total_days_with_mood_data: usize,
}
