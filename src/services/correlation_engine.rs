use std::collections::HashMap;

use crate::models::{
    Connection, CorrelationInsights, CorrelationReport, CorrelationType, DailyLogs, Habit,
    HabitRef, HabitStatus, Impact, KeystoneHabit, PairCorrelation, Strength,
};
use crate::services::suggestion;

/// Tunable thresholds for the correlation analysis. Defaults are the
/// product contract; tests inject variants to probe boundaries.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum jointly-logged days before a pair is considered at all.
    pub min_sample_size: usize,
    /// Pairs with |r| below this are dropped, not merely flagged weak.
    pub correlation_threshold: f64,
    /// |r| at or above this classifies as strong.
    pub strong_cutoff: f64,
    /// Individual completion rate (%) both habits need for a keystone pair.
    pub keystone_completion_pct: f64,
    pub top_positive: usize,
    pub top_negative: usize,
    pub top_keystones: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_sample_size: 10,
            correlation_threshold: 0.3,
            strong_cutoff: 0.6,
            keystone_completion_pct: 70.0,
            top_positive: 5,
            top_negative: 3,
            top_keystones: 3,
        }
    }
}

/// Pearson correlation coefficient over two equal-length series.
/// Returns 0 for empty, mismatched or constant (zero-variance) input.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Accepts any r, not just values that survive the pair filter, so it can
/// be reused on raw coefficients.
pub fn classify_strength(r: f64, config: &EngineConfig) -> Strength {
    let abs_r = r.abs();
    if abs_r >= config.strong_cutoff {
        Strength::Strong
    } else if abs_r >= config.correlation_threshold {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

pub fn classify_type(r: f64, config: &EngineConfig) -> CorrelationType {
    if r >= config.correlation_threshold {
        CorrelationType::Positive
    } else if r <= -config.correlation_threshold {
        CorrelationType::Negative
    } else {
        CorrelationType::None
    }
}

fn habit_ref(habit: &Habit) -> HabitRef {
    HabitRef {
        id: habit.id.clone(),
        title: habit.title.clone(),
        color: habit.color.clone(),
    }
}

/// Pairwise correlations across every unordered habit pair.
///
/// A day contributes to a pair only when both habits have a recorded
/// status on it; statuses collapse to done = 1, missed/skipped = 0, so
/// the engine measures "completed together", not "logged together".
/// Pairs with fewer than `min_sample_size` joint days or |r| below
/// `correlation_threshold` are omitted entirely.
pub fn compute_pair_correlations(
    habits: &[Habit],
    logs: &DailyLogs,
    config: &EngineConfig,
) -> Vec<PairCorrelation> {
    if habits.len() < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::new();

    for i in 0..habits.len() {
        for j in (i + 1)..habits.len() {
            let habit_a = &habits[i];
            let habit_b = &habits[j];

            // BTreeMap iteration gives us the dates in order already.
            let mut a_values: Vec<f64> = Vec::new();
            let mut b_values: Vec<f64> = Vec::new();
            for day in logs.values() {
                let (Some(status_a), Some(status_b)) =
                    (day.get(&habit_a.id), day.get(&habit_b.id))
                else {
                    continue;
                };
                a_values.push(if *status_a == HabitStatus::Done { 1.0 } else { 0.0 });
                b_values.push(if *status_b == HabitStatus::Done { 1.0 } else { 0.0 });
            }

            if a_values.len() < config.min_sample_size {
                continue;
            }

            let r = pearson(&a_values, &b_values);
            if r.abs() < config.correlation_threshold {
                continue;
            }

            let both_done = a_values
                .iter()
                .zip(&b_values)
                .filter(|(a, b)| **a == 1.0 && **b == 1.0)
                .count();
            let a_done = a_values.iter().filter(|v| **v == 1.0).count();
            let co_occurrence_rate = if a_done > 0 {
                (both_done as f64 / a_done as f64) * 100.0
            } else {
                0.0
            };

            let a_completion = (a_done as f64 / a_values.len() as f64) * 100.0;
            let b_done = b_values.iter().filter(|v| **v == 1.0).count();
            let b_completion = (b_done as f64 / b_values.len() as f64) * 100.0;
            let is_keystone_pair = a_completion >= config.keystone_completion_pct
                && b_completion >= config.keystone_completion_pct;

            let mut pair = PairCorrelation {
                habit_a: habit_ref(habit_a),
                habit_b: habit_ref(habit_b),
                correlation_coefficient: r,
                co_occurrence_rate,
                total_days_tracked: a_values.len(),
                strength: classify_strength(r, config),
                correlation_type: classify_type(r, config),
                is_keystone_pair,
                suggestion: String::new(),
            };
            pair.suggestion = suggestion::for_pair(&pair, config);

            pairs.push(pair);
        }
    }

    pairs
}

/// Aggregate view over the qualifying pairs: bounded top lists, keystone
/// habits ranked by connection count, isolated habits, network averages.
pub fn compute_insights(
    correlations: &[PairCorrelation],
    habits: &[Habit],
    config: &EngineConfig,
) -> CorrelationInsights {
    let mut sorted: Vec<&PairCorrelation> = correlations.iter().collect();
    sorted.sort_by(|a, b| {
        b.correlation_coefficient
            .abs()
            .total_cmp(&a.correlation_coefficient.abs())
    });

    let positive: Vec<PairCorrelation> = sorted
        .iter()
        .filter(|c| c.correlation_type == CorrelationType::Positive)
        .take(config.top_positive)
        .map(|c| (*c).clone())
        .collect();
    let negative: Vec<PairCorrelation> = sorted
        .iter()
        .filter(|c| c.correlation_type == CorrelationType::Negative)
        .take(config.top_negative)
        .map(|c| (*c).clone())
        .collect();

    // Per-habit connection graph.
    let mut connection_map: HashMap<&str, Vec<Connection>> = HashMap::new();
    for corr in correlations {
        let r = corr.correlation_coefficient;
        connection_map
            .entry(corr.habit_a.id.as_str())
            .or_default()
            .push(Connection {
                habit_id: corr.habit_b.id.clone(),
                title: corr.habit_b.title.clone(),
                correlation: r,
            });
        connection_map
            .entry(corr.habit_b.id.as_str())
            .or_default()
            .push(Connection {
                habit_id: corr.habit_a.id.clone(),
                title: corr.habit_a.title.clone(),
                correlation: r,
            });
    }

    let mut keystone_habits: Vec<KeystoneHabit> = Vec::new();
    for habit in habits {
        let Some(connections) = connection_map.get(habit.id.as_str()) else {
            continue;
        };
        // At least two significant correlations to count as keystone.
        if connections.len() < 2 {
            continue;
        }

        let avg_correlation =
            connections.iter().map(|c| c.correlation).sum::<f64>() / connections.len() as f64;
        let impact = if connections.len() >= 4 {
            Impact::High
        } else if connections.len() >= 3 {
            Impact::Medium
        } else {
            Impact::Low
        };

        let mut sorted_connections = connections.clone();
        sorted_connections.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));

        keystone_habits.push(KeystoneHabit {
            habit_id: habit.id.clone(),
            title: habit.title.clone(),
            color: habit.color.clone(),
            avg_correlation,
            connected_habits: connections.len(),
            impact,
            connections: sorted_connections,
        });
    }
    keystone_habits.sort_by(|a, b| b.connected_habits.cmp(&a.connected_habits));
    keystone_habits.truncate(config.top_keystones);

    let isolated_habits: Vec<String> = habits
        .iter()
        .filter(|h| !connection_map.contains_key(h.id.as_str()))
        .map(|h| h.id.clone())
        .collect();

    let avg_correlation = if correlations.is_empty() {
        0.0
    } else {
        correlations
            .iter()
            .map(|c| c.correlation_coefficient.abs())
            .sum::<f64>()
            / correlations.len() as f64
    };

    CorrelationInsights {
        strongest_positive: positive,
        strongest_negative: negative,
        keystone_habits,
        total_pairs: correlations.len(),
        avg_correlation,
        isolated_habits,
    }
}

/// Full recomputation from current inputs; cheap at realistic sizes.
pub fn analyze(habits: &[Habit], logs: &DailyLogs, config: &EngineConfig) -> CorrelationReport {
    let correlations = compute_pair_correlations(habits, logs, config);
    let insights = compute_insights(&correlations, habits, config);
    CorrelationReport {
        correlations,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn habit(id: &str, title: &str) -> Habit {
        Habit {
            id: id.to_string(),
            title: title.to_string(),
            color: "#4ade80".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(day as u64 - 1)
    }

    /// Builds logs from per-habit status rows: one status per day, `None`
    /// meaning the habit was not tracked that day.
    fn logs_from_rows(rows: &[(&str, Vec<Option<HabitStatus>>)]) -> DailyLogs {
        let mut logs: DailyLogs = BTreeMap::new();
        for (id, statuses) in rows {
            for (day_idx, status) in statuses.iter().enumerate() {
                if let Some(status) = status {
                    logs.entry(date(day_idx as u32 + 1))
                        .or_default()
                        .insert(id.to_string(), *status);
                }
            }
        }
        logs
    }

    fn pattern(days: &[u8]) -> Vec<Option<HabitStatus>> {
        days.iter()
            .map(|d| match d {
                1 => Some(HabitStatus::Done),
                0 => Some(HabitStatus::Missed),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x = vec![1.0, 0.0, 1.0, 0.0, 1.0];
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_degenerate_series_is_zero() {
        let constant = vec![1.0; 10];
        let varying = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(pearson(&constant, &varying), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_strength_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(classify_strength(0.6, &config), Strength::Strong);
        assert_eq!(classify_strength(-0.75, &config), Strength::Strong);
        assert_eq!(classify_strength(0.59, &config), Strength::Moderate);
        assert_eq!(classify_strength(0.3, &config), Strength::Moderate);
        assert_eq!(classify_strength(-0.3, &config), Strength::Moderate);
        assert_eq!(classify_strength(0.29, &config), Strength::Weak);
        assert_eq!(classify_strength(0.0, &config), Strength::Weak);
    }

    #[test]
    fn test_type_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(classify_type(0.3, &config), CorrelationType::Positive);
        assert_eq!(classify_type(-0.3, &config), CorrelationType::Negative);
        assert_eq!(classify_type(0.29, &config), CorrelationType::None);
        assert_eq!(classify_type(-0.29, &config), CorrelationType::None);
    }

    #[test]
    fn test_fewer_than_two_habits_yields_nothing() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read")];
        let logs = logs_from_rows(&[("a", pattern(&[1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0]))]);
        assert!(compute_pair_correlations(&habits, &logs, &config).is_empty());

        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.total_pairs, 0);
        assert_eq!(report.insights.avg_correlation, 0.0);

        let report = analyze(&[], &BTreeMap::new(), &config);
        assert!(report.correlations.is_empty());
        assert_eq!(report.insights.total_pairs, 0);
    }

    #[test]
    fn test_insufficient_joint_days_excludes_pair() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read"), habit("b", "Run")];
        // Only 9 days where both have a status.
        let logs = logs_from_rows(&[
            ("a", pattern(&[1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1])),
            ("b", pattern(&[1, 0, 1, 0, 1, 0, 1, 0, 1, 9, 9, 9])),
        ]);
        let report = analyze(&habits, &logs, &config);
        assert!(report.correlations.is_empty());
        assert_eq!(report.insights.total_pairs, 0);
        assert_eq!(report.insights.isolated_habits.len(), 2);
    }

    #[test]
    fn test_perfectly_aligned_habits() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read"), habit("b", "Run")];
        // Same statuses on the same 12 days, 10 of them done (>70%).
        let days = [1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0];
        let logs = logs_from_rows(&[("a", pattern(&days)), ("b", pattern(&days))]);

        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert!((pair.correlation_coefficient - 1.0).abs() < 1e-9);
        assert_eq!(pair.correlation_type, CorrelationType::Positive);
        assert_eq!(pair.strength, Strength::Strong);
        assert!(pair.is_keystone_pair);
        assert_eq!(pair.total_days_tracked, 12);
        assert!((pair.co_occurrence_rate - 100.0).abs() < 1e-9);
        assert!(!pair.suggestion.is_empty());
    }

    #[test]
    fn test_perfect_inverse_habits() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Late TV"), habit("b", "Early run")];
        let a = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let b = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        let logs = logs_from_rows(&[("a", pattern(&a)), ("b", pattern(&b))]);

        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert!((pair.correlation_coefficient + 1.0).abs() < 1e-9);
        assert_eq!(pair.correlation_type, CorrelationType::Negative);
        assert_eq!(pair.strength, Strength::Strong);
        assert!(!pair.is_keystone_pair);
        // Never done together.
        assert_eq!(pair.co_occurrence_rate, 0.0);
    }

    #[test]
    fn test_skipped_counts_as_not_done() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read"), habit("b", "Run")];
        // b uses skipped where a uses missed; collapse makes them identical.
        let a = pattern(&[1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);
        let b: Vec<Option<HabitStatus>> = a
            .iter()
            .map(|s| match s {
                Some(HabitStatus::Missed) => Some(HabitStatus::Skipped),
                other => *other,
            })
            .collect();
        let logs = logs_from_rows(&[("a", a), ("b", b)]);

        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].correlation_coefficient - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_pair_is_dropped() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read"), habit("b", "Run")];
        // a done every single day: zero variance, r defined as 0, filtered.
        let logs = logs_from_rows(&[
            ("a", pattern(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1])),
            ("b", pattern(&[1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0])),
        ]);
        let report = analyze(&habits, &logs, &config);
        assert!(report.correlations.is_empty());
        assert!(report.insights.isolated_habits.contains(&"a".to_string()));
        assert!(report.insights.isolated_habits.contains(&"b".to_string()));
    }

    #[test]
    fn test_co_occurrence_is_asymmetric() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "Read"), habit("b", "Run")];
        // a done 8/12 days, b done on 6 of those and never alone:
        // A->B co-occurrence 75%, while r is the same either way.
        let a = [1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0];
        let b = [1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0];
        let logs = logs_from_rows(&[("a", pattern(&a)), ("b", pattern(&b))]);

        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert_eq!(pairs.len(), 1);
        let r_ab = pairs[0].correlation_coefficient;
        assert!((pairs[0].co_occurrence_rate - 75.0).abs() < 1e-9);

        // Swap iteration order: r unchanged, co-occurrence recomputed from
        // the new A's done days (6 of 6 -> 100%).
        let habits_swapped = vec![habit("b", "Run"), habit("a", "Read")];
        let pairs = compute_pair_correlations(&habits_swapped, &logs, &config);
        assert!((pairs[0].correlation_coefficient - r_ab).abs() < 1e-9);
        assert!((pairs[0].co_occurrence_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_produced_pairs_meet_threshold() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "A"), habit("b", "B"), habit("c", "C")];
        // a/b strongly aligned; c nearly independent of both.
        let logs = logs_from_rows(&[
            ("a", pattern(&[1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1])),
            ("b", pattern(&[1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1])),
            ("c", pattern(&[1, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0])),
        ]);
        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert!(!pairs.is_empty());
        for pair in &pairs {
            assert!(pair.correlation_coefficient.abs() >= config.correlation_threshold);
            assert!(pair.total_days_tracked >= config.min_sample_size);
        }
    }

    /// All habits share one alternating pattern so every pair has r = 1;
    /// connection count per habit is then n - 1.
    fn fully_connected(n: usize) -> (Vec<Habit>, DailyLogs) {
        let ids: Vec<String> = (0..n).map(|i| format!("h{}", i)).collect();
        let habits: Vec<Habit> = ids.iter().map(|id| habit(id, id)).collect();
        let days = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let rows: Vec<(&str, Vec<Option<HabitStatus>>)> =
            ids.iter().map(|id| (id.as_str(), pattern(&days))).collect();
        (habits, logs_from_rows(&rows))
    }

    #[test]
    fn test_keystone_impact_tiers() {
        let config = EngineConfig::default();

        // 3 habits -> 2 connections each -> low.
        let (habits, logs) = fully_connected(3);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.keystone_habits[0].connected_habits, 2);
        assert_eq!(report.insights.keystone_habits[0].impact, Impact::Low);

        // 4 habits -> 3 connections each -> medium.
        let (habits, logs) = fully_connected(4);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.keystone_habits[0].connected_habits, 3);
        assert_eq!(report.insights.keystone_habits[0].impact, Impact::Medium);

        // 5 habits -> 4 connections each -> high.
        let (habits, logs) = fully_connected(5);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.keystone_habits[0].connected_habits, 4);
        assert_eq!(report.insights.keystone_habits[0].impact, Impact::High);
    }

    #[test]
    fn test_single_connection_is_not_keystone() {
        let config = EngineConfig::default();
        let (habits, logs) = fully_connected(2);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.total_pairs, 1);
        assert!(report.insights.keystone_habits.is_empty());
        assert!(report.insights.isolated_habits.is_empty());
    }

    #[test]
    fn test_insight_truncation_limits() {
        let config = EngineConfig::default();
        // 4 fully-connected habits: 6 positive pairs, 3 keystone slots.
        let (habits, logs) = fully_connected(4);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.total_pairs, 6);
        assert_eq!(report.insights.strongest_positive.len(), 5);
        assert!(report.insights.strongest_negative.is_empty());
        assert_eq!(report.insights.keystone_habits.len(), 3);
    }

    #[test]
    fn test_avg_correlation_is_mean_abs_r() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "A"), habit("b", "B"), habit("c", "C")];
        let a = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let inv = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        // a/b r = 1, a/c r = -1, b/c r = -1.
        let logs = logs_from_rows(&[
            ("a", pattern(&a)),
            ("b", pattern(&a)),
            ("c", pattern(&inv)),
        ]);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.total_pairs, 3);
        assert!((report.insights.avg_correlation - 1.0).abs() < 1e-9);
        assert_eq!(report.insights.strongest_negative.len(), 2);
    }

    #[test]
    fn test_isolated_habits_are_exactly_the_unconnected() {
        let config = EngineConfig::default();
        let habits = vec![habit("a", "A"), habit("b", "B"), habit("c", "C")];
        let days = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        // c has no overlap with anyone.
        let logs = logs_from_rows(&[
            ("a", pattern(&days)),
            ("b", pattern(&days)),
            ("c", pattern(&[9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9])),
        ]);
        let report = analyze(&habits, &logs, &config);
        assert_eq!(report.insights.isolated_habits, vec!["c".to_string()]);
    }

    #[test]
    fn test_thresholds_are_injectable() {
        let config = EngineConfig {
            min_sample_size: 4,
            ..EngineConfig::default()
        };
        let habits = vec![habit("a", "A"), habit("b", "B")];
        let days = [1, 0, 1, 0];
        let logs = logs_from_rows(&[("a", pattern(&days)), ("b", pattern(&days))]);
        let pairs = compute_pair_correlations(&habits, &logs, &config);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].total_days_tracked, 4);
    }
}
