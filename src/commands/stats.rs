use anyhow::Result;
use rusqlite::Connection;

use crate::database::queries;
use crate::models::{CorrelationType, Impact, Strength};
use crate::services::correlation_engine::{self, EngineConfig};
use crate::services::mood_engine::{self, MoodEngineConfig};

fn strength_label(strength: Strength) -> &'static str {
    match strength {
        Strength::Strong => "strong",
        Strength::Moderate => "moderate",
        Strength::Weak => "weak",
    }
}

fn impact_label(impact: Impact) -> &'static str {
    match impact {
        Impact::High => "high",
        Impact::Medium => "medium",
        Impact::Low => "low",
    }
}

pub fn show_correlations(conn: &Connection, json: bool) -> Result<()> {
    let habits = queries::get_habits(conn, true)?;
    let logs = queries::load_daily_logs(conn)?;
    let config = EngineConfig::default();
    let report = correlation_engine::analyze(&habits, &logs, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.correlations.is_empty() {
        println!(
            "No significant correlations yet. Track at least 2 habits for {}+ days.",
            config.min_sample_size
        );
        return Ok(());
    }

    println!(
        "{} correlated pair(s), average |r| {:.2}\n",
        report.insights.total_pairs, report.insights.avg_correlation
    );

    for pair in &report.correlations {
        let sign = if pair.correlation_type == CorrelationType::Negative {
            "-"
        } else {
            "+"
        };
        println!(
            "[{}] \"{}\" / \"{}\"  r={:+.2} ({}), together {:.0}% of A's done days, n={}{}",
            sign,
            pair.habit_a.title,
            pair.habit_b.title,
            pair.correlation_coefficient,
            strength_label(pair.strength),
            pair.co_occurrence_rate,
            pair.total_days_tracked,
            if pair.is_keystone_pair { ", keystone pair" } else { "" },
        );
        println!("    {}", pair.suggestion);
    }

    if !report.insights.isolated_habits.is_empty() {
        let titles: Vec<&str> = habits
            .iter()
            .filter(|h| report.insights.isolated_habits.contains(&h.id))
            .map(|h| h.title.as_str())
            .collect();
        println!("\nNo significant correlations for: {}", titles.join(", "));
    }

    Ok(())
}

pub fn show_keystones(conn: &Connection) -> Result<()> {
    let habits = queries::get_habits(conn, true)?;
    let logs = queries::load_daily_logs(conn)?;
    let config = EngineConfig::default();
    let report = correlation_engine::analyze(&habits, &logs, &config);

    if report.insights.keystone_habits.is_empty() {
        println!("No keystone habits yet: none has 2+ significant correlations.");
        return Ok(());
    }

    for (rank, keystone) in report.insights.keystone_habits.iter().enumerate() {
        println!(
            "{}. \"{}\": {} connections, impact {}, avg r {:+.2}",
            rank + 1,
            keystone.title,
            keystone.connected_habits,
            impact_label(keystone.impact),
            keystone.avg_correlation,
        );
        for connection in &keystone.connections {
            println!("     -> \"{}\" (r={:+.2})", connection.title, connection.correlation);
        }
    }

    Ok(())
}

pub fn show_mood_matrix(conn: &Connection, json: bool) -> Result<()> {
    let habits = queries::get_habits(conn, true)?;
    let logs = queries::load_daily_logs(conn)?;
    let moods = queries::load_mood_entries(conn)?;
    let config = MoodEngineConfig::default();
    let results = mood_engine::compute_mood_correlations(&habits, &logs, &moods, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!(
            "Not enough data. Record mood and energy alongside habit logs for {}+ days.",
            config.min_sample_size
        );
        return Ok(());
    }

    println!("Completion % by mood and energy band (low / medium / high):\n");
    for r in &results {
        println!(
            "\"{}\"  (n={}, r_mood={:+.2}, r_energy={:+.2})",
            r.habit_title, r.total_days_with_mood_data, r.mood_correlation, r.energy_correlation
        );
        println!(
            "    mood:   {:>3.0}% / {:>3.0}% / {:>3.0}%",
            r.completion_rate_by_mood.low,
            r.completion_rate_by_mood.medium,
            r.completion_rate_by_mood.high
        );
        println!(
            "    energy: {:>3.0}% / {:>3.0}% / {:>3.0}%",
            r.completion_rate_by_energy.low,
            r.completion_rate_by_energy.medium,
            r.completion_rate_by_energy.high
        );
    }

    Ok(())
}
