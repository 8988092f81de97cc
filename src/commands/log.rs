use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::database::queries;
use crate::models::{HabitStatus, MoodEntry};

pub fn log_status(
    conn: &Connection,
    needle: &str,
    status: HabitStatus,
    date: Option<NaiveDate>,
) -> Result<()> {
    let habit = queries::find_habit(conn, needle)?
        .ok_or_else(|| anyhow!("no habit matching '{}'", needle))?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    if date < habit.start_date {
        return Err(anyhow!(
            "\"{}\" starts on {}; cannot log {}",
            habit.title,
            habit.start_date,
            date
        ));
    }

    queries::upsert_log(conn, &habit.id, date, status)?;
    println!("{}: \"{}\" -> {}", date, habit.title, status);
    Ok(())
}

pub fn log_mood(conn: &Connection, mood: u8, energy: u8, date: Option<NaiveDate>) -> Result<()> {
    if !(1..=10).contains(&mood) || !(1..=10).contains(&energy) {
        return Err(anyhow!("mood and energy must be between 1 and 10"));
    }
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    queries::upsert_mood(conn, &MoodEntry::new(date, mood, energy))?;
    println!("{}: mood {}/10, energy {}/10", date, mood, energy);
    Ok(())
}
