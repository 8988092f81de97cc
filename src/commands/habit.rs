use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::database::queries;

pub fn add_habit(
    conn: &Connection,
    title: &str,
    color: &str,
    start_date: Option<NaiveDate>,
) -> Result<()> {
    let start = start_date.unwrap_or_else(|| Local::now().date_naive());
    let habit = queries::create_habit(conn, title, color, start)?;
    log::info!("created habit {} ({})", habit.title, habit.id);
    println!("Added \"{}\" (id {})", habit.title, habit.id);
    Ok(())
}

pub fn list_habits(conn: &Connection, all: bool) -> Result<()> {
    let habits = queries::get_habits(conn, all)?;
    if habits.is_empty() {
        println!("No habits yet. Add one with `habitflow add <title>`.");
        return Ok(());
    }

    for habit in habits {
        let span = if habit.is_active() {
            format!("since {}", habit.start_date)
        } else {
            format!(
                "{} - {}",
                habit.start_date,
                habit.end_date.unwrap_or(habit.start_date)
            )
        };
        println!("{}  {}  ({})", habit.id, habit.title, span);
    }
    Ok(())
}

pub fn end_habit(conn: &Connection, needle: &str, end_date: Option<NaiveDate>) -> Result<()> {
    let habit = queries::find_habit(conn, needle)?
        .ok_or_else(|| anyhow!("no habit matching '{}'", needle))?;
    let end = end_date.unwrap_or_else(|| Local::now().date_naive());
    queries::end_habit(conn, &habit.id, end)?;
    println!("Ended \"{}\" on {}", habit.title, end);
    Ok(())
}
