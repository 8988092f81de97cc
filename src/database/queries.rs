use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{DailyLogs, Habit, HabitStatus, MoodEntry};

const DATE_FMT: &str = "%Y-%m-%d";

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| anyhow!("bad date '{}' in store: {}", s, e))
}

pub fn create_habit(
    conn: &Connection,
    title: &str,
    color: &str,
    start_date: NaiveDate,
) -> Result<Habit> {
    let habit = Habit {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        color: color.to_string(),
        start_date,
        end_date: None,
    };

    conn.execute(
        "INSERT INTO habits (id, title, color, start_date, end_date, created_at)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        rusqlite::params![
            habit.id,
            habit.title,
            habit.color,
            habit.start_date.format(DATE_FMT).to_string(),
            chrono::Utc::now().timestamp(),
        ],
    )?;

    Ok(habit)
}

pub fn get_habits(conn: &Connection, include_ended: bool) -> Result<Vec<Habit>> {
    let filter = if include_ended {
        ""
    } else {
        "WHERE end_date IS NULL"
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT id, title, color, start_date, end_date
         FROM habits {} ORDER BY created_at ASC",
        filter
    ))?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut habits = Vec::new();
    for row in rows {
        let (id, title, color, start, end) = row?;
        habits.push(Habit {
            id,
            title,
            color,
            start_date: parse_date(&start)?,
            end_date: end.as_deref().map(parse_date).transpose()?,
        });
    }
    Ok(habits)
}

/// Looks a habit up by exact id first, then by case-insensitive title.
pub fn find_habit(conn: &Connection, needle: &str) -> Result<Option<Habit>> {
    let row = conn
        .query_row(
            "SELECT id, title, color, start_date, end_date FROM habits
             WHERE id = ?1 OR LOWER(title) = LOWER(?1)
             LIMIT 1",
            [needle],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((id, title, color, start, end)) = row else {
        return Ok(None);
    };
    Ok(Some(Habit {
        id,
        title,
        color,
        start_date: parse_date(&start)?,
        end_date: end.as_deref().map(parse_date).transpose()?,
    }))
}

pub fn end_habit(conn: &Connection, habit_id: &str, end_date: NaiveDate) -> Result<()> {
    let changed = conn.execute(
        "UPDATE habits SET end_date = ?1 WHERE id = ?2",
        rusqlite::params![end_date.format(DATE_FMT).to_string(), habit_id],
    )?;
    if changed == 0 {
        return Err(anyhow!("no habit with id {}", habit_id));
    }
    Ok(())
}

/// Records (or replaces) the status of one habit on one day.
pub fn upsert_log(
    conn: &Connection,
    habit_id: &str,
    date: NaiveDate,
    status: HabitStatus,
) -> Result<()> {
    conn.execute(
        "INSERT INTO habit_logs (habit_id, date, status, logged_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date, habit_id) DO UPDATE SET
             status = excluded.status,
             logged_at = excluded.logged_at",
        rusqlite::params![
            habit_id,
            date.format(DATE_FMT).to_string(),
            status.as_str(),
            chrono::Utc::now().timestamp(),
        ],
    )?;
    Ok(())
}

/// Rebuilds the full date -> habit -> status map the analytics engine
/// consumes.
pub fn load_daily_logs(conn: &Connection) -> Result<DailyLogs> {
    let mut stmt = conn.prepare("SELECT date, habit_id, status FROM habit_logs")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut logs = DailyLogs::new();
    for row in rows {
        let (date, habit_id, status) = row?;
        let status: HabitStatus = status.parse()?;
        logs.entry(parse_date(&date)?)
            .or_default()
            .insert(habit_id, status);
    }
    Ok(logs)
}

pub fn upsert_mood(conn: &Connection, entry: &MoodEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO mood_entries (date, mood, energy, logged_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date) DO UPDATE SET
             mood = excluded.mood,
             energy = excluded.energy,
             logged_at = excluded.logged_at",
        rusqlite::params![
            entry.date.format(DATE_FMT).to_string(),
            entry.mood,
            entry.energy,
            chrono::Utc::now().timestamp(),
        ],
    )?;
    Ok(())
}

pub fn load_mood_entries(conn: &Connection) -> Result<Vec<MoodEntry>> {
    let mut stmt =
        conn.prepare("SELECT date, mood, energy FROM mood_entries ORDER BY date ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u8>(1)?,
            row.get::<_, u8>(2)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (date, mood, energy) = row?;
        entries.push(MoodEntry {
            date: parse_date(&date)?,
            mood,
            energy,
        });
    }
    Ok(entries)
}
