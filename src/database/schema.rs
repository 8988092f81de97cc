use anyhow::Result;
use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<()> {
    // Habits table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            color TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Daily status logs, one row per habit per day
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('done', 'missed', 'skipped')),
            logged_at INTEGER NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits(id),
            UNIQUE(date, habit_id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_logs_date ON habit_logs(date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_logs_habit_id ON habit_logs(habit_id)",
        [],
    )?;

    // One mood/energy check-in per day
    conn.execute(
        "CREATE TABLE IF NOT EXISTS mood_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            mood INTEGER NOT NULL CHECK(mood BETWEEN 1 AND 10),
            energy INTEGER NOT NULL CHECK(energy BETWEEN 1 AND 10),
            logged_at INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}
