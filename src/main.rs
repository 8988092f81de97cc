mod commands;
mod database;
mod models;
mod services;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use models::HabitStatus;

#[derive(Parser)]
#[command(name = "habitflow")]
#[command(version)]
#[command(about = "Habit tracker with correlation analytics")]
struct Cli {
    /// Path to the database file (defaults to the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new habit
    Add {
        title: String,

        /// Display color token
        #[arg(long, default_value = "#4ade80")]
        color: String,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// List habits
    List {
        /// Include ended habits
        #[arg(long)]
        all: bool,
    },

    /// Stop tracking a habit
    End {
        /// Habit id or title
        habit: String,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a habit's status for a day
    Log {
        /// Habit id or title
        habit: String,

        /// done, missed or skipped
        status: HabitStatus,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record mood and energy for a day (1-10 each)
    Mood {
        mood: u8,
        energy: u8,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Statistical reports
    Stats {
        #[command(subcommand)]
        report: StatsReport,

        /// Emit the raw report as JSON instead of text
        #[arg(long, global = true)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum StatsReport {
    /// Pairwise habit correlations with suggestions
    Correlations,
    /// Habits with the most significant connections
    Keystones,
    /// Completion rates by mood and energy band
    Mood,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(database::default_db_path);
    let conn = database::init_database(&db_path)?;

    match cli.command {
        Commands::Add { title, color, start } => {
            commands::habit::add_habit(&conn, &title, &color, start)
        }
        Commands::List { all } => commands::habit::list_habits(&conn, all),
        Commands::End { habit, date } => commands::habit::end_habit(&conn, &habit, date),
        Commands::Log { habit, status, date } => {
            commands::log::log_status(&conn, &habit, status, date)
        }
        Commands::Mood { mood, energy, date } => {
            commands::log::log_mood(&conn, mood, energy, date)
        }
        Commands::Stats { report, json } => match report {
            StatsReport::Correlations => commands::stats::show_correlations(&conn, json),
            StatsReport::Keystones => commands::stats::show_keystones(&conn),
            StatsReport::Mood => commands::stats::show_mood_matrix(&conn, json),
        },
    }
}
