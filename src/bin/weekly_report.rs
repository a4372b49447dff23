//! Print a week of nutrition totals from the diary
//! Usage: cargo run --bin weekly_report -- [start-date]
//!
//! Without a date the report starts at this week's Monday.

use chrono::{Datelike, Duration, Local, NaiveDate};

use nutrilog::config::Config;
use nutrilog::db::Database;
use nutrilog::nutrition::NutrientTotals;
use nutrilog::summary;
use nutrilog::tools::parse_date;

fn this_monday() -> NaiveDate {
    let today = Local::now().date_naive();
    today - Duration::days(today.weekday().num_days_from_monday() as i64)
}

fn print_row(label: &str, entries: Option<usize>, t: &NutrientTotals) {
    let entries = entries.map(|n| n.to_string()).unwrap_or_default();
    println!(
        "{:<12} {:>7} {:>9.1} {:>8.1} {:>8.1} {:>8.1} {:>7.1} {:>7.1} {:>6.2}",
        label, entries, t.calories, t.protein, t.carbs, t.fat, t.fiber, t.sugar, t.salt
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let start = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => this_monday(),
    };

    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = Database::open_migrated(&config.database_path)?;
    let stats = database.with_conn(|conn| summary::weekly_stats(conn, start, config.recipe_scaling))?;

    println!("Week {} to {}\n", stats.start, stats.end);
    println!(
        "{:<12} {:>7} {:>9} {:>8} {:>8} {:>8} {:>7} {:>7} {:>6}",
        "Date", "Entries", "kcal", "Protein", "Carbs", "Fat", "Fiber", "Sugar", "Salt"
    );
    for day in &stats.days {
        print_row(&day.date.to_string(), Some(day.entry_count), &day.total);
    }
    println!();
    print_row("Total", None, &stats.total);
    print_row("Daily avg", None, &stats.daily_average);
    println!("\n{} of {} days logged", stats.days_logged, stats.days.len());

    Ok(())
}
