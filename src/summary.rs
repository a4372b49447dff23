//! Daily and weekly nutrition rollups
//!
//! Reads diary entries, turns each into totals through the aggregator and
//! groups them by meal and by day.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{DbError, DbResult};
use crate::models::{DiaryEntry, EntrySource, MealType};
use crate::nutrition::{self, NutrientTotals, RecipeScaling};

/// One diary entry with its resolved name and nutrition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: i64,
    pub meal_type: MealType,
    pub source: EntrySource,
    pub source_name: String,
    pub amount: f64,
    pub notes: Option<String>,
    pub nutrition: NutrientTotals,
}

/// Everything eaten on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub entries: Vec<EntrySummary>,
    pub by_meal: BTreeMap<MealType, NutrientTotals>,
    pub total: NutrientTotals,
    pub entry_count: usize,
}

/// Totals for one day of a range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub total: NutrientTotals,
}

/// Seven consecutive days from `start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayTotals>,
    pub total: NutrientTotals,
    /// Mean over days with at least one entry
    pub daily_average: NutrientTotals,
    pub days_logged: usize,
}

fn summarize_entry(conn: &Connection, entry: DiaryEntry, scaling: RecipeScaling) -> DbResult<EntrySummary> {
    let nutrition = entry.nutrition(conn, scaling)?;
    let source_name = entry.source_name(conn)?;
    Ok(EntrySummary {
        id: entry.id,
        meal_type: entry.meal_type,
        source: entry.source,
        source_name,
        amount: entry.amount,
        notes: entry.notes,
        nutrition,
    })
}

/// Summary of a single date
pub fn daily_summary(conn: &Connection, date: NaiveDate, scaling: RecipeScaling) -> DbResult<DailySummary> {
    let entries = DiaryEntry::list_for_date(conn, date)?
        .into_iter()
        .map(|entry| summarize_entry(conn, entry, scaling))
        .collect::<DbResult<Vec<_>>>()?;

    let mut by_meal: BTreeMap<MealType, NutrientTotals> = BTreeMap::new();
    for entry in &entries {
        *by_meal.entry(entry.meal_type).or_default() += entry.nutrition;
    }

    let per_entry: Vec<NutrientTotals> = entries.iter().map(|e| e.nutrition).collect();
    let total = nutrition::sum(&per_entry);

    debug!(%date, entries = entries.len(), calories = total.calories, "computed daily summary");
    Ok(DailySummary {
        date,
        entry_count: entries.len(),
        entries,
        by_meal,
        total,
    })
}

/// Per-day totals for an inclusive date range
pub fn range_totals(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
    scaling: RecipeScaling,
) -> DbResult<Vec<DayTotals>> {
    if end < start {
        return Err(DbError::validation(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }

    let mut grouped: BTreeMap<NaiveDate, Vec<NutrientTotals>> = BTreeMap::new();
    for entry in DiaryEntry::list_for_range(conn, start, end)? {
        let totals = entry.nutrition(conn, scaling)?;
        grouped.entry(entry.date).or_default().push(totals);
    }

    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let totals = grouped.remove(&date).unwrap_or_default();
        days.push(DayTotals {
            date,
            entry_count: totals.len(),
            total: nutrition::sum(&totals),
        });
        date += Duration::days(1);
    }

    Ok(days)
}

/// Stats for the seven days starting at `start`
pub fn weekly_stats(conn: &Connection, start: NaiveDate, scaling: RecipeScaling) -> DbResult<WeeklyStats> {
    let end = start + Duration::days(6);
    let days = range_totals(conn, start, end, scaling)?;

    let all: Vec<NutrientTotals> = days.iter().map(|d| d.total).collect();
    let logged: Vec<NutrientTotals> = days
        .iter()
        .filter(|d| d.entry_count > 0)
        .map(|d| d.total)
        .collect();

    Ok(WeeklyStats {
        start,
        end,
        total: nutrition::sum(&all),
        daily_average: nutrition::average(&logged),
        days_logged: logged.len(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::{ingredient, DiaryEntryCreate, Ingredient};
    use crate::nutrition::UnitKind;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log(conn: &Connection, d: &str, meal: MealType, ingredient_id: i64, amount: f64) {
        DiaryEntry::create(
            conn,
            &DiaryEntryCreate {
                date: date(d),
                meal_type: meal,
                source: EntrySource::Ingredient(ingredient_id),
                amount,
                notes: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_daily_summary_groups_by_meal() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        let apple = Ingredient::create(&conn, &ingredient::sample("Apple", UnitKind::Mass100g, 52.0, &[])).unwrap();

        log(&conn, "2025-01-09", MealType::Breakfast, egg.id, 2.0);
        log(&conn, "2025-01-09", MealType::Snack, apple.id, 150.0);
        log(&conn, "2025-01-09", MealType::Snack, apple.id, 100.0);
        log(&conn, "2025-01-10", MealType::Breakfast, egg.id, 1.0);

        let summary = daily_summary(&conn, date("2025-01-09"), RecipeScaling::Uniform100).unwrap();
        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.entries[0].source_name, "Egg");
        assert_eq!(summary.by_meal[&MealType::Breakfast].calories, 140.0);
        assert!((summary.by_meal[&MealType::Snack].calories - 130.0).abs() < 1e-9);
        assert!(!summary.by_meal.contains_key(&MealType::Lunch));
        assert!((summary.total.calories - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_day_is_zero() {
        let conn = test_connection();
        let summary = daily_summary(&conn, date("2025-01-09"), RecipeScaling::Uniform100).unwrap();
        assert_eq!(summary.entry_count, 0);
        assert!(summary.total.is_zero());
        assert!(summary.by_meal.is_empty());
    }

    #[test]
    fn test_weekly_average_counts_logged_days_only() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        log(&conn, "2025-01-06", MealType::Breakfast, egg.id, 2.0);
        log(&conn, "2025-01-08", MealType::Breakfast, egg.id, 4.0);
        log(&conn, "2025-01-13", MealType::Breakfast, egg.id, 10.0);

        let stats = weekly_stats(&conn, date("2025-01-06"), RecipeScaling::Uniform100).unwrap();
        assert_eq!(stats.end, date("2025-01-12"));
        assert_eq!(stats.days.len(), 7);
        assert_eq!(stats.days_logged, 2);
        assert_eq!(stats.total.calories, 420.0);
        assert_eq!(stats.daily_average.calories, 210.0);
    }

    #[test]
    fn test_range_rejects_reversed_dates() {
        let conn = test_connection();
        let result = range_totals(&conn, date("2025-01-10"), date("2025-01-09"), RecipeScaling::Uniform100);
        assert!(matches!(result, Err(DbError::Validation(_))));

        let single = range_totals(&conn, date("2025-01-10"), date("2025-01-10"), RecipeScaling::Uniform100).unwrap();
        assert_eq!(single.len(), 1);
    }
}
