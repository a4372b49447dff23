//! Diary MCP Tools
//!
//! Tools for logging what was eaten and reading day and week summaries.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::{parse_date, ToolError};
use crate::context::AppContext;
use crate::feed::Change;
use crate::models::{DiaryEntry, DiaryEntryCreate, DiaryEntryUpdate, EntrySource, MealType};
use crate::nutrition::NutrientTotals;
use crate::summary::{self, DailySummary, WeeklyStats};

/// A diary entry with its source name and nutrition
#[derive(Debug, Serialize)]
pub struct EntryDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub source: EntrySource,
    pub source_name: String,
    pub amount: f64,
    pub nutrition: NutrientTotals,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for wait_for_day_change
#[derive(Debug, Serialize)]
pub struct DayChangeResponse {
    /// False when the wait timed out with nothing new
    pub changed: bool,
    pub summary: DailySummary,
}

fn entry_detail(ctx: &AppContext, entry: DiaryEntry) -> Result<EntryDetail, ToolError> {
    let scaling = ctx.scaling();
    let (source_name, nutrition) = ctx
        .database
        .with_conn(|conn| Ok((entry.source_name(conn)?, entry.nutrition(conn, scaling)?)))
        .map_err(ToolError::db("Failed to compute nutrition"))?;

    Ok(EntryDetail {
        id: entry.id,
        date: entry.date,
        meal_type: entry.meal_type,
        source: entry.source,
        source_name,
        amount: entry.amount,
        nutrition,
        notes: entry.notes,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    })
}

fn parse_meal_type(raw: &str) -> Result<MealType, ToolError> {
    MealType::parse(raw)
        .ok_or_else(|| ToolError::Invalid(format!("Invalid meal_type '{}': use breakfast, lunch, dinner or snack", raw)))
}

/// Log an ingredient or a recipe against a date and meal
pub fn log_entry(
    ctx: &AppContext,
    date: &str,
    meal_type: &str,
    ingredient_id: Option<i64>,
    recipe_id: Option<i64>,
    amount: f64,
    notes: Option<String>,
) -> Result<EntryDetail, ToolError> {
    let date = parse_date(date)?;
    let meal_type = parse_meal_type(meal_type)?;
    let source = match (ingredient_id, recipe_id) {
        (Some(id), None) => EntrySource::Ingredient(id),
        (None, Some(id)) => EntrySource::Recipe(id),
        (None, None) => return Err(ToolError::Invalid("Either ingredient_id or recipe_id must be provided".to_string())),
        (Some(_), Some(_)) => {
            return Err(ToolError::Invalid("Only one of ingredient_id or recipe_id can be provided".to_string()))
        }
    };

    let entry = ctx
        .database
        .with_conn(|conn| {
            DiaryEntry::create(
                conn,
                &DiaryEntryCreate {
                    date,
                    meal_type,
                    source,
                    amount,
                    notes,
                },
            )
        })
        .map_err(ToolError::db("Failed to log entry"))?;

    ctx.publish(Change::Diary(date));
    entry_detail(ctx, entry)
}

/// Get a diary entry with nutrition
pub fn get_entry(ctx: &AppContext, id: i64) -> Result<Option<EntryDetail>, ToolError> {
    let entry = ctx
        .database
        .with_conn(|conn| DiaryEntry::get_by_id(conn, id))
        .map_err(ToolError::db("Failed to get entry"))?;

    entry.map(|entry| entry_detail(ctx, entry)).transpose()
}

/// Update a diary entry's date, meal, amount or notes
pub fn update_entry(
    ctx: &AppContext,
    id: i64,
    date: Option<&str>,
    meal_type: Option<&str>,
    amount: Option<f64>,
    notes: Option<String>,
) -> Result<Option<EntryDetail>, ToolError> {
    let data = DiaryEntryUpdate {
        date: date.map(parse_date).transpose()?,
        meal_type: meal_type.map(parse_meal_type).transpose()?,
        amount,
        notes,
    };

    let (previous, updated) = ctx
        .database
        .with_conn(|conn| {
            let previous = DiaryEntry::get_by_id(conn, id)?;
            if previous.is_none() {
                return Ok((None, None));
            }
            Ok((previous, DiaryEntry::update(conn, id, &data)?))
        })
        .map_err(ToolError::db("Failed to update entry"))?;

    match (previous, updated) {
        (Some(previous), Some(entry)) => {
            ctx.publish(Change::Diary(previous.date));
            if entry.date != previous.date {
                ctx.publish(Change::Diary(entry.date));
            }
            entry_detail(ctx, entry).map(Some)
        }
        _ => Ok(None),
    }
}

/// Delete a diary entry
pub fn delete_entry(ctx: &AppContext, id: i64) -> Result<bool, ToolError> {
    let deleted_date = ctx
        .database
        .with_conn(|conn| {
            let Some(entry) = DiaryEntry::get_by_id(conn, id)? else {
                return Ok(None);
            };
            Ok(DiaryEntry::delete(conn, id)?.then_some(entry.date))
        })
        .map_err(ToolError::db("Failed to delete entry"))?;

    match deleted_date {
        Some(date) => {
            ctx.publish(Change::Diary(date));
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Everything logged on a date, grouped by meal, with totals
pub fn get_day(ctx: &AppContext, date: &str) -> Result<DailySummary, ToolError> {
    let date = parse_date(date)?;
    let scaling = ctx.scaling();
    ctx.database
        .with_conn(|conn| summary::daily_summary(conn, date, scaling))
        .map_err(ToolError::db("Failed to summarize day"))
}

/// Totals for the seven days starting at `start_date`
pub fn weekly_stats(ctx: &AppContext, start_date: &str) -> Result<WeeklyStats, ToolError> {
    let start = parse_date(start_date)?;
    let scaling = ctx.scaling();
    ctx.database
        .with_conn(|conn| summary::weekly_stats(conn, start, scaling))
        .map_err(ToolError::db("Failed to compute weekly stats"))
}

/// Wait until something affecting `date` changes, up to `timeout`
///
/// Returns the fresh summary, or the unchanged one when the wait times out.
pub async fn wait_for_day_change(
    ctx: &AppContext,
    date: &str,
    timeout: Duration,
) -> Result<DayChangeResponse, ToolError> {
    let date = parse_date(date)?;
    let mut watch = ctx.feed.watch_day(ctx.database.clone(), date, ctx.scaling());

    let outcome = tokio::time::timeout(timeout, watch.changed()).await;
    match outcome {
        Ok(Some(summary)) => Ok(DayChangeResponse {
            changed: true,
            summary: summary.map_err(ToolError::db("Failed to summarize day"))?,
        }),
        Ok(None) | Err(_) => {
            debug!(%date, ?timeout, "no change while waiting on day");
            Ok(DayChangeResponse {
                changed: false,
                summary: watch.snapshot().await.map_err(ToolError::db("Failed to summarize day"))?,
            })
        }
    }
}
