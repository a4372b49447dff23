//! Nutrilog Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::nutrition::RecipeScaling;

/// Diary logging instructions for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Nutrilog Diary Instructions

## Overview

1. **Ingredients** hold nutrient values per 100 g, per 100 ml, or per piece.
2. **Recipes** list ingredients with quantities and declare how many servings they make.
3. **Diary entries** record an ingredient (amount in its unit) or a recipe (amount in servings)
   against a date and a meal: breakfast, lunch, dinner or snack.

Nutrition is always computed from the current catalog, so correcting an ingredient
corrects every day it was eaten on.

## Choosing a unit kind

| Food | unit_kind | Amount when logging |
|------|-----------|---------------------|
| Solids, powders | `100g` | grams |
| Liquids | `100ml` | milliliters |
| Countables (eggs, slices, bars) | `piece` | number of pieces |

## Logging

- Search before adding: `search_ingredients` avoids duplicates.
- `log_entry` takes `date` as `YYYY-MM-DD`, a `meal_type`, exactly one of
  `ingredient_id` / `recipe_id`, and an `amount` greater than 0.
- `get_day` returns entries, per-meal totals and the day total.
- `weekly_stats` averages only over days that have entries.
- `wait_for_day_change` blocks until the day's nutrition changes (or times out),
  which keeps a running day view current without polling `get_day`.

## Labels

Ingredients carry food-group labels such as `MEAT`, `DAIRY`, `GRAINS`, `VEGETABLES`.
Recipes get automatic labels from their ingredients, including `VEGAN`, `VEGETARIAN`,
`GLUTEN_FREE` and `LACTOSE_FREE` when no ingredient contradicts them. Manual recipe
labels are kept, but a diet label is hidden when an ingredient contradicts it.
`KETO` and `PALEO` are never inferred.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub build_profile: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub recipe_scaling: RecipeScaling,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    recipe_scaling: RecipeScaling,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, recipe_scaling: RecipeScaling) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            recipe_scaling,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            build_profile: build_info.profile,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            recipe_scaling: self.recipe_scaling,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.db");
        std::fs::write(&path, b"sqlite").unwrap();

        let status = StatusTracker::new(path.clone(), RecipeScaling::ByUnitKind).get_status();
        assert_eq!(status.database_size_bytes, Some(6));
        assert_eq!(status.database_path, path.display().to_string());
        assert_eq!(status.recipe_scaling, RecipeScaling::ByUnitKind);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_missing_database_has_no_size() {
        let status = StatusTracker::new(PathBuf::from("/nonexistent/nutrilog.db"), RecipeScaling::default())
            .get_status();
        assert!(status.database_size_bytes.is_none());
    }
}
