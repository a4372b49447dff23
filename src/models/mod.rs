//! Data models
//!
//! Rust structs representing database entities.

pub mod diary_entry;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod shopping_item;

use std::collections::BTreeSet;

use rusqlite::Connection;
use tracing::warn;

use crate::db::{DbError, DbResult};
use crate::labels::Label;

pub use diary_entry::{DiaryEntry, DiaryEntryCreate, DiaryEntryUpdate, EntrySource, MealType};
pub use ingredient::{Ingredient, IngredientCreate, IngredientUpdate};
pub use recipe::{LabelSource, Recipe, RecipeCreate, RecipeUpdate};
pub use recipe_ingredient::{
    RecipeIngredient, RecipeIngredientCreate, RecipeIngredientDetail, RecipeIngredientUpdate,
};
pub use shopping_item::{ShoppingItem, ShoppingItemCreate};

pub(crate) fn validate_name(name: &str) -> DbResult<()> {
    if name.trim().is_empty() {
        return Err(DbError::validation("name must not be empty"));
    }
    Ok(())
}

/// Run a single-column label query keyed by one ID
///
/// Stored strings that are no longer labels are skipped.
pub(crate) fn query_labels(conn: &Connection, sql: &str, id: i64) -> DbResult<BTreeSet<Label>> {
    let mut stmt = conn.prepare(sql)?;
    let raw = stmt
        .query_map([id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut labels = BTreeSet::new();
    for value in raw {
        match Label::parse(&value) {
            Some(label) => {
                labels.insert(label);
            }
            None => warn!(id, label = %value, "ignoring unknown stored label"),
        }
    }
    Ok(labels)
}
