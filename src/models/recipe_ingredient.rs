//! Recipe Ingredient model
//!
//! Links a catalog ingredient to a recipe with a quantity in the
//! ingredient's own unit. Every change refreshes the recipe's automatic
//! labels.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Ingredient, Recipe};
use crate::db::{DbError, DbResult};
use crate::nutrition::{scale_to_quantity, NutrientTotals, UnitKind};

/// A recipe ingredient linking an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe ingredient with ingredient details and its share of the recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit_kind: UnitKind,
    pub notes: Option<String>,
    pub nutrition: NutrientTotals,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: f64,
    pub notes: Option<String>,
}

/// Data for updating a recipe ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub quantity: Option<f64>,
    pub notes: Option<String>,
}

fn validate_quantity(quantity: f64) -> DbResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(DbError::validation(format!(
            "quantity must be greater than 0, got {}",
            quantity
        )));
    }
    Ok(())
}

impl RecipeIngredient {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            ingredient_id: row.get("ingredient_id")?,
            quantity: row.get("quantity")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add an ingredient to a recipe
    pub fn add(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        validate_quantity(data.quantity)?;
        Recipe::require(conn, data.recipe_id)?;
        Ingredient::require(conn, data.ingredient_id)?;

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = ?1 AND ingredient_id = ?2",
            params![data.recipe_id, data.ingredient_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(DbError::validation(format!(
                "ingredient {} is already part of recipe {}",
                data.ingredient_id, data.recipe_id
            )));
        }

        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.recipe_id, data.ingredient_id, data.quantity, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Recipe::refresh_automatic_labels(conn, data.recipe_id)?;
        info!(
            recipe_id = data.recipe_id,
            ingredient_id = data.ingredient_id,
            quantity = data.quantity,
            "added recipe ingredient"
        );

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("RecipeIngredient", id))
    }

    /// Get a recipe ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get ingredients with details for a recipe
    pub fn get_details_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<RecipeIngredientDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT i.*, ri.id AS line_id, ri.quantity AS line_quantity, ri.notes AS line_notes
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.id
            "#,
        )?;

        let details = stmt
            .query_map([recipe_id], |row| {
                let ingredient = Ingredient::from_row(row)?;
                let quantity: f64 = row.get("line_quantity")?;
                Ok(RecipeIngredientDetail {
                    id: row.get("line_id")?,
                    ingredient_id: ingredient.id,
                    nutrition: scale_to_quantity(&ingredient.profile, quantity),
                    ingredient_name: ingredient.name,
                    quantity,
                    unit_kind: ingredient.profile.unit,
                    notes: row.get("line_notes")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Update a recipe ingredient
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        if let Some(quantity) = data.quantity {
            validate_quantity(quantity)?;
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(qty) = data.quantity {
            updates.push(format!("quantity = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(qty));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipe_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        if let Some(recipe_id) = Self::get_recipe_id(conn, id)? {
            Recipe::refresh_automatic_labels(conn, recipe_id)?;
        }

        Self::get_by_id(conn, id)
    }

    /// Remove an ingredient from its recipe
    pub fn remove(conn: &Connection, id: i64) -> DbResult<bool> {
        let Some(recipe_id) = Self::get_recipe_id(conn, id)? else {
            return Ok(false);
        };

        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Recipe::refresh_automatic_labels(conn, recipe_id)?;
        info!(recipe_id, recipe_ingredient_id = id, "removed recipe ingredient");
        Ok(rows > 0)
    }

    /// Get the recipe_id for a recipe ingredient
    pub fn get_recipe_id(conn: &Connection, id: i64) -> DbResult<Option<i64>> {
        let result: Result<i64, _> = conn.query_row(
            "SELECT recipe_id FROM recipe_ingredients WHERE id = ?1",
            [id],
            |row| row.get(0),
        );
        match result {
            Ok(recipe_id) => Ok(Some(recipe_id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::labels::Label;
    use crate::models::{ingredient, recipe};

    #[test]
    fn test_add_update_remove() {
        let conn = test_connection();
        let milk = Ingredient::create(
            &conn,
            &ingredient::sample("Milk", UnitKind::Volume100ml, 64.0, &[Label::Dairy]),
        )
        .unwrap();
        let r = Recipe::create(&conn, &recipe::sample("Latte", 1)).unwrap();

        let line = RecipeIngredient::add(
            &conn,
            &RecipeIngredientCreate { recipe_id: r.id, ingredient_id: milk.id, quantity: 250.0, notes: None },
        )
        .unwrap();
        assert!(Recipe::automatic_labels(&conn, r.id).unwrap().contains(&Label::Vegetarian));

        let details = RecipeIngredient::get_details_for_recipe(&conn, r.id).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].ingredient_name, "Milk");
        assert_eq!(details[0].unit_kind, UnitKind::Volume100ml);
        assert!((details[0].nutrition.calories - 160.0).abs() < 1e-9);

        let updated = RecipeIngredient::update(
            &conn,
            line.id,
            &RecipeIngredientUpdate { quantity: Some(100.0), notes: None },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.quantity, 100.0);

        assert!(RecipeIngredient::remove(&conn, line.id).unwrap());
        assert!(!RecipeIngredient::remove(&conn, line.id).unwrap());
        assert!(Recipe::automatic_labels(&conn, r.id).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_quantity_and_duplicates() {
        let conn = test_connection();
        let oats = Ingredient::create(&conn, &ingredient::sample("Oats", UnitKind::Mass100g, 389.0, &[])).unwrap();
        let r = Recipe::create(&conn, &recipe::sample("Porridge", 1)).unwrap();

        let zero = RecipeIngredientCreate { recipe_id: r.id, ingredient_id: oats.id, quantity: 0.0, notes: None };
        assert!(matches!(RecipeIngredient::add(&conn, &zero), Err(DbError::Validation(_))));

        let ok = RecipeIngredientCreate { quantity: 50.0, ..zero };
        RecipeIngredient::add(&conn, &ok).unwrap();
        assert!(matches!(RecipeIngredient::add(&conn, &ok), Err(DbError::Validation(_))));

        let missing = RecipeIngredientCreate { ingredient_id: 999, ..ok };
        assert!(matches!(RecipeIngredient::add(&conn, &missing), Err(DbError::NotFound { .. })));
    }
}
