//! Shopping list model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{validate_name, Recipe, RecipeIngredient};
use crate::db::{DbError, DbResult};

/// An item on the shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub ingredient_id: Option<i64>,
    pub is_checked: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding a shopping item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItemCreate {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub ingredient_id: Option<i64>,
}

impl ShoppingItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            ingredient_id: row.get("ingredient_id")?,
            is_checked: row.get::<_, i32>("is_checked")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add an item to the list
    pub fn create(conn: &Connection, data: &ShoppingItemCreate) -> DbResult<Self> {
        validate_name(&data.name)?;
        if let Some(quantity) = data.quantity {
            if !quantity.is_finite() || quantity <= 0.0 {
                return Err(DbError::validation(format!(
                    "quantity must be greater than 0, got {}",
                    quantity
                )));
            }
        }

        conn.execute(
            "INSERT INTO shopping_items (name, quantity, unit, ingredient_id) VALUES (?1, ?2, ?3, ?4)",
            params![data.name.trim(), data.quantity, data.unit, data.ingredient_id],
        )?;

        let id = conn.last_insert_rowid();
        info!(item_id = id, name = %data.name, "added shopping item");
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("ShoppingItem", id))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shopping_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List items, unchecked first
    pub fn list(conn: &Connection, include_checked: bool) -> DbResult<Vec<Self>> {
        let sql = if include_checked {
            "SELECT * FROM shopping_items ORDER BY is_checked, name, id"
        } else {
            "SELECT * FROM shopping_items WHERE is_checked = 0 ORDER BY name, id"
        };
        let mut stmt = conn.prepare(sql)?;
        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Check or uncheck an item
    pub fn set_checked(conn: &Connection, id: i64, checked: bool) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE shopping_items SET is_checked = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![checked as i32, id],
        )?;
        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM shopping_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Remove every checked item; returns how many were removed
    pub fn clear_checked(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM shopping_items WHERE is_checked = 1", [])?;
        info!(removed = rows, "cleared checked shopping items");
        Ok(rows)
    }

    /// Put a recipe's ingredients on the list, scaled to `servings`
    ///
    /// Quantities for an ingredient already on the list (unchecked, same unit)
    /// are added to the existing item instead of creating a duplicate.
    pub fn add_from_recipe(conn: &Connection, recipe_id: i64, servings: f64) -> DbResult<Vec<Self>> {
        if !servings.is_finite() || servings <= 0.0 {
            return Err(DbError::validation(format!(
                "servings must be greater than 0, got {}",
                servings
            )));
        }

        let recipe = Recipe::require(conn, recipe_id)?;
        let factor = servings / f64::from(recipe.servings);

        let mut touched = Vec::new();
        for detail in RecipeIngredient::get_details_for_recipe(conn, recipe_id)? {
            let quantity = detail.quantity * factor;
            let unit = detail.unit_kind.quantity_unit();

            let existing: Option<i64> = match conn.query_row(
                "SELECT id FROM shopping_items WHERE ingredient_id = ?1 AND unit = ?2 AND is_checked = 0 ORDER BY id LIMIT 1",
                params![detail.ingredient_id, unit],
                |row| row.get(0),
            ) {
                Ok(id) => Some(id),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };

            let item = match existing {
                Some(id) => {
                    conn.execute(
                        "UPDATE shopping_items SET quantity = COALESCE(quantity, 0) + ?1, updated_at = datetime('now') WHERE id = ?2",
                        params![quantity, id],
                    )?;
                    Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("ShoppingItem", id))?
                }
                None => Self::create(
                    conn,
                    &ShoppingItemCreate {
                        name: detail.ingredient_name.clone(),
                        quantity: Some(quantity),
                        unit: Some(unit.to_string()),
                        ingredient_id: Some(detail.ingredient_id),
                    },
                )?,
            };
            touched.push(item);
        }

        info!(recipe_id, servings, items = touched.len(), "added recipe to shopping list");
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::recipe_ingredient::RecipeIngredientCreate;
    use crate::models::{ingredient, recipe, Ingredient};
    use crate::nutrition::UnitKind;

    #[test]
    fn test_manual_items_and_checking() {
        let conn = test_connection();
        let bread = ShoppingItem::create(
            &conn,
            &ShoppingItemCreate { name: "Bread".into(), quantity: None, unit: None, ingredient_id: None },
        )
        .unwrap();
        ShoppingItem::create(
            &conn,
            &ShoppingItemCreate { name: "Apples".into(), quantity: Some(6.0), unit: Some("piece".into()), ingredient_id: None },
        )
        .unwrap();

        ShoppingItem::set_checked(&conn, bread.id, true).unwrap();
        assert_eq!(ShoppingItem::list(&conn, false).unwrap().len(), 1);
        assert_eq!(ShoppingItem::list(&conn, true).unwrap().len(), 2);

        assert_eq!(ShoppingItem::clear_checked(&conn).unwrap(), 1);
        assert_eq!(ShoppingItem::list(&conn, true).unwrap().len(), 1);
    }

    #[test]
    fn test_add_from_recipe_scales_and_merges() {
        let conn = test_connection();
        let flour = Ingredient::create(&conn, &ingredient::sample("Flour", UnitKind::Mass100g, 364.0, &[])).unwrap();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        let pancakes = Recipe::create(&conn, &recipe::sample("Pancakes", 2)).unwrap();
        for (ingredient_id, quantity) in [(flour.id, 200.0), (egg.id, 2.0)] {
            RecipeIngredient::add(
                &conn,
                &RecipeIngredientCreate { recipe_id: pancakes.id, ingredient_id, quantity, notes: None },
            )
            .unwrap();
        }

        let items = ShoppingItem::add_from_recipe(&conn, pancakes.id, 4.0).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, Some(400.0));
        assert_eq!(items[0].unit.as_deref(), Some("g"));
        assert_eq!(items[1].quantity, Some(4.0));

        let again = ShoppingItem::add_from_recipe(&conn, pancakes.id, 1.0).unwrap();
        assert_eq!(again[0].id, items[0].id);
        assert_eq!(again[0].quantity, Some(500.0));
        assert_eq!(ShoppingItem::list(&conn, true).unwrap().len(), 2);

        assert!(ShoppingItem::add_from_recipe(&conn, pancakes.id, 0.0).is_err());
    }
}
