//! Ingredient model
//!
//! The ingredient catalog: nutrient profiles plus descriptive labels.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::recipe::Recipe;
use super::{query_labels, validate_name};
use crate::db::{DbError, DbResult};
use crate::labels::Label;
use crate::nutrition::{NutrientProfile, UnitKind};

/// An ingredient with its nutrient profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub profile: NutrientProfile,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub brand: Option<String>,
    #[serde(default)]
    pub unit_kind: UnitKind,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub salt: f64,
    pub notes: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<Label>,
}

/// Data for updating an ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub unit_kind: Option<UnitKind>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub salt: Option<f64>,
    pub notes: Option<String>,
}

fn validate_nutrient(field: &str, value: f64) -> DbResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DbError::validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

impl IngredientCreate {
    fn validate(&self) -> DbResult<()> {
        validate_name(&self.name)?;
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
            ("salt", self.salt),
        ] {
            validate_nutrient(field, value)?;
        }
        Ok(())
    }
}

impl IngredientUpdate {
    fn validate(&self) -> DbResult<()> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
            ("salt", self.salt),
        ] {
            if let Some(v) = value {
                validate_nutrient(field, v)?;
            }
        }
        Ok(())
    }
}

impl Ingredient {
    /// Create an Ingredient from a database row
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit_str: String = row.get("unit_kind")?;
        let unit = UnitKind::parse(&unit_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(
                0,
                format!("unit_kind '{}'", unit_str),
                rusqlite::types::Type::Text,
            )
        })?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            brand: row.get("brand")?,
            profile: NutrientProfile {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
                fiber: row.get("fiber")?,
                sugar: row.get("sugar")?,
                salt: row.get("salt")?,
                unit,
            },
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new ingredient into the database
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        data.validate()?;

        conn.execute(
            r#"
            INSERT INTO ingredients (
                name, brand, unit_kind,
                calories, protein, carbs, fat, fiber, sugar, salt,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                data.name.trim(),
                data.brand,
                data.unit_kind.to_db_str(),
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.fiber,
                data.sugar,
                data.salt,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        write_labels(conn, id, &data.labels)?;
        info!(ingredient_id = id, name = %data.name, "created ingredient");

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get an ingredient by ID, treating absence as an error
    pub fn require(conn: &Connection, id: i64) -> DbResult<Self> {
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Search ingredients by name or brand
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query.trim());
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM ingredients
            WHERE name LIKE ?1 OR brand LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(query, found = items.len(), "ingredient search");
        Ok(items)
    }

    /// List ingredients with optional label filter and sorting
    pub fn list(
        conn: &Connection,
        label: Option<Label>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.eq_ignore_ascii_case("desc") { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "calories" => "calories",
            "protein" => "protein",
            _ => "name",
        };

        let mut stmt;
        let items = if let Some(label) = label {
            stmt = conn.prepare(&format!(
                "SELECT i.* FROM ingredients i
                 INNER JOIN ingredient_labels l ON l.ingredient_id = i.id
                 WHERE l.label = ?1
                 ORDER BY i.{} {} LIMIT ?2 OFFSET ?3",
                sort_col, order
            ))?;
            stmt.query_map(params![label.as_str(), limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        } else {
            stmt = conn.prepare(&format!(
                "SELECT * FROM ingredients ORDER BY {} {} LIMIT ?1 OFFSET ?2",
                sort_col, order
            ))?;
            stmt.query_map(params![limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(items)
    }

    /// Count ingredients, optionally only those carrying a label
    pub fn count(conn: &Connection, label: Option<Label>) -> DbResult<i64> {
        let count: i64 = match label {
            Some(label) => conn.query_row(
                "SELECT COUNT(*) FROM ingredient_labels WHERE label = ?1",
                [label.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &IngredientUpdate) -> DbResult<Option<Self>> {
        data.validate()?;

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        add_update!(brand, "brand");
        add_update!(calories, "calories");
        add_update!(protein, "protein");
        add_update!(carbs, "carbs");
        add_update!(fat, "fat");
        add_update!(fiber, "fiber");
        add_update!(sugar, "sugar");
        add_update!(salt, "salt");
        add_update!(notes, "notes");

        if let Some(unit) = data.unit_kind {
            updates.push(format!("unit_kind = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.to_db_str()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows > 0 {
            info!(ingredient_id = id, "updated ingredient");
        }

        Self::get_by_id(conn, id)
    }

    /// Labels attached to an ingredient
    pub fn labels(conn: &Connection, id: i64) -> DbResult<BTreeSet<Label>> {
        query_labels(
            conn,
            "SELECT label FROM ingredient_labels WHERE ingredient_id = ?1",
            id,
        )
    }

    /// Replace an ingredient's labels and refresh every recipe using it
    ///
    /// Returns the IDs of recipes whose automatic labels were recomputed.
    pub fn set_labels(conn: &Connection, id: i64, labels: &BTreeSet<Label>) -> DbResult<Vec<i64>> {
        Self::require(conn, id)?;

        conn.execute("DELETE FROM ingredient_labels WHERE ingredient_id = ?1", [id])?;
        write_labels(conn, id, labels)?;

        let recipe_ids = Self::recipe_ids_using(conn, id)?;
        for recipe_id in &recipe_ids {
            Recipe::refresh_automatic_labels(conn, *recipe_id)?;
        }

        info!(
            ingredient_id = id,
            labels = labels.len(),
            recipes_refreshed = recipe_ids.len(),
            "set ingredient labels"
        );
        Ok(recipe_ids)
    }

    /// Get the count of recipes using this ingredient
    pub fn get_recipe_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get the count of diary entries directly using this ingredient
    pub fn get_diary_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM diary_entries WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get total usage count (recipes + direct diary entries)
    pub fn get_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        Ok(Self::get_recipe_usage_count(conn, id)? + Self::get_diary_usage_count(conn, id)?)
    }

    /// Get recipe names that use this ingredient
    pub fn get_used_in_recipes(conn: &Connection, id: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT r.name FROM recipes r
            INNER JOIN recipe_ingredients ri ON r.id = ri.recipe_id
            WHERE ri.ingredient_id = ?1
            ORDER BY r.name
            "#,
        )?;

        let names = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Recipe IDs that use this ingredient
    pub fn recipe_ids_using(conn: &Connection, id: i64) -> DbResult<Vec<i64>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT recipe_id FROM recipe_ingredients WHERE ingredient_id = ?1 ORDER BY recipe_id",
        )?;

        let ids = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Delete an ingredient that no recipe or diary entry references
    ///
    /// Returns Ok(false) if not found and `InUse` if still referenced.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        if Self::get_usage_count(conn, id)? > 0 {
            return Err(DbError::InUse { entity: "Ingredient", id });
        }

        let rows = conn.execute("DELETE FROM ingredients WHERE id = ?1", [id])?;
        if rows > 0 {
            info!(ingredient_id = id, "deleted ingredient");
        }
        Ok(rows > 0)
    }
}

fn write_labels(conn: &Connection, id: i64, labels: &BTreeSet<Label>) -> DbResult<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO ingredient_labels (ingredient_id, label) VALUES (?1, ?2)")?;
    for label in labels {
        stmt.execute(params![id, label.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample(name: &str, unit_kind: UnitKind, calories: f64, labels: &[Label]) -> IngredientCreate {
    IngredientCreate {
        name: name.to_string(),
        brand: None,
        unit_kind,
        calories,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        fiber: 0.0,
        sugar: 0.0,
        salt: 0.0,
        notes: None,
        labels: labels.iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_create_and_get() {
        let conn = test_connection();
        let mut data = sample("Apple", UnitKind::Mass100g, 52.0, &[Label::Fruits]);
        data.protein = 0.3;
        let created = Ingredient::create(&conn, &data).unwrap();

        let loaded = Ingredient::require(&conn, created.id).unwrap();
        assert_eq!(loaded.name, "Apple");
        assert_eq!(loaded.profile.unit, UnitKind::Mass100g);
        assert_eq!(loaded.profile.calories, 52.0);
        assert_eq!(loaded.profile.protein, 0.3);
        assert_eq!(
            Ingredient::labels(&conn, created.id).unwrap().into_iter().collect::<Vec<_>>(),
            vec![Label::Fruits]
        );
    }

    #[test]
    fn test_create_rejects_blank_name_and_negative_values() {
        let conn = test_connection();
        let blank = sample("   ", UnitKind::Piece, 70.0, &[]);
        assert!(matches!(Ingredient::create(&conn, &blank), Err(DbError::Validation(_))));

        let mut negative = sample("Egg", UnitKind::Piece, 70.0, &[]);
        negative.fat = -1.0;
        assert!(matches!(Ingredient::create(&conn, &negative), Err(DbError::Validation(_))));

        assert_eq!(Ingredient::count(&conn, None).unwrap(), 0);
    }

    #[test]
    fn test_search_and_list() {
        let conn = test_connection();
        Ingredient::create(&conn, &sample("Chicken breast", UnitKind::Mass100g, 165.0, &[Label::Meat])).unwrap();
        Ingredient::create(&conn, &sample("Chickpeas", UnitKind::Mass100g, 364.0, &[Label::Legumes])).unwrap();
        Ingredient::create(&conn, &sample("Oat milk", UnitKind::Volume100ml, 46.0, &[])).unwrap();

        let found = Ingredient::search(&conn, "chick", 10).unwrap();
        assert_eq!(found.len(), 2);

        let meats = Ingredient::list(&conn, Some(Label::Meat), "name", "asc", 10, 0).unwrap();
        assert_eq!(meats.len(), 1);
        assert_eq!(meats[0].name, "Chicken breast");
        assert_eq!(Ingredient::count(&conn, Some(Label::Meat)).unwrap(), 1);

        let by_calories = Ingredient::list(&conn, None, "calories", "desc", 10, 0).unwrap();
        assert_eq!(by_calories[0].name, "Chickpeas");
        assert_eq!(by_calories[2].name, "Oat milk");
    }

    #[test]
    fn test_partial_update() {
        let conn = test_connection();
        let created = Ingredient::create(&conn, &sample("Egg", UnitKind::Mass100g, 143.0, &[])).unwrap();

        let update = IngredientUpdate {
            unit_kind: Some(UnitKind::Piece),
            calories: Some(70.0),
            ..Default::default()
        };
        let updated = Ingredient::update(&conn, created.id, &update).unwrap().unwrap();
        assert_eq!(updated.profile.unit, UnitKind::Piece);
        assert_eq!(updated.profile.calories, 70.0);
        assert_eq!(updated.name, "Egg");

        let bad = IngredientUpdate { salt: Some(f64::NAN), ..Default::default() };
        assert!(Ingredient::update(&conn, created.id, &bad).is_err());
    }

    #[test]
    fn test_delete_refuses_when_used() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &sample("Egg", UnitKind::Piece, 70.0, &[Label::Eggs])).unwrap();
        conn.execute(
            "INSERT INTO diary_entries (date, meal_type, ingredient_id, amount) VALUES ('2025-01-09', 'breakfast', ?1, 2)",
            [egg.id],
        )
        .unwrap();

        assert!(matches!(
            Ingredient::delete(&conn, egg.id),
            Err(DbError::InUse { entity: "Ingredient", .. })
        ));

        let unused = Ingredient::create(&conn, &sample("Salt", UnitKind::Mass100g, 0.0, &[])).unwrap();
        assert!(Ingredient::delete(&conn, unused.id).unwrap());
        assert!(!Ingredient::delete(&conn, unused.id).unwrap());
    }
}
