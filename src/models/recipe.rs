//! Recipe model
//!
//! Recipes are built from catalog ingredients. Nutrition is derived on read
//! from the current ingredient profiles; only labels are stored, split into
//! manual (user chosen) and automatic (inferred from the ingredients).

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{query_labels, validate_name};
use crate::db::{DbError, DbResult};
use crate::labels::{infer_automatic_labels, merge_labels, Label};
use crate::nutrition::{NutrientProfile, RecipeComposition, UnitKind};

/// A recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub is_favorite: bool,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub is_favorite: bool,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<Label>,
}

fn default_servings() -> u32 {
    1
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub servings: Option<u32>,
    pub is_favorite: Option<bool>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
}

/// Where a stored recipe label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    Manual,
    Automatic,
}

impl LabelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::Manual => "manual",
            LabelSource::Automatic => "automatic",
        }
    }
}

fn validate_servings(servings: u32) -> DbResult<()> {
    if servings < 1 {
        return Err(DbError::validation("servings must be at least 1"));
    }
    Ok(())
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            servings: row.get("servings")?,
            is_favorite: row.get::<_, i32>("is_favorite")? != 0,
            instructions: row.get("instructions")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        validate_name(&data.name)?;
        validate_servings(data.servings)?;

        conn.execute(
            r#"
            INSERT INTO recipes (name, servings, is_favorite, instructions, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name.trim(),
                data.servings,
                data.is_favorite as i32,
                data.instructions,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        write_labels(conn, id, LabelSource::Manual, &data.labels)?;
        info!(recipe_id = id, name = %data.name, servings = data.servings, "created recipe");

        Self::require(conn, id)
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a recipe by ID, treating absence as an error
    pub fn require(conn: &Connection, id: i64) -> DbResult<Self> {
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("Recipe", id))
    }

    /// List recipes with optional name filter
    pub fn list(
        conn: &Connection,
        query: Option<&str>,
        favorites_only: bool,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.eq_ignore_ascii_case("desc") { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "servings" => "servings",
            _ => "name",
        };

        let (where_clause, mut params_vec) = Self::filter_clause(query, favorites_only);

        let sql = format!(
            "SELECT * FROM recipes {} ORDER BY {} {} LIMIT ?{} OFFSET ?{}",
            where_clause,
            sort_col,
            order,
            params_vec.len() + 1,
            params_vec.len() + 2
        );
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Count recipes matching the same filters as `list`
    pub fn count(conn: &Connection, query: Option<&str>, favorites_only: bool) -> DbResult<i64> {
        let (where_clause, params_vec) = Self::filter_clause(query, favorites_only);
        let sql = format!("SELECT COUNT(*) FROM recipes {}", where_clause);
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    fn filter_clause(query: Option<&str>, favorites_only: bool) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(q) = query {
            params_vec.push(Box::new(format!("%{}%", q.trim())));
            conditions.push(format!("name LIKE ?{}", params_vec.len()));
        }
        if favorites_only {
            conditions.push("is_favorite = 1".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, params_vec)
    }

    /// Update a recipe
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        if let Some(ref name) = data.name {
            validate_name(name)?;
        }
        if let Some(servings) = data.servings {
            validate_servings(servings)?;
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        if let Some(servings) = data.servings {
            updates.push(format!("servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
        }
        if let Some(is_fav) = data.is_favorite {
            updates.push(format!("is_favorite = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(is_fav as i32));
        }
        if let Some(ref instructions) = data.instructions {
            updates.push(format!("instructions = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(instructions.clone()));
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
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows > 0 {
            info!(recipe_id = id, "updated recipe");
        }

        Self::get_by_id(conn, id)
    }

    /// Number of diary entries that logged this recipe
    pub fn get_diary_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM diary_entries WHERE recipe_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a recipe (ingredients and labels cascade)
    ///
    /// Returns Ok(false) if not found and `InUse` if logged in the diary.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        if Self::get_diary_usage_count(conn, id)? > 0 {
            return Err(DbError::InUse { entity: "Recipe", id });
        }

        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        if rows > 0 {
            info!(recipe_id = id, "deleted recipe");
        }
        Ok(rows > 0)
    }

    /// The recipe's ingredient profiles with quantities and declared servings
    pub fn composition(conn: &Connection, id: i64) -> DbResult<RecipeComposition> {
        let recipe = Self::require(conn, id)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT i.unit_kind, i.calories, i.protein, i.carbs, i.fat,
                   i.fiber, i.sugar, i.salt, ri.quantity
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.id
            "#,
        )?;

        let mut composition = RecipeComposition::new(recipe.servings);
        let rows = stmt.query_map([id], |row| {
            let unit: String = row.get(0)?;
            Ok((
                unit,
                NutrientProfile {
                    calories: row.get(1)?,
                    protein: row.get(2)?,
                    carbs: row.get(3)?,
                    fat: row.get(4)?,
                    fiber: row.get(5)?,
                    sugar: row.get(6)?,
                    salt: row.get(7)?,
                    unit: UnitKind::default(),
                },
                row.get::<_, f64>(8)?,
            ))
        })?;

        for row in rows {
            let (unit, mut profile, quantity) = row?;
            match UnitKind::parse(&unit) {
                Some(kind) => {
                    profile.unit = kind;
                    composition = composition.with_item(profile, quantity);
                }
                None => warn!(recipe_id = id, unit = %unit, "skipping ingredient with unknown unit"),
            }
        }

        debug!(recipe_id = id, items = composition.items.len(), "loaded recipe composition");
        Ok(composition)
    }

    /// Labels the user attached to the recipe
    pub fn manual_labels(conn: &Connection, id: i64) -> DbResult<BTreeSet<Label>> {
        labels_with_source(conn, id, LabelSource::Manual)
    }

    /// Labels inferred from the recipe's ingredients
    pub fn automatic_labels(conn: &Connection, id: i64) -> DbResult<BTreeSet<Label>> {
        labels_with_source(conn, id, LabelSource::Automatic)
    }

    /// Labels shown for the recipe: automatic and manual combined, without
    /// diet forms a present food group contradicts
    pub fn effective_labels(conn: &Connection, id: i64) -> DbResult<BTreeSet<Label>> {
        let automatic = Self::automatic_labels(conn, id)?;
        let manual = Self::manual_labels(conn, id)?;
        Ok(merge_labels(&automatic, &manual))
    }

    /// Replace the manual labels of a recipe
    pub fn set_manual_labels(conn: &Connection, id: i64, labels: &BTreeSet<Label>) -> DbResult<()> {
        Self::require(conn, id)?;
        conn.execute(
            "DELETE FROM recipe_labels WHERE recipe_id = ?1 AND source = ?2",
            params![id, LabelSource::Manual.as_str()],
        )?;
        write_labels(conn, id, LabelSource::Manual, labels)?;
        info!(recipe_id = id, labels = labels.len(), "set manual recipe labels");
        Ok(())
    }

    /// Recompute and store the automatic labels from the current ingredients
    pub fn refresh_automatic_labels(conn: &Connection, id: i64) -> DbResult<BTreeSet<Label>> {
        let mut stmt = conn.prepare(
            "SELECT ingredient_id FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY id",
        )?;
        let ingredient_ids = stmt
            .query_map([id], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut constituents = Vec::with_capacity(ingredient_ids.len());
        for ingredient_id in ingredient_ids {
            constituents.push(query_labels(
                conn,
                "SELECT label FROM ingredient_labels WHERE ingredient_id = ?1",
                ingredient_id,
            )?);
        }

        let automatic = infer_automatic_labels(&constituents);

        conn.execute(
            "DELETE FROM recipe_labels WHERE recipe_id = ?1 AND source = ?2",
            params![id, LabelSource::Automatic.as_str()],
        )?;
        write_labels(conn, id, LabelSource::Automatic, &automatic)?;

        debug!(recipe_id = id, labels = automatic.len(), "refreshed automatic labels");
        Ok(automatic)
    }
}

fn labels_with_source(conn: &Connection, id: i64, source: LabelSource) -> DbResult<BTreeSet<Label>> {
    let sql = match source {
        LabelSource::Manual => {
            "SELECT label FROM recipe_labels WHERE recipe_id = ?1 AND source = 'manual'"
        }
        LabelSource::Automatic => {
            "SELECT label FROM recipe_labels WHERE recipe_id = ?1 AND source = 'automatic'"
        }
    };
    query_labels(conn, sql, id)
}

fn write_labels(
    conn: &Connection,
    id: i64,
    source: LabelSource,
    labels: &BTreeSet<Label>,
) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO recipe_labels (recipe_id, label, source) VALUES (?1, ?2, ?3)",
    )?;
    for label in labels {
        stmt.execute(params![id, label.as_str(), source.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample(name: &str, servings: u32) -> RecipeCreate {
    RecipeCreate {
        name: name.to_string(),
        servings,
        is_favorite: false,
        instructions: None,
        notes: None,
        labels: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::ingredient::{self, Ingredient};
    use crate::models::recipe_ingredient::{RecipeIngredient, RecipeIngredientCreate};
    use crate::nutrition::{scale_recipe_to_consumption, UnitKind};

    fn add(conn: &Connection, recipe_id: i64, ingredient_id: i64, quantity: f64) {
        RecipeIngredient::add(
            conn,
            &RecipeIngredientCreate { recipe_id, ingredient_id, quantity, notes: None },
        )
        .unwrap();
    }

    #[test]
    fn test_create_list_and_update() {
        let conn = test_connection();
        let soup = Recipe::create(&conn, &sample("Lentil soup", 4)).unwrap();
        let mut salad = sample("Salad", 2);
        salad.is_favorite = true;
        Recipe::create(&conn, &salad).unwrap();

        assert_eq!(Recipe::count(&conn, None, false).unwrap(), 2);
        assert_eq!(Recipe::count(&conn, None, true).unwrap(), 1);

        let found = Recipe::list(&conn, Some("soup"), false, "name", "asc", 10, 0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(Recipe::count(&conn, Some("soup"), false).unwrap(), 1);
        assert_eq!(Recipe::count(&conn, Some("soup"), true).unwrap(), 0);
        let favorites = Recipe::list(&conn, None, true, "name", "asc", 10, 0).unwrap();
        assert_eq!(favorites[0].name, "Salad");

        let updated = Recipe::update(
            &conn,
            soup.id,
            &RecipeUpdate { servings: Some(6), ..Default::default() },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.servings, 6);

        let zero = RecipeUpdate { servings: Some(0), ..Default::default() };
        assert!(matches!(Recipe::update(&conn, soup.id, &zero), Err(DbError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_zero_servings() {
        let conn = test_connection();
        assert!(matches!(
            Recipe::create(&conn, &sample("Nothing", 0)),
            Err(DbError::Validation(_))
        ));
    }

    #[test]
    fn test_composition_matches_aggregator() {
        let conn = test_connection();
        let a = Ingredient::create(&conn, &ingredient::sample("A", UnitKind::Mass100g, 100.0, &[])).unwrap();
        let b = Ingredient::create(&conn, &ingredient::sample("B", UnitKind::Mass100g, 50.0, &[])).unwrap();
        let recipe = Recipe::create(&conn, &sample("Mix", 4)).unwrap();
        add(&conn, recipe.id, a.id, 200.0);
        add(&conn, recipe.id, b.id, 100.0);

        let composition = Recipe::composition(&conn, recipe.id).unwrap();
        assert_eq!(composition.declared_servings, 4);
        assert_eq!(composition.items.len(), 2);

        let totals = scale_recipe_to_consumption(&composition, 1.0);
        assert!((totals.calories - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_automatic_labels_follow_ingredients() {
        let conn = test_connection();
        let chicken =
            Ingredient::create(&conn, &ingredient::sample("Chicken", UnitKind::Mass100g, 165.0, &[Label::Meat]))
                .unwrap();
        let carrot = Ingredient::create(
            &conn,
            &ingredient::sample("Carrot", UnitKind::Mass100g, 41.0, &[Label::Vegetables]),
        )
        .unwrap();

        let recipe = Recipe::create(&conn, &sample("Stew", 2)).unwrap();
        add(&conn, recipe.id, carrot.id, 200.0);
        let auto = Recipe::automatic_labels(&conn, recipe.id).unwrap();
        assert!(auto.contains(&Label::Vegan));
        assert!(auto.contains(&Label::Vegetables));

        add(&conn, recipe.id, chicken.id, 300.0);
        let auto = Recipe::automatic_labels(&conn, recipe.id).unwrap();
        assert!(auto.contains(&Label::Meat));
        assert!(!auto.contains(&Label::Vegan));
        assert!(!auto.contains(&Label::Vegetarian));
    }

    #[test]
    fn test_ingredient_label_change_cascades() {
        let conn = test_connection();
        let tofu = Ingredient::create(&conn, &ingredient::sample("Tofu", UnitKind::Mass100g, 76.0, &[Label::Legumes]))
            .unwrap();
        let recipe = Recipe::create(&conn, &sample("Stir fry", 2)).unwrap();
        add(&conn, recipe.id, tofu.id, 200.0);
        assert!(Recipe::automatic_labels(&conn, recipe.id).unwrap().contains(&Label::Vegan));

        let refreshed =
            Ingredient::set_labels(&conn, tofu.id, &[Label::Fish].into_iter().collect()).unwrap();
        assert_eq!(refreshed, vec![recipe.id]);

        let auto = Recipe::automatic_labels(&conn, recipe.id).unwrap();
        assert!(auto.contains(&Label::Fish));
        assert!(!auto.contains(&Label::Vegan));
    }

    #[test]
    fn test_effective_labels_drop_contradicted_manual_labels() {
        let conn = test_connection();
        let recipe = Recipe::create(&conn, &sample("Mystery", 1)).unwrap();
        Recipe::set_manual_labels(&conn, recipe.id, &[Label::Vegan].into_iter().collect()).unwrap();
        assert_eq!(
            Recipe::effective_labels(&conn, recipe.id).unwrap(),
            [Label::Vegan].into_iter().collect()
        );

        let beef = Ingredient::create(&conn, &ingredient::sample("Beef", UnitKind::Mass100g, 250.0, &[Label::Meat]))
            .unwrap();
        add(&conn, recipe.id, beef.id, 100.0);
        let effective = Recipe::effective_labels(&conn, recipe.id).unwrap();
        assert!(effective.contains(&Label::Meat));
        assert!(!effective.contains(&Label::Vegan));
        assert!(!effective.contains(&Label::Vegetarian));
    }

    #[test]
    fn test_delete_refused_when_logged() {
        let conn = test_connection();
        let recipe = Recipe::create(&conn, &sample("Porridge", 1)).unwrap();
        conn.execute(
            "INSERT INTO diary_entries (date, meal_type, recipe_id, amount) VALUES ('2025-01-09', 'breakfast', ?1, 1)",
            [recipe.id],
        )
        .unwrap();
        assert!(matches!(Recipe::delete(&conn, recipe.id), Err(DbError::InUse { .. })));

        let unused = Recipe::create(&conn, &sample("Toast", 1)).unwrap();
        assert!(Recipe::delete(&conn, unused.id).unwrap());
    }
}
