//! Diary Entry model
//!
//! What was eaten on a date, at which meal: either an ingredient (amount in
//! the ingredient's unit) or a recipe (amount in servings). Nutrition is not
//! stored; it is computed from the current catalog when read.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Ingredient, Recipe};
use crate::db::{DbError, DbResult};
use crate::nutrition::{ConsumptionRecord, NutrientTotals, RecipeScaling};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Meal type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" | "snacks" => Some(MealType::Snack),
            _ => None,
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a diary entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntrySource {
    Ingredient(i64),
    Recipe(i64),
}

/// A diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub source: EntrySource,
    /// Quantity in the ingredient's unit, or servings of the recipe
    pub amount: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryEntryCreate {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub source: EntrySource,
    pub amount: f64,
    pub notes: Option<String>,
}

/// Data for updating a diary entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiaryEntryUpdate {
    pub date: Option<NaiveDate>,
    pub meal_type: Option<MealType>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
}

fn validate_amount(amount: f64) -> DbResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DbError::validation(format!(
            "amount must be greater than 0, got {}",
            amount
        )));
    }
    Ok(())
}

fn conversion_error(column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(
        0,
        format!("{} '{}'", column, value),
        rusqlite::types::Type::Text,
    )
}

impl DiaryEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date_str: String = row.get("date")?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|_| conversion_error("date", &date_str))?;

        let meal_type_str: String = row.get("meal_type")?;
        let meal_type =
            MealType::parse(&meal_type_str).ok_or_else(|| conversion_error("meal_type", &meal_type_str))?;

        let ingredient_id: Option<i64> = row.get("ingredient_id")?;
        let recipe_id: Option<i64> = row.get("recipe_id")?;
        let source = match (ingredient_id, recipe_id) {
            (Some(id), None) => EntrySource::Ingredient(id),
            (None, Some(id)) => EntrySource::Recipe(id),
            _ => return Err(conversion_error("source", "ingredient_id/recipe_id")),
        };

        Ok(Self {
            id: row.get("id")?,
            date,
            meal_type,
            source,
            amount: row.get("amount")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new diary entry
    pub fn create(conn: &Connection, data: &DiaryEntryCreate) -> DbResult<Self> {
        validate_amount(data.amount)?;

        let (ingredient_id, recipe_id) = match data.source {
            EntrySource::Ingredient(id) => {
                Ingredient::require(conn, id)?;
                (Some(id), None)
            }
            EntrySource::Recipe(id) => {
                Recipe::require(conn, id)?;
                (None, Some(id))
            }
        };

        conn.execute(
            r#"
            INSERT INTO diary_entries (date, meal_type, ingredient_id, recipe_id, amount, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.date.format(DATE_FORMAT).to_string(),
                data.meal_type.as_str(),
                ingredient_id,
                recipe_id,
                data.amount,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(
            entry_id = id,
            date = %data.date,
            meal = %data.meal_type,
            amount = data.amount,
            "logged diary entry"
        );

        Self::require(conn, id)
    }

    /// Get a diary entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM diary_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a diary entry by ID, treating absence as an error
    pub fn require(conn: &Connection, id: i64) -> DbResult<Self> {
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::not_found("DiaryEntry", id))
    }

    /// All entries for a date, in meal order then insertion order
    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> DbResult<Vec<Self>> {
        Self::list_for_range(conn, date, date)
    }

    /// All entries between two dates, inclusive
    pub fn list_for_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM diary_entries
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date,
                CASE meal_type
                    WHEN 'breakfast' THEN 1
                    WHEN 'lunch' THEN 2
                    WHEN 'dinner' THEN 3
                    WHEN 'snack' THEN 4
                END,
                id
            "#,
        )?;

        let entries = stmt
            .query_map(
                params![start.format(DATE_FORMAT).to_string(), end.format(DATE_FORMAT).to_string()],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%start, %end, entries = entries.len(), "listed diary entries");
        Ok(entries)
    }

    /// Update a diary entry
    pub fn update(conn: &Connection, id: i64, data: &DiaryEntryUpdate) -> DbResult<Option<Self>> {
        if let Some(amount) = data.amount {
            validate_amount(amount)?;
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(date) = data.date {
            updates.push(format!("date = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(date.format(DATE_FORMAT).to_string()));
        }
        if let Some(meal_type) = data.meal_type {
            updates.push(format!("meal_type = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(meal_type.as_str()));
        }
        if let Some(amount) = data.amount {
            updates.push(format!("amount = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(amount));
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
            "UPDATE diary_entries SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows > 0 {
            info!(entry_id = id, "updated diary entry");
        }

        Self::get_by_id(conn, id)
    }

    /// Delete a diary entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM diary_entries WHERE id = ?1", [id])?;
        if rows > 0 {
            info!(entry_id = id, "deleted diary entry");
        }
        Ok(rows > 0)
    }

    /// Display name of the entry's ingredient or recipe
    pub fn source_name(&self, conn: &Connection) -> DbResult<String> {
        match self.source {
            EntrySource::Ingredient(id) => Ok(Ingredient::require(conn, id)?.name),
            EntrySource::Recipe(id) => Ok(Recipe::require(conn, id)?.name),
        }
    }

    /// The entry as input for the nutrition aggregator
    pub fn consumption_record(&self, conn: &Connection) -> DbResult<ConsumptionRecord> {
        match self.source {
            EntrySource::Ingredient(id) => Ok(ConsumptionRecord::Ingredient {
                profile: Ingredient::require(conn, id)?.profile,
                quantity: self.amount,
            }),
            EntrySource::Recipe(id) => Ok(ConsumptionRecord::Recipe {
                composition: Recipe::composition(conn, id)?,
                servings: self.amount,
            }),
        }
    }

    /// Nutrient totals for what this entry records
    pub fn nutrition(&self, conn: &Connection, scaling: RecipeScaling) -> DbResult<NutrientTotals> {
        Ok(self.consumption_record(conn)?.totals(scaling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::recipe_ingredient::{RecipeIngredient, RecipeIngredientCreate};
    use crate::models::{ingredient, recipe};
    use crate::nutrition::UnitKind;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_log_ingredient_entry() {
        let conn = test_connection();
        let mut apple = ingredient::sample("Apple", UnitKind::Mass100g, 52.0, &[]);
        apple.protein = 0.3;
        let apple = Ingredient::create(&conn, &apple).unwrap();

        let entry = DiaryEntry::create(
            &conn,
            &DiaryEntryCreate {
                date: date("2025-01-09"),
                meal_type: MealType::Snack,
                source: EntrySource::Ingredient(apple.id),
                amount: 150.0,
                notes: None,
            },
        )
        .unwrap();

        assert_eq!(entry.source, EntrySource::Ingredient(apple.id));
        assert_eq!(entry.source_name(&conn).unwrap(), "Apple");
        let totals = entry.nutrition(&conn, RecipeScaling::Uniform100).unwrap();
        assert!((totals.calories - 78.0).abs() < 1e-9);
        assert!((totals.protein - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_log_recipe_entry() {
        let conn = test_connection();
        let a = Ingredient::create(&conn, &ingredient::sample("A", UnitKind::Mass100g, 100.0, &[])).unwrap();
        let b = Ingredient::create(&conn, &ingredient::sample("B", UnitKind::Mass100g, 50.0, &[])).unwrap();
        let r = Recipe::create(&conn, &recipe::sample("Mix", 4)).unwrap();
        for (ingredient_id, quantity) in [(a.id, 200.0), (b.id, 100.0)] {
            RecipeIngredient::add(
                &conn,
                &RecipeIngredientCreate { recipe_id: r.id, ingredient_id, quantity, notes: None },
            )
            .unwrap();
        }

        let entry = DiaryEntry::create(
            &conn,
            &DiaryEntryCreate {
                date: date("2025-01-09"),
                meal_type: MealType::Dinner,
                source: EntrySource::Recipe(r.id),
                amount: 1.0,
                notes: None,
            },
        )
        .unwrap();

        let totals = entry.nutrition(&conn, RecipeScaling::Uniform100).unwrap();
        assert!((totals.calories - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_create_validates_amount_and_source() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        let base = DiaryEntryCreate {
            date: date("2025-01-09"),
            meal_type: MealType::Breakfast,
            source: EntrySource::Ingredient(egg.id),
            amount: 0.0,
            notes: None,
        };
        assert!(matches!(DiaryEntry::create(&conn, &base), Err(DbError::Validation(_))));

        let missing = DiaryEntryCreate { amount: 1.0, source: EntrySource::Recipe(42), ..base };
        assert!(matches!(DiaryEntry::create(&conn, &missing), Err(DbError::NotFound { .. })));
    }

    #[test]
    fn test_list_orders_by_meal_and_filters_range() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        let log = |d: &str, meal: MealType| {
            DiaryEntry::create(
                &conn,
                &DiaryEntryCreate {
                    date: date(d),
                    meal_type: meal,
                    source: EntrySource::Ingredient(egg.id),
                    amount: 1.0,
                    notes: None,
                },
            )
            .unwrap()
        };
        log("2025-01-09", MealType::Dinner);
        log("2025-01-09", MealType::Breakfast);
        log("2025-01-10", MealType::Lunch);
        log("2025-01-12", MealType::Snack);

        let day = DiaryEntry::list_for_date(&conn, date("2025-01-09")).unwrap();
        let meals: Vec<MealType> = day.iter().map(|e| e.meal_type).collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Dinner]);

        let range = DiaryEntry::list_for_range(&conn, date("2025-01-09"), date("2025-01-10")).unwrap();
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_update_and_delete() {
        let conn = test_connection();
        let egg = Ingredient::create(&conn, &ingredient::sample("Egg", UnitKind::Piece, 70.0, &[])).unwrap();
        let entry = DiaryEntry::create(
            &conn,
            &DiaryEntryCreate {
                date: date("2025-01-09"),
                meal_type: MealType::Breakfast,
                source: EntrySource::Ingredient(egg.id),
                amount: 2.0,
                notes: None,
            },
        )
        .unwrap();

        let moved = DiaryEntry::update(
            &conn,
            entry.id,
            &DiaryEntryUpdate {
                date: Some(date("2025-01-10")),
                amount: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(moved.date, date("2025-01-10"));
        assert_eq!(moved.nutrition(&conn, RecipeScaling::Uniform100).unwrap().calories, 210.0);

        let bad = DiaryEntryUpdate { amount: Some(-1.0), ..Default::default() };
        assert!(DiaryEntry::update(&conn, entry.id, &bad).is_err());

        assert!(DiaryEntry::delete(&conn, entry.id).unwrap());
        assert!(DiaryEntry::get_by_id(&conn, entry.id).unwrap().is_none());
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!(MealType::parse("Lunch"), Some(MealType::Lunch));
        assert_eq!(MealType::parse("snacks"), Some(MealType::Snack));
        assert_eq!(MealType::parse("brunch"), None);
        assert!(MealType::Breakfast < MealType::Snack);
    }
}
