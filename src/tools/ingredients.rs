//! Ingredient MCP Tools
//!
//! Tools for managing the ingredient catalog.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use super::ToolError;
use crate::context::AppContext;
use crate::feed::Change;
use crate::labels::Label;
use crate::models::{Ingredient, IngredientCreate, IngredientUpdate};
use crate::nutrition::{scale_to_quantity, NutrientProfile, NutrientTotals, UnitKind};

/// Response for add_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub unit_kind: UnitKind,
    pub labels: BTreeSet<Label>,
    pub created_at: String,
}

/// Summary of an ingredient for list/search results
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub unit_kind: UnitKind,
    pub calories: f64,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(item: &Ingredient) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            brand: item.brand.clone(),
            unit_kind: item.profile.unit,
            calories: item.profile.calories,
        }
    }
}

/// Response for search_ingredients
#[derive(Debug, Serialize)]
pub struct SearchIngredientsResponse {
    pub items: Vec<IngredientSummary>,
    pub total: usize,
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub items: Vec<IngredientSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Full ingredient detail response
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub profile: NutrientProfile,
    pub labels: BTreeSet<Label>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub usage_count: i64,
    pub used_in_recipes: Vec<String>,
}

/// Response for update_ingredient and set_ingredient_labels
#[derive(Debug, Serialize)]
pub struct UpdateIngredientResponse {
    pub success: bool,
    pub updated_at: String,
    /// Recipes whose automatic labels were recomputed
    pub recipes_relabeled: Vec<i64>,
}

/// Response for delete_ingredient blocked
#[derive(Debug, Serialize)]
pub struct DeleteIngredientBlockedResponse {
    pub error: String,
    pub usage_count: i64,
    pub used_in_recipes: Vec<String>,
}

/// Response for successful delete_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteIngredientSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for ingredient_nutrition
#[derive(Debug, Serialize)]
pub struct IngredientNutritionResponse {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: &'static str,
    pub nutrition: NutrientTotals,
}

/// Add a new ingredient
pub fn add_ingredient(ctx: &AppContext, data: IngredientCreate) -> Result<AddIngredientResponse, ToolError> {
    let item = ctx
        .database
        .with_transaction(|tx| Ingredient::create(tx, &data))
        .map_err(ToolError::db("Failed to create ingredient"))?;

    ctx.publish(Change::Ingredients);

    Ok(AddIngredientResponse {
        id: item.id,
        name: item.name,
        brand: item.brand,
        unit_kind: item.profile.unit,
        labels: data.labels,
        created_at: item.created_at,
    })
}

/// Get an ingredient by ID with labels and usage information
pub fn get_ingredient(ctx: &AppContext, id: i64) -> Result<Option<IngredientDetail>, ToolError> {
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let item = Ingredient::get_by_id(&conn, id)
        .map_err(ToolError::db("Failed to get ingredient"))?;

    match item {
        Some(item) => {
            let labels = Ingredient::labels(&conn, id)
                .map_err(ToolError::db("Failed to get labels"))?;
            let usage_count = Ingredient::get_usage_count(&conn, id)
                .map_err(ToolError::db("Failed to get usage count"))?;
            let used_in_recipes = Ingredient::get_used_in_recipes(&conn, id)
                .map_err(ToolError::db("Failed to get recipe usage"))?;

            Ok(Some(IngredientDetail {
                id: item.id,
                name: item.name,
                brand: item.brand,
                profile: item.profile,
                labels,
                notes: item.notes,
                created_at: item.created_at,
                updated_at: item.updated_at,
                usage_count,
                used_in_recipes,
            }))
        }
        None => Ok(None),
    }
}

/// Search ingredients by name or brand
pub fn search_ingredients(ctx: &AppContext, query: &str, limit: i64) -> Result<SearchIngredientsResponse, ToolError> {
    let limit = limit.clamp(1, 100);
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let items = Ingredient::search(&conn, query, limit)
        .map_err(ToolError::db("Search failed"))?;

    let summaries: Vec<IngredientSummary> = items.iter().map(IngredientSummary::from).collect();
    let total = summaries.len();

    Ok(SearchIngredientsResponse { items: summaries, total })
}

/// List ingredients with label filter and pagination
pub fn list_ingredients(
    ctx: &AppContext,
    label: Option<&str>,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListIngredientsResponse, ToolError> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let label = match label {
        Some(raw) => Some(Label::parse(raw).ok_or_else(|| ToolError::Invalid(format!("Unknown label: {}", raw)))?),
        None => None,
    };

    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let items = Ingredient::list(&conn, label, sort_by, sort_order, limit, offset)
        .map_err(ToolError::db("Failed to list ingredients"))?;
    let total = Ingredient::count(&conn, label)
        .map_err(ToolError::db("Failed to count ingredients"))?;

    Ok(ListIngredientsResponse {
        items: items.iter().map(IngredientSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update an ingredient's profile or description
pub fn update_ingredient(
    ctx: &AppContext,
    id: i64,
    data: IngredientUpdate,
) -> Result<UpdateIngredientResponse, ToolError> {
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let updated = Ingredient::update(&conn, id, &data)
        .map_err(ToolError::db("Failed to update ingredient"))?;

    match updated {
        Some(item) => {
            ctx.publish(Change::Ingredients);
            Ok(UpdateIngredientResponse {
                success: true,
                updated_at: item.updated_at,
                recipes_relabeled: Vec::new(),
            })
        }
        None => Err(ToolError::Invalid(format!("Ingredient not found with id: {}", id))),
    }
}

/// Replace an ingredient's labels; recipes using it are relabeled
pub fn set_ingredient_labels(
    ctx: &AppContext,
    id: i64,
    labels: BTreeSet<Label>,
) -> Result<UpdateIngredientResponse, ToolError> {
    let (item, recipes_relabeled) = ctx
        .database
        .with_transaction(|tx| {
            let recipe_ids = Ingredient::set_labels(tx, id, &labels)?;
            Ok((Ingredient::require(tx, id)?, recipe_ids))
        })
        .map_err(ToolError::db("Failed to set ingredient labels"))?;

    ctx.publish(Change::Ingredients);
    for recipe_id in &recipes_relabeled {
        ctx.publish(Change::Recipe(*recipe_id));
    }
    info!(ingredient_id = id, recipes = recipes_relabeled.len(), "ingredient relabeled");

    Ok(UpdateIngredientResponse {
        success: true,
        updated_at: item.updated_at,
        recipes_relabeled,
    })
}

/// Delete an ingredient (blocked if used by a recipe or diary entry)
pub fn delete_ingredient(
    ctx: &AppContext,
    id: i64,
) -> Result<Result<DeleteIngredientSuccessResponse, DeleteIngredientBlockedResponse>, ToolError> {
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    if Ingredient::get_by_id(&conn, id)
        .map_err(ToolError::db("Database error"))?
        .is_none()
    {
        return Err(ToolError::Invalid(format!("Ingredient not found with id: {}", id)));
    }

    let usage_count = Ingredient::get_usage_count(&conn, id)
        .map_err(ToolError::db("Failed to check usage"))?;

    if usage_count > 0 {
        let used_in_recipes = Ingredient::get_used_in_recipes(&conn, id)
            .map_err(ToolError::db("Failed to get recipe usage"))?;

        return Ok(Err(DeleteIngredientBlockedResponse {
            error: format!(
                "Cannot delete ingredient: referenced {} time(s) by recipes or diary entries",
                usage_count
            ),
            usage_count,
            used_in_recipes,
        }));
    }

    Ingredient::delete(&conn, id).map_err(ToolError::db("Failed to delete ingredient"))?;
    ctx.publish(Change::Ingredients);

    Ok(Ok(DeleteIngredientSuccessResponse { success: true, deleted_id: id }))
}

/// Nutrition for a quantity of an ingredient, in its own unit
pub fn ingredient_nutrition(
    ctx: &AppContext,
    id: i64,
    quantity: f64,
) -> Result<IngredientNutritionResponse, ToolError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ToolError::Invalid(format!("quantity must be a non-negative number, got {}", quantity)));
    }

    let item = ctx
        .database
        .with_conn(|conn| Ingredient::require(conn, id))
        .map_err(ToolError::db("Failed to get ingredient"))?;

    Ok(IngredientNutritionResponse {
        id: item.id,
        quantity,
        unit: item.profile.unit.quantity_unit(),
        nutrition: scale_to_quantity(&item.profile, quantity),
        name: item.name,
    })
}
