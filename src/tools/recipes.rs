//! Recipe MCP Tools
//!
//! Tools for managing recipes, their ingredient lines and labels.

use std::collections::BTreeSet;

use serde::Serialize;

use super::ToolError;
use crate::context::AppContext;
use crate::feed::Change;
use crate::labels::Label;
use crate::models::{
    Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientCreate, RecipeIngredientDetail,
    RecipeIngredientUpdate, RecipeUpdate,
};
use crate::nutrition::{scale_recipe_with, NutrientTotals, RecipeScaling};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub created_at: String,
}

/// Full recipe detail with ingredients, labels and nutrition
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub is_favorite: bool,
    /// Line nutrition is per the ingredient's own unit, whatever `scaling` says
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub labels: BTreeSet<Label>,
    pub manual_labels: BTreeSet<Label>,
    pub automatic_labels: BTreeSet<Label>,
    /// Convention behind `nutrition_per_serving` and `nutrition_total`
    pub scaling: RecipeScaling,
    pub nutrition_per_serving: NutrientTotals,
    pub nutrition_total: NutrientTotals,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub times_logged: i64,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub is_favorite: bool,
    pub calories_per_serving: f64,
    pub ingredient_count: usize,
    pub labels: BTreeSet<Label>,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for successful update
#[derive(Debug, Serialize)]
pub struct RecipeUpdateResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for delete blocked
#[derive(Debug, Serialize)]
pub struct RecipeDeleteBlockedResponse {
    pub error: String,
    pub times_logged: i64,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for changes to a recipe's ingredient lines
#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: f64,
    /// Automatic labels after the change
    pub automatic_labels: BTreeSet<Label>,
}

/// Response for set_recipe_labels
#[derive(Debug, Serialize)]
pub struct RecipeLabelsResponse {
    pub recipe_id: i64,
    pub manual_labels: BTreeSet<Label>,
    pub automatic_labels: BTreeSet<Label>,
    pub labels: BTreeSet<Label>,
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(ctx: &AppContext, data: RecipeCreate) -> Result<CreateRecipeResponse, ToolError> {
    let recipe = ctx
        .database
        .with_transaction(|tx| Recipe::create(tx, &data))
        .map_err(ToolError::db("Failed to create recipe"))?;

    ctx.publish(Change::Recipe(recipe.id));

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        servings: recipe.servings,
        created_at: recipe.created_at,
    })
}

/// Get a recipe with ingredients, labels and nutrition
pub fn get_recipe(ctx: &AppContext, id: i64) -> Result<Option<RecipeDetail>, ToolError> {
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let Some(recipe) = Recipe::get_by_id(&conn, id).map_err(ToolError::db("Failed to get recipe"))? else {
        return Ok(None);
    };

    let ingredients = RecipeIngredient::get_details_for_recipe(&conn, id)
        .map_err(ToolError::db("Failed to get ingredients"))?;
    let composition = Recipe::composition(&conn, id)
        .map_err(ToolError::db("Failed to load composition"))?;
    let manual_labels = Recipe::manual_labels(&conn, id)
        .map_err(ToolError::db("Failed to get labels"))?;
    let automatic_labels = Recipe::automatic_labels(&conn, id)
        .map_err(ToolError::db("Failed to get labels"))?;
    let labels = crate::labels::merge_labels(&automatic_labels, &manual_labels);
    let times_logged = Recipe::get_diary_usage_count(&conn, id)
        .map_err(ToolError::db("Failed to count diary usage"))?;

    let scaling = ctx.scaling();
    let nutrition_per_serving = scale_recipe_with(&composition, 1.0, scaling);
    let nutrition_total = scale_recipe_with(&composition, f64::from(recipe.servings), scaling);

    Ok(Some(RecipeDetail {
        id: recipe.id,
        name: recipe.name,
        servings: recipe.servings,
        is_favorite: recipe.is_favorite,
        ingredients,
        labels,
        manual_labels,
        automatic_labels,
        scaling,
        nutrition_per_serving,
        nutrition_total,
        instructions: recipe.instructions,
        notes: recipe.notes,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
        times_logged,
    }))
}

/// List recipes with optional name filter and pagination
pub fn list_recipes(
    ctx: &AppContext,
    query: Option<&str>,
    favorites_only: bool,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, ToolError> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    let recipes = Recipe::list(&conn, query, favorites_only, sort_by, sort_order, limit, offset)
        .map_err(ToolError::db("Failed to list recipes"))?;
    let total = Recipe::count(&conn, query, favorites_only)
        .map_err(ToolError::db("Failed to count recipes"))?;

    let scaling = ctx.scaling();
    let mut summaries = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let composition = Recipe::composition(&conn, recipe.id)
            .map_err(ToolError::db("Failed to load composition"))?;
        let labels = Recipe::effective_labels(&conn, recipe.id)
            .map_err(ToolError::db("Failed to get labels"))?;
        summaries.push(RecipeSummary {
            id: recipe.id,
            calories_per_serving: scale_recipe_with(&composition, 1.0, scaling).calories,
            ingredient_count: composition.items.len(),
            name: recipe.name,
            servings: recipe.servings,
            is_favorite: recipe.is_favorite,
            labels,
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe's description or declared servings
pub fn update_recipe(ctx: &AppContext, id: i64, data: RecipeUpdate) -> Result<RecipeUpdateResponse, ToolError> {
    let updated = ctx
        .database
        .with_conn(|conn| Recipe::update(conn, id, &data))
        .map_err(ToolError::db("Failed to update recipe"))?;

    match updated {
        Some(recipe) => {
            ctx.publish(Change::Recipe(id));
            Ok(RecipeUpdateResponse {
                success: true,
                updated_at: recipe.updated_at,
            })
        }
        None => Err(ToolError::Invalid(format!("Recipe not found with id: {}", id))),
    }
}

/// Delete a recipe (blocked if logged in the diary)
pub fn delete_recipe(
    ctx: &AppContext,
    id: i64,
) -> Result<Result<RecipeDeleteSuccessResponse, RecipeDeleteBlockedResponse>, ToolError> {
    let conn = ctx.database.get_conn().map_err(ToolError::db("Database error"))?;

    if Recipe::get_by_id(&conn, id)
        .map_err(ToolError::db("Database error"))?
        .is_none()
    {
        return Err(ToolError::Invalid(format!("Recipe not found with id: {}", id)));
    }

    let times_logged = Recipe::get_diary_usage_count(&conn, id)
        .map_err(ToolError::db("Failed to check diary usage"))?;

    if times_logged > 0 {
        return Ok(Err(RecipeDeleteBlockedResponse {
            error: format!("Cannot delete recipe: logged {} times in the diary", times_logged),
            times_logged,
        }));
    }

    Recipe::delete(&conn, id).map_err(ToolError::db("Failed to delete recipe"))?;
    ctx.publish(Change::Recipe(id));

    Ok(Ok(RecipeDeleteSuccessResponse {
        success: true,
        deleted_id: id,
    }))
}

/// Replace the manual labels of a recipe
pub fn set_recipe_labels(
    ctx: &AppContext,
    recipe_id: i64,
    labels: BTreeSet<Label>,
) -> Result<RecipeLabelsResponse, ToolError> {
    let (manual_labels, automatic_labels) = ctx
        .database
        .with_transaction(|tx| {
            Recipe::set_manual_labels(tx, recipe_id, &labels)?;
            Ok((
                Recipe::manual_labels(tx, recipe_id)?,
                Recipe::automatic_labels(tx, recipe_id)?,
            ))
        })
        .map_err(ToolError::db("Failed to set recipe labels"))?;

    ctx.publish(Change::Recipe(recipe_id));

    Ok(RecipeLabelsResponse {
        recipe_id,
        labels: crate::labels::merge_labels(&automatic_labels, &manual_labels),
        manual_labels,
        automatic_labels,
    })
}

// ============================================================================
// Recipe Ingredient Tools
// ============================================================================

fn ingredient_response(
    ctx: &AppContext,
    line: RecipeIngredient,
) -> Result<RecipeIngredientResponse, ToolError> {
    let automatic_labels = ctx
        .database
        .with_conn(|conn| Recipe::automatic_labels(conn, line.recipe_id))
        .map_err(ToolError::db("Failed to get labels"))?;

    Ok(RecipeIngredientResponse {
        id: line.id,
        recipe_id: line.recipe_id,
        ingredient_id: line.ingredient_id,
        quantity: line.quantity,
        automatic_labels,
    })
}

/// Add an ingredient to a recipe
pub fn add_recipe_ingredient(
    ctx: &AppContext,
    data: RecipeIngredientCreate,
) -> Result<RecipeIngredientResponse, ToolError> {
    let line = ctx
        .database
        .with_transaction(|tx| RecipeIngredient::add(tx, &data))
        .map_err(ToolError::db("Failed to add ingredient"))?;

    ctx.publish(Change::Recipe(line.recipe_id));
    ingredient_response(ctx, line)
}

/// Update a recipe ingredient
pub fn update_recipe_ingredient(
    ctx: &AppContext,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<Option<RecipeIngredientResponse>, ToolError> {
    let updated = ctx
        .database
        .with_transaction(|tx| RecipeIngredient::update(tx, id, &data))
        .map_err(ToolError::db("Failed to update ingredient"))?;

    match updated {
        Some(line) => {
            ctx.publish(Change::Recipe(line.recipe_id));
            ingredient_response(ctx, line).map(Some)
        }
        None => Ok(None),
    }
}

/// Remove an ingredient from a recipe
pub fn remove_recipe_ingredient(ctx: &AppContext, id: i64) -> Result<bool, ToolError> {
    let removed = ctx
        .database
        .with_transaction(|tx| {
            let recipe_id = RecipeIngredient::get_recipe_id(tx, id)?;
            Ok((recipe_id, RecipeIngredient::remove(tx, id)?))
        })
        .map_err(ToolError::db("Failed to remove ingredient"))?;

    match removed {
        (Some(recipe_id), true) => {
            ctx.publish(Change::Recipe(recipe_id));
            Ok(true)
        }
        _ => Ok(false),
    }
}
