//! Nutrilog MCP Server Implementation
//!
//! Implements the MCP server with all diary tools.

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::sync::Mutex;

use crate::context::AppContext;
use crate::labels::{parse_labels, Label};
use crate::models::{
    IngredientCreate, IngredientUpdate, RecipeCreate, RecipeIngredientCreate, RecipeIngredientUpdate,
    RecipeUpdate, ShoppingItemCreate,
};
use crate::nutrition::UnitKind;
use crate::tools::status::StatusTracker;
use crate::tools::{diary, ingredients, recipes, shopping, ToolError};

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    ctx: AppContext,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                ctx.config.database_path.clone(),
                ctx.config.recipe_scaling,
            ))),
            ctx,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Bad arguments become invalid_params; storage failures stay internal
fn tool_error(e: ToolError) -> McpError {
    if e.is_invalid_input() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn not_found(entity: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        entity, id
    ))]))
}

fn labels_param(raw: &[String]) -> Result<BTreeSet<Label>, McpError> {
    parse_labels(raw).map_err(|unknown| {
        McpError::invalid_params(format!("Unknown label(s): {}", unknown.join(", ")), None)
    })
}

fn unit_kind_param(raw: &str) -> Result<UnitKind, McpError> {
    UnitKind::parse(raw).ok_or_else(|| {
        McpError::invalid_params(
            format!("Invalid unit_kind '{}': use 100g, 100ml or piece", raw),
            None,
        )
    })
}

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddIngredientParams {
    pub name: String,
    pub brand: Option<String>,
    /// "100g", "100ml" or "piece"
    #[serde(default = "default_unit_kind")]
    pub unit_kind: String,
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
    /// Food group labels such as MEAT, DAIRY, VEGETABLES
    #[serde(default)]
    pub labels: Vec<String>,
}

fn default_unit_kind() -> String { "100g".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchIngredientsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIngredientsParams {
    pub label: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "name".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateIngredientParams {
    pub id: i64,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub unit_kind: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub salt: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetLabelsParams {
    pub id: i64,
    /// Complete new label list; an empty list removes all labels
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientNutritionParams {
    pub id: i64,
    /// Amount in the ingredient's unit: grams, milliliters or pieces
    pub quantity: f64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub name: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub is_favorite: bool,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    /// Manual labels
    #[serde(default)]
    pub labels: Vec<String>,
}

fn default_servings() -> u32 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    pub query: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub id: i64,
    pub name: Option<String>,
    pub servings: Option<u32>,
    pub is_favorite: Option<bool>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    /// Amount in the ingredient's unit
    pub quantity: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    pub id: i64,
    pub quantity: Option<f64>,
    pub notes: Option<String>,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogEntryParams {
    /// YYYY-MM-DD
    pub date: String,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub ingredient_id: Option<i64>,
    pub recipe_id: Option<i64>,
    /// Quantity in the ingredient's unit, or servings of the recipe
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateEntryParams {
    pub id: i64,
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklyStatsParams {
    /// First day of the week, YYYY-MM-DD
    pub start_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WaitForDayChangeParams {
    /// YYYY-MM-DD
    pub date: String,
    /// How long to wait, 1 to 300 seconds
    #[serde(default = "default_wait_seconds")]
    pub timeout_seconds: u64,
}

fn default_wait_seconds() -> u64 { 30 }

// ============================================================================
// Shopping Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddShoppingItemParams {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub ingredient_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListShoppingItemsParams {
    #[serde(default = "default_include_checked")]
    pub include_checked: bool,
}

fn default_include_checked() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCheckedParams {
    pub id: i64,
    pub checked: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeToListParams {
    pub recipe_id: i64,
    #[serde(default = "default_list_servings")]
    pub servings: f64,
}

fn default_list_servings() -> f64 { 1.0 }

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrilog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for logging food. Call this when starting a food logging session or when unsure how to use the diary tools.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIARY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Ingredients ---

    #[tool(description = "Create an ingredient with nutrient values per 100g, per 100ml or per piece, plus optional food group labels")]
    fn add_ingredient(&self, Parameters(p): Parameters<AddIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientCreate {
            name: p.name, brand: p.brand, unit_kind: unit_kind_param(&p.unit_kind)?,
            calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat,
            fiber: p.fiber, sugar: p.sugar, salt: p.salt, notes: p.notes,
            labels: labels_param(&p.labels)?,
        };
        let result = ingredients::add_ingredient(&self.ctx, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Search ingredients by name or brand")]
    fn search_ingredients(&self, Parameters(p): Parameters<SearchIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::search_ingredients(&self.ctx, &p.query, p.limit).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get an ingredient with its nutrient profile, labels and usage")]
    fn get_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match ingredients::get_ingredient(&self.ctx, p.id).map_err(tool_error)? {
            Some(item) => to_json(&item),
            None => not_found("Ingredient", p.id),
        }
    }

    #[tool(description = "List ingredients with optional label filter, sorting (name, calories, protein, created_at) and pagination")]
    fn list_ingredients(&self, Parameters(p): Parameters<ListIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::list_ingredients(&self.ctx, p.label.as_deref(), &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Update an ingredient. Only the provided fields change. Diary nutrition follows the new values.")]
    fn update_ingredient(&self, Parameters(p): Parameters<UpdateIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientUpdate {
            name: p.name, brand: p.brand,
            unit_kind: p.unit_kind.as_deref().map(unit_kind_param).transpose()?,
            calories: p.calories, protein: p.protein, carbs: p.carbs, fat: p.fat,
            fiber: p.fiber, sugar: p.sugar, salt: p.salt, notes: p.notes,
        };
        let result = ingredients::update_ingredient(&self.ctx, p.id, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Replace an ingredient's labels. Recipes using the ingredient get their automatic labels recomputed.")]
    fn set_ingredient_labels(&self, Parameters(p): Parameters<SetLabelsParams>) -> Result<CallToolResult, McpError> {
        let labels = labels_param(&p.labels)?;
        let result = ingredients::set_ingredient_labels(&self.ctx, p.id, labels).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Delete an ingredient. Blocked while any recipe or diary entry uses it.")]
    fn delete_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match ingredients::delete_ingredient(&self.ctx, p.id).map_err(tool_error)? {
            Ok(success) => to_json(&success),
            Err(blocked) => to_json(&blocked),
        }
    }

    #[tool(description = "Compute nutrition for a quantity of an ingredient (grams, milliliters or pieces, per its unit kind)")]
    fn ingredient_nutrition(&self, Parameters(p): Parameters<IngredientNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::ingredient_nutrition(&self.ctx, p.id, p.quantity).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe with the number of servings it makes and optional manual labels")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate {
            name: p.name, servings: p.servings, is_favorite: p.is_favorite,
            instructions: p.instructions, notes: p.notes, labels: labels_param(&p.labels)?,
        };
        let result = recipes::create_recipe(&self.ctx, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get a recipe with ingredients, labels, and nutrition per serving and for the whole recipe")]
    fn get_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match recipes::get_recipe(&self.ctx, p.id).map_err(tool_error)? {
            Some(recipe) => to_json(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes with optional name search, favorites filter, sorting and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.ctx, p.query.as_deref(), p.favorites_only, &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Update a recipe's name, servings, favorite flag, instructions or notes")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate {
            name: p.name, servings: p.servings, is_favorite: p.is_favorite,
            instructions: p.instructions, notes: p.notes,
        };
        let result = recipes::update_recipe(&self.ctx, p.id, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Delete a recipe. Blocked while it is logged in the diary.")]
    fn delete_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match recipes::delete_recipe(&self.ctx, p.id).map_err(tool_error)? {
            Ok(success) => to_json(&success),
            Err(blocked) => to_json(&blocked),
        }
    }

    #[tool(description = "Add an ingredient to a recipe. Quantity is in the ingredient's unit. Automatic labels are recomputed.")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate {
            recipe_id: p.recipe_id, ingredient_id: p.ingredient_id, quantity: p.quantity, notes: p.notes,
        };
        let result = recipes::add_recipe_ingredient(&self.ctx, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Change the quantity or notes of a recipe ingredient")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpdate { quantity: p.quantity, notes: p.notes };
        match recipes::update_recipe_ingredient(&self.ctx, p.id, data).map_err(tool_error)? {
            Some(line) => to_json(&line),
            None => not_found("Recipe ingredient", p.id),
        }
    }

    #[tool(description = "Remove an ingredient from its recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let removed = recipes::remove_recipe_ingredient(&self.ctx, p.id).map_err(tool_error)?;
        to_json(&serde_json::json!({ "success": removed, "id": p.id }))
    }

    #[tool(description = "Replace a recipe's manual labels. Diet labels contradicted by an ingredient are hidden from the effective labels.")]
    fn set_recipe_labels(&self, Parameters(p): Parameters<SetLabelsParams>) -> Result<CallToolResult, McpError> {
        let labels = labels_param(&p.labels)?;
        let result = recipes::set_recipe_labels(&self.ctx, p.id, labels).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Diary ---

    #[tool(description = "Log an ingredient (amount in its unit) or a recipe (amount in servings) for a date and meal")]
    fn log_entry(&self, Parameters(p): Parameters<LogEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::log_entry(&self.ctx, &p.date, &p.meal_type, p.ingredient_id, p.recipe_id, p.amount, p.notes)
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get a diary entry with its computed nutrition")]
    fn get_entry(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match diary::get_entry(&self.ctx, p.id).map_err(tool_error)? {
            Some(entry) => to_json(&entry),
            None => not_found("Diary entry", p.id),
        }
    }

    #[tool(description = "Update a diary entry's date, meal type, amount or notes")]
    fn update_entry(&self, Parameters(p): Parameters<UpdateEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::update_entry(&self.ctx, p.id, p.date.as_deref(), p.meal_type.as_deref(), p.amount, p.notes)
            .map_err(tool_error)?;
        match result {
            Some(entry) => to_json(&entry),
            None => not_found("Diary entry", p.id),
        }
    }

    #[tool(description = "Delete a diary entry")]
    fn delete_entry(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = diary::delete_entry(&self.ctx, p.id).map_err(tool_error)?;
        to_json(&serde_json::json!({ "success": deleted, "id": p.id }))
    }

    #[tool(description = "Get everything logged on a date with per-meal and daily nutrition totals")]
    fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_day(&self.ctx, &p.date).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get per-day totals, the week total and the daily average (over logged days) for seven days from start_date")]
    fn weekly_stats(&self, Parameters(p): Parameters<WeeklyStatsParams>) -> Result<CallToolResult, McpError> {
        let result = diary::weekly_stats(&self.ctx, &p.start_date).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Wait until something changes the nutrition of a date (a diary entry on it, or any ingredient or recipe edit), then return the fresh day summary. Returns changed=false with the current summary on timeout.")]
    async fn wait_for_day_change(&self, Parameters(p): Parameters<WaitForDayChangeParams>) -> Result<CallToolResult, McpError> {
        let timeout = Duration::from_secs(p.timeout_seconds.clamp(1, 300));
        let result = diary::wait_for_day_change(&self.ctx, &p.date, timeout).await.map_err(tool_error)?;
        to_json(&result)
    }

    // --- Shopping List ---

    #[tool(description = "Add an item to the shopping list")]
    fn add_shopping_item(&self, Parameters(p): Parameters<AddShoppingItemParams>) -> Result<CallToolResult, McpError> {
        let data = ShoppingItemCreate { name: p.name, quantity: p.quantity, unit: p.unit, ingredient_id: p.ingredient_id };
        let result = shopping::add_shopping_item(&self.ctx, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "List shopping items, unchecked first")]
    fn list_shopping_items(&self, Parameters(p): Parameters<ListShoppingItemsParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::list_shopping_items(&self.ctx, p.include_checked).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Check or uncheck a shopping item")]
    fn set_shopping_item_checked(&self, Parameters(p): Parameters<SetCheckedParams>) -> Result<CallToolResult, McpError> {
        match shopping::set_shopping_item_checked(&self.ctx, p.id, p.checked).map_err(tool_error)? {
            Some(item) => to_json(&item),
            None => not_found("Shopping item", p.id),
        }
    }

    #[tool(description = "Delete a shopping item")]
    fn delete_shopping_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = shopping::delete_shopping_item(&self.ctx, p.id).map_err(tool_error)?;
        to_json(&serde_json::json!({ "success": deleted, "id": p.id }))
    }

    #[tool(description = "Remove all checked items from the shopping list")]
    fn clear_checked_shopping_items(&self) -> Result<CallToolResult, McpError> {
        let removed = shopping::clear_checked_shopping_items(&self.ctx).map_err(tool_error)?;
        to_json(&serde_json::json!({ "success": true, "removed": removed }))
    }

    #[tool(description = "Add a recipe's ingredients to the shopping list, scaled to the given servings. Merges into matching unchecked items.")]
    fn add_recipe_to_shopping_list(&self, Parameters(p): Parameters<AddRecipeToListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping::add_recipe_to_shopping_list(&self.ctx, p.recipe_id, p.servings).map_err(tool_error)?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - nutrition diary. Call diary_instructions before logging food. \
                 Ingredients: add/search/get/list/update/delete_ingredient, set_ingredient_labels, ingredient_nutrition. \
                 Recipes: create/get/list/update/delete_recipe, add/update/remove_recipe_ingredient, set_recipe_labels. \
                 Diary: log_entry/get_entry/update_entry/delete_entry, get_day, weekly_stats, wait_for_day_change. \
                 Shopping: add/list/delete_shopping_item, set_shopping_item_checked, clear_checked_shopping_items, add_recipe_to_shopping_list."
                    .into(),
            ),
        }
    }
}
