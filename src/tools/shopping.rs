//! Shopping list MCP Tools

use serde::Serialize;

use super::ToolError;
use crate::context::AppContext;
use crate::feed::Change;
use crate::models::{ShoppingItem, ShoppingItemCreate};

/// Response for list_shopping_items
#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<ShoppingItem>,
    pub unchecked: usize,
    pub total: usize,
}

/// Response for add_recipe_to_shopping_list
#[derive(Debug, Serialize)]
pub struct AddRecipeToListResponse {
    pub recipe_id: i64,
    pub servings: f64,
    pub items: Vec<ShoppingItem>,
}

pub fn add_shopping_item(ctx: &AppContext, data: ShoppingItemCreate) -> Result<ShoppingItem, ToolError> {
    let item = ctx
        .database
        .with_conn(|conn| ShoppingItem::create(conn, &data))
        .map_err(ToolError::db("Failed to add shopping item"))?;
    ctx.publish(Change::Shopping);
    Ok(item)
}

pub fn list_shopping_items(ctx: &AppContext, include_checked: bool) -> Result<ShoppingListResponse, ToolError> {
    let items = ctx
        .database
        .with_conn(|conn| ShoppingItem::list(conn, include_checked))
        .map_err(ToolError::db("Failed to list shopping items"))?;

    Ok(ShoppingListResponse {
        unchecked: items.iter().filter(|i| !i.is_checked).count(),
        total: items.len(),
        items,
    })
}

pub fn set_shopping_item_checked(
    ctx: &AppContext,
    id: i64,
    checked: bool,
) -> Result<Option<ShoppingItem>, ToolError> {
    let item = ctx
        .database
        .with_conn(|conn| ShoppingItem::set_checked(conn, id, checked))
        .map_err(ToolError::db("Failed to update shopping item"))?;
    if item.is_some() {
        ctx.publish(Change::Shopping);
    }
    Ok(item)
}

pub fn delete_shopping_item(ctx: &AppContext, id: i64) -> Result<bool, ToolError> {
    let deleted = ctx
        .database
        .with_conn(|conn| ShoppingItem::delete(conn, id))
        .map_err(ToolError::db("Failed to delete shopping item"))?;
    if deleted {
        ctx.publish(Change::Shopping);
    }
    Ok(deleted)
}

/// Remove all checked items; returns the number removed
pub fn clear_checked_shopping_items(ctx: &AppContext) -> Result<usize, ToolError> {
    let removed = ctx
        .database
        .with_conn(ShoppingItem::clear_checked)
        .map_err(ToolError::db("Failed to clear shopping list"))?;
    if removed > 0 {
        ctx.publish(Change::Shopping);
    }
    Ok(removed)
}

/// Add a recipe's ingredients, scaled to `servings`
pub fn add_recipe_to_shopping_list(
    ctx: &AppContext,
    recipe_id: i64,
    servings: f64,
) -> Result<AddRecipeToListResponse, ToolError> {
    let items = ctx
        .database
        .with_transaction(|tx| ShoppingItem::add_from_recipe(tx, recipe_id, servings))
        .map_err(ToolError::db("Failed to add recipe to shopping list"))?;
    ctx.publish(Change::Shopping);

    Ok(AddRecipeToListResponse {
        recipe_id,
        servings,
        items,
    })
}
