//! Nutrition calculation module
//!
//! Nutrient profiles, absolute totals, and the aggregation functions that
//! connect them.

pub mod aggregate;
pub mod totals;
pub mod units;

pub use aggregate::{
    average, quantity_factor, scale_recipe_to_consumption, scale_recipe_with, scale_to_quantity,
    sum, ConsumptionRecord, NutrientProfile, RecipeComposition, RecipeScaling,
};
pub use totals::NutrientTotals;
pub use units::UnitKind;
