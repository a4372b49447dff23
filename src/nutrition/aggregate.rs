//! Nutrition aggregation
//!
//! Turns per-unit nutrient profiles plus consumed amounts into absolute
//! totals, and rolls collections of totals up into sums and averages.
//!
//! Everything here is a pure function over caller-supplied values. Nothing
//! is validated: a zero or negative quantity is computed through, so callers
//! reject bad input before getting here.

use serde::{Deserialize, Serialize};

use super::totals::NutrientTotals;
use super::units::UnitKind;

/// Nutrient values per reference amount of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub salt: f64,
    pub unit: UnitKind,
}

impl NutrientProfile {
    /// Profile with only calories set, handy for quick lookups and tests
    pub fn calories_only(calories: f64, unit: UnitKind) -> Self {
        Self {
            calories,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
            sugar: 0.0,
            salt: 0.0,
            unit,
        }
    }

    /// The profile values scaled by a raw factor
    fn scaled(&self, factor: f64) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
            sugar: self.sugar * factor,
            salt: self.salt * factor,
        }
    }
}

/// Ingredients of a recipe with the quantities it declares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeComposition {
    /// (profile, quantity in the profile's unit)
    pub items: Vec<(NutrientProfile, f64)>,
    /// How many servings the recipe makes, at least 1
    pub declared_servings: u32,
}

impl RecipeComposition {
    pub fn new(declared_servings: u32) -> Self {
        Self {
            items: Vec::new(),
            declared_servings,
        }
    }

    pub fn with_item(mut self, profile: NutrientProfile, quantity: f64) -> Self {
        self.items.push((profile, quantity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// How recipe ingredient quantities are turned into scale factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeScaling {
    /// Every ingredient quantity is divided by 100, whatever its unit kind.
    /// Matches the numbers already stored by existing diaries.
    #[default]
    Uniform100,
    /// Each ingredient is scaled through `scale_to_quantity`, so piece-based
    /// ingredients count per piece.
    ByUnitKind,
}

impl RecipeScaling {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "uniform100" | "uniform_100" => Some(RecipeScaling::Uniform100),
            "unit_aware" | "by_unit_kind" | "unit-aware" => Some(RecipeScaling::ByUnitKind),
            _ => None,
        }
    }
}

/// A single thing that was eaten, as the diary describes it
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumptionRecord {
    /// An ingredient eaten directly, quantity in the profile's unit
    Ingredient {
        profile: NutrientProfile,
        quantity: f64,
    },
    /// Some servings of a recipe
    Recipe {
        composition: RecipeComposition,
        servings: f64,
    },
}

impl ConsumptionRecord {
    /// Absolute totals for this record
    pub fn totals(&self, scaling: RecipeScaling) -> NutrientTotals {
        match self {
            ConsumptionRecord::Ingredient { profile, quantity } => {
                scale_to_quantity(profile, *quantity)
            }
            ConsumptionRecord::Recipe {
                composition,
                servings,
            } => scale_recipe_with(composition, *servings, scaling),
        }
    }
}

/// Scale factor for a quantity expressed in the profile's unit
///
/// Per-100 kinds divide by 100; piece profiles are already per piece.
pub fn quantity_factor(unit: UnitKind, quantity: f64) -> f64 {
    match unit {
        UnitKind::Mass100g | UnitKind::Volume100ml => quantity / 100.0,
        UnitKind::Piece => quantity,
    }
}

/// Absolute totals for `quantity` of an ingredient
///
/// 250 g at 80 kcal/100g is 200 kcal; 3 pieces at 80 kcal/piece is 240 kcal.
pub fn scale_to_quantity(profile: &NutrientProfile, quantity: f64) -> NutrientTotals {
    profile.scaled(quantity_factor(profile.unit, quantity))
}

/// Totals for `consumed_servings` of a recipe
///
/// Ingredient quantities are all read as per-100 amounts, then the whole
/// recipe is scaled by `consumed_servings / declared_servings`.
pub fn scale_recipe_to_consumption(
    composition: &RecipeComposition,
    consumed_servings: f64,
) -> NutrientTotals {
    scale_recipe_with(composition, consumed_servings, RecipeScaling::Uniform100)
}

/// `scale_recipe_to_consumption` with an explicit scaling convention
pub fn scale_recipe_with(
    composition: &RecipeComposition,
    consumed_servings: f64,
    scaling: RecipeScaling,
) -> NutrientTotals {
    let whole_recipe: NutrientTotals = composition
        .items
        .iter()
        .map(|(profile, quantity)| match scaling {
            RecipeScaling::Uniform100 => profile.scaled(quantity / 100.0),
            RecipeScaling::ByUnitKind => scale_to_quantity(profile, *quantity),
        })
        .sum();

    whole_recipe.scale(consumed_servings / f64::from(composition.declared_servings))
}

/// Field-wise sum; empty input gives zero totals
pub fn sum(totals: &[NutrientTotals]) -> NutrientTotals {
    totals.iter().sum()
}

/// Field-wise mean; empty input gives zero totals rather than NaN
pub fn average(totals: &[NutrientTotals]) -> NutrientTotals {
    if totals.is_empty() {
        return NutrientTotals::zero();
    }
    sum(totals).scale(1.0 / totals.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn apple() -> NutrientProfile {
        NutrientProfile {
            calories: 52.0,
            protein: 0.3,
            carbs: 14.0,
            fat: 0.2,
            fiber: 2.4,
            sugar: 10.4,
            salt: 0.0,
            unit: UnitKind::Mass100g,
        }
    }

    #[test]
    fn test_apple_by_mass() {
        let totals = scale_to_quantity(&apple(), 150.0);
        assert!(close(totals.calories, 78.0));
        assert!(close(totals.protein, 0.45));
        assert!(close(totals.fiber, 3.6));
    }

    #[test]
    fn test_egg_by_piece() {
        let egg = NutrientProfile::calories_only(70.0, UnitKind::Piece);
        let totals = scale_to_quantity(&egg, 2.0);
        assert!(close(totals.calories, 140.0));
    }

    #[test]
    fn test_unit_kind_distinction() {
        let by_mass = NutrientProfile::calories_only(80.0, UnitKind::Mass100g);
        let by_piece = NutrientProfile::calories_only(80.0, UnitKind::Piece);
        assert!(close(scale_to_quantity(&by_mass, 250.0).calories, 200.0));
        assert!(close(scale_to_quantity(&by_piece, 3.0).calories, 240.0));
    }

    #[test]
    fn test_volume_divides_by_hundred() {
        let milk = NutrientProfile::calories_only(64.0, UnitKind::Volume100ml);
        assert!(close(scale_to_quantity(&milk, 250.0).calories, 160.0));
    }

    #[test]
    fn test_mass_formula_over_a_range() {
        let profile = NutrientProfile::calories_only(123.4, UnitKind::Mass100g);
        for q in [0.0, 0.5, 1.0, 37.0, 100.0, 999.9] {
            let expected = profile.calories * q / 100.0;
            assert!(close(scale_to_quantity(&profile, q).calories, expected));
        }
    }

    #[test]
    fn test_piece_formula_over_a_range() {
        let profile = NutrientProfile::calories_only(88.0, UnitKind::Piece);
        for q in [0.0, 0.5, 1.0, 3.0, 12.0] {
            assert!(close(scale_to_quantity(&profile, q).calories, 88.0 * q));
        }
    }

    #[test]
    fn test_zero_and_negative_quantities_compute_through() {
        let profile = apple();
        assert!(scale_to_quantity(&profile, 0.0).is_zero());
        assert!(close(scale_to_quantity(&profile, -100.0).calories, -52.0));
    }

    #[test]
    fn test_recipe_scaled_to_one_serving() {
        let composition = RecipeComposition::new(4)
            .with_item(NutrientProfile::calories_only(100.0, UnitKind::Mass100g), 200.0)
            .with_item(NutrientProfile::calories_only(50.0, UnitKind::Mass100g), 100.0);

        let whole = scale_recipe_to_consumption(&composition, 4.0);
        assert!(close(whole.calories, 250.0));

        let one = scale_recipe_to_consumption(&composition, 1.0);
        assert!(close(one.calories, 62.5));
    }

    #[test]
    fn test_recipe_fractional_servings() {
        let composition = RecipeComposition::new(2)
            .with_item(NutrientProfile::calories_only(200.0, UnitKind::Mass100g), 100.0);
        let half = scale_recipe_to_consumption(&composition, 0.5);
        assert!(close(half.calories, 50.0));
    }

    #[test]
    fn test_empty_recipe_is_zero() {
        let composition = RecipeComposition::new(3);
        assert!(composition.is_empty());
        assert!(scale_recipe_to_consumption(&composition, 2.0).is_zero());
    }

    #[test]
    fn test_recipe_uniform_path_divides_pieces_by_hundred() {
        // 2 eggs at 70 kcal/piece inside a one-serving recipe
        let composition = RecipeComposition::new(1)
            .with_item(NutrientProfile::calories_only(70.0, UnitKind::Piece), 2.0);

        let uniform = scale_recipe_to_consumption(&composition, 1.0);
        assert!(close(uniform.calories, 1.4));

        let unit_aware = scale_recipe_with(&composition, 1.0, RecipeScaling::ByUnitKind);
        assert!(close(unit_aware.calories, 140.0));
    }

    #[test]
    fn test_scaling_modes_agree_for_mass_and_volume() {
        let composition = RecipeComposition::new(2)
            .with_item(apple(), 300.0)
            .with_item(NutrientProfile::calories_only(64.0, UnitKind::Volume100ml), 200.0);
        let a = scale_recipe_with(&composition, 1.0, RecipeScaling::Uniform100);
        let b = scale_recipe_with(&composition, 1.0, RecipeScaling::ByUnitKind);
        assert!(close(a.calories, b.calories));
    }

    #[test]
    fn test_sum_and_average_of_empty_are_zero() {
        assert!(sum(&[]).is_zero());
        assert!(average(&[]).is_zero());
    }

    #[test]
    fn test_average_of_single_is_identity() {
        let t = scale_to_quantity(&apple(), 123.0);
        assert_eq!(average(&[t]), t);
    }

    #[test]
    fn test_average_of_several() {
        let a = NutrientTotals { calories: 100.0, protein: 10.0, ..Default::default() };
        let b = NutrientTotals { calories: 300.0, protein: 20.0, ..Default::default() };
        let avg = average(&[a, b]);
        assert!(close(avg.calories, 200.0));
        assert!(close(avg.protein, 15.0));
    }

    #[test]
    fn test_sum_is_order_independent() {
        let items: Vec<NutrientTotals> = [10.0, 250.0, 33.0, 78.5]
            .iter()
            .map(|q| scale_to_quantity(&apple(), *q))
            .collect();
        let mut reversed = items.clone();
        reversed.reverse();
        let mut rotated = items.clone();
        rotated.rotate_left(2);

        let forward = sum(&items);
        for other in [sum(&reversed), sum(&rotated)] {
            assert!(close(forward.calories, other.calories));
            assert!(close(forward.sugar, other.sugar));
        }
    }

    #[test]
    fn test_sum_is_grouping_independent() {
        let meals: Vec<NutrientTotals> = [150.0, 40.0, 220.0, 12.5, 90.0]
            .iter()
            .map(|q| scale_to_quantity(&apple(), *q))
            .collect();
        let (breakfast, rest) = meals.split_at(2);

        let grouped = sum(&[sum(breakfast), sum(rest)]);
        let flat = sum(&[breakfast, rest].concat());
        assert!(close(grouped.calories, flat.calories));
        assert!(close(grouped.protein, flat.protein));
        assert!(close(grouped.salt, flat.salt));

        let nested = sum(&[sum(&meals[..1]), sum(&[sum(&meals[1..3]), sum(&meals[3..])])]);
        assert!(close(nested.calories, flat.calories));
    }

    #[test]
    fn test_consumption_record_dispatch() {
        let direct = ConsumptionRecord::Ingredient { profile: apple(), quantity: 150.0 };
        assert!(close(direct.totals(RecipeScaling::Uniform100).calories, 78.0));

        let recipe = ConsumptionRecord::Recipe {
            composition: RecipeComposition::new(4)
                .with_item(NutrientProfile::calories_only(100.0, UnitKind::Mass100g), 200.0)
                .with_item(NutrientProfile::calories_only(50.0, UnitKind::Mass100g), 100.0),
            servings: 1.0,
        };
        assert!(close(recipe.totals(RecipeScaling::Uniform100).calories, 62.5));
    }

    #[test]
    fn test_recipe_scaling_parse() {
        assert_eq!(RecipeScaling::parse("uniform"), Some(RecipeScaling::Uniform100));
        assert_eq!(RecipeScaling::parse("UNIT_AWARE"), Some(RecipeScaling::ByUnitKind));
        assert_eq!(RecipeScaling::parse("whatever"), None);
    }
}
