//! Label enumeration
//!
//! Closed set of tags attachable to ingredients and recipes. Declaration
//! order is the display order; `Ord` follows it.

use serde::{Deserialize, Serialize};

/// Family a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFamily {
    NutrientDerived,
    DietForm,
    FoodGroup,
    MealSlot,
    PrepStyle,
}

/// Descriptive tag for an ingredient or recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    // Nutrient-derived
    HighProtein,
    LowCarb,
    LowFat,
    HighFiber,
    LowSugar,
    LowSalt,
    // Diet forms
    Vegan,
    Vegetarian,
    GlutenFree,
    LactoseFree,
    Keto,
    Paleo,
    // Food groups
    Meat,
    Fish,
    Dairy,
    Cheese,
    Eggs,
    Vegetables,
    Fruits,
    Grains,
    Legumes,
    Nuts,
    // Meal slots
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    // Preparation styles
    Quick,
    NoCook,
    Baked,
    Fried,
    OnePot,
}

impl Label {
    /// Every label in declaration order
    pub const ALL: [Label; 32] = [
        Label::HighProtein,
        Label::LowCarb,
        Label::LowFat,
        Label::HighFiber,
        Label::LowSugar,
        Label::LowSalt,
        Label::Vegan,
        Label::Vegetarian,
        Label::GlutenFree,
        Label::LactoseFree,
        Label::Keto,
        Label::Paleo,
        Label::Meat,
        Label::Fish,
        Label::Dairy,
        Label::Cheese,
        Label::Eggs,
        Label::Vegetables,
        Label::Fruits,
        Label::Grains,
        Label::Legumes,
        Label::Nuts,
        Label::Breakfast,
        Label::Lunch,
        Label::Dinner,
        Label::Snack,
        Label::Dessert,
        Label::Quick,
        Label::NoCook,
        Label::Baked,
        Label::Fried,
        Label::OnePot,
    ];

    pub fn family(&self) -> LabelFamily {
        match self {
            Label::HighProtein
            | Label::LowCarb
            | Label::LowFat
            | Label::HighFiber
            | Label::LowSugar
            | Label::LowSalt => LabelFamily::NutrientDerived,
            Label::Vegan
            | Label::Vegetarian
            | Label::GlutenFree
            | Label::LactoseFree
            | Label::Keto
            | Label::Paleo => LabelFamily::DietForm,
            Label::Meat
            | Label::Fish
            | Label::Dairy
            | Label::Cheese
            | Label::Eggs
            | Label::Vegetables
            | Label::Fruits
            | Label::Grains
            | Label::Legumes
            | Label::Nuts => LabelFamily::FoodGroup,
            Label::Breakfast | Label::Lunch | Label::Dinner | Label::Snack | Label::Dessert => {
                LabelFamily::MealSlot
            }
            Label::Quick | Label::NoCook | Label::Baked | Label::Fried | Label::OnePot => {
                LabelFamily::PrepStyle
            }
        }
    }

    pub fn is_food_group(&self) -> bool {
        self.family() == LabelFamily::FoodGroup
    }

    pub fn is_diet_form(&self) -> bool {
        self.family() == LabelFamily::DietForm
    }

    /// Database and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::HighProtein => "HIGH_PROTEIN",
            Label::LowCarb => "LOW_CARB",
            Label::LowFat => "LOW_FAT",
            Label::HighFiber => "HIGH_FIBER",
            Label::LowSugar => "LOW_SUGAR",
            Label::LowSalt => "LOW_SALT",
            Label::Vegan => "VEGAN",
            Label::Vegetarian => "VEGETARIAN",
            Label::GlutenFree => "GLUTEN_FREE",
            Label::LactoseFree => "LACTOSE_FREE",
            Label::Keto => "KETO",
            Label::Paleo => "PALEO",
            Label::Meat => "MEAT",
            Label::Fish => "FISH",
            Label::Dairy => "DAIRY",
            Label::Cheese => "CHEESE",
            Label::Eggs => "EGGS",
            Label::Vegetables => "VEGETABLES",
            Label::Fruits => "FRUITS",
            Label::Grains => "GRAINS",
            Label::Legumes => "LEGUMES",
            Label::Nuts => "NUTS",
            Label::Breakfast => "BREAKFAST",
            Label::Lunch => "LUNCH",
            Label::Dinner => "DINNER",
            Label::Snack => "SNACK",
            Label::Dessert => "DESSERT",
            Label::Quick => "QUICK",
            Label::NoCook => "NO_COOK",
            Label::Baked => "BAKED",
            Label::Fried => "FRIED",
            Label::OnePot => "ONE_POT",
        }
    }

    /// Parse from the database string; accepts lower case and dashes
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Label::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == normalized)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
