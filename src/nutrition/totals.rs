//! Absolute nutrient amounts
//!
//! Used for diary entries, recipes, days and weeks alike.

use serde::{Deserialize, Serialize};

/// Absolute nutrient amounts for a consumed quantity or an aggregated period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64, // kcal
    pub protein: f64,  // grams
    pub carbs: f64,    // grams
    pub fat: f64,      // grams
    pub fiber: f64,    // grams
    pub sugar: f64,    // grams
    pub salt: f64,     // grams
}

impl NutrientTotals {
    /// All-zero totals
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            fiber: self.fiber * multiplier,
            sugar: self.sugar * multiplier,
            salt: self.salt * multiplier,
        }
    }

    /// Field-wise addition
    pub fn add(&self, other: &NutrientTotals) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            salt: self.salt + other.salt,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl std::ops::Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, other: NutrientTotals) -> NutrientTotals {
        NutrientTotals::add(&self, &other)
    }
}

impl std::ops::AddAssign for NutrientTotals {
    fn add_assign(&mut self, other: NutrientTotals) {
        *self = NutrientTotals::add(self, &other);
    }
}

impl std::ops::Mul<f64> for NutrientTotals {
    type Output = NutrientTotals;

    fn mul(self, multiplier: f64) -> NutrientTotals {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientTotals::zero(), |acc, n| acc + n)
    }
}

impl<'a> std::iter::Sum<&'a NutrientTotals> for NutrientTotals {
    fn sum<I: Iterator<Item = &'a NutrientTotals>>(iter: I) -> Self {
        iter.fold(NutrientTotals::zero(), |acc, n| acc + *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NutrientTotals {
        NutrientTotals {
            calories: 200.0,
            protein: 10.0,
            carbs: 30.0,
            fat: 4.0,
            fiber: 2.0,
            sugar: 5.0,
            salt: 0.5,
        }
    }

    #[test]
    fn test_scale_and_add() {
        let doubled = sample() * 2.0;
        assert_eq!(doubled.calories, 400.0);
        assert_eq!(doubled.salt, 1.0);

        let summed = sample() + sample();
        assert_eq!(summed, doubled);
    }

    #[test]
    fn test_add_assign() {
        let mut acc = NutrientTotals::zero();
        acc += sample();
        acc += sample();
        assert_eq!(acc.protein, 20.0);
    }

    #[test]
    fn test_sum_by_value_and_reference() {
        let items = vec![sample(), sample(), sample()];
        let by_ref: NutrientTotals = items.iter().sum();
        let by_val: NutrientTotals = items.into_iter().sum();
        assert_eq!(by_ref, by_val);
        assert_eq!(by_val.carbs, 90.0);
    }

    #[test]
    fn test_zero() {
        assert!(NutrientTotals::zero().is_zero());
        assert!(!sample().is_zero());
    }
}
