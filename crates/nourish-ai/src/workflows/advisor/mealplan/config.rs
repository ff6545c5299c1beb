use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::ledger::domain::{BudgetTier, FoodCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub const fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

/// Simplified per-serving nutrition used for target tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub vitamins: f64,
}

impl NutrientProfile {
    pub fn add(&mut self, other: &NutrientProfile) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fiber += other.fiber;
        self.vitamins += other.vitamins;
    }

    pub fn subtract_to_zero(&mut self, other: &NutrientProfile) {
        self.calories = (self.calories - other.calories).max(0.0);
        self.protein = (self.protein - other.protein).max(0.0);
        self.fiber = (self.fiber - other.fiber).max(0.0);
        self.vitamins = (self.vitamins - other.vitamins).max(0.0);
    }

    pub fn scale(&self, factor: f64) -> NutrientProfile {
        NutrientProfile {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fiber: self.fiber * factor,
            vitamins: self.vitamins * factor,
        }
    }
}

const FALLBACK_PROFILE: NutrientProfile = NutrientProfile {
    calories: 100.0,
    protein: 2.0,
    fiber: 1.0,
    vitamins: 2.0,
};

/// Tables behind the greedy planner. Immutable once built; inject alternate
/// tables instead of mutating. The nutrition values are coarse reference
/// numbers, not dietary guidance.
#[derive(Debug, Clone)]
pub struct MealPlanConfig {
    pub nutrition_per_serving: BTreeMap<FoodCategory, NutrientProfile>,
    pub daily_targets: NutrientProfile,
    pub slot_preferences: BTreeMap<MealSlot, Vec<FoodCategory>>,
    pub substitutions: BTreeMap<FoodCategory, Vec<FoodCategory>>,
    pub budget_tiers: BTreeMap<BudgetTier, f64>,
    /// Cost assumed for catalog entries without a sample cost.
    pub default_item_cost: f64,
    /// Fraction of the budget past which substitutes are suggested.
    pub substitution_budget_share: f64,
    /// Minimum savings for a substitute to qualify.
    pub substitution_min_savings: f64,
}

impl MealPlanConfig {
    pub fn serving_profile(&self, category: FoodCategory) -> NutrientProfile {
        self.nutrition_per_serving
            .get(&category)
            .copied()
            .unwrap_or(FALLBACK_PROFILE)
    }

    pub fn budget_for(&self, tier: BudgetTier) -> f64 {
        self.budget_tiers.get(&tier).copied().unwrap_or(75.0)
    }
}

impl Default for MealPlanConfig {
    fn default() -> Self {
        let profile = |calories, protein, fiber, vitamins| NutrientProfile {
            calories,
            protein,
            fiber,
            vitamins,
        };

        let nutrition_per_serving = BTreeMap::from([
            (FoodCategory::Vegetable, profile(25.0, 2.0, 3.0, 8.0)),
            (FoodCategory::Fruit, profile(60.0, 1.0, 2.0, 9.0)),
            (FoodCategory::Dairy, profile(150.0, 8.0, 0.0, 5.0)),
            (FoodCategory::Meat, profile(200.0, 25.0, 0.0, 6.0)),
            (FoodCategory::Grain, profile(100.0, 4.0, 2.0, 3.0)),
        ]);

        let slot_preferences = BTreeMap::from([
            (
                MealSlot::Breakfast,
                vec![FoodCategory::Grain, FoodCategory::Fruit, FoodCategory::Dairy],
            ),
            (
                MealSlot::Lunch,
                vec![
                    FoodCategory::Vegetable,
                    FoodCategory::Meat,
                    FoodCategory::Grain,
                ],
            ),
            (
                MealSlot::Dinner,
                vec![
                    FoodCategory::Meat,
                    FoodCategory::Vegetable,
                    FoodCategory::Grain,
                ],
            ),
        ]);

        let substitutions = BTreeMap::from([
            (
                FoodCategory::Meat,
                vec![FoodCategory::Grain, FoodCategory::Dairy],
            ),
            (
                FoodCategory::Dairy,
                vec![FoodCategory::Grain, FoodCategory::Vegetable],
            ),
            (
                FoodCategory::Fruit,
                vec![FoodCategory::Vegetable, FoodCategory::Grain],
            ),
            (FoodCategory::Vegetable, vec![FoodCategory::Grain]),
        ]);

        let budget_tiers = BTreeMap::from([
            (BudgetTier::Low, 50.0),
            (BudgetTier::Medium, 75.0),
            (BudgetTier::High, 100.0),
        ]);

        Self {
            nutrition_per_serving,
            daily_targets: profile(2000.0, 50.0, 25.0, 70.0),
            slot_preferences,
            substitutions,
            budget_tiers,
            default_item_cost: 3.0,
            substitution_budget_share: 0.8,
            substitution_min_savings: 0.2,
        }
    }
}
