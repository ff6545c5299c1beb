use std::collections::BTreeMap;

use crate::workflows::ledger::domain::FoodCategory;

/// Baseline household waste used for comparisons. Illustrative defaults, not
/// survey data; swap the table when a real community series exists.
#[derive(Debug, Clone)]
pub struct CommunityBaseline {
    pub weekly_grams: f64,
    pub weekly_cost: f64,
    pub monthly_grams: f64,
    pub monthly_cost: f64,
    pub yearly_grams: f64,
    pub yearly_cost: f64,
    pub weekly_grams_by_category: BTreeMap<FoodCategory, f64>,
}

/// Rate and cost tables behind the waste estimator. Immutable once built.
#[derive(Debug, Clone)]
pub struct WasteConfig {
    /// Assumed fraction of a category's purchased quantity that becomes
    /// waste when no expiry ground truth exists yet.
    pub waste_rates: BTreeMap<FoodCategory, f64>,
    pub default_waste_rate: f64,
    /// Flat average cost per native unit, by category.
    pub avg_cost_per_unit: BTreeMap<FoodCategory, f64>,
    pub default_cost_per_unit: f64,
    pub community: CommunityBaseline,
}

impl WasteConfig {
    pub fn waste_rate(&self, category: FoodCategory) -> f64 {
        self.waste_rates
            .get(&category)
            .copied()
            .unwrap_or(self.default_waste_rate)
    }

    pub fn cost_per_unit(&self, category: FoodCategory) -> f64 {
        self.avg_cost_per_unit
            .get(&category)
            .copied()
            .unwrap_or(self.default_cost_per_unit)
    }
}

impl Default for WasteConfig {
    fn default() -> Self {
        let waste_rates = BTreeMap::from([
            (FoodCategory::Vegetable, 0.25),
            (FoodCategory::Fruit, 0.20),
            (FoodCategory::Dairy, 0.15),
            (FoodCategory::Meat, 0.10),
            (FoodCategory::Grain, 0.05),
            (FoodCategory::Beverage, 0.08),
            (FoodCategory::Snack, 0.12),
            (FoodCategory::Other, 0.15),
        ]);

        let avg_cost_per_unit = BTreeMap::from([
            (FoodCategory::Vegetable, 2.50),
            (FoodCategory::Fruit, 3.00),
            (FoodCategory::Dairy, 4.00),
            (FoodCategory::Meat, 8.00),
            (FoodCategory::Grain, 2.00),
            (FoodCategory::Beverage, 2.50),
            (FoodCategory::Snack, 3.50),
            (FoodCategory::Other, 3.00),
        ]);

        let weekly_grams_by_category = BTreeMap::from([
            (FoodCategory::Vegetable, 125.0),
            (FoodCategory::Fruit, 100.0),
            (FoodCategory::Dairy, 75.0),
            (FoodCategory::Meat, 50.0),
            (FoodCategory::Grain, 25.0),
            (FoodCategory::Beverage, 40.0),
            (FoodCategory::Snack, 60.0),
            (FoodCategory::Other, 25.0),
        ]);

        Self {
            waste_rates,
            default_waste_rate: 0.15,
            avg_cost_per_unit,
            default_cost_per_unit: 3.00,
            community: CommunityBaseline {
                weekly_grams: 500.0,
                weekly_cost: 15.0,
                monthly_grams: 2000.0,
                monthly_cost: 60.0,
                yearly_grams: 24_000.0,
                yearly_cost: 720.0,
                weekly_grams_by_category,
            },
        }
    }
}
