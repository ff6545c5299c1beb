use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workflows::ledger::domain::FoodCategory;

/// Northern-hemisphere season derived from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Decay behavior of one food category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRiskProfile {
    pub base_days: u32,
    pub risk_multiplier: f64,
    pub seasonal_sensitive: bool,
}

const FALLBACK_PROFILE: CategoryRiskProfile = CategoryRiskProfile {
    base_days: 14,
    risk_multiplier: 1.0,
    seasonal_sensitive: false,
};

/// Score bands mapping a risk score to a priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
}

/// Rubric configuration for expiration risk scoring. Immutable once built;
/// inject alternate tables instead of mutating.
#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub categories: BTreeMap<FoodCategory, CategoryRiskProfile>,
    pub seasonal_factors: BTreeMap<Season, BTreeMap<FoodCategory, f64>>,
    pub thresholds: PriorityThresholds,
}

impl RiskConfig {
    pub fn category_profile(&self, category: FoodCategory) -> CategoryRiskProfile {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or(FALLBACK_PROFILE)
    }

    pub fn seasonal_factor(&self, season: Season, category: FoodCategory) -> f64 {
        self.seasonal_factors
            .get(&season)
            .and_then(|factors| factors.get(&category))
            .copied()
            .unwrap_or(1.0)
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        let profile = |base_days, risk_multiplier, seasonal_sensitive| CategoryRiskProfile {
            base_days,
            risk_multiplier,
            seasonal_sensitive,
        };

        let categories = BTreeMap::from([
            (FoodCategory::Fruit, profile(7, 1.5, true)),
            (FoodCategory::Vegetable, profile(10, 1.3, true)),
            (FoodCategory::Dairy, profile(5, 1.4, true)),
            (FoodCategory::Meat, profile(3, 1.6, true)),
            (FoodCategory::Grain, profile(30, 0.8, false)),
            (FoodCategory::Beverage, profile(14, 1.0, false)),
            (FoodCategory::Snack, profile(60, 0.7, false)),
            (FoodCategory::Frozen, profile(90, 0.5, false)),
            (FoodCategory::Canned, profile(365, 0.3, false)),
            (FoodCategory::Other, profile(14, 1.0, false)),
        ]);

        let season = |fruit, vegetable, dairy, meat| {
            BTreeMap::from([
                (FoodCategory::Fruit, fruit),
                (FoodCategory::Vegetable, vegetable),
                (FoodCategory::Dairy, dairy),
                (FoodCategory::Meat, meat),
            ])
        };

        // Warm seasons speed spoilage up, winter slows it down.
        let seasonal_factors = BTreeMap::from([
            (Season::Spring, season(1.2, 1.1, 1.0, 1.0)),
            (Season::Summer, season(1.5, 1.3, 1.2, 1.1)),
            (Season::Autumn, season(1.1, 1.0, 1.0, 1.0)),
            (Season::Winter, season(0.9, 0.8, 0.9, 1.0)),
        ]);

        Self {
            categories,
            seasonal_factors,
            thresholds: PriorityThresholds {
                critical: 80.0,
                high: 60.0,
                medium: 40.0,
            },
        }
    }
}
