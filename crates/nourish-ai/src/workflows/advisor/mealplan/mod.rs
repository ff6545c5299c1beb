//! Greedy weekly meal and budget planner. Allocates expiring inventory
//! first, then fresh inventory, then catalog items by value density. This is
//! a priority-ordered heuristic, not a constraint solver: it produces an
//! adequate plan, not an optimal one.

mod config;

pub use config::{MealPlanConfig, MealSlot, NutrientProfile};

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::workflows::advisor::patterns::WEEKDAY_LABELS;
use crate::workflows::ledger::domain::{
    FoodCatalogEntry, FoodCategory, InventoryId, InventoryRecord, ItemStatus, QuantityUnit,
};

const PLAN_DAYS: usize = 7;
const SUBSTITUTES_PER_ITEM: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AssignmentSource {
    Inventory { expiring: bool },
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAssignment {
    pub item_name: String,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub category: FoodCategory,
    pub source: AssignmentSource,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealSet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakfast: Vec<MealAssignment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lunch: Vec<MealAssignment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dinner: Vec<MealAssignment>,
}

impl MealSet {
    fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<MealAssignment> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &MealAssignment> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: &'static str,
    pub meals: MealSet,
    pub nutrition: NutrientProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstitutionSuggestion {
    pub category: FoodCategory,
    pub item_name: String,
    pub estimated_cost: f64,
    pub savings_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub category: FoodCategory,
    pub estimated_cost: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substitutes: Vec<SubstitutionSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlan {
    pub days: Vec<DayPlan>,
    pub shopping_list: Vec<ShoppingItem>,
    pub total_cost: f64,
    pub nutrition_summary: NutrientProfile,
    pub budget_limit: f64,
    /// Expiring inventory items the plan rescues.
    pub waste_reduction_count: u32,
    pub summary: String,
}

pub struct MealPlanner {
    config: MealPlanConfig,
}

impl MealPlanner {
    pub fn new(config: MealPlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MealPlanConfig {
        &self.config
    }

    /// Build a 7-day plan. Catalog spend never exceeds `budget_limit`: the
    /// budget check runs before every assignment, not after the fact.
    pub fn plan(
        &self,
        inventory: &[InventoryRecord],
        catalog: &[FoodCatalogEntry],
        budget_limit: f64,
        household_size: u32,
    ) -> MealPlan {
        let weekly_targets = self
            .config
            .daily_targets
            .scale(PLAN_DAYS as f64 * household_size.max(1) as f64);
        let mut remaining_targets = weekly_targets;
        let mut remaining_budget = budget_limit;

        let mut used: HashSet<InventoryId> = HashSet::new();
        let mut days = Vec::with_capacity(PLAN_DAYS);
        let mut nutrition_summary = NutrientProfile::default();
        let mut waste_reduction_count = 0u32;
        let mut catalog_picks: BTreeMap<String, (FoodCatalogEntry, f64)> = BTreeMap::new();

        for day_label in WEEKDAY_LABELS {
            let mut meals = MealSet::default();
            let mut day_nutrition = NutrientProfile::default();

            for slot in MealSlot::ALL {
                let Some(preferences) = self.config.slot_preferences.get(&slot) else {
                    continue;
                };

                let assignment = self
                    .pick_inventory(inventory, &used, preferences, ItemStatus::ExpiringSoon)
                    .or_else(|| {
                        self.pick_inventory(inventory, &used, preferences, ItemStatus::Fresh)
                    });

                let assignment = match assignment {
                    Some(item) => {
                        used.insert(item.id.clone());
                        let expiring = item.status == ItemStatus::ExpiringSoon;
                        if expiring {
                            waste_reduction_count += 1;
                        }
                        Some(MealAssignment {
                            item_name: item.item_name.clone(),
                            quantity: item.quantity,
                            unit: item.unit,
                            category: item.category,
                            source: AssignmentSource::Inventory { expiring },
                            cost: 0.0,
                        })
                    }
                    None => self
                        .pick_catalog(catalog, preferences, &remaining_targets, remaining_budget)
                        .map(|entry| {
                            let cost = entry
                                .sample_cost_per_unit
                                .unwrap_or(self.config.default_item_cost);
                            remaining_budget -= cost;
                            catalog_picks
                                .entry(entry.name.clone())
                                .and_modify(|(_, quantity)| *quantity += 1.0)
                                .or_insert((entry.clone(), 1.0));
                            MealAssignment {
                                item_name: entry.name.clone(),
                                quantity: 1.0,
                                unit: QuantityUnit::Serving,
                                category: entry.category,
                                source: AssignmentSource::Catalog,
                                cost,
                            }
                        }),
                };

                if let Some(assignment) = assignment {
                    let profile = self.config.serving_profile(assignment.category);
                    remaining_targets.subtract_to_zero(&profile);
                    day_nutrition.add(&profile);
                    nutrition_summary.add(&profile);
                    meals.slot_mut(slot).push(assignment);
                }
            }

            days.push(DayPlan {
                day: day_label,
                meals,
                nutrition: day_nutrition,
            });
        }

        let shopping_list = self.shopping_list(catalog_picks, catalog, budget_limit);
        let total_cost = round2(
            shopping_list
                .iter()
                .map(|item| item.estimated_cost)
                .sum::<f64>(),
        );

        let summary = format!(
            "7-day plan rescuing {} expiring item(s); ${:.2} of the ${:.2} budget goes to shopping.",
            waste_reduction_count, total_cost, budget_limit
        );

        MealPlan {
            days,
            shopping_list,
            total_cost,
            nutrition_summary,
            budget_limit,
            waste_reduction_count,
            summary,
        }
    }

    fn pick_inventory<'a>(
        &self,
        inventory: &'a [InventoryRecord],
        used: &HashSet<InventoryId>,
        preferences: &[FoodCategory],
        status: ItemStatus,
    ) -> Option<&'a InventoryRecord> {
        for category in preferences {
            let found = inventory.iter().find(|item| {
                item.status == status && item.category == *category && !used.contains(&item.id)
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Best value-density catalog entry in the preferred categories that
    /// fits the remaining budget. Value density is the sum of unmet-target
    /// fractional contributions (capped at 1.0 per nutrient) per dollar.
    fn pick_catalog<'a>(
        &self,
        catalog: &'a [FoodCatalogEntry],
        preferences: &[FoodCategory],
        remaining_targets: &NutrientProfile,
        remaining_budget: f64,
    ) -> Option<&'a FoodCatalogEntry> {
        let mut best: Option<(&FoodCatalogEntry, f64)> = None;

        for entry in catalog {
            if !preferences.contains(&entry.category) {
                continue;
            }
            let cost = entry
                .sample_cost_per_unit
                .unwrap_or(self.config.default_item_cost);
            if cost <= 0.0 || cost > remaining_budget {
                continue;
            }

            let profile = self.config.serving_profile(entry.category);
            let score = nutrition_score(&profile, remaining_targets);
            let density = score / cost;

            match best {
                Some((_, best_density)) if density <= best_density => {}
                _ => best = Some((entry, density)),
            }
        }

        best.map(|(entry, _)| entry)
    }

    fn shopping_list(
        &self,
        picks: BTreeMap<String, (FoodCatalogEntry, f64)>,
        catalog: &[FoodCatalogEntry],
        budget_limit: f64,
    ) -> Vec<ShoppingItem> {
        let mut items: Vec<ShoppingItem> = picks
            .into_values()
            .map(|(entry, quantity)| {
                let unit_cost = entry
                    .sample_cost_per_unit
                    .unwrap_or(self.config.default_item_cost);
                ShoppingItem {
                    name: entry.name,
                    quantity,
                    unit: QuantityUnit::Serving,
                    category: entry.category,
                    estimated_cost: round2(unit_cost * quantity),
                    substitutes: Vec::new(),
                }
            })
            .collect();

        let cumulative: f64 = items.iter().map(|item| item.estimated_cost).sum();
        if cumulative <= budget_limit * self.config.substitution_budget_share {
            return items;
        }

        for item in &mut items {
            let unit_cost = if item.quantity > 0.0 {
                item.estimated_cost / item.quantity
            } else {
                continue;
            };
            let Some(substitute_categories) = self.config.substitutions.get(&item.category) else {
                continue;
            };

            for category in substitute_categories {
                if item.substitutes.len() >= SUBSTITUTES_PER_ITEM {
                    break;
                }

                let cheapest = catalog
                    .iter()
                    .filter(|entry| entry.category == *category)
                    .map(|entry| {
                        (
                            entry,
                            entry
                                .sample_cost_per_unit
                                .unwrap_or(self.config.default_item_cost),
                        )
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1));

                if let Some((entry, cost)) = cheapest {
                    let savings = (unit_cost - cost) / unit_cost;
                    if savings >= self.config.substitution_min_savings {
                        item.substitutes.push(SubstitutionSuggestion {
                            category: *category,
                            item_name: entry.name.clone(),
                            estimated_cost: round2(cost),
                            savings_pct: round2(savings * 100.0),
                        });
                    }
                }
            }
        }

        items
    }
}

fn nutrition_score(profile: &NutrientProfile, remaining: &NutrientProfile) -> f64 {
    let contribution = |provided: f64, needed: f64| {
        if needed > 0.0 {
            (provided / needed).min(1.0)
        } else {
            0.0
        }
    };

    contribution(profile.calories, remaining.calories)
        + contribution(profile.protein, remaining.protein)
        + contribution(profile.fiber, remaining.fiber)
        + contribution(profile.vitamins, remaining.vitamins)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
