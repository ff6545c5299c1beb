mod config;

pub use config::{CommunityBaseline, WasteConfig};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patterns::ConsumptionPatterns;
use crate::workflows::ledger::domain::{FoodCategory, InventoryRecord, ItemStatus};
use crate::workflows::ledger::units::to_grams;

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;
const MONTH_WEEKS: f64 = 4.0;
const YEAR_MONTHS: f64 = 12.0;
const TREND_FLOOR: f64 = 0.9;
const TREND_CEIL: f64 = 1.1;
const INFREQUENT_RATE_INFLATION: f64 = 1.2;
const NEAR_EXPIRY_RATE_INFLATION: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WastePeriod {
    Week,
    Month,
    Year,
}

impl WastePeriod {
    pub const fn label(self) -> &'static str {
        match self {
            WastePeriod::Week => "week",
            WastePeriod::Month => "month",
            WastePeriod::Year => "year",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Some(WastePeriod::Week),
            "month" | "monthly" => Some(WastePeriod::Month),
            "year" | "yearly" => Some(WastePeriod::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWaste {
    pub category: FoodCategory,
    pub grams: f64,
    pub cost: f64,
}

/// Waste snapshot for one period. `total = expired + pattern` holds exactly
/// for every period; for month/year the components are the weekly figures
/// scaled by the projection factor, while `actual_expired_*` carries the
/// expired waste recomputed from raw records inside the longer window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEstimate {
    pub period: WastePeriod,
    pub window_start: NaiveDate,
    pub expired_waste_grams: f64,
    pub expired_waste_cost: f64,
    pub pattern_waste_grams: f64,
    pub pattern_waste_cost: f64,
    pub total_waste_grams: f64,
    pub total_waste_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_expired_grams: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_expired_cost: Option<f64>,
    pub by_category: Vec<CategoryWaste>,
    pub trend_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Better,
    Worse,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryComparison {
    pub category: FoodCategory,
    pub user_grams: f64,
    pub community_grams: f64,
    pub status: ComparisonStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityComparison {
    pub period: WastePeriod,
    pub user_grams: f64,
    pub community_grams: f64,
    pub user_cost: f64,
    pub community_cost: f64,
    pub percentage_difference: f64,
    pub status: ComparisonStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_category: Vec<CategoryComparison>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WasteProjectionPoint {
    pub week: u32,
    pub week_start: NaiveDate,
    pub trend_multiplier: f64,
    pub projected_grams: f64,
    pub projected_cost: f64,
    pub cumulative_grams: f64,
    pub cumulative_cost: f64,
}

/// Estimates wasted food and money from the inventory ledger and the owner's
/// consumption patterns.
pub struct WasteEngine {
    config: WasteConfig,
}

impl WasteEngine {
    pub fn new(config: WasteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WasteConfig {
        &self.config
    }

    /// Estimate waste for a period ending at `today`.
    pub fn estimate(
        &self,
        inventory: &[InventoryRecord],
        patterns: &ConsumptionPatterns,
        period: WastePeriod,
        today: NaiveDate,
    ) -> WasteEstimate {
        let weekly = self.weekly_estimate(inventory, patterns, today);

        match period {
            WastePeriod::Week => weekly,
            WastePeriod::Month => {
                let scale = MONTH_WEEKS * weekly.trend_factor;
                let window_start = today - chrono::Duration::days(MONTH_DAYS);
                let (actual_grams, actual_cost) =
                    self.expired_waste(inventory, window_start);
                self.scaled_estimate(weekly, WastePeriod::Month, window_start, scale)
                    .with_actual(actual_grams, actual_cost)
            }
            WastePeriod::Year => {
                let scale = MONTH_WEEKS * weekly.trend_factor * YEAR_MONTHS;
                let window_start = today - chrono::Duration::days(MONTH_DAYS);
                let (actual_grams, actual_cost) =
                    self.expired_waste(inventory, window_start);
                self.scaled_estimate(weekly, WastePeriod::Year, window_start, scale)
                    .with_actual(actual_grams, actual_cost)
            }
        }
    }

    /// Compare an estimate to the community baseline. `better` means the
    /// user wastes strictly less than the baseline.
    pub fn compare_to_community(&self, estimate: &WasteEstimate) -> CommunityComparison {
        let community = &self.config.community;
        let (community_grams, community_cost) = match estimate.period {
            WastePeriod::Week => (community.weekly_grams, community.weekly_cost),
            WastePeriod::Month => (community.monthly_grams, community.monthly_cost),
            WastePeriod::Year => (community.yearly_grams, community.yearly_cost),
        };

        let percentage_difference = if community_grams > 0.0 {
            (estimate.total_waste_grams - community_grams) / community_grams * 100.0
        } else {
            0.0
        };

        let by_category = if estimate.period == WastePeriod::Week {
            estimate
                .by_category
                .iter()
                .map(|entry| {
                    let community_grams = community
                        .weekly_grams_by_category
                        .get(&entry.category)
                        .copied()
                        .unwrap_or(0.0);
                    CategoryComparison {
                        category: entry.category,
                        user_grams: entry.grams,
                        community_grams,
                        status: comparison_status(entry.grams, community_grams),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        CommunityComparison {
            period: estimate.period,
            user_grams: estimate.total_waste_grams,
            community_grams,
            user_cost: estimate.total_waste_cost,
            community_cost,
            percentage_difference: round2(percentage_difference),
            status: comparison_status(estimate.total_waste_grams, community_grams),
            by_category,
        }
    }

    /// Forward series for the next `weeks` weeks. Each week's multiplier
    /// interpolates linearly from 1.0 toward the trend factor at half
    /// strength, so a noisy week never compounds into the projection.
    pub fn project(
        &self,
        weekly: &WasteEstimate,
        weeks: u32,
        today: NaiveDate,
    ) -> Vec<WasteProjectionPoint> {
        let mut points = Vec::with_capacity(weeks as usize);
        let mut cumulative_grams = 0.0;
        let mut cumulative_cost = 0.0;

        for week in 1..=weeks {
            let progress = week as f64 / weeks.max(1) as f64;
            let multiplier = 1.0 + (weekly.trend_factor - 1.0) * progress * 0.5;
            let projected_grams = round2(weekly.total_waste_grams * multiplier);
            let projected_cost = round2(weekly.total_waste_cost * multiplier);
            cumulative_grams = round2(cumulative_grams + projected_grams);
            cumulative_cost = round2(cumulative_cost + projected_cost);

            points.push(WasteProjectionPoint {
                week,
                week_start: today + chrono::Duration::weeks(week as i64),
                trend_multiplier: round2(multiplier),
                projected_grams,
                projected_cost,
                cumulative_grams,
                cumulative_cost,
            });
        }

        points
    }

    fn weekly_estimate(
        &self,
        inventory: &[InventoryRecord],
        patterns: &ConsumptionPatterns,
        today: NaiveDate,
    ) -> WasteEstimate {
        let window_start = today - chrono::Duration::days(WEEK_DAYS);
        let mut by_category: BTreeMap<FoodCategory, CategoryWaste> = BTreeMap::new();

        let mut expired_grams = 0.0;
        let mut expired_cost = 0.0;
        for item in inventory {
            if item.status != ItemStatus::Expired {
                continue;
            }
            let Some(expiration) = item.expiration_date else {
                continue;
            };
            if expiration < window_start {
                continue;
            }

            let grams = to_grams(item.quantity, item.unit);
            let cost = self.config.cost_per_unit(item.category) * item.quantity;
            expired_grams += grams;
            expired_cost += cost;
            accumulate(&mut by_category, item.category, grams, cost);
        }

        let mut pattern_grams = 0.0;
        let mut pattern_cost = 0.0;
        for item in inventory {
            if item.purchase_date < window_start {
                continue;
            }
            if !matches!(item.status, ItemStatus::Expired | ItemStatus::ExpiringSoon) {
                continue;
            }

            let mut rate = self.config.waste_rate(item.category);
            if patterns
                .get(&item.category)
                .map(|pattern| pattern.frequency > 7.0)
                .unwrap_or(false)
            {
                rate *= INFREQUENT_RATE_INFLATION;
            }
            if item
                .expiration_date
                .map(|expiration| (expiration - today).num_days() <= 3)
                .unwrap_or(false)
            {
                rate *= NEAR_EXPIRY_RATE_INFLATION;
            }

            let grams = to_grams(item.quantity, item.unit) * rate;
            let cost = self.config.cost_per_unit(item.category) * item.quantity * rate;
            pattern_grams += grams;
            pattern_cost += cost;
            accumulate(&mut by_category, item.category, grams, cost);
        }

        let expired_grams = round2(expired_grams);
        let expired_cost = round2(expired_cost);
        let pattern_grams = round2(pattern_grams);
        let pattern_cost = round2(pattern_cost);

        WasteEstimate {
            period: WastePeriod::Week,
            window_start,
            expired_waste_grams: expired_grams,
            expired_waste_cost: expired_cost,
            pattern_waste_grams: pattern_grams,
            pattern_waste_cost: pattern_cost,
            total_waste_grams: expired_grams + pattern_grams,
            total_waste_cost: expired_cost + pattern_cost,
            actual_expired_grams: None,
            actual_expired_cost: None,
            by_category: rounded_categories(by_category),
            trend_factor: self.trend_factor(inventory, today),
        }
    }

    /// Ratio of last week's expired grams to the week before, clamped to a
    /// narrow band so one bad week cannot run away in projections.
    fn trend_factor(&self, inventory: &[InventoryRecord], today: NaiveDate) -> f64 {
        let week_ago = today - chrono::Duration::days(WEEK_DAYS);
        let two_weeks_ago = today - chrono::Duration::days(2 * WEEK_DAYS);

        let mut last_week = 0.0;
        let mut previous_week = 0.0;
        for item in inventory {
            if item.status != ItemStatus::Expired {
                continue;
            }
            let Some(expiration) = item.expiration_date else {
                continue;
            };
            let grams = to_grams(item.quantity, item.unit);
            if expiration >= week_ago && expiration <= today {
                last_week += grams;
            } else if expiration >= two_weeks_ago && expiration < week_ago {
                previous_week += grams;
            }
        }

        if previous_week <= 0.0 {
            return 1.0;
        }

        (last_week / previous_week).clamp(TREND_FLOOR, TREND_CEIL)
    }

    fn expired_waste(
        &self,
        inventory: &[InventoryRecord],
        window_start: NaiveDate,
    ) -> (f64, f64) {
        let mut grams = 0.0;
        let mut cost = 0.0;
        for item in inventory {
            if item.status != ItemStatus::Expired {
                continue;
            }
            let Some(expiration) = item.expiration_date else {
                continue;
            };
            if expiration < window_start {
                continue;
            }
            grams += to_grams(item.quantity, item.unit);
            cost += self.config.cost_per_unit(item.category) * item.quantity;
        }
        (round2(grams), round2(cost))
    }

    fn scaled_estimate(
        &self,
        weekly: WasteEstimate,
        period: WastePeriod,
        window_start: NaiveDate,
        scale: f64,
    ) -> WasteEstimate {
        let expired_grams = round2(weekly.expired_waste_grams * scale);
        let expired_cost = round2(weekly.expired_waste_cost * scale);
        let pattern_grams = round2(weekly.pattern_waste_grams * scale);
        let pattern_cost = round2(weekly.pattern_waste_cost * scale);

        WasteEstimate {
            period,
            window_start,
            expired_waste_grams: expired_grams,
            expired_waste_cost: expired_cost,
            pattern_waste_grams: pattern_grams,
            pattern_waste_cost: pattern_cost,
            total_waste_grams: expired_grams + pattern_grams,
            total_waste_cost: expired_cost + pattern_cost,
            actual_expired_grams: None,
            actual_expired_cost: None,
            by_category: weekly
                .by_category
                .into_iter()
                .map(|entry| CategoryWaste {
                    category: entry.category,
                    grams: round2(entry.grams * scale),
                    cost: round2(entry.cost * scale),
                })
                .collect(),
            trend_factor: weekly.trend_factor,
        }
    }
}

impl WasteEstimate {
    fn with_actual(mut self, grams: f64, cost: f64) -> Self {
        self.actual_expired_grams = Some(grams);
        self.actual_expired_cost = Some(cost);
        self
    }
}

fn comparison_status(user: f64, community: f64) -> ComparisonStatus {
    if user < community {
        ComparisonStatus::Better
    } else {
        ComparisonStatus::Worse
    }
}

fn accumulate(
    buckets: &mut BTreeMap<FoodCategory, CategoryWaste>,
    category: FoodCategory,
    grams: f64,
    cost: f64,
) {
    let entry = buckets.entry(category).or_insert(CategoryWaste {
        category,
        grams: 0.0,
        cost: 0.0,
    });
    entry.grams += grams;
    entry.cost += cost;
}

fn rounded_categories(buckets: BTreeMap<FoodCategory, CategoryWaste>) -> Vec<CategoryWaste> {
    buckets
        .into_values()
        .map(|entry| CategoryWaste {
            category: entry.category,
            grams: round2(entry.grams),
            cost: round2(entry.cost),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
