//! Weekly SDG impact scoring: a weighted composite of waste reduction,
//! nutrition balance, and sustainability behavior, with week-over-week
//! comparison against the persisted prior score.

mod insights;

pub use insights::{
    ActionStep, Impact, Insight, InsightCategory, InsightKind, StepPriority,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::patterns::{self, NutritionConfig};
use super::waste::WasteEstimate;
use crate::workflows::ledger::domain::{
    ConsumptionRecord, FoodCategory, InventoryRecord, ItemStatus, OwnerId,
};
use crate::workflows::ledger::stores::StoreError;

const WASTE_WEIGHT: f64 = 0.40;
const NUTRITION_WEIGHT: f64 = 0.35;
const SUSTAINABILITY_WEIGHT: f64 = 0.25;

const EXPIRED_ITEM_PENALTY: f64 = 5.0;
const EXPIRED_PENALTY_CAP: f64 = 25.0;
const USAGE_BONUS_PER_ITEM: f64 = 2.0;
const USAGE_BONUS_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrend {
    New,
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    pub trend: ScoreTrend,
}

/// Computed weekly score with its explanation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdgScore {
    pub owner: OwnerId,
    pub week_start: NaiveDate,
    pub overall_score: f64,
    pub waste_score: f64,
    pub nutrition_score: f64,
    pub sustainability_score: f64,
    pub insights: Vec<Insight>,
    pub actionable_steps: Vec<ActionStep>,
    pub improvement: Improvement,
}

/// Persisted snapshot of a weekly score. At most one record exists per
/// (owner, week_start); recomputation upserts with last-write-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdgScoreRecord {
    pub owner: OwnerId,
    pub week_start: NaiveDate,
    pub overall_score: f64,
    pub waste_score: f64,
    pub nutrition_score: f64,
    pub sustainability_score: f64,
    pub insights: Vec<Insight>,
    pub actionable_steps: Vec<ActionStep>,
}

impl From<&SdgScore> for SdgScoreRecord {
    fn from(score: &SdgScore) -> Self {
        Self {
            owner: score.owner.clone(),
            week_start: score.week_start,
            overall_score: score.overall_score,
            waste_score: score.waste_score,
            nutrition_score: score.nutrition_score,
            sustainability_score: score.sustainability_score,
            insights: score.insights.clone(),
            actionable_steps: score.actionable_steps.clone(),
        }
    }
}

/// Weekly score persistence. Scores are recomputable, so writers use plain
/// last-write-wins upserts keyed by owner and week.
pub trait ScoreStore: Send + Sync {
    fn fetch_week(
        &self,
        owner: &OwnerId,
        week_start: NaiveDate,
    ) -> Result<Option<SdgScoreRecord>, StoreError>;

    fn upsert_week(&self, record: SdgScoreRecord) -> Result<SdgScoreRecord, StoreError>;

    fn history(&self, owner: &OwnerId, limit: usize) -> Result<Vec<SdgScoreRecord>, StoreError>;
}

/// Align a date to the Monday starting its ISO week.
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Everything the scorer reads for one computation, gathered by the caller
/// so the computation itself stays pure and repeatable.
pub struct SdgInputs<'a> {
    pub owner: &'a OwnerId,
    pub inventory: &'a [InventoryRecord],
    /// Consumption log covering at least the 30 days before `today`.
    pub logs: &'a [ConsumptionRecord],
    pub weekly_waste: &'a WasteEstimate,
    pub community_weekly_grams: f64,
    pub previous: Option<&'a SdgScoreRecord>,
    pub week_start: NaiveDate,
    pub today: NaiveDate,
}

pub struct SdgScorer {
    nutrition: NutritionConfig,
}

impl SdgScorer {
    pub fn new(nutrition: NutritionConfig) -> Self {
        Self { nutrition }
    }

    /// Compute the weekly score. Pure with respect to the inputs: the same
    /// ledger, week, and date always produce the same output.
    pub fn compute(&self, inputs: &SdgInputs<'_>) -> SdgScore {
        let week_logs: Vec<&ConsumptionRecord> = inputs
            .logs
            .iter()
            .filter(|log| log.date_consumed >= inputs.week_start)
            .collect();

        let imbalances = patterns::detect_imbalances(inputs.logs, &self.nutrition);
        let nutrient_gaps = patterns::detect_nutrient_gaps(inputs.logs, &self.nutrition);

        let waste_score = self.waste_component(inputs);
        let nutrition_score = self.nutrition_component(&week_logs, &imbalances, &nutrient_gaps);
        let sustainability_score = self.sustainability_component(inputs, week_logs.len());

        let overall_score = round2(
            waste_score * WASTE_WEIGHT
                + nutrition_score * NUTRITION_WEIGHT
                + sustainability_score * SUSTAINABILITY_WEIGHT,
        );

        let previous_overall = inputs.previous.map(|record| record.overall_score);
        let improvement = improvement(overall_score, previous_overall);

        let insight_list = insights::generate_insights(&insights::InsightInputs {
            waste_score,
            nutrition_score,
            sustainability_score,
            overall_score,
            previous_overall,
            weekly_waste: inputs.weekly_waste,
            imbalances: &imbalances,
            nutrient_gaps: &nutrient_gaps,
        });

        let expiring_items: Vec<&InventoryRecord> = inputs
            .inventory
            .iter()
            .filter(|item| item.status == ItemStatus::ExpiringSoon)
            .take(5)
            .collect();
        let unique_categories = {
            let mut categories: Vec<FoodCategory> =
                week_logs.iter().map(|log| log.category).collect();
            categories.sort();
            categories.dedup();
            categories.len()
        };

        let steps = insights::generate_actionable_steps(&insights::StepInputs {
            waste_score,
            nutrition_score,
            sustainability_score,
            weekly_waste: inputs.weekly_waste,
            expiring_items: &expiring_items,
            imbalances: &imbalances,
            nutrient_gaps: &nutrient_gaps,
            week_log_count: week_logs.len(),
            unique_categories,
        });

        SdgScore {
            owner: inputs.owner.clone(),
            week_start: inputs.week_start,
            overall_score,
            waste_score,
            nutrition_score,
            sustainability_score,
            insights: insight_list,
            actionable_steps: steps,
            improvement,
        }
    }

    /// Waste reduction component: community-ratio tier, trend bonus, expired
    /// penalty, near-expiry usage bonus. Higher means less waste.
    fn waste_component(&self, inputs: &SdgInputs<'_>) -> f64 {
        let waste_grams = inputs.weekly_waste.total_waste_grams;
        let community = inputs.community_weekly_grams;

        let base_score = if waste_grams == 0.0 {
            100.0
        } else if waste_grams <= community * 0.3 {
            95.0
        } else if waste_grams <= community * 0.5 {
            85.0
        } else if waste_grams <= community * 0.7 {
            75.0
        } else if waste_grams <= community {
            60.0
        } else if waste_grams <= community * 1.5 {
            45.0
        } else {
            30.0
        };

        let trend_bonus = self.waste_trend_bonus(inputs.inventory, inputs.today);

        let expired_count = inputs
            .inventory
            .iter()
            .filter(|item| {
                item.status == ItemStatus::Expired
                    && item
                        .expiration_date
                        .map(|date| date >= inputs.week_start)
                        .unwrap_or(false)
            })
            .count();
        let expired_penalty =
            (expired_count as f64 * EXPIRED_ITEM_PENALTY).min(EXPIRED_PENALTY_CAP);

        let usage_bonus = (near_expiry_consumed(
            inputs.inventory,
            inputs.week_start - chrono::Duration::days(7),
            Some(inputs.week_start + chrono::Duration::days(7)),
        ) as f64
            * USAGE_BONUS_PER_ITEM)
            .min(USAGE_BONUS_CAP);

        (base_score + trend_bonus - expired_penalty + usage_bonus).clamp(0.0, 100.0)
    }

    /// Bonus for an improving expired-item trend across the last two weeks.
    /// Sustained zero waste also earns a small bonus.
    fn waste_trend_bonus(&self, inventory: &[InventoryRecord], today: NaiveDate) -> f64 {
        let one_week_ago = today - chrono::Duration::days(7);
        let two_weeks_ago = today - chrono::Duration::days(14);

        let expired_in = |from: NaiveDate, to: NaiveDate| {
            inventory
                .iter()
                .filter(|item| {
                    item.status == ItemStatus::Expired
                        && item
                            .expiration_date
                            .map(|date| date >= from && date < to)
                            .unwrap_or(false)
                })
                .count()
        };

        let previous_week = expired_in(two_weeks_ago, one_week_ago);
        let last_week = expired_in(one_week_ago, today + chrono::Duration::days(1));

        if previous_week > 0 {
            let improvement =
                (previous_week as f64 - last_week as f64) / previous_week as f64 * 100.0;
            if improvement > 50.0 {
                15.0
            } else if improvement > 25.0 {
                10.0
            } else if improvement > 0.0 {
                5.0
            } else {
                0.0
            }
        } else if last_week == 0 {
            5.0
        } else {
            0.0
        }
    }

    fn nutrition_component(
        &self,
        week_logs: &[&ConsumptionRecord],
        imbalances: &[patterns::CategoryImbalance],
        nutrient_gaps: &[patterns::NutrientGap],
    ) -> f64 {
        let mut score: f64 = 100.0;

        for imbalance in imbalances {
            score -= match (imbalance.kind, imbalance.severity) {
                (patterns::ImbalanceKind::UnderConsumption, patterns::ImbalanceSeverity::High) => {
                    20.0
                }
                (
                    patterns::ImbalanceKind::UnderConsumption,
                    patterns::ImbalanceSeverity::Medium,
                ) => 12.0,
                (patterns::ImbalanceKind::OverConsumption, patterns::ImbalanceSeverity::High) => {
                    10.0
                }
                (patterns::ImbalanceKind::OverConsumption, patterns::ImbalanceSeverity::Medium) => {
                    5.0
                }
            };
        }

        for gap in nutrient_gaps {
            score -= if gap.gap_percentage > 50.0 {
                25.0
            } else if gap.gap_percentage > 30.0 {
                15.0
            } else if gap.gap_percentage > 15.0 {
                8.0
            } else {
                3.0
            };
        }

        let mut categories: Vec<FoodCategory> = week_logs.iter().map(|log| log.category).collect();
        categories.sort();
        categories.dedup();
        score += match categories.len() {
            n if n >= 6 => 15.0,
            5 => 10.0,
            4 => 5.0,
            3 => 2.0,
            _ => 0.0,
        };

        score += match week_logs.len() {
            n if n >= 14 => 10.0,
            n if n >= 7 => 5.0,
            _ => 0.0,
        };

        let veg_fruit_logs = week_logs
            .iter()
            .filter(|log| {
                matches!(log.category, FoodCategory::Vegetable | FoodCategory::Fruit)
            })
            .count();
        score += match veg_fruit_logs {
            n if n >= 10 => 10.0,
            n if n >= 5 => 5.0,
            _ => 0.0,
        };

        score.clamp(0.0, 100.0)
    }

    fn sustainability_component(&self, inputs: &SdgInputs<'_>, week_log_count: usize) -> f64 {
        let mut score: f64 = 60.0;

        let waste_grams = inputs.weekly_waste.total_waste_grams;
        let community = inputs.community_weekly_grams;
        score += if waste_grams <= community * 0.5 {
            20.0
        } else if waste_grams <= community * 0.7 {
            15.0
        } else if waste_grams <= community {
            10.0
        } else if waste_grams <= community * 1.2 {
            5.0
        } else {
            0.0
        };

        let used = near_expiry_consumed(
            inputs.inventory,
            inputs.week_start - chrono::Duration::days(7),
            None,
        );
        score += if used >= 5 {
            15.0
        } else if used >= 3 {
            10.0
        } else if used >= 1 {
            5.0
        } else {
            0.0
        };

        score += match week_log_count {
            n if n >= 14 => 10.0,
            n if n >= 7 => 5.0,
            _ => 0.0,
        };

        score.clamp(0.0, 100.0)
    }
}

fn near_expiry_consumed(
    inventory: &[InventoryRecord],
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> usize {
    inventory
        .iter()
        .filter(|item| {
            item.status == ItemStatus::Consumed
                && item
                    .expiration_date
                    .map(|date| date >= from && to.map(|limit| date <= limit).unwrap_or(true))
                    .unwrap_or(false)
        })
        .count()
}

fn improvement(current: f64, previous: Option<f64>) -> Improvement {
    let Some(previous) = previous else {
        return Improvement {
            overall_change: None,
            percent_change: None,
            trend: ScoreTrend::New,
        };
    };

    let change = round2(current - previous);
    let percent_change = if previous > 0.0 {
        Some(round2(change / previous * 100.0))
    } else {
        None
    };

    let trend = if change > 0.0 {
        ScoreTrend::Improving
    } else if change < 0.0 {
        ScoreTrend::Declining
    } else {
        ScoreTrend::Stable
    };

    Improvement {
        overall_change: Some(change),
        percent_change,
        trend,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
