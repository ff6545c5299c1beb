mod config;
mod rules;

pub use config::{CategoryRiskProfile, PriorityThresholds, RiskConfig, Season};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patterns::ConsumptionPatterns;
use crate::workflows::ledger::domain::{FoodCategory, InventoryId, InventoryRecord, ItemStatus};

/// Action tier derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn is_actionable(self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

/// Risk assessment for one inventory record. Recomputed on demand; callers
/// may persist it keyed by owner and record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub inventory_id: InventoryId,
    pub item_name: String,
    pub category: FoodCategory,
    pub expiration_date: NaiveDate,
    pub days_until_expiry: i64,
    pub risk_score: f64,
    pub ai_ranking_score: f64,
    pub priority: Priority,
    pub reasoning: Vec<String>,
    pub recommended_action: String,
}

impl RiskPrediction {
    /// Pipe-joined reasoning for one-line display.
    pub fn reasoning_sentence(&self) -> String {
        self.reasoning.join(" | ")
    }
}

/// Per-category rollup of a prediction batch.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRiskSummary {
    pub category: FoodCategory,
    pub total_items: usize,
    pub high_risk_items: usize,
    pub avg_risk: f64,
}

/// Stateless scorer applying the risk rubric to inventory records.
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Score every item expiring within `days_ahead`, sorted by ranking
    /// score descending. Items without an expiration date and consumed items
    /// are excluded entirely rather than zero-scored.
    pub fn predict(
        &self,
        inventory: &[InventoryRecord],
        patterns: &ConsumptionPatterns,
        household_size: u32,
        today: NaiveDate,
        days_ahead: i64,
    ) -> Vec<RiskPrediction> {
        let horizon = today + chrono::Duration::days(days_ahead);
        let season = Season::from_month(chrono::Datelike::month(&today));

        let mut predictions: Vec<RiskPrediction> = inventory
            .iter()
            .filter(|item| item.status != ItemStatus::Consumed)
            .filter_map(|item| {
                let expiration = item.expiration_date?;
                if expiration > horizon {
                    return None;
                }

                let scored = rules::score_item(
                    item,
                    expiration,
                    patterns,
                    season,
                    household_size,
                    today,
                    &self.config,
                );
                let priority = self.priority_for(scored.risk_score);

                Some(RiskPrediction {
                    inventory_id: item.id.clone(),
                    item_name: item.item_name.clone(),
                    category: item.category,
                    expiration_date: expiration,
                    days_until_expiry: scored.days_until_expiry,
                    risk_score: scored.risk_score,
                    ai_ranking_score: scored.ranking_score,
                    priority,
                    recommended_action: recommended_action(priority, &item.item_name),
                    reasoning: scored.reasoning,
                })
            })
            .collect();

        predictions.sort_by(|a, b| b.ai_ranking_score.total_cmp(&a.ai_ranking_score));
        predictions
    }

    pub fn priority_for(&self, risk_score: f64) -> Priority {
        let thresholds = &self.config.thresholds;
        if risk_score >= thresholds.critical {
            Priority::Critical
        } else if risk_score >= thresholds.high {
            Priority::High
        } else if risk_score >= thresholds.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Roll predictions up per category for dashboard summaries.
    pub fn category_summary(&self, predictions: &[RiskPrediction]) -> Vec<CategoryRiskSummary> {
        let mut buckets: BTreeMap<FoodCategory, (usize, usize, f64)> = BTreeMap::new();

        for prediction in predictions {
            let entry = buckets.entry(prediction.category).or_insert((0, 0, 0.0));
            entry.0 += 1;
            if prediction.priority.is_actionable() {
                entry.1 += 1;
            }
            entry.2 += prediction.risk_score;
        }

        buckets
            .into_iter()
            .map(|(category, (total, high_risk, risk_sum))| CategoryRiskSummary {
                category,
                total_items: total,
                high_risk_items: high_risk,
                avg_risk: rules::round2(risk_sum / total as f64),
            })
            .collect()
    }
}

fn recommended_action(priority: Priority, item_name: &str) -> String {
    match priority {
        Priority::Critical => {
            format!("Use {item_name} immediately or freeze/preserve it today")
        }
        Priority::High => format!("Plan to use {item_name} within 24 hours"),
        Priority::Medium => {
            format!("Prioritize {item_name} in your meal planning for the next 3 days")
        }
        Priority::Low => {
            format!("Monitor {item_name} - still safe but plan consumption soon")
        }
    }
}
