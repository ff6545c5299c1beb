use chrono::NaiveDate;

use super::config::{RiskConfig, Season};
use crate::workflows::advisor::patterns::ConsumptionPatterns;
use crate::workflows::ledger::domain::InventoryRecord;

const MAX_CONSUMPTION_RISK: f64 = 30.0;
const INFREQUENT_CONSUMPTION_DAYS: f64 = 7.0;
const INFREQUENT_CONSUMPTION_RISK: f64 = 10.0;
const FIFO_CAP: f64 = 50.0;

pub(crate) struct ScoredItem {
    pub risk_score: f64,
    pub ranking_score: f64,
    pub days_until_expiry: i64,
    pub reasoning: Vec<String>,
}

/// Score one inventory record against the rubric. `expiration` is the
/// record's expiration date; items without one are filtered out before this
/// is called.
pub(crate) fn score_item(
    item: &InventoryRecord,
    expiration: NaiveDate,
    patterns: &ConsumptionPatterns,
    season: Season,
    household_size: u32,
    today: NaiveDate,
    config: &RiskConfig,
) -> ScoredItem {
    let days_until = (expiration - today).num_days();
    let profile = config.category_profile(item.category);

    let time_risk = time_risk(days_until);
    let mut category_risk = time_risk * profile.risk_multiplier;

    let mut seasonal_factor = 1.0;
    if profile.seasonal_sensitive {
        seasonal_factor = config.seasonal_factor(season, item.category);
        category_risk *= seasonal_factor;
    }

    let pattern = patterns.get(&item.category);
    let mut consumption_risk = 0.0;
    let mut days_to_consume = None;
    let mut infrequent = false;

    if let Some(pattern) = pattern {
        if pattern.avg_daily > 0.0 {
            let needed = item.quantity / pattern.avg_daily;
            days_to_consume = Some(needed);
            if needed > days_until as f64 {
                consumption_risk =
                    ((needed - days_until as f64) * 5.0).min(MAX_CONSUMPTION_RISK);
            }
            if pattern.frequency > INFREQUENT_CONSUMPTION_DAYS {
                consumption_risk += INFREQUENT_CONSUMPTION_RISK;
                infrequent = true;
            }
        }
    }

    let household_adjustment = if household_size > 1 {
        -5.0 * (household_size as f64 - 1.0)
    } else {
        0.0
    };

    let risk_score =
        (category_risk + consumption_risk + household_adjustment).clamp(0.0, 100.0);

    let reasoning = build_reasoning(
        item,
        days_until,
        season,
        seasonal_factor,
        profile.seasonal_sensitive,
        pattern,
        days_to_consume,
        infrequent,
    );

    let ranking_score = ranking_score(item, risk_score, days_until, today, config);

    ScoredItem {
        risk_score: round2(risk_score),
        ranking_score: round2(ranking_score),
        days_until_expiry: days_until,
        reasoning,
    }
}

/// Base risk from time until expiration. 100 is reserved for items already
/// past their date; expiring today scores 90.
pub(crate) fn time_risk(days_until: i64) -> f64 {
    if days_until < 0 {
        100.0
    } else if days_until <= 1 {
        90.0
    } else if days_until <= 3 {
        75.0
    } else if days_until <= 7 {
        60.0
    } else {
        (60.0 - (days_until - 7) as f64 * 2.0).max(20.0)
    }
}

/// Secondary composite used only for ordering: FIFO age, weighted risk,
/// expiration proximity, and category urgency. Older, more urgent, more
/// waste-prone items float to the top even at equal risk.
fn ranking_score(
    item: &InventoryRecord,
    risk_score: f64,
    days_until: i64,
    today: NaiveDate,
    config: &RiskConfig,
) -> f64 {
    let days_since_purchase = (today - item.purchase_date).num_days().max(0);
    let fifo_score = (days_since_purchase as f64 * 2.0).min(FIFO_CAP);

    let risk_component = risk_score * 0.5;

    let proximity_bonus = if days_until <= 0 {
        50.0
    } else if days_until <= 1 {
        40.0
    } else if days_until <= 3 {
        30.0
    } else if days_until <= 7 {
        20.0
    } else {
        (20.0 - days_until as f64).max(0.0)
    };

    let multiplier = config.category_profile(item.category).risk_multiplier;
    let urgency_bonus = (1.0 - multiplier / 2.0) * 10.0;

    fifo_score + risk_component + proximity_bonus + urgency_bonus
}

/// Ordered reasoning clauses. Callers join these with " | ", so the order
/// (time, season, consumption rate, frequency) is part of the contract.
#[allow(clippy::too_many_arguments)]
fn build_reasoning(
    item: &InventoryRecord,
    days_until: i64,
    season: Season,
    seasonal_factor: f64,
    seasonal_sensitive: bool,
    pattern: Option<&crate::workflows::advisor::patterns::CategoryPattern>,
    days_to_consume: Option<f64>,
    infrequent: bool,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if days_until < 0 {
        reasons.push("Item has already expired".to_string());
    } else if days_until <= 1 {
        reasons.push(format!(
            "Expires in {days_until} day - urgent action needed"
        ));
    } else if days_until <= 3 {
        reasons.push(format!("Expires in {days_until} days - high priority"));
    } else {
        reasons.push(format!("Expires in {days_until} days"));
    }

    if seasonal_sensitive && seasonal_factor > 1.0 {
        reasons.push(format!(
            "{} items expire faster in {}",
            item.category.label(),
            season.label()
        ));
    }

    if let (Some(pattern), Some(needed)) = (pattern, days_to_consume) {
        if needed > days_until as f64 {
            reasons.push(format!(
                "At your consumption rate ({:.2} {}/day) this item needs {:.1} days to finish",
                pattern.avg_daily,
                item.unit.label(),
                needed
            ));
        }
    }

    if infrequent {
        if let Some(pattern) = pattern {
            reasons.push(format!(
                "{} items are consumed infrequently (every {:.1} days on average)",
                item.category.label(),
                pattern.frequency
            ));
        }
    }

    reasons
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
