use std::sync::Arc;

use super::common::*;
use crate::workflows::advisor::sdg::{
    week_start_monday, InsightCategory, InsightKind, ScoreStore, ScoreTrend, SdgScoreRecord,
};
use crate::workflows::ledger::stores::ConsumptionStore;
use crate::workflows::advisor::service::AdvisorConfig;
use crate::workflows::ledger::domain::{FoodCategory, ItemStatus, QuantityUnit};

#[test]
fn week_starts_align_to_monday() {
    assert_eq!(week_start_monday(date(2025, 1, 15)), date(2025, 1, 13));
    assert_eq!(week_start_monday(date(2025, 1, 13)), date(2025, 1, 13));
    assert_eq!(week_start_monday(date(2025, 1, 19)), date(2025, 1, 13));
}

#[test]
fn empty_ledger_scores_cleanly() {
    let harness = build_service();

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    assert_eq!(score.week_start, date(2025, 1, 13));
    assert_eq!(score.waste_score, 100.0);
    assert_eq!(score.nutrition_score, 100.0);
    assert_eq!(score.sustainability_score, 80.0);
    assert_eq!(score.overall_score, 95.0);
    assert_eq!(score.improvement.trend, ScoreTrend::New);
}

#[test]
fn overall_is_the_rounded_weighted_sum_of_clamped_components() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-exp",
        "Wilted Spinach",
        FoodCategory::Vegetable,
        1.0,
        QuantityUnit::Kg,
        date(2024, 12, 20),
        Some(date(2025, 1, 14)),
        ItemStatus::Expired,
    ));
    for day in 9..=14 {
        harness.consumption.push(log(
            &format!("log-{day}"),
            "Salad",
            FoodCategory::Vegetable,
            1.0,
            QuantityUnit::Serving,
            date(2025, 1, day),
        ));
    }

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    for component in [
        score.waste_score,
        score.nutrition_score,
        score.sustainability_score,
    ] {
        assert!((0.0..=100.0).contains(&component));
    }

    let expected = ((score.waste_score * 0.40
        + score.nutrition_score * 0.35
        + score.sustainability_score * 0.25)
        * 100.0)
        .round()
        / 100.0;
    assert_eq!(score.overall_score, expected);
}

#[test]
fn computation_is_idempotent_for_a_fixed_window() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-milk",
        "Milk",
        FoodCategory::Dairy,
        1.0,
        QuantityUnit::L,
        date(2025, 1, 10),
        Some(date(2025, 1, 16)),
        ItemStatus::ExpiringSoon,
    ));
    harness
        .consumption
        .append(log(
            "log-1",
            "Milk",
            FoodCategory::Dairy,
            0.5,
            QuantityUnit::L,
            date(2025, 1, 12),
        ))
        .expect("append");

    let first = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("first computation");
    let second = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("second computation");

    assert_eq!(first, second);
}

#[test]
fn saving_twice_keeps_a_single_record_per_week() {
    let harness = build_service();

    let first = harness
        .service
        .save_weekly_score(&owner(), None, today())
        .expect("first save");
    let second = harness
        .service
        .save_weekly_score(&owner(), None, today())
        .expect("second save");

    assert_eq!(harness.scores.len(), 1);
    assert_eq!(first.week_start, second.week_start);
    assert_eq!(first.overall_score, second.overall_score);

    let history = harness
        .service
        .score_history(&owner(), 12)
        .expect("history");
    assert_eq!(history.len(), 1);
}

#[test]
fn previous_week_drives_the_improvement_trend() {
    let harness = build_service();

    harness
        .scores
        .upsert_week(SdgScoreRecord {
            owner: owner(),
            week_start: date(2025, 1, 6),
            overall_score: 50.0,
            waste_score: 50.0,
            nutrition_score: 50.0,
            sustainability_score: 50.0,
            insights: Vec::new(),
            actionable_steps: Vec::new(),
        })
        .expect("seed previous week");

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    assert_eq!(score.improvement.trend, ScoreTrend::Improving);
    assert_eq!(score.improvement.overall_change, Some(45.0));
    assert_eq!(score.improvement.percent_change, Some(90.0));
    assert!(score
        .insights
        .iter()
        .any(|insight| insight.kind == InsightKind::Success
            && insight.category == InsightCategory::Overall));
}

#[test]
fn generated_text_replaces_insights_line_by_line() {
    let harness = build_service_with(
        AdvisorConfig::default(),
        Some(Arc::new(ScriptedTextGenerator::replying(
            "You wasted less than your neighbors.\nKeep logging daily.",
        ))),
    );

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    assert_eq!(score.insights.len(), 2);
    assert!(score
        .insights
        .iter()
        .all(|insight| insight.category == InsightCategory::Overall));
    assert_eq!(
        score.insights[0].message,
        "You wasted less than your neighbors."
    );
}

#[test]
fn generator_failure_falls_back_to_rule_based_insights() {
    let harness = build_service_with(
        AdvisorConfig::default(),
        Some(Arc::new(ScriptedTextGenerator::failing())),
    );

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    // Empty ledger earns the high-waste-score success insight.
    assert!(score
        .insights
        .iter()
        .any(|insight| insight.kind == InsightKind::Success
            && insight.category == InsightCategory::Waste));
}

#[test]
fn actionable_steps_lead_with_high_priority() {
    let harness = build_service();

    // A wasteful week: several expired items and nothing consumed.
    for index in 0..4 {
        harness.inventory.push(item(
            &format!("inv-{index}"),
            &format!("Expired Item {index}"),
            FoodCategory::Meat,
            1.0,
            QuantityUnit::Kg,
            date(2024, 12, 28),
            Some(date(2025, 1, 13)),
            ItemStatus::Expired,
        ));
    }
    harness.inventory.push(item(
        "inv-soon",
        "Chicken Thighs",
        FoodCategory::Meat,
        1.0,
        QuantityUnit::Kg,
        date(2025, 1, 12),
        Some(date(2025, 1, 16)),
        ItemStatus::ExpiringSoon,
    ));

    let score = harness
        .service
        .compute_sdg_score(&owner(), None, today())
        .expect("score computes");

    assert!(!score.actionable_steps.is_empty());
    assert!(score.actionable_steps.len() <= 6);
    let first_medium = score
        .actionable_steps
        .iter()
        .position(|step| step.priority == crate::workflows::advisor::sdg::StepPriority::Medium);
    let last_high = score
        .actionable_steps
        .iter()
        .rposition(|step| step.priority == crate::workflows::advisor::sdg::StepPriority::High);
    if let (Some(first_medium), Some(last_high)) = (first_medium, last_high) {
        assert!(last_high < first_medium);
    }
    assert!(score
        .actionable_steps
        .iter()
        .any(|step| step.action.contains("Chicken Thighs")));
}
