use super::common::*;
use crate::workflows::advisor::risk::{Priority, RiskConfig, RiskEngine};
use crate::workflows::ledger::domain::{FoodCategory, ItemStatus, QuantityUnit};

#[test]
fn winter_dairy_scenario_clamps_to_critical() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-milk",
        "Whole Milk",
        FoodCategory::Dairy,
        1.0,
        QuantityUnit::L,
        date(2025, 1, 10),
        Some(date(2025, 1, 16)),
        ItemStatus::ExpiringSoon,
    ));

    // Five consecutive dairy days at 0.2 l/day: avg_daily = 0.2, frequency 1.
    for (index, day) in (8..13).enumerate() {
        harness.consumption.push(log(
            &format!("log-{index}"),
            "Milk",
            FoodCategory::Dairy,
            0.2,
            QuantityUnit::L,
            date(2025, 1, day),
        ));
    }

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds");

    assert_eq!(predictions.len(), 1);
    let prediction = &predictions[0];
    // 90 * 1.4 * 0.9 + min(30, 5*(5-1)) = 133.4, clamped.
    assert_eq!(prediction.risk_score, 100.0);
    assert_eq!(prediction.priority, Priority::Critical);
    assert_eq!(prediction.days_until_expiry, 1);
    assert!(prediction
        .recommended_action
        .contains("immediately or freeze"));
}

#[test]
fn priority_thresholds_match_boundaries_exactly() {
    let engine = RiskEngine::new(RiskConfig::default());

    assert_eq!(engine.priority_for(100.0), Priority::Critical);
    assert_eq!(engine.priority_for(80.0), Priority::Critical);
    assert_eq!(engine.priority_for(79.99), Priority::High);
    assert_eq!(engine.priority_for(60.0), Priority::High);
    assert_eq!(engine.priority_for(59.99), Priority::Medium);
    assert_eq!(engine.priority_for(40.0), Priority::Medium);
    assert_eq!(engine.priority_for(39.99), Priority::Low);
    assert_eq!(engine.priority_for(0.0), Priority::Low);
}

#[test]
fn items_without_expiration_are_excluded_not_zero_scored() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-rice",
        "Rice",
        FoodCategory::Grain,
        2.0,
        QuantityUnit::Kg,
        date(2025, 1, 1),
        None,
        ItemStatus::Fresh,
    ));

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds");

    assert!(predictions.is_empty());
}

#[test]
fn hundred_is_reserved_for_items_past_their_date() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-expired",
        "Old Leftovers",
        FoodCategory::Other,
        1.0,
        QuantityUnit::Piece,
        date(2025, 1, 5),
        Some(date(2025, 1, 14)),
        ItemStatus::Expired,
    ));
    harness.inventory.push(item(
        "inv-today",
        "Todays Leftovers",
        FoodCategory::Other,
        1.0,
        QuantityUnit::Piece,
        date(2025, 1, 5),
        Some(date(2025, 1, 15)),
        ItemStatus::ExpiringSoon,
    ));

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds");

    let expired = predictions
        .iter()
        .find(|prediction| prediction.inventory_id.0 == "inv-expired")
        .expect("expired item scored");
    let expiring_today = predictions
        .iter()
        .find(|prediction| prediction.inventory_id.0 == "inv-today")
        .expect("today item scored");

    assert_eq!(expired.risk_score, 100.0);
    assert_eq!(expiring_today.risk_score, 90.0);
    assert!(expired.reasoning[0].contains("already expired"));
}

#[test]
fn ranking_orders_older_purchases_first_at_equal_risk() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-new",
        "New Yogurt",
        FoodCategory::Dairy,
        1.0,
        QuantityUnit::Pack,
        date(2025, 1, 14),
        Some(date(2025, 1, 17)),
        ItemStatus::ExpiringSoon,
    ));
    harness.inventory.push(item(
        "inv-old",
        "Old Yogurt",
        FoodCategory::Dairy,
        1.0,
        QuantityUnit::Pack,
        date(2024, 12, 20),
        Some(date(2025, 1, 17)),
        ItemStatus::ExpiringSoon,
    ));

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds");

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].inventory_id.0, "inv-old");
    assert_eq!(predictions[0].risk_score, predictions[1].risk_score);
    assert!(predictions[0].ai_ranking_score > predictions[1].ai_ranking_score);
}

#[test]
fn reasoning_clauses_keep_their_order() {
    let harness = build_service();
    let summer_day = date(2025, 7, 15);

    harness.inventory.push(item(
        "inv-berries",
        "Berries",
        FoodCategory::Fruit,
        5.0,
        QuantityUnit::Cup,
        date(2025, 7, 10),
        Some(date(2025, 7, 17)),
        ItemStatus::ExpiringSoon,
    ));

    // Two fruit dates ten days apart: frequency 10 (> 7), avg_daily 0.5.
    harness.consumption.push(log(
        "log-a",
        "Berries",
        FoodCategory::Fruit,
        0.5,
        QuantityUnit::Cup,
        date(2025, 6, 25),
    ));
    harness.consumption.push(log(
        "log-b",
        "Berries",
        FoodCategory::Fruit,
        0.5,
        QuantityUnit::Cup,
        date(2025, 7, 5),
    ));

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, summer_day)
        .expect("scoring succeeds");

    let reasoning = &predictions[0].reasoning;
    assert_eq!(reasoning.len(), 4);
    assert!(reasoning[0].starts_with("Expires in 2 days"));
    assert!(reasoning[1].contains("expire faster in summer"));
    assert!(reasoning[2].contains("consumption rate"));
    assert!(reasoning[3].contains("infrequently"));

    let sentence = predictions[0].reasoning_sentence();
    assert_eq!(sentence.matches(" | ").count(), 3);
}

#[test]
fn larger_households_lower_the_risk() {
    let single = build_service();
    let family = build_service();
    family.profiles.set(crate::workflows::ledger::domain::HouseholdProfile {
        household_size: 3,
        budget_tier: crate::workflows::ledger::domain::BudgetTier::Medium,
    });

    let pantry_item = || {
        item(
            "inv-bread",
            "Bread",
            FoodCategory::Other,
            1.0,
            QuantityUnit::Piece,
            date(2025, 1, 10),
            Some(date(2025, 1, 20)),
            ItemStatus::Fresh,
        )
    };
    single.inventory.push(pantry_item());
    family.inventory.push(pantry_item());

    let single_score = single
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds")[0]
        .risk_score;
    let family_score = family
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds")[0]
        .risk_score;

    // -5 per additional household member.
    assert_eq!(single_score - family_score, 10.0);
}

#[test]
fn alerts_keep_only_actionable_priorities() {
    let harness = build_service();

    harness.inventory.push(item(
        "inv-canned",
        "Canned Beans",
        FoodCategory::Canned,
        1.0,
        QuantityUnit::Piece,
        date(2025, 1, 1),
        Some(date(2025, 1, 16)),
        ItemStatus::ExpiringSoon,
    ));
    harness.inventory.push(item(
        "inv-meat",
        "Ground Beef",
        FoodCategory::Meat,
        0.5,
        QuantityUnit::Kg,
        date(2025, 1, 12),
        Some(date(2025, 1, 15)),
        ItemStatus::ExpiringSoon,
    ));

    let alerts = harness
        .service
        .high_risk_alerts(&owner(), 10, today())
        .expect("alerts succeed");

    // Canned goods score 90 * 0.3 = 27: below the high threshold.
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].item_name, "Ground Beef");
    assert!(alerts[0].kind.is_actionable());
    assert!(alerts[0].reasoning.contains("Expires in"));
}

#[test]
fn category_summary_rolls_up_predictions() {
    let engine = RiskEngine::new(RiskConfig::default());
    let harness = build_service();

    harness.inventory.push(item(
        "inv-1",
        "Spinach",
        FoodCategory::Vegetable,
        1.0,
        QuantityUnit::Pack,
        date(2025, 1, 10),
        Some(date(2025, 1, 15)),
        ItemStatus::ExpiringSoon,
    ));
    harness.inventory.push(item(
        "inv-2",
        "Kale",
        FoodCategory::Vegetable,
        1.0,
        QuantityUnit::Pack,
        date(2025, 1, 10),
        Some(date(2025, 1, 20)),
        ItemStatus::Fresh,
    ));

    let predictions = harness
        .service
        .score_expiration_risks(&owner(), None, today())
        .expect("scoring succeeds");
    let summary = engine.category_summary(&predictions);

    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].category, FoodCategory::Vegetable);
    assert_eq!(summary[0].total_items, 2);
    assert!(summary[0].avg_risk > 0.0);
}
