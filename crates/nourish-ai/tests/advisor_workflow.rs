//! Integration scenarios for the advisory pipeline, driven end to end
//! through the public service facade and HTTP router: CSV ledger import,
//! risk scoring, waste estimation, weekly SDG persistence, and meal
//! planning against in-memory collaborator stores.

mod common {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use nourish_ai::workflows::advisor::sdg::{ScoreStore, SdgScoreRecord};
    use nourish_ai::workflows::advisor::service::{
        AdvisorConfig, AdvisorService, AdvisorStores,
    };
    use nourish_ai::workflows::ledger::domain::{
        BudgetTier, ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile,
        InventoryRecord, OwnerId, QuantityUnit,
    };
    use nourish_ai::workflows::ledger::import::LedgerCsvImporter;
    use nourish_ai::workflows::ledger::stores::{
        ConsumptionStore, FoodCatalog, InventoryStore, ProfileDirectory, StoreError,
    };

    pub(crate) fn owner() -> OwnerId {
        OwnerId("household-42".to_string())
    }

    pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    pub(crate) fn today() -> NaiveDate {
        date(2025, 3, 12)
    }

    #[derive(Default)]
    pub(crate) struct MemoryInventory {
        records: Mutex<Vec<InventoryRecord>>,
    }

    impl MemoryInventory {
        pub(crate) fn extend(&self, records: Vec<InventoryRecord>) {
            self.records.lock().expect("lock").extend(records);
        }
    }

    impl InventoryStore for MemoryInventory {
        fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<InventoryRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .filter(|record| &record.owner == owner)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryConsumption {
        records: Mutex<Vec<ConsumptionRecord>>,
    }

    impl MemoryConsumption {
        pub(crate) fn extend(&self, records: Vec<ConsumptionRecord>) {
            self.records.lock().expect("lock").extend(records);
        }
    }

    impl ConsumptionStore for MemoryConsumption {
        fn list_between(
            &self,
            owner: &OwnerId,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<ConsumptionRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .iter()
                .filter(|record| {
                    &record.owner == owner
                        && record.date_consumed >= from
                        && record.date_consumed <= to
                })
                .cloned()
                .collect())
        }

        fn append(&self, record: ConsumptionRecord) -> Result<(), StoreError> {
            self.records.lock().expect("lock").push(record);
            Ok(())
        }
    }

    pub(crate) struct MemoryCatalog {
        entries: Vec<FoodCatalogEntry>,
    }

    impl Default for MemoryCatalog {
        fn default() -> Self {
            let entry = |name: &str, category, cost| FoodCatalogEntry {
                name: name.to_string(),
                category,
                typical_expiration_days: Some(14),
                sample_cost_per_unit: Some(cost),
                unit: QuantityUnit::Serving,
            };

            Self {
                entries: vec![
                    entry("Rolled Oats", FoodCategory::Grain, 2.0),
                    entry("Apples", FoodCategory::Fruit, 3.0),
                    entry("Whole Milk", FoodCategory::Dairy, 4.0),
                    entry("Carrots", FoodCategory::Vegetable, 2.5),
                    entry("Chicken Breast", FoodCategory::Meat, 8.0),
                ],
            }
        }
    }

    impl FoodCatalog for MemoryCatalog {
        fn list_by_category(
            &self,
            category: FoodCategory,
        ) -> Result<Vec<FoodCatalogEntry>, StoreError> {
            Ok(self
                .entries
                .iter()
                .filter(|entry| entry.category == category)
                .cloned()
                .collect())
        }

        fn find_by_prefix(&self, prefix: &str) -> Result<Vec<FoodCatalogEntry>, StoreError> {
            let prefix = prefix.to_ascii_lowercase();
            Ok(self
                .entries
                .iter()
                .filter(|entry| entry.name.to_ascii_lowercase().starts_with(&prefix))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryProfiles;

    impl ProfileDirectory for MemoryProfiles {
        fn household_profile(
            &self,
            _: &OwnerId,
        ) -> Result<Option<HouseholdProfile>, StoreError> {
            Ok(Some(HouseholdProfile {
                household_size: 2,
                budget_tier: BudgetTier::Low,
            }))
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryScores {
        records: Mutex<HashMap<(OwnerId, NaiveDate), SdgScoreRecord>>,
    }

    impl MemoryScores {
        pub(crate) fn len(&self) -> usize {
            self.records.lock().expect("lock").len()
        }
    }

    impl ScoreStore for MemoryScores {
        fn fetch_week(
            &self,
            owner: &OwnerId,
            week_start: NaiveDate,
        ) -> Result<Option<SdgScoreRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .get(&(owner.clone(), week_start))
                .cloned())
        }

        fn upsert_week(&self, record: SdgScoreRecord) -> Result<SdgScoreRecord, StoreError> {
            self.records
                .lock()
                .expect("lock")
                .insert((record.owner.clone(), record.week_start), record.clone());
            Ok(record)
        }

        fn history(
            &self,
            owner: &OwnerId,
            limit: usize,
        ) -> Result<Vec<SdgScoreRecord>, StoreError> {
            let mut records: Vec<SdgScoreRecord> = self
                .records
                .lock()
                .expect("lock")
                .values()
                .filter(|record| &record.owner == owner)
                .cloned()
                .collect();
            records.sort_by_key(|record| std::cmp::Reverse(record.week_start));
            records.truncate(limit);
            Ok(records)
        }
    }

    const INVENTORY_CSV: &str = "\
Item Name,Category,Quantity,Unit,Purchase Date,Expiration Date,Notes
Whole Milk,dairy,1,l,2025-03-07,2025-03-13,
Spinach,vegetable,1,pack,2025-03-06,2025-03-13,
Chicken Breast,meat,0.6,kg,2025-03-10,2025-03-14,
Old Lettuce,vegetable,1,pack,2025-03-01,2025-03-10,
Brown Rice,grain,2,kg,2025-02-20,,pantry staple
";

    const CONSUMPTION_CSV: &str = "\
Item Name,Category,Quantity,Unit,Date Consumed,Notes
Milk,dairy,0.3,l,2025-03-09,
Milk,dairy,0.3,l,2025-03-11,
Apples,fruit,2,piece,2025-03-10,
Salad,vegetable,1,serving,2025-03-11,
Bread,grain,2,piece,2025-03-08,
";

    pub(crate) struct Harness {
        pub(crate) service: Arc<AdvisorService>,
        pub(crate) scores: Arc<MemoryScores>,
    }

    pub(crate) fn build_harness() -> Harness {
        let inventory = Arc::new(MemoryInventory::default());
        let consumption = Arc::new(MemoryConsumption::default());
        let scores = Arc::new(MemoryScores::default());

        let records =
            LedgerCsvImporter::inventory_from_reader(Cursor::new(INVENTORY_CSV), &owner(), today())
                .expect("inventory import");
        inventory.extend(records);

        let logs =
            LedgerCsvImporter::consumption_from_reader(Cursor::new(CONSUMPTION_CSV), &owner())
                .expect("consumption import");
        consumption.extend(logs);

        let stores = AdvisorStores {
            inventory,
            consumption,
            catalog: Arc::new(MemoryCatalog::default()),
            profiles: Arc::new(MemoryProfiles),
            scores: scores.clone(),
        };

        Harness {
            service: Arc::new(AdvisorService::new(stores, AdvisorConfig::default())),
            scores,
        }
    }
}

mod risks {
    use super::common::*;
    use nourish_ai::workflows::advisor::risk::Priority;

    #[test]
    fn imported_ledger_produces_ranked_predictions() {
        let harness = build_harness();

        let predictions = harness
            .service
            .score_expiration_risks(&owner(), None, today())
            .expect("scoring succeeds");

        // Four dated items inside the horizon; the rice has no date and is
        // excluded rather than zero-scored.
        assert_eq!(predictions.len(), 4);
        assert!(predictions
            .windows(2)
            .all(|pair| pair[0].ai_ranking_score >= pair[1].ai_ranking_score));
        assert!(predictions
            .iter()
            .all(|prediction| (0.0..=100.0).contains(&prediction.risk_score)));

        let expired = predictions
            .iter()
            .find(|prediction| prediction.item_name == "Old Lettuce")
            .expect("expired item scored");
        assert_eq!(expired.priority, Priority::Critical);
    }

    #[test]
    fn alerts_are_a_subset_of_predictions() {
        let harness = build_harness();

        let alerts = harness
            .service
            .high_risk_alerts(&owner(), 2, today())
            .expect("alerts succeed");

        assert!(alerts.len() <= 2);
        assert!(alerts.iter().all(|alert| alert.kind.is_actionable()));
    }
}

mod sdg {
    use super::common::*;
    use nourish_ai::workflows::advisor::sdg::ScoreTrend;

    #[test]
    fn weekly_save_is_an_upsert() {
        let harness = build_harness();

        let first = harness
            .service
            .save_weekly_score(&owner(), None, today())
            .expect("first save");
        let second = harness
            .service
            .save_weekly_score(&owner(), None, today())
            .expect("second save");

        assert_eq!(harness.scores.len(), 1);
        assert_eq!(first.overall_score, second.overall_score);
        // 2025-03-12 is a Wednesday.
        assert_eq!(first.week_start, date(2025, 3, 10));
    }

    #[test]
    fn first_week_reports_a_new_trend_then_a_comparison() {
        let harness = build_harness();

        let score = harness
            .service
            .compute_sdg_score(&owner(), None, today())
            .expect("first computation");
        assert_eq!(score.improvement.trend, ScoreTrend::New);

        // Persist last week, then recompute this week against it.
        harness
            .service
            .save_weekly_score(&owner(), Some(date(2025, 3, 3)), today())
            .expect("persist prior week");
        let score = harness
            .service
            .compute_sdg_score(&owner(), None, today())
            .expect("second computation");
        assert_ne!(score.improvement.trend, ScoreTrend::New);
    }
}

mod planning {
    use super::common::*;

    #[test]
    fn plan_respects_the_profile_budget_tier() {
        let harness = build_harness();

        let plan = harness
            .service
            .optimize_meal_plan(&owner(), None, false)
            .expect("plan builds");

        // Low tier default budget.
        assert_eq!(plan.budget_limit, 50.0);
        assert!(plan.total_cost <= plan.budget_limit);
        assert_eq!(plan.days.len(), 7);
        assert!(plan.waste_reduction_count >= 1);
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use nourish_ai::workflows::advisor::router::advisor_router;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn risk_endpoint_serves_the_imported_ledger() {
        let harness = build_harness();
        let router = advisor_router(harness.service.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/advisor/household-42/risks?today=2025-03-12")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload.as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn unknown_owner_returns_empty_results_not_errors() {
        let harness = build_harness();
        let router = advisor_router(harness.service.clone());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/advisor/nobody/risks?today=2025-03-12")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload.as_array().map(Vec::len), Some(0));
    }
}
