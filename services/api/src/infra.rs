use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use nourish_ai::workflows::advisor::sdg::{ScoreStore, SdgScoreRecord};
use nourish_ai::workflows::ledger::domain::{
    ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile, InventoryRecord, OwnerId,
    QuantityUnit,
};
use nourish_ai::workflows::ledger::stores::{
    ConsumptionStore, FoodCatalog, InventoryStore, ProfileDirectory, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInventoryStore {
    records: Arc<Mutex<Vec<InventoryRecord>>>,
}

impl InMemoryInventoryStore {
    pub(crate) fn extend(&self, records: Vec<InventoryRecord>) {
        self.records
            .lock()
            .expect("inventory mutex poisoned")
            .extend(records);
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<InventoryRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("inventory mutex poisoned")
            .iter()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConsumptionStore {
    records: Arc<Mutex<Vec<ConsumptionRecord>>>,
}

impl InMemoryConsumptionStore {
    pub(crate) fn extend(&self, records: Vec<ConsumptionRecord>) {
        self.records
            .lock()
            .expect("consumption mutex poisoned")
            .extend(records);
    }
}

impl ConsumptionStore for InMemoryConsumptionStore {
    fn list_between(
        &self,
        owner: &OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("consumption mutex poisoned")
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
        self.records
            .lock()
            .expect("consumption mutex poisoned")
            .push(record);
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct InMemoryFoodCatalog {
    entries: Arc<Vec<FoodCatalogEntry>>,
}

impl InMemoryFoodCatalog {
    pub(crate) fn seeded() -> Self {
        Self {
            entries: Arc::new(seed_catalog()),
        }
    }
}

impl FoodCatalog for InMemoryFoodCatalog {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileDirectory {
    profiles: Arc<Mutex<HashMap<OwnerId, HouseholdProfile>>>,
}

impl InMemoryProfileDirectory {
    pub(crate) fn insert(&self, owner: OwnerId, profile: HouseholdProfile) {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(owner, profile);
    }
}

impl ProfileDirectory for InMemoryProfileDirectory {
    fn household_profile(&self, owner: &OwnerId) -> Result<Option<HouseholdProfile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .expect("profile mutex poisoned")
            .get(owner)
            .copied())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreStore {
    records: Arc<Mutex<HashMap<(OwnerId, NaiveDate), SdgScoreRecord>>>,
}

impl ScoreStore for InMemoryScoreStore {
    fn fetch_week(
        &self,
        owner: &OwnerId,
        week_start: NaiveDate,
    ) -> Result<Option<SdgScoreRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("score mutex poisoned")
            .get(&(owner.clone(), week_start))
            .cloned())
    }

    fn upsert_week(&self, record: SdgScoreRecord) -> Result<SdgScoreRecord, StoreError> {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .insert((record.owner.clone(), record.week_start), record.clone());
        Ok(record)
    }

    fn history(&self, owner: &OwnerId, limit: usize) -> Result<Vec<SdgScoreRecord>, StoreError> {
        let mut records: Vec<SdgScoreRecord> = self
            .records
            .lock()
            .expect("score mutex poisoned")
            .values()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect();
        records.sort_by_key(|record| std::cmp::Reverse(record.week_start));
        records.truncate(limit);
        Ok(records)
    }
}

/// Reference catalog shipped with the service. Costs are sample values for
/// planning, not price data.
fn seed_catalog() -> Vec<FoodCatalogEntry> {
    let entry = |name: &str, category, days, cost, unit| FoodCatalogEntry {
        name: name.to_string(),
        category,
        typical_expiration_days: Some(days),
        sample_cost_per_unit: Some(cost),
        unit,
    };

    vec![
        entry("Rolled Oats", FoodCategory::Grain, 180, 2.00, QuantityUnit::Pack),
        entry("Whole Wheat Bread", FoodCategory::Grain, 7, 2.50, QuantityUnit::Piece),
        entry("Brown Rice", FoodCategory::Grain, 365, 1.80, QuantityUnit::Kg),
        entry("Apples", FoodCategory::Fruit, 21, 3.00, QuantityUnit::Kg),
        entry("Bananas", FoodCategory::Fruit, 5, 1.50, QuantityUnit::Kg),
        entry("Oranges", FoodCategory::Fruit, 14, 3.20, QuantityUnit::Kg),
        entry("Whole Milk", FoodCategory::Dairy, 7, 4.00, QuantityUnit::L),
        entry("Greek Yogurt", FoodCategory::Dairy, 14, 4.50, QuantityUnit::Pack),
        entry("Cheddar Cheese", FoodCategory::Dairy, 30, 6.00, QuantityUnit::Pack),
        entry("Chicken Breast", FoodCategory::Meat, 3, 8.00, QuantityUnit::Kg),
        entry("Ground Beef", FoodCategory::Meat, 2, 9.00, QuantityUnit::Kg),
        entry("Salmon Fillet", FoodCategory::Meat, 2, 12.00, QuantityUnit::Kg),
        entry("Carrots", FoodCategory::Vegetable, 21, 2.00, QuantityUnit::Kg),
        entry("Spinach", FoodCategory::Vegetable, 5, 2.50, QuantityUnit::Pack),
        entry("Broccoli", FoodCategory::Vegetable, 7, 2.80, QuantityUnit::Kg),
        entry("Tomatoes", FoodCategory::Vegetable, 7, 3.00, QuantityUnit::Kg),
    ]
}
