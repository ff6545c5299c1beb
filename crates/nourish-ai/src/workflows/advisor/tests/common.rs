use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::advisor::sdg::{ScoreStore, SdgScoreRecord};
use crate::workflows::advisor::service::{AdvisorConfig, AdvisorService, AdvisorStores};
use crate::workflows::advisor::textgen::{GenerationError, TextGenerator};
use crate::workflows::ledger::domain::{
    ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile, InventoryId,
    InventoryRecord, ItemStatus, OwnerId, QuantityUnit,
};
use crate::workflows::ledger::stores::{
    ConsumptionStore, FoodCatalog, InventoryStore, ProfileDirectory, StoreError,
};

pub(super) fn owner() -> OwnerId {
    OwnerId("owner-1".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A winter Wednesday, so seasonal factors and Monday alignment are both
/// exercised.
pub(super) fn today() -> NaiveDate {
    date(2025, 1, 15)
}

pub(super) fn item(
    id: &str,
    name: &str,
    category: FoodCategory,
    quantity: f64,
    unit: QuantityUnit,
    purchase_date: NaiveDate,
    expiration_date: Option<NaiveDate>,
    status: ItemStatus,
) -> InventoryRecord {
    InventoryRecord {
        id: InventoryId(id.to_string()),
        owner: owner(),
        item_name: name.to_string(),
        category,
        quantity,
        unit,
        purchase_date,
        expiration_date,
        status,
        notes: None,
    }
}

pub(super) fn log(
    id: &str,
    name: &str,
    category: FoodCategory,
    quantity: f64,
    unit: QuantityUnit,
    date_consumed: NaiveDate,
) -> ConsumptionRecord {
    ConsumptionRecord {
        id: id.to_string(),
        owner: owner(),
        item_name: name.to_string(),
        category,
        quantity,
        unit,
        date_consumed,
        notes: None,
    }
}

#[derive(Default)]
pub(super) struct MemoryInventory {
    records: Mutex<Vec<InventoryRecord>>,
}

impl MemoryInventory {
    pub(super) fn push(&self, record: InventoryRecord) {
        self.records.lock().expect("lock").push(record);
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
pub(super) struct MemoryConsumption {
    records: Mutex<Vec<ConsumptionRecord>>,
}

impl MemoryConsumption {
    pub(super) fn push(&self, record: ConsumptionRecord) {
        self.records.lock().expect("lock").push(record);
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
        self.push(record);
        Ok(())
    }
}

pub(super) struct MemoryCatalog {
    entries: Vec<FoodCatalogEntry>,
}

impl MemoryCatalog {
    pub(super) fn new(entries: Vec<FoodCatalogEntry>) -> Self {
        Self { entries }
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

pub(super) fn catalog_entry(
    name: &str,
    category: FoodCategory,
    cost: f64,
) -> FoodCatalogEntry {
    FoodCatalogEntry {
        name: name.to_string(),
        category,
        typical_expiration_days: Some(7),
        sample_cost_per_unit: Some(cost),
        unit: QuantityUnit::Serving,
    }
}

pub(super) fn standard_catalog() -> Vec<FoodCatalogEntry> {
    vec![
        catalog_entry("Rolled Oats", FoodCategory::Grain, 2.0),
        catalog_entry("Apples", FoodCategory::Fruit, 3.0),
        catalog_entry("Milk", FoodCategory::Dairy, 4.0),
        catalog_entry("Carrots", FoodCategory::Vegetable, 2.5),
        catalog_entry("Chicken Breast", FoodCategory::Meat, 8.0),
    ]
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profile: Mutex<Option<HouseholdProfile>>,
}

impl MemoryProfiles {
    pub(super) fn set(&self, profile: HouseholdProfile) {
        *self.profile.lock().expect("lock") = Some(profile);
    }
}

impl ProfileDirectory for MemoryProfiles {
    fn household_profile(&self, _: &OwnerId) -> Result<Option<HouseholdProfile>, StoreError> {
        Ok(*self.profile.lock().expect("lock"))
    }
}

#[derive(Default)]
pub(super) struct MemoryScores {
    records: Mutex<HashMap<(OwnerId, NaiveDate), SdgScoreRecord>>,
}

impl MemoryScores {
    pub(super) fn len(&self) -> usize {
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

    fn history(&self, owner: &OwnerId, limit: usize) -> Result<Vec<SdgScoreRecord>, StoreError> {
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

/// Text generator double: a scripted reply or a scripted failure.
pub(super) struct ScriptedTextGenerator {
    response: Result<String, ()>,
}

impl ScriptedTextGenerator {
    pub(super) fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
        }
    }

    pub(super) fn failing() -> Self {
        Self { response: Err(()) }
    }
}

impl TextGenerator for ScriptedTextGenerator {
    fn generate(&self, _: &str, _: &str, _: &str) -> Result<String, GenerationError> {
        self.response
            .clone()
            .map_err(|_| GenerationError::Transport("scripted outage".to_string()))
    }
}

pub(super) struct Harness {
    pub(super) service: Arc<AdvisorService>,
    pub(super) inventory: Arc<MemoryInventory>,
    pub(super) consumption: Arc<MemoryConsumption>,
    pub(super) profiles: Arc<MemoryProfiles>,
    pub(super) scores: Arc<MemoryScores>,
}

pub(super) fn build_service() -> Harness {
    build_service_with(AdvisorConfig::default(), None)
}

pub(super) fn build_service_with(
    config: AdvisorConfig,
    textgen: Option<Arc<dyn TextGenerator>>,
) -> Harness {
    let inventory = Arc::new(MemoryInventory::default());
    let consumption = Arc::new(MemoryConsumption::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let scores = Arc::new(MemoryScores::default());
    let catalog = Arc::new(MemoryCatalog::new(standard_catalog()));

    let stores = AdvisorStores {
        inventory: inventory.clone(),
        consumption: consumption.clone(),
        catalog,
        profiles: profiles.clone(),
        scores: scores.clone(),
    };

    let service = match textgen {
        Some(textgen) => AdvisorService::with_text_generator(stores, config, textgen),
        None => AdvisorService::new(stores, config),
    };

    Harness {
        service: Arc::new(service),
        inventory,
        consumption,
        profiles,
        scores,
    }
}
