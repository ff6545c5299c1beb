use chrono::NaiveDate;

use super::domain::{
    ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile, InventoryRecord,
    ItemStatus, OwnerId,
};

/// Error enumeration for collaborator store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to a household's inventory ledger. All queries are
/// owner-scoped; the advisory engines never write inventory.
pub trait InventoryStore: Send + Sync {
    fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<InventoryRecord>, StoreError>;

    fn list_with_status(
        &self,
        owner: &OwnerId,
        status: ItemStatus,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        let mut records = self.list_for_owner(owner)?;
        records.retain(|record| record.status == status);
        Ok(records)
    }

    fn list_purchased_since(
        &self,
        owner: &OwnerId,
        since: NaiveDate,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        let mut records = self.list_for_owner(owner)?;
        records.retain(|record| record.purchase_date >= since);
        Ok(records)
    }
}

/// Read access to the consumption log, plus append for calling code. The
/// advisory engines only read; writes belong to intake collaborators.
pub trait ConsumptionStore: Send + Sync {
    fn list_between(
        &self,
        owner: &OwnerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>, StoreError>;

    fn append(&self, record: ConsumptionRecord) -> Result<(), StoreError>;
}

/// Reference catalog of purchasable food items.
pub trait FoodCatalog: Send + Sync {
    fn list_by_category(&self, category: FoodCategory) -> Result<Vec<FoodCatalogEntry>, StoreError>;

    fn find_by_prefix(&self, prefix: &str) -> Result<Vec<FoodCatalogEntry>, StoreError>;
}

/// Lookup for the profile fields the engines need. A missing profile is not
/// an error; defaults apply (single-person household, medium budget).
pub trait ProfileDirectory: Send + Sync {
    fn household_profile(&self, owner: &OwnerId) -> Result<Option<HouseholdProfile>, StoreError>;
}
