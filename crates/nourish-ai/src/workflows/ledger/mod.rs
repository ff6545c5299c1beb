//! Owner-scoped food ledger: the domain records the advisory engines read,
//! the collaborator store traits that serve them, and the CSV importer used
//! to load ledgers from exports.

pub mod domain;
pub mod import;
pub mod status;
pub mod stores;
pub mod units;

pub use domain::{
    BudgetTier, ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile, InventoryId,
    InventoryRecord, ItemStatus, OwnerId, QuantityUnit,
};
pub use import::{LedgerCsvImporter, LedgerImportError};
pub use status::status_for;
pub use stores::{ConsumptionStore, FoodCatalog, InventoryStore, ProfileDirectory, StoreError};
pub use units::to_grams;
