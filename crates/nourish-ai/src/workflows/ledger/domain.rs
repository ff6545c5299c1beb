use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the household that owns a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Identifier wrapper for a single inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryId(pub String);

/// Food categories shared by inventory, consumption logs, and the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Vegetable,
    Fruit,
    Dairy,
    Meat,
    Grain,
    Beverage,
    Snack,
    Frozen,
    Canned,
    Other,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 10] = [
        FoodCategory::Vegetable,
        FoodCategory::Fruit,
        FoodCategory::Dairy,
        FoodCategory::Meat,
        FoodCategory::Grain,
        FoodCategory::Beverage,
        FoodCategory::Snack,
        FoodCategory::Frozen,
        FoodCategory::Canned,
        FoodCategory::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Meat => "meat",
            FoodCategory::Grain => "grain",
            FoodCategory::Beverage => "beverage",
            FoodCategory::Snack => "snack",
            FoodCategory::Frozen => "frozen",
            FoodCategory::Canned => "canned",
            FoodCategory::Other => "other",
        }
    }

    /// Lenient parser for ledger imports; anything unrecognized is `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "vegetable" | "vegetables" | "veg" => FoodCategory::Vegetable,
            "fruit" | "fruits" => FoodCategory::Fruit,
            "dairy" => FoodCategory::Dairy,
            "meat" | "poultry" | "fish" => FoodCategory::Meat,
            "grain" | "grains" | "bread" => FoodCategory::Grain,
            "beverage" | "beverages" | "drink" => FoodCategory::Beverage,
            "snack" | "snacks" => FoodCategory::Snack,
            "frozen" => FoodCategory::Frozen,
            "canned" => FoodCategory::Canned,
            _ => FoodCategory::Other,
        }
    }
}

/// Units accepted on ledger rows. Unknown units deserialize to `Other` and
/// normalize with the default gram approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityUnit {
    Kg,
    G,
    Lb,
    Oz,
    L,
    Ml,
    Cup,
    Piece,
    Serving,
    Pack,
    #[serde(other)]
    Other,
}

impl QuantityUnit {
    pub const fn label(self) -> &'static str {
        match self {
            QuantityUnit::Kg => "kg",
            QuantityUnit::G => "g",
            QuantityUnit::Lb => "lb",
            QuantityUnit::Oz => "oz",
            QuantityUnit::L => "l",
            QuantityUnit::Ml => "ml",
            QuantityUnit::Cup => "cup",
            QuantityUnit::Piece => "piece",
            QuantityUnit::Serving => "serving",
            QuantityUnit::Pack => "pack",
            QuantityUnit::Other => "unit",
        }
    }

    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilogram" => QuantityUnit::Kg,
            "g" | "gram" | "grams" => QuantityUnit::G,
            "lb" | "pound" => QuantityUnit::Lb,
            "oz" | "ounce" => QuantityUnit::Oz,
            "l" | "liter" | "litre" => QuantityUnit::L,
            "ml" | "milliliter" => QuantityUnit::Ml,
            "cup" | "cups" => QuantityUnit::Cup,
            "piece" | "pieces" | "pc" => QuantityUnit::Piece,
            "serving" | "servings" => QuantityUnit::Serving,
            "pack" | "packs" => QuantityUnit::Pack,
            _ => QuantityUnit::Other,
        }
    }
}

/// Lifecycle of an inventory record. `Consumed` is terminal; the date-driven
/// states are recomputed by [`super::status::status_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Fresh,
    ExpiringSoon,
    Expired,
    Consumed,
}

impl ItemStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ItemStatus::Fresh => "fresh",
            ItemStatus::ExpiringSoon => "expiring_soon",
            ItemStatus::Expired => "expired",
            ItemStatus::Consumed => "consumed",
        }
    }
}

/// One purchased item in a household's inventory. Owned by the persistence
/// collaborator; read-only to the advisory engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub owner: OwnerId,
    pub item_name: String,
    pub category: FoodCategory,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub purchase_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One logged consumption event. Append-only from the core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub id: String,
    pub owner: OwnerId,
    pub item_name: String,
    pub category: FoodCategory,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub date_consumed: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Reference data describing a purchasable food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCatalogEntry {
    pub name: String,
    pub category: FoodCategory,
    pub typical_expiration_days: Option<u32>,
    pub sample_cost_per_unit: Option<f64>,
    pub unit: QuantityUnit,
}

/// Spending tier used to derive a default meal-plan budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

/// The slice of an owner's profile the advisory engines consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdProfile {
    pub household_size: u32,
    pub budget_tier: BudgetTier,
}

impl Default for HouseholdProfile {
    fn default() -> Self {
        Self {
            household_size: 1,
            budget_tier: BudgetTier::Medium,
        }
    }
}
