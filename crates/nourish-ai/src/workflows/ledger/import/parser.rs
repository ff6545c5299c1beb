use super::normalizer::normalize_name;
use crate::workflows::ledger::domain::{FoodCategory, QuantityUnit};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct InventoryRow {
    pub(crate) item_name: String,
    pub(crate) category: FoodCategory,
    pub(crate) quantity: f64,
    pub(crate) unit: QuantityUnit,
    pub(crate) purchase_date: NaiveDate,
    pub(crate) expiration_date: Option<NaiveDate>,
    pub(crate) notes: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ConsumptionRow {
    pub(crate) item_name: String,
    pub(crate) category: FoodCategory,
    pub(crate) quantity: f64,
    pub(crate) unit: QuantityUnit,
    pub(crate) date_consumed: NaiveDate,
    pub(crate) notes: Option<String>,
}

pub(crate) fn parse_inventory_rows<R: Read>(
    reader: R,
) -> Result<Vec<InventoryRow>, super::LedgerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawInventoryRow>().enumerate() {
        let raw = record?;
        let line = (index + 2) as u64;
        rows.push(raw.into_row(line)?);
    }

    Ok(rows)
}

pub(crate) fn parse_consumption_rows<R: Read>(
    reader: R,
) -> Result<Vec<ConsumptionRow>, super::LedgerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawConsumptionRow>().enumerate() {
        let raw = record?;
        let line = (index + 2) as u64;
        rows.push(raw.into_row(line)?);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawInventoryRow {
    #[serde(rename = "Item Name")]
    item_name: String,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: f64,
    #[serde(rename = "Unit", default)]
    unit: Option<String>,
    #[serde(rename = "Purchase Date")]
    purchase_date: String,
    #[serde(rename = "Expiration Date", default, deserialize_with = "empty_string_as_none")]
    expiration_date: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl RawInventoryRow {
    fn into_row(self, line: u64) -> Result<InventoryRow, super::LedgerImportError> {
        let purchase_date = parse_date(&self.purchase_date, line, "Purchase Date")?;
        let expiration_date = self
            .expiration_date
            .as_deref()
            .map(|raw| parse_date(raw, line, "Expiration Date"))
            .transpose()?;

        Ok(InventoryRow {
            item_name: normalize_name(&self.item_name),
            category: FoodCategory::parse_lenient(self.category.as_deref().unwrap_or("")),
            quantity: self.quantity,
            unit: QuantityUnit::parse_lenient(self.unit.as_deref().unwrap_or("")),
            purchase_date,
            expiration_date,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawConsumptionRow {
    #[serde(rename = "Item Name")]
    item_name: String,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: f64,
    #[serde(rename = "Unit", default)]
    unit: Option<String>,
    #[serde(rename = "Date Consumed")]
    date_consumed: String,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl RawConsumptionRow {
    fn into_row(self, line: u64) -> Result<ConsumptionRow, super::LedgerImportError> {
        let date_consumed = parse_date(&self.date_consumed, line, "Date Consumed")?;

        Ok(ConsumptionRow {
            item_name: normalize_name(&self.item_name),
            category: FoodCategory::parse_lenient(self.category.as_deref().unwrap_or("")),
            quantity: self.quantity,
            unit: QuantityUnit::parse_lenient(self.unit.as_deref().unwrap_or("")),
            date_consumed,
            notes: self.notes,
        })
    }
}

fn parse_date(raw: &str, line: u64, field: &str) -> Result<NaiveDate, super::LedgerImportError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| {
        super::LedgerImportError::Row {
            line,
            reason: format!("{field} '{raw}' is not YYYY-MM-DD ({err})"),
        }
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}
