//! CSV ledger importer. Accepts inventory and consumption exports with
//! human-edited headers, normalizes names and vocabulary leniently, and
//! derives each inventory row's status from its expiration date.

mod normalizer;
mod parser;

use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

use super::domain::{ConsumptionRecord, InventoryId, InventoryRecord, OwnerId};
use super::status::status_for;

#[derive(Debug)]
pub enum LedgerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, reason: String },
}

impl std::fmt::Display for LedgerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerImportError::Io(err) => write!(f, "failed to read ledger export: {}", err),
            LedgerImportError::Csv(err) => write!(f, "invalid ledger CSV data: {}", err),
            LedgerImportError::Row { line, reason } => {
                write!(f, "invalid ledger row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for LedgerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerImportError::Io(err) => Some(err),
            LedgerImportError::Csv(err) => Some(err),
            LedgerImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for LedgerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct LedgerCsvImporter;

impl LedgerCsvImporter {
    pub fn inventory_from_path<P: AsRef<Path>>(
        path: P,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> Result<Vec<InventoryRecord>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::inventory_from_reader(file, owner, today)
    }

    pub fn inventory_from_reader<R: Read>(
        reader: R,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> Result<Vec<InventoryRecord>, LedgerImportError> {
        let rows = parser::parse_inventory_rows(reader)?;
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let status = status_for(row.expiration_date, today);
            records.push(InventoryRecord {
                id: InventoryId(format!("inv-{:04}", records.len() + 1)),
                owner: owner.clone(),
                item_name: row.item_name,
                category: row.category,
                quantity: row.quantity,
                unit: row.unit,
                purchase_date: row.purchase_date,
                expiration_date: row.expiration_date,
                status,
                notes: row.notes,
            });
        }

        Ok(records)
    }

    pub fn consumption_from_path<P: AsRef<Path>>(
        path: P,
        owner: &OwnerId,
    ) -> Result<Vec<ConsumptionRecord>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::consumption_from_reader(file, owner)
    }

    pub fn consumption_from_reader<R: Read>(
        reader: R,
        owner: &OwnerId,
    ) -> Result<Vec<ConsumptionRecord>, LedgerImportError> {
        let rows = parser::parse_consumption_rows(reader)?;
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            records.push(ConsumptionRecord {
                id: format!("log-{:04}", records.len() + 1),
                owner: owner.clone(),
                item_name: row.item_name,
                category: row.category,
                quantity: row.quantity,
                unit: row.unit,
                date_consumed: row.date_consumed,
                notes: row.notes,
            });
        }

        Ok(records)
    }
}
