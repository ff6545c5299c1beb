use chrono::NaiveDate;

use super::domain::{InventoryRecord, ItemStatus};

/// Days before expiry during which an item counts as expiring soon.
const EXPIRING_SOON_WINDOW_DAYS: i64 = 3;

/// Derive the date-driven status for an expiration date. Items without a
/// date never leave `Fresh` on their own.
pub fn status_for(expiration_date: Option<NaiveDate>, today: NaiveDate) -> ItemStatus {
    let Some(expiration) = expiration_date else {
        return ItemStatus::Fresh;
    };

    let days_until = (expiration - today).num_days();
    if days_until < 0 {
        ItemStatus::Expired
    } else if days_until <= EXPIRING_SOON_WINDOW_DAYS {
        ItemStatus::ExpiringSoon
    } else {
        ItemStatus::Fresh
    }
}

/// Recompute a record's cached status in place. `Consumed` is a terminal
/// state set by explicit user action and is never overwritten here.
pub fn refresh(record: &mut InventoryRecord, today: NaiveDate) {
    if record.status == ItemStatus::Consumed {
        return;
    }
    record.status = status_for(record.expiration_date, today);
}
