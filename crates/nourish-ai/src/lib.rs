//! Core advisory engines for household food management: expiration risk
//! scoring, waste estimation, SDG impact scoring, and budget meal planning.
//!
//! The crate owns no persistence. Inventory, consumption logs, the food
//! catalog, and score snapshots are reached through the store traits in
//! [`workflows::ledger::stores`], so callers decide where records live.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
