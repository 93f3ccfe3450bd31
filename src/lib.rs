#![doc(test(attr(deny(warnings))))]

//! Finance Core is the ledger engine behind a personal-finance application:
//! it expands user entries into installment and recurring rows, reconciles
//! payments against account balances and aggregates entries with exact decimals.
//!
//! ```no_run
//! use finance_core::{Config, JsonStorage, LedgerManager, TransactionIntent};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! # fn main() -> finance_core::Result<()> {
//! finance_core::init();
//! let storage = JsonStorage::new_default()?;
//! let mut manager = LedgerManager::open(Box::new(storage), "household", Config::default())?;
//! let due = NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date");
//! let intent = TransactionIntent::expense("Sofa", Decimal::new(45000, 2), due).with_installments(3);
//! manager.create_entry(&intent)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

pub use crate::config::{Config, ConfigManager};
pub use crate::core::errors::{LedgerError, Result};
pub use crate::core::generator::{GeneratedBatch, GenerationLimits, Schedule, TransactionIntent};
pub use crate::core::ledger_manager::LedgerManager;
pub use crate::core::services::{CreateOutcome, PaymentOutcome, UnlinkedPaymentPolicy};
pub use crate::storage::{JsonStorage, MemoryStorage, StorageBackend};

/// Initializes global tracing. Repeated calls are no-ops.
pub fn init() {
    utils::init_tracing();
}
