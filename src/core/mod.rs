pub mod errors;
pub mod generator;
pub mod ledger_manager;
pub mod services;
pub mod utils;

pub use errors::{LedgerError, Result};
pub use generator::{expand, GeneratedBatch, GenerationLimits, Schedule, TransactionIntent};
pub use ledger_manager::LedgerManager;
