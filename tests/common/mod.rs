#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use finance_core::{
    domain::{Account, AccountKind},
    Config, ConfigManager, JsonStorage, LedgerManager, MemoryStorage,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a file-backed manager and config manager inside a unique directory.
pub fn setup_test_env(name: &str) -> (LedgerManager, ConfigManager, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let config = config_manager.load().expect("load default config");
    let ledger_manager =
        LedgerManager::open(Box::new(storage), name, config).expect("open ledger manager");

    (ledger_manager, config_manager, base)
}

/// Memory-backed manager; the returned store handle shares its snapshots.
pub fn memory_manager(config: Config) -> (LedgerManager, MemoryStorage) {
    let store = MemoryStorage::new();
    let manager = LedgerManager::open(Box::new(store.clone()), "test-ledger", config)
        .expect("open memory ledger");
    (manager, store)
}

pub fn checking_account(manager: &mut LedgerManager, balance: Decimal) -> Uuid {
    manager
        .add_account(Account::new("Checking", AccountKind::Checking).with_opening_balance(balance))
        .expect("add checking account")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
