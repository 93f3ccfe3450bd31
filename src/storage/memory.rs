use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::errors::{LedgerError, Result};
use crate::domain::Ledger;

use super::{canonical_name, ensure_schema_supported, StorageBackend};

#[derive(Debug, Default)]
struct MemoryData {
    ledgers: HashMap<String, Ledger>,
    /// Per ledger, oldest first.
    backups: HashMap<String, Vec<(String, Ledger)>>,
}

/// Process-local store used by tests and embedders that persist elsewhere.
///
/// Clones share the same snapshots, so a test can keep a handle while the
/// manager owns the boxed backend. [`MemoryStorage::set_available`] simulates
/// an outage: every call fails with [`LedgerError::StoreUnavailable`] until the
/// store is switched back on.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryData>>,
    offline: Arc<AtomicBool>,
    sequence: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    /// Last saved snapshot, bypassing the availability switch.
    pub fn snapshot(&self, name: &str) -> Option<Ledger> {
        self.inner.lock().ledgers.get(&canonical_name(name)).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(LedgerError::StoreUnavailable(
                "memory store is offline".into(),
            ))
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        self.check_available()?;
        self.inner
            .lock()
            .ledgers
            .insert(canonical_name(name), ledger.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        self.check_available()?;
        let ledger = self
            .snapshot(name)
            .ok_or_else(|| LedgerError::StoreUnavailable(format!("ledger `{}` not found", name)))?;
        ensure_schema_supported(&ledger)?;
        Ok(ledger)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self.inner.lock().ledgers.contains_key(&canonical_name(name)))
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        self.check_available()?;
        let key = canonical_name(name);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let backup_name = match note.map(str::trim).filter(|note| !note.is_empty()) {
            Some(note) => format!("{}_{:04}_{}", key, sequence, note),
            None => format!("{}_{:04}", key, sequence),
        };
        self.inner
            .lock()
            .backups
            .entry(key)
            .or_default()
            .push((backup_name.clone(), ledger.clone()));
        Ok(backup_name)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.check_available()?;
        let data = self.inner.lock();
        Ok(data
            .backups
            .get(&canonical_name(name))
            .map(|backups| backups.iter().rev().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default())
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        self.check_available()?;
        let key = canonical_name(name);
        let mut data = self.inner.lock();
        let ledger = data
            .backups
            .get(&key)
            .and_then(|backups| backups.iter().find(|(id, _)| id == backup_name))
            .map(|(_, ledger)| ledger.clone())
            .ok_or_else(|| {
                LedgerError::StoreUnavailable(format!("backup `{}` not found", backup_name))
            })?;
        data.ledgers.insert(key, ledger.clone());
        Ok(ledger)
    }
}
