pub mod json_backend;
pub mod memory;

use crate::core::errors::{LedgerError, Result};
use crate::domain::{Ledger, CURRENT_SCHEMA_VERSION};

/// Abstraction over persistence backends capable of storing ledgers and snapshots.
///
/// Every failure surfaces as [`LedgerError::StoreUnavailable`].
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn exists(&self, name: &str) -> Result<bool>;
    /// Stores a named snapshot and returns its backup identifier.
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String>;
    /// Backup identifiers, newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

/// Lower-cased file-system friendly form of a ledger name.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

pub(crate) fn ensure_schema_supported(ledger: &Ledger) -> Result<()> {
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::StoreUnavailable(format!(
            "ledger schema v{} is newer than supported v{}",
            ledger.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}
