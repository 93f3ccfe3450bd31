use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{
    core::{
        errors::{LedgerError, Result},
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    domain::Ledger,
};

use super::{canonical_name, ensure_schema_supported, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;
pub const DEFAULT_RETENTION: usize = 5;

/// File-backed store: one pretty-printed snapshot per ledger plus rotating backups.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), BACKUP_EXTENSION))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Resolves `backup_name` inside this ledger's backup directory, refusing
    /// anything that is not a plain `<canonical>_....json` file name.
    fn checked_backup_path(&self, name: &str, backup_name: &str) -> Result<PathBuf> {
        let prefix = format!("{}_", canonical_name(name));
        let plain = !backup_name.contains(|c| c == '/' || c == '\\') && !backup_name.contains("..");
        let owned = backup_name.starts_with(&prefix)
            && backup_name.ends_with(&format!(".{}", BACKUP_EXTENSION));
        if !plain || !owned {
            return Err(LedgerError::invalid(format!(
                "`{}` is not a backup of ledger `{}`",
                backup_name, name
            )));
        }
        Ok(self.backup_path(name, backup_name))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_file_name(name: &str, note: Option<&str>) -> String {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        format!("{}.{}", file_stem, BACKUP_EXTENSION)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        fs::copy(path, dir.join(Self::backup_file_name(name, None)))?;
        self.prune_backups(name)
    }

    /// Keeps the newest `retention` automatic backups and, separately, the
    /// newest `retention` labelled ones.
    fn prune_backups(&self, name: &str) -> Result<()> {
        let prefix = format!("{}_", canonical_name(name));
        let (labelled, automatic): (Vec<String>, Vec<String>) = self
            .list_backups(name)?
            .into_iter()
            .partition(|file_name| has_backup_note(file_name, &prefix));
        let stale = automatic
            .iter()
            .skip(self.retention)
            .chain(labelled.iter().skip(self.retention));
        for stale in stale {
            if let Err(err) = fs::remove_file(self.backup_path(name, stale)) {
                tracing::warn!(backup = %stale, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        tracing::debug!(path = %path.display(), entries = ledger.entry_count(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(LedgerError::StoreUnavailable(format!(
                "ledger `{}` not found",
                name
            )));
        }
        load_ledger_from_path(&path)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.ledger_path(name).exists())
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let file_name = Self::backup_file_name(name, note);
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&dir.join(&file_name), &json)?;
        self.prune_backups(name)?;
        Ok(file_name)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", canonical_name(name));
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            entries.push(file_name.to_string());
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b, &prefix)
                .cmp(&parse_backup_timestamp(a, &prefix))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let backup_path = self.checked_backup_path(name, backup_name)?;
        if !backup_path.exists() {
            return Err(LedgerError::StoreUnavailable(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let ledger = load_ledger_from_path(&backup_path)?;
        let target = self.ledger_path(name);
        save_ledger_to_path(&ledger, &target)?;
        tracing::info!(ledger = name, backup = backup_name, "ledger restored from backup");
        Ok(ledger)
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    ensure_schema_supported(&ledger)?;
    Ok(ledger)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whether a backup file name carries a `_note` after its timestamp.
fn has_backup_note(file_name: &str, prefix: &str) -> bool {
    file_name
        .strip_prefix(prefix)
        .and_then(|rest| rest.get(BACKUP_TIMESTAMP_LEN..))
        .is_some_and(|tail| tail.starts_with('_'))
}

/// Reads `YYYYMMDD_HHMMSS` right after the canonical-name prefix.
fn parse_backup_timestamp(file_name: &str, prefix: &str) -> Option<NaiveDateTime> {
    let rest = file_name.strip_prefix(prefix)?;
    let stamp = rest.get(..BACKUP_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}
