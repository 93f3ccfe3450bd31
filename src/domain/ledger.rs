use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    account::{Account, CreditCard},
    category::Category,
    common::{find_by_id, find_by_id_mut},
    entry::LedgerEntry,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// All financial records that belong to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub owner: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub credit_cards: Vec<CreditCard>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by every mutation; lets callers tell whether an operation changed anything.
    #[serde(default)]
    pub revision: u64,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            accounts: Vec::new(),
            credit_cards: Vec::new(),
            categories: Vec::new(),
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
            revision: 0,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_credit_card(&mut self, card: CreditCard) -> Uuid {
        let id = card.id;
        self.credit_cards.push(card);
        self.touch();
        id
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_entry(&mut self, entry: LedgerEntry) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        id
    }

    pub fn remove_entry(&mut self, id: Uuid) -> Option<LedgerEntry> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(position);
        self.touch();
        Some(removed)
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        find_by_id(&self.accounts, id)
    }

    pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        find_by_id_mut(&mut self.accounts, id)
    }

    pub fn credit_card(&self, id: Uuid) -> Option<&CreditCard> {
        find_by_id(&self.credit_cards, id)
    }

    pub fn credit_card_mut(&mut self, id: Uuid) -> Option<&mut CreditCard> {
        find_by_id_mut(&mut self.credit_cards, id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        find_by_id_mut(&mut self.categories, id)
    }

    pub fn entry(&self, id: Uuid) -> Option<&LedgerEntry> {
        find_by_id(&self.entries, id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut LedgerEntry> {
        find_by_id_mut(&mut self.entries, id)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
