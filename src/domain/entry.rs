use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::recurrence::Recurrence;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Income => f.write_str("Income"),
            EntryKind::Expense => f.write_str("Expense"),
        }
    }
}

/// Where an entry's money moves through. An entry is tied to an account or a card, never both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentSource {
    Account(Uuid),
    CreditCard(Uuid),
}

impl PaymentSource {
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            PaymentSource::Account(id) => Some(*id),
            PaymentSource::CreditCard(_) => None,
        }
    }

    pub fn credit_card_id(&self) -> Option<Uuid> {
        match self {
            PaymentSource::CreditCard(id) => Some(*id),
            PaymentSource::Account(_) => None,
        }
    }
}

/// Position of an entry inside an installment plan. `1/1` for plain entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Installment {
    pub index: u32,
    pub count: u32,
}

impl Installment {
    pub const SINGLE: Installment = Installment { index: 1, count: 1 };

    pub fn is_split(&self) -> bool {
        self.count > 1
    }
}

impl Default for Installment {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// One ledger row, income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PaymentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub installment: Installment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<Uuid>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        kind: EntryKind,
        description: impl Into<String>,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description: description.into(),
            amount,
            due_date,
            source: None,
            category_id: None,
            recurrence: Recurrence::Unique,
            installment: Installment::SINGLE,
            series_id: None,
            is_paid: false,
            paid_at: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        self.source.and_then(|source| source.account_id())
    }

    pub fn credit_card_id(&self) -> Option<Uuid> {
        self.source.and_then(|source| source.credit_card_id())
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Amount with the sign it contributes to a period's net balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for LedgerEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for LedgerEntry {
    fn display_label(&self) -> String {
        if self.installment.is_split() {
            format!(
                "{} ({}/{})",
                self.description, self.installment.index, self.installment.count
            )
        } else {
            self.description.clone()
        }
    }
}

/// Field changes applied to a single entry. `None` leaves the field untouched;
/// the nested options clear the optional reference when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub source: Option<Option<PaymentSource>>,
    pub category_id: Option<Option<Uuid>>,
    pub notes: Option<Option<String>>,
}

impl EntryPatch {
    /// Whether the patch touches a field that feeds a reconciled balance.
    pub fn changes_settlement(&self, entry: &LedgerEntry) -> bool {
        let amount_changed = self.amount.is_some_and(|amount| amount != entry.amount);
        let source_changed = self.source.is_some_and(|source| source != entry.source);
        amount_changed || source_changed
    }
}
