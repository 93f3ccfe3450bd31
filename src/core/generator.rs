//! Expansion of a user's transaction intent into concrete ledger entries.
//!
//! An intent expands through exactly one mechanism:
//!
//! | Mode | Rows | Due dates |
//! |------|------|-----------|
//! | Single | 1 | start date |
//! | Installments | `installment_count` | start + (i-1) months |
//! | Recurring | occurrences, capped | start + (i-1) recurrence steps |
//!
//! Generation is pure: nothing is persisted here and every failure is raised
//! before the first row is built.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{LedgerError, Result};
use crate::domain::{
    EntryKind, Installment, LedgerEntry, PaymentSource, Recurrence, TimeInterval,
};

pub const DEFAULT_RECURRENCE_OCCURRENCES: u32 = 12;
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 120;
/// Largest amount a single entry may carry, in whole currency units.
pub const MAX_ENTRY_AMOUNT: i64 = 1_000_000_000_000_000;

/// Rejects amounts that are not positive or exceed [`MAX_ENTRY_AMOUNT`].
pub fn check_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid("amount must be greater than zero"));
    }
    if amount > Decimal::from(MAX_ENTRY_AMOUNT) {
        return Err(LedgerError::invalid(format!(
            "amount too large, at most {} allowed",
            MAX_ENTRY_AMOUNT
        )));
    }
    Ok(())
}

/// Bounds applied while validating intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Number of rows a recurring intent produces, and the most it may request.
    pub recurrence_occurrences: u32,
    pub max_installments: u32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            recurrence_occurrences: DEFAULT_RECURRENCE_OCCURRENCES,
            max_installments: DEFAULT_MAX_INSTALLMENTS,
        }
    }
}

/// A single transaction as entered by the user, before expansion.
///
/// Counts are signed because they arrive unchecked from form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub kind: EntryKind,
    pub description: String,
    /// Per-installment value for installment plans, full value otherwise.
    pub amount: Decimal,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default = "TransactionIntent::default_installment_count")]
    pub installment_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PaymentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransactionIntent {
    pub fn new(
        kind: EntryKind,
        description: impl Into<String>,
        amount: Decimal,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            start_date: Some(start_date),
            recurrence: Recurrence::Unique,
            installment_count: 1,
            occurrences: None,
            source: None,
            category_id: None,
            notes: None,
        }
    }

    pub fn expense(description: impl Into<String>, amount: Decimal, start_date: NaiveDate) -> Self {
        Self::new(EntryKind::Expense, description, amount, start_date)
    }

    pub fn income(description: impl Into<String>, amount: Decimal, start_date: NaiveDate) -> Self {
        Self::new(EntryKind::Income, description, amount, start_date)
    }

    pub fn with_installments(mut self, count: i32) -> Self {
        self.installment_count = count;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_occurrences(mut self, occurrences: i32) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    pub fn from_account(mut self, account_id: Uuid) -> Self {
        self.source = Some(PaymentSource::Account(account_id));
        self
    }

    pub fn on_credit_card(mut self, card_id: Uuid) -> Self {
        self.source = Some(PaymentSource::CreditCard(card_id));
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn default_installment_count() -> i32 {
        1
    }

    /// Validates the intent and resolves which expansion mechanism applies.
    pub fn schedule(&self, limits: &GenerationLimits) -> Result<Schedule> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::invalid("description must not be empty"));
        }
        check_amount(self.amount)?;
        if self.start_date.is_none() {
            return Err(LedgerError::invalid("due date is required"));
        }
        if self.installment_count <= 0 {
            return Err(LedgerError::invalid(format!(
                "installment count must be positive, got {}",
                self.installment_count
            )));
        }
        if let Some(occurrences) = self.occurrences {
            if occurrences <= 0 {
                return Err(LedgerError::invalid(format!(
                    "occurrence count must be positive, got {}",
                    occurrences
                )));
            }
        }
        if self.kind == EntryKind::Income
            && matches!(self.source, Some(PaymentSource::CreditCard(_)))
        {
            return Err(LedgerError::invalid(
                "incomes can only be linked to a bank account",
            ));
        }

        let installments = self.installment_count as u32;
        match (installments > 1, self.recurrence.is_unique()) {
            (true, false) => Err(LedgerError::invalid(
                "an entry cannot be both split into installments and recurring",
            )),
            (true, true) => {
                if self.occurrences.is_some() {
                    return Err(LedgerError::invalid(
                        "occurrence count only applies to recurring entries",
                    ));
                }
                if installments > limits.max_installments {
                    return Err(LedgerError::invalid(format!(
                        "at most {} installments are allowed, got {}",
                        limits.max_installments, installments
                    )));
                }
                Ok(Schedule::Installments {
                    count: installments,
                })
            }
            (false, false) => {
                let cap = limits.recurrence_occurrences.max(1);
                let requested = self.occurrences.map_or(cap, |n| n as u32);
                Ok(Schedule::Recurring {
                    recurrence: self.recurrence,
                    occurrences: requested.min(cap),
                })
            }
            (false, true) => {
                if self.occurrences.is_some() {
                    return Err(LedgerError::invalid(
                        "occurrence count only applies to recurring entries",
                    ));
                }
                Ok(Schedule::Single)
            }
        }
    }
}

/// Validated expansion mechanism of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Single,
    Installments { count: u32 },
    Recurring { recurrence: Recurrence, occurrences: u32 },
}

impl Schedule {
    pub fn row_count(&self) -> u32 {
        match self {
            Schedule::Single => 1,
            Schedule::Installments { count } => *count,
            Schedule::Recurring { occurrences, .. } => *occurrences,
        }
    }

    fn step(&self) -> Option<TimeInterval> {
        match self {
            Schedule::Single => None,
            Schedule::Installments { .. } => Some(TimeInterval::months(1)),
            Schedule::Recurring { recurrence, .. } => recurrence.interval(),
        }
    }
}

/// Rows produced by one intent, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBatch {
    pub schedule: Schedule,
    pub entries: Vec<LedgerEntry>,
    /// Sum over all rows; for installment plans this is the purchase total. Display only.
    pub total_amount: Decimal,
}

impl GeneratedBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_batch(&self) -> bool {
        !matches!(self.schedule, Schedule::Single)
    }
}

/// Expands a validated intent into the rows to persist.
pub fn expand(intent: &TransactionIntent, limits: &GenerationLimits) -> Result<GeneratedBatch> {
    let schedule = intent.schedule(limits)?;
    let start = intent
        .start_date
        .ok_or_else(|| LedgerError::invalid("due date is required"))?;
    let rows = schedule.row_count();
    let dates = due_dates(start, schedule.step(), rows)?;

    let series_id = if rows > 1 { Some(Uuid::new_v4()) } else { None };
    let description = intent.description.trim().to_string();
    let notes = intent
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string);

    let entries: Vec<LedgerEntry> = dates
        .into_iter()
        .enumerate()
        .map(|(position, due_date)| {
            let mut entry =
                LedgerEntry::new(intent.kind, description.clone(), intent.amount, due_date);
            entry.source = intent.source;
            entry.category_id = intent.category_id;
            entry.notes = notes.clone();
            entry.series_id = series_id;
            match schedule {
                Schedule::Single => {}
                Schedule::Installments { count } => {
                    entry.installment = Installment {
                        index: position as u32 + 1,
                        count,
                    };
                }
                Schedule::Recurring { recurrence, .. } => entry.recurrence = recurrence,
            }
            entry
        })
        .collect();

    let total_amount = intent
        .amount
        .checked_mul(Decimal::from(rows))
        .ok_or_else(|| LedgerError::invalid("amount too large"))?;
    tracing::debug!(
        rows,
        schedule = ?schedule,
        total = %total_amount,
        "expanded transaction intent"
    );
    Ok(GeneratedBatch {
        schedule,
        entries,
        total_amount,
    })
}

fn due_dates(start: NaiveDate, step: Option<TimeInterval>, rows: u32) -> Result<Vec<NaiveDate>> {
    let Some(step) = step else {
        return Ok(vec![start]);
    };
    (0..rows)
        .map(|offset| {
            step.nth_after(start, offset).ok_or_else(|| {
                LedgerError::invalid(format!("due date out of range after {} steps", offset))
            })
        })
        .collect()
}
