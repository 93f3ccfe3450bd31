//! Creation, editing and removal of ledger entries.

use chrono::Utc;
use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::core::generator::{self, GenerationLimits, Schedule, TransactionIntent};
use crate::domain::{EntryKind, EntryPatch, Ledger, LedgerEntry, PaymentSource};

use super::payment_service::PaymentService;
use super::ServiceResult;

/// Summary handed back when one intent produced several rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    pub ids: Vec<Uuid>,
    pub message: String,
}

/// Result shape of [`EntryService::create`]; callers branch on it.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Single(LedgerEntry),
    Batch(BatchReceipt),
}

impl CreateOutcome {
    pub fn ids(&self) -> Vec<Uuid> {
        match self {
            CreateOutcome::Single(entry) => vec![entry.id],
            CreateOutcome::Batch(receipt) => receipt.ids.clone(),
        }
    }
}

pub struct EntryService;

impl EntryService {
    /// Expands `intent` and stores every generated row.
    ///
    /// References are checked before expansion so that a bad account, card or
    /// category never leaves a partial batch behind.
    pub fn create(
        ledger: &mut Ledger,
        intent: &TransactionIntent,
        limits: &GenerationLimits,
    ) -> ServiceResult<CreateOutcome> {
        Self::check_references(ledger, intent.kind, intent.source, intent.category_id)?;
        let batch = generator::expand(intent, limits)?;

        if !batch.is_batch() {
            let entry = batch
                .entries
                .into_iter()
                .next()
                .ok_or_else(|| LedgerError::invalid("intent produced no entries"))?;
            ledger.add_entry(entry.clone());
            return Ok(CreateOutcome::Single(entry));
        }

        let message = match batch.schedule {
            Schedule::Installments { count } => format!("{} installments created", count),
            Schedule::Recurring {
                recurrence,
                occurrences,
            } => format!(
                "{} {} entries created",
                occurrences,
                recurrence.to_string().to_lowercase()
            ),
            Schedule::Single => format!("{} entries created", batch.len()),
        };
        let ids = batch
            .entries
            .into_iter()
            .map(|entry| ledger.add_entry(entry))
            .collect::<Vec<_>>();
        tracing::debug!(count = ids.len(), "stored generated batch");
        Ok(CreateOutcome::Batch(BatchReceipt { ids, message }))
    }

    /// Applies `patch` to a single row. Sibling rows of the same series are not touched.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: EntryPatch) -> ServiceResult<LedgerEntry> {
        let current = ledger
            .entry(id)
            .ok_or_else(|| LedgerError::not_found("Entry", id))?;

        if let Some(description) = &patch.description {
            if description.trim().is_empty() {
                return Err(LedgerError::invalid("description must not be empty"));
            }
        }
        if let Some(amount) = patch.amount {
            generator::check_amount(amount)?;
        }
        if current.is_paid && patch.changes_settlement(current) {
            return Err(LedgerError::invalid(
                "mark the entry as unpaid before changing its amount or account",
            ));
        }
        let source = patch.source.unwrap_or(current.source);
        let category_id = patch.category_id.unwrap_or(current.category_id);
        Self::check_references(ledger, current.kind, source, category_id)?;

        let entry = ledger
            .entry_mut(id)
            .ok_or_else(|| LedgerError::not_found("Entry", id))?;
        if let Some(description) = patch.description {
            entry.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            entry.amount = amount;
        }
        if let Some(due_date) = patch.due_date {
            entry.due_date = due_date;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty());
        }
        entry.source = source;
        entry.category_id = category_id;
        let updated = entry.clone();
        ledger.touch();
        Ok(updated)
    }

    /// Removes an entry. A paid expense is reverted first so its account gets the amount back.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> ServiceResult<LedgerEntry> {
        let paid = ledger
            .entry(id)
            .map(|entry| entry.is_paid)
            .ok_or_else(|| LedgerError::not_found("Entry", id))?;
        if paid {
            PaymentService::mark_unpaid(ledger, id)?;
        }
        ledger
            .remove_entry(id)
            .ok_or_else(|| LedgerError::not_found("Entry", id))
    }

    /// Entries sharing `series_id`, in generated order.
    pub fn series(ledger: &Ledger, series_id: Uuid) -> Vec<&LedgerEntry> {
        let mut rows: Vec<&LedgerEntry> = ledger
            .entries
            .iter()
            .filter(|entry| entry.series_id == Some(series_id))
            .collect();
        rows.sort_by_key(|entry| (entry.due_date, entry.installment.index));
        rows
    }

    pub fn list(ledger: &Ledger) -> Vec<&LedgerEntry> {
        ledger.entries.iter().collect()
    }

    /// Unpaid expenses due on or before today.
    pub fn overdue(ledger: &Ledger) -> Vec<&LedgerEntry> {
        let today = Utc::now().date_naive();
        ledger
            .entries
            .iter()
            .filter(|entry| entry.is_expense() && !entry.is_paid && entry.due_date <= today)
            .collect()
    }

    fn check_references(
        ledger: &Ledger,
        kind: EntryKind,
        source: Option<PaymentSource>,
        category_id: Option<Uuid>,
    ) -> ServiceResult<()> {
        match source {
            Some(PaymentSource::Account(account_id)) => {
                if ledger.account(account_id).is_none() {
                    return Err(LedgerError::not_found("Account", account_id));
                }
            }
            Some(PaymentSource::CreditCard(card_id)) => {
                if kind == EntryKind::Income {
                    return Err(LedgerError::invalid(
                        "incomes can only be linked to a bank account",
                    ));
                }
                if ledger.credit_card(card_id).is_none() {
                    return Err(LedgerError::not_found("Credit card", card_id));
                }
            }
            None => {}
        }
        if let Some(category_id) = category_id {
            let category = ledger
                .category(category_id)
                .ok_or_else(|| LedgerError::not_found("Category", category_id))?;
            if !category.accepts(kind) {
                return Err(LedgerError::invalid(format!(
                    "category `{}` is for {} entries",
                    category.name, category.kind
                )));
            }
        }
        Ok(())
    }
}
