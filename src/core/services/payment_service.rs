//! Payment reconciliation.
//!
//! Marking an expense paid flips its flag and debits the linked account in one
//! step. Every precondition is checked before the first write, so a failed call
//! leaves both the entry and the account untouched.
//!
//! ```text
//!   unpaid ──mark_paid──► paid (balance -= amount)
//!     ▲                     │
//!     └─────mark_unpaid─────┘ (balance += amount)
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::{EntryKind, Ledger};

use super::ServiceResult;

/// What to do when paying an expense that has no linked bank account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UnlinkedPaymentPolicy {
    /// Fail with [`LedgerError::UnlinkedAccount`].
    #[default]
    Reject,
    /// Leave the entry unpaid, log a warning and report [`PaymentOutcome::Skipped`].
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The flag moved and the account balance was adjusted.
    Applied { account_id: Uuid, balance: Decimal },
    AlreadyPaid,
    AlreadyUnpaid,
    /// Nothing changed because the expense has no account and the policy only warns.
    Skipped { entry_id: Uuid },
}

impl PaymentOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, PaymentOutcome::Applied { .. })
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Marks an expense paid at `at` and debits its account.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] - unknown entry, or the linked account no longer exists.
    /// - [`LedgerError::InvalidIntent`] - the entry is an income.
    /// - [`LedgerError::UnlinkedAccount`] - no account linked and `policy` is `Reject`.
    pub fn mark_paid(
        ledger: &mut Ledger,
        entry_id: Uuid,
        at: DateTime<Utc>,
        policy: UnlinkedPaymentPolicy,
    ) -> ServiceResult<PaymentOutcome> {
        let entry = ledger
            .entry(entry_id)
            .ok_or_else(|| LedgerError::not_found("Entry", entry_id))?;
        if entry.kind != EntryKind::Expense {
            return Err(LedgerError::invalid("only expenses can be marked as paid"));
        }
        if entry.is_paid {
            return Ok(PaymentOutcome::AlreadyPaid);
        }
        let amount = entry.amount;
        let Some(account_id) = entry.account_id() else {
            return match policy {
                UnlinkedPaymentPolicy::Reject => Err(LedgerError::UnlinkedAccount(entry_id)),
                UnlinkedPaymentPolicy::Warn => {
                    tracing::warn!(%entry_id, "expense has no linked account; payment not recorded");
                    Ok(PaymentOutcome::Skipped { entry_id })
                }
            };
        };
        if ledger.account(account_id).is_none() {
            return Err(LedgerError::not_found("Account", account_id));
        }

        let balance = Self::adjust_balance(ledger, account_id, -amount)?;
        let entry = ledger
            .entry_mut(entry_id)
            .ok_or_else(|| LedgerError::not_found("Entry", entry_id))?;
        entry.is_paid = true;
        entry.paid_at = Some(at);
        ledger.touch();
        tracing::info!(%entry_id, %account_id, %amount, %balance, "expense marked as paid");
        Ok(PaymentOutcome::Applied {
            account_id,
            balance,
        })
    }

    /// Reverts a payment, crediting the amount back to the linked account.
    pub fn mark_unpaid(ledger: &mut Ledger, entry_id: Uuid) -> ServiceResult<PaymentOutcome> {
        let entry = ledger
            .entry(entry_id)
            .ok_or_else(|| LedgerError::not_found("Entry", entry_id))?;
        if !entry.is_paid {
            return Ok(PaymentOutcome::AlreadyUnpaid);
        }
        let amount = entry.amount;
        // Paid entries always carry an account: the link cannot be edited while paid.
        let account_id = entry
            .account_id()
            .ok_or(LedgerError::UnlinkedAccount(entry_id))?;
        if ledger.account(account_id).is_none() {
            return Err(LedgerError::not_found("Account", account_id));
        }

        let balance = Self::adjust_balance(ledger, account_id, amount)?;
        let entry = ledger
            .entry_mut(entry_id)
            .ok_or_else(|| LedgerError::not_found("Entry", entry_id))?;
        entry.is_paid = false;
        entry.paid_at = None;
        ledger.touch();
        tracing::info!(%entry_id, %account_id, %amount, %balance, "payment reverted");
        Ok(PaymentOutcome::Applied {
            account_id,
            balance,
        })
    }

    fn adjust_balance(ledger: &mut Ledger, account_id: Uuid, delta: Decimal) -> ServiceResult<Decimal> {
        let account = ledger
            .account_mut(account_id)
            .ok_or_else(|| LedgerError::not_found("Account", account_id))?;
        account.balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::invalid("account balance out of range"))?;
        Ok(account.balance)
    }
}
