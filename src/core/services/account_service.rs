use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::common::name_taken;
use crate::domain::{Account, Ledger};

use super::ServiceResult;

pub struct AccountService;

impl AccountService {
    pub fn add(ledger: &mut Ledger, mut account: Account) -> ServiceResult<Uuid> {
        account.name = account.name.trim().to_string();
        Self::validate_name(ledger, None, &account.name)?;
        Ok(ledger.add_account(account))
    }

    /// Updates descriptive fields. The balance is owned by payment reconciliation and is left untouched.
    pub fn edit(ledger: &mut Ledger, id: Uuid, changes: Account) -> ServiceResult<()> {
        Self::validate_name(ledger, Some(id), &changes.name)?;
        let account = ledger
            .account_mut(id)
            .ok_or_else(|| LedgerError::not_found("Account", id))?;
        account.name = changes.name.trim().to_string();
        account.kind = changes.kind;
        account.bank = changes.bank;
        account.notes = changes.notes;
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Account> {
        if ledger
            .entries
            .iter()
            .any(|entry| entry.account_id() == Some(id))
        {
            return Err(LedgerError::Conflict(
                "Account has linked entries".into(),
            ));
        }
        let position = ledger
            .accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or_else(|| LedgerError::not_found("Account", id))?;
        let removed = ledger.accounts.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger) -> Vec<&Account> {
        ledger.accounts.iter().collect()
    }

    fn validate_name(ledger: &Ledger, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        if candidate.trim().is_empty() {
            return Err(LedgerError::invalid("account name must not be empty"));
        }
        if name_taken(&ledger.accounts, candidate, exclude) {
            Err(LedgerError::Conflict(format!(
                "Account `{}` already exists",
                candidate.trim()
            )))
        } else {
            Ok(())
        }
    }
}
